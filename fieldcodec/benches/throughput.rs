//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Throughput benchmarks for fieldcodec
//!
//! Measures encode and decode rates per format for:
//! - Small messages (a handful of scalars)
//! - Large messages (long strings and byte payloads)
//! - Streamed top-level JSON arrays

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fieldcodec::DynamicMessage;
use fieldcodec::codec::json::JsonWriter;
use fieldcodec::format::{FormatOptions, merge_message_from, write_message_to};
use fieldcodec::schema::{FieldDescriptor, MessageDescriptor, ScalarKind};
use std::sync::Arc;
use std::time::Duration;

const FORMATS: [&str; 3] = ["application/json", "application/xml", "application/binary"];

fn reading_descriptor() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new(
            "bench.Reading",
            vec![
                FieldDescriptor::scalar("sensor", 1, ScalarKind::String),
                FieldDescriptor::scalar("sequence", 2, ScalarKind::UInt64),
                FieldDescriptor::scalar("celsius", 3, ScalarKind::Double),
                FieldDescriptor::scalar("healthy", 4, ScalarKind::Bool),
                FieldDescriptor::repeated("samples", 5, ScalarKind::Float),
                FieldDescriptor::scalar("payload", 6, ScalarKind::Bytes),
                FieldDescriptor::scalar("note", 7, ScalarKind::String),
            ],
        )
        .unwrap(),
    )
}

/// Small reading: a few scalars and eight samples.
fn small_reading(descriptor: &Arc<MessageDescriptor>, sequence: u64) -> DynamicMessage {
    let mut reading = DynamicMessage::new(Arc::clone(descriptor));
    reading
        .set("sensor", "t1")
        .and_then(|r| r.set("sequence", sequence))
        .and_then(|r| r.set("celsius", 21.5))
        .and_then(|r| r.set("healthy", true))
        .unwrap();
    for sample in 0..8u8 {
        reading.push("samples", f32::from(sample) * 0.25).unwrap();
    }
    reading
}

/// Large reading: ~10 KB of payload plus an escaped note.
fn large_reading(descriptor: &Arc<MessageDescriptor>) -> DynamicMessage {
    let mut reading = small_reading(descriptor, 1);
    reading
        .set("payload", vec![0xA5u8; 6 * 1024])
        .and_then(|r| r.set("note", "line \"one\"/two\n".repeat(128)))
        .unwrap();
    reading
}

fn encoded(options: &FormatOptions, content_type: &str, message: &DynamicMessage) -> Vec<u8> {
    let mut out = Vec::new();
    write_message_to(options, content_type, &mut out, message).unwrap();
    out
}

/// Benchmark encoding a small message in each format
fn bench_encode_small(c: &mut Criterion) {
    let options = FormatOptions::new();
    let descriptor = reading_descriptor();
    let reading = small_reading(&descriptor, 1);

    let mut group = c.benchmark_group("encode_small");
    group.throughput(Throughput::Elements(1));
    for content_type in FORMATS {
        group.bench_with_input(
            BenchmarkId::from_parameter(content_type),
            &reading,
            |b, reading| {
                let mut out = Vec::with_capacity(256);
                b.iter(|| {
                    out.clear();
                    write_message_to(&options, content_type, &mut out, reading).unwrap();
                    black_box(out.len());
                });
            },
        );
    }
    group.finish();
}

/// Benchmark encoding a large message in each format
fn bench_encode_large(c: &mut Criterion) {
    let options = FormatOptions::new();
    let descriptor = reading_descriptor();
    let reading = large_reading(&descriptor);

    let mut group = c.benchmark_group("encode_large");
    group.measurement_time(Duration::from_secs(10));
    for content_type in FORMATS {
        let size = encoded(&options, content_type, &reading).len();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(content_type),
            &reading,
            |b, reading| {
                let mut out = Vec::with_capacity(size);
                b.iter(|| {
                    out.clear();
                    write_message_to(&options, content_type, &mut out, reading).unwrap();
                    black_box(out.len());
                });
            },
        );
    }
    group.finish();
}

/// Benchmark decoding a small message in each format
fn bench_decode_small(c: &mut Criterion) {
    let options = FormatOptions::new();
    let descriptor = reading_descriptor();
    let reading = small_reading(&descriptor, 1);

    let mut group = c.benchmark_group("decode_small");
    group.throughput(Throughput::Elements(1));
    for content_type in FORMATS {
        let bytes = encoded(&options, content_type, &reading);
        group.bench_with_input(
            BenchmarkId::from_parameter(content_type),
            &bytes,
            |b, bytes| {
                b.iter(|| {
                    let mut decoded = DynamicMessage::new(Arc::clone(&descriptor));
                    merge_message_from(&options, content_type, bytes.as_slice(), &mut decoded)
                        .unwrap();
                    black_box(decoded);
                });
            },
        );
    }
    group.finish();
}

/// Benchmark streaming batches of messages into one JSON array
fn bench_json_array_batch(c: &mut Criterion) {
    let descriptor = reading_descriptor();
    let mut group = c.benchmark_group("json_array_batch");
    for batch_size in [10u64, 100, 1000] {
        let readings: Vec<_> = (0..batch_size)
            .map(|sequence| small_reading(&descriptor, sequence))
            .collect();
        group.throughput(Throughput::Elements(batch_size));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &readings,
            |b, readings| {
                b.iter(|| {
                    let mut writer = JsonWriter::new(Vec::new());
                    let mut array = writer.start_array().unwrap();
                    for reading in readings {
                        array.write_message(reading).unwrap();
                    }
                    array.finish().unwrap();
                    black_box(writer.into_inner().unwrap());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_encode_small,
    bench_encode_large,
    bench_decode_small,
    bench_json_array_batch
);
criterion_main!(benches);
