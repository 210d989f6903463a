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

//! # Content Negotiation Example
//!
//! This example writes one message in every registered format, the way a
//! server answering requests with different `Accept` headers would, and then
//! reads each encoding back.
//!
//! ## What This Example Shows
//!
//! - Describing a message type at runtime with `MessageDescriptor`
//! - Resolving codecs from content types, with parameters ignored
//! - Falling back to a default content type for unknown types
//! - Streaming several messages as one top-level JSON array
//! - Reading every encoding back into a `DynamicMessage`
//!
//! ## Running This Example
//!
//! ```bash
//! cargo run --example content_negotiation
//! ```

use fieldcodec::codec::json::JsonWriter;
use fieldcodec::format::{FormatOptions, merge_message_from, write_message_to};
use fieldcodec::schema::{EnumDescriptor, FieldDescriptor, MessageDescriptor, ScalarKind};
use fieldcodec::schema::FieldValue;
use fieldcodec::{DynamicMessage, Message};
use std::error::Error;
use std::sync::Arc;

fn order_descriptor() -> Result<Arc<MessageDescriptor>, Box<dyn Error>> {
    let status = Arc::new(EnumDescriptor::new(
        "shop.Status",
        [(0, "PENDING"), (1, "SHIPPED"), (2, "DELIVERED")],
    ));
    let line = Arc::new(MessageDescriptor::new(
        "shop.Line",
        vec![
            FieldDescriptor::scalar("sku", 1, ScalarKind::String),
            FieldDescriptor::scalar("quantity", 2, ScalarKind::UInt32),
        ],
    )?);
    Ok(Arc::new(MessageDescriptor::new(
        "shop.Order",
        vec![
            FieldDescriptor::scalar("id", 1, ScalarKind::Int64),
            FieldDescriptor::enumeration("status", 2, status),
            FieldDescriptor::message("lines", 3, line)
                .with_cardinality(fieldcodec::schema::Cardinality::Repeated),
            FieldDescriptor::scalar("note", 4, ScalarKind::String),
        ],
    )?))
}

fn order(descriptor: &Arc<MessageDescriptor>, id: i64) -> Result<DynamicMessage, Box<dyn Error>> {
    let line_descriptor = match descriptor.field_by_name("lines").map(|field| field.kind()) {
        Some(fieldcodec::schema::FieldKind::Message(line)) => Arc::clone(line),
        _ => return Err("order schema has no lines field".into()),
    };

    let mut order = DynamicMessage::new(Arc::clone(descriptor));
    order.set("id", id)?;
    order.set("status", FieldValue::Enum(1))?;
    order.set("note", "leave at the door / ring twice")?;
    for (sku, quantity) in [("A-100", 2u32), ("B-7", 1)] {
        let mut line = DynamicMessage::new(Arc::clone(&line_descriptor));
        line.set("sku", sku)?;
        line.set("quantity", quantity)?;
        order.push("lines", line)?;
    }
    Ok(order)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .init();

    println!("🚀 Content negotiation example\n");

    let descriptor = order_descriptor()?;
    let first = order(&descriptor, 1001)?;
    let options = FormatOptions::new()
        .with_default_content_type("application/json")
        .with_formatted(true)
        .with_xml_root_element("order");

    for accept in [
        "application/json; charset=utf-8",
        "text/xml",
        "application/x-protobuf",
        "text/csv",
    ] {
        let mut body = Vec::new();
        write_message_to(&options, accept, &mut body, &first)?;

        println!("📤 Accept: {accept} ({} bytes)", body.len());
        match std::str::from_utf8(&body) {
            Ok(text) => println!("{text}\n"),
            Err(_) => println!("{body:02x?}\n"),
        }

        let mut decoded = DynamicMessage::new(Arc::clone(&descriptor));
        merge_message_from(&options, accept, body.as_slice(), &mut decoded)?;
        println!(
            "📥 read back {} ({} unknown fields), equal: {}\n",
            decoded.descriptor().full_name(),
            decoded.unknown_fields().len(),
            decoded == first
        );
    }

    println!("📦 Streaming three orders as one JSON array");
    let mut writer = JsonWriter::new(Vec::new());
    let mut array = writer.start_array()?;
    for id in 2001..=2003 {
        array.write_message(&order(&descriptor, id)?)?;
    }
    array.finish()?;
    println!("{}", String::from_utf8(writer.into_inner()?)?);

    println!("\n✅ Done");
    Ok(())
}
