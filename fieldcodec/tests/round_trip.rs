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

//! Integration tests for decoding what was encoded, in every format.
//!
//! Covers the full scalar set, nested and repeated messages, enums, and the
//! preservation of fields written by a newer schema.

mod common;

use fieldcodec::codec::binary;
use fieldcodec::format::{
    BINARY_CONTENT_TYPES, FormatOptions, JSON_CONTENT_TYPES, XML_CONTENT_TYPES,
    merge_message_from, write_message_to,
};
use fieldcodec::schema::{FieldValue, Scalar, UnknownField};
use fieldcodec::{DynamicMessage, Message};

const CANONICAL: [&str; 3] = ["application/json", "application/xml", "application/binary"];

fn encode(options: &FormatOptions, content_type: &str, message: &DynamicMessage) -> Vec<u8> {
    let mut out = Vec::new();
    write_message_to(options, content_type, &mut out, message)
        .unwrap_or_else(|error| panic!("{content_type}: encode failed: {error}"));
    out
}

fn decode(
    options: &FormatOptions,
    content_type: &str,
    bytes: &[u8],
    into: &mut DynamicMessage,
) {
    merge_message_from(options, content_type, bytes, into)
        .unwrap_or_else(|error| panic!("{content_type}: decode failed: {error}"));
}

#[test]
fn test_every_content_type_round_trips() {
    let options = FormatOptions::new();
    let descriptor = common::person();
    let person = common::sample_person(&descriptor);

    for content_type in JSON_CONTENT_TYPES
        .iter()
        .chain(XML_CONTENT_TYPES)
        .chain(BINARY_CONTENT_TYPES)
    {
        let bytes = encode(&options, content_type, &person);
        let mut decoded = DynamicMessage::new(descriptor.clone());
        decode(&options, content_type, &bytes, &mut decoded);
        assert_eq!(decoded, person, "{content_type}");
    }
}

#[test]
fn test_formatted_output_reads_back() {
    let options = FormatOptions::new().with_formatted(true);
    let descriptor = common::person();
    let person = common::sample_person(&descriptor);

    for content_type in CANONICAL {
        let bytes = encode(&options, content_type, &person);
        let mut decoded = DynamicMessage::new(descriptor.clone());
        decode(&options, content_type, &bytes, &mut decoded);
        assert_eq!(decoded, person, "{content_type}");
    }
}

#[test]
fn test_extreme_scalars_survive_every_format() {
    let options = FormatOptions::new();
    let descriptor = common::person();
    let mut person = DynamicMessage::new(descriptor.clone());
    person
        .set("name", "")
        .and_then(|p| p.set("id", i64::MAX))
        .and_then(|p| p.set("score", -1.5e-3))
        .and_then(|p| p.set("active", false))
        .and_then(|p| p.set("avatar", Vec::<u8>::new()))
        .and_then(|p| p.set("ratio", f32::MAX))
        .and_then(|p| p.set("visits", 0u64))
        .and_then(|p| p.set("delta", i32::MIN))
        .unwrap();

    for content_type in CANONICAL {
        let bytes = encode(&options, content_type, &person);
        let mut decoded = DynamicMessage::new(descriptor.clone());
        decode(&options, content_type, &bytes, &mut decoded);
        for field in ["id", "score", "active", "ratio", "visits", "delta"] {
            assert_eq!(decoded.get(field), person.get(field), "{content_type}: {field}");
        }
    }
}

#[test]
fn test_undeclared_enum_number_survives_as_number() {
    let options = FormatOptions::new();
    let descriptor = common::person();
    let mut person = DynamicMessage::new(descriptor.clone());
    person
        .set("name", "n")
        .and_then(|p| p.set("color", FieldValue::Enum(9)))
        .unwrap();

    for content_type in CANONICAL {
        let bytes = encode(&options, content_type, &person);
        let mut decoded = DynamicMessage::new(descriptor.clone());
        decode(&options, content_type, &bytes, &mut decoded);
        assert_eq!(decoded.get("color"), Some(&FieldValue::Enum(9)), "{content_type}");
    }
}

#[test]
fn test_unknown_fields_survive_same_format_reencode() {
    let options = FormatOptions::new();
    let newer = common::sample_person_v2();
    let current = common::person();

    for content_type in CANONICAL {
        let original = encode(&options, content_type, &newer);

        let mut older = DynamicMessage::new(current.clone());
        decode(&options, content_type, &original, &mut older);
        assert!(!older.unknown_fields().is_empty(), "{content_type}");

        let reencoded = encode(&options, content_type, &older);
        assert_eq!(reencoded, original, "{content_type}: byte-for-byte");

        let mut again = DynamicMessage::new(newer.descriptor_arc().clone());
        decode(&options, content_type, &reencoded, &mut again);
        assert_eq!(again, newer, "{content_type}");
    }
}

#[test]
fn test_second_generation_unknowns_are_stable() {
    let options = FormatOptions::new();
    let newer = common::sample_person_v2();
    let current = common::person();

    for content_type in CANONICAL {
        let mut first = DynamicMessage::new(current.clone());
        decode(&options, content_type, &encode(&options, content_type, &newer), &mut first);
        let once = encode(&options, content_type, &first);

        let mut second = DynamicMessage::new(current.clone());
        decode(&options, content_type, &once, &mut second);
        let twice = encode(&options, content_type, &second);

        assert_eq!(second, first, "{content_type}");
        assert_eq!(twice, once, "{content_type}");
    }
}

#[test]
fn test_empty_unknown_values_are_kept() {
    let options = FormatOptions::new();
    let descriptor = common::person();
    let cases: [(&str, &[u8]); 2] = [
        ("application/json", br#"{"name":"n","future":null}"#),
        ("application/xml", b"<root><name>n</name><future/></root>"),
    ];

    for (content_type, original) in cases {
        let mut person = DynamicMessage::new(descriptor.clone());
        decode(&options, content_type, original, &mut person);
        assert_eq!(person.unknown_fields().len(), 1, "{content_type}");
        assert_eq!(encode(&options, content_type, &person), original, "{content_type}");
    }
}

#[test]
fn test_json_keys_that_are_not_xml_names_are_left_out() {
    let options = FormatOptions::new();
    let descriptor = common::person();
    let mut person = DynamicMessage::new(descriptor.clone());
    decode(
        &options,
        "application/json",
        br#"{"name":"n","a<b":"v","x y":"w","ok":1}"#,
        &mut person,
    );
    assert_eq!(person.unknown_fields().len(), 3);

    let xml = encode(&options, "application/xml", &person);
    assert_eq!(xml, b"<root><name>n</name><ok>1</ok></root>");
    let mut decoded = DynamicMessage::new(descriptor);
    decode(&options, "application/xml", &xml, &mut decoded);
    assert_eq!(decoded.unknown_fields().len(), 1);
}

#[test]
fn test_binary_unknowns_are_dropped_by_text_formats() {
    let options = FormatOptions::new();
    let current = common::person();
    let original = binary::to_vec(&common::sample_person_v2()).unwrap();

    let mut older = DynamicMessage::new(current.clone());
    binary::merge_from_slice(&original, &mut older, None).unwrap();
    assert!(
        older
            .unknown_fields()
            .iter()
            .all(|field| matches!(field, UnknownField::Wire { .. }))
    );

    let text = encode(&options, "application/json", &older);
    let mut from_text = DynamicMessage::new(current.clone());
    decode(&options, "application/json", &text, &mut from_text);
    assert!(from_text.unknown_fields().is_empty());
    assert_eq!(from_text.get("name"), older.get("name"));
}

#[test]
fn test_repeated_messages_keep_order() {
    let options = FormatOptions::new();
    let descriptor = common::person();
    let person = common::sample_person(&descriptor);

    for content_type in CANONICAL {
        let bytes = encode(&options, content_type, &person);
        let mut decoded = DynamicMessage::new(descriptor.clone());
        decode(&options, content_type, &bytes, &mut decoded);

        let streets: Vec<_> = decoded
            .get_repeated("history")
            .iter()
            .filter_map(FieldValue::as_message)
            .filter_map(|address| address.get("street"))
            .filter_map(FieldValue::as_scalar)
            .filter_map(Scalar::as_str)
            .collect();
        assert_eq!(streets, ["Old Rd", "Older Ln"], "{content_type}");
    }
}

#[test]
fn test_delimited_stream_of_messages() {
    let descriptor = common::person();
    let people: Vec<_> = (0..3)
        .map(|n| {
            let mut person = common::sample_person(&descriptor);
            person.set("delta", n).unwrap();
            person
        })
        .collect();

    let mut stream = Vec::new();
    for person in &people {
        binary::write_delimited(&mut stream, person).unwrap();
    }

    let mut source = stream.as_slice();
    for person in &people {
        let mut decoded = DynamicMessage::new(descriptor.clone());
        binary::merge_delimited(&mut source, &mut decoded, None).unwrap();
        assert_eq!(&decoded, person);
    }
    assert!(source.is_empty());
}
