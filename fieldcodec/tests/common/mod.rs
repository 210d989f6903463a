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

//! Shared schemas and sample messages for the integration tests.

#![allow(dead_code)]

use fieldcodec::DynamicMessage;
use fieldcodec::schema::{
    Cardinality, EnumDescriptor, FieldDescriptor, MessageDescriptor, ScalarKind,
};
use std::sync::Arc;

pub fn color() -> Arc<EnumDescriptor> {
    Arc::new(EnumDescriptor::new(
        "test.Color",
        [(0, "RED"), (1, "GREEN"), (2, "BLUE")],
    ))
}

pub fn address() -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptor::new(
            "test.Address",
            vec![
                FieldDescriptor::scalar("street", 1, ScalarKind::String),
                FieldDescriptor::scalar("zip", 2, ScalarKind::UInt32),
            ],
        )
        .expect("valid address schema"),
    )
}

fn person_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::scalar("name", 1, ScalarKind::String)
            .with_cardinality(Cardinality::Required),
        FieldDescriptor::scalar("id", 2, ScalarKind::Int64),
        FieldDescriptor::scalar("score", 3, ScalarKind::Double),
        FieldDescriptor::scalar("active", 4, ScalarKind::Bool),
        FieldDescriptor::scalar("avatar", 5, ScalarKind::Bytes),
        FieldDescriptor::enumeration("color", 6, color()),
        FieldDescriptor::message("address", 7, address()),
        FieldDescriptor::repeated("tags", 8, ScalarKind::String),
        FieldDescriptor::message("history", 9, address())
            .with_cardinality(Cardinality::Repeated),
        FieldDescriptor::scalar("ratio", 10, ScalarKind::Float),
        FieldDescriptor::scalar("visits", 11, ScalarKind::UInt64),
        FieldDescriptor::scalar("delta", 12, ScalarKind::Int32),
    ]
}

/// The current person schema.
pub fn person() -> Arc<MessageDescriptor> {
    Arc::new(MessageDescriptor::new("test.Person", person_fields()).expect("valid person schema"))
}

/// A newer person schema with fields the current one does not know.
pub fn person_v2() -> Arc<MessageDescriptor> {
    let mut fields = person_fields();
    fields.push(FieldDescriptor::scalar("nickname", 20, ScalarKind::String));
    fields.push(FieldDescriptor::repeated("lucky", 21, ScalarKind::Int32));
    fields.push(FieldDescriptor::message("office", 22, address()));
    fields.push(FieldDescriptor::scalar("weight", 23, ScalarKind::Double));
    Arc::new(MessageDescriptor::new("test.Person", fields).expect("valid person schema"))
}

pub fn sample_address(descriptor: &Arc<MessageDescriptor>, street: &str, zip: u32) -> DynamicMessage {
    let mut address = DynamicMessage::new(Arc::clone(descriptor));
    address.set("street", street).expect("street");
    address.set("zip", zip).expect("zip");
    address
}

/// A person with every field set, built against `descriptor`.
pub fn sample_person(descriptor: &Arc<MessageDescriptor>) -> DynamicMessage {
    let address = address();
    let mut person = DynamicMessage::new(Arc::clone(descriptor));
    person
        .set("name", "Ada \"the first\" </script>")
        .and_then(|p| p.set("id", i64::MIN))
        .and_then(|p| p.set("score", 99.125))
        .and_then(|p| p.set("active", true))
        .and_then(|p| p.set("avatar", vec![0u8, 159, 146, 150, 255]))
        .and_then(|p| p.set("color", fieldcodec::schema::FieldValue::Enum(2)))
        .and_then(|p| p.set("address", sample_address(&address, "1 Main St", 12345)))
        .and_then(|p| p.push("tags", "alpha"))
        .and_then(|p| p.push("tags", "β/γ"))
        .and_then(|p| p.push("history", sample_address(&address, "Old Rd", 1)))
        .and_then(|p| p.push("history", sample_address(&address, "Older Ln", 2)))
        .and_then(|p| p.set("ratio", 0.1f32))
        .and_then(|p| p.set("visits", u64::MAX))
        .and_then(|p| p.set("delta", -7))
        .expect("sample person");
    person
}

/// A person from the newer schema, with its extra fields set.
pub fn sample_person_v2() -> DynamicMessage {
    let descriptor = person_v2();
    let mut person = sample_person(&descriptor);
    person
        .set("nickname", "Countess")
        .and_then(|p| p.push("lucky", 7))
        .and_then(|p| p.push("lucky", -13))
        .and_then(|p| p.set("office", sample_address(&address(), "Lab", 42)))
        .and_then(|p| p.set("weight", 61.5))
        .expect("sample person v2");
    person
}
