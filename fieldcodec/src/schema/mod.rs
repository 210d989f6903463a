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

//! Schema-side types consumed by the codec layer.
//!
//! The codecs never own schema information; they are driven by it:
//!
//! - **[`MessageDescriptor`] / [`FieldDescriptor`] / [`EnumDescriptor`]**:
//!   field names, numbers, kinds and cardinality, in declaration order
//! - **[`Scalar`] / [`ValueRef`]**: tagged values passed to writers
//! - **[`Message`]**: the field-walk contract every message type implements
//! - **[`UnknownFieldSet`]**: fields preserved for round-trip fidelity
//! - **[`ExtensionRegistry`]**: extension fields known to the binary reader
//! - **[`DynamicMessage`]**: a descriptor-driven [`Message`] implementation

mod descriptor;
mod dynamic;
mod extension;
mod message;
mod unknown;
mod value;

pub use descriptor::{
    Cardinality, EnumDescriptor, EnumValue, FieldDescriptor, FieldKind, MAX_FIELD_NUMBER,
    MessageDescriptor, ScalarKind,
};
pub use dynamic::{DynamicMessage, FieldValue};
pub use extension::ExtensionRegistry;
pub use message::Message;
pub use unknown::{TextValue, UnknownField, UnknownFieldSet, WireValue};
pub use value::{Scalar, ValueRef};
