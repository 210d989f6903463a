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

//! Content-type driven codec selection.
//!
//! [`FormatOptions`] maps content types to writer and reader factories.
//! [`resolve_writer`] and [`resolve_reader`] bind the matching codec to a
//! stream, and [`write_message_to`] / [`merge_message_from`] run a whole
//! message through it.
//!
//! # Examples
//!
//! ```rust
//! use fieldcodec::format::{FormatOptions, merge_message_from, write_message_to};
//! use fieldcodec::schema::{DynamicMessage, FieldDescriptor, MessageDescriptor, ScalarKind};
//! use std::sync::Arc;
//!
//! let descriptor = Arc::new(MessageDescriptor::new(
//!     "demo.Greeting",
//!     vec![FieldDescriptor::scalar("text", 1, ScalarKind::String)],
//! )?);
//! let mut greeting = DynamicMessage::new(Arc::clone(&descriptor));
//! greeting.set("text", "hello")?;
//!
//! let options = FormatOptions::new().with_default_content_type("application/json");
//! for content_type in ["application/xml", "application/x-protobuf", "text/plain"] {
//!     let mut bytes = Vec::new();
//!     write_message_to(&options, content_type, &mut bytes, &greeting)?;
//!
//!     let mut decoded = DynamicMessage::new(Arc::clone(&descriptor));
//!     merge_message_from(&options, content_type, bytes.as_slice(), &mut decoded)?;
//!     assert_eq!(decoded, greeting);
//! }
//! # Ok::<(), fieldcodec::CodecError>(())
//! ```

mod content_type;
mod dispatch;
mod options;

pub use content_type::{
    APPLICATION_BINARY, APPLICATION_JSON, APPLICATION_XML, BINARY_CONTENT_TYPES,
    JSON_CONTENT_TYPES, XML_CONTENT_TYPES, normalize_content_type,
};
pub use dispatch::{
    FormatReader, FormatWriter, ReaderFactory, Sink, Source, WriterFactory, merge_message_from,
    resolve_reader, resolve_writer, write_message_to,
};
pub use options::{FormatOptions, FormatSettings};
