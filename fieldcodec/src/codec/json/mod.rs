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

//! JSON codec.
//!
//! [`JsonWriter`] streams JSON text through a fixed-size buffer, with
//! nesting-driven separators and optional indentation. [`JsonReader`] parses
//! a document and hands its fields to a message's merge logic.
//!
//! # Examples
//!
//! ```rust
//! use fieldcodec::codec::json;
//! use fieldcodec::schema::{DynamicMessage, FieldDescriptor, MessageDescriptor, ScalarKind};
//! use std::sync::Arc;
//!
//! let descriptor = Arc::new(MessageDescriptor::new(
//!     "demo.Note",
//!     vec![FieldDescriptor::scalar("text", 1, ScalarKind::String)],
//! )?);
//! let mut note = DynamicMessage::new(Arc::clone(&descriptor));
//! note.set("text", "a/b")?;
//!
//! let text = json::to_string(&note)?;
//! assert_eq!(text, r#"{"text":"a\/b"}"#);
//!
//! let mut decoded = DynamicMessage::new(descriptor);
//! json::merge_from_slice(text.as_bytes(), &mut decoded)?;
//! assert_eq!(decoded, note);
//! # Ok::<(), fieldcodec::CodecError>(())
//! ```

mod escape;
mod reader;
mod writer;

pub use reader::JsonReader;
pub use writer::{BUFFER_CAPACITY, JsonArray, JsonWriter};

use crate::codec::{StructuredReader, merge_fields};
use crate::error::{CodecError, Result};
use crate::schema::Message;

/// Encodes `message` as compact JSON.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedValue`] for NaN or infinite floats.
pub fn to_vec(message: &dyn Message) -> Result<Vec<u8>> {
    let mut writer = JsonWriter::new(Vec::new());
    writer.write_top_level(message)?;
    writer.into_inner()
}

/// Encodes `message` as compact JSON text.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedValue`] for NaN or infinite floats.
pub fn to_string(message: &dyn Message) -> Result<String> {
    into_string(to_vec(message)?)
}

/// Encodes `message` as indented JSON text.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedValue`] for NaN or infinite floats.
pub fn to_string_formatted(message: &dyn Message) -> Result<String> {
    let mut writer = JsonWriter::new(Vec::new()).with_formatted(true);
    writer.write_top_level(message)?;
    into_string(writer.into_inner()?)
}

/// Merges a JSON document into `message`.
///
/// # Errors
///
/// Returns a structural error for malformed JSON or values of the wrong type.
pub fn merge_from_slice(bytes: &[u8], message: &mut dyn Message) -> Result<()> {
    let mut reader = JsonReader::new(bytes);
    reader.read_message_start()?;
    merge_fields(&mut reader, message)?;
    reader.read_message_end()
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    // Every non-ASCII character is escaped, so this only fails on a
    // hand-built unknown number holding non-ASCII text.
    String::from_utf8(bytes).map_err(|e| CodecError::structure(format!("non-UTF-8 output: {e}")))
}
