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

//! The format-agnostic reader contract and the generic merge loop.

use crate::error::Result;
use crate::schema::{
    EnumDescriptor, FieldDescriptor, Message, Scalar, ScalarKind, UnknownFieldSet,
};
use std::fmt;

/// Identifies the next field found in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKey {
    /// A binary field number.
    Number(u32),
    /// A text field name.
    Name(String),
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "#{number}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// A streaming reader that feeds a message field by field.
///
/// After [`read_field_key`](Self::read_field_key) returns a key, exactly one
/// value call must follow: a typed read for a known field, or
/// [`skip_field`](Self::skip_field) for an unknown one.
pub trait StructuredReader {
    /// Consumes the opening of the top-level message.
    ///
    /// # Errors
    ///
    /// Returns a structural error if the input does not start with a message.
    fn read_message_start(&mut self) -> Result<()>;

    /// Consumes the end of the top-level message and checks nothing follows.
    ///
    /// # Errors
    ///
    /// Returns a structural error on trailing input or unclosed containers.
    fn read_message_end(&mut self) -> Result<()>;

    /// Reads the next field key of the current message.
    ///
    /// Returns `None` at the end of the current message: a closing bracket or
    /// tag in text formats, an end-group marker or end of input in binary.
    ///
    /// # Errors
    ///
    /// Returns a structural error on truncated or malformed input.
    fn read_field_key(&mut self) -> Result<Option<FieldKey>>;

    /// Reads the pending value as a scalar of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`](crate::CodecError::InvalidValue)
    /// if the value cannot be parsed as `kind`.
    fn read_scalar(
        &mut self,
        field: &FieldDescriptor,
        kind: ScalarKind,
    ) -> Result<Scalar<'static>>;

    /// Reads the pending value as an enum number.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`](crate::CodecError::InvalidValue)
    /// for names the enum does not declare.
    fn read_enum(&mut self, field: &FieldDescriptor, descriptor: &EnumDescriptor) -> Result<i32>;

    /// Reads the pending value as a nested message, merging into `message`.
    ///
    /// # Errors
    ///
    /// Propagates structural errors from the nested fields.
    fn read_message(&mut self, field: &FieldDescriptor, message: &mut dyn Message) -> Result<()>;

    /// Reads the pending value of a repeated field, calling `element` once per
    /// element with the reader positioned on it.
    ///
    /// Text formats hold the whole array in one value; the binary format
    /// yields one element per occurrence of the field.
    ///
    /// # Errors
    ///
    /// Propagates errors from `element` and structural errors.
    fn read_array(
        &mut self,
        field: &FieldDescriptor,
        element: &mut dyn FnMut(&mut dyn StructuredReader) -> Result<()>,
    ) -> Result<()>;

    /// Consumes the pending value of an unknown field and records it.
    ///
    /// # Errors
    ///
    /// Returns a structural error if the value itself is malformed.
    fn skip_field(&mut self, key: &FieldKey, unknown: &mut UnknownFieldSet) -> Result<()>;

    /// Consumes the pending value if the format marks it as absent, such as
    /// JSON `null` or an empty XML element. Returns `true` if it did.
    ///
    /// Only consulted for known fields; unknown ones are always recorded.
    fn skip_absent(&mut self) -> bool {
        false
    }

    /// Looks up an extension of `extendee`. Readers without a registry find none.
    fn find_extension(&self, extendee: &str, number: u32) -> Option<FieldDescriptor> {
        let _ = (extendee, number);
        None
    }
}

/// Reads fields into `message` until the reader reports the end of it.
///
/// Known fields go to [`Message::merge_field`]; anything the descriptor (or
/// the reader's extension registry) does not declare is recorded in the
/// message's unknown-field set.
///
/// # Errors
///
/// Propagates reader and merge errors.
pub fn merge_fields(reader: &mut dyn StructuredReader, message: &mut dyn Message) -> Result<()> {
    while let Some(key) = reader.read_field_key()? {
        let descriptor = message.descriptor();
        let field = match &key {
            FieldKey::Number(number) => descriptor
                .field_by_number(*number)
                .cloned()
                .or_else(|| reader.find_extension(descriptor.full_name(), *number)),
            FieldKey::Name(name) => descriptor.field_by_name(name).cloned(),
        };

        match field {
            Some(_) if reader.skip_absent() => {}
            Some(field) => message.merge_field(&field, reader)?,
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    message_type = message.descriptor().full_name(),
                    field = %key,
                    "recording unknown field"
                );
                reader.skip_field(&key, message.unknown_fields_mut())?;
            }
        }
    }
    Ok(())
}
