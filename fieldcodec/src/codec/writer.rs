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

//! The format-agnostic writer contract.

use crate::error::Result;
use crate::schema::{FieldDescriptor, Message, Scalar, UnknownFieldSet, ValueRef};
use std::borrow::Cow;

/// Identifies the field being written.
///
/// Text formats use `name`; the binary format uses `number`. Array elements
/// are written with an empty name and the array field's number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldId<'a> {
    /// Binary field number.
    pub number: u32,
    /// Text field name; empty for array elements.
    pub name: &'a str,
}

impl<'a> FieldId<'a> {
    /// Creates a field id.
    #[must_use]
    pub const fn new(number: u32, name: &'a str) -> Self {
        Self { number, name }
    }

    /// The id used for each element of an array: same number, no name.
    #[must_use]
    pub const fn element(self) -> FieldId<'static> {
        FieldId {
            number: self.number,
            name: "",
        }
    }
}

impl<'a> From<&'a FieldDescriptor> for FieldId<'a> {
    fn from(field: &'a FieldDescriptor) -> Self {
        Self::new(field.number(), field.name())
    }
}

/// A streaming writer driven by a message's field-walk.
///
/// Calls arrive in descriptor order. Every concrete codec implements the
/// required methods; the typed helpers (`write_bool`, `write_string`, ...)
/// all funnel into [`write_scalar`](Self::write_scalar), whose variant decides
/// how the value is rendered.
///
/// Instances are bound to one sink for their whole life and are not meant to
/// be shared between threads.
pub trait StructuredWriter {
    /// Opens the top-level message. Exactly one per top-level write.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_message_start(&mut self) -> Result<()>;

    /// Closes the top-level message and flushes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidStructure`](crate::CodecError::InvalidStructure)
    /// if no container is open, or an error if the sink fails.
    fn write_message_end(&mut self) -> Result<()>;

    /// Writes one scalar field (or array element when `field.name` is empty).
    ///
    /// # Errors
    ///
    /// Text formats return [`CodecError::UnsupportedValue`](crate::CodecError::UnsupportedValue)
    /// for NaN and infinite floats.
    fn write_scalar(&mut self, field: FieldId<'_>, value: &Scalar<'_>) -> Result<()>;

    /// Writes an enum: its name in text formats, its number in binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_enum(&mut self, field: FieldId<'_>, number: i32, name: &str) -> Result<()>;

    /// Writes a nested message by recursing into its field-walk.
    ///
    /// # Errors
    ///
    /// Propagates errors from the nested field-walk or the sink.
    fn write_message(&mut self, field: FieldId<'_>, message: &dyn Message) -> Result<()>;

    /// Writes a repeated field.
    ///
    /// An empty sequence produces no output at all, not even the field name.
    ///
    /// # Errors
    ///
    /// Propagates errors from the element writes or the sink.
    fn write_array<'v>(
        &mut self,
        field: FieldId<'_>,
        elements: &mut dyn Iterator<Item = ValueRef<'v>>,
    ) -> Result<()>;

    /// Re-emits the unknown fields this format can represent.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_unknown_fields(&mut self, unknown: &UnknownFieldSet) -> Result<()>;

    /// Forces buffered output to the sink. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn flush(&mut self) -> Result<()>;

    /// Writes any value by dispatching on its variant.
    ///
    /// # Errors
    ///
    /// See the per-variant methods.
    fn write_value(&mut self, field: FieldId<'_>, value: ValueRef<'_>) -> Result<()> {
        match value {
            ValueRef::Scalar(scalar) => self.write_scalar(field, scalar),
            ValueRef::Enum { number, name } => self.write_enum(field, number, name),
            ValueRef::Message(message) => self.write_message(field, message),
        }
    }

    /// Writes a boolean field.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_bool(&mut self, field: FieldId<'_>, value: bool) -> Result<()> {
        self.write_scalar(field, &Scalar::Bool(value))
    }

    /// Writes a signed 32-bit field.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_int32(&mut self, field: FieldId<'_>, value: i32) -> Result<()> {
        self.write_scalar(field, &Scalar::Int32(value))
    }

    /// Writes a signed 64-bit field.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_int64(&mut self, field: FieldId<'_>, value: i64) -> Result<()> {
        self.write_scalar(field, &Scalar::Int64(value))
    }

    /// Writes an unsigned 32-bit field.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_uint32(&mut self, field: FieldId<'_>, value: u32) -> Result<()> {
        self.write_scalar(field, &Scalar::UInt32(value))
    }

    /// Writes an unsigned 64-bit field.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_uint64(&mut self, field: FieldId<'_>, value: u64) -> Result<()> {
        self.write_scalar(field, &Scalar::UInt64(value))
    }

    /// Writes a single-precision field.
    ///
    /// # Errors
    ///
    /// Text formats reject NaN and infinities.
    fn write_float(&mut self, field: FieldId<'_>, value: f32) -> Result<()> {
        self.write_scalar(field, &Scalar::Float(value))
    }

    /// Writes a double-precision field.
    ///
    /// # Errors
    ///
    /// Text formats reject NaN and infinities.
    fn write_double(&mut self, field: FieldId<'_>, value: f64) -> Result<()> {
        self.write_scalar(field, &Scalar::Double(value))
    }

    /// Writes a string field.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_string(&mut self, field: FieldId<'_>, value: &str) -> Result<()> {
        self.write_scalar(field, &Scalar::String(Cow::Borrowed(value)))
    }

    /// Writes a bytes field.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    fn write_bytes(&mut self, field: FieldId<'_>, value: &[u8]) -> Result<()> {
        self.write_scalar(field, &Scalar::Bytes(Cow::Borrowed(value)))
    }
}

/// Writes the elements of a non-empty array, each with the element id.
///
/// Codecs call this between opening and closing their array container, after
/// pulling `first` to decide whether the array is empty.
///
/// # Errors
///
/// Propagates the first element write error.
pub fn write_elements<'v, W>(
    writer: &mut W,
    field: FieldId<'_>,
    first: ValueRef<'v>,
    rest: &mut dyn Iterator<Item = ValueRef<'v>>,
) -> Result<()>
where
    W: StructuredWriter + ?Sized,
{
    let element = field.element();
    writer.write_value(element, first)?;
    for value in rest {
        writer.write_value(element, value)?;
    }
    Ok(())
}
