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

//! Binary writer.

use crate::codec::binary::wire::{WireType, make_tag};
use crate::codec::{FieldId, NestingTracker, StructuredWriter, write_elements};
use crate::error::{CodecError, Result};
use crate::schema::{Message, Scalar, UnknownField, UnknownFieldSet, ValueRef, WireValue};
use serde::Serialize;
use std::io::{BufWriter, Write};

/// A [`StructuredWriter`] producing the binary wire format.
///
/// Every value is a varint tag, `(field_number << 3) | wire_type`, followed
/// by the value. Integers are varints (signed ones zigzag-encoded), floats
/// are little-endian fixed-width, strings and bytes are length-prefixed.
/// Nested messages are groups closed by an end-group tag, repeated fields
/// repeat the tag once per value, and enums are written as numbers. Every
/// float value, NaN included, is representable.
///
/// # Examples
///
/// ```rust
/// use fieldcodec::codec::binary::BinaryWriter;
/// use fieldcodec::codec::{FieldId, StructuredWriter};
///
/// let mut writer = BinaryWriter::new(Vec::new());
/// writer.write_message_start()?;
/// writer.write_uint32(FieldId::new(1, "d"), 150)?;
/// writer.write_message_end()?;
/// assert_eq!(writer.into_inner()?, [0x08, 0x96, 0x01]);
/// # Ok::<(), fieldcodec::CodecError>(())
/// ```
pub struct BinaryWriter<W: Write> {
    sink: BufWriter<W>,
    nesting: NestingTracker,
}

impl<W: Write> BinaryWriter<W> {
    /// Creates a writer over `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink: BufWriter::new(sink),
            nesting: NestingTracker::new(),
        }
    }

    /// Flushes and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn into_inner(self) -> Result<W> {
        self.sink
            .into_inner()
            .map_err(|e| CodecError::from(e.into_error()))
    }

    fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        postcard::to_io(value, &mut self.sink)?;
        Ok(())
    }

    fn tag(&mut self, number: u32, wire_type: WireType) -> Result<()> {
        self.encode(&make_tag(number, wire_type))
    }

    fn length_delimited(&mut self, bytes: &[u8]) -> Result<()> {
        self.encode(&(bytes.len() as u64))?;
        self.sink.write_all(bytes)?;
        Ok(())
    }

    fn write_wire_value(&mut self, number: u32, value: &WireValue) -> Result<()> {
        match value {
            WireValue::Varint(raw) => {
                self.tag(number, WireType::Varint)?;
                self.encode(raw)
            }
            WireValue::Fixed64(raw) => {
                self.tag(number, WireType::Fixed64)?;
                self.sink.write_all(&raw.to_le_bytes())?;
                Ok(())
            }
            WireValue::LengthDelimited(bytes) => {
                self.tag(number, WireType::LengthDelimited)?;
                self.length_delimited(bytes)
            }
            WireValue::Group(fields) => {
                self.tag(number, WireType::StartGroup)?;
                for (inner, inner_value) in fields.wire_fields() {
                    self.write_wire_value(inner, inner_value)?;
                }
                self.tag(number, WireType::EndGroup)
            }
            WireValue::Fixed32(raw) => {
                self.tag(number, WireType::Fixed32)?;
                self.sink.write_all(&raw.to_le_bytes())?;
                Ok(())
            }
        }
    }
}

impl<W: Write> StructuredWriter for BinaryWriter<W> {
    fn write_message_start(&mut self) -> Result<()> {
        if self.nesting.depth() != 0 {
            return Err(CodecError::structure("a message is already open"));
        }
        self.nesting.push();
        Ok(())
    }

    fn write_message_end(&mut self) -> Result<()> {
        if self.nesting.depth() != 1 {
            return Err(CodecError::structure("no message is open"));
        }
        self.nesting.pop()?;
        self.flush()
    }

    fn write_scalar(&mut self, field: FieldId<'_>, value: &Scalar<'_>) -> Result<()> {
        self.tag(field.number, WireType::of_scalar(value.kind()))?;
        match value {
            Scalar::Bool(flag) => self.encode(&u64::from(*flag)),
            Scalar::Int32(v) => self.encode(&i64::from(*v)),
            Scalar::Int64(v) => self.encode(v),
            Scalar::UInt32(v) => self.encode(&u64::from(*v)),
            Scalar::UInt64(v) => self.encode(v),
            Scalar::Float(v) => self.encode(v),
            Scalar::Double(v) => self.encode(v),
            Scalar::String(v) => self.length_delimited(v.as_bytes()),
            Scalar::Bytes(v) => self.length_delimited(v),
        }
    }

    fn write_enum(&mut self, field: FieldId<'_>, number: i32, _name: &str) -> Result<()> {
        self.tag(field.number, WireType::Varint)?;
        self.encode(&i64::from(number))
    }

    fn write_message(&mut self, field: FieldId<'_>, message: &dyn Message) -> Result<()> {
        self.tag(field.number, WireType::StartGroup)?;
        self.nesting.push();
        message.write_to(self)?;
        self.nesting.pop()?;
        self.tag(field.number, WireType::EndGroup)
    }

    fn write_array<'v>(
        &mut self,
        field: FieldId<'_>,
        elements: &mut dyn Iterator<Item = ValueRef<'v>>,
    ) -> Result<()> {
        match elements.next() {
            Some(first) => write_elements(self, field, first, elements),
            None => Ok(()),
        }
    }

    fn write_unknown_fields(&mut self, unknown: &UnknownFieldSet) -> Result<()> {
        let mut skipped = 0usize;
        for field in unknown {
            match field {
                UnknownField::Wire { number, value } => self.write_wire_value(*number, value)?,
                UnknownField::Text { .. } => skipped += 1,
            }
        }
        if skipped > 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!(skipped, "binary writer skipped text unknown fields");
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded<F>(body: F) -> Vec<u8>
    where
        F: FnOnce(&mut BinaryWriter<Vec<u8>>) -> Result<()>,
    {
        let mut writer = BinaryWriter::new(Vec::new());
        writer.write_message_start().unwrap();
        body(&mut writer).unwrap();
        writer.write_message_end().unwrap();
        writer.into_inner().unwrap()
    }

    #[test]
    fn test_scalar_encodings() {
        let out = encoded(|w| {
            w.write_bool(FieldId::new(1, ""), true)?;
            w.write_int32(FieldId::new(2, ""), -1)?;
            w.write_string(FieldId::new(3, ""), "hi")?;
            w.write_float(FieldId::new(4, ""), 1.0)
        });
        assert_eq!(
            out,
            [
                0x08, 0x01, // bool
                0x10, 0x01, // zigzag(-1)
                0x1a, 0x02, b'h', b'i', // string
                0x25, 0x00, 0x00, 0x80, 0x3f, // float
            ]
        );
    }

    #[test]
    fn test_nan_is_accepted() {
        let out = encoded(|w| w.write_double(FieldId::new(1, "x"), f64::NAN));
        assert_eq!(out[0], 0x09);
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn test_enum_written_as_number() {
        let out = encoded(|w| w.write_enum(FieldId::new(1, "color"), 2, "BLUE"));
        assert_eq!(out, [0x08, 0x04]);
    }

    #[test]
    fn test_repeated_values_repeat_the_tag() {
        let values = [Scalar::UInt32(1), Scalar::UInt32(2)];
        let out = encoded(|w| {
            w.write_array(FieldId::new(1, "ids"), &mut values.iter().map(|v| ValueRef::Scalar(v)))?;
            w.write_array(FieldId::new(2, "none"), &mut std::iter::empty::<ValueRef<'_>>())
        });
        assert_eq!(out, [0x08, 0x01, 0x08, 0x02]);
    }

    #[test]
    fn test_unknown_group_reemitted() {
        let mut inner = UnknownFieldSet::new();
        inner.push_wire(1, WireValue::Fixed32(7));
        let mut unknown = UnknownFieldSet::new();
        unknown.push_wire(9, WireValue::Group(inner));
        unknown.push_text("ignored", crate::schema::TextValue::Null);
        let out = encoded(|w| w.write_unknown_fields(&unknown));
        assert_eq!(out, [0x4b, 0x0d, 0x07, 0x00, 0x00, 0x00, 0x4c]);
    }
}
