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

//! Binary reader.

use crate::codec::binary::wire::{WireType, split_tag};
use crate::codec::{FieldKey, StructuredReader, merge_fields};
use crate::error::{CodecError, Result};
use crate::schema::{
    EnumDescriptor, ExtensionRegistry, FieldDescriptor, Message, Scalar, ScalarKind,
    UnknownFieldSet, WireValue,
};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::sync::Arc;

/// A [`StructuredReader`] over the binary wire format.
///
/// The input is read into memory when the message starts. Field numbers the
/// message descriptor does not declare are looked up in the extension
/// registry, if one is set, before being kept as unknown fields.
pub struct BinaryReader<R: Read> {
    source: Option<R>,
    data: Vec<u8>,
    position: usize,
    groups: Vec<u32>,
    pending: Option<(u32, WireType)>,
    registry: Option<Arc<ExtensionRegistry>>,
}

impl<R: Read> BinaryReader<R> {
    /// Creates a reader over `source`.
    pub fn new(source: R) -> Self {
        Self {
            source: Some(source),
            data: Vec::new(),
            position: 0,
            groups: Vec::new(),
            pending: None,
            registry: None,
        }
    }

    /// Builder form of [`set_extension_registry`](Self::set_extension_registry).
    #[must_use]
    pub fn with_extension_registry(mut self, registry: Arc<ExtensionRegistry>) -> Self {
        self.set_extension_registry(registry);
        self
    }

    /// Sets the registry consulted for undeclared field numbers.
    pub fn set_extension_registry(&mut self, registry: Arc<ExtensionRegistry>) {
        self.registry = Some(registry);
    }

    fn decode<T: DeserializeOwned>(&mut self) -> Result<T> {
        let input = &self.data[self.position..];
        let (value, rest) = postcard::take_from_bytes::<T>(input)?;
        self.position += input.len() - rest.len();
        Ok(value)
    }

    fn take_bytes(&mut self, len: usize, context: &'static str) -> Result<&[u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(CodecError::UnexpectedEof { context })?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    fn length_delimited(&mut self) -> Result<&[u8]> {
        let len: u64 = self.decode()?;
        let len = usize::try_from(len)
            .map_err(|_| CodecError::structure(format!("length {len} does not fit in memory")))?;
        self.take_bytes(len, "length-delimited value")
    }

    fn fixed<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N]> {
        let mut raw = [0u8; N];
        raw.copy_from_slice(self.take_bytes(N, context)?);
        Ok(raw)
    }

    /// Takes the pending tag and checks its wire type.
    fn expect(&mut self, field: &FieldDescriptor, wire_type: WireType) -> Result<()> {
        let (_, found) = self
            .pending
            .take()
            .ok_or_else(|| CodecError::structure("no field value is pending"))?;
        if found != wire_type {
            return Err(CodecError::structure(format!(
                "field '{}' expects {wire_type}, found {found}",
                field.name()
            )));
        }
        Ok(())
    }

    fn read_wire_value(&mut self, number: u32, wire_type: WireType) -> Result<WireValue> {
        let value = match wire_type {
            WireType::Varint => WireValue::Varint(self.decode()?),
            WireType::Fixed64 => WireValue::Fixed64(u64::from_le_bytes(self.fixed("fixed64")?)),
            WireType::LengthDelimited => WireValue::LengthDelimited(self.length_delimited()?.to_vec()),
            WireType::Fixed32 => WireValue::Fixed32(u32::from_le_bytes(self.fixed("fixed32")?)),
            WireType::StartGroup => {
                let mut fields = UnknownFieldSet::new();
                loop {
                    if self.position == self.data.len() {
                        return Err(CodecError::UnexpectedEof { context: "group" });
                    }
                    let (inner, inner_type) = split_tag(self.decode()?)?;
                    if inner_type == WireType::EndGroup {
                        if inner != number {
                            return Err(mismatched_end(number, inner));
                        }
                        break;
                    }
                    let inner_value = self.read_wire_value(inner, inner_type)?;
                    fields.push_wire(inner, inner_value);
                }
                WireValue::Group(fields)
            }
            WireType::EndGroup => {
                return Err(CodecError::structure(format!(
                    "unexpected end-group for field {number}"
                )));
            }
        };
        Ok(value)
    }
}

fn mismatched_end(open: u32, closed: u32) -> CodecError {
    CodecError::structure(format!("group {open} closed by end-group {closed}"))
}

impl<R: Read> StructuredReader for BinaryReader<R> {
    fn read_message_start(&mut self) -> Result<()> {
        let mut source = self
            .source
            .take()
            .ok_or_else(|| CodecError::structure("the message has already been read"))?;
        source.read_to_end(&mut self.data)?;
        Ok(())
    }

    fn read_message_end(&mut self) -> Result<()> {
        if !self.groups.is_empty() {
            return Err(CodecError::structure("message end inside a group"));
        }
        if self.position != self.data.len() {
            return Err(CodecError::structure("trailing bytes after the message"));
        }
        Ok(())
    }

    fn read_field_key(&mut self) -> Result<Option<FieldKey>> {
        if self.position == self.data.len() {
            return match self.groups.last() {
                Some(_) => Err(CodecError::UnexpectedEof { context: "group" }),
                None => Ok(None),
            };
        }
        let (number, wire_type) = split_tag(self.decode()?)?;
        if wire_type == WireType::EndGroup {
            return match self.groups.pop() {
                Some(open) if open == number => Ok(None),
                Some(open) => Err(mismatched_end(open, number)),
                None => Err(CodecError::structure(format!(
                    "end-group {number} outside a group"
                ))),
            };
        }
        self.pending = Some((number, wire_type));
        Ok(Some(FieldKey::Number(number)))
    }

    fn read_scalar(
        &mut self,
        field: &FieldDescriptor,
        kind: ScalarKind,
    ) -> Result<Scalar<'static>> {
        self.expect(field, WireType::of_scalar(kind))?;
        let out_of_range = |value: &dyn std::fmt::Display| {
            CodecError::invalid_value(field.name(), format!("{value} is out of range for {kind}"))
        };
        let value = match kind {
            ScalarKind::Bool => match self.decode::<u64>()? {
                0 => Scalar::Bool(false),
                1 => Scalar::Bool(true),
                other => return Err(out_of_range(&other)),
            },
            ScalarKind::Int32 => {
                let raw: i64 = self.decode()?;
                Scalar::Int32(i32::try_from(raw).map_err(|_| out_of_range(&raw))?)
            }
            ScalarKind::Int64 => Scalar::Int64(self.decode()?),
            ScalarKind::UInt32 => {
                let raw: u64 = self.decode()?;
                Scalar::UInt32(u32::try_from(raw).map_err(|_| out_of_range(&raw))?)
            }
            ScalarKind::UInt64 => Scalar::UInt64(self.decode()?),
            ScalarKind::Float => Scalar::Float(self.decode()?),
            ScalarKind::Double => Scalar::Double(self.decode()?),
            ScalarKind::String => {
                let bytes = self.length_delimited()?.to_vec();
                Scalar::from(String::from_utf8(bytes).map_err(|_| {
                    CodecError::invalid_value(field.name(), "string is not valid UTF-8")
                })?)
            }
            ScalarKind::Bytes => Scalar::from(self.length_delimited()?.to_vec()),
        };
        Ok(value)
    }

    fn read_enum(&mut self, field: &FieldDescriptor, _descriptor: &EnumDescriptor) -> Result<i32> {
        self.expect(field, WireType::Varint)?;
        let raw: i64 = self.decode()?;
        i32::try_from(raw).map_err(|_| {
            CodecError::invalid_value(field.name(), format!("{raw} is not an enum number"))
        })
    }

    fn read_message(&mut self, field: &FieldDescriptor, message: &mut dyn Message) -> Result<()> {
        self.expect(field, WireType::StartGroup)?;
        self.groups.push(field.number());
        merge_fields(self, message)
    }

    fn read_array(
        &mut self,
        _field: &FieldDescriptor,
        element: &mut dyn FnMut(&mut dyn StructuredReader) -> Result<()>,
    ) -> Result<()> {
        element(self)
    }

    fn skip_field(&mut self, key: &FieldKey, unknown: &mut UnknownFieldSet) -> Result<()> {
        let (number, wire_type) = self
            .pending
            .take()
            .ok_or_else(|| CodecError::structure("no field value is pending"))?;
        if *key != FieldKey::Number(number) {
            return Err(CodecError::structure(format!(
                "field {key} is not the pending field {number}"
            )));
        }
        let value = self.read_wire_value(number, wire_type)?;
        unknown.push_wire(number, value);
        Ok(())
    }

    fn find_extension(&self, extendee: &str, number: u32) -> Option<FieldDescriptor> {
        self.registry
            .as_ref()
            .and_then(|registry| registry.find(extendee, number))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DynamicMessage, FieldValue, MessageDescriptor};

    fn descriptor() -> Arc<MessageDescriptor> {
        let inner = Arc::new(
            MessageDescriptor::new(
                "test.Inner",
                vec![FieldDescriptor::scalar("v", 1, ScalarKind::Int32)],
            )
            .unwrap(),
        );
        Arc::new(
            MessageDescriptor::new(
                "test.Outer",
                vec![
                    FieldDescriptor::scalar("id", 1, ScalarKind::UInt32),
                    FieldDescriptor::message("inner", 2, inner),
                    FieldDescriptor::repeated("names", 3, ScalarKind::String),
                ],
            )
            .unwrap(),
        )
    }

    fn read(bytes: &[u8]) -> Result<DynamicMessage> {
        let mut message = DynamicMessage::new(descriptor());
        let mut reader = BinaryReader::new(bytes);
        reader.read_message_start()?;
        merge_fields(&mut reader, &mut message)?;
        reader.read_message_end()?;
        Ok(message)
    }

    #[test]
    fn test_reads_fields_and_groups() {
        let message = read(&[
            0x08, 0x96, 0x01, // id = 150
            0x13, 0x08, 0x03, 0x14, // inner { v = -2 }
            0x1a, 0x01, b'a', 0x1a, 0x01, b'b', // names
        ])
        .unwrap();
        assert_eq!(message.get("id"), Some(&FieldValue::from(150u32)));
        let inner = message.get("inner").and_then(FieldValue::as_message).unwrap();
        assert_eq!(inner.get("v"), Some(&FieldValue::from(-2)));
        assert_eq!(
            message.get_repeated("names"),
            [FieldValue::from("a"), FieldValue::from("b")]
        );
    }

    #[test]
    fn test_unknown_fields_kept() {
        let message = read(&[0x08, 0x01, 0x2d, 0x01, 0x02, 0x03, 0x04, 0x33, 0x08, 0x05, 0x34])
            .unwrap();
        let unknown: Vec<_> = message.unknown_fields().wire_fields().collect();
        assert_eq!(unknown[0], (5, &WireValue::Fixed32(0x0403_0201)));
        let mut group = UnknownFieldSet::new();
        group.push_wire(1, WireValue::Varint(5));
        assert_eq!(unknown[1], (6, &WireValue::Group(group)));
    }

    #[test]
    fn test_structural_failures() {
        // truncated varint
        assert!(matches!(
            read(&[0x08, 0x96]).unwrap_err(),
            CodecError::UnexpectedEof { .. }
        ));
        // unterminated group
        assert!(read(&[0x13, 0x08, 0x01]).unwrap_err().is_structural_error());
        // mismatched end-group
        assert!(read(&[0x13, 0x1c]).is_err());
        // wire type mismatch on a known field
        assert!(read(&[0x0d, 0, 0, 0, 0]).is_err());
        // truncated length-delimited value
        assert!(read(&[0x1a, 0x05, b'a']).is_err());
        // stray end-group
        assert!(read(&[0x0c]).is_err());
    }

    #[test]
    fn test_extension_resolved_through_registry() {
        let mut registry = ExtensionRegistry::new();
        registry
            .register(
                "test.Outer",
                FieldDescriptor::scalar("ext_flag", 100, ScalarKind::Bool),
            )
            .unwrap();
        let mut message = DynamicMessage::new(descriptor());
        let mut reader =
            BinaryReader::new(&[0xa0, 0x06, 0x01][..]).with_extension_registry(Arc::new(registry));
        reader.read_message_start().unwrap();
        merge_fields(&mut reader, &mut message).unwrap();
        assert_eq!(message.extension(100), [FieldValue::from(true)]);
        assert!(message.unknown_fields().is_empty());
    }
}
