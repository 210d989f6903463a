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

//! A descriptor-driven message for callers without generated code.

use crate::codec::{FieldId, StructuredReader, StructuredWriter};
use crate::error::{CodecError, Result};
use crate::schema::{
    Cardinality, FieldDescriptor, FieldKind, Message, MessageDescriptor, Scalar, UnknownFieldSet,
    ValueRef,
};
use std::sync::Arc;

/// An owned field value held by a [`DynamicMessage`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A scalar.
    Scalar(Scalar<'static>),
    /// An enum, stored by number.
    Enum(i32),
    /// A nested message.
    Message(DynamicMessage),
}

impl FieldValue {
    /// Returns `true` if this value may be stored in a field of `kind`.
    #[must_use]
    pub fn matches(&self, kind: &FieldKind) -> bool {
        match (self, kind) {
            (Self::Scalar(scalar), FieldKind::Scalar(expected)) => scalar.kind() == *expected,
            (Self::Enum(_), FieldKind::Enum(_)) => true,
            (Self::Message(message), FieldKind::Message(expected)) => {
                message.descriptor.full_name() == expected.full_name()
            }
            _ => false,
        }
    }

    /// Returns the scalar, if this is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar<'static>> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Returns the enum number, if this is an enum.
    #[must_use]
    pub fn as_enum(&self) -> Option<i32> {
        match self {
            Self::Enum(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the nested message, if this is one.
    #[must_use]
    pub fn as_message(&self) -> Option<&DynamicMessage> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }

    fn as_value_ref<'a>(&'a self, field: &'a FieldDescriptor) -> ValueRef<'a> {
        match self {
            Self::Scalar(scalar) => ValueRef::Scalar(scalar),
            Self::Enum(number) => {
                let name = match field.kind() {
                    FieldKind::Enum(descriptor) => descriptor.name_of(*number).unwrap_or(""),
                    _ => "",
                };
                ValueRef::Enum {
                    number: *number,
                    name,
                }
            }
            Self::Message(message) => ValueRef::Message(message),
        }
    }
}

macro_rules! field_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

field_value_from!(bool, i32, i64, u32, u64, f32, f64, String, Vec<u8>);

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::from(value.to_string()))
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        Self::Scalar(Scalar::from(value.to_vec()))
    }
}

impl From<Scalar<'static>> for FieldValue {
    fn from(value: Scalar<'static>) -> Self {
        Self::Scalar(value)
    }
}

impl From<DynamicMessage> for FieldValue {
    fn from(value: DynamicMessage) -> Self {
        Self::Message(value)
    }
}

/// A message whose layout is taken from a [`MessageDescriptor`] at runtime.
///
/// Values are type-checked against the descriptor when set. The field-walk
/// writes declared fields in declaration order, then extension fields in the
/// order they were first read, then the unknown-field set.
///
/// # Examples
///
/// ```rust
/// use fieldcodec::schema::{DynamicMessage, FieldDescriptor, MessageDescriptor, ScalarKind};
/// use std::sync::Arc;
///
/// let descriptor = Arc::new(MessageDescriptor::new(
///     "example.Point",
///     vec![
///         FieldDescriptor::scalar("x", 1, ScalarKind::Int32),
///         FieldDescriptor::repeated("tags", 2, ScalarKind::String),
///     ],
/// )?);
///
/// let mut point = DynamicMessage::new(descriptor);
/// point.set("x", 3)?;
/// point.push("tags", "a")?;
/// point.push("tags", "b")?;
/// assert_eq!(point.get_repeated("tags").len(), 2);
/// # Ok::<(), fieldcodec::CodecError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicMessage {
    descriptor: Arc<MessageDescriptor>,
    values: Vec<Vec<FieldValue>>,
    extensions: Vec<(FieldDescriptor, Vec<FieldValue>)>,
    unknown: UnknownFieldSet,
}

impl DynamicMessage {
    /// Creates an empty message of the given type.
    #[must_use]
    pub fn new(descriptor: Arc<MessageDescriptor>) -> Self {
        let values = vec![Vec::new(); descriptor.fields().len()];
        Self {
            descriptor,
            values,
            extensions: Vec::new(),
            unknown: UnknownFieldSet::new(),
        }
    }

    /// The shared descriptor.
    #[must_use]
    pub fn descriptor_arc(&self) -> &Arc<MessageDescriptor> {
        &self.descriptor
    }

    /// Sets a singular field, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] if the field does not exist, is
    /// repeated, or the value does not match its declared type.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<&mut Self> {
        let value = value.into();
        let index = self.checked_index(name, &value)?;
        if self.descriptor.fields()[index].is_repeated() {
            return Err(CodecError::invalid_value(
                name,
                "repeated field, use push to append values",
            ));
        }
        self.values[index] = vec![value];
        Ok(self)
    }

    /// Appends a value to a repeated field.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] if the field does not exist, is not
    /// repeated, or the value does not match its declared type.
    pub fn push(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<&mut Self> {
        let value = value.into();
        let index = self.checked_index(name, &value)?;
        if !self.descriptor.fields()[index].is_repeated() {
            return Err(CodecError::invalid_value(
                name,
                "singular field, use set to assign a value",
            ));
        }
        self.values[index].push(value);
        Ok(self)
    }

    /// Returns the value of a singular field, or the first value of a repeated one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.get_repeated(name).first()
    }

    /// Returns all values of a field; empty if unset or undeclared.
    #[must_use]
    pub fn get_repeated(&self, name: &str) -> &[FieldValue] {
        self.descriptor
            .field_by_name(name)
            .and_then(|field| self.descriptor.index_of(field.number()))
            .map(|index| self.values[index].as_slice())
            .unwrap_or(&[])
    }

    /// Returns `true` if the field holds at least one value.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        !self.get_repeated(name).is_empty()
    }

    /// Removes all values of a field.
    pub fn clear(&mut self, name: &str) {
        if let Some(index) = self
            .descriptor
            .field_by_name(name)
            .and_then(|field| self.descriptor.index_of(field.number()))
        {
            self.values[index].clear();
        }
    }

    /// Returns the values of an extension field read by number.
    #[must_use]
    pub fn extension(&self, number: u32) -> &[FieldValue] {
        self.extensions
            .iter()
            .find(|(field, _)| field.number() == number)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Names of required fields that hold no value.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&str> {
        self.descriptor
            .fields()
            .iter()
            .zip(&self.values)
            .filter(|(field, values)| {
                field.cardinality() == Cardinality::Required && values.is_empty()
            })
            .map(|(field, _)| field.name())
            .collect()
    }

    fn checked_index(&self, name: &str, value: &FieldValue) -> Result<usize> {
        let field = self
            .descriptor
            .field_by_name(name)
            .ok_or_else(|| CodecError::invalid_value(name, "no such field"))?;
        if !value.matches(field.kind()) {
            return Err(CodecError::invalid_value(
                name,
                format!("expected a value of type {}", field.kind().type_name()),
            ));
        }
        self.descriptor
            .index_of(field.number())
            .ok_or_else(|| CodecError::invalid_value(name, "no such field"))
    }

    fn slot_mut(&mut self, field: &FieldDescriptor) -> &mut Vec<FieldValue> {
        if let Some(index) = self.descriptor.index_of(field.number()) {
            return &mut self.values[index];
        }
        let position = match self
            .extensions
            .iter()
            .position(|(known, _)| known.number() == field.number())
        {
            Some(position) => position,
            None => {
                self.extensions.push((field.clone(), Vec::new()));
                self.extensions.len() - 1
            }
        };
        &mut self.extensions[position].1
    }
}

fn write_field(
    writer: &mut dyn StructuredWriter,
    field: &FieldDescriptor,
    values: &[FieldValue],
) -> Result<()> {
    let id = FieldId::from(field);
    if field.is_repeated() {
        let mut elements = values.iter().map(|value| value.as_value_ref(field));
        writer.write_array(id, &mut elements)
    } else if let Some(value) = values.first() {
        writer.write_value(id, value.as_value_ref(field))
    } else {
        Ok(())
    }
}

fn read_value(field: &FieldDescriptor, reader: &mut dyn StructuredReader) -> Result<FieldValue> {
    match field.kind() {
        FieldKind::Scalar(kind) => reader.read_scalar(field, *kind).map(FieldValue::Scalar),
        FieldKind::Enum(descriptor) => reader.read_enum(field, descriptor).map(FieldValue::Enum),
        FieldKind::Message(descriptor) => {
            let mut message = DynamicMessage::new(Arc::clone(descriptor));
            reader.read_message(field, &mut message)?;
            Ok(FieldValue::Message(message))
        }
    }
}

impl Message for DynamicMessage {
    fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    fn write_fields(&self, writer: &mut dyn StructuredWriter) -> Result<()> {
        for (field, values) in self.descriptor.fields().iter().zip(&self.values) {
            write_field(writer, field, values)?;
        }
        for (field, values) in &self.extensions {
            write_field(writer, field, values)?;
        }
        Ok(())
    }

    fn merge_field(
        &mut self,
        field: &FieldDescriptor,
        reader: &mut dyn StructuredReader,
    ) -> Result<()> {
        if field.is_repeated() {
            let mut read = Vec::new();
            reader.read_array(field, &mut |element: &mut dyn StructuredReader| {
                read.push(read_value(field, element)?);
                Ok(())
            })?;
            self.slot_mut(field).extend(read);
            return Ok(());
        }

        let slot = self.slot_mut(field);
        if let (FieldKind::Message(_), Some(FieldValue::Message(existing))) =
            (field.kind(), slot.first_mut())
        {
            return reader.read_message(field, existing);
        }
        let value = read_value(field, reader)?;
        *slot = vec![value];
        Ok(())
    }

    fn unknown_fields(&self) -> &UnknownFieldSet {
        &self.unknown
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFieldSet {
        &mut self.unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EnumDescriptor, ScalarKind};

    fn descriptor() -> Arc<MessageDescriptor> {
        let color = Arc::new(EnumDescriptor::new("test.Color", [(0, "RED"), (1, "GREEN")]));
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
                    FieldDescriptor::scalar("id", 1, ScalarKind::UInt64)
                        .with_cardinality(Cardinality::Required),
                    FieldDescriptor::repeated("tags", 2, ScalarKind::String),
                    FieldDescriptor::enumeration("color", 3, color),
                    FieldDescriptor::message("inner", 4, inner),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_set_and_get() {
        let mut message = DynamicMessage::new(descriptor());
        message.set("id", 7u64).unwrap();
        message.set("color", FieldValue::Enum(1)).unwrap();
        assert_eq!(
            message.get("id").and_then(FieldValue::as_scalar),
            Some(&Scalar::UInt64(7))
        );
        assert_eq!(message.get("color").and_then(FieldValue::as_enum), Some(1));
        assert!(message.has("id"));
        assert!(!message.has("inner"));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let mut message = DynamicMessage::new(descriptor());
        let result = message.set("id", "seven");
        assert!(matches!(result, Err(CodecError::InvalidValue { .. })));
    }

    #[test]
    fn test_cardinality_enforced() {
        let mut message = DynamicMessage::new(descriptor());
        assert!(message.set("tags", "a").is_err());
        assert!(message.push("id", 1u64).is_err());
        message.push("tags", "a").unwrap().push("tags", "b").unwrap();
        assert_eq!(message.get_repeated("tags").len(), 2);
    }

    #[test]
    fn test_unknown_name() {
        let mut message = DynamicMessage::new(descriptor());
        assert!(message.set("nope", 1).is_err());
        assert!(message.get_repeated("nope").is_empty());
    }

    #[test]
    fn test_missing_required() {
        let mut message = DynamicMessage::new(descriptor());
        assert_eq!(message.missing_required(), ["id"]);
        message.set("id", 1u64).unwrap();
        assert!(message.missing_required().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut message = DynamicMessage::new(descriptor());
        message.push("tags", "a").unwrap();
        message.clear("tags");
        assert!(!message.has("tags"));
    }

    #[test]
    fn test_nested_message_type_checked() {
        let outer = descriptor();
        let mut message = DynamicMessage::new(Arc::clone(&outer));
        let wrong = DynamicMessage::new(Arc::clone(&outer));
        assert!(message.set("inner", wrong).is_err());

        let FieldKind::Message(inner) = outer.field_by_name("inner").unwrap().kind() else {
            panic!("inner is a message field");
        };
        let mut nested = DynamicMessage::new(Arc::clone(inner));
        nested.set("v", 5).unwrap();
        message.set("inner", nested).unwrap();
        assert!(message.get("inner").and_then(FieldValue::as_message).is_some());
    }
}
