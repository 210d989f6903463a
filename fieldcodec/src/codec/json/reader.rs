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

//! JSON reader.

use crate::codec::{FieldKey, StructuredReader, merge_fields, text};
use crate::error::{CodecError, Result};
use crate::schema::{
    EnumDescriptor, FieldDescriptor, Message, Scalar, ScalarKind, TextValue, UnknownFieldSet,
};
use serde_json::{Map, Value};
use std::io::Read;

/// A [`StructuredReader`] over JSON text.
///
/// The document is parsed with `serde_json` when the message starts; fields
/// are then handed out in document order. `null` values of known fields are
/// treated as absent; unknown ones are recorded as null. Numeric fields accept numbers or numeric strings, enums accept a
/// name or a number, bytes are base64 strings.
pub struct JsonReader<R: Read> {
    source: Option<R>,
    objects: Vec<serde_json::map::IntoIter>,
    pending: Option<Value>,
}

impl<R: Read> JsonReader<R> {
    /// Creates a reader over `source`. Nothing is read until
    /// [`read_message_start`](StructuredReader::read_message_start).
    pub fn new(source: R) -> Self {
        Self {
            source: Some(source),
            objects: Vec::new(),
            pending: None,
        }
    }

    fn take_pending(&mut self) -> Result<Value> {
        self.pending
            .take()
            .ok_or_else(|| CodecError::structure("no field value is pending"))
    }

    fn enter_object(&mut self, field: &str, value: Value) -> Result<()> {
        match value {
            Value::Object(members) => {
                self.objects.push(members.into_iter());
                Ok(())
            }
            other => Err(CodecError::invalid_value(
                field,
                format!("expected an object, found {}", describe(&other)),
            )),
        }
    }
}

impl<R: Read> StructuredReader for JsonReader<R> {
    fn read_message_start(&mut self) -> Result<()> {
        let source = self
            .source
            .take()
            .ok_or_else(|| CodecError::structure("the message has already been read"))?;
        let document: Value = serde_json::from_reader(source)?;
        match document {
            Value::Object(members) => {
                self.objects.push(members.into_iter());
                Ok(())
            }
            other => Err(CodecError::structure(format!(
                "expected a JSON object, found {}",
                describe(&other)
            ))),
        }
    }

    fn read_message_end(&mut self) -> Result<()> {
        if self.objects.len() != 1 {
            return Err(CodecError::structure("message end without a matching start"));
        }
        self.objects.clear();
        Ok(())
    }

    fn read_field_key(&mut self) -> Result<Option<FieldKey>> {
        let members = self
            .objects
            .last_mut()
            .ok_or_else(|| CodecError::structure("no object is open"))?;
        match members.next() {
            Some((name, value)) => {
                self.pending = Some(value);
                Ok(Some(FieldKey::Name(name)))
            }
            None => Ok(None),
        }
    }

    fn read_scalar(
        &mut self,
        field: &FieldDescriptor,
        kind: ScalarKind,
    ) -> Result<Scalar<'static>> {
        let value = self.take_pending()?;
        let numeric = !matches!(kind, ScalarKind::Bool | ScalarKind::String | ScalarKind::Bytes);
        let text = match value {
            Value::Bool(flag) if kind == ScalarKind::Bool => return Ok(Scalar::Bool(flag)),
            Value::Number(number) if numeric => number.to_string(),
            Value::String(string) if kind != ScalarKind::Bool => string,
            other => {
                return Err(CodecError::invalid_value(
                    field.name(),
                    format!("expected {kind}, found {}", describe(&other)),
                ));
            }
        };
        text::parse_scalar(field.name(), kind, &text)
    }

    fn read_enum(&mut self, field: &FieldDescriptor, descriptor: &EnumDescriptor) -> Result<i32> {
        match self.take_pending()? {
            Value::String(name) => text::parse_enum(field.name(), descriptor, &name),
            Value::Number(number) => number
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| {
                    CodecError::invalid_value(field.name(), format!("{number} is not an enum number"))
                }),
            other => Err(CodecError::invalid_value(
                field.name(),
                format!("expected an enum, found {}", describe(&other)),
            )),
        }
    }

    fn read_message(&mut self, field: &FieldDescriptor, message: &mut dyn Message) -> Result<()> {
        let value = self.take_pending()?;
        self.enter_object(field.name(), value)?;
        let depth = self.objects.len();
        let merged = merge_fields(self, message);
        self.objects.truncate(depth - 1);
        merged
    }

    fn read_array(
        &mut self,
        field: &FieldDescriptor,
        element: &mut dyn FnMut(&mut dyn StructuredReader) -> Result<()>,
    ) -> Result<()> {
        let items = match self.take_pending()? {
            Value::Array(items) => items,
            other => {
                return Err(CodecError::invalid_value(
                    field.name(),
                    format!("expected an array, found {}", describe(&other)),
                ));
            }
        };
        for item in items {
            if item.is_null() {
                continue;
            }
            self.pending = Some(item);
            element(self)?;
        }
        Ok(())
    }

    fn skip_field(&mut self, key: &FieldKey, unknown: &mut UnknownFieldSet) -> Result<()> {
        let value = self.take_pending()?;
        unknown.push_text(key.to_string(), to_text_value(value));
        Ok(())
    }

    fn skip_absent(&mut self) -> bool {
        if matches!(self.pending, Some(Value::Null)) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

/// Converts parsed JSON into the format-neutral unknown-field value.
pub(crate) fn to_text_value(value: Value) -> TextValue {
    match value {
        Value::Null => TextValue::Null,
        Value::Bool(flag) => TextValue::Bool(flag),
        Value::Number(number) => TextValue::Number(number.to_string()),
        Value::String(string) => TextValue::String(string),
        Value::Array(items) => TextValue::Array(items.into_iter().map(to_text_value).collect()),
        Value::Object(members) => TextValue::Object(object_members(members)),
    }
}

fn object_members(members: Map<String, Value>) -> Vec<(String, TextValue)> {
    members
        .into_iter()
        .map(|(name, value)| (name, to_text_value(value)))
        .collect()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
