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

//! Unknown-field preservation.
//!
//! A reader that meets a field its message descriptor does not declare records
//! it here instead of failing. Writers re-emit the entries they can represent,
//! so decoding and re-encoding a message in the same format keeps data written
//! by a newer schema.

/// A raw binary wire value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireValue {
    /// Variable-length integer, stored as its raw 64-bit payload.
    Varint(u64),
    /// Eight little-endian bytes.
    Fixed64(u64),
    /// Length-prefixed bytes.
    LengthDelimited(Vec<u8>),
    /// A group, with its contents kept as nested unknown fields.
    Group(UnknownFieldSet),
    /// Four little-endian bytes.
    Fixed32(u32),
}

/// A format-neutral text value, as found in JSON or XML input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextValue {
    /// JSON `null`, or an empty XML element.
    Null,
    /// A boolean literal.
    Bool(bool),
    /// A number, kept in its original textual form.
    Number(String),
    /// A string.
    String(String),
    /// An array of values.
    Array(Vec<TextValue>),
    /// An object or element with children, in input order.
    Object(Vec<(String, TextValue)>),
}

/// One unknown field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnknownField {
    /// Read by the binary codec, identified by field number.
    Wire {
        /// The field number from the wire tag.
        number: u32,
        /// The raw value.
        value: WireValue,
    },
    /// Read by a text codec, identified by field name.
    Text {
        /// The field name.
        name: String,
        /// The value as parsed from the input.
        value: TextValue,
    },
}

/// An ordered collection of unknown fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnknownFieldSet {
    fields: Vec<UnknownField>,
}

impl UnknownFieldSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, keeping input order.
    pub fn push(&mut self, field: UnknownField) {
        self.fields.push(field);
    }

    /// Appends a binary field.
    pub fn push_wire(&mut self, number: u32, value: WireValue) {
        self.fields.push(UnknownField::Wire { number, value });
    }

    /// Appends a text field.
    pub fn push_text(&mut self, name: impl Into<String>, value: TextValue) {
        self.fields.push(UnknownField::Text {
            name: name.into(),
            value,
        });
    }

    /// Iterates over the fields in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, UnknownField> {
        self.fields.iter()
    }

    /// Number of recorded fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Removes all fields.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Iterates over the binary-origin fields only.
    pub fn wire_fields(&self) -> impl Iterator<Item = (u32, &WireValue)> {
        self.fields.iter().filter_map(|field| match field {
            UnknownField::Wire { number, value } => Some((*number, value)),
            UnknownField::Text { .. } => None,
        })
    }

    /// Iterates over the text-origin fields only.
    pub fn text_fields(&self) -> impl Iterator<Item = (&str, &TextValue)> {
        self.fields.iter().filter_map(|field| match field {
            UnknownField::Text { name, value } => Some((name.as_str(), value)),
            UnknownField::Wire { .. } => None,
        })
    }
}

impl<'a> IntoIterator for &'a UnknownFieldSet {
    type Item = &'a UnknownField;
    type IntoIter = std::slice::Iter<'a, UnknownField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let mut set = UnknownFieldSet::new();
        set.push_wire(9, WireValue::Varint(1));
        set.push_text("extra", TextValue::Bool(true));
        set.push_wire(3, WireValue::Fixed32(7));

        let numbers: Vec<_> = set.wire_fields().map(|(n, _)| n).collect();
        assert_eq!(numbers, [9, 3]);
        assert_eq!(set.len(), 3);
        assert!(matches!(set.iter().nth(1), Some(UnknownField::Text { .. })));
    }

    #[test]
    fn test_text_fields_filter() {
        let mut set = UnknownFieldSet::new();
        set.push_wire(1, WireValue::Varint(0));
        set.push_text("a", TextValue::Number("1.5".to_string()));

        let names: Vec<_> = set.text_fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["a"]);
    }

    #[test]
    fn test_clear() {
        let mut set = UnknownFieldSet::new();
        set.push_wire(1, WireValue::LengthDelimited(vec![1, 2, 3]));
        assert!(!set.is_empty());
        set.clear();
        assert!(set.is_empty());
    }
}
