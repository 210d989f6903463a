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

//! Schema metadata consumed by the codecs.
//!
//! Descriptors are produced elsewhere (generated code, a schema compiler, or
//! hand-written tables) and are read-only here. A [`MessageDescriptor`] lists
//! its fields in declaration order; that order drives the field-walk of
//! [`DynamicMessage`](crate::schema::DynamicMessage) and therefore the order in
//! which fields appear on the wire.

use crate::error::{CodecError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Largest field number that fits in a binary wire tag.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// How many values a field may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Zero or one value.
    Optional,
    /// Exactly one value in a complete message.
    Required,
    /// Zero or more values, written as an array.
    Repeated,
}

/// Scalar value kinds understood by every codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `true` / `false`.
    Bool,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// UTF-8 text.
    String,
    /// Opaque byte sequence.
    Bytes,
}

impl ScalarKind {
    /// Returns the lowercase schema name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The declared type of a field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    /// A scalar value.
    Scalar(ScalarKind),
    /// An enum value, numeric on the binary wire and symbolic in text formats.
    Enum(Arc<EnumDescriptor>),
    /// A nested message.
    Message(Arc<MessageDescriptor>),
}

impl FieldKind {
    /// Returns a short human-readable name for error messages.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Enum(descriptor) => descriptor.name(),
            Self::Message(descriptor) => descriptor.full_name(),
        }
    }
}

/// Describes one field of a message.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    number: u32,
    kind: FieldKind,
    cardinality: Cardinality,
}

impl FieldDescriptor {
    /// Creates a field descriptor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fieldcodec::schema::{Cardinality, FieldDescriptor, FieldKind, ScalarKind};
    ///
    /// let field = FieldDescriptor::new(
    ///     "id",
    ///     1,
    ///     FieldKind::Scalar(ScalarKind::Int64),
    ///     Cardinality::Optional,
    /// );
    /// assert_eq!(field.name(), "id");
    /// assert!(!field.is_repeated());
    /// ```
    pub fn new(
        name: impl Into<String>,
        number: u32,
        kind: FieldKind,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name: name.into(),
            number,
            kind,
            cardinality,
        }
    }

    /// Shorthand for an optional scalar field.
    pub fn scalar(name: impl Into<String>, number: u32, kind: ScalarKind) -> Self {
        Self::new(name, number, FieldKind::Scalar(kind), Cardinality::Optional)
    }

    /// Shorthand for a repeated scalar field.
    pub fn repeated(name: impl Into<String>, number: u32, kind: ScalarKind) -> Self {
        Self::new(name, number, FieldKind::Scalar(kind), Cardinality::Repeated)
    }

    /// Shorthand for an optional nested message field.
    pub fn message(
        name: impl Into<String>,
        number: u32,
        descriptor: Arc<MessageDescriptor>,
    ) -> Self {
        Self::new(
            name,
            number,
            FieldKind::Message(descriptor),
            Cardinality::Optional,
        )
    }

    /// Shorthand for an optional enum field.
    pub fn enumeration(
        name: impl Into<String>,
        number: u32,
        descriptor: Arc<EnumDescriptor>,
    ) -> Self {
        Self::new(name, number, FieldKind::Enum(descriptor), Cardinality::Optional)
    }

    /// Returns a copy of this descriptor with a different cardinality.
    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// The field name used by text formats.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field number used by the binary format.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// The declared type.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// The declared cardinality.
    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Returns `true` for repeated fields.
    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }
}

/// One named value of an enum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    /// Numeric value, used by the binary format.
    pub number: i32,
    /// Symbolic name, used by text formats.
    pub name: String,
}

/// Describes an enum type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDescriptor {
    name: String,
    values: Vec<EnumValue>,
}

impl EnumDescriptor {
    /// Creates an enum descriptor from `(number, name)` pairs.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (i32, S)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values
                .into_iter()
                .map(|(number, name)| EnumValue {
                    number,
                    name: name.into(),
                })
                .collect(),
        }
    }

    /// The enum type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared values.
    #[must_use]
    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// Looks up the symbolic name of a number.
    ///
    /// When several names share a number, the first declared one wins.
    #[must_use]
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|value| value.number == number)
            .map(|value| value.name.as_str())
    }

    /// Looks up the number of a symbolic name.
    #[must_use]
    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|value| value.name == name)
            .map(|value| value.number)
    }
}

/// Describes a message type: its full name and its fields in declaration order.
#[derive(Clone, PartialEq)]
pub struct MessageDescriptor {
    full_name: String,
    fields: Vec<FieldDescriptor>,
    by_name: HashMap<String, usize>,
    by_number: HashMap<u32, usize>,
}

impl MessageDescriptor {
    /// Creates a message descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidStructure`] if a field number is zero or
    /// exceeds [`MAX_FIELD_NUMBER`], or if two fields share a name or number.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fieldcodec::schema::{FieldDescriptor, MessageDescriptor, ScalarKind};
    ///
    /// let descriptor = MessageDescriptor::new(
    ///     "example.Point",
    ///     vec![
    ///         FieldDescriptor::scalar("x", 1, ScalarKind::Int32),
    ///         FieldDescriptor::scalar("y", 2, ScalarKind::Int32),
    ///     ],
    /// )?;
    /// assert_eq!(descriptor.field_by_name("y").map(|f| f.number()), Some(2));
    /// # Ok::<(), fieldcodec::CodecError>(())
    /// ```
    pub fn new(full_name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self> {
        let full_name = full_name.into();
        let mut by_name = HashMap::with_capacity(fields.len());
        let mut by_number = HashMap::with_capacity(fields.len());

        for (index, field) in fields.iter().enumerate() {
            if field.number == 0 || field.number > MAX_FIELD_NUMBER {
                return Err(CodecError::structure(format!(
                    "field '{}' of {} has out-of-range number {}",
                    field.name, full_name, field.number
                )));
            }
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(CodecError::structure(format!(
                    "duplicate field name '{}' in {}",
                    field.name, full_name
                )));
            }
            if by_number.insert(field.number, index).is_some() {
                return Err(CodecError::structure(format!(
                    "duplicate field number {} in {}",
                    field.number, full_name
                )));
            }
        }

        Ok(Self {
            full_name,
            fields,
            by_name,
            by_number,
        })
    }

    /// The fully qualified message name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by its text-format name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&index| &self.fields[index])
    }

    /// Looks up a field by its binary field number.
    #[must_use]
    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.by_number.get(&number).map(|&index| &self.fields[index])
    }

    /// Returns the declaration index of a field number.
    #[must_use]
    pub fn index_of(&self, number: u32) -> Option<usize> {
        self.by_number.get(&number).copied()
    }
}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDescriptor")
            .field("full_name", &self.full_name)
            .field("fields", &self.fields)
            .finish()
    }
}
