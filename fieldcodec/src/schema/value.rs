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

//! Tagged value types passed between a message's field-walk and a codec.
//!
//! The variant of a [`Scalar`] decides how text formats render it: booleans and
//! numbers are written bare, strings and byte sequences are quoted. The
//! decision never depends on the field's declared type.

use crate::schema::{Message, ScalarKind};
use std::borrow::Cow;
use std::fmt;

/// A scalar value, borrowed while writing and owned (`Scalar<'static>`) after
/// reading.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar<'a> {
    /// Boolean.
    Bool(bool),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// Single-precision float.
    Float(f32),
    /// Double-precision float.
    Double(f64),
    /// UTF-8 text.
    String(Cow<'a, str>),
    /// Opaque bytes.
    Bytes(Cow<'a, [u8]>),
}

impl Scalar<'_> {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Int64(_) => ScalarKind::Int64,
            Self::UInt32(_) => ScalarKind::UInt32,
            Self::UInt64(_) => ScalarKind::UInt64,
            Self::Float(_) => ScalarKind::Float,
            Self::Double(_) => ScalarKind::Double,
            Self::String(_) => ScalarKind::String,
            Self::Bytes(_) => ScalarKind::Bytes,
        }
    }

    /// Returns `true` unless the value is a NaN or infinite float.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(value) => value.is_finite(),
            Self::Double(value) => value.is_finite(),
            _ => true,
        }
    }

    /// Returns the text if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v.as_ref()),
            _ => None,
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar<'static> {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    i32 => Int32,
    i64 => Int64,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
}

impl From<String> for Scalar<'static> {
    fn from(value: String) -> Self {
        Self::String(Cow::Owned(value))
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(value: &'a str) -> Self {
        Self::String(Cow::Borrowed(value))
    }
}

impl From<Vec<u8>> for Scalar<'static> {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(Cow::Owned(value))
    }
}

impl<'a> From<&'a [u8]> for Scalar<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Bytes(Cow::Borrowed(value))
    }
}

/// One value handed to a writer: a scalar, an enum, or a nested message.
///
/// Arrays are sequences of `ValueRef`s sharing one field name.
#[derive(Clone, Copy)]
pub enum ValueRef<'a> {
    /// A scalar value.
    Scalar(&'a Scalar<'a>),
    /// An enum value with its numeric and symbolic forms.
    ///
    /// `name` is empty when the number has no declared name.
    Enum {
        /// Numeric value, written by the binary format.
        number: i32,
        /// Symbolic name, written by text formats.
        name: &'a str,
    },
    /// A nested message, written through its own field-walk.
    Message(&'a dyn Message),
}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            Self::Enum { number, name } => f
                .debug_struct("Enum")
                .field("number", number)
                .field("name", name)
                .finish(),
            Self::Message(message) => f
                .debug_tuple("Message")
                .field(&message.descriptor().full_name())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_check() {
        assert!(Scalar::Float(1.0).is_finite());
        assert!(!Scalar::Float(f32::NAN).is_finite());
        assert!(!Scalar::Double(f64::NEG_INFINITY).is_finite());
        assert!(Scalar::from("NaN").is_finite());
    }

    #[test]
    fn test_kind_and_text_access() {
        assert_eq!(Scalar::UInt64(7).kind(), ScalarKind::UInt64);
        assert_eq!(Scalar::from(String::from("x")).as_str(), Some("x"));
        assert_eq!(Scalar::Bool(false).as_str(), None);
    }
}
