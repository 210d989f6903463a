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

//! Wire types and tags.

use crate::error::{CodecError, Result};
use crate::schema::{FieldKind, MAX_FIELD_NUMBER, ScalarKind};
use std::fmt;

/// How a field value is laid out after its tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// A LEB128 varint. Signed integers are zigzag-encoded first.
    Varint = 0,
    /// Eight little-endian bytes.
    Fixed64 = 1,
    /// A varint length followed by that many bytes.
    LengthDelimited = 2,
    /// Opens a nested message, closed by a matching [`EndGroup`](Self::EndGroup).
    StartGroup = 3,
    /// Closes the group opened with the same field number.
    EndGroup = 4,
    /// Four little-endian bytes.
    Fixed32 = 5,
}

impl WireType {
    /// Decodes the low three bits of a tag.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidStructure`] for the unused values 6 and 7.
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            3 => Ok(Self::StartGroup),
            4 => Ok(Self::EndGroup),
            5 => Ok(Self::Fixed32),
            other => Err(CodecError::structure(format!("invalid wire type {other}"))),
        }
    }

    /// The wire type used for values of a scalar kind.
    #[must_use]
    pub const fn of_scalar(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Bool
            | ScalarKind::Int32
            | ScalarKind::Int64
            | ScalarKind::UInt32
            | ScalarKind::UInt64 => Self::Varint,
            ScalarKind::Float => Self::Fixed32,
            ScalarKind::Double => Self::Fixed64,
            ScalarKind::String | ScalarKind::Bytes => Self::LengthDelimited,
        }
    }

    /// The wire type used for values of a field kind.
    #[must_use]
    pub fn of_field(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Scalar(scalar) => Self::of_scalar(*scalar),
            FieldKind::Enum(_) => Self::Varint,
            FieldKind::Message(_) => Self::StartGroup,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Varint => "varint",
            Self::Fixed64 => "fixed64",
            Self::LengthDelimited => "length-delimited",
            Self::StartGroup => "start-group",
            Self::EndGroup => "end-group",
            Self::Fixed32 => "fixed32",
        };
        f.write_str(name)
    }
}

/// Packs a field number and wire type into a tag.
#[must_use]
pub const fn make_tag(number: u32, wire_type: WireType) -> u64 {
    ((number as u64) << 3) | wire_type as u64
}

/// Splits a tag into field number and wire type.
///
/// # Errors
///
/// Returns [`CodecError::InvalidStructure`] for field number zero, numbers
/// above [`MAX_FIELD_NUMBER`], or an invalid wire type.
pub fn split_tag(tag: u64) -> Result<(u32, WireType)> {
    let wire_type = WireType::from_bits((tag & 0x7) as u8)?;
    let number = tag >> 3;
    if number == 0 || number > u64::from(MAX_FIELD_NUMBER) {
        return Err(CodecError::structure(format!(
            "field number {number} out of range"
        )));
    }
    // Bounded by MAX_FIELD_NUMBER above.
    Ok((number as u32, wire_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_layout() {
        assert_eq!(make_tag(1, WireType::Varint), 0x08);
        assert_eq!(make_tag(2, WireType::LengthDelimited), 0x12);
        assert_eq!(split_tag(0x12).unwrap(), (2, WireType::LengthDelimited));
        let max = make_tag(MAX_FIELD_NUMBER, WireType::Fixed32);
        assert_eq!(split_tag(max).unwrap(), (MAX_FIELD_NUMBER, WireType::Fixed32));
    }

    #[test]
    fn test_invalid_tags() {
        assert!(split_tag(make_tag(0, WireType::Varint)).is_err());
        assert!(split_tag((1 << 3) | 6).is_err());
        assert!(split_tag((u64::from(MAX_FIELD_NUMBER) + 1) << 3).is_err());
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(WireType::of_scalar(ScalarKind::Bool), WireType::Varint);
        assert_eq!(WireType::of_scalar(ScalarKind::Double), WireType::Fixed64);
        assert_eq!(WireType::of_scalar(ScalarKind::Float), WireType::Fixed32);
        assert_eq!(WireType::of_scalar(ScalarKind::Bytes), WireType::LengthDelimited);
    }
}
