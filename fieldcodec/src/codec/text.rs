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

//! Scalar rules shared by the text formats.
//!
//! JSON and XML agree on how each scalar kind looks as text: booleans are
//! `true`/`false`, integers are decimal, floats use the shortest decimal form
//! that reads back to the same value, bytes are standard base64, enums are
//! their symbolic name. NaN and infinities have no text form and are rejected.

use crate::codec::FieldId;
use crate::error::{CodecError, Result};
use crate::schema::{EnumDescriptor, Scalar, ScalarKind};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write;

/// Rejects NaN and infinite floats.
pub(crate) fn ensure_finite(field: FieldId<'_>, value: &Scalar<'_>) -> Result<()> {
    if value.is_finite() {
        return Ok(());
    }
    let shown = match value {
        Scalar::Float(v) => v.to_string(),
        Scalar::Double(v) => v.to_string(),
        _ => String::new(),
    };
    Err(CodecError::UnsupportedValue {
        reason: if field.name.is_empty() {
            format!("{shown} has no text representation")
        } else {
            format!("{shown} in field '{}' has no text representation", field.name)
        },
    })
}

/// Appends the bare text of a boolean or numeric value to `out`.
///
/// Returns `false`, leaving `out` untouched, for textual values.
pub(crate) fn format_bare(value: &Scalar<'_>, out: &mut String) -> bool {
    // Writing into a String cannot fail.
    let _ = match value {
        Scalar::Bool(v) => write!(out, "{v}"),
        Scalar::Int32(v) => write!(out, "{v}"),
        Scalar::Int64(v) => write!(out, "{v}"),
        Scalar::UInt32(v) => write!(out, "{v}"),
        Scalar::UInt64(v) => write!(out, "{v}"),
        Scalar::Float(v) => write!(out, "{v}"),
        Scalar::Double(v) => write!(out, "{v}"),
        Scalar::String(_) | Scalar::Bytes(_) => return false,
    };
    true
}

/// Encodes bytes as standard base64.
pub(crate) fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Parses the text form of a scalar of `kind`.
pub(crate) fn parse_scalar(field: &str, kind: ScalarKind, text: &str) -> Result<Scalar<'static>> {
    let invalid = || CodecError::invalid_value(field, format!("'{text}' is not a valid {kind}"));
    let trimmed = text.trim();
    let value = match kind {
        ScalarKind::Bool => match trimmed {
            "true" => Scalar::Bool(true),
            "false" => Scalar::Bool(false),
            _ => return Err(invalid()),
        },
        ScalarKind::Int32 => Scalar::Int32(trimmed.parse().map_err(|_| invalid())?),
        ScalarKind::Int64 => Scalar::Int64(trimmed.parse().map_err(|_| invalid())?),
        ScalarKind::UInt32 => Scalar::UInt32(trimmed.parse().map_err(|_| invalid())?),
        ScalarKind::UInt64 => Scalar::UInt64(trimmed.parse().map_err(|_| invalid())?),
        ScalarKind::Float => {
            let v: f32 = trimmed.parse().map_err(|_| invalid())?;
            if !v.is_finite() {
                return Err(invalid());
            }
            Scalar::Float(v)
        }
        ScalarKind::Double => {
            let v: f64 = trimmed.parse().map_err(|_| invalid())?;
            if !v.is_finite() {
                return Err(invalid());
            }
            Scalar::Double(v)
        }
        ScalarKind::String => Scalar::from(text.to_string()),
        ScalarKind::Bytes => Scalar::from(
            STANDARD
                .decode(trimmed)
                .map_err(|e| CodecError::invalid_value(field, format!("invalid base64: {e}")))?,
        ),
    };
    Ok(value)
}

/// Resolves an enum given by symbolic name or by number.
pub(crate) fn parse_enum(field: &str, descriptor: &EnumDescriptor, text: &str) -> Result<i32> {
    let trimmed = text.trim();
    if let Some(number) = descriptor.number_of(trimmed) {
        return Ok(number);
    }
    trimmed.parse().map_err(|_| {
        CodecError::invalid_value(
            field,
            format!("'{trimmed}' is not a value of {}", descriptor.name()),
        )
    })
}
