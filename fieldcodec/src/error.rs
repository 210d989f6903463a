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

//! Error types for fieldcodec.
//!
//! Every failure surfaced by the codec layer is a [`CodecError`]. The variants
//! fall into three categories, each with its own handling rule:
//!
//! - **Dispatch**: the requested content type (and the configured default, if
//!   any) maps to no codec. Fatal to the operation, never retried.
//! - **Structural**: mismatched container open/close calls, truncated input,
//!   values that cannot be parsed as their declared type, I/O failures. The
//!   stream is left at an undefined position and must not be reused.
//! - **Unsupported value**: NaN or an infinity handed to a text writer. Fatal to
//!   the current write call only.
//!
//! Unknown fields are not errors; readers record them in the message's
//! [`UnknownFieldSet`](crate::schema::UnknownFieldSet).
//!
//! # Examples
//!
//! ```rust
//! use fieldcodec::CodecError;
//!
//! let error = CodecError::UnsupportedContentType {
//!     content_type: "text/csv".to_string(),
//! };
//! assert!(error.is_dispatch_error());
//! assert!(!error.is_structural_error());
//! ```

use std::io;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = CodecError> = std::result::Result<T, E>;

/// Errors that can occur while resolving, writing, or reading a message.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No codec is registered for the content type, and no usable default is
    /// configured.
    #[error("unsupported content type: {content_type}")]
    UnsupportedContentType {
        /// The content type as requested by the caller.
        content_type: String,
    },

    /// Container open/close calls do not pair up, or the input is shaped
    /// differently than the reader expects.
    #[error("invalid structure: {reason}")]
    InvalidStructure {
        /// Description of the structural violation.
        reason: String,
    },

    /// The input ended before a complete value was read.
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof {
        /// What was being read when the input ran out.
        context: &'static str,
    },

    /// A value could not be parsed as the declared or inferred type.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue {
        /// The field whose value was rejected.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The value cannot be represented by the target format.
    #[error("unsupported value: {reason}")]
    UnsupportedValue {
        /// Description of the rejected value.
        reason: String,
    },

    /// Reading from the source or writing to the sink failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: io::Error,
    },

    /// The input is not well-formed JSON.
    #[error("malformed JSON: {source}")]
    Json {
        /// The underlying parser error
        #[from]
        source: serde_json::Error,
    },
}

impl CodecError {
    /// Creates an [`InvalidStructure`](Self::InvalidStructure) error.
    pub fn structure(reason: impl Into<String>) -> Self {
        Self::InvalidStructure {
            reason: reason.into(),
        }
    }

    /// Creates an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if content-type resolution failed.
    #[must_use]
    pub const fn is_dispatch_error(&self) -> bool {
        matches!(self, Self::UnsupportedContentType { .. })
    }

    /// Returns `true` if the stream is left at an undefined position.
    ///
    /// Callers must discard the stream after a structural error.
    #[must_use]
    pub const fn is_structural_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidStructure { .. }
                | Self::UnexpectedEof { .. }
                | Self::InvalidValue { .. }
                | Self::Io { .. }
                | Self::Json { .. }
        )
    }

    /// Returns `true` if a value was rejected by the target format.
    #[must_use]
    pub const fn is_unsupported_value(&self) -> bool {
        matches!(self, Self::UnsupportedValue { .. })
    }
}

impl From<postcard::Error> for CodecError {
    fn from(err: postcard::Error) -> Self {
        match err {
            postcard::Error::DeserializeUnexpectedEnd => Self::UnexpectedEof {
                context: "binary value",
            },
            other => Self::structure(format!("binary encoding failed: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_dispatch_error_display() {
        let error = CodecError::UnsupportedContentType {
            content_type: "text/csv".to_string(),
        };
        assert_eq!(error.to_string(), "unsupported content type: text/csv");
        assert!(error.is_dispatch_error());
        assert!(!error.is_structural_error());
        assert!(!error.is_unsupported_value());
    }

    #[test]
    fn test_structural_classification() {
        assert!(CodecError::structure("stack underflow").is_structural_error());
        assert!(CodecError::invalid_value("d", "not a number").is_structural_error());
        assert!(
            CodecError::UnexpectedEof {
                context: "field tag"
            }
            .is_structural_error()
        );
    }

    #[test]
    fn test_unsupported_value_classification() {
        let error = CodecError::UnsupportedValue {
            reason: "NaN".to_string(),
        };
        assert!(error.is_unsupported_value());
        assert!(!error.is_structural_error());
    }

    #[test]
    fn test_io_error_has_source() {
        let error: CodecError = io::Error::other("disk full").into();
        assert!(error.is_structural_error());
        assert!(error.source().is_some());
    }

    #[test]
    fn test_postcard_end_maps_to_eof() {
        let error: CodecError = postcard::Error::DeserializeUnexpectedEnd.into();
        assert!(matches!(error, CodecError::UnexpectedEof { .. }));
    }
}
