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

#![doc = include_str!("../../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

//! ## Architecture
//!
//! fieldcodec is organized into layers:
//!
//! - **[`schema`]**: Descriptors, the tagged value types, the [`Message`]
//!   field-walk trait, unknown-field sets, extensions and [`DynamicMessage`]
//! - **[`codec`]**: The [`StructuredWriter`] / [`StructuredReader`] contracts,
//!   the nesting tracker, and the JSON, XML and binary codecs
//! - **[`format`]**: Content-type dispatch configured by [`FormatOptions`]
//! - **[`error`]**: The [`CodecError`] taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldcodec::{DynamicMessage, FormatOptions, write_message_to};
//! use fieldcodec::schema::{FieldDescriptor, MessageDescriptor, ScalarKind};
//! use std::sync::Arc;
//!
//! let descriptor = Arc::new(MessageDescriptor::new(
//!     "demo.Reading",
//!     vec![
//!         FieldDescriptor::scalar("sensor", 1, ScalarKind::String),
//!         FieldDescriptor::repeated("samples", 2, ScalarKind::Double),
//!     ],
//! )?);
//! let mut reading = DynamicMessage::new(descriptor);
//! reading.set("sensor", "t1")?;
//! reading.push("samples", 20.5)?.push("samples", 21.0)?;
//!
//! let mut out = Vec::new();
//! write_message_to(&FormatOptions::new(), "application/json", &mut out, &reading)?;
//! assert_eq!(out, br#"{"sensor":"t1","samples":[20.5,21]}"#);
//! # Ok::<(), fieldcodec::CodecError>(())
//! ```
//!
//! ## Features
//!
//! - **`tracing`** (default): Emit `tracing` events for content-type
//!   fallback, unknown fields and failed array closes
//!
//! ## Error Handling
//!
//! Every operation returns [`CodecError`]. Dispatch errors mean no codec was
//! found; structural errors leave the stream at an undefined position and it
//! must be discarded; unsupported-value errors reject a single write.
//! Unknown fields are never an error.
//!
//! ## Safety
//!
//! fieldcodec is written in 100% safe Rust with `#![deny(unsafe_code)]`.

pub mod codec;
pub mod error;
pub mod format;
pub mod schema;

pub use codec::{FieldId, FieldKey, StructuredReader, StructuredWriter, merge_fields};
pub use error::{CodecError, Result};
pub use format::{
    FormatOptions, FormatSettings, merge_message_from, resolve_reader, resolve_writer,
    write_message_to,
};
pub use schema::{DynamicMessage, Message};
