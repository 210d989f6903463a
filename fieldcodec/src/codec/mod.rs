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

//! Structured writer and reader contracts and the concrete codecs.
//!
//! A message drives a [`StructuredWriter`] field by field through
//! [`Message::write_to`](crate::schema::Message::write_to), and is filled
//! from a [`StructuredReader`] by [`merge_fields`]. The codecs differ only in
//! syntax:
//!
//! | Codec | Field identity | Enums | Nested messages | NaN / infinity |
//! |-------|----------------|-------|-----------------|----------------|
//! | [`json`] | name | name | object | rejected |
//! | [`xml`] | element name | name | child element | rejected |
//! | [`binary`] | number | number | group | accepted |

pub mod binary;
pub mod json;
mod nesting;
mod reader;
pub(crate) mod text;
pub mod xml;
mod writer;

pub use nesting::NestingTracker;
pub use reader::{FieldKey, StructuredReader, merge_fields};
pub use writer::{FieldId, StructuredWriter, write_elements};

/// Line break written by formatted JSON and XML output.
#[cfg(windows)]
pub const LINE_TERMINATOR: &str = "\r\n";
/// Line break written by formatted JSON and XML output.
#[cfg(not(windows))]
pub const LINE_TERMINATOR: &str = "\n";
