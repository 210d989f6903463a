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

//! Content-type keys.
//!
//! Content types are matched case-sensitively after dropping any `;`
//! parameters and surrounding whitespace.

/// The canonical JSON content type.
pub const APPLICATION_JSON: &str = "application/json";

/// The canonical XML content type.
pub const APPLICATION_XML: &str = "application/xml";

/// The canonical binary content type.
pub const APPLICATION_BINARY: &str = "application/binary";

/// Content types served by the JSON codec.
pub const JSON_CONTENT_TYPES: &[&str] = &[
    APPLICATION_JSON,
    "application/x-json",
    "application/x-javascript",
    "text/javascript",
    "text/x-javascript",
    "text/x-json",
    "text/json",
];

/// Content types served by the XML codec.
pub const XML_CONTENT_TYPES: &[&str] = &[APPLICATION_XML, "text/xml"];

/// Content types served by the binary codec.
pub const BINARY_CONTENT_TYPES: &[&str] = &[
    APPLICATION_BINARY,
    "application/x-protobuf",
    "application/vnd.google.protobuf",
];

/// Reduces a content type to its lookup key.
///
/// # Examples
///
/// ```rust
/// use fieldcodec::format::normalize_content_type;
///
/// assert_eq!(normalize_content_type(" application/json; charset=utf-8"), "application/json");
/// assert_eq!(normalize_content_type("text/xml"), "text/xml");
/// ```
#[must_use]
pub fn normalize_content_type(content_type: &str) -> &str {
    content_type
        .split_once(';')
        .map_or(content_type, |(base, _)| base)
        .trim()
}
