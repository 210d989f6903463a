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

//! XML codec.
//!
//! The XML rendering mirrors the JSON one: the top-level message is a root
//! element, fields are child elements named after the field, repeated fields
//! are a field element holding one `<item>` per value, bytes are base64 text
//! and enums are written by name.
//!
//! ```text
//! <root>
//!   <id>7</id>
//!   <tags>
//!     <item>a</item>
//!     <item>b</item>
//!   </tags>
//! </root>
//! ```

mod reader;
mod writer;

pub use reader::XmlReader;
pub use writer::XmlWriter;

/// Root element name used unless configured otherwise.
pub const DEFAULT_ROOT_ELEMENT: &str = "root";

/// Element name for each value of a repeated field.
pub const ITEM_ELEMENT: &str = "item";

/// Returns `true` if `name` is a valid XML element name.
///
/// Names starting with `xml` in any case are reserved but still accepted.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_names() {
        for name in ["root", "a1", "_x", "ns:tag", "é", "item-2.b"] {
            assert!(is_xml_name(name), "{name}");
        }
        for name in ["", "1a", "-x", "a<b", "x y", "a&b", "a/b", "a=b", "\"q\""] {
            assert!(!is_xml_name(name), "{name}");
        }
    }
}
