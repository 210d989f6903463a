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

//! JSON string escaping.

/// Returns `true` for characters written verbatim inside a JSON string.
///
/// That is printable ASCII except the quote, the backslash and the forward
/// slash. The slash is escaped so the output can sit inside a `<script>` block.
#[inline]
pub(crate) const fn is_verbatim(c: char) -> bool {
    matches!(c, ' '..='~') && !matches!(c, '"' | '\\' | '/')
}

/// The escape sequence for one character that is not verbatim.
///
/// Characters outside the Basic Multilingual Plane become a surrogate pair of
/// `\uXXXX` escapes, so a sequence is at most twelve ASCII bytes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Escape {
    bytes: [u8; 12],
    len: usize,
}

impl Escape {
    pub(crate) fn new(c: char) -> Self {
        let mut escape = Self {
            bytes: [0; 12],
            len: 0,
        };
        match c {
            '"' => escape.push(b"\\\""),
            '\\' => escape.push(b"\\\\"),
            '/' => escape.push(b"\\/"),
            '\u{8}' => escape.push(b"\\b"),
            '\u{c}' => escape.push(b"\\f"),
            '\n' => escape.push(b"\\n"),
            '\r' => escape.push(b"\\r"),
            '\t' => escape.push(b"\\t"),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    escape.push_unit(*unit);
                }
            }
        }
        escape
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    fn push(&mut self, bytes: &[u8]) {
        self.bytes[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    fn push_unit(&mut self, unit: u16) {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        self.push(b"\\u");
        for shift in [12, 8, 4, 0] {
            self.push(&[HEX[usize::from((unit >> shift) & 0xf)]]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape(text: &str) -> String {
        let mut out = Vec::new();
        for c in text.chars() {
            if is_verbatim(c) {
                out.extend_from_slice(c.to_string().as_bytes());
            } else {
                out.extend_from_slice(Escape::new(c).as_bytes());
            }
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(escape(r#"a"b\c/d"#), r#"a\"b\\c\/d"#);
        assert_eq!(
            escape("line\nnext\ttab\r\u{8}\u{c}"),
            r"line\nnext\ttab\r\b\f"
        );
    }

    #[test]
    fn test_control_and_non_ascii_use_unicode_escapes() {
        assert_eq!(escape("\u{1}"), r"\u0001");
        assert_eq!(escape("\u{7f}"), r"\u007f");
        assert_eq!(escape("\u{e9}"), r"\u00e9");
        assert_eq!(escape("\u{1f600}"), r"\ud83d\ude00");
    }

    #[test]
    fn test_printable_ascii_passes_through() {
        let printable: String = (' '..='~')
            .filter(|c| !matches!(c, '"' | '\\' | '/'))
            .collect();
        assert_eq!(escape(&printable), printable);
    }
}
