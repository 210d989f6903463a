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

//! Streaming XML writer.

use crate::codec::{
    FieldId, LINE_TERMINATOR, NestingTracker, StructuredWriter, text, write_elements,
};
use crate::error::{CodecError, Result};
use crate::schema::{Message, Scalar, TextValue, UnknownField, UnknownFieldSet, ValueRef};
use std::io::{BufWriter, Write};

use super::{DEFAULT_ROOT_ELEMENT, ITEM_ELEMENT, is_xml_name};

/// A [`StructuredWriter`] producing XML.
///
/// The message becomes a root element (named `root` unless configured), each
/// field a child element named after the field, and each element of a
/// repeated field an `<item>` child of the field element.
///
/// # Examples
///
/// ```rust
/// use fieldcodec::codec::xml::XmlWriter;
/// use fieldcodec::codec::{FieldId, StructuredWriter};
///
/// let mut writer = XmlWriter::new(Vec::new()).with_root_element("point");
/// writer.write_message_start()?;
/// writer.write_int32(FieldId::new(1, "x"), 3)?;
/// writer.write_string(FieldId::new(2, "label"), "a<b")?;
/// writer.write_message_end()?;
/// assert_eq!(
///     writer.into_inner()?,
///     b"<point><x>3</x><label>a&lt;b</label></point>"
/// );
/// # Ok::<(), fieldcodec::CodecError>(())
/// ```
pub struct XmlWriter<W: Write> {
    sink: BufWriter<W>,
    root: String,
    nesting: NestingTracker,
    newline: &'static str,
    indent: &'static str,
    scratch: String,
}

impl<W: Write> XmlWriter<W> {
    /// Creates a compact writer over `sink` with the default root element.
    pub fn new(sink: W) -> Self {
        Self {
            sink: BufWriter::new(sink),
            root: DEFAULT_ROOT_ELEMENT.to_string(),
            nesting: NestingTracker::new(),
            newline: "",
            indent: "",
            scratch: String::new(),
        }
    }

    /// Builder form of [`set_root_element`](Self::set_root_element).
    #[must_use]
    pub fn with_root_element(mut self, name: impl Into<String>) -> Self {
        self.set_root_element(name);
        self
    }

    /// Builder form of [`set_formatted`](Self::set_formatted).
    #[must_use]
    pub fn with_formatted(mut self, formatted: bool) -> Self {
        self.set_formatted(formatted);
        self
    }

    /// Sets the name of the element enclosing the top-level message.
    pub fn set_root_element(&mut self, name: impl Into<String>) {
        self.root = name.into();
    }

    /// Switches between compact output and one element per line.
    pub fn set_formatted(&mut self, formatted: bool) {
        if formatted {
            self.newline = LINE_TERMINATOR;
            self.indent = "  ";
        } else {
            self.newline = "";
            self.indent = "";
        }
    }

    /// Flushes and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn into_inner(self) -> Result<W> {
        self.sink
            .into_inner()
            .map_err(|e| CodecError::from(e.into_error()))
    }

    fn indented_line(&mut self) -> Result<()> {
        if self.newline.is_empty() {
            return Ok(());
        }
        self.sink.write_all(self.newline.as_bytes())?;
        for _ in 0..self.nesting.depth() {
            self.sink.write_all(self.indent.as_bytes())?;
        }
        Ok(())
    }

    fn open_element(&mut self, name: &str) -> Result<()> {
        self.nesting.next_sibling();
        self.indented_line()?;
        write!(self.sink, "<{name}>")?;
        self.nesting.push();
        Ok(())
    }

    fn close_element(&mut self, name: &str) -> Result<()> {
        let had_children = self.nesting.has_siblings();
        self.nesting.pop()?;
        if had_children {
            self.indented_line()?;
        }
        write!(self.sink, "</{name}>")?;
        Ok(())
    }

    /// Writes `<name>text</name>` on its own line.
    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.nesting.next_sibling();
        self.indented_line()?;
        write!(self.sink, "<{name}>")?;
        write_escaped(&mut self.sink, text)?;
        write!(self.sink, "</{name}>")?;
        Ok(())
    }

    fn write_text_value(&mut self, name: &str, value: &TextValue) -> Result<()> {
        match value {
            TextValue::Null => {
                self.nesting.next_sibling();
                self.indented_line()?;
                write!(self.sink, "<{name}/>")?;
            }
            TextValue::Bool(flag) => self.text_element(name, if *flag { "true" } else { "false" })?,
            TextValue::Number(number) | TextValue::String(number) => {
                self.text_element(name, number)?;
            }
            TextValue::Array(items) => {
                self.open_element(name)?;
                for item in items {
                    self.write_text_value(ITEM_ELEMENT, item)?;
                }
                self.close_element(name)?;
            }
            TextValue::Object(members) => {
                self.open_element(name)?;
                for (member, member_value) in members {
                    self.write_text_value(member, member_value)?;
                }
                self.close_element(name)?;
            }
        }
        Ok(())
    }
}

/// Returns `true` if `name` and every object member name inside `value` can
/// be written as element names.
fn is_writable(name: &str, value: &TextValue) -> bool {
    is_xml_name(name)
        && match value {
            TextValue::Array(items) => items.iter().all(|item| is_writable(ITEM_ELEMENT, item)),
            TextValue::Object(members) => members
                .iter()
                .all(|(member, member_value)| is_writable(member, member_value)),
            _ => true,
        }
}

fn element_name<'a>(field: &FieldId<'a>) -> &'a str {
    if field.name.is_empty() {
        ITEM_ELEMENT
    } else {
        field.name
    }
}

/// Writes `text` with the five XML special characters replaced by entities.
pub(crate) fn write_escaped(sink: &mut impl Write, text: &str) -> std::io::Result<()> {
    let mut start = 0;
    for (index, c) in text.char_indices() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&apos;",
            _ => continue,
        };
        sink.write_all(&text.as_bytes()[start..index])?;
        sink.write_all(entity.as_bytes())?;
        start = index + 1;
    }
    sink.write_all(&text.as_bytes()[start..])
}

impl<W: Write> StructuredWriter for XmlWriter<W> {
    fn write_message_start(&mut self) -> Result<()> {
        if self.nesting.depth() != 0 {
            return Err(CodecError::structure("a message is already open"));
        }
        if !is_xml_name(&self.root) {
            return Err(CodecError::structure(format!(
                "{:?} is not a valid XML element name",
                self.root
            )));
        }
        write!(self.sink, "<{}>", self.root)?;
        self.nesting.push();
        Ok(())
    }

    fn write_message_end(&mut self) -> Result<()> {
        if self.nesting.depth() != 1 {
            return Err(CodecError::structure("no message is open"));
        }
        let root = std::mem::take(&mut self.root);
        let closed = self.close_element(&root);
        self.root = root;
        closed?;
        self.flush()
    }

    fn write_scalar(&mut self, field: FieldId<'_>, value: &Scalar<'_>) -> Result<()> {
        text::ensure_finite(field, value)?;
        let mut digits = std::mem::take(&mut self.scratch);
        digits.clear();
        let written = if text::format_bare(value, &mut digits) {
            self.text_element(element_name(&field), &digits)
        } else {
            match value {
                Scalar::Bytes(bytes) => {
                    self.text_element(element_name(&field), &text::encode_bytes(bytes))
                }
                _ => self.text_element(element_name(&field), value.as_str().unwrap_or_default()),
            }
        };
        self.scratch = digits;
        written
    }

    fn write_enum(&mut self, field: FieldId<'_>, number: i32, name: &str) -> Result<()> {
        if name.is_empty() {
            self.write_scalar(field, &Scalar::Int32(number))
        } else {
            self.text_element(element_name(&field), name)
        }
    }

    fn write_message(&mut self, field: FieldId<'_>, message: &dyn Message) -> Result<()> {
        let name = element_name(&field);
        self.open_element(name)?;
        message.write_to(self)?;
        self.close_element(name)
    }

    fn write_array<'v>(
        &mut self,
        field: FieldId<'_>,
        elements: &mut dyn Iterator<Item = ValueRef<'v>>,
    ) -> Result<()> {
        let Some(first) = elements.next() else {
            return Ok(());
        };
        let name = element_name(&field);
        self.open_element(name)?;
        write_elements(self, field, first, elements)?;
        self.close_element(name)
    }

    fn write_unknown_fields(&mut self, unknown: &UnknownFieldSet) -> Result<()> {
        let mut skipped = 0usize;
        let mut unnamed = 0usize;
        for field in unknown {
            match field {
                UnknownField::Text { name, value } if is_writable(name, value) => {
                    self.write_text_value(name, value)?;
                }
                UnknownField::Text { .. } => unnamed += 1,
                UnknownField::Wire { .. } => skipped += 1,
            }
        }
        if skipped > 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!(skipped, "XML writer skipped binary unknown fields");
        }
        if unnamed > 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                skipped = unnamed,
                "XML writer skipped unknown fields whose names are not XML names"
            );
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}
