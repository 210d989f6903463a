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

//! Streaming JSON writer.

use crate::codec::json::escape::{self, Escape};
use crate::codec::{
    FieldId, LINE_TERMINATOR, NestingTracker, StructuredWriter, text, write_elements,
};
use crate::error::{CodecError, Result};
use crate::schema::{Message, Scalar, TextValue, UnknownField, UnknownFieldSet, ValueRef};
use std::io::{self, Write};

/// Size of the output buffer in bytes.
pub const BUFFER_CAPACITY: usize = 4096;

/// Runs at most this long are copied byte by byte instead of with a block copy.
const SMALL_COPY_LIMIT: usize = 12;

const FORMATTED_INDENT: &str = "  ";
const FORMATTED_WHITESPACE: &str = " ";

/// A [`StructuredWriter`] producing JSON text.
///
/// Output is staged in a fixed [`BUFFER_CAPACITY`]-byte buffer and handed to
/// the sink when the buffer fills, when a top-level message ends, and on
/// [`flush`](StructuredWriter::flush). Compact by default; see
/// [`with_formatted`](Self::with_formatted).
///
/// Numbers and booleans are written bare, strings and base64-encoded bytes are
/// quoted. Enums are written by name. Empty repeated fields are omitted
/// entirely. NaN and infinities are rejected.
///
/// # Examples
///
/// ```rust
/// use fieldcodec::codec::json::JsonWriter;
/// use fieldcodec::codec::{FieldId, StructuredWriter};
///
/// let mut writer = JsonWriter::new(Vec::new());
/// writer.write_message_start()?;
/// writer.write_int32(FieldId::new(1, "d"), 42)?;
/// writer.write_message_end()?;
/// assert_eq!(writer.into_inner()?, br#"{"d":42}"#);
/// # Ok::<(), fieldcodec::CodecError>(())
/// ```
pub struct JsonWriter<W: Write> {
    sink: W,
    buffer: Box<[u8]>,
    position: usize,
    nesting: NestingTracker,
    in_array: bool,
    newline: &'static str,
    indent: &'static str,
    whitespace: &'static str,
    scratch: String,
}

impl<W: Write> JsonWriter<W> {
    /// Creates a compact writer over `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            buffer: vec![0; BUFFER_CAPACITY].into_boxed_slice(),
            position: 0,
            nesting: NestingTracker::new(),
            in_array: false,
            newline: "",
            indent: "",
            whitespace: "",
            scratch: String::new(),
        }
    }

    /// Builder form of [`set_formatted`](Self::set_formatted).
    #[must_use]
    pub fn with_formatted(mut self, formatted: bool) -> Self {
        self.set_formatted(formatted);
        self
    }

    /// Switches between compact output and one field per line with two-space
    /// indentation. Must be set before anything is written.
    pub fn set_formatted(&mut self, formatted: bool) {
        if formatted {
            self.newline = LINE_TERMINATOR;
            self.indent = FORMATTED_INDENT;
            self.whitespace = FORMATTED_WHITESPACE;
        } else {
            self.newline = "";
            self.indent = "";
            self.whitespace = "";
        }
    }

    /// Returns `true` if formatted output is enabled.
    #[must_use]
    pub fn is_formatted(&self) -> bool {
        !self.newline.is_empty()
    }

    /// Flushes and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.sink)
    }

    /// Opens a top-level JSON array of messages.
    ///
    /// Messages written through the returned guard are comma-joined inside
    /// one `[...]`. The array is closed and flushed when the guard is
    /// finished or dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidStructure`] if a message or another array
    /// is already open.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fieldcodec::codec::json::JsonWriter;
    /// use fieldcodec::schema::{DynamicMessage, FieldDescriptor, MessageDescriptor, ScalarKind};
    /// use std::sync::Arc;
    ///
    /// let descriptor = Arc::new(MessageDescriptor::new(
    ///     "demo.Tick",
    ///     vec![FieldDescriptor::scalar("seq", 1, ScalarKind::UInt32)],
    /// )?);
    ///
    /// let mut writer = JsonWriter::new(Vec::new());
    /// let mut array = writer.start_array()?;
    /// for seq in 1..=3u32 {
    ///     let mut tick = DynamicMessage::new(Arc::clone(&descriptor));
    ///     tick.set("seq", seq)?;
    ///     array.write_message(&tick)?;
    /// }
    /// array.finish()?;
    /// assert_eq!(writer.into_inner()?, br#"[{"seq":1},{"seq":2},{"seq":3}]"#);
    /// # Ok::<(), fieldcodec::CodecError>(())
    /// ```
    pub fn start_array(&mut self) -> Result<JsonArray<'_, W>> {
        if self.in_array || self.nesting.depth() != 0 {
            return Err(CodecError::structure(
                "a top-level array can only be opened at the top level",
            ));
        }
        self.append(b"[")?;
        self.nesting.push();
        self.in_array = true;
        Ok(JsonArray {
            writer: self,
            open: true,
        })
    }

    /// Writes one complete top-level message: start, field-walk, end.
    ///
    /// Inside a top-level array the message becomes the next element.
    ///
    /// # Errors
    ///
    /// Propagates errors from the field-walk or the sink.
    pub fn write_top_level(&mut self, message: &dyn Message) -> Result<()> {
        self.write_message_start()?;
        message.write_to(self)?;
        self.write_message_end()
    }

    fn close_array(&mut self) -> Result<()> {
        self.in_array = false;
        self.close_container(b"]")?;
        self.flush()
    }

    /// Writes the separator due before a value at the current level.
    fn separator(&mut self) -> io::Result<()> {
        if self.nesting.next_sibling() {
            self.append(b",")?;
        }
        if !self.newline.is_empty() {
            self.indented_line()
        } else if !self.whitespace.is_empty() {
            self.append(self.whitespace.as_bytes())
        } else {
            Ok(())
        }
    }

    fn indented_line(&mut self) -> io::Result<()> {
        self.append(self.newline.as_bytes())?;
        for _ in 0..self.nesting.depth() {
            self.append(self.indent.as_bytes())?;
        }
        Ok(())
    }

    fn write_name(&mut self, name: &str) -> io::Result<()> {
        self.separator()?;
        if !name.is_empty() {
            self.write_quoted(name)?;
            self.append(b":")?;
            self.append(self.whitespace.as_bytes())?;
        }
        Ok(())
    }

    fn open_container(&mut self, open: &[u8]) -> io::Result<()> {
        self.append(open)?;
        self.nesting.push();
        Ok(())
    }

    fn close_container(&mut self, close: &[u8]) -> Result<()> {
        let had_children = self.nesting.has_siblings();
        self.nesting.pop()?;
        if had_children && !self.newline.is_empty() {
            self.indented_line()?;
        }
        self.append(close)?;
        Ok(())
    }

    fn write_quoted(&mut self, text: &str) -> io::Result<()> {
        self.append(b"\"")?;
        let mut start = 0;
        for (index, c) in text.char_indices() {
            if escape::is_verbatim(c) {
                continue;
            }
            self.append(&text.as_bytes()[start..index])?;
            self.append(Escape::new(c).as_bytes())?;
            start = index + c.len_utf8();
        }
        self.append(&text.as_bytes()[start..])?;
        self.append(b"\"")
    }

    /// Writes a scalar value without a field name.
    fn write_bare(&mut self, value: &Scalar<'_>) -> io::Result<()> {
        let mut digits = std::mem::take(&mut self.scratch);
        digits.clear();
        let result = if text::format_bare(value, &mut digits) {
            self.append(digits.as_bytes())
        } else {
            match value {
                Scalar::Bytes(bytes) => self.write_quoted(&text::encode_bytes(bytes)),
                _ => self.write_quoted(value.as_str().unwrap_or_default()),
            }
        };
        self.scratch = digits;
        result
    }

    fn write_text_value(&mut self, value: &TextValue) -> Result<()> {
        match value {
            TextValue::Null => self.append(b"null")?,
            TextValue::Bool(true) => self.append(b"true")?,
            TextValue::Bool(false) => self.append(b"false")?,
            TextValue::Number(number) => self.append(number.as_bytes())?,
            TextValue::String(string) => self.write_quoted(string)?,
            TextValue::Array(items) => {
                self.open_container(b"[")?;
                for item in items {
                    self.separator()?;
                    self.write_text_value(item)?;
                }
                self.close_container(b"]")?;
            }
            TextValue::Object(members) => {
                self.open_container(b"{")?;
                for (name, member) in members {
                    self.write_name(name)?;
                    self.write_text_value(member)?;
                }
                self.close_container(b"}")?;
            }
        }
        Ok(())
    }

    /// Appends bytes to the buffer, handing the buffer to the sink first if
    /// they do not fit.
    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        if bytes.len() > BUFFER_CAPACITY - self.position {
            self.flush_buffer()?;
            if bytes.len() > BUFFER_CAPACITY {
                return self.sink.write_all(bytes);
            }
        }
        let end = self.position + bytes.len();
        let target = &mut self.buffer[self.position..end];
        if bytes.len() <= SMALL_COPY_LIMIT {
            for (slot, byte) in target.iter_mut().zip(bytes) {
                *slot = *byte;
            }
        } else {
            target.copy_from_slice(bytes);
        }
        self.position = end;
        Ok(())
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        if self.position > 0 {
            self.sink.write_all(&self.buffer[..self.position])?;
            self.position = 0;
        }
        Ok(())
    }
}

impl<W: Write> StructuredWriter for JsonWriter<W> {
    fn write_message_start(&mut self) -> Result<()> {
        if self.nesting.depth() != usize::from(self.in_array) {
            return Err(CodecError::structure("a message is already open"));
        }
        if self.in_array {
            self.separator()?;
        }
        self.open_container(b"{")?;
        Ok(())
    }

    fn write_message_end(&mut self) -> Result<()> {
        if self.nesting.depth() <= usize::from(self.in_array) {
            return Err(CodecError::structure("no message is open"));
        }
        self.close_container(b"}")?;
        self.flush()
    }

    fn write_scalar(&mut self, field: FieldId<'_>, value: &Scalar<'_>) -> Result<()> {
        text::ensure_finite(field, value)?;
        self.write_name(field.name)?;
        self.write_bare(value)?;
        Ok(())
    }

    fn write_enum(&mut self, field: FieldId<'_>, number: i32, name: &str) -> Result<()> {
        if name.is_empty() {
            self.write_scalar(field, &Scalar::Int32(number))
        } else {
            self.write_scalar(field, &Scalar::from(name))
        }
    }

    fn write_message(&mut self, field: FieldId<'_>, message: &dyn Message) -> Result<()> {
        self.write_name(field.name)?;
        self.open_container(b"{")?;
        message.write_to(self)?;
        self.close_container(b"}")
    }

    fn write_array<'v>(
        &mut self,
        field: FieldId<'_>,
        elements: &mut dyn Iterator<Item = ValueRef<'v>>,
    ) -> Result<()> {
        let Some(first) = elements.next() else {
            return Ok(());
        };
        self.write_name(field.name)?;
        self.open_container(b"[")?;
        write_elements(self, field, first, elements)?;
        self.close_container(b"]")
    }

    fn write_unknown_fields(&mut self, unknown: &UnknownFieldSet) -> Result<()> {
        let mut skipped = 0usize;
        for field in unknown {
            match field {
                UnknownField::Text { name, value } => {
                    self.write_name(name)?;
                    self.write_text_value(value)?;
                }
                UnknownField::Wire { .. } => skipped += 1,
            }
        }
        if skipped > 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!(skipped, "JSON writer skipped binary unknown fields");
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_buffer()?;
        self.sink.flush()?;
        Ok(())
    }
}

/// A top-level JSON array of messages, opened by [`JsonWriter::start_array`].
///
/// The closing `]` is written by [`finish`](Self::finish), or by `Drop` on any
/// other exit path. A close error seen in `Drop` can only be logged.
pub struct JsonArray<'w, W: Write> {
    writer: &'w mut JsonWriter<W>,
    open: bool,
}

impl<W: Write> JsonArray<'_, W> {
    /// Writes `message` as the next element.
    ///
    /// # Errors
    ///
    /// Propagates errors from the field-walk or the sink.
    pub fn write_message(&mut self, message: &dyn Message) -> Result<()> {
        self.writer.write_top_level(message)
    }

    /// Closes the array and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn finish(mut self) -> Result<()> {
        self.close()
    }

    fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.writer.close_array()
    }
}

impl<W: Write> Drop for JsonArray<'_, W> {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            #[cfg(feature = "tracing")]
            tracing::warn!(%error, "failed to close top-level JSON array");
            #[cfg(not(feature = "tracing"))]
            let _ = error;
        }
    }
}
