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

//! Content-type dispatch.

use crate::codec::binary::{BinaryReader, BinaryWriter};
use crate::codec::json::{JsonReader, JsonWriter};
use crate::codec::xml::{XmlReader, XmlWriter};
use crate::codec::{FieldId, FieldKey, StructuredReader, StructuredWriter, merge_fields};
use crate::error::{CodecError, Result};
use crate::format::{FormatOptions, normalize_content_type};
use crate::schema::{
    EnumDescriptor, FieldDescriptor, Message, Scalar, ScalarKind, UnknownFieldSet, ValueRef,
};
use std::collections::HashMap;
use std::io::{Read, Write};

/// The byte sink a resolved writer is bound to.
pub type Sink<'s> = Box<dyn Write + 's>;

/// The byte source a resolved reader is bound to.
pub type Source<'s> = Box<dyn Read + 's>;

/// Builds a writer bound to a sink.
pub type WriterFactory = for<'s> fn(Sink<'s>) -> FormatWriter<'s>;

/// Builds a reader bound to a source.
pub type ReaderFactory = for<'s> fn(Source<'s>) -> FormatReader<'s>;

/// A writer chosen by content type.
///
/// The built-in codecs are kept as named variants so dispatch can apply
/// their format options; anything registered from outside is `Custom`.
pub enum FormatWriter<'s> {
    /// JSON output.
    Json(JsonWriter<Sink<'s>>),
    /// XML output.
    Xml(XmlWriter<Sink<'s>>),
    /// Binary output.
    Binary(BinaryWriter<Sink<'s>>),
    /// A codec registered by the caller.
    Custom(Box<dyn StructuredWriter + 's>),
}

/// A reader chosen by content type.
pub enum FormatReader<'s> {
    /// JSON input.
    Json(JsonReader<Source<'s>>),
    /// XML input.
    Xml(XmlReader<Source<'s>>),
    /// Binary input.
    Binary(BinaryReader<Source<'s>>),
    /// A codec registered by the caller.
    Custom(Box<dyn StructuredReader + 's>),
}

impl<'s> FormatWriter<'s> {
    /// Returns the JSON writer, for JSON-only operations such as
    /// [`JsonWriter::start_array`].
    pub fn as_json_mut(&mut self) -> Option<&mut JsonWriter<Sink<'s>>> {
        match self {
            Self::Json(writer) => Some(writer),
            _ => None,
        }
    }

    fn configure(&mut self, options: &FormatOptions) {
        match self {
            Self::Json(writer) => writer.set_formatted(options.settings.formatted),
            Self::Xml(writer) => {
                writer.set_formatted(options.settings.formatted);
                writer.set_root_element(options.settings.xml_root_element.as_str());
            }
            Self::Binary(_) | Self::Custom(_) => {}
        }
    }
}

impl FormatReader<'_> {
    fn configure(&mut self, options: &FormatOptions) {
        match self {
            Self::Xml(reader) => {
                reader.set_root_element(options.settings.xml_root_element.as_str());
            }
            Self::Binary(reader) => {
                if let Some(registry) = &options.extension_registry {
                    reader.set_extension_registry(registry.clone());
                }
            }
            Self::Json(_) | Self::Custom(_) => {}
        }
    }
}

macro_rules! delegate {
    ($self:ident, $codec:ident => $call:expr) => {
        match $self {
            Self::Json($codec) => $call,
            Self::Xml($codec) => $call,
            Self::Binary($codec) => $call,
            Self::Custom($codec) => $call,
        }
    };
}

impl StructuredWriter for FormatWriter<'_> {
    fn write_message_start(&mut self) -> Result<()> {
        delegate!(self, w => w.write_message_start())
    }

    fn write_message_end(&mut self) -> Result<()> {
        delegate!(self, w => w.write_message_end())
    }

    fn write_scalar(&mut self, field: FieldId<'_>, value: &Scalar<'_>) -> Result<()> {
        delegate!(self, w => w.write_scalar(field, value))
    }

    fn write_enum(&mut self, field: FieldId<'_>, number: i32, name: &str) -> Result<()> {
        delegate!(self, w => w.write_enum(field, number, name))
    }

    fn write_message(&mut self, field: FieldId<'_>, message: &dyn Message) -> Result<()> {
        delegate!(self, w => w.write_message(field, message))
    }

    fn write_array<'v>(
        &mut self,
        field: FieldId<'_>,
        elements: &mut dyn Iterator<Item = ValueRef<'v>>,
    ) -> Result<()> {
        delegate!(self, w => w.write_array(field, elements))
    }

    fn write_unknown_fields(&mut self, unknown: &UnknownFieldSet) -> Result<()> {
        delegate!(self, w => w.write_unknown_fields(unknown))
    }

    fn flush(&mut self) -> Result<()> {
        delegate!(self, w => w.flush())
    }
}

impl StructuredReader for FormatReader<'_> {
    fn read_message_start(&mut self) -> Result<()> {
        delegate!(self, r => r.read_message_start())
    }

    fn read_message_end(&mut self) -> Result<()> {
        delegate!(self, r => r.read_message_end())
    }

    fn read_field_key(&mut self) -> Result<Option<FieldKey>> {
        delegate!(self, r => r.read_field_key())
    }

    fn read_scalar(
        &mut self,
        field: &FieldDescriptor,
        kind: ScalarKind,
    ) -> Result<Scalar<'static>> {
        delegate!(self, r => r.read_scalar(field, kind))
    }

    fn read_enum(&mut self, field: &FieldDescriptor, descriptor: &EnumDescriptor) -> Result<i32> {
        delegate!(self, r => r.read_enum(field, descriptor))
    }

    fn read_message(&mut self, field: &FieldDescriptor, message: &mut dyn Message) -> Result<()> {
        delegate!(self, r => r.read_message(field, message))
    }

    fn read_array(
        &mut self,
        field: &FieldDescriptor,
        element: &mut dyn FnMut(&mut dyn StructuredReader) -> Result<()>,
    ) -> Result<()> {
        delegate!(self, r => r.read_array(field, element))
    }

    fn skip_field(&mut self, key: &FieldKey, unknown: &mut UnknownFieldSet) -> Result<()> {
        delegate!(self, r => r.skip_field(key, unknown))
    }

    fn skip_absent(&mut self) -> bool {
        delegate!(self, r => r.skip_absent())
    }

    fn find_extension(&self, extendee: &str, number: u32) -> Option<FieldDescriptor> {
        delegate!(self, r => r.find_extension(extendee, number))
    }
}

pub(crate) fn json_writer(sink: Sink<'_>) -> FormatWriter<'_> {
    FormatWriter::Json(JsonWriter::new(sink))
}

pub(crate) fn xml_writer(sink: Sink<'_>) -> FormatWriter<'_> {
    FormatWriter::Xml(XmlWriter::new(sink))
}

pub(crate) fn binary_writer(sink: Sink<'_>) -> FormatWriter<'_> {
    FormatWriter::Binary(BinaryWriter::new(sink))
}

pub(crate) fn json_reader(source: Source<'_>) -> FormatReader<'_> {
    FormatReader::Json(JsonReader::new(source))
}

pub(crate) fn xml_reader(source: Source<'_>) -> FormatReader<'_> {
    FormatReader::Xml(XmlReader::new(source))
}

pub(crate) fn binary_reader(source: Source<'_>) -> FormatReader<'_> {
    FormatReader::Binary(BinaryReader::new(source))
}

/// Finds the factory for `content_type`, falling back to the configured
/// default content type.
fn lookup<F: Copy>(
    factories: &HashMap<String, F>,
    content_type: &str,
    default: Option<&str>,
) -> Result<F> {
    let key = normalize_content_type(content_type);
    if let Some(factory) = factories.get(key) {
        return Ok(*factory);
    }
    let fallback = default
        .map(normalize_content_type)
        .filter(|default| !default.is_empty())
        .and_then(|default| factories.get(default).map(|factory| (default, *factory)));
    if let Some((default, factory)) = fallback {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            requested = key,
            default,
            "content type not registered, using default"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = default;
        return Ok(factory);
    }
    Err(CodecError::UnsupportedContentType {
        content_type: content_type.to_string(),
    })
}

/// Resolves a writer for `content_type` bound to `sink`.
///
/// Parameters after `;` are ignored. If the content type is not registered
/// and a default content type is configured, the default's writer is used.
/// JSON and XML writers are configured from `options` before they are
/// returned.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedContentType`] if neither the content type
/// nor the default is registered.
///
/// # Examples
///
/// ```rust
/// use fieldcodec::codec::{FieldId, StructuredWriter};
/// use fieldcodec::format::{FormatOptions, resolve_writer};
///
/// let options = FormatOptions::new();
/// let mut out = Vec::new();
/// let mut writer = resolve_writer(&options, "application/json; charset=utf-8", &mut out)?;
/// writer.write_message_start()?;
/// writer.write_int32(FieldId::new(1, "d"), 42)?;
/// writer.write_message_end()?;
/// drop(writer);
/// assert_eq!(out, br#"{"d":42}"#);
/// # Ok::<(), fieldcodec::CodecError>(())
/// ```
pub fn resolve_writer<'s, W: Write + 's>(
    options: &FormatOptions,
    content_type: &str,
    sink: W,
) -> Result<FormatWriter<'s>> {
    let factory = lookup(
        &options.writers,
        content_type,
        options.settings.default_content_type.as_deref(),
    )?;
    let mut writer = factory(Box::new(sink));
    writer.configure(options);
    Ok(writer)
}

/// Resolves a reader for `content_type` bound to `source`.
///
/// Resolution follows [`resolve_writer`]. XML readers take the configured
/// root element name and binary readers the extension registry.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedContentType`] if neither the content type
/// nor the default is registered.
pub fn resolve_reader<'s, R: Read + 's>(
    options: &FormatOptions,
    content_type: &str,
    source: R,
) -> Result<FormatReader<'s>> {
    let factory = lookup(
        &options.readers,
        content_type,
        options.settings.default_content_type.as_deref(),
    )?;
    let mut reader = factory(Box::new(source));
    reader.configure(options);
    Ok(reader)
}

/// Writes `message` to `sink` in the format named by `content_type`.
///
/// # Errors
///
/// Returns a dispatch error for an unknown content type, otherwise any error
/// from the field-walk or the sink. Output already written is then
/// incomplete and should be discarded.
pub fn write_message_to<W: Write>(
    options: &FormatOptions,
    content_type: &str,
    sink: W,
    message: &dyn Message,
) -> Result<()> {
    let mut writer = resolve_writer(options, content_type, sink)?;
    writer.write_message_start()?;
    message.write_to(&mut writer)?;
    writer.write_message_end()?;
    writer.flush()
}

/// Merges one message read from `source` into `message`.
///
/// # Errors
///
/// Returns a dispatch error for an unknown content type, otherwise any
/// structural error from the input.
pub fn merge_message_from<R: Read>(
    options: &FormatOptions,
    content_type: &str,
    source: R,
    message: &mut dyn Message,
) -> Result<()> {
    let mut reader = resolve_reader(options, content_type, source)?;
    reader.read_message_start()?;
    merge_fields(&mut reader, message)?;
    reader.read_message_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatSettings;

    #[test]
    fn test_normalized_lookup_hits_same_factory() {
        let options = FormatOptions::new();
        for content_type in ["application/json", "application/json; charset=utf-8"] {
            let writer = resolve_writer(&options, content_type, Vec::new()).unwrap();
            assert!(matches!(writer, FormatWriter::Json(_)));
            let reader = resolve_reader(&options, content_type, &b"{}"[..]).unwrap();
            assert!(matches!(reader, FormatReader::Json(_)));
        }
    }

    #[test]
    fn test_unmapped_without_default_fails() {
        let options = FormatOptions::new();
        let err = resolve_writer(&options, "text/csv", Vec::new()).err().unwrap();
        assert!(err.is_dispatch_error());
        assert!(err.to_string().contains("text/csv"));
    }

    #[test]
    fn test_unmapped_with_default_falls_back() {
        let options = FormatOptions::new().with_default_content_type("application/xml");
        let writer = resolve_writer(&options, "text/csv", Vec::new()).unwrap();
        assert!(matches!(writer, FormatWriter::Xml(_)));
    }

    #[test]
    fn test_empty_default_is_ignored() {
        let options = FormatOptions::new().with_default_content_type(" ");
        assert!(resolve_reader(&options, "text/csv", &b""[..]).is_err());
    }

    #[test]
    fn test_unregistered_default_fails() {
        let options = FormatOptions::new().with_default_content_type("text/csv");
        assert!(resolve_writer(&options, "text/plain", Vec::new()).is_err());
    }

    #[test]
    fn test_writer_post_configured() {
        let settings = FormatSettings {
            formatted: true,
            xml_root_element: "doc".to_string(),
            ..FormatSettings::default()
        };
        let options = FormatOptions::from_settings(settings);
        let mut out = Vec::new();
        {
            let mut writer = resolve_writer(&options, "text/xml", &mut out).unwrap();
            writer.write_message_start().unwrap();
            writer.write_message_end().unwrap();
        }
        assert_eq!(out, b"<doc></doc>");

        let mut writer = resolve_writer(&options, "text/json", Vec::new()).unwrap();
        assert!(writer.as_json_mut().unwrap().is_formatted());
    }

    #[test]
    fn test_options_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FormatOptions>();
    }
}
