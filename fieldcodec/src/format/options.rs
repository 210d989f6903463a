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

//! Dispatch configuration.

use crate::codec::xml::DEFAULT_ROOT_ELEMENT;
use crate::error::Result;
use crate::format::dispatch::{
    ReaderFactory, WriterFactory, binary_reader, binary_writer, json_reader, json_writer,
    xml_reader, xml_writer,
};
use crate::format::{
    BINARY_CONTENT_TYPES, JSON_CONTENT_TYPES, XML_CONTENT_TYPES, normalize_content_type,
};
use crate::schema::ExtensionRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Plain-data format settings, loadable from configuration files.
///
/// Missing keys take their defaults, so `{}` is a valid settings document.
///
/// # Examples
///
/// ```rust
/// use fieldcodec::format::FormatSettings;
///
/// let settings = FormatSettings::from_json_str(
///     r#"{ "default_content_type": "application/json", "formatted": true }"#,
/// )?;
/// assert!(settings.formatted);
/// assert_eq!(settings.xml_root_element, "root");
/// # Ok::<(), fieldcodec::CodecError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Content type used when a requested one is not registered.
    ///
    /// `None` or an empty string disables the fallback, so unknown content
    /// types fail to resolve.
    ///
    /// Default: None
    pub default_content_type: Option<String>,

    /// Produce indented, one-field-per-line JSON and XML.
    ///
    /// Default: false
    pub formatted: bool,

    /// Name of the XML element enclosing the top-level message, for both
    /// writing and reading.
    ///
    /// Default: "root"
    pub xml_root_element: String,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            default_content_type: None,
            formatted: false,
            xml_root_element: DEFAULT_ROOT_ELEMENT.to_string(),
        }
    }
}

impl FormatSettings {
    /// Parses settings from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`](crate::CodecError::Json) for malformed
    /// JSON or mistyped keys.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Everything content-type dispatch needs: the factory tables, the
/// settings, and the extension registry for binary input.
///
/// Options are built once and then only read, so one instance can serve any
/// number of concurrent resolutions.
///
/// # Examples
///
/// ```rust
/// use fieldcodec::format::FormatOptions;
///
/// let options = FormatOptions::new()
///     .with_default_content_type("application/json")
///     .with_formatted(true);
/// assert!(options.supports_writer("text/xml; charset=utf-8"));
/// assert!(!options.supports_writer("text/csv"));
/// ```
#[derive(Clone)]
pub struct FormatOptions {
    /// Format settings.
    ///
    /// Default: [`FormatSettings::default`]
    pub settings: FormatSettings,

    /// Extensions consulted by binary readers for undeclared field numbers.
    ///
    /// Default: None
    pub extension_registry: Option<Arc<ExtensionRegistry>>,

    pub(crate) writers: HashMap<String, WriterFactory>,
    pub(crate) readers: HashMap<String, ReaderFactory>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writers: Vec<_> = self.writers.keys().collect();
        writers.sort();
        let mut readers: Vec<_> = self.readers.keys().collect();
        readers.sort();
        f.debug_struct("FormatOptions")
            .field("settings", &self.settings)
            .field("extension_registry", &self.extension_registry)
            .field("writers", &writers)
            .field("readers", &readers)
            .finish()
    }
}

impl FormatOptions {
    /// Creates options with the JSON, XML and binary codecs registered under
    /// their usual content types and default settings.
    #[must_use]
    pub fn new() -> Self {
        let mut options = Self::empty();
        for content_type in JSON_CONTENT_TYPES {
            options = options
                .register_writer(content_type, json_writer)
                .register_reader(content_type, json_reader);
        }
        for content_type in XML_CONTENT_TYPES {
            options = options
                .register_writer(content_type, xml_writer)
                .register_reader(content_type, xml_reader);
        }
        for content_type in BINARY_CONTENT_TYPES {
            options = options
                .register_writer(content_type, binary_writer)
                .register_reader(content_type, binary_reader);
        }
        options
    }

    /// Creates options with no codecs registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            settings: FormatSettings::default(),
            extension_registry: None,
            writers: HashMap::new(),
            readers: HashMap::new(),
        }
    }

    /// Creates options with the built-in codecs and the given settings.
    #[must_use]
    pub fn from_settings(settings: FormatSettings) -> Self {
        Self {
            settings,
            ..Self::new()
        }
    }

    /// Sets the fallback content type.
    #[must_use]
    pub fn with_default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.settings.default_content_type = Some(content_type.into());
        self
    }

    /// Enables or disables formatted JSON and XML output.
    #[must_use]
    pub fn with_formatted(mut self, formatted: bool) -> Self {
        self.settings.formatted = formatted;
        self
    }

    /// Sets the XML root element name.
    #[must_use]
    pub fn with_xml_root_element(mut self, name: impl Into<String>) -> Self {
        self.settings.xml_root_element = name.into();
        self
    }

    /// Sets the extension registry used by binary readers.
    #[must_use]
    pub fn with_extension_registry(mut self, registry: Arc<ExtensionRegistry>) -> Self {
        self.extension_registry = Some(registry);
        self
    }

    /// Registers (or replaces) the writer for a content type. Parameters
    /// after `;` in `content_type` are ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fieldcodec::format::{FormatOptions, FormatWriter, Sink};
    /// use fieldcodec::codec::binary::BinaryWriter;
    ///
    /// fn proto(sink: Sink<'_>) -> FormatWriter<'_> {
    ///     FormatWriter::Binary(BinaryWriter::new(sink))
    /// }
    ///
    /// let options = FormatOptions::empty().register_writer("application/x-proto3", proto);
    /// assert!(options.supports_writer("application/x-proto3"));
    /// ```
    #[must_use]
    pub fn register_writer(mut self, content_type: &str, factory: WriterFactory) -> Self {
        self.writers
            .insert(normalize_content_type(content_type).to_string(), factory);
        self
    }

    /// Registers (or replaces) the reader for a content type.
    #[must_use]
    pub fn register_reader(mut self, content_type: &str, factory: ReaderFactory) -> Self {
        self.readers
            .insert(normalize_content_type(content_type).to_string(), factory);
        self
    }

    /// Returns `true` if a writer is registered for `content_type` itself,
    /// without the default fallback.
    #[must_use]
    pub fn supports_writer(&self, content_type: &str) -> bool {
        self.writers
            .contains_key(normalize_content_type(content_type))
    }

    /// Returns `true` if a reader is registered for `content_type` itself,
    /// without the default fallback.
    #[must_use]
    pub fn supports_reader(&self, content_type: &str) -> bool {
        self.readers
            .contains_key(normalize_content_type(content_type))
    }
}
