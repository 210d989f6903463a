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

//! XML reader.

use crate::codec::{FieldKey, StructuredReader, merge_fields, text};
use crate::error::{CodecError, Result};
use crate::schema::{
    EnumDescriptor, FieldDescriptor, Message, Scalar, ScalarKind, TextValue, UnknownFieldSet,
};
use std::io::Read;

use super::{DEFAULT_ROOT_ELEMENT, ITEM_ELEMENT, is_xml_name};

/// Deepest element nesting accepted in input.
const MAX_DEPTH: usize = 128;

/// A [`StructuredReader`] over XML.
///
/// The document is read and parsed into an element tree when the message
/// starts. Child elements of the root are fields; self-closing elements of
/// known fields are treated as absent, unknown ones are recorded as null. Attributes, comments, processing instructions and the
/// XML declaration are ignored, and CDATA sections are read as text.
pub struct XmlReader<R: Read> {
    source: Option<R>,
    root: String,
    frames: Vec<std::vec::IntoIter<Element>>,
    pending: Option<Element>,
}

impl<R: Read> XmlReader<R> {
    /// Creates a reader over `source` expecting the default root element.
    pub fn new(source: R) -> Self {
        Self {
            source: Some(source),
            root: DEFAULT_ROOT_ELEMENT.to_string(),
            frames: Vec::new(),
            pending: None,
        }
    }

    /// Builder form of [`set_root_element`](Self::set_root_element).
    #[must_use]
    pub fn with_root_element(mut self, name: impl Into<String>) -> Self {
        self.set_root_element(name);
        self
    }

    /// Sets the root element name the document must use.
    pub fn set_root_element(&mut self, name: impl Into<String>) {
        self.root = name.into();
    }

    fn take_pending(&mut self) -> Result<Element> {
        self.pending
            .take()
            .ok_or_else(|| CodecError::structure("no field value is pending"))
    }
}

fn text_of(field: &FieldDescriptor, element: Element) -> Result<String> {
    if element.children.is_empty() {
        Ok(element.text)
    } else {
        Err(CodecError::invalid_value(
            field.name(),
            "expected text, found child elements",
        ))
    }
}

impl<R: Read> StructuredReader for XmlReader<R> {
    fn read_message_start(&mut self) -> Result<()> {
        let mut source = self
            .source
            .take()
            .ok_or_else(|| CodecError::structure("the message has already been read"))?;
        let mut document = String::new();
        source.read_to_string(&mut document)?;
        let root = Parser::new(&document).parse_document()?;
        if root.name != self.root {
            return Err(CodecError::structure(format!(
                "expected root element <{}>, found <{}>",
                self.root, root.name
            )));
        }
        self.frames.push(root.children.into_iter());
        Ok(())
    }

    fn read_message_end(&mut self) -> Result<()> {
        if self.frames.len() != 1 {
            return Err(CodecError::structure("message end without a matching start"));
        }
        self.frames.clear();
        Ok(())
    }

    fn read_field_key(&mut self) -> Result<Option<FieldKey>> {
        let children = self
            .frames
            .last_mut()
            .ok_or_else(|| CodecError::structure("no element is open"))?;
        match children.next() {
            Some(mut element) => {
                let name = std::mem::take(&mut element.name);
                self.pending = Some(element);
                Ok(Some(FieldKey::Name(name)))
            }
            None => Ok(None),
        }
    }

    fn read_scalar(
        &mut self,
        field: &FieldDescriptor,
        kind: ScalarKind,
    ) -> Result<Scalar<'static>> {
        let element = self.take_pending()?;
        text::parse_scalar(field.name(), kind, &text_of(field, element)?)
    }

    fn read_enum(&mut self, field: &FieldDescriptor, descriptor: &EnumDescriptor) -> Result<i32> {
        let element = self.take_pending()?;
        text::parse_enum(field.name(), descriptor, &text_of(field, element)?)
    }

    fn read_message(&mut self, _field: &FieldDescriptor, message: &mut dyn Message) -> Result<()> {
        let element = self.take_pending()?;
        self.frames.push(element.children.into_iter());
        let depth = self.frames.len();
        let merged = merge_fields(self, message);
        self.frames.truncate(depth - 1);
        merged
    }

    fn read_array(
        &mut self,
        _field: &FieldDescriptor,
        element: &mut dyn FnMut(&mut dyn StructuredReader) -> Result<()>,
    ) -> Result<()> {
        let container = self.take_pending()?;
        for item in container.children {
            if item.self_closing {
                continue;
            }
            self.pending = Some(item);
            element(self)?;
        }
        Ok(())
    }

    fn skip_field(&mut self, key: &FieldKey, unknown: &mut UnknownFieldSet) -> Result<()> {
        let element = self.take_pending()?;
        unknown.push_text(key.to_string(), to_text_value(element));
        Ok(())
    }

    fn skip_absent(&mut self) -> bool {
        if self.pending.as_ref().is_some_and(|element| element.self_closing) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

fn to_text_value(element: Element) -> TextValue {
    if element.self_closing {
        TextValue::Null
    } else if element.children.is_empty() {
        TextValue::String(element.text)
    } else if element.children.iter().all(|child| child.name == ITEM_ELEMENT) {
        TextValue::Array(element.children.into_iter().map(to_text_value).collect())
    } else {
        TextValue::Object(
            element
                .children
                .into_iter()
                .map(|mut child| (std::mem::take(&mut child.name), to_text_value(child)))
                .collect(),
        )
    }
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
    self_closing: bool,
}

/// A cursor over the document text.
struct Parser<'a> {
    input: &'a str,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn parse_document(&mut self) -> Result<Element> {
        self.skip_misc()?;
        if !self.rest().starts_with('<') {
            return Err(CodecError::structure("expected a root element"));
        }
        let root = self.parse_element()?;
        self.skip_misc()?;
        if !self.rest().is_empty() {
            return Err(CodecError::structure("content after the root element"));
        }
        Ok(root)
    }

    /// Skips whitespace, comments, processing instructions and doctypes.
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.position += rest.len() - trimmed.len();
            if trimmed.starts_with("<?") {
                self.skip_past("?>")?;
            } else if trimmed.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if trimmed.starts_with("<!") && !trimmed.starts_with("<![CDATA[") {
                self.skip_past(">")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_past(&mut self, terminator: &str) -> Result<&'a str> {
        let rest = self.rest();
        match rest.find(terminator) {
            Some(index) => {
                self.position += index + terminator.len();
                Ok(&rest[..index])
            }
            None => Err(CodecError::UnexpectedEof {
                context: "XML markup",
            }),
        }
    }

    fn read_name(&mut self) -> Result<&'a str> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '>' | '/' | '='))
            .unwrap_or(rest.len());
        let name = &rest[..end];
        if !is_xml_name(name) {
            return Err(CodecError::structure(format!("{name:?} is not a valid XML name")));
        }
        self.position += end;
        Ok(name)
    }

    /// Skips whitespace and returns how much was skipped.
    fn skip_whitespace(&mut self) -> usize {
        let rest = self.rest();
        let skipped = rest.len() - rest.trim_start().len();
        self.position += skipped;
        skipped
    }

    fn expect(&mut self, token: char, context: &'static str) -> Result<()> {
        match self.rest().chars().next() {
            Some(c) if c == token => {
                self.position += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(CodecError::structure(format!(
                "expected '{token}' in {context}, found '{c}'"
            ))),
            None => Err(CodecError::UnexpectedEof { context }),
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CodecError::structure("elements nested too deeply"));
        }
        self.position += 1;
        let mut element = Element {
            name: self.read_name()?.to_string(),
            ..Element::default()
        };
        if self.skip_attributes()? {
            element.self_closing = true;
            self.depth -= 1;
            return Ok(element);
        }

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(CodecError::UnexpectedEof {
                    context: "XML element",
                });
            }
            if rest.starts_with("</") {
                self.position += 2;
                let name = self.read_name()?;
                self.skip_whitespace();
                self.expect('>', "XML end tag")?;
                if name != element.name {
                    return Err(CodecError::structure(format!(
                        "<{}> closed by </{name}>",
                        element.name
                    )));
                }
                break;
            } else if rest.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if rest.starts_with("<![CDATA[") {
                self.position += "<![CDATA[".len();
                let data = self.skip_past("]]>")?;
                element.text.push_str(data);
            } else if rest.starts_with("<?") {
                self.skip_past("?>")?;
            } else if rest.starts_with('<') {
                element.children.push(self.parse_element()?);
            } else {
                let end = rest.find('<').unwrap_or(rest.len());
                decode_entities(&rest[..end], &mut element.text)?;
                self.position += end;
            }
        }
        self.depth -= 1;
        Ok(element)
    }

    /// Skips `name="value"` attributes up to the end of a start tag. Returns
    /// `true` for a self-closing tag.
    fn skip_attributes(&mut self) -> Result<bool> {
        loop {
            let separated = self.skip_whitespace() > 0;
            let rest = self.rest();
            if rest.starts_with('>') {
                self.position += 1;
                return Ok(false);
            }
            if rest.starts_with("/>") {
                self.position += 2;
                return Ok(true);
            }
            if rest.is_empty() {
                return Err(CodecError::UnexpectedEof {
                    context: "XML start tag",
                });
            }
            if !separated {
                return Err(CodecError::structure("expected whitespace before an attribute"));
            }
            self.read_name()?;
            self.skip_whitespace();
            self.expect('=', "XML attribute")?;
            self.skip_whitespace();
            let quote = match self.rest().chars().next() {
                Some(c @ ('"' | '\'')) => c,
                Some(_) => return Err(CodecError::structure("attribute value must be quoted")),
                None => {
                    return Err(CodecError::UnexpectedEof {
                        context: "XML attribute",
                    });
                }
            };
            self.position += 1;
            self.skip_past(&quote.to_string())?;
        }
    }
}

/// Appends `raw` to `out` with entity and character references resolved.
fn decode_entities(raw: &str, out: &mut String) -> Result<()> {
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find(';')
            .ok_or_else(|| CodecError::structure("unterminated entity reference"))?;
        let entity = &after[..end];
        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(decimal) = entity.strip_prefix('#') {
                    decimal.parse().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32).ok_or_else(|| {
                    CodecError::structure(format!("unknown entity &{entity};"))
                })?
            }
        };
        out.push(decoded);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Element> {
        Parser::new(xml).parse_document()
    }

    #[test]
    fn test_parse_tree() {
        let root = parse(
            "<?xml version=\"1.0\"?>\n<!-- note -->\n<root a=\"1>\"><x>1</x><y/><z><item>a</item></z></root>\n",
        )
        .unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0].text, "1");
        assert!(root.children[1].self_closing);
        assert_eq!(root.children[2].children[0].text, "a");
    }

    #[test]
    fn test_entities_and_cdata() {
        let root = parse("<root>&lt;&amp;&#65;&#x42;<![CDATA[<raw>]]></root>").unwrap();
        assert_eq!(root.text, "<&AB<raw>");
        assert!(parse("<root>&bogus;</root>").is_err());
    }

    #[test]
    fn test_structural_errors() {
        assert!(parse("<root><a></b></root>").unwrap_err().is_structural_error());
        assert!(matches!(
            parse("<root><a>").unwrap_err(),
            CodecError::UnexpectedEof { .. }
        ));
        assert!(parse("<root/><extra/>").is_err());
        assert!(parse("text").is_err());
    }

    #[test]
    fn test_invalid_names_are_structural() {
        for xml in [
            "<root><a<b>v</a<b></root>",
            "<root><x y>w</x y></root>",
            "<root><1a>v</1a></root>",
            "<root><a>v</a x></root>",
            "<root a=1></root>",
        ] {
            assert!(parse(xml).unwrap_err().is_structural_error(), "{xml}");
        }
        let root = parse("<root  a = 'x' b=\"y\" ><c/></root>").unwrap();
        assert!(root.children[0].self_closing);
    }

    #[test]
    fn test_depth_limit() {
        let deep = "<a>".repeat(MAX_DEPTH + 1);
        assert!(parse(&deep).is_err());
    }

    #[test]
    fn test_root_name_checked() {
        let mut reader = XmlReader::new("<point></point>".as_bytes());
        assert!(reader.read_message_start().is_err());
        let mut reader = XmlReader::new("<point></point>".as_bytes()).with_root_element("point");
        reader.read_message_start().unwrap();
        assert_eq!(reader.read_field_key().unwrap(), None);
        reader.read_message_end().unwrap();
    }

    #[test]
    fn test_self_closing_unknown_recorded() {
        let descriptor = std::sync::Arc::new(
            crate::schema::MessageDescriptor::new(
                "test.Item",
                vec![
                    FieldDescriptor::scalar("id", 1, ScalarKind::Int64),
                    FieldDescriptor::scalar("label", 2, ScalarKind::String),
                ],
            )
            .unwrap(),
        );
        let mut message = crate::schema::DynamicMessage::new(descriptor);
        let mut reader = XmlReader::new("<root><id>1</id><label/><future/></root>".as_bytes());
        reader.read_message_start().unwrap();
        merge_fields(&mut reader, &mut message).unwrap();
        reader.read_message_end().unwrap();
        assert!(!message.has("label"));
        let unknown: Vec<_> = message.unknown_fields().text_fields().collect();
        assert_eq!(unknown, [("future", &TextValue::Null)]);
    }

    #[test]
    fn test_unknown_values() {
        let root = parse("<root><o><a>1</a><b/></o><l><item>x</item></l></root>").unwrap();
        let mut children = root.children.into_iter();
        let object = to_text_value(children.next().unwrap());
        assert_eq!(
            object,
            TextValue::Object(vec![
                ("a".to_string(), TextValue::String("1".to_string())),
                ("b".to_string(), TextValue::Null),
            ])
        );
        let list = to_text_value(children.next().unwrap());
        assert_eq!(list, TextValue::Array(vec![TextValue::String("x".to_string())]));
    }
}
