//! Tree loader built on quick-xml events.

use super::{Attribute, Element, Node, XmlTree};
use crate::error::{Error, Result};
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Reader;

const UTF8_BOM: &str = "\u{feff}";

/// Deepest element nesting accepted by the loader.
///
/// Tree walkers recurse once per level, so deeper input is rejected as
/// malformed instead of exhausting the stack.
pub const MAX_DEPTH: usize = 1024;

/// Parse an XML document from a string.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the markup is malformed, truncated, nested
/// deeper than [`MAX_DEPTH`], or has no root element.
pub fn parse_str(content: &str) -> Result<XmlTree> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    TreeBuilder::new(content).build()
}

/// Parse an XML document from UTF-8 bytes.
///
/// # Errors
///
/// Returns [`Error::Encoding`] for invalid UTF-8 and [`Error::Parse`] for
/// malformed markup.
pub fn parse_bytes(data: &[u8]) -> Result<XmlTree> {
    let content = std::str::from_utf8(data)?;
    parse_str(content)
}

/// Parser state: the reader plus the stack of open elements.
struct TreeBuilder<'a> {
    reader: Reader<&'a [u8]>,
    stack: Vec<Element>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        // Whitespace between inline elements is content in TEI.
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        Self {
            reader,
            stack: Vec::new(),
        }
    }

    fn build(mut self) -> Result<XmlTree> {
        let mut root: Option<Element> = None;

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    if self.stack.len() >= MAX_DEPTH {
                        return Err(Error::Parse {
                            message: format!("element nesting exceeds {} levels", MAX_DEPTH),
                            position: Some(self.reader.buffer_position()),
                        });
                    }
                    let element = self.open_element(&e)?;
                    self.stack.push(element);
                }
                Ok(Event::End(e)) => {
                    let element = self.close_element(&e)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.open_element(&e)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Text(e)) => self.handle_text(&e)?,
                Ok(Event::CData(e)) => self.handle_cdata(&e),
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Parse {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(Error::parse(format!(
                "unexpected end of input: expected closing tag </{}>",
                open.name
            )));
        }

        root.map(|root| XmlTree { root })
            .ok_or_else(|| Error::parse("document has no root element"))
    }

    fn attach(&mut self, element: Element, root: &mut Option<Element>) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(Node::Element(element));
                Ok(())
            }
            None if root.is_some() => Err(Error::parse(format!(
                "multiple root elements: unexpected <{}>",
                element.name
            ))),
            None => {
                *root = Some(element);
                Ok(())
            }
        }
    }

    fn open_element(&self, e: &BytesStart<'_>) -> Result<Element> {
        let (name, prefix) = split_name(e.name().as_ref());
        let mut attributes = Vec::new();

        for attr in e.attributes() {
            let attr = attr.map_err(|err| Error::parse(format!("invalid attribute: {}", err)))?;
            let (attr_name, attr_prefix) = split_name(attr.key.as_ref());
            // Namespace declarations carry no content.
            if attr_name == "xmlns" || attr_prefix.as_deref() == Some("xmlns") {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|err| Error::parse(format!("invalid attribute value: {}", err)))?;
            attributes.push(Attribute {
                name: attr_name,
                prefix: attr_prefix,
                value: value.into_owned(),
            });
        }

        Ok(Element {
            name,
            prefix,
            attributes,
            children: Vec::new(),
        })
    }

    fn close_element(&mut self, e: &BytesEnd<'_>) -> Result<Element> {
        let (end_name, _) = split_name(e.name().as_ref());
        let element = self
            .stack
            .pop()
            .ok_or_else(|| Error::parse(format!("unexpected closing tag </{}>", end_name)))?;

        if element.name != end_name {
            return Err(Error::parse(format!(
                "mismatched closing tag: expected </{}>, found </{}>",
                element.name, end_name
            )));
        }
        Ok(element)
    }

    fn handle_text(&mut self, e: &BytesText<'_>) -> Result<()> {
        let text = e
            .unescape()
            .map_err(|err| Error::parse(format!("invalid text content: {}", err)))?;
        // Text outside the root element (prolog whitespace) is dropped.
        if let Some(parent) = self.stack.last_mut() {
            push_text(parent, &text);
        }
        Ok(())
    }

    fn handle_cdata(&mut self, e: &BytesCData<'_>) {
        let text = String::from_utf8_lossy(e.as_ref());
        if let Some(parent) = self.stack.last_mut() {
            push_text(parent, &text);
        }
    }
}

/// Append text, merging with a preceding text node.
fn push_text(parent: &mut Element, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = parent.children.last_mut() {
        last.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_string()));
    }
}

/// Split a qualified name into (local name, prefix).
fn split_name(raw: &[u8]) -> (String, Option<String>) {
    let full = String::from_utf8_lossy(raw);
    match full.split_once(':') {
        Some((prefix, local)) => (local.to_string(), Some(prefix.to_string())),
        None => (full.into_owned(), None),
    }
}
