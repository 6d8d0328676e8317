//! Minimal XML element tree and the element-to-mapping conversion used by
//! the typed parsers. The service's documents are small, so the whole tree
//! is materialized before conversion.

mod error;

pub use error::XmlError;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// A converted value: either leaf text or a nested mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    Text(String),
    Map(XmlMap),
}

/// Flattened view of one element: attribute names and child tag names share
/// a single key namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlMap(HashMap<String, XmlValue>);

impl XmlMap {
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.0.get(key)
    }

    /// The value under `key`, if it is leaf text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(XmlValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// The value under `key`, if it is a nested mapping.
    pub fn map(&self, key: &str) -> Option<&XmlMap> {
        match self.0.get(key) {
            Some(XmlValue::Map(map)) => Some(map),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &XmlValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, key: String, value: XmlValue) {
        self.0.insert(key, value);
    }
}

/// One parsed XML element. Child order and repeated sibling tags are
/// preserved; callers that iterate repeats do so on the tree, not on the
/// converted mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All children with the given tag name, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn is_leaf(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    /// Flattens this element into a mapping: attributes merge directly into
    /// the output, leaf children become text values, other children convert
    /// recursively. A repeated tag name overwrites the earlier entry, and a
    /// child named `comment` is dropped.
    pub fn convert(&self) -> XmlMap {
        let mut out = XmlMap::default();

        for (key, value) in &self.attributes {
            out.insert(key.clone(), XmlValue::Text(value.clone()));
        }

        for child in &self.children {
            if child.name == "comment" {
                continue;
            }

            if child.is_leaf() {
                out.insert(child.name.clone(), XmlValue::Text(child.text.clone()));
            } else {
                out.insert(child.name.clone(), XmlValue::Map(child.convert()));
            }
        }

        out
    }
}

/// Parses a whole document into its root element.
pub fn parse_document(text: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            // Comments, declarations, processing instructions and doctypes
            // carry no forecast data.
            _ => {}
        }
    }

    root.ok_or(XmlError::MissingRoot)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let mut element = XmlElement {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        ..XmlElement::default()
    };

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
