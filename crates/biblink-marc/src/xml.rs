//! Minimal XML element tree with deterministic single-line serialization
//!
//! The tree deliberately exposes name, attributes and ordered children
//! directly instead of positional node indexing; record-level logic lives in
//! [`crate::record`].

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::MarcError;

/// Namespace prefix used by SRU-flavored MARC XML; stripped on parse.
const MARC_PREFIX: &str = "marc:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// One XML element: name, attributes in document order, ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn push_element(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }
}

fn strip_marc_prefix(name: &str) -> &str {
    name.strip_prefix(MARC_PREFIX).unwrap_or(name)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_from_start(start: &BytesStart<'_>) -> Element {
    let raw_name = String::from_utf8_lossy(start.name().as_ref()).to_string();
    let mut element = Element::new(strip_marc_prefix(&raw_name));
    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = String::from_utf8_lossy(&attr.value).to_string();
        element.attrs.push((key, value));
    }
    element
}

/// Parse an XML document into an element tree.
///
/// Whitespace-only text is dropped and remaining text is collapsed onto one
/// line, matching the single-line serialization contract. `marc:` prefixes
/// on element names are removed so SRU-delivered and API-delivered records
/// look alike to the record logic.
pub fn parse_document(xml: &str) -> Result<Element, MarcError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element_from_start(&e)),
            Event::Empty(e) => {
                attach(&mut stack, &mut root, Node::Element(element_from_start(&e)));
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(MarcError::Unbalanced)?;
                attach(&mut stack, &mut root, Node::Element(element));
            }
            Event::Text(t) => {
                let text = collapse_whitespace(&t.unescape()?);
                if !text.is_empty() {
                    if let Some(open) = stack.last_mut() {
                        open.children.push(Node::Text(text));
                    }
                }
            }
            Event::Eof => break,
            // declaration, comments, processing instructions and doctype
            // carry nothing the record logic needs
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(MarcError::Unbalanced);
    }
    root.ok_or(MarcError::EmptyDocument)
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, node: Node) {
    if let Some(open) = stack.last_mut() {
        open.children.push(node);
    } else if root.is_none() {
        if let Node::Element(e) = node {
            *root = Some(e);
        }
    }
}

/// Serialize an element tree as a single-line XML string without declaration.
///
/// Output is deterministic: attributes in stored order, canonical escaping,
/// self-closing tags for childless elements.
pub fn to_single_line_xml(root: &Element) -> Result<String, MarcError> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, root)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), MarcError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
