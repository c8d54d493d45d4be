//! Minimal owned XML tree built on `quick-xml`.
//!
//! OOXML parts are small enough to be edited in memory. The tree keeps element
//! names exactly as written (including namespace prefixes), attribute order,
//! text and every other event (declaration, comments, CDATA, processing
//! instructions) so that a parse/write cycle reproduces an equivalent document.
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Any other event, written back verbatim.
    Other(Event<'static>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Name without the namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Qualified name for a sibling element in the same namespace, e.g. `w:br` for `w:t`.
    pub fn sibling_name(&self, local: &str) -> String {
        match self.name.rsplit_once(':') {
            Some((prefix, _)) => format!("{prefix}:{local}"),
            None => local.to_string(),
        }
    }

    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, key: &str) {
        self.attrs.retain(|(k, _)| k != key);
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child(&self, local: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(local))
    }

    pub fn child_mut(&mut self, local: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.is(local))
    }

    /// Depth-first search for the first descendant with the given local name.
    pub fn find_mut(&mut self, local: &str) -> Option<&mut Element> {
        if self.is(local) {
            return Some(self);
        }
        self.elements_mut().find_map(|e| e.find_mut(local))
    }

    pub fn find(&self, local: &str) -> Option<&Element> {
        if self.is(local) {
            return Some(self);
        }
        self.elements().find_map(|e| e.find(local))
    }

    /// Direct text content (text nodes of this element only).
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                Node::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.retain(|c| !matches!(c, Node::Text(_)));
        self.children.insert(0, Node::Text(text.into()));
    }
}

/// A parsed XML part: top-level events around a single root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub prolog: Vec<Node>,
    pub root: Element,
    pub epilog: Vec<Node>,
}

impl Document {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<Element> = None;
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let node = match reader.read_event()? {
                Event::Start(ref e) => {
                    stack.push(element_from_start(e)?);
                    continue;
                }
                Event::End(_) => {
                    let done = stack
                        .pop()
                        .ok_or_else(|| Error::package("unbalanced end tag"))?;
                    Node::Element(done)
                }
                Event::Empty(ref e) => Node::Element(element_from_start(e)?),
                Event::Text(ref t) => Node::Text(t.unescape()?.into_owned()),
                Event::Eof => break,
                other => Node::Other(other.into_owned()),
            };

            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
                continue;
            }
            match node {
                Node::Element(e) if root.is_none() => root = Some(e),
                Node::Element(_) => return Err(Error::package("multiple root elements")),
                // whitespace between top-level events
                Node::Text(t) if t.trim().is_empty() => {}
                other if root.is_none() => prolog.push(other),
                other => epilog.push(other),
            }
        }

        if !stack.is_empty() {
            return Err(Error::package("unclosed element"));
        }
        let root = root.ok_or_else(|| Error::package("document has no root element"))?;
        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }
        Ok(writer.into_inner())
    }
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr?;
        element.attrs.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            attr.unescape_value()?.into_owned(),
        ));
    }
    Ok(element)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(e) => write_element(writer, e)?,
        Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
        Node::Other(event) => writer.write_event(event.clone())?,
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
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
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
