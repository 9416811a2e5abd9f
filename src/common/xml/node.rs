//! Owned XML element tree.
//!
//! Parts are edited structurally (clone a shape, splice it into another tree,
//! drop a child) rather than through streaming rewrites, so this module keeps a
//! small owned tree built from quick-xml events. Text and attribute values are
//! stored in their escaped source form: a parsed tree serializes back without
//! re-encoding anything it did not touch, and accessors unescape on read.
//!
//! Names are kept qualified (`p:sp`, `a:t`) exactly as they appear in the
//! source. Lookups by *local* name ignore the prefix.

use crate::common::xml::escape::{escape_xml, unescape_xml};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Errors raised while building a tree from XML bytes.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("XML parse error at byte {position}: {message}")]
    Parse { position: u64, message: String },

    #[error("Invalid UTF-8 in XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Unclosed element <{0}>")]
    Unclosed(String),
}

/// A node in an element's child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Child element
    Element(XmlElement),
    /// Character data, escaped
    Text(String),
    /// CDATA section content
    CData(String),
    /// Comment content
    Comment(String),
}

/// An element with its attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    /// (qualified name, escaped value) in source order
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

/// Local part of a qualified name.
#[inline]
pub fn local_name_of(qname: &str) -> &str {
    match qname.rfind(':') {
        Some(pos) => &qname[pos + 1..],
        None => qname,
    }
}

impl XmlElement {
    /// Create an element with no attributes or children.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder form of [`push`](Self::push).
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.push(child);
        self
    }

    /// Builder form of [`set_text`](Self::set_text).
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Parse a standalone element, e.g. a shape fragment built from a string.
    pub fn parse_fragment(xml: &str) -> Result<Self, XmlError> {
        Ok(XmlDocument::parse(xml.as_bytes())?.root)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        local_name_of(&self.name)
    }

    /// Namespace prefix of this element, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.rfind(':').map(|pos| &self.name[..pos])
    }

    /// Unescaped value of the attribute with this qualified name.
    pub fn attr(&self, key: &str) -> Option<String> {
        self.raw_attr(key).map(unescape_xml)
    }

    /// Escaped value of the attribute with this qualified name.
    pub fn raw_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, escaping `value`. Existing attributes keep their position.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        let escaped = escape_xml(value);
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = escaped,
            None => self.attributes.push((key.to_string(), escaped)),
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, key: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(k, _)| k != key);
        before != self.attributes.len()
    }

    /// Attributes as (qualified name, escaped value).
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    /// Element children in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Mutable element children in document order.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with this local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.local_name() == local)
    }

    /// First child element with this local name, mutably.
    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|e| e.local_name() == local)
    }

    /// Descend through first children matching each local name in `path`.
    pub fn find(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |el, local| el.child(local))
    }

    /// Mutable form of [`find`](Self::find).
    pub fn find_mut(&mut self, path: &[&str]) -> Option<&mut XmlElement> {
        let mut current = self;
        for local in path {
            current = current.child_mut(local)?;
        }
        Some(current)
    }

    /// Index into `children()` of the first element with this local name.
    pub fn position(&self, local: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(e) if e.local_name() == local))
    }

    /// All descendant elements (excluding self) with this local name, in document order.
    pub fn descendants<'a>(&'a self, local: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        self.collect_descendants(local, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, local: &str, found: &mut Vec<&'a XmlElement>) {
        for el in self.elements() {
            if el.local_name() == local {
                found.push(el);
            }
            el.collect_descendants(local, found);
        }
    }

    /// Visit this element and every descendant element, parents first.
    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut XmlElement)) {
        f(self);
        for el in self.elements_mut() {
            el.visit_mut(f);
        }
    }

    /// Concatenated, unescaped character data of the direct children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(t) => out.push_str(&unescape_xml(t)),
                XmlNode::CData(t) => out.push_str(t),
                _ => {},
            }
        }
        out
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(XmlNode::Text(escape_xml(text)));
        }
    }

    /// Append a child element, taking ownership of it.
    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Insert a child element at an index into `children()`.
    pub fn insert(&mut self, index: usize, child: XmlElement) {
        let index = index.min(self.children.len());
        self.children.insert(index, XmlNode::Element(child));
    }

    /// Insert a child element before the first child with local name `before`,
    /// or append when there is none.
    pub fn insert_before(&mut self, child: XmlElement, before: &str) {
        match self.position(before) {
            Some(pos) => self.children.insert(pos, XmlNode::Element(child)),
            None => self.push(child),
        }
    }

    /// Remove the child node at an index into `children()`.
    pub fn remove_child(&mut self, index: usize) -> Option<XmlNode> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Remove every child element with this local name. Returns how many were removed.
    pub fn remove_elements(&mut self, local: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, XmlNode::Element(e) if e.local_name() == local));
        before - self.children.len()
    }

    /// First child with this local name, inserting `qname` as the first child
    /// when there is none. Used for property elements (`a:pPr`, `a:rPr`)
    /// which must lead their parent.
    pub fn get_or_insert_first(&mut self, qname: &str) -> &mut XmlElement {
        let local = local_name_of(qname);
        let pos = match self.position(local) {
            Some(pos) => pos,
            None => {
                self.children.insert(0, XmlNode::Element(XmlElement::new(qname)));
                0
            },
        };
        match &mut self.children[pos] {
            XmlNode::Element(e) => e,
            _ => unreachable!("position() only reports element children"),
        }
    }

    fn push_raw_text(&mut self, raw: &str) {
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(raw);
        } else {
            self.children.push(XmlNode::Text(raw.to_string()));
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let mut element = XmlElement::new(std::str::from_utf8(start.name().as_ref())?);
        for attr in start.attributes().with_checks(false) {
            let attr = attr.map_err(|e| XmlError::Parse {
                position: 0,
                message: e.to_string(),
            })?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = std::str::from_utf8(attr.value.as_ref())?;
            element
                .attributes
                .push((key.to_string(), value.to_string()));
        }
        Ok(element)
    }

    /// Serialize this element and its subtree.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::with_capacity(256);
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            // A raw '"' can only come from a single-quoted source attribute
            if value.contains('"') {
                out.push_str("='");
                out.push_str(value);
                out.push('\'');
            } else {
                out.push_str("=\"");
                out.push_str(value);
                out.push('"');
            }
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.write_to(out),
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::CData(t) => {
                    out.push_str("<![CDATA[");
                    out.push_str(t);
                    out.push_str("]]>");
                },
                XmlNode::Comment(t) => {
                    out.push_str("<!--");
                    out.push_str(t);
                    out.push_str("-->");
                },
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// A parsed XML part: the root element plus a standard declaration on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    /// Build a tree from XML bytes.
    ///
    /// Whitespace and comments outside the root element are dropped, as are
    /// processing instructions and the doctype.
    pub fn parse(bytes: &[u8]) -> Result<Self, XmlError> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<XmlElement> = Vec::with_capacity(16);
        let mut root: Option<XmlElement> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(XmlError::Parse {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    });
                },
            };
            match event {
                Event::Start(ref e) => stack.push(XmlElement::from_start(e)?),
                Event::Empty(ref e) => {
                    let element = XmlElement::from_start(e)?;
                    Self::attach(&mut stack, &mut root, element);
                },
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        Self::attach(&mut stack, &mut root, element);
                    }
                },
                Event::Text(ref e) => {
                    if let Some(top) = stack.last_mut() {
                        top.push_raw_text(std::str::from_utf8(e)?);
                    }
                },
                // quick-xml reports entity and character references separately from text
                Event::GeneralRef(ref e) => {
                    if let Some(top) = stack.last_mut() {
                        let name = std::str::from_utf8(e)?;
                        top.push_raw_text(&format!("&{};", name));
                    }
                },
                Event::CData(ref e) => {
                    if let Some(top) = stack.last_mut() {
                        top.children
                            .push(XmlNode::CData(std::str::from_utf8(e)?.to_string()));
                    }
                },
                Event::Comment(ref e) => {
                    if let Some(top) = stack.last_mut() {
                        top.children
                            .push(XmlNode::Comment(std::str::from_utf8(e)?.to_string()));
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name));
        }
        root.map(Self::new).ok_or(XmlError::MissingRoot)
    }

    fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
        if let Some(parent) = stack.last_mut() {
            parent.push(element);
        } else if root.is_none() {
            *root = Some(element);
        }
    }

    #[inline]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Serialize with a standalone UTF-8 declaration.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::with_capacity(4096);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        self.root.write_to(&mut out);
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: &str = r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title &amp; Co"/></p:nvSpPr><p:txBody><a:bodyPr/><a:p><a:r><a:t>R&amp;D &#8211; plan</a:t></a:r></a:p></p:txBody></p:sp>"#;

    #[test]
    fn test_round_trip_keeps_escapes() {
        let el = XmlElement::parse_fragment(SHAPE).unwrap();
        assert_eq!(el.to_xml_string(), SHAPE);
    }

    #[test]
    fn test_text_and_attr_unescape() {
        let el = XmlElement::parse_fragment(SHAPE).unwrap();
        let t = el.find(&["txBody", "p", "r", "t"]).unwrap();
        assert_eq!(t.text(), "R&D \u{2013} plan");
        let c_nv_pr = el.find(&["nvSpPr", "cNvPr"]).unwrap();
        assert_eq!(c_nv_pr.attr("name").as_deref(), Some("Title & Co"));
        assert_eq!(c_nv_pr.raw_attr("name"), Some("Title &amp; Co"));
    }

    #[test]
    fn test_set_attr_and_text_escape() {
        let mut el = XmlElement::new("a:t").with_attr("k", "1 < 2");
        el.set_text("a & b");
        assert_eq!(el.to_xml_string(), r#"<a:t k="1 &lt; 2">a &amp; b</a:t>"#);
        el.set_attr("k", "x");
        assert_eq!(el.attr("k").as_deref(), Some("x"));
        assert!(el.remove_attr("k"));
        assert!(!el.remove_attr("k"));
    }

    #[test]
    fn test_insert_before_and_remove() {
        let mut tree =
            XmlElement::parse_fragment(r#"<p:spTree><p:sp/><p:extLst/></p:spTree>"#).unwrap();
        tree.insert_before(XmlElement::new("p:pic"), "extLst");
        let names: Vec<_> = tree.elements().map(|e| e.name().to_string()).collect();
        assert_eq!(names, ["p:sp", "p:pic", "p:extLst"]);
        assert_eq!(tree.remove_elements("sp"), 1);
        assert_eq!(tree.elements().count(), 2);
    }

    #[test]
    fn test_get_or_insert_first() {
        let mut p = XmlElement::parse_fragment("<a:p><a:r/></a:p>").unwrap();
        p.get_or_insert_first("a:pPr").set_attr("algn", "ctr");
        p.get_or_insert_first("a:pPr").set_attr("lvl", "0");
        assert_eq!(p.to_xml_string(), r#"<a:p><a:pPr algn="ctr" lvl="0"/><a:r/></a:p>"#);
    }

    #[test]
    fn test_document_parse_errors() {
        assert!(matches!(
            XmlDocument::parse(b"   "),
            Err(XmlError::MissingRoot)
        ));
        assert!(XmlDocument::parse(b"<a><b></a>").is_err());
    }

    #[test]
    fn test_descendants_in_document_order() {
        let el = XmlElement::parse_fragment(
            "<r><a:t>1</a:t><x><a:t>2</a:t></x><a:t>3</a:t></r>",
        )
        .unwrap();
        let texts: Vec<_> = el.descendants("t").iter().map(|t| t.text()).collect();
        assert_eq!(texts, ["1", "2", "3"]);
    }
}
