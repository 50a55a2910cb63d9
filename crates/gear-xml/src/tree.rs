//! Minimal XML tree: an owned element builder for writing, plus attribute
//! helpers over `roxmltree` nodes for reading.
//!
//! Elements are built bottom-up (children first, then attached by value), so
//! a finished [`Document`] never aliases any part of itself.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::XmlConfig;
use crate::error::{RecordError, Result, XmlError};

/// Child node of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An owned XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), attributes: Vec::new(), children: Vec::new() }
    }

    /// Set an attribute from any `Display` value.
    ///
    /// Floats go through `Display`, which prints the shortest string that
    /// parses back to the same value.
    pub fn with_attribute(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Replace the value of `name`, or append it if absent.
    pub fn set_attribute(&mut self, name: &str, value: impl fmt::Display) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children.into_iter().map(XmlNode::Element));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.children.push(XmlNode::Comment(comment.into()));
        self
    }

    /// Move the attributes and children of `other` into `self`.
    ///
    /// Attributes already present on `self` keep their value.
    pub fn with_content_of(mut self, other: Element) -> Self {
        for (name, value) in other.attributes {
            if self.attribute(&name).is_none() {
                self.attributes.push((name, value));
            }
        }
        self.children.extend(other.children);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Check every attribute value and text node below `self` against the
    /// XML `Char` production. Escaping cannot represent anything outside it.
    pub fn check_chars(&self) -> std::result::Result<(), RecordError> {
        let invalid = |attribute: &str, value: &str| RecordError::InvalidValue {
            element: self.tag.clone(),
            attribute: attribute.to_string(),
            value: value.escape_debug().to_string(),
            expected: "XML character data",
        };

        for (name, value) in &self.attributes {
            if !is_xml_text(value) {
                return Err(invalid(name, value));
            }
        }
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.check_chars()?,
                XmlNode::Text(t) | XmlNode::Comment(t) if !is_xml_text(t) => {
                    return Err(invalid("text", t));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn is_text_only(&self) -> bool {
        self.children.iter().all(|c| matches!(c, XmlNode::Text(_)))
    }
}

/// A complete document with a single root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Render as UTF-8 XML text with an XML declaration.
    pub fn to_xml_string(&self, config: &XmlConfig) -> String {
        let mut out = String::with_capacity(4 * 1024);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        newline(&mut out, config.indent, 0);
        render_element(&mut out, &self.root, config.indent, 0);
        if config.indent > 0 {
            out.push('\n');
        }
        out
    }

    /// Write the document to `path`.
    ///
    /// The text goes to a sibling temporary file first and is renamed over
    /// `path`, so readers never observe a partially written file.
    pub fn save(&self, path: &Path, config: &XmlConfig) -> Result<()> {
        let text = self.to_xml_string(config);
        let tmp = temp_sibling(path);

        fs::write(&tmp, text.as_bytes())
            .map_err(|source| XmlError::Io { path: tmp.clone(), source })?;
        if let Err(source) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(XmlError::Io { path: path.to_path_buf(), source });
        }
        Ok(())
    }
}

/// True if `c` is allowed in an XML 1.0 document.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

pub fn is_xml_text(s: &str) -> bool {
    s.chars().all(is_xml_char)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

fn newline(out: &mut String, indent: usize, depth: usize) {
    if indent > 0 {
        out.push('\n');
        out.extend(std::iter::repeat_n(' ', indent * depth));
    }
}

fn render_element(out: &mut String, elem: &Element, indent: usize, depth: usize) {
    write!(out, "<{}", elem.tag).unwrap();
    for (name, value) in &elem.attributes {
        write!(out, r#" {name}=""#).unwrap();
        escape_into(out, value, true);
        out.push('"');
    }

    if elem.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    if elem.is_text_only() {
        for child in &elem.children {
            if let XmlNode::Text(t) = child {
                escape_into(out, t, false);
            }
        }
    } else {
        for child in &elem.children {
            newline(out, indent, depth + 1);
            match child {
                XmlNode::Element(e) => render_element(out, e, indent, depth + 1),
                XmlNode::Text(t) => escape_into(out, t, false),
                XmlNode::Comment(c) => write!(out, "<!-- {} -->", sanitize_comment(c)).unwrap(),
            }
        }
        newline(out, indent, depth);
    }
    write!(out, "</{}>", elem.tag).unwrap();
}

// "--" may not appear inside a comment; runs like "---" need several passes.
fn sanitize_comment(c: &str) -> String {
    let mut c = c.to_string();
    while c.contains("--") {
        c = c.replace("--", "- -");
    }
    c
}

// Whitespace control characters are written as character references so the
// parser's attribute-value normalization cannot turn them into spaces.
fn escape_into(out: &mut String, s: &str, attribute: bool) {
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '\t' if attribute => out.push_str("&#9;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
}

// ---------------------------------------------------------------------------
// Read side
// ---------------------------------------------------------------------------

/// First child element of `node` with tag `tag`.
pub fn child_element<'a, 'input>(
    node: &roxmltree::Node<'a, 'input>,
    tag: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

/// Like [`child_element`] but absence is an error.
pub fn require_child<'a, 'input>(
    node: &roxmltree::Node<'a, 'input>,
    tag: &str,
) -> std::result::Result<roxmltree::Node<'a, 'input>, RecordError> {
    child_element(node, tag).ok_or_else(|| RecordError::MissingElement { element: tag.to_string() })
}

pub fn required_attribute<'a>(
    node: &roxmltree::Node<'a, '_>,
    name: &str,
) -> std::result::Result<&'a str, RecordError> {
    node.attribute(name).ok_or_else(|| RecordError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: name.to_string(),
    })
}

/// Parse a required attribute; surrounding whitespace is ignored.
pub fn parse_attribute<T: FromStr>(
    node: &roxmltree::Node,
    name: &str,
    expected: &'static str,
) -> std::result::Result<T, RecordError> {
    let raw = required_attribute(node, name)?;
    parse_value(node, name, raw, expected)
}

/// Parse `raw`, reporting failures against `node`/`attribute`.
pub fn parse_value<T: FromStr>(
    node: &roxmltree::Node,
    attribute: &str,
    raw: &str,
    expected: &'static str,
) -> std::result::Result<T, RecordError> {
    raw.trim().parse().map_err(|_| RecordError::InvalidValue {
        element: node.tag_name().name().to_string(),
        attribute: attribute.to_string(),
        value: raw.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact() -> XmlConfig {
        XmlConfig { indent: 0, ..XmlConfig::default() }
    }

    #[test]
    fn render_compact() {
        let doc = Document::new(
            Element::new("gear")
                .with_comment("hello")
                .with_child(Element::new("detectors").with_child(
                    Element::new("detector").with_attribute("name", "TPC").with_text("1 2"),
                )),
        );
        assert_eq!(
            doc.to_xml_string(&compact()),
            r#"<?xml version="1.0" encoding="UTF-8"?><gear><!-- hello --><detectors><detector name="TPC">1 2</detector></detectors></gear>"#
        );
    }

    #[test]
    fn render_indented() {
        let doc = Document::new(
            Element::new("a").with_child(Element::new("b").with_child(Element::new("c"))),
        );
        let text = doc.to_xml_string(&XmlConfig::default());
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n  <b>\n    <c/>\n  </b>\n</a>\n"
        );
    }

    #[test]
    fn attribute_escaping_round_trips() {
        let value = "a<b & \"c\"\tline\nnext\r";
        let doc = Document::new(Element::new("x").with_attribute("v", value));
        let text = doc.to_xml_string(&compact());

        let parsed = roxmltree::Document::parse(&text).unwrap();
        assert_eq!(parsed.root_element().attribute("v"), Some(value));
    }

    #[test]
    fn comment_dashes_sanitized() {
        let doc = Document::new(Element::new("x").with_comment("a -- b --- c").with_child(Element::new("y")));
        let text = doc.to_xml_string(&compact());
        assert!(roxmltree::Document::parse(&text).is_ok(), "{text}");
    }

    #[test]
    fn xml_char_rule() {
        for c in ['a', '\t', '\n', '\r', ' ', '\u{D7FF}', '\u{E000}', '\u{FFFD}', '\u{10000}', '\u{10FFFF}'] {
            assert!(is_xml_char(c), "{c:?}");
        }
        for c in ['\0', '\u{7}', '\u{1}', '\u{B}', '\u{1F}', '\u{FFFE}', '\u{FFFF}'] {
            assert!(!is_xml_char(c), "{c:?}");
        }
    }

    #[test]
    fn check_chars_finds_nested_control_characters() {
        let ok = Element::new("detector")
            .with_attribute("name", "VXD")
            .with_child(Element::new("parameter").with_attribute("value", "tab\tok"));
        assert!(ok.check_chars().is_ok());

        let bad_attr = Element::new("detector")
            .with_child(Element::new("parameter").with_attribute("value", "bell\u{7}"));
        assert_eq!(
            bad_attr.check_chars(),
            Err(RecordError::InvalidValue {
                element: "parameter".to_string(),
                attribute: "value".to_string(),
                value: "bell\\u{7}".to_string(),
                expected: "XML character data",
            })
        );

        let bad_text = Element::new("detector")
            .with_child(Element::new("parameter").with_text("nul\u{0}"));
        assert!(matches!(
            bad_text.check_chars(),
            Err(RecordError::InvalidValue { ref attribute, .. }) if attribute == "text"
        ));
    }

    #[test]
    fn set_attribute_replaces() {
        let mut e = Element::new("detector").with_attribute("name", "A");
        e.set_attribute("name", "B");
        e.set_attribute("geartype", 3.5);
        let attrs: Vec<(&str, &str)> = e.attributes().collect();
        assert_eq!(attrs, vec![("name", "B"), ("geartype", "3.5")]);
    }

    #[test]
    fn with_content_of_keeps_own_attributes() {
        let body = Element::new("ignored")
            .with_attribute("name", "Sneaky")
            .with_attribute("extra", 1)
            .with_child(Element::new("layer"));
        let e = Element::new("detector").with_attribute("name", "Real").with_content_of(body);

        assert_eq!(e.tag(), "detector");
        assert_eq!(e.attribute("name"), Some("Real"));
        assert_eq!(e.attribute("extra"), Some("1"));
        assert_eq!(e.child_elements().count(), 1);
    }

    #[test]
    fn read_helpers() {
        let doc = roxmltree::Document::parse(
            r#"<detector><layout symmetry=" 8 " phi0="x"/></detector>"#,
        )
        .unwrap();
        let root = doc.root_element();
        let layout = require_child(&root, "layout").unwrap();

        assert_eq!(parse_attribute::<u32>(&layout, "symmetry", "integer").unwrap(), 8);
        assert!(matches!(
            parse_attribute::<f64>(&layout, "phi0", "number"),
            Err(RecordError::InvalidValue { .. })
        ));
        assert_eq!(
            required_attribute(&layout, "type"),
            Err(RecordError::MissingAttribute {
                element: "layout".to_string(),
                attribute: "type".to_string()
            })
        );
        assert!(matches!(
            require_child(&root, "dimensions"),
            Err(RecordError::MissingElement { element }) if element == "dimensions"
        ));
    }

    #[test]
    fn save_writes_file_and_no_temp() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("gear_xml_tree_save_{}.xml", std::process::id()));
        let doc = Document::new(Element::new("gear"));

        doc.save(&path, &XmlConfig::default()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("<gear/>"));
        assert!(!temp_sibling(&path).exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_into_missing_dir_fails() {
        let path = std::env::temp_dir().join("gear_xml_no_such_dir_0xdead").join("out.xml");
        let err = Document::new(Element::new("gear"))
            .save(&path, &XmlConfig::default())
            .unwrap_err();
        assert!(matches!(err, XmlError::Io { .. }));
    }
}
