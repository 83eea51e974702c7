//! Minimal owned XML element tree
//!
//! Metadata documents are small, so each one is read fully into an `Element`
//! tree. Lookups match on the local element name (namespace prefix ignored)
//! and search descendants in document order, first match wins.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Document could not be turned into an element tree
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XmlError {
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("element <{element}> is never closed")]
    Unclosed { element: String },

    #[error("closing tag </{found}> without matching opening tag")]
    UnexpectedClose { found: String },

    #[error("document has no root element")]
    NoRoot,
}

impl XmlError {
    pub fn code(&self) -> &'static str {
        match self {
            XmlError::Syntax { .. } => "SFS_XML_SYNTAX",
            XmlError::Unclosed { .. } => "SFS_XML_UNCLOSED",
            XmlError::UnexpectedClose { .. } => "SFS_XML_UNEXPECTED_CLOSE",
            XmlError::NoRoot => "SFS_XML_NO_ROOT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name, prefix stripped
    pub name: String,
    /// Concatenated direct text and CDATA content
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// First descendant with the given local name, depth-first in document
    /// order. The element itself is not considered.
    pub fn find(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// Text of the first descendant named `name`, if that text is non-empty.
    pub fn find_text(&self, name: &str) -> Option<&str> {
        self.find(name)
            .map(|e| e.text.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Every descendant named `name`, in document order.
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect(name, &mut out);
        out
    }

    fn collect<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.collect(name, out);
        }
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Parses a complete document and returns its root element.
pub fn parse(content: &str) -> Result<Element, XmlError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Syntax {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                stack.push(Element::named(local_name(start.local_name().as_ref())));
            }
            Event::Empty(start) => {
                let element = Element::named(local_name(start.local_name().as_ref()));
                attach(&mut stack, &mut root, element);
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| XmlError::UnexpectedClose {
                    found: local_name(end.local_name().as_ref()),
                })?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let unescaped = text.unescape().map_err(|e| XmlError::Syntax {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    })?;
                    current.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed { element: open.name });
    }

    root.ok_or(XmlError::NoRoot)
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            // Only the first top-level element is the document root.
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomField xmlns="http://soap.sforce.com/2006/04/metadata">
    <fullName>Status__c</fullName>
    <label>Status</label>
    <type>Picklist</type>
    <valueSet>
        <valueSetDefinition>
            <value>
                <fullName>Open</fullName>
                <label>Open</label>
            </value>
            <value>
                <fullName>Closed</fullName>
                <label>Closed &amp; Done</label>
            </value>
        </valueSetDefinition>
    </valueSet>
</CustomField>"#;

    #[test]
    fn test_first_match_in_document_order() {
        let root = parse(FIELD).unwrap();
        assert_eq!(root.name, "CustomField");
        assert_eq!(root.find_text("fullName"), Some("Status__c"));
        assert_eq!(root.find_text("label"), Some("Status"));
    }

    #[test]
    fn test_find_all_within_subtree() {
        let root = parse(FIELD).unwrap();
        let value_set = root.find("valueSet").unwrap();
        let names: Vec<_> = value_set
            .find_all("fullName")
            .into_iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(names, vec!["Open", "Closed"]);
    }

    #[test]
    fn test_entities_and_cdata() {
        let root = parse(FIELD).unwrap();
        let labels: Vec<_> = root.find_all("label").into_iter().map(|e| e.text.clone()).collect();
        assert_eq!(labels.last().unwrap(), "Closed & Done");

        let doc = "<f><formula><![CDATA[IF(A < B, 1, 0)]]></formula></f>";
        assert_eq!(parse(doc).unwrap().find_text("formula"), Some("IF(A < B, 1, 0)"));
    }

    #[test]
    fn test_prefixed_names_match_local_name() {
        let doc = r#"<sf:CustomObject xmlns:sf="urn:x"><sf:label>Invoice</sf:label></sf:CustomObject>"#;
        let root = parse(doc).unwrap();
        assert_eq!(root.name, "CustomObject");
        assert_eq!(root.find_text("label"), Some("Invoice"));
    }

    #[test]
    fn test_empty_element_has_no_text() {
        let root = parse("<f><description/><label></label></f>").unwrap();
        assert!(root.find("description").is_some());
        assert_eq!(root.find_text("description"), None);
        assert_eq!(root.find_text("label"), None);
    }

    #[test]
    fn test_bom_is_ignored() {
        let root = parse("\u{feff}<a><b>x</b></a>").unwrap();
        assert_eq!(root.find_text("b"), Some("x"));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(parse("<a><b>x</a>"), Err(XmlError::Syntax { .. })));
        assert!(matches!(
            parse("<a><b>x</b>"),
            Err(XmlError::Unclosed { .. }) | Err(XmlError::Syntax { .. })
        ));
        assert_eq!(parse(""), Err(XmlError::NoRoot));
        assert_eq!(parse("   \n"), Err(XmlError::NoRoot));
    }
}
