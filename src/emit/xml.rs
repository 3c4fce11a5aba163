//! Element tree and canonical pretty printer for the decision-table XML.
//!
//! The external rule-management tool is picky about surface form, so the
//! printer is fixed: 2-space indentation, no XML declaration, and two
//! empty-element conventions. A *leaf* (an element that carries text, even
//! empty text) always renders expanded, as `<valueString></valueString>`,
//! which is the form the importer's schema historically requires. A
//! childless *container* renders self-closing, as `<metadataCols/>`, which
//! the importer accepts for structural elements.

use std::fmt::Write as _;

use quick_xml::escape::{escape, partial_escape};

#[derive(Debug, Clone)]
pub(crate) struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// A container element. Renders self-closing while childless.
    pub(crate) fn node(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// A text-bearing element. Always renders expanded, even when empty.
    pub(crate) fn leaf(name: &'static str, text: impl Into<String>) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    pub(crate) fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub(crate) fn with(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn push(&mut self, child: Element) {
        self.children.push(child);
    }
}

/// Serialize the tree. No XML declaration: the importer supplies its own.
pub(crate) fn render(root: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, el: &Element, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push('<');
    out.push_str(el.name);
    for (name, value) in &el.attrs {
        let _ = write!(out, " {name}=\"{}\"", escape(value.as_str()));
    }
    if let Some(text) = &el.text {
        let _ = writeln!(out, ">{}</{}>", partial_escape(text.as_str()), el.name);
    } else if el.children.is_empty() {
        out.push_str("/>\n");
    } else {
        out.push_str(">\n");
        for child in &el.children {
            write_element(out, child, depth + 1);
        }
        for _ in 0..depth {
            out.push_str("  ");
        }
        let _ = writeln!(out, "</{}>", el.name);
    }
}
