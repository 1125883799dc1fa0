//! HTML serialization and the serde tree format used across the WASM boundary.

use serde::{Deserialize, Serialize};

use super::node::{Attribute, NodeId, NodeKind};
use super::tree::Document;
use crate::error::{LinkError, Result};

/// Nested, serializable description of a subtree.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeSpec {
    Element {
        tag: String,
        #[serde(default)]
        attributes: Vec<Attribute>,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    Text {
        text: String,
    },
}

impl NodeSpec {
    pub fn element(tag: &str, children: Vec<NodeSpec>) -> Self {
        NodeSpec::Element {
            tag: tag.to_string(),
            attributes: Vec::new(),
            children,
        }
    }

    pub fn text(text: &str) -> Self {
        NodeSpec::Text {
            text: text.to_string(),
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

impl Document {
    /// Serialize `id` and its subtree to HTML.
    ///
    /// Attributes keep insertion order; a fragment serializes as its children.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Serialize only the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => escape_text(text, out),
            Some(NodeKind::Element(el)) => {
                out.push('<');
                out.push_str(&el.tag);
                for attr in &el.attributes {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_attr(&attr.value, out);
                    out.push('"');
                }
                out.push('>');
                for &child in self.children(id) {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
            Some(NodeKind::Fragment) => {
                for &child in self.children(id) {
                    self.write_html(child, out);
                }
            }
            None => {}
        }
    }

    /// Materialize a spec tree into this document, returning its root.
    pub fn build(&mut self, spec: &NodeSpec) -> Result<NodeId> {
        match spec {
            NodeSpec::Text { text } => Ok(self.create_text(text)),
            NodeSpec::Element {
                tag,
                attributes,
                children,
            } => {
                if tag.trim().is_empty() {
                    return Err(LinkError::InvalidTree("element with empty tag".to_string()));
                }
                let id = self.create_element(tag);
                for attr in attributes {
                    self.set_attribute(id, &attr.name, &attr.value);
                }
                for child in children {
                    let child_id = self.build(child)?;
                    self.append_child(id, child_id);
                }
                Ok(id)
            }
        }
    }

    /// Fresh document holding `spec`, plus the id of its root.
    pub fn from_spec(spec: &NodeSpec) -> Result<(Document, NodeId)> {
        let mut doc = Document::new();
        let root = doc.build(spec)?;
        Ok((doc, root))
    }

    /// Inverse of [`Document::build`]. Fragments have no spec form.
    pub fn to_spec(&self, id: NodeId) -> Option<NodeSpec> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(NodeSpec::text(text)),
            NodeKind::Element(el) => Some(NodeSpec::Element {
                tag: el.tag.clone(),
                attributes: el.attributes.clone(),
                children: self
                    .children(id)
                    .iter()
                    .filter_map(|&c| self.to_spec(c))
                    .collect(),
            }),
            NodeKind::Fragment => None,
        }
    }
}
