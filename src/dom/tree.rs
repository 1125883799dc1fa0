//! Arena-backed document tree.
//!
//! Nodes live in a flat `Vec` and link to each other by [`NodeId`]. Parents
//! are plain back-references used for lookups (ancestor class checks, text
//! containment walks); ownership always stays with the arena. Detached nodes
//! simply have no parent, so removing a node never invalidates an id.

use super::node::{ElementData, Node, NodeId, NodeKind};

/// A mutable tree of elements and text nodes.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

/// Iterator over the ancestors of a node, nearest first.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

impl Document {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    // ==================== CONSTRUCTION ====================

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.push(NodeKind::Fragment)
    }

    // ==================== QUERIES ====================

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element(_)))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id) {
            Some(NodeKind::Element(data)) => Some(data),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(data)) => Some(data),
            _ => None,
        }
    }

    /// Own text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: NodeId, value: &str) {
        if let Some(NodeKind::Text(text)) = self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            *text = value.to_string();
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// True when `ancestor` is a strict ancestor of `id`.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.add_class(class);
        }
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.get_attribute(name))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.set_attribute(name, value);
        }
    }

    /// Concatenated text of every descendant text node, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(_) => {
                let mut out = String::new();
                for text_node in self.text_nodes(id) {
                    if let Some(text) = self.text(text_node) {
                        out.push_str(text);
                    }
                }
                out
            }
            None => String::new(),
        }
    }

    /// Descendant text nodes of `root` in document order.
    pub fn text_nodes(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match self.kind(id) {
                Some(NodeKind::Text(_)) => out.push(id),
                Some(_) => stack.extend(self.children(id).iter().rev().copied()),
                None => {}
            }
        }
        out
    }

    // ==================== MUTATION ====================

    /// Unlink `id` from its parent. The node and its subtree stay in the arena.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.retain(|&c| c != id);
        }
        self.nodes[id.0].parent = None;
    }

    /// Nodes actually inserted for `id`: the children of a fragment, or the node itself.
    fn take_insertable(&mut self, id: NodeId) -> Vec<NodeId> {
        if matches!(self.kind(id), Some(NodeKind::Fragment)) {
            let children = std::mem::take(&mut self.nodes[id.0].children);
            for &child in &children {
                self.nodes[child.0].parent = None;
            }
            children
        } else {
            self.detach(id);
            vec![id]
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.get(parent).is_none() || self.get(child).is_none() || parent == child {
            return;
        }
        for node in self.take_insertable(child) {
            self.nodes[node.0].parent = Some(parent);
            self.nodes[parent.0].children.push(node);
        }
    }

    /// Insert `new` as the previous sibling of `reference`.
    ///
    /// No-op when `reference` has no parent.
    pub fn insert_before(&mut self, reference: NodeId, new: NodeId) {
        if self.get(new).is_none() || reference == new {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            return;
        };
        let inserted = self.take_insertable(new);
        let Some(pos) = self.nodes[parent.0].children.iter().position(|&c| c == reference) else {
            return;
        };
        for (offset, &node) in inserted.iter().enumerate() {
            self.nodes[node.0].parent = Some(parent);
            self.nodes[parent.0].children.insert(pos + offset, node);
        }
    }

    /// Put `new` (element, text, or fragment contents) where `old` was and detach `old`.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) {
        if self.parent(old).is_none() {
            return;
        }
        self.insert_before(old, new);
        self.detach(old);
    }

    /// Wrap `target` in `wrapper`, placing `target` under `slot`.
    ///
    /// `slot` is `wrapper` itself or one of its descendants. Returns false
    /// when `target` is detached.
    pub fn wrap(&mut self, target: NodeId, wrapper: NodeId, slot: NodeId) -> bool {
        if self.parent(target).is_none() || self.get(wrapper).is_none() {
            return false;
        }
        if slot != wrapper && !self.is_descendant_of(slot, wrapper) {
            return false;
        }
        self.insert_before(target, wrapper);
        self.append_child(slot, target);
        true
    }

    /// Split a text node at byte offset `at`, like `Text.splitText`.
    ///
    /// The original node keeps `[..at]`; the returned node holds `[at..]` and
    /// is inserted right after it when the original is attached.
    pub fn split_text(&mut self, id: NodeId, at: usize) -> Option<NodeId> {
        let text = self.text(id)?;
        if at > text.len() || !text.is_char_boundary(at) {
            return None;
        }
        let tail = text[at..].to_string();
        let head = text[..at].to_string();
        self.set_text(id, &head);

        let tail_id = self.create_text(&tail);
        if let Some(parent) = self.parent(id) {
            let pos = self.nodes[parent.0]
                .children
                .iter()
                .position(|&c| c == id)
                .map(|p| p + 1)
                .unwrap_or(self.nodes[parent.0].children.len());
            self.nodes[tail_id.0].parent = Some(parent);
            self.nodes[parent.0].children.insert(pos, tail_id);
        }
        Some(tail_id)
    }
}
