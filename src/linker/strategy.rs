//! Wrap Strategy: how a portion of a match turns into link markup.
//!
//! Decision order for each portion:
//! 1. already inside a link (parent or grandparent carries the link class) → keep
//! 2. the span sits inside this text node → split into text / quote / link / quote / text
//! 3. the portion is exactly the span → replace it with a link
//! 4. the span starts here but continues into other nodes → wrap the nearest
//!    enclosing element in a textless link
//! 5. anything else → keep

use serde::Serialize;
use tracing::debug;

use super::config::{LinkerConfig, Settings};
use super::matcher::{Portion, Replacement, TextMatch};
use super::span::Span;
use crate::dom::{Document, NodeId};

// =============================================================================
// Types
// =============================================================================

/// Which branch handled a portion.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapAction {
    /// Portion already belongs to a link.
    Guarded,
    /// Portion text split around an inner link.
    InnerString,
    /// Whole portion became the link.
    ExactPortion,
    /// An enclosing element was wrapped in a link.
    WrappedAncestor,
    /// Span starts here but no enclosing element could be wrapped.
    NoAncestor,
    /// Span does not start in this portion.
    Skipped,
}

/// Result of applying the strategy to one portion.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapOutcome {
    pub action: WrapAction,
    pub replacement: Replacement,
    /// Link element created for this portion, if any.
    pub link: Option<NodeId>,
}

impl WrapOutcome {
    fn keep(action: WrapAction) -> Self {
        Self {
            action,
            replacement: Replacement::Keep,
            link: None,
        }
    }
}

// =============================================================================
// WrapStrategy
// =============================================================================

/// Builds link elements and decides how each portion is rewritten.
pub struct WrapStrategy<'a, S: Settings + ?Sized> {
    config: &'a LinkerConfig,
    settings: &'a S,
    /// Upper bound for ancestor wrapping; never wrapped itself.
    container: NodeId,
}

impl<'a, S: Settings + ?Sized> WrapStrategy<'a, S> {
    pub fn new(config: &'a LinkerConfig, settings: &'a S, container: NodeId) -> Self {
        Self {
            config,
            settings,
            container,
        }
    }

    /// Detached `<a class="link"><span>text</span></a>`.
    ///
    /// Returns the link and its inner text element. An empty `text` leaves
    /// the inner element empty.
    pub fn create_link_element(&self, document: &mut Document, text: &str) -> (NodeId, NodeId) {
        let link = document.create_element(&self.config.link_tag);
        let inner = document.create_element(&self.config.text_tag);
        document.append_child(link, inner);

        if !text.is_empty() {
            let text_node = document.create_text(text);
            document.append_child(inner, text_node);
        }

        document.add_class(link, &self.config.link_class);
        if self.settings.get(&self.config.indicator_setting) {
            document.add_class(link, &self.config.indicator_class);
        }

        (link, inner)
    }

    /// True when the parent or grandparent of `node` is a link element.
    pub fn is_within_link(&self, document: &Document, node: NodeId) -> bool {
        document
            .ancestors(node)
            .take(2)
            .any(|a| document.has_class(a, &self.config.link_class))
    }

    pub fn apply_portion(
        &self,
        document: &mut Document,
        portion: &Portion,
        matched: &TextMatch,
        span: &Span,
    ) -> WrapOutcome {
        if self.is_within_link(document, portion.node) {
            return WrapOutcome::keep(WrapAction::Guarded);
        }

        let node_text = document.text_content(portion.node);
        if node_text.contains(span.raw.as_str()) {
            if let Some(outcome) = self.wrap_inner_string(document, portion, span) {
                return outcome;
            }
        }

        if span.start != portion.index_in_match {
            return WrapOutcome::keep(WrapAction::Skipped);
        }

        if portion.end_in_match() == span.end {
            let (link, _) = self.create_link_element(document, &portion.text);
            return WrapOutcome {
                action: WrapAction::ExactPortion,
                replacement: Replacement::Node(link),
                link: Some(link),
            };
        }

        match self.wrap_closest_element(document, portion.node, &span.raw) {
            Some(link) => WrapOutcome {
                action: WrapAction::WrappedAncestor,
                replacement: Replacement::Keep,
                link: Some(link),
            },
            None => {
                debug!(
                    offset = matched.start + portion.index_in_match,
                    span = %span.value,
                    "no enclosing element to wrap"
                );
                WrapOutcome::keep(WrapAction::NoAncestor)
            }
        }
    }

    /// Split the portion text around the span, keeping quotes and residual text outside the link.
    fn wrap_inner_string(
        &self,
        document: &mut Document,
        portion: &Portion,
        span: &Span,
    ) -> Option<WrapOutcome> {
        let (left, right) = portion.text.split_once(span.raw.as_str())?;
        let inner_end = span.raw.len() - span.trailing_quote.len();
        let link_text = span.raw.get(span.leading_quote.len()..inner_end)?;

        let fragment = document.create_fragment();
        let (link, _) = self.create_link_element(document, link_text);

        for piece in [left, span.leading_quote.as_str()] {
            if !piece.is_empty() {
                let text = document.create_text(piece);
                document.append_child(fragment, text);
            }
        }
        document.append_child(fragment, link);
        for piece in [span.trailing_quote.as_str(), right] {
            if !piece.is_empty() {
                let text = document.create_text(piece);
                document.append_child(fragment, text);
            }
        }

        Some(WrapOutcome {
            action: WrapAction::InnerString,
            replacement: Replacement::Node(fragment),
            link: Some(link),
        })
    }

    /// Wrap the nearest element between `node` and the container whose text holds `needle`.
    ///
    /// The container itself is never wrapped, and an element that already
    /// sits inside a link is left alone.
    fn wrap_closest_element(&self, document: &mut Document, node: NodeId, needle: &str) -> Option<NodeId> {
        let target = std::iter::once(node)
            .chain(document.ancestors(node))
            .take_while(|&n| n != self.container)
            .filter(|&n| document.is_element(n))
            .find(|&n| document.text_content(n).contains(needle))?;

        if document.has_class(target, &self.config.link_class) || self.is_within_link(document, target) {
            return None;
        }

        let (link, inner) = self.create_link_element(document, "");
        if document.wrap(target, link, inner) {
            Some(link)
        } else {
            None
        }
    }
}
