//! Pattern Matcher: regex search over text split across many text nodes.
//!
//! The container's descendant text nodes are concatenated in document order
//! and the pattern runs over that string. Each match is then cut back into
//! [`Portion`]s, one per text node it touches, and handed to a callback whose
//! [`Replacement`] decides what takes the portion's place.

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

use crate::dom::{Document, NodeId};
use crate::error::Result;

// =============================================================================
// Types
// =============================================================================

/// A compiled search pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(source)?,
        })
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self { regex }
    }
}

/// One application of the pattern to the container's text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMatch {
    /// Full matched text (group 0).
    pub text: String,
    /// Capture groups; index 0 is the whole match, `None` for groups that did not participate.
    pub groups: Vec<Option<String>>,
    /// Byte offset of the match in the concatenated container text.
    pub start: usize,
}

impl TextMatch {
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }

    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// The part of a match that lives inside a single text node.
#[derive(Debug, Clone, PartialEq)]
pub struct Portion {
    /// Text node currently holding this portion.
    pub node: NodeId,
    pub text: String,
    /// Offset of the portion's first byte within the match text.
    pub index_in_match: usize,
    /// Offset of the portion's first byte within `node`'s text.
    pub index_in_node: usize,
    /// Ordinal of the portion within its match.
    pub index: usize,
    /// True for the match's last portion.
    pub is_end: bool,
}

impl Portion {
    /// Offset just past the portion within the match text.
    pub fn end_in_match(&self) -> usize {
        self.index_in_match + self.text.len()
    }
}

/// A match together with the portions it was cut into.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundMatch {
    pub matched: TextMatch,
    pub portions: Vec<Portion>,
}

/// What replaces a portion once the callback has seen it.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// Leave the text node untouched; it is not split.
    Keep,
    /// Replace the portion's range with a text node.
    Text(String),
    /// Replace the portion's range with a detached element or fragment.
    Node(NodeId),
}

struct Segment {
    node: NodeId,
    start: usize,
    end: usize,
}

// =============================================================================
// Matching
// =============================================================================

/// All non-overlapping matches in `container`, left to right, without mutating anything.
///
/// Empty matches are skipped.
pub fn find_matches(document: &Document, container: NodeId, pattern: &Pattern) -> Vec<FoundMatch> {
    let mut text = String::new();
    let mut segments = Vec::new();
    for node in document.text_nodes(container) {
        let Some(node_text) = document.text(node) else {
            continue;
        };
        let start = text.len();
        text.push_str(node_text);
        segments.push(Segment {
            node,
            start,
            end: text.len(),
        });
    }

    let mut found = Vec::new();
    for caps in pattern.as_regex().captures_iter(&text) {
        let Some(full) = caps.get(0) else { continue };
        if full.start() == full.end() {
            continue;
        }

        let matched = TextMatch {
            text: full.as_str().to_string(),
            groups: caps
                .iter()
                .map(|g| g.map(|m| m.as_str().to_string()))
                .collect(),
            start: full.start(),
        };

        let mut portions: Vec<Portion> = segments
            .iter()
            .filter(|s| s.end > full.start() && s.start < full.end() && s.end > s.start)
            .enumerate()
            .map(|(index, s)| {
                let from = s.start.max(full.start());
                let to = s.end.min(full.end());
                Portion {
                    node: s.node,
                    text: text[from..to].to_string(),
                    index_in_match: from - full.start(),
                    index_in_node: from - s.start,
                    index,
                    is_end: false,
                }
            })
            .collect();

        if let Some(last) = portions.last_mut() {
            last.is_end = true;
        } else {
            continue;
        }

        found.push(FoundMatch { matched, portions });
    }
    found
}

/// Run `on_match` for every portion of every match in `container` and apply
/// the replacements it returns.
///
/// Matches are computed once up front, so nothing inserted by a replacement
/// is ever matched again within the same pass. Returns the number of matches.
pub fn for_each_portion<F>(
    document: &mut Document,
    container: NodeId,
    pattern: &Pattern,
    mut on_match: F,
) -> usize
where
    F: FnMut(&mut Document, &Portion, &TextMatch) -> Replacement,
{
    let found = find_matches(document, container, pattern);

    // original text node -> (node holding its unconsumed tail, byte offset of that tail)
    let mut live: HashMap<NodeId, (NodeId, usize)> = HashMap::new();

    for FoundMatch { matched, portions } in &found {
        for portion in portions {
            let (current, base) = live
                .get(&portion.node)
                .copied()
                .unwrap_or((portion.node, 0));
            let Some(local_start) = portion.index_in_node.checked_sub(base) else {
                continue;
            };

            let live_portion = Portion {
                node: current,
                index_in_node: local_start,
                ..portion.clone()
            };

            let replacement = on_match(document, &live_portion, matched);
            let new_node = match replacement {
                Replacement::Keep => continue,
                Replacement::Text(ref text) if *text == live_portion.text => continue,
                Replacement::Text(text) => document.create_text(&text),
                Replacement::Node(node) => node,
            };

            trace!(
                offset = matched.start + portion.index_in_match,
                portion = %live_portion.text,
                "replacing portion"
            );

            let target = if local_start > 0 {
                match document.split_text(current, local_start) {
                    Some(tail) => tail,
                    None => continue,
                }
            } else {
                current
            };

            let remaining = document.text(target).map(str::len).unwrap_or(0);
            let after = if live_portion.text.len() < remaining {
                document.split_text(target, live_portion.text.len())
            } else {
                None
            };

            document.replace_with(target, new_node);

            match after {
                Some(after) => {
                    live.insert(portion.node, (after, portion.index_in_node + portion.text.len()));
                }
                None => {
                    live.remove(&portion.node);
                }
            }
        }
    }

    found.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// <td>const a = <span>req</span>uire("x");</td>
    fn split_line(doc: &mut Document) -> NodeId {
        let td = doc.create_element("td");
        let t1 = doc.create_text("const a = ");
        let span = doc.create_element("span");
        let t2 = doc.create_text("req");
        let t3 = doc.create_text("uire(\"x\");");
        doc.append_child(td, t1);
        doc.append_child(td, span);
        doc.append_child(span, t2);
        doc.append_child(td, t3);
        td
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Pattern::new("(unclosed").is_err());
        assert_eq!(Pattern::new(r"\d+").unwrap().as_str(), r"\d+");
    }

    #[test]
    fn test_match_spanning_nodes_yields_portions() {
        let mut doc = Document::new();
        let td = split_line(&mut doc);
        let pattern = Pattern::new(r#"require\(("[^"]+")\)"#).unwrap();

        let found = find_matches(&doc, td, &pattern);
        assert_eq!(found.len(), 1);

        let m = &found[0];
        assert_eq!(m.matched.text, "require(\"x\")");
        assert_eq!(m.matched.start, 10);
        assert_eq!(m.matched.group(1), Some("\"x\""));

        let texts: Vec<_> = m.portions.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["req", "uire(\"x\")"]);
        assert_eq!(m.portions[1].index_in_match, 3);
        assert_eq!(m.portions[1].index_in_node, 0);
        assert!(m.portions[1].is_end);
        assert!(!m.portions[0].is_end);

        // portions reproduce the match text
        let joined: String = m.portions.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(joined, m.matched.text);
    }

    #[test]
    fn test_non_participating_group_is_none() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.create_text("ab");
        doc.append_child(p, t);

        let pattern = Pattern::new(r"a(x)?(b)").unwrap();
        let found = find_matches(&doc, p, &pattern);
        assert_eq!(found[0].matched.groups, vec![Some("ab".into()), None, Some("b".into())]);
    }

    #[test]
    fn test_empty_matches_skipped() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.create_text("abc");
        doc.append_child(p, t);

        let pattern = Pattern::new(r"x*").unwrap();
        assert!(find_matches(&doc, p, &pattern).is_empty());
    }

    #[test]
    fn test_keep_does_not_split_nodes() {
        let mut doc = Document::new();
        let td = split_line(&mut doc);
        let before = doc.to_html(td);
        let pattern = Pattern::new(r"require").unwrap();

        let mut calls = 0;
        let count = for_each_portion(&mut doc, td, &pattern, |_, _, _| {
            calls += 1;
            Replacement::Keep
        });

        assert_eq!(count, 1);
        assert_eq!(calls, 2);
        assert_eq!(doc.to_html(td), before);
        assert_eq!(doc.children(td).len(), 3);
    }

    #[test]
    fn test_replacement_splits_and_tracks_tail() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.create_text("a1 b2 c3");
        doc.append_child(p, t);

        let pattern = Pattern::new(r"[a-z](\d)").unwrap();
        let count = for_each_portion(&mut doc, p, &pattern, |doc, portion, m| {
            let b = doc.create_element("b");
            let text = doc.create_text(m.group(1).unwrap_or(""));
            doc.append_child(b, text);
            assert!(doc.is_text(portion.node));
            Replacement::Node(b)
        });

        assert_eq!(count, 3);
        assert_eq!(doc.to_html(p), "<p><b>1</b> <b>2</b> <b>3</b></p>");
    }

    #[test]
    fn test_text_replacement() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.create_text("hello world");
        doc.append_child(p, t);

        let pattern = Pattern::new(r"o").unwrap();
        for_each_portion(&mut doc, p, &pattern, |_, _, _| Replacement::Text("0".into()));

        assert_eq!(doc.text_content(p), "hell0 w0rld");
    }
}
