//! Scenario tests for link insertion over whole containers.

mod insert_tests;

use crate::dom::{Attribute, Document, NodeId, NodeSpec};

pub(crate) fn text(value: &str) -> NodeSpec {
    NodeSpec::text(value)
}

pub(crate) fn el(tag: &str, children: Vec<NodeSpec>) -> NodeSpec {
    NodeSpec::element(tag, children)
}

pub(crate) fn classed(tag: &str, class: &str, children: Vec<NodeSpec>) -> NodeSpec {
    NodeSpec::Element {
        tag: tag.to_string(),
        attributes: vec![Attribute {
            name: "class".to_string(),
            value: class.to_string(),
        }],
        children,
    }
}

pub(crate) fn build(spec: NodeSpec) -> (Document, NodeId) {
    Document::from_spec(&spec).expect("test tree should build")
}

/// `<td>require(<span class="pl-s"><span class="pl-pds">'</span>lodash<span class="pl-pds">'</span></span>)</td>`
pub(crate) fn highlighted_require() -> (Document, NodeId) {
    build(el(
        "td",
        vec![
            text("require("),
            classed(
                "span",
                "pl-s",
                vec![
                    classed("span", "pl-pds", vec![text("'")]),
                    text("lodash"),
                    classed("span", "pl-pds", vec![text("'")]),
                ],
            ),
            text(")"),
        ],
    ))
}

pub(crate) const REQUIRE: &str = r#"require\((['"][^'"]+['"])\)"#;
