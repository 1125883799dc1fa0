//! Tests for `insert_links` over realistic containers.

use pretty_assertions::assert_eq;

use super::{build, classed, el, highlighted_require, text, REQUIRE};
use crate::error::LinkError;
use crate::linker::{
    insert_links, AttributeMapping, LinkInserter, LinkerConfig, MapSettings, Pattern, SHOW_LINK_INDICATOR,
};

const LINK: &str = "<a class=\"textlinker-link\"><span>";
const END: &str = "</span></a>";

fn mapping() -> AttributeMapping {
    AttributeMapping::new().with("target", "$1").with("type", "npm")
}

// ============================================================================
// Requirement 1: quoted value inside a single text node
// ============================================================================

#[test]
fn test_inner_string_keeps_quotes_outside_link() {
    let (mut doc, td) = build(el("td", vec![text("const _ = require('lodash');")]));

    let report = insert_links(&mut doc, td, REQUIRE, Some(&mapping()), None).unwrap();

    assert_eq!(
        doc.inner_html(td),
        format!("const _ = require('{LINK}lodash{END}');")
    );
    assert_eq!(doc.text_content(td), "const _ = require('lodash');");
    assert_eq!(report.match_count, 1);
    assert_eq!(report.links_created, 1);
    assert_eq!(report.matches[0].span.as_deref(), Some("lodash"));
    assert_eq!(report.matches[0].attributes["target"], "lodash");
    assert_eq!(report.matches[0].attributes["type"], "npm");
}

#[test]
fn test_inner_string_five_pieces() {
    let (mut doc, p) = build(el("p", vec![text("see \"example\" here")]));

    insert_links(&mut doc, p, r#"see ("\w+") here"#, Some(&AttributeMapping::new()), None).unwrap();

    let pieces: Vec<String> = doc.children(p).iter().map(|&c| doc.to_html(c)).collect();
    assert_eq!(
        pieces,
        vec![
            "see ".to_string(),
            "\"".to_string(),
            format!("{LINK}example{END}"),
            "\"".to_string(),
            " here".to_string(),
        ]
    );
}

// ============================================================================
// Requirement 2: value split out by syntax highlighting
// ============================================================================

#[test]
fn test_exact_portion_inside_highlighted_string() {
    let (mut doc, td) = highlighted_require();

    let report = insert_links(&mut doc, td, REQUIRE, Some(&mapping()), None).unwrap();

    assert_eq!(
        doc.inner_html(td),
        format!(
            "require(<span class=\"pl-s\"><span class=\"pl-pds\">'</span>{LINK}lodash{END}<span class=\"pl-pds\">'</span></span>)"
        )
    );
    assert_eq!(report.portion_count, 5);
    assert_eq!(report.links_created, 1);
    assert_eq!(report.ancestors_wrapped, 0);
}

#[test]
fn test_value_spanning_elements_wraps_enclosing_element() {
    let (mut doc, td) = build(el(
        "td",
        vec![
            text("x("),
            classed("span", "pl-s", vec![text("lo"), el("b", vec![text("dash")])]),
            text(")"),
        ],
    ));

    let report = insert_links(&mut doc, td, r"x\((\w+)\)", Some(&mapping()), None).unwrap();

    assert_eq!(
        doc.inner_html(td),
        format!("x({LINK}<span class=\"pl-s\">lo<b>dash</b></span>{END})")
    );
    assert_eq!(report.ancestors_wrapped, 1);
    assert_eq!(report.links_created, 1);
    assert_eq!(doc.text_content(td), "x(lodash)");
}

#[test]
fn test_quoted_value_after_element_boundary() {
    let (mut doc, td) = build(el(
        "td",
        vec![el("span", vec![text("require(")]), text("\"x\")")],
    ));

    insert_links(&mut doc, td, r#"require\(("\w+")\)"#, Some(&mapping()), None).unwrap();

    assert_eq!(
        doc.inner_html(td),
        format!("<span>require(</span>\"{LINK}x{END}\")")
    );
}

// ============================================================================
// Requirement 3: several matches, fallback, no matches
// ============================================================================

#[test]
fn test_multiple_matches_in_one_node() {
    let (mut doc, p) = build(el("p", vec![text("import \"a\"; import \"b\";")]));

    let report = insert_links(&mut doc, p, r#"import ("[^"]+")"#, Some(&mapping()), None).unwrap();

    assert_eq!(
        doc.inner_html(p),
        format!("import \"{LINK}a{END}\"; import \"{LINK}b{END}\";")
    );
    assert_eq!(report.match_count, 2);
    assert_eq!(report.matches[1].start, 12);
    assert_eq!(report.matches[1].end, 22);
    assert_eq!(report.matches[1].attributes["target"], "b");
}

#[test]
fn test_unresolvable_reference_links_whole_match() {
    let (mut doc, p) = build(el("p", vec![text("use lodash here")]));

    let report = insert_links(&mut doc, p, "lodash", Some(&mapping()), Some("no token")).unwrap();

    assert_eq!(doc.inner_html(p), format!("use {LINK}lodash{END} here"));
    assert_eq!(report.fallback_spans, 1);
    assert_eq!(report.matches[0].span, None);
}

#[test]
fn test_reference_absent_from_match_leaves_text_alone() {
    let (mut doc, p) = build(el("p", vec![text("x require('lodash') y")]));
    let before = doc.to_html(p);

    let report = insert_links(
        &mut doc,
        p,
        REQUIRE,
        Some(&AttributeMapping::new()),
        Some("https://npm.im/$1"),
    )
    .unwrap();

    assert_eq!(doc.to_html(p), before);
    assert_eq!(doc.inner_html(p), "x require('lodash') y");
    assert_eq!(report.match_count, 1);
    assert_eq!(report.links_created, 0);
    assert_eq!(report.fallback_spans, 0);
    assert_eq!(report.unlocated_spans, 1);
    assert_eq!(report.matches[0].span, None);
}

#[test]
fn test_second_capture_group() {
    let (mut doc, p) = build(el("p", vec![text("link(a, b)")]));

    insert_links(&mut doc, p, r"link\((\w), (\w)\)", Some(&mapping()), Some("$2")).unwrap();

    assert_eq!(doc.inner_html(p), format!("link(a, {LINK}b{END})"));
}

#[test]
fn test_no_matches_leaves_tree_alone() {
    let (mut doc, td) = highlighted_require();
    let before = doc.to_html(td);

    let report = insert_links(&mut doc, td, r"import\s+(\w+)", Some(&mapping()), None).unwrap();

    assert_eq!(report.match_count, 0);
    assert_eq!(doc.to_html(td), before);
}

// ============================================================================
// Requirement 4: settings and attribute attachment
// ============================================================================

#[test]
fn test_indicator_class_and_data_attributes() {
    let (mut doc, td) = build(el("td", vec![text("require('lodash')")]));
    let config = LinkerConfig {
        attach_attributes: true,
        ..LinkerConfig::default()
    };
    let inserter = LinkInserter::with_settings(config, MapSettings::new().with(SHOW_LINK_INDICATOR, true));
    let pattern = Pattern::new(REQUIRE).unwrap();

    let report = inserter
        .insert_links(&mut doc, td, &pattern, Some(&mapping()), None)
        .unwrap();

    assert_eq!(
        doc.inner_html(td),
        "require('<a class=\"textlinker-link textlinker-line-indicator\" data-target=\"lodash\" data-type=\"npm\"><span>lodash</span></a>')"
    );
    assert_eq!(report.matches[0].links.len(), 1);
}

#[test]
fn test_attributes_not_attached_by_default() {
    let (mut doc, td) = build(el("td", vec![text("require('lodash')")]));

    let report = insert_links(&mut doc, td, REQUIRE, Some(&mapping()), None).unwrap();

    let link = report.matches[0].links[0];
    assert_eq!(doc.get_attribute(link, "data-target"), None);
    assert_eq!(report.matches[0].attributes.len(), 2);
}

// ============================================================================
// Requirement 5: invalid arguments fail before any mutation
// ============================================================================

#[test]
fn test_text_node_container_rejected() {
    let (mut doc, td) = highlighted_require();
    let before = doc.to_html(td);
    let text_node = doc.text_nodes(td)[0];

    let err = insert_links(&mut doc, text_node, REQUIRE, Some(&mapping()), None).unwrap_err();

    assert!(matches!(err, LinkError::InvalidContainer(_)));
    assert!(err.is_invalid_argument());
    assert_eq!(doc.to_html(td), before);
}

#[test]
fn test_invalid_pattern_rejected() {
    let (mut doc, td) = highlighted_require();
    let before = doc.to_html(td);

    let err = insert_links(&mut doc, td, "require(", Some(&mapping()), None).unwrap_err();

    assert!(matches!(err, LinkError::InvalidPattern(_)));
    assert_eq!(doc.to_html(td), before);
}

#[test]
fn test_missing_mapping_rejected() {
    let (mut doc, td) = highlighted_require();
    let before = doc.to_html(td);

    let err = insert_links(&mut doc, td, REQUIRE, None, None).unwrap_err();

    assert!(matches!(err, LinkError::MissingMapping));
    assert_eq!(doc.to_html(td), before);
}
