//! Public entry point: validate, match, resolve, wrap.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use super::attributes::AttributeMapping;
use super::config::{LinkerConfig, LinkerSettings, Settings};
use super::matcher::{for_each_portion, Pattern, Replacement};
use super::span::{locate_span, Span, SpanResolution, DEFAULT_CAPTURE_GROUP};
use super::strategy::{WrapAction, WrapStrategy};
use crate::dom::{Document, NodeId};
use crate::error::{LinkError, Result};

// ==================== TYPE DEFINITIONS ====================

/// What happened to one match during a pass.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MatchRecord {
    pub text: String,
    /// Byte offset of the match in the container's text.
    pub start: usize,
    pub end: usize,
    /// Link text, or `None` when the reference did not resolve or was not found in the match.
    pub span: Option<String>,
    /// Attribute map resolved against this match.
    pub attributes: BTreeMap<String, String>,
    /// Link elements created for this match.
    pub links: Vec<NodeId>,
}

/// Summary of one insertion pass.
#[derive(Serialize, Clone, Debug, Default)]
pub struct InsertReport {
    pub match_count: usize,
    pub portion_count: usize,
    pub links_created: usize,
    pub ancestors_wrapped: usize,
    /// Portions left alone because they already sit inside a link.
    pub guarded: usize,
    /// Matches whose reference did not resolve; the whole match was linked.
    pub fallback_spans: usize,
    /// Matches whose resolved value does not occur in the match text; left untouched.
    pub unlocated_spans: usize,
    pub elapsed_ms: f64,
    pub matches: Vec<MatchRecord>,
}

// ==================== MAIN IMPLEMENTATION ====================

/// Link inserter with a fixed configuration and settings store.
pub struct LinkInserter<S: Settings = LinkerSettings> {
    config: LinkerConfig,
    settings: S,
}

impl Default for LinkInserter<LinkerSettings> {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkInserter<LinkerSettings> {
    pub fn new() -> Self {
        Self {
            config: LinkerConfig::default(),
            settings: LinkerSettings::default(),
        }
    }
}

impl<S: Settings> LinkInserter<S> {
    pub fn with_settings(config: LinkerConfig, settings: S) -> Self {
        Self { config, settings }
    }

    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    /// Like [`LinkInserter::insert_links`], compiling `pattern` first.
    pub fn insert_links_source(
        &self,
        document: &mut Document,
        container: NodeId,
        pattern: &str,
        mapping: Option<&AttributeMapping>,
        capture_group_ref: Option<&str>,
    ) -> Result<InsertReport> {
        validate_container(document, container)?;
        let pattern = Pattern::new(pattern)?;
        self.insert_links(document, container, &pattern, mapping, capture_group_ref)
    }

    /// Wrap every match of `pattern` inside `container` in a link element.
    ///
    /// Arguments are validated before anything is touched; a bad container
    /// or a missing mapping leaves the document unchanged. Past that point a
    /// portion that cannot be linked is simply left as it was.
    pub fn insert_links(
        &self,
        document: &mut Document,
        container: NodeId,
        pattern: &Pattern,
        mapping: Option<&AttributeMapping>,
        capture_group_ref: Option<&str>,
    ) -> Result<InsertReport> {
        validate_container(document, container)?;
        let mapping = mapping.ok_or(LinkError::MissingMapping)?;
        let capture_group_ref = capture_group_ref.unwrap_or(DEFAULT_CAPTURE_GROUP);

        let started = instant::Instant::now();
        debug!(pattern = pattern.as_str(), container = container.0, "inserting links");

        let strategy = WrapStrategy::new(&self.config, &self.settings, container);
        let mut report = InsertReport::default();
        let mut span: Option<Span> = None;

        report.match_count = for_each_portion(document, container, pattern, |doc, portion, matched| {
            if portion.index == 0 {
                let resolution = locate_span(matched, capture_group_ref);
                span = match &resolution {
                    SpanResolution::Located(resolved) => Some(resolved.clone()),
                    SpanResolution::Unresolved => {
                        report.fallback_spans += 1;
                        Some(Span::whole_match(matched))
                    }
                    SpanResolution::NotLocated => {
                        report.unlocated_spans += 1;
                        trace!(offset = matched.start, "reference not found in match");
                        None
                    }
                };
                report.matches.push(MatchRecord {
                    text: matched.text.clone(),
                    start: matched.start,
                    end: matched.end(),
                    span: resolution.into_span().map(|s| s.value),
                    attributes: mapping.resolve(matched),
                    links: Vec::new(),
                });
            }
            report.portion_count += 1;

            let Some(span) = span.as_ref() else {
                return Replacement::Keep;
            };
            let outcome = strategy.apply_portion(doc, portion, matched, span);
            match outcome.action {
                WrapAction::Guarded => report.guarded += 1,
                WrapAction::WrappedAncestor => report.ancestors_wrapped += 1,
                _ => {}
            }

            if let Some(link) = outcome.link {
                report.links_created += 1;
                if let Some(record) = report.matches.last_mut() {
                    if self.config.attach_attributes {
                        for (name, value) in &record.attributes {
                            doc.set_attribute(link, &format!("data-{}", name), value);
                        }
                    }
                    record.links.push(link);
                }
            }
            outcome.replacement
        });

        report.elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        debug!(
            matches = report.match_count,
            links = report.links_created,
            guarded = report.guarded,
            "link insertion finished"
        );
        Ok(report)
    }
}

fn validate_container(document: &Document, container: NodeId) -> Result<()> {
    match document.get(container) {
        None => Err(LinkError::InvalidContainer(format!("node {} does not exist", container.0))),
        Some(_) if !document.is_element(container) => Err(LinkError::InvalidContainer(format!(
            "node {} is not an element",
            container.0
        ))),
        Some(_) => Ok(()),
    }
}

/// Insert links with the default configuration and settings.
///
/// `capture_group_ref` defaults to [`DEFAULT_CAPTURE_GROUP`].
pub fn insert_links(
    document: &mut Document,
    container: NodeId,
    pattern: &str,
    mapping: Option<&AttributeMapping>,
    capture_group_ref: Option<&str>,
) -> Result<InsertReport> {
    LinkInserter::new().insert_links_source(document, container, pattern, mapping, capture_group_ref)
}
