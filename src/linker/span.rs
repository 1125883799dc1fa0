//! Span Resolver: which part of a match becomes the link text.
//!
//! A capture-group reference is a small template such as `$1` or
//! `https://example.com/$2`. The first `$N` token selects the group; every
//! `$N` with that index is substituted by the group's captured text. Quote
//! characters around the substituted value are metadata: they are stripped
//! from the link text and recorded so the wrap step can keep them outside
//! the link element.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use super::matcher::TextMatch;

/// Reference used when the caller does not pass one.
pub const DEFAULT_CAPTURE_GROUP: &str = "$1";

/// Characters treated as quotes around a captured value.
pub const QUOTE_SIGNS: [char; 2] = ['"', '\''];

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\$([0-9]+)").expect("capture token regex should compile"))
}

// =============================================================================
// Types
// =============================================================================

/// The linkable sub-string of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Link text with quotes removed.
    pub value: String,
    /// Text located in the match: the substituted value, quotes included.
    pub raw: String,
    /// Offset of the first link character within the match text.
    pub start: usize,
    /// Offset just past the link text within the match text.
    pub end: usize,
    /// `"`, `'` or empty.
    pub leading_quote: String,
    /// `"`, `'` or empty.
    pub trailing_quote: String,
}

impl Span {
    /// Fallback span covering the entire match.
    pub fn whole_match(matched: &TextMatch) -> Self {
        Self {
            value: matched.text.clone(),
            raw: matched.text.clone(),
            start: 0,
            end: matched.text.len(),
            leading_quote: String::new(),
            trailing_quote: String::new(),
        }
    }

    pub fn is_quoted(&self) -> bool {
        !self.leading_quote.is_empty() || !self.trailing_quote.is_empty()
    }
}

/// Outcome of resolving a capture-group reference against one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanResolution {
    /// The span was found inside the match text.
    Located(Span),
    /// No usable `$N` token, a missing group, or an empty value. The caller
    /// links the whole match instead.
    Unresolved,
    /// The substituted value never occurs in the match text (a URL template,
    /// say). Nothing in the match is linked.
    NotLocated,
}

impl SpanResolution {
    pub fn into_span(self) -> Option<Span> {
        match self {
            Self::Located(span) => Some(span),
            Self::Unresolved | Self::NotLocated => None,
        }
    }

}

// =============================================================================
// Resolution
// =============================================================================

/// Index of the first `$N` token in `template`, if any.
pub fn capture_group_index(template: &str) -> Option<usize> {
    let caps = token_regex().captures(template)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Replace every `$N` token of the first-referenced index with that group's text.
///
/// `None` when there is no token or the group is missing. Tokens of other
/// indexes are left as literal text.
pub fn substitute(matched: &TextMatch, template: &str) -> Option<String> {
    let index = capture_group_index(template)?;
    let value = matched.group(index)?;

    let replaced = token_regex().replace_all(template, |caps: &regex::Captures| {
        let token = &caps[0];
        match caps[1].parse::<usize>() {
            Ok(n) if n == index => value.to_string(),
            _ => token.to_string(),
        }
    });
    Some(replaced.into_owned())
}

pub fn strip_quotes(value: &str) -> String {
    value.chars().filter(|c| !QUOTE_SIGNS.contains(c)).collect()
}

/// The quote character at byte `pos` of `value`, or an empty string.
pub fn quote_at(value: &str, pos: usize) -> &str {
    match value.get(pos..pos + 1) {
        Some(s) if s.starts_with(QUOTE_SIGNS) => s,
        _ => "",
    }
}

/// Resolve the link span of `matched` for `capture_group_ref`.
///
/// `None` in both failure cases of [`locate_span`]; use that function when
/// the caller needs to tell them apart.
pub fn resolve_span(matched: &TextMatch, capture_group_ref: &str) -> Option<Span> {
    locate_span(matched, capture_group_ref).into_span()
}

/// Resolve and locate the link span of `matched` for `capture_group_ref`.
pub fn locate_span(matched: &TextMatch, capture_group_ref: &str) -> SpanResolution {
    let Some(raw) = substitute(matched, capture_group_ref) else {
        return SpanResolution::Unresolved;
    };
    let value = strip_quotes(&raw);
    if raw.is_empty() || value.is_empty() {
        return SpanResolution::Unresolved;
    }

    let Some(located) = matched.text.find(raw.as_str()) else {
        // Quotes added by the template itself: anchor on the bare value instead.
        let Some(start) = matched.text.find(value.as_str()) else {
            return SpanResolution::NotLocated;
        };
        return SpanResolution::Located(Span {
            end: start + value.len(),
            raw: value.clone(),
            value,
            start,
            leading_quote: String::new(),
            trailing_quote: String::new(),
        });
    };

    let leading_quote = quote_at(&raw, 0).to_string();
    let trailing_quote = if raw.len() > 1 {
        quote_at(&raw, raw.len() - 1).to_string()
    } else {
        String::new()
    };

    let start = located + leading_quote.len();
    let end = start + value.len();

    SpanResolution::Located(Span {
        value,
        raw,
        start,
        end,
        leading_quote,
        trailing_quote,
    })
}
