//! Attribute mapping: per-match data computed alongside each link.
//!
//! Values are either literals or capture-group templates (`$1`,
//! `https://example.com/$2`). Templates resolve against the current match
//! with quotes removed; anything without a usable token is kept literally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::matcher::TextMatch;
use super::span::{strip_quotes, substitute};

/// Attribute name → literal value or capture-group template.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct AttributeMapping {
    entries: BTreeMap<String, String>,
}

impl AttributeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.entries.insert(name.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Resolve every entry against `matched`.
    pub fn resolve(&self, matched: &TextMatch) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(name, value)| {
                let resolved = match substitute(matched, value) {
                    Some(substituted) if !substituted.is_empty() => strip_quotes(&substituted),
                    _ => value.clone(),
                };
                (name.clone(), resolved)
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
