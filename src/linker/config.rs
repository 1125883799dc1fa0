//! Linker configuration and the settings collaborator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Settings key that toggles the indicator class on new links.
pub const SHOW_LINK_INDICATOR: &str = "showLinkIndicator";

// =============================================================================
// Settings store
// =============================================================================

/// Boolean key-value read used while building link elements.
pub trait Settings {
    fn get(&self, option: &str) -> bool;
}

/// Typed settings record, loadable from JSON.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkerSettings {
    #[serde(default)]
    pub show_link_indicator: bool,
}

impl Settings for LinkerSettings {
    fn get(&self, option: &str) -> bool {
        match option {
            SHOW_LINK_INDICATOR => self.show_link_indicator,
            _ => false,
        }
    }
}

/// Free-form name → flag store. Unknown names read as `false`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct MapSettings {
    values: HashMap<String, bool>,
}

impl MapSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, option: &str, value: bool) -> Self {
        self.set(option, value);
        self
    }

    pub fn set(&mut self, option: &str, value: bool) {
        self.values.insert(option.to_string(), value);
    }
}

impl Settings for MapSettings {
    fn get(&self, option: &str) -> bool {
        self.values.get(option).copied().unwrap_or(false)
    }
}

impl<S: Settings + ?Sized> Settings for &S {
    fn get(&self, option: &str) -> bool {
        (**self).get(option)
    }
}

// =============================================================================
// LinkerConfig
// =============================================================================

/// Shape of the link elements a pass creates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LinkerConfig {
    /// Class marking an element as a link; also the idempotence marker.
    #[serde(default = "default_link_class")]
    pub link_class: String,
    /// Secondary class added when the indicator setting is on.
    #[serde(default = "default_indicator_class")]
    pub indicator_class: String,
    /// Settings key consulted for the indicator class.
    #[serde(default = "default_indicator_setting")]
    pub indicator_setting: String,
    #[serde(default = "default_link_tag")]
    pub link_tag: String,
    /// Tag of the single child holding the display text.
    #[serde(default = "default_text_tag")]
    pub text_tag: String,
    /// Copy computed attribute maps onto new links as `data-*` attributes.
    #[serde(default)]
    pub attach_attributes: bool,
}

fn default_link_class() -> String { "textlinker-link".to_string() }
fn default_indicator_class() -> String { "textlinker-line-indicator".to_string() }
fn default_indicator_setting() -> String { SHOW_LINK_INDICATOR.to_string() }
fn default_link_tag() -> String { "a".to_string() }
fn default_text_tag() -> String { "span".to_string() }

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            link_class: default_link_class(),
            indicator_class: default_indicator_class(),
            indicator_setting: default_indicator_setting(),
            link_tag: default_link_tag(),
            text_tag: default_text_tag(),
            attach_attributes: false,
        }
    }
}
