//! LinkCortex: WASM facade over the link inserter.
//!
//! # Usage (JavaScript)
//! ```javascript,ignore
//! import init, { LinkCortex } from 'textlinker';
//!
//! await init();
//! const cortex = new LinkCortex({ attach_attributes: true });
//! cortex.setSetting('showLinkIndicator', true);
//!
//! const { tree, report } = cortex.insertLinks(
//!   { type: 'element', tag: 'td', children: [{ type: 'text', text: "require('lodash')" }] },
//!   "require\\((['\"][^'\"]+['\"])\\)",
//!   { target: '$1', type: 'npm' },
//! );
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::dom::{Document, NodeSpec};
use crate::error::LinkError;
use crate::linker::{AttributeMapping, InsertReport, LinkInserter, LinkerConfig, MapSettings, Settings};

/// Result handed back to JavaScript.
#[derive(Serialize)]
pub struct LinkResult {
    pub tree: NodeSpec,
    pub report: InsertReport,
    /// Wall time of the whole call, tree conversion included.
    pub total_ms: f64,
}

#[wasm_bindgen]
pub struct LinkCortex {
    inserter: LinkInserter<MapSettings>,
}

#[wasm_bindgen]
impl LinkCortex {
    /// Create a new LinkCortex with optional configuration
    ///
    /// # Arguments
    /// * `config` - Optional JSON configuration object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<LinkCortex, JsValue> {
        let config: LinkerConfig = if config.is_null() || config.is_undefined() {
            LinkerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| LinkError::InvalidConfig(e.to_string()))?
        };

        Ok(Self {
            inserter: LinkInserter::with_settings(config, MapSettings::new()),
        })
    }

    #[wasm_bindgen(js_name = setSetting)]
    pub fn set_setting(&mut self, name: &str, value: bool) {
        self.inserter.settings_mut().set(name, value);
    }

    #[wasm_bindgen(js_name = getSetting)]
    pub fn get_setting(&self, name: &str) -> bool {
        self.inserter.settings().get(name)
    }

    /// Insert links into a serialized tree and return the rewritten tree with a report.
    ///
    /// # Arguments
    /// * `tree` - `NodeSpec` object whose root is the container
    /// * `pattern` - Regular expression source
    /// * `mapping` - Attribute name → literal or `$N` template
    /// * `capture_group` - Optional reference, `$1` when omitted
    #[wasm_bindgen(js_name = insertLinks)]
    pub fn insert_links(
        &self,
        tree: JsValue,
        pattern: &str,
        mapping: JsValue,
        capture_group: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let start = js_sys::Date::now();
        let spec: NodeSpec = serde_wasm_bindgen::from_value(tree)
            .map_err(|e| LinkError::InvalidTree(e.to_string()))?;
        let mapping: Option<AttributeMapping> = if mapping.is_null() || mapping.is_undefined() {
            None
        } else {
            Some(
                serde_wasm_bindgen::from_value(mapping)
                    .map_err(|_| LinkError::MissingMapping)?,
            )
        };

        let (mut document, root) = Document::from_spec(&spec)?;
        let report = self.inserter.insert_links_source(
            &mut document,
            root,
            pattern,
            mapping.as_ref(),
            capture_group.as_deref(),
        )?;

        let tree = document
            .to_spec(root)
            .ok_or_else(|| LinkError::InvalidTree("container is not an element".to_string()))?;

        let total_ms = js_sys::Date::now() - start;
        serde_wasm_bindgen::to_value(&LinkResult { tree, report, total_ms }).map_err(|e| {
            web_sys::console::error_1(&format!("[LinkCortex] Serialization failed: {:?}", e).into());
            JsValue::from_str(&format!("Serialization error: {}", e))
        })
    }

    /// Get the active configuration
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.inserter.config()).unwrap_or(JsValue::NULL)
    }
}
