//! Error types for link insertion.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised at the public boundary, before any tree mutation.
///
/// Everything past argument validation degrades to "leave the text alone"
/// instead of surfacing here.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("must be called with an element container: {0}")]
    InvalidContainer(String),

    #[error("must be called with a valid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("must be called with a mapping object")]
    MissingMapping,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid tree: {0}")]
    InvalidTree(String),
}

impl LinkError {
    /// True for the argument errors `insert_links` fails fast on.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            LinkError::InvalidContainer(_) | LinkError::InvalidPattern(_) | LinkError::MissingMapping
        )
    }
}

impl From<LinkError> for JsValue {
    fn from(err: LinkError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkError>;
