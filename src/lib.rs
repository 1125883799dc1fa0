//! TextLinker: match-and-wrap link insertion
//!
//! A Rust/WASM engine that finds pattern matches in rendered text and wraps
//! the linkable part of each match in a link element, leaving surrounding
//! text, existing markup, and earlier links intact.
//!
//! # Architecture
//!
//! ## Document tree
//! - `dom/node.rs` - Node, ElementData, class token handling
//! - `dom/tree.rs` - Document: arena tree with parent back-references
//! - `dom/serialize.rs` - HTML output and the serde `NodeSpec` tree format
//!
//! ## Linker
//! - `matcher.rs` - Pattern Matcher: regex over text split across nodes, portions
//! - `span.rs` - Span Resolver: `$N` references, quote stripping, offsets
//! - `strategy.rs` - Wrap Strategy: guard, inner split, exact link, ancestor wrap
//! - `attributes.rs` - Attribute mapping resolved per match
//! - `insert.rs` - `insert_links` entry point and `LinkInserter`
//! - `config.rs` - LinkerConfig and the Settings collaborator
//!
//! # Usage (Rust)
//! ```
//! use textlinker::{insert_links, AttributeMapping, Document};
//!
//! let mut doc = Document::new();
//! let td = doc.create_element("td");
//! let code = doc.create_text("const _ = require('lodash');");
//! doc.append_child(td, code);
//!
//! let mapping = AttributeMapping::new().with("target", "$1");
//! insert_links(&mut doc, td, r#"require\((['"][^'"]+['"])\)"#, Some(&mapping), None).unwrap();
//!
//! assert_eq!(
//!     doc.inner_html(td),
//!     "const _ = require('<a class=\"textlinker-link\"><span>lodash</span></a>');"
//! );
//! ```

pub mod dom;
pub mod error;
pub mod linker;
pub mod wasm;

pub use dom::*;
pub use error::{LinkError, Result};
pub use linker::*;
pub use wasm::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("textlinker v{}", env!("CARGO_PKG_VERSION"))
}
