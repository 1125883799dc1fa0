pub mod config;
pub mod matcher;
pub mod span;
pub mod attributes;
pub mod strategy;
pub mod insert;

pub use config::*;
pub use matcher::*;
pub use span::*;
pub use attributes::*;
pub use strategy::*;
pub use insert::*;

#[cfg(test)]
mod tests;
