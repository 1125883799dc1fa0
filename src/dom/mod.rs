pub mod node;
pub mod tree;
pub mod serialize;

pub use node::*;
pub use tree::*;
pub use serialize::*;
