//! Syntax tree nodes and their code-generation attributes.

mod node;
mod type_spec;

pub use node::*;
pub use type_spec::*;
