//! Symbol resolution. Resolution runs before the intermediate-code passes
//! and stamps identifier nodes with the addresses the generator consumes.

mod resolver;
mod symbol_table;

pub use resolver::Resolver;
pub use symbol_table::{Symbol, SymbolTable};
