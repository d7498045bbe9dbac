use std::collections::HashMap;

use crate::{ast::TypeSpec, il::Address};

/// What resolution records about a declared name.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub address: Address,
    pub type_spec: TypeSpec,
    pub mutable: bool,
    pub nullable: bool,
}
impl Symbol {
    pub fn variable(address: Address, type_spec: TypeSpec) -> Self {
        let nullable = type_spec == TypeSpec::Str;
        Self {
            address,
            type_spec,
            mutable: true,
            nullable,
        }
    }

    pub fn function(address: Address, params: Vec<TypeSpec>, returns: TypeSpec) -> Self {
        Self {
            address,
            type_spec: TypeSpec::Function(params, Box::new(returns)),
            mutable: false,
            nullable: false,
        }
    }
}

/// A hierarchical symbol table: a stack of scopes, innermost last. Lookup
/// walks outwards, so inner declarations shadow outer ones.
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}
impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        // The outermost scope holds the built-ins and never closes.
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares a name in the innermost scope. Returns `false` when the name
    /// was already declared there.
    pub fn declare<S: Into<String>>(&mut self, name: S, symbol: Symbol) -> bool {
        let scope = self
            .scopes
            .last_mut()
            .expect("the global scope is never closed");
        scope.insert(name.into(), symbol).is_none()
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}
impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_var(offset: i64) -> Symbol {
        Symbol::variable(Address::local(offset), TypeSpec::Int)
    }

    #[test]
    fn lookup_finds_declared_symbol() {
        let mut symbols = SymbolTable::new();
        symbols.declare("x", int_var(0));

        assert_eq!(Address::local(0), symbols.lookup("x").unwrap().address);
        assert!(symbols.lookup("y").is_none());
    }

    #[test]
    fn inner_scopes_shadow_and_unwind() {
        let mut symbols = SymbolTable::new();
        symbols.declare("x", int_var(0));

        symbols.enter_scope();
        symbols.declare("x", int_var(8));
        assert_eq!(Address::local(8), symbols.lookup("x").unwrap().address);

        symbols.exit_scope();
        assert_eq!(Address::local(0), symbols.lookup("x").unwrap().address);
    }

    #[test]
    fn outer_symbols_remain_visible_in_inner_scopes() {
        let mut symbols = SymbolTable::new();
        symbols.declare("x", int_var(0));
        symbols.enter_scope();

        assert!(symbols.lookup("x").is_some());
    }

    #[test]
    fn redeclaration_in_same_scope_is_reported() {
        let mut symbols = SymbolTable::new();
        assert!(symbols.declare("x", int_var(0)));
        assert!(!symbols.declare("x", int_var(8)));
    }

    #[test]
    fn string_variables_are_nullable() {
        let symbol = Symbol::variable(Address::local(0), TypeSpec::Str);
        assert!(symbol.nullable);
        assert!(symbol.mutable);
    }
}
