//! Symbol resolution: stamps each identifier node that denotes a variable in
//! scope with its resolved address, ahead of code generation.
//!
//! Declared locals draw their addresses from the same frame allocator the
//! generator later uses for temporaries, so the two can never collide within
//! one function scope.

use log::debug;

use crate::{
    ast::{is_builtin_type_name, Node, NodeKind, TypeSpec},
    il::{Address, FrameAllocator},
};

use super::symbol_table::{Symbol, SymbolTable};

pub struct Resolver<'a> {
    symbols: SymbolTable,
    frame: &'a mut FrameAllocator,
}
impl<'a> Resolver<'a> {
    pub fn new(frame: &'a mut FrameAllocator) -> Self {
        let mut symbols = SymbolTable::new();
        // Built-in functions available to every program.
        symbols.declare(
            "print",
            Symbol::function(Address::name("print"), vec![TypeSpec::Int], TypeSpec::None),
        );
        symbols.declare(
            "readint",
            Symbol::function(Address::name("readint"), vec![], TypeSpec::Int),
        );
        Self { symbols, frame }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn resolve(&mut self, node: &mut Node) {
        match &node.kind {
            NodeKind::VarDecl => {
                // The initializer is resolved first: the declared name is
                // not in scope inside its own initializer.
                for child in node.children.iter_mut().skip(1) {
                    self.resolve(child);
                }
                let type_spec = node.child(1).map(declared_type).unwrap_or(TypeSpec::Int);
                if let Some(id) = node.children.first_mut() {
                    if let NodeKind::Identifier(name) = &id.kind {
                        let name = name.clone();
                        let address = self.frame.alloc_local();
                        if !self
                            .symbols
                            .declare(&name, Symbol::variable(address.clone(), type_spec))
                        {
                            debug!("'{}' redeclared in the same scope", name);
                        }
                        id.place = address;
                    }
                }
            }
            NodeKind::Identifier(name) => {
                if let Some(symbol) = self.symbols.lookup(name) {
                    node.place = symbol.address.clone();
                } else if !is_builtin_type_name(name) {
                    // Left for the generator to diagnose.
                    debug!("identifier '{}' not found in any scope", name);
                }
            }
            NodeKind::Block => {
                self.symbols.enter_scope();
                for child in &mut node.children {
                    self.resolve(child);
                }
                self.symbols.exit_scope();
            }
            _ => {
                for child in &mut node.children {
                    self.resolve(child);
                }
            }
        }
    }
}

fn declared_type(node: &Node) -> TypeSpec {
    match &node.kind {
        NodeKind::TypeDouble => TypeSpec::Double,
        NodeKind::TypeBoolean => TypeSpec::Boolean,
        NodeKind::TypeString => TypeSpec::Str,
        _ => TypeSpec::Int,
    }
}
