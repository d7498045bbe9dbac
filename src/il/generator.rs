//! Intermediate code synthesis.
//!
//! A single post-order recursive pass over the syntax tree. Each node ends
//! up with a `place` (the address holding its value, or the none sentinel)
//! and a `code` sequence computing it. Children are visited first; a node's
//! own code is the non-destructive concatenation of its children's code,
//! followed by whatever instruction the node itself contributes. The
//! inherited control-flow attributes are assumed to be fully propagated
//! before this pass runs.

use log::{error, warn};

use crate::ast::{is_builtin_type_name, CmpOp, Node, NodeKind};

use super::{
    error::CodegenError,
    frame_allocator::FrameAllocator,
    tac::{Address, Instr, InstrSeq, Opcode},
};

pub struct Generator {
    frame: FrameAllocator,
    strings: Vec<String>,
    diagnostics: Vec<CodegenError>,
}
impl Generator {
    pub fn new(frame: FrameAllocator) -> Self {
        Self {
            frame,
            strings: vec![],
            diagnostics: vec![],
        }
    }

    /// The string constant pool built up from string literals.
    pub fn string_table(&self) -> &[String] {
        &self.strings
    }

    /// The internal diagnostics collected during generation. A non-empty
    /// list means an upstream pass handed us a malformed or unresolved tree.
    pub fn diagnostics(&self) -> &[CodegenError] {
        &self.diagnostics
    }

    /// Synthesizes `place` and `code` for `node` and its whole subtree.
    pub fn synthesize(&mut self, node: &mut Node) {
        for child in &mut node.children {
            self.synthesize(child);
        }
        let code = children_code(node);

        match &node.kind {
            NodeKind::TypeInt
            | NodeKind::TypeDouble
            | NodeKind::TypeBoolean
            | NodeKind::TypeString
            | NodeKind::TypeName(_) => {
                node.code = code;
            }
            NodeKind::IntLiteral(value) => {
                let temp = self.frame.next_temp();
                let load = Instr::assign(temp.clone(), Address::immediate(*value));
                node.code = code.append(InstrSeq::singleton(load));
                node.place = temp;
            }
            NodeKind::RealLiteral(value) => {
                let temp = self.frame.next_temp();
                let load = Instr::assign(temp.clone(), Address::real(*value)).with_double();
                node.code = code.append(InstrSeq::singleton(load));
                node.place = temp;
            }
            NodeKind::StringLiteral(text) => {
                let index = self.intern_string(text);
                let temp = self.frame.next_temp();
                let load = Instr::assign(temp.clone(), Address::constant(index)).with_pointer();
                node.code = code.append(InstrSeq::singleton(load));
                node.place = temp;
            }
            NodeKind::Identifier(name) => {
                // The resolver stamps every identifier that denotes a
                // variable in scope; built-in type names legitimately have
                // no address. Anything else reaching this point unresolved
                // is an upstream defect, so record it and substitute a
                // temporary to keep generating.
                if node.place.is_none() && !is_builtin_type_name(name) {
                    let name = name.clone();
                    error!("identifier '{}' reached code generation unresolved", name);
                    self.diagnostics
                        .push(CodegenError::UnresolvedIdentifier(name));
                    node.place = self.frame.next_temp();
                }
                node.code = code;
            }
            NodeKind::VarDecl => {
                node.place = node
                    .child(0)
                    .map(|id| id.place.clone())
                    .unwrap_or_else(Address::none);
                let mut code = code;
                if let Some(init) = node.child(2) {
                    if init.place.is_some() && node.place.is_some() {
                        let mut store = Instr::assign(node.place.clone(), init.place.clone());
                        match node.child(1).map(|t| &t.kind) {
                            Some(NodeKind::TypeDouble) => store = store.with_double(),
                            Some(NodeKind::TypeString) => store = store.with_pointer(),
                            _ => {}
                        }
                        code.push(store);
                    }
                }
                node.code = code;
            }
            NodeKind::Add | NodeKind::Subtract | NodeKind::Multiply | NodeKind::Divide => {
                let op = match &node.kind {
                    NodeKind::Add => Opcode::IAdd,
                    NodeKind::Subtract => Opcode::ISub,
                    NodeKind::Multiply => Opcode::IMul,
                    _ => Opcode::IDiv,
                };
                self.binary(node, code, op);
            }
            NodeKind::Comparison(op) => {
                let op = match op.unwrap_or(CmpOp::Eq) {
                    CmpOp::Eq => Opcode::Eq,
                    CmpOp::Ne => Opcode::Ne,
                    CmpOp::Lt => Opcode::Lt,
                    CmpOp::Le => Opcode::Le,
                    CmpOp::Gt => Opcode::Gt,
                    CmpOp::Ge => Opcode::Ge,
                };
                self.binary(node, code, op);
            }
            NodeKind::Assignment => match node.children.len() {
                // A bare declaration passes straight through.
                1 => {
                    node.place = node.children[0].place.clone();
                    node.code = code;
                }
                0 => node.code = code,
                _ => {
                    let target = self.place_or_temp(node.child(0));
                    let value = self.place_or_temp(node.child(1));
                    let store = Instr::assign(target.clone(), value);
                    node.code = code.append(InstrSeq::singleton(store));
                    node.place = target;
                }
            },
            NodeKind::FunctionCall => {
                let mut code = code;
                let mut arg_count = 0;
                for arg in node.children.iter().skip(1) {
                    if arg.place.is_none() {
                        warn!("skipping unresolved call argument at {}", arg.span);
                        continue;
                    }
                    code.push(Instr::new(
                        Opcode::Param,
                        Address::none(),
                        arg.place.clone(),
                        Address::none(),
                    ));
                    arg_count += 1;
                }
                let callee = node
                    .child(0)
                    .map(|callee| callee.place.clone())
                    .unwrap_or_else(Address::none);
                let temp = self.frame.next_temp();
                code.push(Instr::new(
                    Opcode::Call,
                    temp.clone(),
                    callee,
                    Address::immediate(arg_count),
                ));
                node.place = temp;
                node.code = code;
            }
            // Statement sequences and control structures contribute no
            // instructions of their own; their labels were wired by the
            // attribute propagator and their code is their children's.
            NodeKind::Block
            | NodeKind::While
            | NodeKind::If
            | NodeKind::Else
            | NodeKind::For
            | NodeKind::And
            | NodeKind::Or => {
                if node.children.len() == 1 && node.children[0].place.is_some() {
                    node.place = node.children[0].place.clone();
                } else if !code.is_empty() {
                    node.place = self.frame.next_temp();
                }
                node.code = code;
            }
        }
    }

    /// Emits a three-operand instruction for a binary node, or degrades to
    /// the children's code alone when an operand is missing or unresolved.
    fn binary(&mut self, node: &mut Node, code: InstrSeq, op: Opcode) {
        let lhs = node
            .child(0)
            .map(|child| child.place.clone())
            .unwrap_or_else(Address::none);
        let rhs = node
            .child(1)
            .map(|child| child.place.clone())
            .unwrap_or_else(Address::none);

        if lhs.is_none() || rhs.is_none() {
            let kind = describe(&node.kind);
            warn!("{} node is missing an operand, emitting children only", kind);
            self.diagnostics.push(CodegenError::MissingOperand(kind));
            node.code = code;
            return;
        }

        let temp = self.frame.next_temp();
        node.code = code.append(InstrSeq::singleton(Instr::new(op, temp.clone(), lhs, rhs)));
        node.place = temp;
    }

    fn place_or_temp(&mut self, child: Option<&Node>) -> Address {
        match child {
            Some(child) if child.place.is_some() => child.place.clone(),
            _ => {
                warn!("assignment side has no resolved place, substituting a temporary");
                self.diagnostics
                    .push(CodegenError::MissingOperand("assignment"));
                self.frame.next_temp()
            }
        }
    }

    fn intern_string(&mut self, text: &str) -> usize {
        if let Some(index) = self.strings.iter().position(|s| s == text) {
            return index;
        }
        self.strings.push(text.to_string());
        self.strings.len() - 1
    }
}

/// The non-destructive concatenation of the children's code, in child order.
/// Each child keeps its own sequence; the attributes stay read-only once
/// synthesized.
fn children_code(node: &Node) -> InstrSeq {
    node.children
        .iter()
        .fold(InstrSeq::empty(), |acc, child| acc.append(child.code.copy()))
}

fn describe(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Add => "addition",
        NodeKind::Subtract => "subtraction",
        NodeKind::Multiply => "multiplication",
        NodeKind::Divide => "division",
        NodeKind::Comparison(_) => "comparison",
        _ => "expression",
    }
}
