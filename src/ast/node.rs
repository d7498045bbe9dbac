//! Generic syntax tree nodes, extended with the attributes the intermediate
//! code generator computes.
//!
//! A node is produced by the parser as a kind plus an ordered child list.
//! Code generation adds two synthesized attributes (`place`, `code`) and four
//! inherited control-flow attributes (`first`, `follow`, `on_true`,
//! `on_false`). The inherited attributes are optional values: `None` means
//! "not propagated", which keeps it distinct from the none-region address
//! that a legitimately absent `place` uses.

use std::fmt::{self, Display};

use crate::{
    il::{Address, InstrSeq},
    span::Span,
};

/// A comparison operator, as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}
impl CmpOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }
}
impl Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let token = match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        };
        f.write_str(token)
    }
}

/// The closed set of node kinds the generator dispatches on. Adding a kind is
/// a compile-time obligation for every `match` over this enum.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Built-in type annotations. These produce no code and no place.
    TypeInt,
    TypeDouble,
    TypeBoolean,
    TypeString,
    TypeName(String),
    // Literals.
    IntLiteral(i64),
    RealLiteral(f64),
    StringLiteral(String),
    Identifier(String),
    /// Children: identifier, type annotation, optional initializer.
    VarDecl,
    // Binary arithmetic, children: lhs, rhs.
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Children: lhs, rhs. Carries the operator token when the parser saw
    /// one; comparison without an operator defaults to equality.
    Comparison(Option<CmpOp>),
    /// Children: either a bare declaration, or target and value.
    Assignment,
    /// Children: callee identifier, then the arguments in source order.
    FunctionCall,
    /// A statement sequence.
    Block,
    // Control structures, children: condition and body (plus an optional
    // `Else` clause for `If`).
    While,
    If,
    Else,
    For,
    // Short-circuit boolean operators, children: lhs, rhs.
    And,
    Or,
}

/// A syntax tree node. The tree arrives from the parser with `kind`,
/// `children` and `span` filled in; identifier places are stamped by symbol
/// resolution, the inherited label attributes by the control-flow propagator,
/// and `place`/`code` by the code generator. Each attribute is written
/// exactly once and read-only afterwards.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    pub span: Span,
    /// Synthesized: where this node's value lives.
    pub place: Address,
    /// Synthesized: the instructions that compute the value.
    pub code: InstrSeq,
    /// Inherited: the label marking this node's entry point.
    pub first: Option<Address>,
    /// Inherited: the label of whatever executes after this node.
    pub follow: Option<Address>,
    /// Inherited: the short-circuit target when this condition holds.
    pub on_true: Option<Address>,
    /// Inherited: the short-circuit target when this condition fails.
    pub on_false: Option<Address>,
}
impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: vec![],
            span: Span::zero(),
            place: Address::none(),
            code: InstrSeq::empty(),
            first: None,
            follow: None,
            on_true: None,
            on_false: None,
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn identifier<S: Into<String>>(name: S) -> Self {
        Self::new(NodeKind::Identifier(name.into()))
    }

    pub fn int_literal(value: i64) -> Self {
        Self::new(NodeKind::IntLiteral(value))
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }
}
