//! Three-Address Code: addresses, instructions and instruction sequences.

use std::fmt::{self, Display, Formatter};

/// The address space an operand lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Global,
    Class,
    Label,
    Constant,
    Name,
    /// The explicit "no value" sentinel region.
    None,
    Struct,
    Param,
    Local,
    Immediate,
    FramePointer,
    StackPointer,
    Memory,
    Return,
}
impl Display for Region {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let tag = match self {
            Region::Global => "global",
            Region::Class => "class",
            Region::Label => "label",
            Region::Constant => "const",
            Region::Name => "name",
            Region::None => "none",
            Region::Struct => "struct",
            Region::Param => "param",
            Region::Local => "local",
            Region::Immediate => "imm",
            Region::FramePointer => "fp",
            Region::StackPointer => "sp",
            Region::Memory => "mem",
            Region::Return => "ret",
        };
        f.write_str(tag)
    }
}

/// The payload of an address: a numeric offset, a real immediate, or a
/// symbolic name.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressValue {
    Offset(i64),
    Real(f64),
    Name(String),
}
impl Display for AddressValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            AddressValue::Offset(offset) => write!(f, "{}", offset),
            AddressValue::Real(real) => write!(f, "{}", real),
            AddressValue::Name(name) => f.write_str(name),
        }
    }
}

/// A tagged location descriptor identifying where a value lives.
///
/// Addresses are small value types with structural equality. The none-region
/// address stands for "no value"; nodes that did not produce a value leave
/// their `place` set to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub region: Region,
    pub value: AddressValue,
}
impl Address {
    pub const fn none() -> Self {
        Self {
            region: Region::None,
            value: AddressValue::Offset(0),
        }
    }

    pub fn global(offset: i64) -> Self {
        Self {
            region: Region::Global,
            value: AddressValue::Offset(offset),
        }
    }

    pub fn local(offset: i64) -> Self {
        Self {
            region: Region::Local,
            value: AddressValue::Offset(offset),
        }
    }

    pub fn label(index: usize) -> Self {
        Self {
            region: Region::Label,
            value: AddressValue::Offset(index as i64),
        }
    }

    pub fn immediate(value: i64) -> Self {
        Self {
            region: Region::Immediate,
            value: AddressValue::Offset(value),
        }
    }

    pub fn real(value: f64) -> Self {
        Self {
            region: Region::Immediate,
            value: AddressValue::Real(value),
        }
    }

    /// A reference into the string constant pool.
    pub fn constant(index: usize) -> Self {
        Self {
            region: Region::Constant,
            value: AddressValue::Offset(index as i64),
        }
    }

    pub fn name<S: Into<String>>(name: S) -> Self {
        Self {
            region: Region::Name,
            value: AddressValue::Name(name.into()),
        }
    }

    pub fn is_none(&self) -> bool {
        self.region == Region::None
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }
}
impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_none() {
            return f.write_str("_");
        }
        write!(f, "{}:{}", self.region, self.value)
    }
}

/// A TAC opcode. The generator emits the integer-typed arithmetic variants;
/// the generic and double-typed variants, the memory operations and the
/// declaration pseudo-ops belong to later pipeline stages that consume the
/// same instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    // Generic arithmetic.
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    // Typed arithmetic.
    IAdd,
    ISub,
    IMul,
    IDiv,
    DAdd,
    DSub,
    DMul,
    DDiv,
    // Integer-typed comparisons.
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    Ne,
    Assign,
    // Memory operations.
    AddrOf,
    Load,
    Store,
    // Branches.
    Goto,
    JumpEq,
    JumpLt,
    JumpLe,
    JumpGt,
    JumpGe,
    JumpNe,
    JumpTrue,
    JumpFalse,
    // Calls.
    Param,
    Call,
    Return,
    // Stack and frame management.
    Push,
    Pop,
    FrameAlloc,
    FrameFree,
    // Declaration pseudo-ops.
    GlobalDecl,
    ProcBegin,
    LocalDecl,
    LabelDecl,
    ProcEnd,
    Prototype,
}
impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mnemonic = match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Neg => "NEG",
            Opcode::IAdd => "IADD",
            Opcode::ISub => "ISUB",
            Opcode::IMul => "IMUL",
            Opcode::IDiv => "IDIV",
            Opcode::DAdd => "DADD",
            Opcode::DSub => "DSUB",
            Opcode::DMul => "DMUL",
            Opcode::DDiv => "DDIV",
            Opcode::Eq => "EQ",
            Opcode::Lt => "LT",
            Opcode::Le => "LE",
            Opcode::Gt => "GT",
            Opcode::Ge => "GE",
            Opcode::Ne => "NE",
            Opcode::Assign => "ASSIGN",
            Opcode::AddrOf => "ADDROF",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Goto => "GOTO",
            Opcode::JumpEq => "JEQ",
            Opcode::JumpLt => "JLT",
            Opcode::JumpLe => "JLE",
            Opcode::JumpGt => "JGT",
            Opcode::JumpGe => "JGE",
            Opcode::JumpNe => "JNE",
            Opcode::JumpTrue => "JTRUE",
            Opcode::JumpFalse => "JFALSE",
            Opcode::Param => "PARAM",
            Opcode::Call => "CALL",
            Opcode::Return => "RET",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::FrameAlloc => "FRAME",
            Opcode::FrameFree => "UNFRAME",
            Opcode::GlobalDecl => "GLOBAL",
            Opcode::ProcBegin => "PROC",
            Opcode::LocalDecl => "LOCAL",
            Opcode::LabelDecl => "LABEL",
            Opcode::ProcEnd => "END",
            Opcode::Prototype => "PROTO",
        };
        f.write_str(mnemonic)
    }
}

/// A single TAC instruction: an opcode, up to three addresses, and the width
/// flags of the value it computes.
#[derive(Debug, Clone, PartialEq)]
pub struct Instr {
    pub op: Opcode,
    pub dest: Address,
    pub src1: Address,
    pub src2: Address,
    pub double: bool,
    pub pointer: bool,
}
impl Instr {
    pub fn new(op: Opcode, dest: Address, src1: Address, src2: Address) -> Self {
        Self {
            op,
            dest,
            src1,
            src2,
            double: false,
            pointer: false,
        }
    }

    pub fn assign(dest: Address, src: Address) -> Self {
        Self::new(Opcode::Assign, dest, src, Address::none())
    }

    pub fn with_double(mut self) -> Self {
        self.double = true;
        self
    }

    pub fn with_pointer(mut self) -> Self {
        self.pointer = true;
        self
    }
}
impl Display for Instr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}\t{}, {}, {}", self.op, self.dest, self.src1, self.src2)
    }
}

/// An ordered, owned sequence of instructions. Order encodes evaluation and
/// execution order; no operation on a sequence ever reorders it.
///
/// The type is deliberately move-only. [`InstrSeq::append`] consumes both
/// sequences and splices destructively; composing without consuming the left
/// side goes through the explicit [`InstrSeq::copy`], so a subtree's retained
/// code can never be aliased by a sibling's.
#[derive(Debug, Default, PartialEq)]
pub struct InstrSeq {
    instrs: Vec<Instr>,
}
impl InstrSeq {
    pub fn empty() -> Self {
        Self { instrs: vec![] }
    }

    /// Wraps one instruction as a one-element sequence.
    pub fn singleton(instr: Instr) -> Self {
        Self {
            instrs: vec![instr],
        }
    }

    pub fn push(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    /// Destructively splices `other` onto the tail of `self`. Either side may
    /// be empty.
    pub fn append(mut self, mut other: InstrSeq) -> InstrSeq {
        if self.instrs.is_empty() {
            return other;
        }
        self.instrs.append(&mut other.instrs);
        self
    }

    /// Non-destructive composition: `self` is copied, `other` is consumed.
    pub fn concat(&self, other: InstrSeq) -> InstrSeq {
        self.copy().append(other)
    }

    /// Returns a fully independent sequence with identical instructions.
    pub fn copy(&self) -> InstrSeq {
        Self {
            instrs: self.instrs.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<Instr> {
        self.instrs.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<Instr> {
        self.instrs.iter_mut()
    }
}
impl Display for InstrSeq {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for instr in self.iter() {
            writeln!(f, "{}", instr)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign(offset: i64, value: i64) -> Instr {
        Instr::assign(Address::local(offset), Address::immediate(value))
    }

    #[test]
    fn append_preserves_order() {
        let first = InstrSeq::singleton(assign(0, 1));
        let second = InstrSeq::singleton(assign(8, 2));

        let combined = first.append(second);

        let dests: Vec<_> = combined.iter().map(|i| i.dest.clone()).collect();
        assert_eq!(vec![Address::local(0), Address::local(8)], dests);
    }

    #[test]
    fn append_tolerates_empty_sides() {
        let instr = InstrSeq::singleton(assign(0, 1));
        assert_eq!(1, InstrSeq::empty().append(instr.copy()).len());
        assert_eq!(1, instr.append(InstrSeq::empty()).len());
        assert_eq!(0, InstrSeq::empty().append(InstrSeq::empty()).len());
    }

    #[test]
    fn copy_is_independent_of_original() {
        let mut original = InstrSeq::singleton(assign(0, 1));
        original.push(assign(8, 2));

        let mut copied = original.copy();
        assert_eq!(original, copied);

        for instr in copied.iter_mut() {
            instr.dest = Address::local(64);
        }
        assert_eq!(Address::local(0), original.iter().next().unwrap().dest);
    }

    #[test]
    fn concat_length_law_holds() {
        let mut left = InstrSeq::singleton(assign(0, 1));
        left.push(assign(8, 2));
        let right = InstrSeq::singleton(assign(16, 3));

        assert_eq!(3, left.concat(right).len());
        assert_eq!(2, left.concat(InstrSeq::empty()).len());
        assert_eq!(0, InstrSeq::empty().concat(InstrSeq::empty()).len());
        // The left side survives a concat.
        assert_eq!(2, left.len());
    }

    #[test]
    fn instructions_render_tab_separated() {
        let instr = Instr::new(
            Opcode::IAdd,
            Address::local(16),
            Address::local(0),
            Address::immediate(1),
        );
        assert_eq!("IADD\tlocal:16, local:0, imm:1", instr.to_string());
    }

    #[test]
    fn none_operands_render_as_placeholder() {
        let instr = Instr::assign(Address::local(0), Address::immediate(5));
        assert_eq!("ASSIGN\tlocal:0, imm:5, _", instr.to_string());
    }

    #[test]
    fn addresses_render_as_region_and_value() {
        assert_eq!("global:16", Address::global(16).to_string());
        assert_eq!("label:3", Address::label(3).to_string());
        assert_eq!("const:0", Address::constant(0).to_string());
        assert_eq!("name:print", Address::name("print").to_string());
        assert_eq!("imm:2.5", Address::real(2.5).to_string());
        assert_eq!("_", Address::none().to_string());
    }
}
