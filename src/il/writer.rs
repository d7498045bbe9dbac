//! Textual rendering of generated intermediate code.
//!
//! An intermediate-code file carries three ordered sections: `.string` for
//! the string constant pool, `.data` for global variable declarations and
//! `.code` for the instruction list. Rendering is pure formatting over
//! already-final sequences, so serializing the same input twice produces
//! byte-identical text.

use std::fmt::{self, Display, Formatter};

use super::tac::{Address, InstrSeq};

pub struct TacFile<'a> {
    pub strings: &'a [String],
    pub globals: &'a [(String, Address)],
    pub code: &'a InstrSeq,
}
impl Display for TacFile<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, ".string")?;
        for (index, text) in self.strings.iter().enumerate() {
            writeln!(f, "    {}: {:?}", index, text)?;
        }
        writeln!(f, ".data")?;
        for (name, address) in self.globals {
            writeln!(f, "    {}: {}", name, address)?;
        }
        writeln!(f, ".code")?;
        if self.code.is_empty() {
            writeln!(f, "; no instructions")?;
        } else {
            write!(f, "{}", self.code)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::il::{Instr, Opcode};

    use super::*;

    #[test]
    fn sections_appear_in_order() {
        let strings = vec!["hi".to_string()];
        let globals = vec![("total".to_string(), Address::global(0))];
        let code = InstrSeq::singleton(Instr::assign(Address::local(0), Address::immediate(1)));
        let file = TacFile {
            strings: &strings,
            globals: &globals,
            code: &code,
        };

        assert_eq!(
            ".string\n    0: \"hi\"\n.data\n    total: global:0\n.code\nASSIGN\tlocal:0, imm:1, _\n",
            file.to_string()
        );
    }

    #[test]
    fn empty_code_renders_explicit_comment() {
        let code = InstrSeq::empty();
        let file = TacFile {
            strings: &[],
            globals: &[],
            code: &code,
        };

        assert_eq!(".string\n.data\n.code\n; no instructions\n", file.to_string());
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut code = InstrSeq::singleton(Instr::assign(Address::local(0), Address::immediate(5)));
        code.push(Instr::new(
            Opcode::IAdd,
            Address::local(8),
            Address::local(0),
            Address::immediate(1),
        ));
        let file = TacFile {
            strings: &[],
            globals: &[],
            code: &code,
        };

        assert_eq!(file.to_string(), file.to_string());
    }
}
