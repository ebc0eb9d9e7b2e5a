//! Decoded Instruction Records.
//!
//! An [`Instruction`] is the immutable, already-decoded form of one program
//! line. Register fields that an opcode does not use are left at zero. The
//! textual form produced by [`std::fmt::Display`] is the same comma-separated
//! syntax accepted by [`crate::sim::loader::parse_program`].

use std::fmt;

use serde::Serialize;

use super::opcode::Opcode;
use crate::common::Word;

/// One decoded instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// Operation to perform.
    pub opcode: Opcode,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Third source register index (`STR` only).
    pub rs3: usize,
    /// Signed immediate operand.
    pub imm: Word,
}

impl Instruction {
    /// Builds a register-register instruction (`ADD` .. `XOR`).
    pub fn arith(opcode: Opcode, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self {
            opcode,
            rd,
            rs1,
            rs2,
            ..Self::default()
        }
    }

    /// Builds a register-immediate instruction (`ADDL`, `SUBL`).
    pub fn immediate(opcode: Opcode, rd: usize, rs1: usize, imm: Word) -> Self {
        Self {
            opcode,
            rd,
            rs1,
            imm,
            ..Self::default()
        }
    }

    /// `MOVC rd, #imm`
    pub fn movc(rd: usize, imm: Word) -> Self {
        Self {
            opcode: Opcode::Movc,
            rd,
            imm,
            ..Self::default()
        }
    }

    /// `LOAD rd, rs1, #imm`
    pub fn load(rd: usize, rs1: usize, imm: Word) -> Self {
        Self::immediate(Opcode::Load, rd, rs1, imm)
    }

    /// `LDR rd, rs1, rs2`
    pub fn ldr(rd: usize, rs1: usize, rs2: usize) -> Self {
        Self::arith(Opcode::Ldr, rd, rs1, rs2)
    }

    /// `STORE rs1, rs2, #imm` stores `rs1` at `rs2 + imm`.
    pub fn store(rs1: usize, rs2: usize, imm: Word) -> Self {
        Self {
            opcode: Opcode::Store,
            rs1,
            rs2,
            imm,
            ..Self::default()
        }
    }

    /// `STR rs1, rs2, rs3` stores `rs1` at `rs2 + rs3`.
    pub fn str(rs1: usize, rs2: usize, rs3: usize) -> Self {
        Self {
            opcode: Opcode::Str,
            rs1,
            rs2,
            rs3,
            ..Self::default()
        }
    }

    /// `CMP rs1, rs2`
    pub fn cmp(rs1: usize, rs2: usize) -> Self {
        Self {
            opcode: Opcode::Cmp,
            rs1,
            rs2,
            ..Self::default()
        }
    }

    /// Builds a `BZ` or `BNZ` with a pc-relative offset.
    pub fn branch(opcode: Opcode, imm: Word) -> Self {
        Self {
            opcode,
            imm,
            ..Self::default()
        }
    }

    /// `HALT`
    pub fn halt() -> Self {
        Self {
            opcode: Opcode::Halt,
            ..Self::default()
        }
    }

    /// `NOP`
    pub fn nop() -> Self {
        Self::default()
    }

    /// Source register indices the opcode actually reads, in `rs1`, `rs2`,
    /// `rs3` order.
    pub fn source_registers(&self) -> impl Iterator<Item = usize> {
        let fields = [self.rs1, self.rs2, self.rs3];
        self.opcode
            .reads()
            .into_iter()
            .zip(fields)
            .filter_map(|(used, reg)| used.then_some(reg))
    }

    /// Destination register, if the opcode writes one.
    pub fn destination(&self) -> Option<usize> {
        self.opcode.writes_register().then_some(self.rd)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode;
        match op {
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Ldr => write!(f, "{},R{},R{},R{}", op, self.rd, self.rs1, self.rs2),
            Opcode::Addl | Opcode::Subl | Opcode::Load => {
                write!(f, "{},R{},R{},#{}", op, self.rd, self.rs1, self.imm)
            }
            Opcode::Movc => write!(f, "{},R{},#{}", op, self.rd, self.imm),
            Opcode::Store => write!(f, "{},R{},R{},#{}", op, self.rs1, self.rs2, self.imm),
            Opcode::Str => write!(f, "{},R{},R{},R{}", op, self.rs1, self.rs2, self.rs3),
            Opcode::Cmp => write!(f, "{},R{},R{}", op, self.rs1, self.rs2),
            Opcode::Bz | Opcode::Bnz => write!(f, "{},#{}", op, self.imm),
            Opcode::Halt | Opcode::Nop => write!(f, "{}", op),
        }
    }
}
