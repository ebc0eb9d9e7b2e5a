//! Opcodes and the properties the pipeline derives from them.

use std::fmt;

use serde::Serialize;

/// Operation performed by an instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Opcode {
    /// `rd = rs1 + rs2`
    Add,
    /// `rd = rs1 - rs2`
    Sub,
    /// `rd = rs1 * rs2`
    Mul,
    /// `rd = rs1 / rs2`, faulting on a zero divisor.
    Div,
    /// `rd = rs1 & rs2`
    And,
    /// `rd = rs1 | rs2`
    Or,
    /// `rd = rs1 ^ rs2`
    Xor,
    /// `rd = rs1 + imm`
    Addl,
    /// `rd = rs1 - imm`
    Subl,
    /// `rd = imm`, updating the zero flag.
    Movc,
    /// `rd = MEM[rs1 + imm]`
    Load,
    /// `MEM[rs2 + imm] = rs1`
    Store,
    /// `rd = MEM[rs1 + rs2]`
    Ldr,
    /// `MEM[rs2 + rs3] = rs1`
    Str,
    /// Sets the zero flag when `rs1 == rs2`.
    Cmp,
    /// Branches to `pc + imm` when the zero flag is set.
    Bz,
    /// Branches to `pc + imm` when the zero flag is clear.
    Bnz,
    /// Stops fetching; ends the run when it retires.
    Halt,
    /// Does nothing.
    #[default]
    Nop,
}

/// Grouping of opcodes that selects which in-flight results the decode stage
/// may forward from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OperandClass {
    /// Two register sources, one register result.
    RegisterRegister,
    /// One register source combined with the immediate.
    RegisterImmediate,
    /// Memory address formation and `CMP`.
    MemoryAddressing,
    /// No register sources.
    NoOperands,
}

impl Opcode {
    /// Every opcode, in declaration order.
    pub const ALL: [Opcode; 19] = [
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::And,
        Opcode::Or,
        Opcode::Xor,
        Opcode::Addl,
        Opcode::Subl,
        Opcode::Movc,
        Opcode::Load,
        Opcode::Store,
        Opcode::Ldr,
        Opcode::Str,
        Opcode::Cmp,
        Opcode::Bz,
        Opcode::Bnz,
        Opcode::Halt,
        Opcode::Nop,
    ];

    /// Assembly mnemonic of the opcode.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Addl => "ADDL",
            Opcode::Subl => "SUBL",
            Opcode::Movc => "MOVC",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Ldr => "LDR",
            Opcode::Str => "STR",
            Opcode::Cmp => "CMP",
            Opcode::Bz => "BZ",
            Opcode::Bnz => "BNZ",
            Opcode::Halt => "HALT",
            Opcode::Nop => "NOP",
        }
    }

    /// Looks up an opcode by mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(text: &str) -> Option<Opcode> {
        Opcode::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(text))
    }

    /// Forwarding class of the opcode.
    pub fn operand_class(self) -> OperandClass {
        match self {
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor => OperandClass::RegisterRegister,
            Opcode::Addl | Opcode::Subl => OperandClass::RegisterImmediate,
            Opcode::Load | Opcode::Store | Opcode::Ldr | Opcode::Str | Opcode::Cmp => {
                OperandClass::MemoryAddressing
            }
            Opcode::Movc | Opcode::Bz | Opcode::Bnz | Opcode::Halt | Opcode::Nop => {
                OperandClass::NoOperands
            }
        }
    }

    /// Which of `rs1`, `rs2`, `rs3` the opcode reads.
    pub fn reads(self) -> [bool; 3] {
        match self {
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Ldr
            | Opcode::Store
            | Opcode::Cmp => [true, true, false],
            Opcode::Addl | Opcode::Subl | Opcode::Load => [true, false, false],
            Opcode::Str => [true, true, true],
            Opcode::Movc | Opcode::Bz | Opcode::Bnz | Opcode::Halt | Opcode::Nop => {
                [false, false, false]
            }
        }
    }

    /// Returns `true` if the opcode commits a value to `rd` at writeback.
    pub fn writes_register(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::Div
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Addl
                | Opcode::Subl
                | Opcode::Movc
                | Opcode::Load
                | Opcode::Ldr
        )
    }

    /// Returns `true` for `LOAD` and `LDR`.
    pub fn is_load(self) -> bool {
        matches!(self, Opcode::Load | Opcode::Ldr)
    }

    /// Returns `true` for `STORE` and `STR`.
    pub fn is_store(self) -> bool {
        matches!(self, Opcode::Store | Opcode::Str)
    }

    /// Returns `true` for `BZ` and `BNZ`.
    pub fn is_branch(self) -> bool {
        matches!(self, Opcode::Bz | Opcode::Bnz)
    }

    /// Returns `true` for the opcodes executed by the ALU.
    pub fn is_alu(self) -> bool {
        matches!(
            self.operand_class(),
            OperandClass::RegisterRegister | OperandClass::RegisterImmediate
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
