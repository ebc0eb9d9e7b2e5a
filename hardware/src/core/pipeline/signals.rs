//! Pipeline control signals and forwarding sources.
//!
//! This module defines the operation selector handed to the ALU and the
//! places the decode stage can take an in-flight operand value from.

use serde::Serialize;

use crate::isa::{Opcode, OperandClass};

/// Integer ALU operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Wrapping multiplication.
    Mul,
    /// Signed division; no result for a zero divisor.
    Div,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
}

impl AluOp {
    /// ALU operation performed for an opcode, if it uses the ALU.
    ///
    /// `ADDL` and `SUBL` map onto [`AluOp::Add`] and [`AluOp::Sub`] with the
    /// immediate as the second operand.
    pub fn from_opcode(op: Opcode) -> Option<AluOp> {
        match op {
            Opcode::Add | Opcode::Addl => Some(AluOp::Add),
            Opcode::Sub | Opcode::Subl => Some(AluOp::Sub),
            Opcode::Mul => Some(AluOp::Mul),
            Opcode::Div => Some(AluOp::Div),
            Opcode::And => Some(AluOp::And),
            Opcode::Or => Some(AluOp::Or),
            Opcode::Xor => Some(AluOp::Xor),
            _ => None,
        }
    }
}

/// Place an operand value was taken from during register read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ForwardSource {
    /// Committed register file value.
    RegFile,
    /// Result held by the writeback latch.
    Writeback,
    /// Result produced by the memory stage this cycle.
    Memory,
    /// Result produced by the execute stage this cycle.
    Execute,
}

/// In-flight sources consulted, in priority order, when a source register
/// is pending.
///
/// The first source whose tag matches supplies the value. Opcodes without
/// register operands consult nothing.
pub fn forwarding_order(class: OperandClass) -> &'static [ForwardSource] {
    match class {
        OperandClass::RegisterRegister | OperandClass::RegisterImmediate => {
            &[ForwardSource::Writeback, ForwardSource::Execute]
        }
        OperandClass::MemoryAddressing => &[ForwardSource::Memory, ForwardSource::Execute],
        OperandClass::NoOperands => &[],
    }
}
