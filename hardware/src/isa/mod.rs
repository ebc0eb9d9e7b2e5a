//! Instruction set definitions.
//!
//! The simulated processor executes a small fixed instruction set of
//! register-register arithmetic, register-immediate arithmetic, memory
//! access, compare, conditional branch, `HALT` and `NOP` instructions.
//! Instructions arrive already decoded; this module only defines their
//! shape and the properties the pipeline derives from the opcode.

/// Decoded instruction records and their textual form.
pub mod instruction;

/// Opcode enumeration and per-opcode properties.
pub mod opcode;

pub use instruction::Instruction;
pub use opcode::{OperandClass, Opcode};
