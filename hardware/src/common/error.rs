//! Simulator error definitions.
//!
//! This module defines every condition that stops a simulation run. It provides:
//! 1. **Configuration errors:** Rejected before the first cycle runs.
//! 2. **Runtime errors:** Raised by a pipeline stage during a tick; the engine
//!    halts and hands the error back to the caller.
//! 3. **Classification:** [`ErrorClass`] groups the variants for reporting.
//!
//! Running out of cycle budget is not an error; it is reported as
//! [`crate::core::StopReason::CycleLimit`].

use thiserror::Error;

use super::data::AccessType;
use crate::isa::Instruction;

/// Broad category of a [`SimError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// The program or configuration was rejected before any cycle ran.
    Configuration,
    /// An arithmetic operation had no defined result.
    Arithmetic,
    /// A data memory address fell outside data memory.
    Addressing,
    /// The program counter left code memory.
    Fetch,
}

/// Errors raised while building or running the simulator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// No instructions were supplied.
    #[error("no instructions supplied")]
    EmptyProgram,

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An instruction names a register the register file does not have.
    #[error(
        "instruction {index} ({instruction}) names R{register}, but the register file has {count} registers"
    )]
    RegisterOutOfRange {
        /// Position of the instruction in the program.
        index: usize,
        /// The offending instruction.
        instruction: Instruction,
        /// Register index that is out of range.
        register: usize,
        /// Number of registers available.
        count: usize,
    },

    /// A program line could not be parsed.
    #[error("line {line}: {reason}")]
    Parse {
        /// One-based source line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// `DIV` with a zero divisor.
    #[error("division by zero at pc({pc}): {instruction}")]
    DivideByZero {
        /// Program counter of the dividing instruction.
        pc: u32,
        /// The dividing instruction.
        instruction: Instruction,
    },

    /// A load or store addressed a word outside data memory.
    #[error("{access} at pc({pc}) addresses word {address}, outside data memory of {size} words: {instruction}")]
    AddressOutOfRange {
        /// Program counter of the memory instruction.
        pc: u32,
        /// The memory instruction.
        instruction: Instruction,
        /// Effective address that was computed.
        address: i64,
        /// Direction of the access.
        access: AccessType,
        /// Number of words in data memory.
        size: usize,
    },

    /// The program counter does not point into code memory.
    #[error("fetch from pc({pc}) outside code memory")]
    FetchOutOfRange {
        /// The offending program counter.
        pc: i64,
    },
}

impl SimError {
    /// Returns the category this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            SimError::EmptyProgram
            | SimError::InvalidConfig(_)
            | SimError::RegisterOutOfRange { .. }
            | SimError::Parse { .. } => ErrorClass::Configuration,
            SimError::DivideByZero { .. } => ErrorClass::Arithmetic,
            SimError::AddressOutOfRange { .. } => ErrorClass::Addressing,
            SimError::FetchOutOfRange { .. } => ErrorClass::Fetch,
        }
    }

    /// Returns `true` if the error was raised by a running pipeline rather
    /// than while building it.
    pub fn is_runtime(&self) -> bool {
        self.class() != ErrorClass::Configuration
    }
}
