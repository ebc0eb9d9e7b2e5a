//! Execution units.

/// Integer Arithmetic Logic Unit.
pub mod alu;

/// Load/Store Unit and data memory.
pub mod lsu;

pub use alu::Alu;
pub use lsu::{DataMemory, Lsu};
