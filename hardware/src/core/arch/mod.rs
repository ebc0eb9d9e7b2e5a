//! Architectural state components.
//!
//! This module contains the register file, the only architectural storage
//! besides data memory and the zero flag.

/// General-Purpose Register file implementation.
pub mod gpr;

pub use gpr::RegisterFile;
