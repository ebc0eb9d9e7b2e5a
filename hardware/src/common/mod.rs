//! Common utilities and types used throughout the pipeline simulator.
//!
//! This module provides the machine word type, default machine constants,
//! memory access classification and the simulator error types that are
//! shared across the components of the simulator.

/// Default machine constants (register count, memory size, code base).
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types and their classification.
pub mod error;

pub use data::AccessType;
pub use error::{ErrorClass, SimError};

/// Machine word held by registers and data memory.
///
/// All arithmetic on words is two's-complement wrapping.
pub type Word = i32;
