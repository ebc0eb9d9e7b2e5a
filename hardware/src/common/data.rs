//! Memory Access Types.
//!
//! This module defines the classification of data memory accesses. The
//! memory stage tags every access with its direction so that an
//! out-of-range address can be reported precisely.

use std::fmt;

use serde::Serialize;

/// Type of data memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AccessType {
    /// Data read access.
    ///
    /// Used by `LOAD` and `LDR` when reading a word into a register.
    Read,

    /// Data write access.
    ///
    /// Used by `STORE` and `STR` when writing a register value to memory.
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::Read => write!(f, "load"),
            AccessType::Write => write!(f, "store"),
        }
    }
}
