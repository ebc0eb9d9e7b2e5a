//! Default machine constants.
//!
//! These values describe the reference machine. Every one of them can be
//! overridden through [`crate::config::Config`].

/// Address of the first instruction in code memory.
pub const CODE_BASE: u32 = 4000;

/// Distance in bytes between two consecutive instructions.
pub const INSTRUCTION_WIDTH: u32 = 4;

/// Number of architectural registers.
pub const REGISTER_COUNT: usize = 16;

/// Number of words in data memory.
pub const DATA_WORDS: usize = 4096;

/// Cycle budget used when neither the command line nor the configuration
/// supplies one.
pub const MAX_CYCLES: u64 = 10_000;

/// Number of data memory words shown in the final state report.
pub const REPORT_MEMORY_WORDS: usize = 100;
