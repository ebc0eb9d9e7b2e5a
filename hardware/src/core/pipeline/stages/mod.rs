//! Pipeline stage implementations.
//!
//! Contains the five stages of the instruction pipeline:
//! - Fetch: Reads the next instruction from the instruction store
//! - Decode: Reads and forwards source operands, reserves the destination
//! - Execute: Performs ALU operations, address generation and branch resolution
//! - Memory: Handles load/store operations
//! - Writeback: Commits results and retires instructions
//!
//! Every stage function returns the latch it processed this cycle, or
//! `None` if the stage was idle.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

pub use decode::decode_stage;
pub use execute::execute_stage;
pub use fetch::fetch_stage;
pub use memory::mem_stage;
pub use writeback::wb_stage;
