//! Instruction pipeline implementation.
//!
//! This module contains the five-stage instruction pipeline (fetch, decode,
//! execute, memory, writeback), the latches between the stages, hazard
//! detection and forwarding logic, and the observer interface.

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Stage latches, the per-cycle forwarding bus and stage snapshots.
pub mod latches;

/// ALU operation selectors and forwarding sources.
pub mod signals;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

/// Observer interface and the shipped observers.
pub mod traits;

pub use latches::{ForwardingBus, Latches, ResultBus, Stage, StageLatch, StageSnapshot};
pub use traits::{PipelineObserver, RecordingObserver, TraceObserver};
