//! CPU core implementation.
//!
//! This module contains the processor context, the architectural register
//! file, the execution units and the five-stage pipeline.

/// Architectural state components.
pub mod arch;

/// Processor context and pipeline engine.
pub mod cpu;

/// Pipeline latches, hazard handling, stages and observers.
pub mod pipeline;

/// Execution units (ALU, LSU) and data memory.
pub mod units;

pub use cpu::{
    ArchSnapshot, Cpu, PipelineSnapshot, RegisterSnapshot, RunState, RunSummary, StateReport,
    StepControl, StopReason,
};
