//! APEX Pipeline Simulator Library.
//!
//! This crate implements a cycle-accurate simulator of a 5-stage in-order
//! pipeline (Fetch, Decode/Register-Read, Execute, Memory, Writeback) for a
//! small fixed integer instruction set. Data hazards are resolved by
//! forwarding without stalls, taken branches flush the instruction fetched
//! behind them, and `HALT` drains the pipeline before the run ends.
//!
//! # Architecture
//!
//! * **Core**: Stage latches advanced in reverse order every cycle
//!   (Writeback, Memory, Execute, Decode, Fetch).
//! * **Forwarding**: Per-opcode-class bypass from the execute, memory and
//!   writeback stages, falling back to the register file.
//! * **Memory**: Flat, word-addressed data memory.
//!
//! # Modules
//!
//! * `common`: Shared types, constants, and error handling.
//! * `config`: Configuration loading and parsing.
//! * `core`: CPU core implementation.
//! * `isa`: Instruction Set Architecture definitions.
//! * `sim`: Program loading.
//! * `stats`: Performance statistics collection.

/// Shared types, constants and error handling.
///
/// Provides the machine word, the reference machine constants and the
/// error types used throughout the simulator.
pub mod common;

/// Configuration system for machine sizes and pipeline options.
///
/// Loads and parses TOML configuration files to customize simulator behavior.
pub mod config;

/// CPU core implementation including pipeline stages and execution units.
///
/// Implements the 5-stage in-order pipeline, forwarding, branch flush and
/// halt handling, plus read-only snapshots of processor state.
pub mod core;

/// Instruction Set Architecture definitions.
///
/// Defines opcodes, decoded instructions and their textual syntax.
pub mod isa;

/// Program loading.
///
/// Parses program text into decoded instructions.
pub mod sim;

/// Performance statistics collection and reporting.
///
/// Tracks cycle counts, instruction counts, the instruction mix and pipeline
/// activity during simulation execution.
pub mod stats;
