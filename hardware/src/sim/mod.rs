//! Simulation harness support.

/// Program text loader.
pub mod loader;

pub use loader::{load_program, parse_program, LoadError};
