//! General-Purpose Register File.
//!
//! This module implements the architectural register file. Every register
//! carries one availability bit: decode clears it when an in-flight
//! instruction will write the register and writeback sets it again when the
//! value is committed. The bit does not count outstanding writers, so a
//! second writer issued while the first is in flight is not tracked.

use crate::common::Word;

/// General-purpose register file with per-register availability.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    values: Vec<Word>,
    available: Vec<bool>,
}

impl RegisterFile {
    /// Creates a register file with every register zero and available.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of architectural registers.
    pub fn new(count: usize) -> Self {
        Self {
            values: vec![0; count],
            available: vec![true; count],
        }
    }

    /// Number of registers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the register file has no registers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reads the committed value of a register.
    ///
    /// The value may be stale if the register is pending; callers that need
    /// the in-flight value go through the forwarding resolver.
    pub fn read(&self, idx: usize) -> Word {
        self.values[idx]
    }

    /// Returns `true` if no in-flight instruction is known to write `idx`.
    pub fn is_available(&self, idx: usize) -> bool {
        self.available[idx]
    }

    /// Marks `idx` as awaiting a result from an in-flight instruction.
    pub fn mark_pending(&mut self, idx: usize) {
        self.available[idx] = false;
    }

    /// Commits `val` into `idx` and marks the register available.
    pub fn commit(&mut self, idx: usize, val: Word) {
        self.values[idx] = val;
        self.available[idx] = true;
    }

    /// Committed values of all registers, in index order.
    pub fn values(&self) -> &[Word] {
        &self.values
    }

    /// Availability bits of all registers, in index order.
    pub fn availability(&self) -> &[bool] {
        &self.available
    }

    /// Dumps the register file to stdout, two registers per line.
    pub fn dump(&self) {
        for (i, pair) in self.values.chunks(2).enumerate() {
            let line: Vec<String> = pair
                .iter()
                .enumerate()
                .map(|(j, v)| {
                    let idx = i * 2 + j;
                    format!(
                        "R{:<2}={:<11} [{}]",
                        idx,
                        v,
                        if self.available[idx] { "valid" } else { "pending" }
                    )
                })
                .collect();
            println!("{}", line.join("  "));
        }
    }
}
