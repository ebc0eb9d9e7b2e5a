//! Pipeline latch structures for inter-stage communication.
//!
//! Each of the five stages owns one latch. A latch whose `has_insn` flag is
//! clear is a bubble. Advancing an instruction copies the whole latch into
//! the next stage's latch; flushing clears the flag.

use std::fmt;

use serde::Serialize;

use crate::common::Word;
use crate::isa::Instruction;

/// Result descriptor: the register an in-flight instruction will write and
/// the value it will write there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResultBus {
    /// Destination register index.
    pub tag: usize,
    /// Value destined for the register.
    pub value: Word,
}

/// Contents of one pipeline stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageLatch {
    /// Whether the latch holds a valid instruction.
    pub has_insn: bool,
    /// Program counter of the instruction.
    pub pc: u32,
    /// The instruction being carried.
    pub instruction: Instruction,
    /// Resolved value of `rs1`.
    pub rs1_value: Word,
    /// Resolved value of `rs2`.
    pub rs2_value: Word,
    /// Resolved value of `rs3`.
    pub rs3_value: Word,
    /// Effective data memory address for loads and stores.
    pub memory_address: i64,
    /// Result produced so far, if any.
    pub result: Option<ResultBus>,
    /// Set when fetch found no instruction at `pc`. Decode reports the
    /// fault unless a taken branch squashes the entry first.
    pub fetch_fault: bool,
}

impl StageLatch {
    /// Creates an occupied latch for a freshly fetched instruction.
    pub fn new(pc: u32, instruction: Instruction) -> Self {
        Self {
            has_insn: true,
            pc,
            instruction,
            ..Self::default()
        }
    }

    /// Creates an occupied latch for a pc outside code memory.
    pub fn faulted(pc: u32) -> Self {
        Self {
            has_insn: true,
            pc,
            fetch_fault: true,
            ..Self::default()
        }
    }

    /// Creates an empty latch.
    pub fn bubble() -> Self {
        Self::default()
    }

    /// Discards the instruction held by the latch.
    pub fn flush(&mut self) {
        *self = Self::bubble();
    }

    /// Returns `true` if the latch holds no instruction.
    pub fn is_empty(&self) -> bool {
        !self.has_insn
    }

    /// Moves the contents out, leaving a bubble behind.
    pub fn take(&mut self) -> StageLatch {
        std::mem::take(self)
    }
}

/// The five pipeline stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    /// Instruction fetch.
    Fetch,
    /// Decode and register read.
    Decode,
    /// Execute.
    Execute,
    /// Data memory access.
    Memory,
    /// Register writeback.
    Writeback,
}

impl Stage {
    /// Stages in program order.
    pub const ALL: [Stage; 5] = [
        Stage::Fetch,
        Stage::Decode,
        Stage::Execute,
        Stage::Memory,
        Stage::Writeback,
    ];

    /// Order in which stages are evaluated within one cycle.
    ///
    /// Later stages run first so that every stage sees the latch its
    /// predecessor filled on the previous cycle.
    pub const EVALUATION_ORDER: [Stage; 5] = [
        Stage::Writeback,
        Stage::Memory,
        Stage::Execute,
        Stage::Decode,
        Stage::Fetch,
    ];

    /// Display name used in pipeline traces.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Fetch => "Fetch",
            Stage::Decode => "Decode/RF",
            Stage::Execute => "Execute",
            Stage::Memory => "Memory",
            Stage::Writeback => "Writeback",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All stage latches of the pipeline.
#[derive(Clone, Debug, Default)]
pub struct Latches {
    /// Fetch latch.
    pub fetch: StageLatch,
    /// Decode/register-read latch.
    pub decode: StageLatch,
    /// Execute latch.
    pub execute: StageLatch,
    /// Memory latch.
    pub memory: StageLatch,
    /// Writeback latch.
    pub writeback: StageLatch,
}

impl Latches {
    /// Latch owned by `stage`.
    pub fn get(&self, stage: Stage) -> &StageLatch {
        match stage {
            Stage::Fetch => &self.fetch,
            Stage::Decode => &self.decode,
            Stage::Execute => &self.execute,
            Stage::Memory => &self.memory,
            Stage::Writeback => &self.writeback,
        }
    }

    /// Mutable latch owned by `stage`.
    pub fn get_mut(&mut self, stage: Stage) -> &mut StageLatch {
        match stage {
            Stage::Fetch => &mut self.fetch,
            Stage::Decode => &mut self.decode,
            Stage::Execute => &mut self.execute,
            Stage::Memory => &mut self.memory,
            Stage::Writeback => &mut self.writeback,
        }
    }

    /// Returns `true` if no stage holds an instruction.
    pub fn is_drained(&self) -> bool {
        Stage::ALL.iter().all(|&s| self.get(s).is_empty())
    }
}

/// Result values produced by the execute and memory stages during the
/// current cycle.
///
/// Cleared at the start of every cycle, so a value is only ever forwarded
/// in the cycle it was produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForwardingBus {
    /// Result produced by the execute stage this cycle.
    pub execute: Option<ResultBus>,
    /// Result produced by the memory stage this cycle.
    pub memory: Option<ResultBus>,
}

impl ForwardingBus {
    /// Drops every result.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Read-only view of one stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageSnapshot {
    /// Stage described.
    pub stage: Stage,
    /// Program counter, if the stage holds an instruction.
    pub pc: Option<u32>,
    /// Instruction held, if any.
    pub instruction: Option<Instruction>,
    /// Textual form of the instruction, if any.
    pub text: Option<String>,
    /// Result carried, if any.
    pub result: Option<ResultBus>,
}

impl StageSnapshot {
    /// Builds a snapshot of `latch` as seen in `stage`.
    pub fn of(stage: Stage, latch: &StageLatch) -> Self {
        if latch.is_empty() || latch.fetch_fault {
            return Self {
                stage,
                pc: None,
                instruction: None,
                text: None,
                result: None,
            };
        }
        Self {
            stage,
            pc: Some(latch.pc),
            instruction: Some(latch.instruction),
            text: Some(latch.instruction.to_string()),
            result: latch.result,
        }
    }

    /// Returns `true` if the stage held no instruction.
    pub fn is_empty(&self) -> bool {
        self.instruction.is_none()
    }
}

impl fmt::Display for StageSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.pc, &self.text) {
            (Some(pc), Some(text)) => write!(f, "{:<15}: pc({}) {}", self.stage.name(), pc, text),
            _ => write!(f, "{:<15}: Empty", self.stage.name()),
        }
    }
}
