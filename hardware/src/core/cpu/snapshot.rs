//! Read-only views of the processor and state reports.
//!
//! Snapshots copy state out of the [`Cpu`]; taking one never changes the
//! processor.

use serde::Serialize;

use super::{Cpu, RunState};
use crate::common::constants::REPORT_MEMORY_WORDS;
use crate::common::Word;
use crate::core::pipeline::{Stage, StageSnapshot};
use crate::stats::SimStats;

/// One architectural register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterSnapshot {
    pub index: usize,
    pub value: Word,
    pub available: bool,
}

/// What every stage processed during the most recent cycle, in pipeline
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PipelineSnapshot {
    pub cycle: u64,
    pub stages: Vec<StageSnapshot>,
}

/// Architectural state of the processor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArchSnapshot {
    pub pc: u32,
    pub zero_flag: bool,
    pub cycles: u64,
    pub instructions_retired: u64,
    pub state: RunState,
    pub registers: Vec<RegisterSnapshot>,
    pub memory: Vec<Word>,
}

impl ArchSnapshot {
    /// Committed value of register `idx`, if the register exists.
    pub fn register(&self, idx: usize) -> Option<Word> {
        self.registers.get(idx).map(|r| r.value)
    }
}

/// Final state written by the `--json` export.
#[derive(Clone, Debug, Serialize)]
pub struct StateReport<'a> {
    pub state: ArchSnapshot,
    pub stats: &'a SimStats,
}

impl Cpu {
    /// What `stage` processed during the most recent cycle.
    pub fn stage_snapshot(&self, stage: Stage) -> StageSnapshot {
        StageSnapshot::of(stage, self.activity.get(stage))
    }

    /// What every stage processed during the most recent cycle.
    pub fn pipeline_snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            cycle: self.stats.cycles,
            stages: Stage::ALL
                .iter()
                .map(|&stage| self.stage_snapshot(stage))
                .collect(),
        }
    }

    /// Registers, data memory, flags and counters.
    pub fn arch_snapshot(&self) -> ArchSnapshot {
        ArchSnapshot {
            pc: self.pc,
            zero_flag: self.zero_flag,
            cycles: self.stats.cycles,
            instructions_retired: self.stats.instructions_retired,
            state: self.state,
            registers: self
                .regs
                .values()
                .iter()
                .zip(self.regs.availability())
                .enumerate()
                .map(|(index, (&value, &available))| RegisterSnapshot {
                    index,
                    value,
                    available,
                })
                .collect(),
            memory: self.memory.words().to_vec(),
        }
    }

    /// Final state plus statistics, for serialization.
    pub fn state_report(&self) -> StateReport<'_> {
        StateReport {
            state: self.arch_snapshot(),
            stats: &self.stats,
        }
    }

    /// Prints what every stage processed during the most recent cycle.
    pub fn print_pipeline(&self) {
        println!("--------------------------------------------");
        println!("Clock Cycle #: {}", self.stats.cycles);
        println!("--------------------------------------------");
        for stage in Stage::ALL {
            println!("{}", self.stage_snapshot(stage));
        }
    }

    /// Prints the register file, two registers per line.
    pub fn print_reg_file(&self) {
        println!("----------\nRegisters:\n----------");
        self.regs.dump();
    }

    /// Prints the architectural register file with its status and the
    /// first words of data memory.
    pub fn dump_state(&self) {
        println!("PC = {}  Z = {}", self.pc, u8::from(self.zero_flag));
        println!("\n =============== STATE OF ARCHITECTURAL REGISTER FILE ========== \n");
        for (i, value) in self.regs.values().iter().enumerate() {
            let status = if self.regs.is_available(i) {
                "VALID"
            } else {
                "INVALID"
            };
            println!("Reg[{}] | Value = {} | Status = {}", i, value, status);
        }
        println!("\n ============== STATE OF DATA MEMORY ============= \n");
        for (i, value) in self
            .memory
            .words()
            .iter()
            .take(REPORT_MEMORY_WORDS)
            .enumerate()
        {
            println!("MEM[{}] | Data Value = {}", i, value);
        }
    }
}
