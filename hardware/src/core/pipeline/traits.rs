//! Pipeline Observation Interfaces.
//!
//! The engine never prints. Anything that wants to watch the pipeline, a
//! debug trace, an interactive display, a test, implements
//! [`PipelineObserver`] and is handed to [`crate::core::Cpu::tick_observed`]
//! or [`crate::core::Cpu::run_with`].

use tracing::trace;

use crate::core::pipeline::latches::StageSnapshot;
use crate::core::Cpu;

/// Receives notifications while the pipeline is evaluated.
///
/// Both methods default to doing nothing.
pub trait PipelineObserver {
    /// Called after each stage is evaluated, in evaluation order.
    ///
    /// # Arguments
    ///
    /// * `cycle` - Cycle being evaluated (1-based)
    /// * `snapshot` - What the stage processed this cycle
    fn stage_evaluated(&mut self, cycle: u64, snapshot: &StageSnapshot) {
        let _ = (cycle, snapshot);
    }

    /// Called once every stage of a cycle has been evaluated.
    fn cycle_completed(&mut self, cpu: &Cpu) {
        let _ = cpu;
    }
}

impl PipelineObserver for () {}

/// Emits one `tracing` event per stage evaluation.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceObserver;

impl PipelineObserver for TraceObserver {
    fn stage_evaluated(&mut self, cycle: u64, snapshot: &StageSnapshot) {
        match (&snapshot.pc, &snapshot.text) {
            (Some(pc), Some(text)) => {
                trace!(cycle, stage = snapshot.stage.name(), pc, insn = %text, "stage")
            }
            _ => trace!(cycle, stage = snapshot.stage.name(), "stage empty"),
        }
    }

    fn cycle_completed(&mut self, cpu: &Cpu) {
        trace!(
            cycle = cpu.cycles(),
            retired = cpu.instructions_retired(),
            pc = cpu.pc(),
            zero = cpu.zero_flag(),
            "cycle complete"
        );
    }
}

/// Collects every stage snapshot it is shown.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    /// `(cycle, snapshot)` pairs in the order they were observed.
    pub stages: Vec<(u64, StageSnapshot)>,
    /// Number of completed cycles observed.
    pub cycles_completed: u64,
}

impl RecordingObserver {
    /// Snapshots observed during `cycle`.
    pub fn cycle(&self, cycle: u64) -> impl Iterator<Item = &StageSnapshot> {
        self.stages
            .iter()
            .filter(move |(c, _)| *c == cycle)
            .map(|(_, s)| s)
    }
}

impl PipelineObserver for RecordingObserver {
    fn stage_evaluated(&mut self, cycle: u64, snapshot: &StageSnapshot) {
        self.stages.push((cycle, snapshot.clone()));
    }

    fn cycle_completed(&mut self, _cpu: &Cpu) {
        self.cycles_completed += 1;
    }
}
