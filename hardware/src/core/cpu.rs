//! Processor context and pipeline engine.
//!
//! [`Cpu`] owns all simulated state: the instruction store, register file,
//! data memory, stage latches and control flags. One call to [`Cpu::tick`]
//! evaluates one clock cycle; [`Cpu::run`] ticks until `HALT` retires or
//! the cycle budget runs out.

mod snapshot;

pub use snapshot::{ArchSnapshot, PipelineSnapshot, RegisterSnapshot, StateReport};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::common::SimError;
use crate::config::Config;
use crate::core::arch::RegisterFile;
use crate::core::pipeline::stages;
use crate::core::pipeline::{
    ForwardingBus, Latches, PipelineObserver, Stage, StageLatch, StageSnapshot, TraceObserver,
};
use crate::core::units::DataMemory;
use crate::isa::Instruction;
use crate::stats::SimStats;

/// Whether the engine accepts further cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RunState {
    /// Cycles are being evaluated.
    Running,
    /// `HALT` retired or an error stopped the pipeline.
    Halted,
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// `HALT` retired.
    Halted,
    /// The cycle budget was used up before `HALT` retired.
    CycleLimit,
    /// The run controller asked to stop.
    UserAbort,
}

/// Outcome of [`Cpu::run`] and [`Cpu::run_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Why the run ended.
    pub reason: StopReason,
    /// Cycles evaluated since the processor was built.
    pub cycles: u64,
    /// Instructions retired since the processor was built.
    pub instructions: u64,
}

/// Decision taken by a run controller after each cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepControl {
    /// Evaluate the next cycle.
    Continue,
    /// End the run with [`StopReason::UserAbort`].
    Abort,
}

/// Processor state and the five-stage pipeline that advances it.
pub struct Cpu {
    pub regs: RegisterFile,
    pub memory: DataMemory,
    pub latches: Latches,
    pub stats: SimStats,

    pub(crate) pc: u32,
    pub(crate) zero_flag: bool,
    pub(crate) bus: ForwardingBus,
    pub(crate) redirect_pending: bool,
    pub(crate) halt_fetched: bool,
    pub(crate) halt_retired: bool,
    pub(crate) load_use_interlock: bool,

    program: Vec<Instruction>,
    code_base: u32,
    instruction_width: u32,
    activity: Latches,
    state: RunState,
    trace: bool,
}

impl Cpu {
    /// Builds a processor ready to fetch the first instruction of `program`.
    ///
    /// # Arguments
    ///
    /// * `program` - Decoded instructions, placed at `system.code_base`
    /// * `config` - Machine configuration
    ///
    /// # Returns
    ///
    /// An error if the configuration is unusable, the program is empty, or
    /// an instruction names a register outside the register file.
    pub fn new(program: Vec<Instruction>, config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        if program.is_empty() {
            return Err(SimError::EmptyProgram);
        }

        let count = config.system.register_count;
        for (index, insn) in program.iter().enumerate() {
            let out_of_range = insn
                .destination()
                .into_iter()
                .chain(insn.source_registers())
                .find(|&reg| reg >= count);
            if let Some(register) = out_of_range {
                return Err(SimError::RegisterOutOfRange {
                    index,
                    instruction: *insn,
                    register,
                    count,
                });
            }
        }

        debug!(
            instructions = program.len(),
            code_base = config.system.code_base,
            registers = count,
            data_words = config.memory.data_words,
            "pipeline built"
        );

        Ok(Self {
            regs: RegisterFile::new(count),
            memory: DataMemory::new(config.memory.data_words),
            latches: Latches::default(),
            stats: SimStats::default(),
            pc: config.system.code_base,
            zero_flag: false,
            bus: ForwardingBus::default(),
            redirect_pending: false,
            halt_fetched: false,
            halt_retired: false,
            load_use_interlock: config.pipeline.load_use_interlock,
            program,
            code_base: config.system.code_base,
            instruction_width: config.system.instruction_width,
            activity: Latches::default(),
            state: RunState::Running,
            trace: config.general.trace_instructions || cfg!(feature = "always-trace"),
        })
    }

    /// Evaluates one clock cycle, tracing it if tracing is configured.
    pub fn tick(&mut self) -> Result<RunState, SimError> {
        if self.trace {
            self.tick_observed(&mut TraceObserver)
        } else {
            self.tick_observed(&mut ())
        }
    }

    /// Evaluates one clock cycle, reporting every stage to `observer`.
    ///
    /// Stages are evaluated in [`Stage::EVALUATION_ORDER`]. When writeback
    /// retires `HALT` the remaining stages are skipped and the engine halts.
    /// Any error halts the engine and is returned. Ticking a halted engine
    /// does nothing.
    pub fn tick_observed(
        &mut self,
        observer: &mut dyn PipelineObserver,
    ) -> Result<RunState, SimError> {
        if self.state == RunState::Halted {
            return Ok(RunState::Halted);
        }

        self.stats.cycles += 1;
        let cycle = self.stats.cycles;
        self.bus.clear();
        self.activity = Latches::default();

        for stage in Stage::EVALUATION_ORDER {
            let processed = match self.evaluate(stage) {
                Ok(processed) => processed.unwrap_or_default(),
                Err(e) => {
                    self.state = RunState::Halted;
                    warn!(cycle, stage = stage.name(), error = %e, "pipeline stopped");
                    return Err(e);
                }
            };
            *self.activity.get_mut(stage) = processed;
            observer.stage_evaluated(cycle, &StageSnapshot::of(stage, &processed));

            if self.halt_retired {
                self.state = RunState::Halted;
                break;
            }
        }

        observer.cycle_completed(self);
        Ok(self.state)
    }

    fn evaluate(&mut self, stage: Stage) -> Result<Option<StageLatch>, SimError> {
        match stage {
            Stage::Writeback => stages::wb_stage(self),
            Stage::Memory => stages::mem_stage(self),
            Stage::Execute => stages::execute_stage(self),
            Stage::Decode => stages::decode_stage(self),
            Stage::Fetch => stages::fetch_stage(self),
        }
    }

    /// Runs until `HALT` retires or `max_cycles` cycles have been evaluated.
    pub fn run(&mut self, max_cycles: u64) -> Result<RunSummary, SimError> {
        if self.trace {
            self.run_with(max_cycles, &mut TraceObserver, |_| StepControl::Continue)
        } else {
            self.run_with(max_cycles, &mut (), |_| StepControl::Continue)
        }
    }

    /// Runs like [`Cpu::run`], reporting to `observer` and consulting
    /// `control` after every cycle.
    ///
    /// `max_cycles` caps the total number of cycles evaluated since the
    /// processor was built.
    pub fn run_with<F>(
        &mut self,
        max_cycles: u64,
        observer: &mut dyn PipelineObserver,
        mut control: F,
    ) -> Result<RunSummary, SimError>
    where
        F: FnMut(&Cpu) -> StepControl,
    {
        let reason = loop {
            if self.state == RunState::Halted {
                break StopReason::Halted;
            }
            if self.stats.cycles >= max_cycles {
                break StopReason::CycleLimit;
            }
            if self.tick_observed(observer)? == RunState::Halted {
                break StopReason::Halted;
            }
            if control(self) == StepControl::Abort {
                break StopReason::UserAbort;
            }
        };

        let summary = self.summary(reason);
        info!(
            reason = ?summary.reason,
            cycles = summary.cycles,
            instructions = summary.instructions,
            "run finished"
        );
        Ok(summary)
    }

    fn summary(&self, reason: StopReason) -> RunSummary {
        RunSummary {
            reason,
            cycles: self.stats.cycles,
            instructions: self.stats.instructions_retired,
        }
    }

    /// Looks up the instruction stored at `pc`.
    ///
    /// # Returns
    ///
    /// `None` if `pc` is below the code base, misaligned, or past the last
    /// instruction.
    pub(crate) fn instruction_at(&self, pc: u32) -> Option<Instruction> {
        let offset = pc.checked_sub(self.code_base)?;
        if offset % self.instruction_width != 0 {
            return None;
        }
        let index = usize::try_from(offset / self.instruction_width).ok()?;
        self.program.get(index).copied()
    }

    /// Program counter of the next fetch.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Zero flag set by `CMP` and `MOVC`.
    pub fn zero_flag(&self) -> bool {
        self.zero_flag
    }

    /// Cycles evaluated so far.
    pub fn cycles(&self) -> u64 {
        self.stats.cycles
    }

    /// Instructions retired so far.
    pub fn instructions_retired(&self) -> u64 {
        self.stats.instructions_retired
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns `true` once `HALT` retired or an error stopped the pipeline.
    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    /// Returns `true` once `HALT` has been fetched and not squashed.
    pub fn halt_fetched(&self) -> bool {
        self.halt_fetched
    }

    /// The instruction store.
    pub fn program(&self) -> &[Instruction] {
        &self.program
    }

    /// Address of the first instruction.
    pub fn code_base(&self) -> u32 {
        self.code_base
    }

    /// Distance in bytes between consecutive instructions.
    pub fn instruction_width(&self) -> u32 {
        self.instruction_width
    }
}
