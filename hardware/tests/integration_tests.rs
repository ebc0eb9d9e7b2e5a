//! Integration tests for the full pipeline.

use apex_sim::common::{AccessType, SimError};
use apex_sim::config::*;
use apex_sim::core::pipeline::{RecordingObserver, Stage};
use apex_sim::core::{Cpu, RunState, StepControl, StopReason};
use apex_sim::isa::{Instruction, Opcode};
use apex_sim::sim::parse_program;
use pretty_assertions::assert_eq;

/// Creates the reference machine configuration.
fn create_minimal_config() -> Config {
    Config {
        general: GeneralConfig {
            trace_instructions: false,
        },
        system: SystemConfig {
            code_base: 4000,
            instruction_width: 4,
            register_count: 16,
        },
        memory: MemoryConfig { data_words: 4096 },
        pipeline: PipelineConfig {
            max_cycles: 10_000,
            load_use_interlock: false,
        },
    }
}

fn build(src: &str) -> Cpu {
    let program = parse_program(src).unwrap();
    Cpu::new(program, &create_minimal_config()).unwrap()
}

fn run_to_halt(src: &str) -> Cpu {
    let mut cpu = build(src);
    let summary = cpu.run(1_000).unwrap();
    assert_eq!(summary.reason, StopReason::Halted);
    cpu
}

fn run_to_error(src: &str) -> (Cpu, SimError) {
    let mut cpu = build(src);
    let err = cpu.run(1_000).unwrap_err();
    (cpu, err)
}

/// Tests processor creation and initial state.
#[test]
fn test_cpu_creation() {
    let cpu = build("MOVC,R1,#1\nHALT\n");
    assert_eq!(cpu.pc(), 4000);
    assert_eq!(cpu.cycles(), 0);
    assert_eq!(cpu.instructions_retired(), 0);
    assert_eq!(cpu.state(), RunState::Running);
    assert!(!cpu.zero_flag());
    assert!(cpu.latches.is_drained());
    assert_eq!(cpu.regs.len(), 16);
    assert_eq!(cpu.memory.len(), 4096);
    assert!(cpu.pipeline_snapshot().stages.iter().all(|s| s.is_empty()));
}

/// Tests that an empty program is rejected.
#[test]
fn test_empty_program_rejected() {
    let err = Cpu::new(vec![], &create_minimal_config()).err();
    assert_eq!(err, Some(SimError::EmptyProgram));
}

/// Tests that a register outside the register file is rejected.
#[test]
fn test_register_out_of_range_rejected() {
    let insn = Instruction::arith(Opcode::Add, 16, 1, 2);
    let err = Cpu::new(vec![Instruction::nop(), insn], &create_minimal_config()).err();
    assert_eq!(
        err,
        Some(SimError::RegisterOutOfRange {
            index: 1,
            instruction: insn,
            register: 16,
            count: 16,
        })
    );
}

/// Tests that an unusable configuration is rejected.
#[test]
fn test_invalid_config_rejected() {
    let mut config = create_minimal_config();
    config.memory.data_words = 0;
    let err = Cpu::new(vec![Instruction::halt()], &config).err();
    assert!(matches!(err, Some(SimError::InvalidConfig(_))));
}

/// Tests that `HALT` as the Nth instruction retires on cycle N+4.
#[test]
fn test_halt_retires_after_pipeline_fill() {
    let cpu = run_to_halt("HALT\n");
    assert_eq!(cpu.cycles(), 5);
    assert_eq!(cpu.instructions_retired(), 1);

    let cpu = run_to_halt("MOVC,R1,#3\nMOVC,R2,#4\nHALT\n");
    assert_eq!(cpu.cycles(), 7);
    assert_eq!(cpu.instructions_retired(), 3);
    assert_eq!(cpu.regs.read(1), 3);
    assert_eq!(cpu.regs.read(2), 4);
    assert!(cpu.is_halted());
}

/// Tests that nothing behind `HALT` is fetched.
#[test]
fn test_halt_stops_fetch() {
    let mut cpu = build("MOVC,R1,#1\nHALT\nMOVC,R2,#9\n");
    let mut observer = RecordingObserver::default();
    let summary = cpu
        .run_with(1_000, &mut observer, |_| StepControl::Continue)
        .unwrap();

    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(summary.cycles, 6);
    assert_eq!(summary.instructions, 2);
    assert_eq!(cpu.regs.read(2), 0);
    assert!(cpu.halt_fetched());

    let last: Vec<_> = observer.cycle(6).collect();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].stage, Stage::Writeback);
    assert_eq!(last[0].instruction, Some(Instruction::halt()));
    assert_eq!(observer.cycles_completed, 6);
}

/// Tests that a halted engine ignores further ticks.
#[test]
fn test_tick_after_halt() {
    let mut cpu = run_to_halt("HALT\n");
    assert_eq!(cpu.tick(), Ok(RunState::Halted));
    assert_eq!(cpu.cycles(), 5);

    let summary = cpu.run(100).unwrap();
    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(summary.cycles, 5);
}

/// Tests that a taken branch squashes the instruction behind it.
#[test]
fn test_taken_branch_flushes() {
    let cpu = run_to_halt("MOVC,R1,#0\nBZ,#8\nMOVC,R2,#7\nMOVC,R3,#3\nHALT\n");
    assert_eq!(cpu.regs.read(2), 0);
    assert!(cpu.regs.is_available(2));
    assert_eq!(cpu.regs.read(3), 3);
    assert_eq!(cpu.instructions_retired(), 4);
    assert_eq!(cpu.cycles(), 10);
    assert_eq!(cpu.stats.flushed, 1);
    assert_eq!(cpu.stats.branches_taken, 1);
    assert_eq!(cpu.stats.inst_branch, 1);
}

/// Tests that an untaken branch costs nothing.
#[test]
fn test_untaken_branch() {
    let cpu = run_to_halt("MOVC,R1,#0\nBNZ,#8\nMOVC,R2,#7\nHALT\n");
    assert_eq!(cpu.regs.read(2), 7);
    assert_eq!(cpu.cycles(), 8);
    assert_eq!(cpu.stats.branches_taken, 0);
    assert_eq!(cpu.stats.flushed, 0);
}

/// Tests that only `CMP` and `MOVC` update the zero flag.
#[test]
fn test_zero_flag_sources() {
    let cpu = run_to_halt("MOVC,R1,#0\nADDL,R2,R1,#5\nHALT\n");
    assert!(cpu.zero_flag());

    let cpu = run_to_halt("MOVC,R1,#4\nMOVC,R2,#4\nCMP,R1,R2\nHALT\n");
    assert!(cpu.zero_flag());

    let cpu = run_to_halt("MOVC,R1,#4\nMOVC,R2,#5\nCMP,R1,R2\nSUB,R3,R1,R1\nHALT\n");
    assert!(!cpu.zero_flag());
    assert_eq!(cpu.regs.read(3), 0);
}

/// Tests the snapshot after the first cycle.
#[test]
fn test_first_cycle_snapshot() {
    let mut cpu = build("MOVC,R1,#1\nHALT\n");
    assert_eq!(cpu.tick(), Ok(RunState::Running));

    let fetch = cpu.stage_snapshot(Stage::Fetch);
    assert_eq!(fetch.pc, Some(4000));
    assert_eq!(fetch.text.as_deref(), Some("MOVC,R1,#1"));
    assert_eq!(fetch.to_string(), "Fetch          : pc(4000) MOVC,R1,#1");
    assert!(cpu.stage_snapshot(Stage::Decode).is_empty());
    assert_eq!(
        cpu.stage_snapshot(Stage::Writeback).to_string(),
        "Writeback      : Empty"
    );
    assert_eq!(cpu.pc(), 4004);
}

/// Tests that taking snapshots does not disturb the processor.
#[test]
fn test_snapshots_are_idempotent() {
    let mut cpu = build("MOVC,R1,#1\nADD,R2,R1,R1\nHALT\n");
    cpu.tick().unwrap();
    cpu.tick().unwrap();
    cpu.tick().unwrap();

    let first = cpu.pipeline_snapshot();
    let arch = cpu.arch_snapshot();
    assert_eq!(cpu.pipeline_snapshot(), first);
    assert_eq!(cpu.arch_snapshot(), arch);
    assert_eq!(first.cycle, 3);
    assert_eq!(
        first.stages.iter().map(|s| s.stage).collect::<Vec<_>>(),
        Stage::ALL.to_vec()
    );
    assert_eq!(first.stages[2].instruction, Some(Instruction::movc(1, 1)));
    assert_eq!(first.stages[1].pc, Some(4004));
    assert_eq!(first.stages[0].pc, Some(4008));

    let summary = cpu.run(100).unwrap();
    assert_eq!(summary.cycles, 7);
    assert_eq!(cpu.regs.read(2), 2);
}

/// Tests that stages are reported in evaluation order.
#[test]
fn test_observer_sees_evaluation_order() {
    let mut cpu = build("MOVC,R1,#1\nHALT\n");
    let mut observer = RecordingObserver::default();
    cpu.tick_observed(&mut observer).unwrap();

    let order: Vec<Stage> = observer.cycle(1).map(|s| s.stage).collect();
    assert_eq!(order, Stage::EVALUATION_ORDER.to_vec());
    assert_eq!(observer.cycles_completed, 1);
}

/// Tests a store followed by a load of the same word.
#[test]
fn test_store_then_load() {
    let cpu = run_to_halt("MOVC,R1,#42\nMOVC,R2,#100\nSTORE,R1,R2,#4\nLOAD,R3,R2,#4\nHALT\n");
    assert_eq!(cpu.memory.words()[104], 42);
    assert_eq!(cpu.regs.read(3), 42);
    assert_eq!(cpu.stats.inst_store, 1);
    assert_eq!(cpu.stats.inst_load, 1);
}

/// Tests register-indexed loads and stores.
#[test]
fn test_register_indexed_memory() {
    let cpu = run_to_halt(
        "MOVC,R1,#11\nMOVC,R2,#20\nMOVC,R3,#5\nNOP\nNOP\nSTR,R1,R2,R3\nNOP\nLDR,R4,R2,R3\nHALT\n",
    );
    assert_eq!(cpu.memory.words()[25], 11);
    assert_eq!(cpu.regs.read(4), 11);
}

/// Tests that division by zero stops the pipeline.
#[test]
fn test_divide_by_zero() {
    let (mut cpu, err) = run_to_error("MOVC,R1,#7\nMOVC,R2,#0\nDIV,R3,R1,R2\nHALT\n");
    assert_eq!(
        err,
        SimError::DivideByZero {
            pc: 4008,
            instruction: Instruction::arith(Opcode::Div, 3, 1, 2),
        }
    );
    assert_eq!(cpu.cycles(), 5);
    assert!(cpu.is_halted());
    assert_eq!(cpu.tick(), Ok(RunState::Halted));
    assert_eq!(cpu.cycles(), 5);
}

/// Tests a load outside data memory.
#[test]
fn test_load_out_of_range() {
    let (_, err) = run_to_error("MOVC,R1,#5000\nLOAD,R2,R1,#0\nHALT\n");
    assert_eq!(
        err,
        SimError::AddressOutOfRange {
            pc: 4004,
            instruction: Instruction::load(2, 1, 0),
            address: 5000,
            access: AccessType::Read,
            size: 4096,
        }
    );
}

/// Tests a store to a negative address.
#[test]
fn test_store_negative_address() {
    let (cpu, err) = run_to_error("MOVC,R1,#-1\nSTORE,R1,R1,#0\nHALT\n");
    match err {
        SimError::AddressOutOfRange {
            address, access, ..
        } => {
            assert_eq!(address, -1);
            assert_eq!(access, AccessType::Write);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(cpu.memory.words().iter().all(|&w| w == 0));
}

/// Tests running off the end of a program without `HALT`.
///
/// The missing instruction is fetched on cycle 2 and reported when decode
/// reaches it on cycle 3.
#[test]
fn test_fetch_past_end() {
    let (cpu, err) = run_to_error("MOVC,R1,#1\n");
    assert_eq!(err, SimError::FetchOutOfRange { pc: 4004 });
    assert_eq!(cpu.cycles(), 3);
    assert_eq!(cpu.instructions_retired(), 0);
    assert!(cpu.is_halted());
}

/// Tests a taken branch whose target lies past the end of the program.
#[test]
fn test_branch_past_end() {
    let (cpu, err) = run_to_error("MOVC,R1,#0\nBZ,#100\nHALT\n");
    assert_eq!(err, SimError::FetchOutOfRange { pc: 4104 });
    assert_eq!(cpu.cycles(), 6);
}

/// Tests a program whose last instruction is a branch looping onto itself.
///
/// The slot behind the branch is past the end of the program on every
/// iteration and is squashed each time.
#[test]
fn test_tight_loop_at_end() {
    let mut cpu = build("MOVC,R1,#0\nBZ,#0\n");
    let summary = cpu.run(50).unwrap();

    assert_eq!(summary.reason, StopReason::CycleLimit);
    assert_eq!(summary.cycles, 50);
    assert_eq!(summary.instructions, 16);
    assert_eq!(cpu.stats.branches_taken, 16);
    assert_eq!(cpu.stats.flushed, 0);
    assert_eq!(cpu.state(), RunState::Running);
}

/// Tests a trailing backward branch to an earlier `HALT`.
#[test]
fn test_backward_branch_to_halt() {
    let cpu = run_to_halt("MOVC,R1,#0\nBZ,#8\nHALT\nMOVC,R2,#0\nBZ,#-8\n");
    assert_eq!(cpu.cycles(), 13);
    assert_eq!(cpu.instructions_retired(), 5);
    assert_eq!(cpu.stats.branches_taken, 2);
    assert_eq!(cpu.stats.flushed, 1);
    assert_eq!(cpu.regs.read(2), 0);
}

/// Tests a branch to a negative address.
#[test]
fn test_branch_target_out_of_range() {
    let (_, err) = run_to_error("MOVC,R1,#0\nBZ,#-5000\nHALT\n");
    assert_eq!(err, SimError::FetchOutOfRange { pc: -996 });
}

/// Tests that the cycle budget caps total cycles across runs.
#[test]
fn test_cycle_limit() {
    let mut cpu = build("MOVC,R1,#0\nBZ,#0\nHALT\n");
    let summary = cpu.run(50).unwrap();
    assert_eq!(summary.reason, StopReason::CycleLimit);
    assert_eq!(summary.cycles, 50);
    assert_eq!(cpu.state(), RunState::Running);

    let summary = cpu.run(60).unwrap();
    assert_eq!(summary.reason, StopReason::CycleLimit);
    assert_eq!(summary.cycles, 60);
    assert!(cpu.stats.branches_taken > 0);
}

/// Tests that the run controller can stop a run.
#[test]
fn test_user_abort() {
    let mut cpu = build("MOVC,R1,#1\nMOVC,R2,#2\nHALT\n");
    let summary = cpu
        .run_with(1_000, &mut (), |cpu| {
            if cpu.cycles() == 3 {
                StepControl::Abort
            } else {
                StepControl::Continue
            }
        })
        .unwrap();
    assert_eq!(summary.reason, StopReason::UserAbort);
    assert_eq!(summary.cycles, 3);

    let summary = cpu.run(1_000).unwrap();
    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(summary.cycles, 7);
}

/// Tests the shipped sample program.
#[test]
fn test_countdown_program() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/programs/countdown.asm");
    let program = apex_sim::sim::load_program(path).unwrap();
    let mut cpu = Cpu::new(program, &create_minimal_config()).unwrap();
    let summary = cpu.run(1_000).unwrap();

    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(summary.instructions, 26);
    assert_eq!(summary.cycles, 38);
    assert_eq!(cpu.regs.read(1), 0);
    assert_eq!(cpu.regs.read(2), 15);
    assert_eq!(cpu.regs.read(4), 15);
    assert_eq!(cpu.memory.words()[10], 15);
    assert_eq!(cpu.stats.branches_taken, 4);
    assert_eq!(cpu.stats.flushed, 4);
    assert_eq!(cpu.stats.inst_branch, 5);
}

/// Tests the exported state report.
#[test]
fn test_state_report_json() {
    let cpu = run_to_halt("MOVC,R1,#5\nHALT\n");
    let json = serde_json::to_value(cpu.state_report()).unwrap();

    assert_eq!(json["state"]["registers"][1]["value"], 5);
    assert_eq!(json["state"]["registers"][1]["available"], true);
    assert_eq!(json["state"]["state"], "Halted");
    assert_eq!(json["stats"]["cycles"], 6);
    assert_eq!(json["stats"]["instructions_retired"], 2);
    assert_eq!(cpu.arch_snapshot().register(1), Some(5));
    assert_eq!(cpu.arch_snapshot().register(16), None);
}
