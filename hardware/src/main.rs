//! APEX Pipeline Simulator CLI.
//!
//! The main executable for the simulator. It handles command-line argument
//! parsing, configuration, program loading and the simulation loop.
//!
//! # Usage
//!
//! The simulator can run in two modes:
//! 1. **Display Mode**: Prints the content of every stage and the register
//!    file after each cycle and waits for a key press; `q` stops the run.
//! 2. **Simulate Mode**: Runs silently until `HALT` retires or the cycle
//!    budget runs out.
//!
//! Both modes finish with the architectural register file, the first words
//! of data memory and the run statistics.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use apex_sim::config::Config;
use apex_sim::core::pipeline::{PipelineObserver, TraceObserver};
use apex_sim::core::{Cpu, RunSummary, StepControl, StopReason};
use apex_sim::sim::loader;

/// How the simulation is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Print every cycle and wait for a key press.
    Display,
    /// Run to completion without per-cycle output.
    Simulate,
}

/// Command-line arguments for the pipeline simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "APEX 5-Stage Pipeline Simulator")]
struct Args {
    /// Program file, one instruction per line.
    program: PathBuf,

    /// Display or simulate.
    #[arg(value_enum, default_value_t = Mode::Simulate)]
    mode: Mode,

    /// Cycle budget; defaults to `pipeline.max_cycles`.
    cycles: Option<u64>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the final machine state and statistics as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Main entry point for the pipeline simulator.
///
/// # Behavior
///
/// 1. **Configuration**: Parses command-line arguments and loads the TOML configuration file.
/// 2. **Loader**: Parses the program file.
/// 3. **Initialization**: Constructs the `Cpu`.
/// 4. **Simulation Loop**: Ticks the CPU until `HALT` retires, the cycle budget runs
///    out, or the user stops a display run.
/// 5. **Teardown**: Prints the final state and statistics.
fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| fatal(&e)),
        None => Config::default(),
    };

    let program = loader::load_program(&args.program).unwrap_or_else(|e| fatal(&e));
    let mut cpu = Cpu::new(program, &config).unwrap_or_else(|e| fatal(&e));

    println!("Global Configuration");
    println!("--------------------");
    println!("  Trace Instructions: {}", config.general.trace_instructions);
    println!("  Code Base:          {}", config.system.code_base);
    println!("  Registers:          {}", config.system.register_count);
    println!("  Data Memory:        {} words", config.memory.data_words);
    println!("  Load-Use Interlock: {}", config.pipeline.load_use_interlock);
    println!("--------------------");

    let max_cycles = args.cycles.unwrap_or(config.pipeline.max_cycles);
    let mut tracer = TraceObserver;
    let mut silent = ();
    let observer: &mut dyn PipelineObserver =
        if config.general.trace_instructions || cfg!(feature = "always-trace") {
            &mut tracer
        } else {
            &mut silent
        };

    let result = match args.mode {
        Mode::Simulate => cpu.run_with(max_cycles, observer, |_| StepControl::Continue),
        Mode::Display => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let result = cpu.run_with(max_cycles, observer, |cpu| {
                cpu.print_pipeline();
                cpu.print_reg_file();
                prompt(&mut input)
            });
            if matches!(&result, Ok(s) if s.reason == StopReason::Halted) {
                cpu.print_pipeline();
                cpu.print_reg_file();
            }
            result
        }
    };

    match result {
        Ok(summary) => report(&summary),
        Err(e) => {
            eprintln!("\n[!] FATAL: {}", e);
            cpu.dump_state();
            cpu.stats.print();
            process::exit(1);
        }
    }

    cpu.dump_state();
    cpu.stats.print();

    if let Some(path) = &args.json {
        if let Err(e) = write_json(&cpu, path) {
            eprintln!("[!] Could not write {}: {}", path.display(), e);
            process::exit(1);
        }
    }

    io::stdout().flush().ok();
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn prompt(input: &mut impl BufRead) -> StepControl {
    println!("Press any key to advance CPU Clock or <q> to quit:");
    io::stdout().flush().ok();
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => StepControl::Abort,
        Ok(_) if line.trim().eq_ignore_ascii_case("q") => StepControl::Abort,
        Ok(_) => StepControl::Continue,
        Err(_) => StepControl::Abort,
    }
}

fn report(summary: &RunSummary) {
    let what = match summary.reason {
        StopReason::Halted => "Simulation Complete",
        StopReason::CycleLimit => "Cycle limit reached",
        StopReason::UserAbort => "Simulation Stopped",
    };
    println!(
        "APEX_CPU: {}, cycles = {} instructions = {}",
        what, summary.cycles, summary.instructions
    );
}

fn write_json(cpu: &Cpu, path: &Path) -> io::Result<()> {
    let text = serde_json::to_string_pretty(&cpu.state_report())
        .map_err(io::Error::other)?;
    std::fs::write(path, text)
}

fn fatal(e: &dyn std::fmt::Display) -> ! {
    eprintln!("[!] FATAL: {}", e);
    process::exit(1);
}
