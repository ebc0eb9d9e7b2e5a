//! Simulation statistics collection and reporting.
//!
//! Tracks cycle and instruction counts, the retired instruction mix,
//! control-flow and forwarding activity, and host execution time.

use std::time::Instant;

use serde::Serialize;

use crate::isa::Opcode;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    pub cycles: u64,
    pub instructions_retired: u64,

    pub inst_alu: u64,
    pub inst_load: u64,
    pub inst_store: u64,
    pub inst_branch: u64,
    pub inst_other: u64,

    pub branches_taken: u64,
    pub flushed: u64,
    pub forwards: u64,
    pub stalls_data: u64,
}

impl Default for SimStats {
    /// Returns zeroed statistics with the host clock started now.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_other: 0,
            branches_taken: 0,
            flushed: 0,
            forwards: 0,
            stalls_data: 0,
        }
    }
}

impl SimStats {
    /// Counts one retired instruction in the instruction mix.
    pub fn record_retired(&mut self, op: Opcode) {
        self.instructions_retired += 1;
        if op.is_load() {
            self.inst_load += 1;
        } else if op.is_store() {
            self.inst_store += 1;
        } else if op.is_branch() {
            self.inst_branch += 1;
        } else if op.is_alu() || matches!(op, Opcode::Movc | Opcode::Cmp) {
            self.inst_alu += 1;
        } else {
            self.inst_other += 1;
        }
    }

    /// Retired instructions per cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Prints a formatted summary of all simulation statistics.
    ///
    /// Displays instruction counts, the instruction mix, IPC/CPI metrics,
    /// pipeline activity and execution time in a human-readable format.
    pub fn print(&self) {
        let duration = self.start_time.elapsed();
        let seconds = duration.as_secs_f64();

        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let instr = if self.instructions_retired == 0 {
            1
        } else {
            self.instructions_retired
        };

        let cpi = cyc as f64 / instr as f64;
        let khz = if seconds > 0.0 {
            (self.cycles as f64 / seconds) / 1000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("APEX PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_ipc                  {:.4}", self.ipc());
        println!("sim_cpi                  {:.4}", cpi);
        println!("----------------------------------------------------------");
        println!("PIPELINE");
        println!("  branches.taken         {}", self.branches_taken);
        println!("  flushed                {}", self.flushed);
        println!("  forwards               {}", self.forwards);
        println!(
            "  stalls.data            {} ({:.2}%)",
            self.stalls_data,
            (self.stalls_data as f64 / cyc as f64) * 100.0
        );
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        let total_inst = instr as f64;
        let print_mix = |name: &str, count: u64| {
            println!(
                "  {:<22} {} ({:.2}%)",
                name,
                count,
                (count as f64 / total_inst) * 100.0
            );
        };
        print_mix("op.alu", self.inst_alu);
        print_mix("op.load", self.inst_load);
        print_mix("op.store", self.inst_store);
        print_mix("op.branch", self.inst_branch);
        print_mix("op.other", self.inst_other);
        println!("==========================================================");
    }
}
