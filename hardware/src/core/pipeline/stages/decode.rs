//! Instruction Decode / Register Read (ID) Stage.
//!
//! This module reads the source operands of the instruction in decode,
//! bypassing pending registers from in-flight results, and reserves the
//! destination register. With the load-use interlock enabled it holds the
//! instruction for a cycle when the value it needs is still being loaded.

use tracing::{debug, trace};

use crate::common::SimError;
use crate::core::pipeline::hazards::{self, InFlight, OperandRead};
use crate::core::pipeline::latches::StageLatch;
use crate::core::pipeline::signals::ForwardSource;
use crate::core::Cpu;

/// Executes the decode stage.
///
/// # Logic Flow
/// 1. **Fetch fault**: Reports an entry fetch found no instruction for.
/// 2. **Interlock**: Optionally holds the instruction on a load-use hazard.
/// 3. **Operand read**: Resolves every source register the opcode reads.
/// 4. **Reservation**: Marks the destination of result-producing opcodes pending.
/// 5. **Advance**: Moves the latch into execute.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
pub fn decode_stage(cpu: &mut Cpu) -> Result<Option<StageLatch>, SimError> {
    if cpu.latches.decode.is_empty() {
        return Ok(None);
    }

    if cpu.latches.decode.fetch_fault {
        return Err(SimError::FetchOutOfRange {
            pc: i64::from(cpu.latches.decode.pc),
        });
    }

    if cpu.load_use_interlock
        && hazards::need_stall_load_use(&cpu.latches.decode, &cpu.latches.memory)
    {
        cpu.stats.stalls_data += 1;
        debug!(
            pc = cpu.latches.decode.pc,
            load_pc = cpu.latches.memory.pc,
            "load-use stall"
        );
        return Ok(Some(cpu.latches.decode));
    }

    let mut latch = cpu.latches.decode.take();
    let insn = latch.instruction;
    let class = insn.opcode.operand_class();
    let fields = [insn.rs1, insn.rs2, insn.rs3];
    let used = insn.opcode.reads();

    let reads: [Option<OperandRead>; 3] = {
        let in_flight = InFlight {
            writeback: &cpu.latches.writeback,
            bus: &cpu.bus,
        };
        std::array::from_fn(|i| {
            used[i].then(|| hazards::resolve_operand(fields[i], class, &cpu.regs, &in_flight))
        })
    };

    for (i, read) in reads.iter().enumerate() {
        let Some(read) = read else { continue };
        if read.source != ForwardSource::RegFile {
            cpu.stats.forwards += 1;
            debug!(
                pc = latch.pc,
                reg = fields[i],
                value = read.value,
                source = ?read.source,
                "operand forwarded"
            );
        } else if !cpu.regs.is_available(fields[i]) {
            debug!(pc = latch.pc, reg = fields[i], "pending operand read from register file");
        }
        match i {
            0 => latch.rs1_value = read.value,
            1 => latch.rs2_value = read.value,
            _ => latch.rs3_value = read.value,
        }
    }

    if let Some(rd) = insn.destination() {
        cpu.regs.mark_pending(rd);
    }

    trace!(pc = latch.pc, insn = %insn, "ID");
    cpu.latches.execute = latch;
    Ok(Some(latch))
}
