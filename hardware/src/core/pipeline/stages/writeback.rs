//! Writeback (WB) Stage.
//!
//! Commits results to the register file and retires instructions. Retiring
//! `HALT` ends the run.

use tracing::{debug, trace};

use crate::common::SimError;
use crate::core::pipeline::latches::StageLatch;
use crate::core::Cpu;
use crate::isa::Opcode;

/// Executes the writeback stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
pub fn wb_stage(cpu: &mut Cpu) -> Result<Option<StageLatch>, SimError> {
    if cpu.latches.writeback.is_empty() {
        return Ok(None);
    }

    let latch = cpu.latches.writeback.take();
    let insn = latch.instruction;

    if insn.opcode.writes_register() {
        if let Some(result) = latch.result {
            trace!(pc = latch.pc, reg = result.tag, value = result.value, "WB commit");
            cpu.regs.commit(result.tag, result.value);
        }
    }

    cpu.stats.record_retired(insn.opcode);

    if insn.opcode == Opcode::Halt {
        cpu.halt_retired = true;
        debug!(pc = latch.pc, "HALT retired");
    }

    Ok(Some(latch))
}
