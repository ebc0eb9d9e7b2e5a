//! Instruction Fetch (IF) Stage.
//!
//! Reads the instruction at the program counter and hands it to decode. The
//! stage stays idle while decode is still occupied, for one cycle after a
//! taken branch redirected the program counter, and for good once `HALT`
//! has been fetched.
//!
//! A program counter outside code memory is not an error here: the
//! instruction behind a taken branch may lie past the end of the program and
//! is squashed before decode sees it. Fetch hands decode a faulted entry
//! instead, and decode raises the error if the entry survives.

use tracing::{debug, trace};

use crate::common::SimError;
use crate::core::pipeline::latches::StageLatch;
use crate::core::Cpu;
use crate::isa::Opcode;

/// Executes the instruction fetch stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
///
/// # Returns
///
/// The latch filled this cycle, or `None` if nothing was fetched.
pub fn fetch_stage(cpu: &mut Cpu) -> Result<Option<StageLatch>, SimError> {
    cpu.latches.fetch.flush();

    if cpu.halt_fetched || cpu.latches.decode.has_insn {
        return Ok(None);
    }

    if cpu.redirect_pending {
        cpu.redirect_pending = false;
        debug!(pc = cpu.pc, "fetch skipped after redirect");
        return Ok(None);
    }

    let Some(instruction) = cpu.instruction_at(cpu.pc) else {
        debug!(pc = cpu.pc, "fetch outside code memory");
        cpu.latches.decode = StageLatch::faulted(cpu.pc);
        return Ok(None);
    };
    let latch = StageLatch::new(cpu.pc, instruction);
    trace!(pc = cpu.pc, insn = %instruction, "IF");

    cpu.pc = cpu.pc.wrapping_add(cpu.instruction_width());
    if instruction.opcode == Opcode::Halt {
        cpu.halt_fetched = true;
        debug!(pc = latch.pc, "HALT fetched, fetch stopped");
    }

    cpu.latches.fetch = latch;
    cpu.latches.decode = latch;
    Ok(Some(latch))
}
