//! Memory Access (MEM) Stage.
//!
//! Loads read their word from data memory into the result descriptor;
//! stores write the value they carried since decode. Every other
//! instruction passes through unchanged.

use tracing::trace;

use crate::common::{AccessType, SimError};
use crate::core::pipeline::latches::{ResultBus, StageLatch};
use crate::core::Cpu;

/// Executes the memory stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
///
/// # Returns
///
/// The processed latch, or [`SimError::AddressOutOfRange`] if a load or
/// store addresses a word outside data memory.
pub fn mem_stage(cpu: &mut Cpu) -> Result<Option<StageLatch>, SimError> {
    if cpu.latches.memory.is_empty() {
        return Ok(None);
    }

    let mut latch = cpu.latches.memory.take();
    let insn = latch.instruction;
    let (pc, address, size) = (latch.pc, latch.memory_address, cpu.memory.len());
    let out_of_range = move |access: AccessType| SimError::AddressOutOfRange {
        pc,
        instruction: insn,
        address,
        access,
        size,
    };

    if insn.opcode.is_load() {
        let value = cpu
            .memory
            .read(address)
            .ok_or_else(|| out_of_range(AccessType::Read))?;
        latch.result = Some(ResultBus {
            tag: insn.rd,
            value,
        });
    } else if insn.opcode.is_store() {
        cpu.memory
            .write(address, latch.rs1_value)
            .ok_or_else(|| out_of_range(AccessType::Write))?;
    }

    trace!(pc = latch.pc, insn = %insn, address = latch.memory_address, "MEM");
    cpu.bus.memory = latch.result;
    cpu.latches.writeback = latch;
    Ok(Some(latch))
}
