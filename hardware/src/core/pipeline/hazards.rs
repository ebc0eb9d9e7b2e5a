//! Data Hazard Detection and Forwarding.
//!
//! This module resolves Read-After-Write hazards for the decode stage. A
//! source register that is still pending is bypassed from an in-flight
//! result instead of stalling; which in-flight results are eligible, and in
//! what order, depends on the operand class of the consuming instruction.
//! It also detects the load-use case that the optional interlock stalls on.

use crate::common::Word;
use crate::core::arch::RegisterFile;
use crate::core::pipeline::latches::{ForwardingBus, ResultBus, StageLatch};
use crate::core::pipeline::signals::{forwarding_order, ForwardSource};
use crate::isa::OperandClass;

/// A source operand value together with where it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperandRead {
    /// Value handed to the instruction.
    pub value: Word,
    /// Where the value was taken from.
    pub source: ForwardSource,
}

/// In-flight results visible to the decode stage during the current cycle.
#[derive(Clone, Copy, Debug)]
pub struct InFlight<'a> {
    /// The writeback latch, holding the instruction that left the memory
    /// stage this cycle.
    pub writeback: &'a StageLatch,
    /// Results produced by the execute and memory stages this cycle.
    pub bus: &'a ForwardingBus,
}

impl InFlight<'_> {
    fn lookup(&self, source: ForwardSource) -> Option<ResultBus> {
        match source {
            ForwardSource::Writeback => {
                if self.writeback.has_insn {
                    self.writeback.result
                } else {
                    None
                }
            }
            ForwardSource::Memory => self.bus.memory,
            ForwardSource::Execute => self.bus.execute,
            ForwardSource::RegFile => None,
        }
    }
}

/// Resolves the value of source register `reg` for an instruction of the
/// given operand class.
///
/// # Arguments
///
/// * `reg` - Source register index
/// * `class` - Operand class of the consuming instruction
/// * `regs` - Register file
/// * `in_flight` - Results the decode stage can bypass from
///
/// # Returns
///
/// The register file value when the register is available. Otherwise the
/// value of the first in-flight result, in class order, whose tag is `reg`.
/// With no match, the register file value is returned even though it may
/// be stale.
pub fn resolve_operand(
    reg: usize,
    class: OperandClass,
    regs: &RegisterFile,
    in_flight: &InFlight<'_>,
) -> OperandRead {
    let committed = OperandRead {
        value: regs.read(reg),
        source: ForwardSource::RegFile,
    };

    if regs.is_available(reg) {
        return committed;
    }

    forwarding_order(class)
        .iter()
        .find_map(|&source| {
            in_flight
                .lookup(source)
                .filter(|bus| bus.tag == reg)
                .map(|bus| OperandRead {
                    value: bus.value,
                    source,
                })
        })
        .unwrap_or(committed)
}

/// Checks if the instruction in decode must wait for a load.
///
/// A load-use hazard exists when the instruction immediately ahead, which
/// has just moved into the memory latch, is a load whose destination the
/// decoding instruction reads.
///
/// # Arguments
///
/// * `decode` - The decode latch
/// * `memory` - The memory latch
///
/// # Returns
///
/// `true` if decode should hold its instruction for one cycle.
pub fn need_stall_load_use(decode: &StageLatch, memory: &StageLatch) -> bool {
    if !decode.has_insn || !memory.has_insn || !memory.instruction.opcode.is_load() {
        return false;
    }
    let loaded = memory.instruction.rd;
    decode
        .instruction
        .source_registers()
        .any(|reg| reg == loaded)
}
