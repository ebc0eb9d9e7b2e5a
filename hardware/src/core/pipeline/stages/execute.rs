//! Execute (EX) Stage.
//!
//! This module implements the execution stage of the pipeline. It is responsible for:
//! - Performing ALU operations and `MOVC`.
//! - Setting the zero flag for `CMP` and `MOVC`.
//! - Computing effective addresses for loads and stores.
//! - Resolving `BZ`/`BNZ` and redirecting fetch on a taken branch.

use tracing::{debug, trace};

use crate::common::SimError;
use crate::core::pipeline::latches::{ResultBus, StageLatch};
use crate::core::pipeline::signals::AluOp;
use crate::core::units::{Alu, Lsu};
use crate::core::Cpu;
use crate::isa::{Opcode, OperandClass};

/// Executes the Execute stage of the pipeline.
///
/// Results become visible to decode through the forwarding bus in the same
/// cycle. Loads produce no result here; their value is not known until the
/// memory stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
///
/// # Returns
///
/// The processed latch, [`SimError::DivideByZero`] for `DIV` by zero, or
/// [`SimError::FetchOutOfRange`] for a branch target outside the address
/// space.
pub fn execute_stage(cpu: &mut Cpu) -> Result<Option<StageLatch>, SimError> {
    if cpu.latches.execute.is_empty() {
        return Ok(None);
    }

    let mut latch = cpu.latches.execute.take();
    let insn = latch.instruction;

    match insn.opcode {
        Opcode::Movc => {
            latch.result = Some(ResultBus {
                tag: insn.rd,
                value: insn.imm,
            });
            cpu.zero_flag = insn.imm == 0;
        }
        Opcode::Cmp => {
            cpu.zero_flag = latch.rs1_value == latch.rs2_value;
        }
        Opcode::Load => latch.memory_address = Lsu::effective_address(latch.rs1_value, insn.imm),
        Opcode::Ldr => {
            latch.memory_address = Lsu::effective_address(latch.rs1_value, latch.rs2_value)
        }
        Opcode::Store => {
            latch.memory_address = Lsu::effective_address(latch.rs2_value, insn.imm)
        }
        Opcode::Str => {
            latch.memory_address = Lsu::effective_address(latch.rs2_value, latch.rs3_value)
        }
        Opcode::Bz | Opcode::Bnz => {
            let taken = cpu.zero_flag == (insn.opcode == Opcode::Bz);
            if taken {
                take_branch(cpu, &latch)?;
            }
        }
        Opcode::Halt | Opcode::Nop => {}
        op => {
            if let Some(alu_op) = AluOp::from_opcode(op) {
                let b = if op.operand_class() == OperandClass::RegisterImmediate {
                    insn.imm
                } else {
                    latch.rs2_value
                };
                let value = Alu::execute(alu_op, latch.rs1_value, b).ok_or(
                    SimError::DivideByZero {
                        pc: latch.pc,
                        instruction: insn,
                    },
                )?;
                latch.result = Some(ResultBus {
                    tag: insn.rd,
                    value,
                });
            }
        }
    }

    trace!(pc = latch.pc, insn = %insn, result = ?latch.result, "EX");
    cpu.bus.execute = latch.result;
    cpu.latches.memory = latch;
    Ok(Some(latch))
}

/// Redirects fetch to the branch target and squashes the instruction fetched
/// behind the branch.
fn take_branch(cpu: &mut Cpu, latch: &StageLatch) -> Result<(), SimError> {
    let target = i64::from(latch.pc) + i64::from(latch.instruction.imm);
    let target = u32::try_from(target).map_err(|_| SimError::FetchOutOfRange { pc: target })?;

    cpu.pc = target;
    cpu.stats.branches_taken += 1;
    let squashed = cpu.latches.decode;
    if squashed.has_insn && !squashed.fetch_fault {
        cpu.stats.flushed += 1;
        debug!(
            pc = squashed.pc,
            insn = %squashed.instruction,
            "flushed by taken branch"
        );
    }
    cpu.latches.decode.flush();
    cpu.redirect_pending = true;
    cpu.halt_fetched = false;
    debug!(pc = latch.pc, dest = target, "branch taken");
    Ok(())
}
