//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used in the Execute stage. All
//! operations work on 32-bit two's-complement words and wrap on overflow.

use crate::common::Word;
use crate::core::pipeline::signals::AluOp;

/// Arithmetic Logic Unit (ALU) for integer operations.
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU operation to perform
    /// * `a` - First operand
    /// * `b` - Second operand (the immediate for `ADDL`/`SUBL`)
    ///
    /// # Returns
    ///
    /// The wrapped result, or `None` when dividing by zero. `Word::MIN / -1`
    /// wraps to `Word::MIN`.
    pub fn execute(op: AluOp, a: Word, b: Word) -> Option<Word> {
        match op {
            AluOp::Add => Some(a.wrapping_add(b)),
            AluOp::Sub => Some(a.wrapping_sub(b)),
            AluOp::Mul => Some(a.wrapping_mul(b)),
            AluOp::Div => {
                if b == 0 {
                    None
                } else {
                    Some(a.wrapping_div(b))
                }
            }
            AluOp::And => Some(a & b),
            AluOp::Or => Some(a | b),
            AluOp::Xor => Some(a ^ b),
        }
    }
}
