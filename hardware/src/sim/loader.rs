//! Program Loader.
//!
//! This module turns program text into decoded instructions. One
//! instruction per line, fields separated by commas:
//!
//! ```text
//! MOVC,R1,#5       ; comment
//! ADD,R2,R1,R1
//! STORE,R2,R0,#8
//! BZ,#-8
//! HALT
//! ```
//!
//! Mnemonics are case-insensitive, registers are written `R<n>` and
//! immediates `#<signed decimal>`. Blank lines and anything after `;` are
//! ignored.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::common::{SimError, Word};
use crate::isa::{Instruction, Opcode};

/// Errors raised while loading a program file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read program {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid program.
    #[error(transparent)]
    Program(#[from] SimError),
}

/// Reads and parses a program file.
pub fn load_program(path: impl AsRef<Path>) -> Result<Vec<Instruction>, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_program(&text)?)
}

/// Parses program text into instructions.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>, SimError> {
    let mut program = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let code = raw.split(';').next().unwrap_or("").trim();
        if code.is_empty() {
            continue;
        }
        let insn = parse_line(code).map_err(|reason| SimError::Parse { line, reason })?;
        program.push(insn);
    }
    Ok(program)
}

/// Parses one non-empty instruction line.
pub fn parse_line(code: &str) -> Result<Instruction, String> {
    let fields: Vec<&str> = code.split(',').map(str::trim).collect();
    let (mnemonic, operands) = match fields.split_first() {
        Some((m, rest)) => (*m, rest),
        None => return Err("empty instruction".to_string()),
    };
    let opcode =
        Opcode::from_mnemonic(mnemonic).ok_or_else(|| format!("unknown opcode '{mnemonic}'"))?;

    let arity = |n: usize| -> Result<(), String> {
        if operands.len() == n {
            Ok(())
        } else {
            Err(format!(
                "{} takes {} operand(s), found {}",
                opcode,
                n,
                operands.len()
            ))
        }
    };

    let insn = match opcode {
        Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Ldr => {
            arity(3)?;
            Instruction::arith(
                opcode,
                register(operands[0])?,
                register(operands[1])?,
                register(operands[2])?,
            )
        }
        Opcode::Addl | Opcode::Subl | Opcode::Load => {
            arity(3)?;
            Instruction::immediate(
                opcode,
                register(operands[0])?,
                register(operands[1])?,
                immediate(operands[2])?,
            )
        }
        Opcode::Movc => {
            arity(2)?;
            Instruction::movc(register(operands[0])?, immediate(operands[1])?)
        }
        Opcode::Store => {
            arity(3)?;
            Instruction::store(
                register(operands[0])?,
                register(operands[1])?,
                immediate(operands[2])?,
            )
        }
        Opcode::Str => {
            arity(3)?;
            Instruction::str(
                register(operands[0])?,
                register(operands[1])?,
                register(operands[2])?,
            )
        }
        Opcode::Cmp => {
            arity(2)?;
            Instruction::cmp(register(operands[0])?, register(operands[1])?)
        }
        Opcode::Bz | Opcode::Bnz => {
            arity(1)?;
            Instruction::branch(opcode, immediate(operands[0])?)
        }
        Opcode::Halt => {
            arity(0)?;
            Instruction::halt()
        }
        Opcode::Nop => {
            arity(0)?;
            Instruction::nop()
        }
    };
    Ok(insn)
}

fn register(field: &str) -> Result<usize, String> {
    field
        .strip_prefix(&['R', 'r'][..])
        .and_then(|n| n.parse::<usize>().ok())
        .ok_or_else(|| format!("expected register, found '{field}'"))
}

fn immediate(field: &str) -> Result<Word, String> {
    field
        .strip_prefix('#')
        .and_then(|n| n.parse::<Word>().ok())
        .ok_or_else(|| format!("expected immediate, found '{field}'"))
}
