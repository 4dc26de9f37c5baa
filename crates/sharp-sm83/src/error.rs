//! Errors reported by the interpreter.

use thiserror::Error;

/// Why a call to `step()` could not execute an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    /// The fetched byte has no entry in the opcode table. The instruction's
    /// length and effect are unknown, so execution cannot continue.
    #[error("invalid opcode {opcode:#04X} at {address:#06X}")]
    InvalidOpcode { opcode: u8, address: u16 },
}
