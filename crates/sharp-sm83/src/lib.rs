//! Sharp SM83 CPU interpreter.
//!
//! Each call to `step()` fetches, decodes and executes exactly one
//! instruction from the unprefixed opcode table.

pub mod alu;
mod cpu;
mod disasm;
mod error;
mod flags;
mod opcodes;
mod registers;

pub use alu::AluResult;
pub use cpu::Sm83;
pub use disasm::disassemble;
pub use error::StepError;
pub use flags::{CF, Flag, HF, NF, ZF};
pub use opcodes::{Instruction, OPCODES, decode};
pub use registers::{BOOT_PC, BOOT_SP, Pair, Registers};
