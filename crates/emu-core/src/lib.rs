//! Core traits for instruction-level emulation.
//!
//! CPUs talk to memory through [`Bus`], advance one instruction at a time
//! through [`Cpu`], and expose their state through [`Observable`].

mod bus;
mod cpu;
mod observable;

pub use bus::Bus;
pub use cpu::Cpu;
pub use observable::{Observable, Value};
