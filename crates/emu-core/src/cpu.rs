//! CPU core trait.

use crate::Bus;

/// A CPU core.
///
/// CPUs execute instructions and access memory through a bus. The bus is
/// passed in, not owned, so it can be shared with other components (video,
/// timers) that read and write the same address space between steps.
///
/// CPUs expose their internal state for observation and debugging.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// The error returned when an instruction cannot be executed.
    type Error;

    /// Execute exactly one instruction.
    ///
    /// Runs to completion before returning; the CPU never loops internally
    /// and never blocks.
    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<(), Self::Error>;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU is halted.
    fn is_halted(&self) -> bool;

    /// Reset the CPU to its initial state.
    fn reset(&mut self);
}
