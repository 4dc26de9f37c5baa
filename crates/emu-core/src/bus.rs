//! Memory bus interface.

/// Memory bus interface.
///
/// Components access memory and memory-mapped peripherals through this
/// trait. The bus handles address decoding and routing to the appropriate
/// device. Every one of the 65,536 addresses is readable and writable; there
/// are no fault semantics.
pub trait Bus {
    /// Read a byte from the given address.
    ///
    /// Takes `&mut self` because a peripheral register may change state when
    /// read.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);
}
