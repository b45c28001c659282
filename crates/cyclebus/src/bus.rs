//! Memory bus interface.

/// Memory bus interface.
///
/// CPUs access memory and peripherals through this trait. The bus
/// handles address decoding; a read of an address nothing answers is
/// still a defined value, so none of these calls can fail.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);

    /// Read a byte without triggering device side effects.
    ///
    /// Debuggers and disassemblers use this to inspect memory without
    /// perturbing latches or status registers. Buses whose reads have no
    /// side effects can rely on the default.
    fn peek(&mut self, address: u16) -> u8 {
        self.read(address)
    }
}
