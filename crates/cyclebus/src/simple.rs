//! Flat 64 KiB memory bus.

use crate::Bus;

/// A flat 64 KiB RAM bus with no devices and no side effects.
///
/// Handy for unit tests and instruction harnesses where the full
/// [`Interconnect`](crate::Interconnect) would only add noise.
pub struct SimpleBus {
    ram: Box<[u8; 0x10000]>,
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleBus {
    /// Create a zero-filled bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; 0x10000]),
        }
    }

    /// Copy `bytes` in starting at `address`, wrapping at the top of memory.
    pub fn load(&mut self, address: u16, bytes: &[u8]) {
        let mut addr = address;
        for &byte in bytes {
            self.ram[usize::from(addr)] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    /// Read a byte through a shared reference.
    #[must_use]
    pub fn get(&self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.ram[usize::from(address)] = value;
    }
}
