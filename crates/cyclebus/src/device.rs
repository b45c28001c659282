//! Memory-mapped devices.
//!
//! A device answers reads and accepts writes for the addresses the
//! [`Interconnect`](crate::Interconnect) routes to it. Devices see the
//! offset into their own window: the first address of the window is `0`.

/// A component attached to the bus.
pub trait Device {
    /// Read the byte at `offset` into the device's window. May have side
    /// effects (e.g. clearing a status latch).
    fn read(&mut self, offset: u16) -> u8;

    /// Write a byte. Read-only devices ignore it.
    fn write(&mut self, offset: u16, value: u8);

    /// Read a byte without side effects.
    ///
    /// Devices with read side effects override this; plain memory keeps
    /// the default.
    fn peek(&mut self, offset: u16) -> u8 {
        self.read(offset)
    }
}

/// Read/write memory.
///
/// The window offset is reduced modulo the size, so a RAM mapped over a
/// window larger than itself mirrors through it the way partially
/// decoded RAM does on real boards.
#[derive(Debug, Clone)]
pub struct Ram {
    data: Vec<u8>,
}

impl Ram {
    /// Create zero-filled RAM of `size` bytes.
    ///
    /// A size of zero is bumped to one byte so indexing stays total.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size.max(1)],
        }
    }

    /// Copy `bytes` in starting at `offset`. Bytes past the end are dropped.
    pub fn load(&mut self, offset: usize, bytes: &[u8]) {
        let start = offset.min(self.data.len());
        let end = (start + bytes.len()).min(self.data.len());
        self.data[start..end].copy_from_slice(&bytes[..end - start]);
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: RAM holds at least one byte.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn index(&self, offset: u16) -> usize {
        usize::from(offset) % self.data.len()
    }
}

impl Device for Ram {
    fn read(&mut self, offset: u16) -> u8 {
        self.data[self.index(offset)]
    }

    fn write(&mut self, offset: u16, value: u8) {
        let index = self.index(offset);
        self.data[index] = value;
    }
}

/// Read-only memory. Writes are ignored.
///
/// Byte `0` of the image answers the first address of the window. An
/// image shorter than its window mirrors through it.
#[derive(Debug, Clone)]
pub struct Rom {
    data: Vec<u8>,
}

impl Rom {
    /// Create ROM holding `bytes`. An empty image reads as a single `0x00`.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        let data = if bytes.is_empty() { vec![0] } else { bytes };
        Self { data }
    }
}

impl Device for Rom {
    fn read(&mut self, offset: u16) -> u8 {
        self.data[usize::from(offset) % self.data.len()]
    }

    fn write(&mut self, offset: u16, value: u8) {
        log::trace!("ignored write ${value:02X} to ROM offset ${offset:04X}");
    }
}
