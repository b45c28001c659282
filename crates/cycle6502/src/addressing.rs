//! 6502 addressing modes.
//!
//! A mode consumes its operand bytes from the instruction stream and
//! leaves the effective address in `addr_abs` (or the branch displacement
//! in `addr_rel`). Implied and Immediate stage the operand itself in
//! `fetched`, so operations skip the bus read for those two.
//!
//! - Implied: no operand, or the accumulator for shifts (ASL A)
//! - Immediate: #$nn
//! - Zero Page: $nn
//! - Zero Page,X / Zero Page,Y: $nn,X (wraps in page zero)
//! - Relative: branch offset (-128 to +127)
//! - Absolute: $nnnn
//! - Absolute,X / Absolute,Y: $nnnn,X (may cross page)
//! - Indirect: ($nnnn) (JMP only, page wrap bug)
//! - Indexed Indirect: ($nn,X)
//! - Indirect Indexed: ($nn),Y (may cross page)

use cyclebus::Bus;

use crate::Mos6502;

/// Addressing mode of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
}

impl Mode {
    /// Operand bytes that follow the opcode.
    #[must_use]
    pub const fn operand_len(self) -> u16 {
        match self {
            Self::Implied => 0,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::Relative
            | Self::IndexedIndirect
            | Self::IndirectIndexed => 1,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 2,
        }
    }
}

/// True if `base` and `addr` sit on different 256-byte pages.
pub(crate) const fn page_crossed(base: u16, addr: u16) -> bool {
    base & 0xFF00 != addr & 0xFF00
}

impl Mos6502 {
    /// Resolve `mode` for the current instruction.
    ///
    /// Returns true if an indexed address crossed a page boundary, which
    /// costs read-type instructions an extra cycle.
    pub(crate) fn resolve<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> bool {
        self.mode = mode;
        match mode {
            Mode::Implied => {
                self.fetched = self.regs.a;
                false
            }
            Mode::Immediate => {
                self.addr_abs = self.regs.pc;
                self.fetched = self.fetch_byte(bus);
                false
            }
            Mode::ZeroPage => {
                self.addr_abs = u16::from(self.fetch_byte(bus));
                false
            }
            Mode::ZeroPageX => {
                self.addr_abs = u16::from(self.fetch_byte(bus).wrapping_add(self.regs.x));
                false
            }
            Mode::ZeroPageY => {
                self.addr_abs = u16::from(self.fetch_byte(bus).wrapping_add(self.regs.y));
                false
            }
            Mode::Relative => {
                // Sign-extend the displacement to 16 bits
                self.addr_rel = self.fetch_byte(bus) as i8 as u16;
                false
            }
            Mode::Absolute => {
                self.addr_abs = self.fetch_word(bus);
                false
            }
            Mode::AbsoluteX => {
                let base = self.fetch_word(bus);
                self.addr_abs = base.wrapping_add(u16::from(self.regs.x));
                page_crossed(base, self.addr_abs)
            }
            Mode::AbsoluteY => {
                let base = self.fetch_word(bus);
                self.addr_abs = base.wrapping_add(u16::from(self.regs.y));
                page_crossed(base, self.addr_abs)
            }
            Mode::Indirect => {
                let ptr = self.fetch_word(bus);
                // The high byte never carries: ($10FF) reads $10FF and $1000
                let hi_ptr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
                let lo = bus.read(ptr);
                let hi = bus.read(hi_ptr);
                self.addr_abs = u16::from_le_bytes([lo, hi]);
                false
            }
            Mode::IndexedIndirect => {
                let ptr = self.fetch_byte(bus).wrapping_add(self.regs.x);
                self.addr_abs = Self::read_zero_page_word(bus, ptr);
                false
            }
            Mode::IndirectIndexed => {
                let ptr = self.fetch_byte(bus);
                let base = Self::read_zero_page_word(bus, ptr);
                self.addr_abs = base.wrapping_add(u16::from(self.regs.y));
                page_crossed(base, self.addr_abs)
            }
        }
    }

    /// Fetch the next byte at PC and increment PC.
    pub(crate) fn fetch_byte<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Fetch a little-endian word at PC.
    fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Read a pointer from zero page; the high byte wraps $FF -> $00.
    fn read_zero_page_word<B: Bus>(bus: &mut B, ptr: u8) -> u16 {
        let lo = bus.read(u16::from(ptr));
        let hi = bus.read(u16::from(ptr.wrapping_add(1)));
        u16::from_le_bytes([lo, hi])
    }

    /// Read a little-endian word, e.g. an interrupt vector.
    pub(crate) fn read_word<B: Bus>(bus: &mut B, addr: u16) -> u16 {
        let lo = bus.read(addr);
        let hi = bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }
}
