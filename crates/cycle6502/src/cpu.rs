//! 6502 CPU implementation.
//!
//! Instruction-granular execution with cycle-accurate timing: the tick
//! that finds the countdown at zero runs a whole instruction and loads
//! its cycle cost, and the ticks after it only count down.

use cyclebus::{Bus, Cpu, Observable, Ticks, Value};

use crate::flags::{C, D, I, N, V, Z};
use crate::{Mode, Registers, Status, Variant, lookup};

/// Reset vector ($FFFC-$FFFD).
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Non-maskable interrupt vector ($FFFA-$FFFB).
pub const NMI_VECTOR: u16 = 0xFFFA;

/// IRQ and BRK vector ($FFFE-$FFFF).
pub const IRQ_VECTOR: u16 = 0xFFFE;

const RESET_CYCLES: u8 = 8;
const IRQ_CYCLES: u8 = 7;
const NMI_CYCLES: u8 = 8;

/// The MOS 6502 CPU.
///
/// The CPU borrows its bus on every call, so one bus can be shared with
/// other components between ticks. Registers are read through
/// [`Cpu::registers`] and replaced only through [`Mos6502::restore`].
#[derive(Debug, Clone)]
pub struct Mos6502 {
    pub(crate) regs: Registers,

    variant: Variant,

    /// Opcode of the instruction most recently started.
    pub(crate) opcode: u8,

    /// Operand byte, staged by Immediate/Implied or read on demand.
    pub(crate) fetched: u8,

    /// Effective address resolved by the addressing mode.
    pub(crate) addr_abs: u16,

    /// Sign-extended branch displacement.
    pub(crate) addr_rel: u16,

    /// Addressing mode of the current instruction.
    pub(crate) mode: Mode,

    /// Cycles left before the next instruction starts.
    pub(crate) cycles: u8,

    /// Total cycles ticked (diagnostic only).
    total_cycles: Ticks,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6502 {
    /// Create an NMOS 6502. Call [`Cpu::reset`] before running code.
    #[must_use]
    pub fn new() -> Self {
        Self::with_variant(Variant::default())
    }

    /// Create a CPU of the given variant.
    #[must_use]
    pub fn with_variant(variant: Variant) -> Self {
        Self {
            regs: Registers::new(),
            variant,
            opcode: 0,
            fetched: 0,
            addr_abs: 0,
            addr_rel: 0,
            mode: Mode::Implied,
            cycles: 0,
            total_cycles: Ticks::ZERO,
        }
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Replace the register file, e.g. from a saved snapshot.
    ///
    /// Clears the countdown, so the next tick starts an instruction at
    /// the restored PC. The status byte is read the way PLP reads it: B
    /// is dropped and U forced on.
    pub fn restore(&mut self, regs: Registers) {
        self.regs = regs;
        self.regs.p = Status::from_byte(regs.p.0);
        self.cycles = 0;
    }

    /// Cycles left in the current instruction (or reset/interrupt sequence).
    #[must_use]
    pub fn remaining_cycles(&self) -> u8 {
        self.cycles
    }

    /// Total cycles ticked since creation. Reset does not clear this.
    #[must_use]
    pub fn total_cycles(&self) -> Ticks {
        self.total_cycles
    }

    /// Opcode of the instruction most recently started.
    #[must_use]
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Fetch, decode and execute one instruction, loading its cycle cost.
    fn step<B: Bus>(&mut self, bus: &mut B) {
        let pc = self.regs.pc;
        self.opcode = self.fetch_byte(bus);
        let instruction = lookup(self.opcode);

        log::trace!(
            "{pc:04X}  {:02X}  {:<4} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} S:{:02X}",
            self.opcode,
            instruction.mnemonic,
            self.regs.a,
            self.regs.x,
            self.regs.y,
            self.regs.p.0,
            self.regs.s
        );

        self.cycles = instruction.cycles;
        let crossed = self.resolve(bus, instruction.mode);
        self.execute(bus, instruction.operation);
        if instruction.page_penalty && crossed {
            self.cycles += 1;
        }
    }

    /// Push PC and status, mask IRQs and jump through `vector`.
    fn service_interrupt<B: Bus>(&mut self, bus: &mut B, vector: u16, cycles: u8) {
        self.push_word(bus, self.regs.pc);
        self.push(bus, self.regs.p.to_byte_irq());
        self.regs.p.set(I);
        self.regs.pc = Self::read_word(bus, vector);
        self.cycles = cycles;
    }
}

impl Cpu for Mos6502 {
    type Registers = Registers;

    fn tick<B: Bus>(&mut self, bus: &mut B) {
        if self.cycles == 0 {
            self.step(bus);
        }
        self.cycles -= 1;
        self.total_cycles += Ticks::new(1);
    }

    fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.regs = Registers::new();
        self.regs.pc = Self::read_word(bus, RESET_VECTOR);
        self.opcode = 0;
        self.fetched = 0;
        self.addr_abs = 0;
        self.addr_rel = 0;
        self.mode = Mode::Implied;
        self.cycles = RESET_CYCLES;
        log::debug!(
            "{} reset, PC=${:04X}",
            self.variant.name(),
            self.regs.pc
        );
    }

    fn interrupt<B: Bus>(&mut self, bus: &mut B) -> bool {
        if self.regs.p.is_set(I) {
            log::trace!("IRQ masked at ${:04X}", self.regs.pc);
            return false;
        }
        let from = self.regs.pc;
        self.service_interrupt(bus, IRQ_VECTOR, IRQ_CYCLES);
        log::debug!("IRQ from ${from:04X} to ${:04X}", self.regs.pc);
        true
    }

    fn nmi<B: Bus>(&mut self, bus: &mut B) {
        let from = self.regs.pc;
        self.service_interrupt(bus, NMI_VECTOR, NMI_CYCLES);
        log::debug!("NMI from ${from:04X} to ${:04X}", self.regs.pc);
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Self::Registers {
        self.regs
    }

    fn is_instruction_complete(&self) -> bool {
        self.cycles == 0
    }
}

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" | "sp" => Some(self.regs.s.into()),
            "p" | "status" => Some(self.regs.p.0.into()),
            "flags.c" | "c" => Some(self.regs.p.is_set(C).into()),
            "flags.z" | "z" => Some(self.regs.p.is_set(Z).into()),
            "flags.i" | "i" => Some(self.regs.p.is_set(I).into()),
            "flags.d" | "d" => Some(self.regs.p.is_set(D).into()),
            "flags.v" | "v" => Some(self.regs.p.is_set(V).into()),
            "flags.n" | "n" => Some(self.regs.p.is_set(N).into()),
            "opcode" => Some(self.opcode.into()),
            "mnemonic" => Some(lookup(self.opcode).mnemonic.into()),
            "remaining" => Some(self.cycles.into()),
            "cycle" => Some(self.total_cycles.get().into()),
            "variant" => Some(self.variant.name().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "s",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.v",
            "flags.n",
            "opcode",
            "mnemonic",
            "remaining",
            "cycle",
            "variant",
        ]
    }
}
