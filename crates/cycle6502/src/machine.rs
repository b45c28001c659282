//! A 6502 and its bus, driven as one unit.

use cyclebus::{Bus, Cpu, Interconnect, Observable, Tickable, Value};

use crate::{Mos6502, Registers, Variant};

/// One CPU wired to one bus.
///
/// The host-facing entry points take no arguments: the machine lends
/// its own bus to the CPU on every call.
///
/// # Examples
///
/// ```
/// use cycle6502::Machine;
/// use cyclebus::{Interconnect, Ram, Rom, Tickable};
///
/// let mut rom = vec![0xEA; 0x8000];
/// rom[0x7FFC] = 0x00;
/// rom[0x7FFD] = 0x80;
///
/// let mut bus = Interconnect::new();
/// bus.map(0x0000, 0x07FF, Box::new(Ram::new(0x800)));
/// bus.map(0x8000, 0xFFFF, Box::new(Rom::new(rom)));
///
/// let mut machine = Machine::new(bus);
/// machine.reset();
/// assert_eq!(machine.registers().pc, 0x8000);
///
/// machine.tick();
/// ```
pub struct Machine<B: Bus = Interconnect> {
    cpu: Mos6502,
    bus: B,
}

impl<B: Bus> Machine<B> {
    /// Wire an NMOS 6502 to `bus`. Call [`reset`](Self::reset) to start it.
    #[must_use]
    pub fn new(bus: B) -> Self {
        Self::with_variant(bus, Variant::default())
    }

    #[must_use]
    pub fn with_variant(bus: B, variant: Variant) -> Self {
        Self {
            cpu: Mos6502::with_variant(variant),
            bus,
        }
    }

    /// Reset the CPU through the vector at $FFFC.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
    }

    /// Raise IRQ. Returns false, and does nothing, when I is set.
    pub fn request_interrupt(&mut self) -> bool {
        self.cpu.interrupt(&mut self.bus)
    }

    /// Raise NMI.
    pub fn request_nonmaskable_interrupt(&mut self) {
        self.cpu.nmi(&mut self.bus);
    }

    /// Tick until the current instruction has used all its cycles.
    ///
    /// Returns the number of ticks spent. Called between instructions
    /// this runs exactly one; called mid-instruction it finishes the
    /// current one (or the reset/interrupt latency).
    pub fn step_instruction(&mut self) -> u32 {
        let mut ticks = 0;
        loop {
            self.tick();
            ticks += 1;
            if self.cpu.is_instruction_complete() {
                return ticks;
            }
        }
    }

    /// Read memory without device side effects.
    pub fn peek(&mut self, address: u16) -> u8 {
        self.bus.peek(address)
    }

    #[must_use]
    pub fn registers(&self) -> Registers {
        self.cpu.registers()
    }

    #[must_use]
    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    /// Mutable CPU access, e.g. to [`restore`](Mos6502::restore) a snapshot.
    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Take the machine apart.
    #[must_use]
    pub fn into_parts(self) -> (Mos6502, B) {
        (self.cpu, self.bus)
    }
}

impl<B: Bus> Tickable for Machine<B> {
    fn tick(&mut self) {
        self.cpu.tick(&mut self.bus);
    }
}

impl<B: Bus> Observable for Machine<B> {
    fn query(&self, path: &str) -> Option<Value> {
        self.cpu.query(path.strip_prefix("cpu.").unwrap_or(path))
    }

    fn query_paths(&self) -> &'static [&'static str] {
        self.cpu.query_paths()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{I, U};
    use cyclebus::{Ram, Rom, SimpleBus, Ticks};

    /// 2 KiB RAM mirrored up to $1FFF, 32 KiB ROM at $8000 with the
    /// program at its start and every vector pointing into it.
    fn make_machine(program: &[u8]) -> Machine {
        let mut rom = vec![0xEA; 0x8000];
        rom[..program.len()].copy_from_slice(program);
        // NMI $8100, RESET $8000, IRQ $8200
        rom[0x7FFA..].copy_from_slice(&[0x00, 0x81, 0x00, 0x80, 0x00, 0x82]);

        let mut bus = Interconnect::new();
        bus.try_map(0x0000, 0x1FFF, Box::new(Ram::new(0x800)))
            .expect("ram");
        bus.try_map(0x8000, 0xFFFF, Box::new(Rom::new(rom)))
            .expect("rom");

        let mut machine = Machine::new(bus);
        machine.reset();
        machine.step_instruction();
        machine
    }

    #[test]
    fn reset_then_run_program() {
        // LDA #$42; STA $0800 (mirror of $0000); LDX $0000
        let mut machine = make_machine(&[0xA9, 0x42, 0x8D, 0x00, 0x08, 0xAE, 0x00, 0x00]);

        assert_eq!(machine.step_instruction(), 2);
        assert_eq!(machine.step_instruction(), 4);
        assert_eq!(machine.step_instruction(), 4);
        assert_eq!(machine.registers().x, 0x42);
        assert_eq!(machine.peek(0x1800), 0x42);
    }

    #[test]
    fn reset_latency_counts_as_a_step() {
        let mut machine = Machine::new(Interconnect::flat_ram());
        machine.reset();
        assert_eq!(machine.step_instruction(), 8);
    }

    #[test]
    fn writes_to_rom_are_ignored() {
        // STA $8000
        let mut machine = make_machine(&[0x8D, 0x00, 0x80]);
        machine.step_instruction();
        assert_eq!(machine.peek(0x8000), 0x8D);
    }

    #[test]
    fn unmapped_reads_zero() {
        // LDA #$FF; LDA $4000
        let mut machine = make_machine(&[0xA9, 0xFF, 0xAD, 0x00, 0x40]);
        machine.step_instruction();
        machine.step_instruction();
        assert_eq!(machine.registers().a, 0x00);
        assert_eq!(machine.query("flags.z"), Some(Value::Bool(true)));
    }

    #[test]
    fn interrupts_vector_through_rom() {
        // CLI
        let mut machine = make_machine(&[0x58]);
        machine.step_instruction();

        assert!(machine.request_interrupt());
        assert_eq!(machine.registers().pc, 0x8200);
        assert_eq!(machine.step_instruction(), 7);
        assert!(!machine.request_interrupt(), "I set by the first IRQ");

        machine.request_nonmaskable_interrupt();
        assert_eq!(machine.registers().pc, 0x8100);
        assert_eq!(machine.step_instruction(), 8);
        // NMI pushed the status that the IRQ left: I set, B clear
        assert_eq!(machine.peek(0x01F8), U | I);
    }

    #[test]
    fn tick_n_matches_repeated_ticks() {
        let program = [0xA2, 0x05, 0xCA, 0xD0, 0xFD, 0xEA];
        let mut a = make_machine(&program);
        let mut b = make_machine(&program);

        a.tick_n(Ticks::new(23));
        for _ in 0..23 {
            b.tick();
        }
        assert_eq!(a.registers(), b.registers());
        assert_eq!(a.cpu().total_cycles(), b.cpu().total_cycles());
    }

    #[test]
    fn observable_accepts_cpu_prefix() {
        let machine = make_machine(&[]);
        assert_eq!(machine.query("cpu.pc"), Some(Value::U16(0x8000)));
        assert_eq!(machine.query("pc"), Some(Value::U16(0x8000)));
        assert_eq!(machine.query("cpu.nope"), None);
    }

    #[test]
    fn ricoh_variant_on_simple_bus() {
        let mut bus = SimpleBus::new();
        // SED; LDA #$09; CLC; ADC #$01
        bus.load(0x0400, &[0xF8, 0xA9, 0x09, 0x18, 0x69, 0x01]);
        bus.load(0xFFFC, &[0x00, 0x04]);

        let mut machine = Machine::with_variant(bus, Variant::Ricoh2A03);
        machine.reset();
        machine.step_instruction();
        for _ in 0..4 {
            machine.step_instruction();
        }
        assert_eq!(machine.registers().a, 0x0A);
        assert_eq!(machine.bus().get(0x0400), 0xF8);
    }
}
