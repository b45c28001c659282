//! Operation semantics.
//!
//! By the time an operation runs, its addressing mode has already been
//! resolved: `addr_abs` holds the effective address (or `addr_rel` the
//! branch displacement), and for Immediate/Implied the operand is
//! already staged in `fetched`.

use cyclebus::Bus;

use crate::addressing::page_crossed;
use crate::cpu::IRQ_VECTOR;
use crate::flags::{C, D, I, N, V, Z};
use crate::{Mode, Mos6502, Operation, Status};

impl Mos6502 {
    /// Run one operation against the resolved operand.
    pub(crate) fn execute<B: Bus>(&mut self, bus: &mut B, operation: Operation) {
        match operation {
            // Loads and stores
            Operation::Lda => {
                self.regs.a = self.fetch_operand(bus);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Ldx => {
                self.regs.x = self.fetch_operand(bus);
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Ldy => {
                self.regs.y = self.fetch_operand(bus);
                self.regs.p.update_nz(self.regs.y);
            }
            Operation::Sta => bus.write(self.addr_abs, self.regs.a),
            Operation::Stx => bus.write(self.addr_abs, self.regs.x),
            Operation::Sty => bus.write(self.addr_abs, self.regs.y),

            // Logic and arithmetic
            Operation::Ora => {
                self.regs.a |= self.fetch_operand(bus);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::And => {
                self.regs.a &= self.fetch_operand(bus);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Eor => {
                self.regs.a ^= self.fetch_operand(bus);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Adc => {
                let val = self.fetch_operand(bus);
                self.do_adc(val);
            }
            Operation::Sbc => {
                let val = self.fetch_operand(bus);
                self.do_sbc(val);
            }
            Operation::Cmp => {
                let val = self.fetch_operand(bus);
                self.do_compare(self.regs.a, val);
            }
            Operation::Cpx => {
                let val = self.fetch_operand(bus);
                self.do_compare(self.regs.x, val);
            }
            Operation::Cpy => {
                let val = self.fetch_operand(bus);
                self.do_compare(self.regs.y, val);
            }
            Operation::Bit => {
                let val = self.fetch_operand(bus);
                self.regs.p.set_if(Z, self.regs.a & val == 0);
                self.regs.p.set_if(N, val & 0x80 != 0);
                self.regs.p.set_if(V, val & 0x40 != 0);
            }

            // Read-modify-write: accumulator in Implied mode, memory otherwise
            Operation::Asl => self.modify(bus, Self::do_asl),
            Operation::Lsr => self.modify(bus, Self::do_lsr),
            Operation::Rol => self.modify(bus, Self::do_rol),
            Operation::Ror => self.modify(bus, Self::do_ror),
            Operation::Inc => self.modify(bus, Self::do_inc),
            Operation::Dec => self.modify(bus, Self::do_dec),

            // Register increments and transfers
            Operation::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_nz(self.regs.y);
            }
            Operation::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.y);
            }
            Operation::Tax => {
                self.regs.x = self.regs.a;
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_nz(self.regs.y);
            }
            Operation::Txa => {
                self.regs.a = self.regs.x;
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Tya => {
                self.regs.a = self.regs.y;
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Tsx => {
                self.regs.x = self.regs.s;
                self.regs.p.update_nz(self.regs.x);
            }
            // TXS is the one transfer that leaves the flags alone
            Operation::Txs => self.regs.s = self.regs.x,

            // Flags
            Operation::Clc => self.regs.p.clear(C),
            Operation::Sec => self.regs.p.set(C),
            Operation::Cli => self.regs.p.clear(I),
            Operation::Sei => self.regs.p.set(I),
            Operation::Cld => self.regs.p.clear(D),
            Operation::Sed => self.regs.p.set(D),
            Operation::Clv => self.regs.p.clear(V),

            // Branches
            Operation::Bcc => self.branch(!self.regs.p.is_set(C)),
            Operation::Bcs => self.branch(self.regs.p.is_set(C)),
            Operation::Bne => self.branch(!self.regs.p.is_set(Z)),
            Operation::Beq => self.branch(self.regs.p.is_set(Z)),
            Operation::Bpl => self.branch(!self.regs.p.is_set(N)),
            Operation::Bmi => self.branch(self.regs.p.is_set(N)),
            Operation::Bvc => self.branch(!self.regs.p.is_set(V)),
            Operation::Bvs => self.branch(self.regs.p.is_set(V)),

            // Jumps and subroutines
            Operation::Jmp => self.regs.pc = self.addr_abs,
            Operation::Jsr => {
                // The pushed address is the last byte of the JSR itself
                self.push_word(bus, self.regs.pc.wrapping_sub(1));
                self.regs.pc = self.addr_abs;
            }
            Operation::Rts => {
                self.regs.pc = self.pop_word(bus).wrapping_add(1);
            }
            Operation::Brk => {
                // Immediate mode has already skipped the padding byte
                self.push_word(bus, self.regs.pc);
                self.push(bus, self.regs.p.to_byte_brk());
                self.regs.p.set(I);
                self.regs.pc = Self::read_word(bus, IRQ_VECTOR);
            }
            Operation::Rti => {
                let p = self.pop(bus);
                self.regs.p = Status::from_byte(p);
                self.regs.pc = self.pop_word(bus);
            }

            // Stack
            Operation::Pha => self.push(bus, self.regs.a),
            Operation::Php => self.push(bus, self.regs.p.to_byte_brk()),
            Operation::Pla => {
                self.regs.a = self.pop(bus);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Plp => {
                let p = self.pop(bus);
                self.regs.p = Status::from_byte(p);
            }

            Operation::Nop => {}
            Operation::Trap => {
                log::debug!(
                    "trap opcode ${:02X} at ${:04X}",
                    self.opcode,
                    self.regs.pc.wrapping_sub(1)
                );
            }
        }
    }

    /// The operand byte. Immediate and Implied staged it during decode;
    /// every other mode reads it from the resolved address.
    fn fetch_operand<B: Bus>(&mut self, bus: &mut B) -> u8 {
        if !matches!(self.mode, Mode::Implied | Mode::Immediate) {
            self.fetched = bus.read(self.addr_abs);
        }
        self.fetched
    }

    fn modify<B: Bus>(&mut self, bus: &mut B, op: fn(&mut Self, u8) -> u8) {
        let val = self.fetch_operand(bus);
        let result = op(self, val);
        if self.mode == Mode::Implied {
            self.regs.a = result;
        } else {
            bus.write(self.addr_abs, result);
        }
    }

    fn branch(&mut self, taken: bool) {
        if !taken {
            return;
        }
        self.cycles += 1;
        let target = self.regs.pc.wrapping_add(self.addr_rel);
        if page_crossed(self.regs.pc, target) {
            self.cycles += 1;
        }
        self.regs.pc = target;
    }

    pub(crate) fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        let addr = self.regs.push();
        bus.write(addr, value);
    }

    fn pop<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let addr = self.regs.pop();
        bus.read(addr)
    }

    /// Push high byte first, so the word sits little-endian in memory.
    pub(crate) fn push_word<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
    }

    fn pop_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pop(bus);
        let hi = self.pop(bus);
        u16::from_le_bytes([lo, hi])
    }

    // ========================================================================
    // ALU operations
    // ========================================================================

    fn decimal_active(&self) -> bool {
        self.variant().has_decimal_mode() && self.regs.p.is_set(D)
    }

    fn do_adc(&mut self, val: u8) {
        if self.decimal_active() {
            self.do_adc_decimal(val);
        } else {
            self.do_adc_binary(val);
        }
    }

    fn do_adc_binary(&mut self, val: u8) {
        let a = self.regs.a;
        let sum = u16::from(a) + u16::from(val) + u16::from(self.regs.p.bit(C));
        let result = sum as u8;

        self.regs.p.set_if(C, sum > 0xFF);
        self.regs
            .p
            .set_if(V, (a ^ result) & (val ^ result) & 0x80 != 0);
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }

    /// NMOS BCD add. Z comes from the binary sum; N and V come from the
    /// sum after the low nibble is adjusted but before the high one is.
    fn do_adc_decimal(&mut self, val: u8) {
        let a = self.regs.a;
        let carry = self.regs.p.bit(C);

        let mut lo = u16::from(a & 0x0F) + u16::from(val & 0x0F) + u16::from(carry);
        if lo > 0x09 {
            lo = ((lo + 0x06) & 0x0F) + 0x10;
        }
        let mut sum = u16::from(a & 0xF0) + u16::from(val & 0xF0) + lo;

        let binary = a.wrapping_add(val).wrapping_add(carry);
        self.regs.p.set_if(Z, binary == 0);
        self.regs.p.set_if(N, sum & 0x80 != 0);
        self.regs
            .p
            .set_if(V, (u16::from(a) ^ sum) & (u16::from(val) ^ sum) & 0x80 != 0);

        if sum > 0x9F {
            sum += 0x60;
        }
        self.regs.p.set_if(C, sum > 0xFF);
        self.regs.a = sum as u8;
    }

    fn do_sbc(&mut self, val: u8) {
        if self.decimal_active() {
            self.do_sbc_decimal(val);
        } else {
            // SBC is ADC with inverted operand
            self.do_adc_binary(!val);
        }
    }

    /// NMOS BCD subtract. Every flag matches the binary subtraction.
    fn do_sbc_decimal(&mut self, val: u8) {
        let a = self.regs.a;
        let borrow = i16::from(1 - self.regs.p.bit(C));

        self.do_adc_binary(!val);

        let mut lo = i16::from(a & 0x0F) - i16::from(val & 0x0F) - borrow;
        let mut hi = i16::from(a >> 4) - i16::from(val >> 4);
        if lo < 0 {
            lo -= 6;
            hi -= 1;
        }
        if hi < 0 {
            hi -= 6;
        }

        self.regs.a = ((hi << 4) as u8) | ((lo & 0x0F) as u8);
    }

    fn do_compare(&mut self, reg: u8, val: u8) {
        self.regs.p.set_if(C, reg >= val);
        self.regs.p.update_nz(reg.wrapping_sub(val));
    }

    fn do_asl(&mut self, val: u8) -> u8 {
        self.regs.p.set_if(C, val & 0x80 != 0);
        let result = val << 1;
        self.regs.p.update_nz(result);
        result
    }

    fn do_lsr(&mut self, val: u8) -> u8 {
        self.regs.p.set_if(C, val & 0x01 != 0);
        let result = val >> 1;
        self.regs.p.update_nz(result);
        result
    }

    fn do_rol(&mut self, val: u8) -> u8 {
        let carry = self.regs.p.bit(C);
        self.regs.p.set_if(C, val & 0x80 != 0);
        let result = (val << 1) | carry;
        self.regs.p.update_nz(result);
        result
    }

    fn do_ror(&mut self, val: u8) -> u8 {
        let carry = self.regs.p.bit(C) << 7;
        self.regs.p.set_if(C, val & 0x01 != 0);
        let result = (val >> 1) | carry;
        self.regs.p.update_nz(result);
        result
    }

    fn do_inc(&mut self, val: u8) -> u8 {
        let result = val.wrapping_add(1);
        self.regs.p.update_nz(result);
        result
    }

    fn do_dec(&mut self, val: u8) -> u8 {
        let result = val.wrapping_sub(1);
        self.regs.p.update_nz(result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variant;

    fn cpu_with(a: u8, p: u8) -> Mos6502 {
        let mut cpu = Mos6502::new();
        cpu.regs.a = a;
        cpu.regs.p = Status(p | crate::flags::U);
        cpu
    }

    #[test]
    fn adc_signed_overflow() {
        let mut cpu = cpu_with(0x50, 0);
        cpu.do_adc(0x50);
        assert_eq!(cpu.regs.a, 0xA0);
        assert!(!cpu.regs.p.is_set(C));
        assert!(cpu.regs.p.is_set(V));
        assert!(cpu.regs.p.is_set(N));
    }

    #[test]
    fn adc_carry_out_and_zero() {
        let mut cpu = cpu_with(0xFF, C);
        cpu.do_adc(0x00);
        assert_eq!(cpu.regs.a, 0x00);
        assert!(cpu.regs.p.is_set(C));
        assert!(cpu.regs.p.is_set(Z));
        assert!(!cpu.regs.p.is_set(V));
    }

    #[test]
    fn sbc_borrow() {
        let mut cpu = cpu_with(0x00, C);
        cpu.do_sbc(0x01);
        assert_eq!(cpu.regs.a, 0xFF);
        assert!(!cpu.regs.p.is_set(C), "borrow clears carry");
        assert!(cpu.regs.p.is_set(N));
    }

    #[test]
    fn adc_decimal() {
        let mut cpu = cpu_with(0x19, D);
        cpu.do_adc(0x01);
        assert_eq!(cpu.regs.a, 0x20);
        assert!(!cpu.regs.p.is_set(C));

        let mut cpu = cpu_with(0x99, D);
        cpu.do_adc(0x01);
        assert_eq!(cpu.regs.a, 0x00);
        assert!(cpu.regs.p.is_set(C));
        assert!(!cpu.regs.p.is_set(Z), "Z follows the binary sum $9A");
    }

    #[test]
    fn sbc_decimal() {
        let mut cpu = cpu_with(0x20, D | C);
        cpu.do_sbc(0x01);
        assert_eq!(cpu.regs.a, 0x19);
        assert!(cpu.regs.p.is_set(C));

        let mut cpu = cpu_with(0x00, D | C);
        cpu.do_sbc(0x01);
        assert_eq!(cpu.regs.a, 0x99);
        assert!(!cpu.regs.p.is_set(C));
    }

    #[test]
    fn ricoh_ignores_decimal_flag() {
        let mut cpu = Mos6502::with_variant(Variant::Ricoh2A03);
        cpu.regs.a = 0x19;
        cpu.regs.p.set(D);
        cpu.do_adc(0x01);
        assert_eq!(cpu.regs.a, 0x1A);
    }

    #[test]
    fn rotates_feed_existing_carry() {
        let mut cpu = cpu_with(0, C);
        assert_eq!(cpu.do_rol(0x80), 0x01);
        assert!(cpu.regs.p.is_set(C));
        assert_eq!(cpu.do_ror(0x00), 0x80);
        assert!(!cpu.regs.p.is_set(C));
        assert!(cpu.regs.p.is_set(N));
    }

    #[test]
    fn compare_sets_flags_without_storing() {
        let mut cpu = cpu_with(0x40, 0);
        cpu.do_compare(0x40, 0x40);
        assert!(cpu.regs.p.is_set(C) && cpu.regs.p.is_set(Z));
        cpu.do_compare(0x40, 0x41);
        assert!(!cpu.regs.p.is_set(C) && cpu.regs.p.is_set(N));
        assert_eq!(cpu.regs.a, 0x40);
    }
}
