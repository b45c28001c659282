//! Instruction descriptor table.
//!
//! One entry per opcode byte: mnemonic, operation, addressing mode, base
//! cycle cost, and whether the operation pays the page-crossing penalty.
//! The table is a `static`, so every CPU instance shares one copy.
//!
//! Undocumented opcodes fall in two groups. The NOP variants consume the
//! operand bytes of their hardware addressing mode and take its cycles.
//! Everything else is a trap: a one-byte no-op with the historical cycle
//! cost. `$EB` is the exception to both, it executes as `SBC #imm`.

use crate::Mode;

/// The operation half of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Unassigned opcode: does nothing.
    Trap,
}

impl Operation {
    /// Read-type operations take an extra cycle when an indexed address
    /// crosses a page. Stores and read-modify-write always pay it up front.
    #[must_use]
    pub const fn pays_page_penalty(self) -> bool {
        matches!(
            self,
            Self::Adc
                | Self::And
                | Self::Cmp
                | Self::Eor
                | Self::Lda
                | Self::Ldx
                | Self::Ldy
                | Self::Ora
                | Self::Sbc
        )
    }
}

/// One row of the descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Assembler mnemonic, `???` for undocumented opcodes.
    pub mnemonic: &'static str,
    pub operation: Operation,
    pub mode: Mode,
    /// Base cycle cost before page-crossing and branch penalties.
    pub cycles: u8,
    /// Add a cycle when the addressing mode crosses a page.
    pub page_penalty: bool,
}

impl Instruction {
    /// Total length in bytes including the opcode.
    #[must_use]
    pub const fn len(&self) -> u16 {
        1 + self.mode.operand_len()
    }

    /// Never true: every instruction has at least its opcode byte.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// True for opcodes outside the documented instruction set.
    #[must_use]
    pub const fn is_undocumented(&self) -> bool {
        self.mnemonic.as_bytes()[0] == b'?'
    }
}

/// Look up the descriptor for an opcode byte.
#[must_use]
pub fn lookup(opcode: u8) -> &'static Instruction {
    &LOOKUP[usize::from(opcode)]
}

const fn op(mnemonic: &'static str, operation: Operation, mode: Mode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        operation,
        mode,
        cycles,
        page_penalty: operation.pays_page_penalty(),
    }
}

const fn nop(mode: Mode, cycles: u8) -> Instruction {
    op("???", Operation::Nop, mode, cycles)
}

/// The absolute,X NOPs are the only NOPs that read, so they pay the penalty.
const fn nop_abx(cycles: u8) -> Instruction {
    Instruction {
        page_penalty: true,
        ..nop(ABX, cycles)
    }
}

const fn trap(cycles: u8) -> Instruction {
    op("???", Operation::Trap, IMP, cycles)
}

const IMP: Mode = Mode::Implied;
const IMM: Mode = Mode::Immediate;
const ZP0: Mode = Mode::ZeroPage;
const ZPX: Mode = Mode::ZeroPageX;
const ZPY: Mode = Mode::ZeroPageY;
const REL: Mode = Mode::Relative;
const ABS: Mode = Mode::Absolute;
const ABX: Mode = Mode::AbsoluteX;
const ABY: Mode = Mode::AbsoluteY;
const IND: Mode = Mode::Indirect;
const IZX: Mode = Mode::IndexedIndirect;
const IZY: Mode = Mode::IndirectIndexed;

#[allow(clippy::enum_glob_use)]
use Operation::*;

#[rustfmt::skip]
static LOOKUP: [Instruction; 256] = [
    // $00
    op("BRK", Brk, IMM, 7),
    op("ORA", Ora, IZX, 6),
    trap(2),
    trap(8),
    nop(ZP0, 3),
    op("ORA", Ora, ZP0, 3),
    op("ASL", Asl, ZP0, 5),
    trap(5),
    op("PHP", Php, IMP, 3),
    op("ORA", Ora, IMM, 2),
    op("ASL", Asl, IMP, 2),
    trap(2),
    nop(ABS, 4),
    op("ORA", Ora, ABS, 4),
    op("ASL", Asl, ABS, 6),
    trap(6),
    // $10
    op("BPL", Bpl, REL, 2),
    op("ORA", Ora, IZY, 5),
    trap(2),
    trap(8),
    nop(ZPX, 4),
    op("ORA", Ora, ZPX, 4),
    op("ASL", Asl, ZPX, 6),
    trap(6),
    op("CLC", Clc, IMP, 2),
    op("ORA", Ora, ABY, 4),
    nop(IMP, 2),
    trap(7),
    nop_abx(4),
    op("ORA", Ora, ABX, 4),
    op("ASL", Asl, ABX, 7),
    trap(7),
    // $20
    op("JSR", Jsr, ABS, 6),
    op("AND", And, IZX, 6),
    trap(2),
    trap(8),
    op("BIT", Bit, ZP0, 3),
    op("AND", And, ZP0, 3),
    op("ROL", Rol, ZP0, 5),
    trap(5),
    op("PLP", Plp, IMP, 4),
    op("AND", And, IMM, 2),
    op("ROL", Rol, IMP, 2),
    trap(2),
    op("BIT", Bit, ABS, 4),
    op("AND", And, ABS, 4),
    op("ROL", Rol, ABS, 6),
    trap(6),
    // $30
    op("BMI", Bmi, REL, 2),
    op("AND", And, IZY, 5),
    trap(2),
    trap(8),
    nop(ZPX, 4),
    op("AND", And, ZPX, 4),
    op("ROL", Rol, ZPX, 6),
    trap(6),
    op("SEC", Sec, IMP, 2),
    op("AND", And, ABY, 4),
    nop(IMP, 2),
    trap(7),
    nop_abx(4),
    op("AND", And, ABX, 4),
    op("ROL", Rol, ABX, 7),
    trap(7),
    // $40
    op("RTI", Rti, IMP, 6),
    op("EOR", Eor, IZX, 6),
    trap(2),
    trap(8),
    nop(ZP0, 3),
    op("EOR", Eor, ZP0, 3),
    op("LSR", Lsr, ZP0, 5),
    trap(5),
    op("PHA", Pha, IMP, 3),
    op("EOR", Eor, IMM, 2),
    op("LSR", Lsr, IMP, 2),
    trap(2),
    op("JMP", Jmp, ABS, 3),
    op("EOR", Eor, ABS, 4),
    op("LSR", Lsr, ABS, 6),
    trap(6),
    // $50
    op("BVC", Bvc, REL, 2),
    op("EOR", Eor, IZY, 5),
    trap(2),
    trap(8),
    nop(ZPX, 4),
    op("EOR", Eor, ZPX, 4),
    op("LSR", Lsr, ZPX, 6),
    trap(6),
    op("CLI", Cli, IMP, 2),
    op("EOR", Eor, ABY, 4),
    nop(IMP, 2),
    trap(7),
    nop_abx(4),
    op("EOR", Eor, ABX, 4),
    op("LSR", Lsr, ABX, 7),
    trap(7),
    // $60
    op("RTS", Rts, IMP, 6),
    op("ADC", Adc, IZX, 6),
    trap(2),
    trap(8),
    nop(ZP0, 3),
    op("ADC", Adc, ZP0, 3),
    op("ROR", Ror, ZP0, 5),
    trap(5),
    op("PLA", Pla, IMP, 4),
    op("ADC", Adc, IMM, 2),
    op("ROR", Ror, IMP, 2),
    trap(2),
    op("JMP", Jmp, IND, 5),
    op("ADC", Adc, ABS, 4),
    op("ROR", Ror, ABS, 6),
    trap(6),
    // $70
    op("BVS", Bvs, REL, 2),
    op("ADC", Adc, IZY, 5),
    trap(2),
    trap(8),
    nop(ZPX, 4),
    op("ADC", Adc, ZPX, 4),
    op("ROR", Ror, ZPX, 6),
    trap(6),
    op("SEI", Sei, IMP, 2),
    op("ADC", Adc, ABY, 4),
    nop(IMP, 2),
    trap(7),
    nop_abx(4),
    op("ADC", Adc, ABX, 4),
    op("ROR", Ror, ABX, 7),
    trap(7),
    // $80
    nop(IMM, 2),
    op("STA", Sta, IZX, 6),
    nop(IMM, 2),
    trap(6),
    op("STY", Sty, ZP0, 3),
    op("STA", Sta, ZP0, 3),
    op("STX", Stx, ZP0, 3),
    trap(3),
    op("DEY", Dey, IMP, 2),
    nop(IMM, 2),
    op("TXA", Txa, IMP, 2),
    trap(2),
    op("STY", Sty, ABS, 4),
    op("STA", Sta, ABS, 4),
    op("STX", Stx, ABS, 4),
    trap(4),
    // $90
    op("BCC", Bcc, REL, 2),
    op("STA", Sta, IZY, 6),
    trap(2),
    trap(6),
    op("STY", Sty, ZPX, 4),
    op("STA", Sta, ZPX, 4),
    op("STX", Stx, ZPY, 4),
    trap(4),
    op("TYA", Tya, IMP, 2),
    op("STA", Sta, ABY, 5),
    op("TXS", Txs, IMP, 2),
    trap(5),
    nop(ABX, 5),
    op("STA", Sta, ABX, 5),
    trap(5),
    trap(5),
    // $A0
    op("LDY", Ldy, IMM, 2),
    op("LDA", Lda, IZX, 6),
    op("LDX", Ldx, IMM, 2),
    trap(6),
    op("LDY", Ldy, ZP0, 3),
    op("LDA", Lda, ZP0, 3),
    op("LDX", Ldx, ZP0, 3),
    trap(3),
    op("TAY", Tay, IMP, 2),
    op("LDA", Lda, IMM, 2),
    op("TAX", Tax, IMP, 2),
    trap(2),
    op("LDY", Ldy, ABS, 4),
    op("LDA", Lda, ABS, 4),
    op("LDX", Ldx, ABS, 4),
    trap(4),
    // $B0
    op("BCS", Bcs, REL, 2),
    op("LDA", Lda, IZY, 5),
    trap(2),
    trap(5),
    op("LDY", Ldy, ZPX, 4),
    op("LDA", Lda, ZPX, 4),
    op("LDX", Ldx, ZPY, 4),
    trap(4),
    op("CLV", Clv, IMP, 2),
    op("LDA", Lda, ABY, 4),
    op("TSX", Tsx, IMP, 2),
    trap(4),
    op("LDY", Ldy, ABX, 4),
    op("LDA", Lda, ABX, 4),
    op("LDX", Ldx, ABY, 4),
    trap(4),
    // $C0
    op("CPY", Cpy, IMM, 2),
    op("CMP", Cmp, IZX, 6),
    nop(IMM, 2),
    trap(8),
    op("CPY", Cpy, ZP0, 3),
    op("CMP", Cmp, ZP0, 3),
    op("DEC", Dec, ZP0, 5),
    trap(5),
    op("INY", Iny, IMP, 2),
    op("CMP", Cmp, IMM, 2),
    op("DEX", Dex, IMP, 2),
    trap(2),
    op("CPY", Cpy, ABS, 4),
    op("CMP", Cmp, ABS, 4),
    op("DEC", Dec, ABS, 6),
    trap(6),
    // $D0
    op("BNE", Bne, REL, 2),
    op("CMP", Cmp, IZY, 5),
    trap(2),
    trap(8),
    nop(ZPX, 4),
    op("CMP", Cmp, ZPX, 4),
    op("DEC", Dec, ZPX, 6),
    trap(6),
    op("CLD", Cld, IMP, 2),
    op("CMP", Cmp, ABY, 4),
    nop(IMP, 2),
    trap(7),
    nop_abx(4),
    op("CMP", Cmp, ABX, 4),
    op("DEC", Dec, ABX, 7),
    trap(7),
    // $E0
    op("CPX", Cpx, IMM, 2),
    op("SBC", Sbc, IZX, 6),
    nop(IMM, 2),
    trap(8),
    op("CPX", Cpx, ZP0, 3),
    op("SBC", Sbc, ZP0, 3),
    op("INC", Inc, ZP0, 5),
    trap(5),
    op("INX", Inx, IMP, 2),
    op("SBC", Sbc, IMM, 2),
    op("NOP", Nop, IMP, 2),
    op("???", Sbc, IMM, 2),
    op("CPX", Cpx, ABS, 4),
    op("SBC", Sbc, ABS, 4),
    op("INC", Inc, ABS, 6),
    trap(6),
    // $F0
    op("BEQ", Beq, REL, 2),
    op("SBC", Sbc, IZY, 5),
    trap(2),
    trap(8),
    nop(ZPX, 4),
    op("SBC", Sbc, ZPX, 4),
    op("INC", Inc, ZPX, 6),
    trap(6),
    op("SED", Sed, IMP, 2),
    op("SBC", Sbc, ABY, 4),
    nop(IMP, 2),
    trap(7),
    nop_abx(4),
    op("SBC", Sbc, ABX, 4),
    op("INC", Inc, ABX, 7),
    trap(7),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn documents_fifty_six_mnemonics() {
        let mnemonics: BTreeSet<_> = LOOKUP
            .iter()
            .filter(|i| !i.is_undocumented())
            .map(|i| i.mnemonic)
            .collect();
        assert_eq!(mnemonics.len(), 56);
        assert_eq!(LOOKUP.iter().filter(|i| !i.is_undocumented()).count(), 151);
    }

    #[test]
    fn base_cycles_in_range() {
        for (opcode, ins) in LOOKUP.iter().enumerate() {
            assert!(
                (2..=8).contains(&ins.cycles),
                "${opcode:02X} has {} cycles",
                ins.cycles
            );
        }
    }

    #[test]
    fn mnemonic_matches_operation() {
        for (opcode, ins) in LOOKUP.iter().enumerate() {
            if ins.is_undocumented() {
                continue;
            }
            let name = format!("{:?}", ins.operation).to_uppercase();
            assert_eq!(name, ins.mnemonic, "${opcode:02X}");
        }
    }

    #[test]
    fn eb_is_sbc_immediate() {
        let ins = lookup(0xEB);
        assert_eq!(ins.mnemonic, "???");
        assert_eq!(ins.operation, Operation::Sbc);
        assert_eq!(ins.mode, Mode::Immediate);
        assert_eq!(ins.cycles, 2);
    }

    #[test]
    fn only_six_nops_pay_page_penalty() {
        let penalised: Vec<u8> = (0..=0xFF)
            .filter(|&op| {
                let ins = lookup(op);
                ins.operation == Operation::Nop && ins.page_penalty
            })
            .collect();
        assert_eq!(penalised, vec![0x1C, 0x3C, 0x5C, 0x7C, 0xDC, 0xFC]);
    }

    #[test]
    fn read_operations_pay_penalty_and_stores_do_not() {
        assert!(lookup(0xBD).page_penalty, "LDA abs,X");
        assert!(lookup(0x71).page_penalty, "ADC (zp),Y");
        assert!(lookup(0xBE).page_penalty, "LDX abs,Y");
        assert!(!lookup(0x9D).page_penalty, "STA abs,X");
        assert!(!lookup(0x1E).page_penalty, "ASL abs,X");
    }

    #[test]
    fn traps_are_single_byte() {
        for opcode in [0x02, 0x03, 0x07, 0x0B, 0x9E, 0xFF] {
            let ins = lookup(opcode);
            assert_eq!(ins.operation, Operation::Trap, "${opcode:02X}");
            assert_eq!(ins.len(), 1);
        }
    }

    #[test]
    fn instruction_lengths() {
        assert_eq!(lookup(0xA9).len(), 2);
        assert_eq!(lookup(0x6C).len(), 3);
        assert_eq!(lookup(0x0C).len(), 3, "NOP abs");
        assert_eq!(lookup(0x80).len(), 2, "NOP #imm");
        assert_eq!(lookup(0xEA).len(), 1);
    }
}
