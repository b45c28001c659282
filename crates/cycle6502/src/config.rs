//! Processor variant selection.

/// Which 6502 part to emulate.
///
/// The parts share the instruction table and timing; they differ only in
/// whether the Decimal flag changes ADC/SBC.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// MOS NMOS 6502 with binary-coded decimal arithmetic.
    #[default]
    Nmos6502,
    /// Ricoh 2A03/2A07: BCD circuitry removed, D is stored but ignored.
    Ricoh2A03,
}

impl Variant {
    /// True if ADC/SBC honour the Decimal flag.
    #[must_use]
    pub const fn has_decimal_mode(self) -> bool {
        match self {
            Self::Nmos6502 => true,
            Self::Ricoh2A03 => false,
        }
    }

    /// Part name, for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nmos6502 => "6502",
            Self::Ricoh2A03 => "2A03",
        }
    }
}
