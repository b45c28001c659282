//! Cycle-counted 6502 CPU emulator.
//!
//! The host calls `tick()` once per clock cycle. When the previous
//! instruction's cycle budget has run out, that tick fetches, decodes and
//! executes the next instruction in one go and loads its cycle cost
//! (base cost plus page-crossing and branch penalties) into a countdown.
//! The remaining ticks only count down, so instruction boundaries land on
//! the same cycles as on the real part.

mod addressing;
mod config;
mod cpu;
mod execute;
pub mod flags;
mod instruction;
mod machine;
mod registers;

pub use addressing::Mode;
pub use config::Variant;
pub use cpu::{IRQ_VECTOR, Mos6502, NMI_VECTOR, RESET_VECTOR};
pub use flags::Status;
pub use instruction::{Instruction, Operation, lookup};
pub use machine::Machine;
pub use registers::{Registers, STACK_BASE};
