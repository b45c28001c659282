//! CPU core trait.

use crate::Bus;

/// A CPU core.
///
/// CPUs take the bus by reference on every call instead of owning it, so
/// the same bus can be shared with other components between ticks. The
/// reset and interrupt entry points need the bus too: they read vectors
/// and push to the stack.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Advance the CPU by one clock cycle.
    fn tick<B: Bus>(&mut self, bus: &mut B);

    /// Reset the CPU and load the program counter from the reset vector.
    fn reset<B: Bus>(&mut self, bus: &mut B);

    /// Request a maskable interrupt. Returns true if it was serviced.
    fn interrupt<B: Bus>(&mut self, bus: &mut B) -> bool;

    /// Request a non-maskable interrupt.
    fn nmi<B: Bus>(&mut self, bus: &mut B);

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true when the next tick will start a new instruction.
    fn is_instruction_complete(&self) -> bool;
}
