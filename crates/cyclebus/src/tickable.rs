//! Trait for components that are advanced one clock cycle at a time.

use crate::Ticks;

/// A component driven by clock ticks.
///
/// Owning components (a machine that holds its CPU and bus) implement
/// this. Bare CPUs implement [`Cpu`](crate::Cpu) instead because they
/// need the bus passed in.
pub trait Tickable {
    /// Advance by exactly one clock cycle.
    fn tick(&mut self);

    /// Advance by `count` cycles.
    ///
    /// Must be indistinguishable from calling `tick()` `count` times.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}
