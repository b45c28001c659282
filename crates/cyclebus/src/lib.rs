//! Core traits and the memory-mapped bus for cycle-counted emulation.
//!
//! A CPU never touches a device directly. Every access goes through a
//! [`Bus`], and the [`Interconnect`] routes each address to the first
//! registered [`Device`] whose range contains it.

mod bus;
mod cpu;
mod device;
mod interconnect;
mod observable;
mod simple;
mod tickable;
mod ticks;

pub use bus::Bus;
pub use cpu::Cpu;
pub use device::{Device, Ram, Rom};
pub use interconnect::{BusError, Interconnect};
pub use observable::{Observable, Value};
pub use simple::SimpleBus;
pub use tickable::Tickable;
pub use ticks::Ticks;
