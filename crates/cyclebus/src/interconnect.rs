//! Address-range bus interconnect.
//!
//! Routes each access to the first registered device whose inclusive
//! address range contains it, passing the offset from the start of that
//! range. Registration order is dispatch order. An address no device
//! claims reads as `0x00` and swallows writes.

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::{Bus, Device, Ram};

/// Value returned for reads that no device answers.
const UNMAPPED_READ: u8 = 0x00;

/// Rejected device registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// The range ends before it starts.
    #[error("device range ${start:04X}-${end:04X} ends before it starts")]
    InvertedRange { start: u16, end: u16 },

    /// The range overlaps a device that is already mapped.
    #[error(
        "device range ${start:04X}-${end:04X} overlaps existing device at ${existing_start:04X}-${existing_end:04X}"
    )]
    Overlap {
        start: u16,
        end: u16,
        existing_start: u16,
        existing_end: u16,
    },
}

struct Mapping {
    range: RangeInclusive<u16>,
    device: Box<dyn Device>,
}

/// The bus interconnect.
///
/// # Examples
///
/// ```
/// use cyclebus::{Bus, Interconnect, Ram, Rom};
///
/// let mut bus = Interconnect::new();
/// bus.map(0x0000, 0x7FFF, Box::new(Ram::new(0x8000)));
/// bus.map(0x8000, 0xFFFF, Box::new(Rom::new(vec![0xEA; 0x8000])));
///
/// bus.write(0x0200, 0x42);
/// assert_eq!(bus.read(0x0200), 0x42);
/// assert_eq!(bus.read(0x9000), 0xEA);
/// ```
#[derive(Default)]
pub struct Interconnect {
    mappings: Vec<Mapping>,
}

impl Interconnect {
    /// Create an interconnect with nothing mapped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The minimal machine: 64 KiB of RAM covering the whole address space.
    #[must_use]
    pub fn flat_ram() -> Self {
        let mut bus = Self::new();
        bus.map(0x0000, 0xFFFF, Box::new(Ram::new(0x10000)));
        bus
    }

    /// Register `device` for `start..=end` without checking for overlap.
    ///
    /// Earlier registrations win where ranges overlap.
    pub fn map(&mut self, start: u16, end: u16, device: Box<dyn Device>) {
        log::debug!("mapped device at ${start:04X}-${end:04X}");
        self.mappings.push(Mapping {
            range: start..=end,
            device,
        });
    }

    /// Register `device` for `start..=end`, rejecting inverted ranges and
    /// ranges that overlap an existing registration.
    pub fn try_map(
        &mut self,
        start: u16,
        end: u16,
        device: Box<dyn Device>,
    ) -> Result<(), BusError> {
        if start > end {
            let err = BusError::InvertedRange { start, end };
            log::warn!("{err}");
            return Err(err);
        }

        if let Some(existing) = self
            .mappings
            .iter()
            .find(|m| start <= *m.range.end() && *m.range.start() <= end)
        {
            let err = BusError::Overlap {
                start,
                end,
                existing_start: *existing.range.start(),
                existing_end: *existing.range.end(),
            };
            log::warn!("{err}");
            return Err(err);
        }

        self.map(start, end, device);
        Ok(())
    }

    /// Number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.mappings.len()
    }

    /// Registered ranges in dispatch order.
    pub fn ranges(&self) -> impl Iterator<Item = RangeInclusive<u16>> + '_ {
        self.mappings.iter().map(|m| m.range.clone())
    }

    /// The device claiming `address` and the offset into its window.
    fn device_at(&mut self, address: u16) -> Option<(&mut Box<dyn Device>, u16)> {
        self.mappings
            .iter_mut()
            .find(|m| m.range.contains(&address))
            .map(|m| (&mut m.device, address - *m.range.start()))
    }
}

impl Bus for Interconnect {
    fn read(&mut self, address: u16) -> u8 {
        match self.device_at(address) {
            Some((device, offset)) => device.read(offset),
            None => {
                log::trace!("unmapped read at ${address:04X}");
                UNMAPPED_READ
            }
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        match self.device_at(address) {
            Some((device, offset)) => device.write(offset, value),
            None => log::trace!("unmapped write ${value:02X} at ${address:04X}"),
        }
    }

    fn peek(&mut self, address: u16) -> u8 {
        self.device_at(address)
            .map_or(UNMAPPED_READ, |(device, offset)| device.peek(offset))
    }
}
