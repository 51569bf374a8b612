//! Bus transaction primitive
//!
//! Every chip access is one SPI frame: two address bytes (big-endian), one
//! control byte, then the data phase. The [`Bus`] trait performs exactly
//! one such frame with the chip selected for its whole duration, so no two
//! transactions can interleave their byte streams.
//!
//! # Implementations
//!
//! - [`SpiDeviceBus`]: wraps an `embedded_hal::spi::SpiDevice`; the device
//!   owns chip-select (use this with shared-bus managers from your HAL)
//! - [`ChipSelectBus`]: drives a raw `SpiBus` plus a GPIO chip-select pin
//!
//! # Limitations
//!
//! Neither transport can tell that the chip is absent or hung: reads from
//! a missing chip come back as whatever the MISO line floats to. Only
//! errors raised by the HAL itself are reported.

pub mod chip_select;
pub mod spi_device;

pub use chip_select::{ChipSelectBus, ChipSelectGuard};
pub use spi_device::SpiDeviceBus;

use crate::driver::error::BusResult;
use crate::internal::constants::FRAME_HEADER_LEN;

/// Build the address + control header of an SPI frame
#[inline(always)]
#[must_use]
pub const fn frame_header(address: u16, control: u8) -> [u8; FRAME_HEADER_LEN] {
    let [hi, lo] = address.to_be_bytes();
    [hi, lo, control]
}

/// One exclusive read or write transaction against the chip
pub trait Bus {
    /// Read `buf.len()` bytes starting at `address` in the block selected by
    /// `control`, returning the number of bytes read
    fn read(&mut self, address: u16, control: u8, buf: &mut [u8]) -> BusResult<usize>;

    /// Write `data` starting at `address` in the block selected by
    /// `control`, returning the number of bytes written
    fn write(&mut self, address: u16, control: u8, data: &[u8]) -> BusResult<usize>;

    /// Read a single byte
    fn read_u8(&mut self, address: u16, control: u8) -> BusResult<u8> {
        let mut buf = [0u8; 1];
        self.read(address, control, &mut buf)?;
        Ok(buf[0])
    }

    /// Write a single byte
    fn write_u8(&mut self, address: u16, control: u8, value: u8) -> BusResult<()> {
        self.write(address, control, &[value])?;
        Ok(())
    }
}

impl<B: Bus + ?Sized> Bus for &mut B {
    #[inline]
    fn read(&mut self, address: u16, control: u8, buf: &mut [u8]) -> BusResult<usize> {
        (**self).read(address, control, buf)
    }

    #[inline]
    fn write(&mut self, address: u16, control: u8, data: &[u8]) -> BusResult<usize> {
        (**self).write(address, control, data)
    }
}
