//! [`Bus`] over a raw `SpiBus` plus a GPIO chip-select line
//!
//! The chip-select pin is active low. It is driven high once at
//! construction and then held low only inside a [`ChipSelectGuard`], which
//! drives it high again when dropped. A transfer that fails half-way
//! therefore still leaves the line released.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::{Bus, frame_header};
use crate::driver::error::{BusError, BusResult};

/// Scoped ownership of the asserted chip-select line
///
/// Created by [`ChipSelectGuard::acquire`]. Call [`release`](Self::release)
/// on the success path to observe pin errors; dropping the guard releases
/// the line and ignores them.
#[derive(Debug)]
pub struct ChipSelectGuard<'a, CS: OutputPin> {
    cs: &'a mut CS,
    released: bool,
}

impl<'a, CS: OutputPin> ChipSelectGuard<'a, CS> {
    /// Assert chip-select (drive low)
    pub fn acquire(cs: &'a mut CS) -> BusResult<Self> {
        cs.set_low().map_err(BusError::chip_select)?;
        Ok(Self {
            cs,
            released: false,
        })
    }

    /// Deassert chip-select (drive high)
    pub fn release(mut self) -> BusResult<()> {
        self.released = true;
        self.cs.set_high().map_err(BusError::chip_select)
    }
}

impl<CS: OutputPin> Drop for ChipSelectGuard<'_, CS> {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.cs.set_high();
        }
    }
}

/// Bus transport owning an SPI bus and its chip-select pin
#[derive(Debug)]
pub struct ChipSelectBus<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI: SpiBus, CS: OutputPin> ChipSelectBus<SPI, CS> {
    /// Take ownership of the bus and pin, driving chip-select inactive
    pub fn new(spi: SPI, mut cs: CS) -> BusResult<Self> {
        cs.set_high().map_err(BusError::chip_select)?;
        Ok(Self { spi, cs })
    }

    /// Return the bus and pin
    pub fn into_inner(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI: SpiBus, CS: OutputPin> Bus for ChipSelectBus<SPI, CS> {
    fn read(&mut self, address: u16, control: u8, buf: &mut [u8]) -> BusResult<usize> {
        let header = frame_header(address, control);
        let guard = ChipSelectGuard::acquire(&mut self.cs)?;
        self.spi.write(&header).map_err(BusError::spi)?;
        self.spi.read(buf).map_err(BusError::spi)?;
        self.spi.flush().map_err(BusError::spi)?;
        guard.release()?;
        Ok(buf.len())
    }

    fn write(&mut self, address: u16, control: u8, data: &[u8]) -> BusResult<usize> {
        let header = frame_header(address, control);
        let guard = ChipSelectGuard::acquire(&mut self.cs)?;
        self.spi.write(&header).map_err(BusError::spi)?;
        self.spi.write(data).map_err(BusError::spi)?;
        self.spi.flush().map_err(BusError::spi)?;
        guard.release()?;
        Ok(data.len())
    }
}
