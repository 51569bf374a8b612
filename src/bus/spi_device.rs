//! [`Bus`] over an `embedded_hal::spi::SpiDevice`

use embedded_hal::spi::{Operation, SpiDevice};

use super::{Bus, frame_header};
use crate::driver::error::{BusError, BusResult};

/// Bus transport for an `SpiDevice`
///
/// Each transaction is a single `SpiDevice::transaction`, which asserts
/// chip-select before the header and releases it after the data phase on
/// every exit path, including errors.
#[derive(Debug)]
pub struct SpiDeviceBus<D> {
    device: D,
}

impl<D: SpiDevice> SpiDeviceBus<D> {
    /// Wrap an SPI device
    pub const fn new(device: D) -> Self {
        Self { device }
    }

    /// Return the wrapped device
    pub fn into_inner(self) -> D {
        self.device
    }
}

impl<D: SpiDevice> Bus for SpiDeviceBus<D> {
    fn read(&mut self, address: u16, control: u8, buf: &mut [u8]) -> BusResult<usize> {
        let header = frame_header(address, control);
        let len = buf.len();
        self.device
            .transaction(&mut [Operation::Write(&header), Operation::Read(buf)])
            .map_err(BusError::spi)?;
        Ok(len)
    }

    fn write(&mut self, address: u16, control: u8, data: &[u8]) -> BusResult<usize> {
        let header = frame_header(address, control);
        self.device
            .transaction(&mut [Operation::Write(&header), Operation::Write(data)])
            .map_err(BusError::spi)?;
        Ok(data.len())
    }
}
