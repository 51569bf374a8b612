//! ISR-safe W5500 wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::driver::w5500::W5500;

/// Statically allocatable slot holding one [`W5500`]
///
/// The slot starts empty; [`init`](Self::init) installs a driver once its
/// bus is available. All access goes through `critical_section::with()`,
/// disabling interrupts for the duration of the closure.
///
/// # Example
///
/// ```ignore
/// static ETH: SharedW5500<SpiDeviceBus<MySpi>> = SharedW5500::new();
///
/// ETH.init(W5500::new(SpiDeviceBus::new(spi)));
/// ETH.with(|w5500| w5500.send(socket, b"hello"));
/// ```
pub struct SharedW5500<B> {
    inner: CriticalSectionCell<Option<W5500<B>>>,
}

impl<B> SharedW5500<B> {
    /// Create an empty slot (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }

    /// Install `driver`, returning the one it replaces
    pub fn init(&self, driver: W5500<B>) -> Option<W5500<B>> {
        self.inner.with(|slot| slot.replace(driver))
    }

    /// Remove the installed driver
    pub fn take(&self) -> Option<W5500<B>> {
        self.inner.with(Option::take)
    }

    /// Whether a driver is installed
    pub fn is_initialized(&self) -> bool {
        self.inner.with(|slot| slot.is_some())
    }

    /// Execute a closure with exclusive access to the driver.
    ///
    /// Returns `None` if no driver is installed.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut W5500<B>) -> R,
    {
        self.inner.with(|slot| slot.as_mut().map(f))
    }

    /// Like [`with`](Self::with), but also returns `None` instead of
    /// panicking when the driver is already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut W5500<B>) -> R,
    {
        self.inner.try_with(|slot| slot.as_mut().map(f)).flatten()
    }
}

impl<B> Default for SharedW5500<B> {
    fn default() -> Self {
        Self::new()
    }
}
