//! Error types for the W5500 driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Bring-up and configuration failures
//! - [`BusError`]: Failures reported by the SPI or chip-select HAL
//! - [`IoError`]: Runtime TX/RX failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.
//!
//! The chip itself never reports a transport failure: an absent or hung
//! chip reads back as zeros or stalls a command poll. Only the HAL
//! implementation underneath can surface a [`BusError`].

use embedded_hal::{digital, spi};

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and bring-up errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Socket index outside `0..SOCKETS`
    InvalidSocket,
    /// Invalid configuration parameter
    InvalidConfig,
    /// `VERSIONR` did not identify a W5500
    ChipNotFound,
    /// Software reset did not complete in time
    ResetFailed,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidSocket => "invalid socket index",
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::ChipNotFound => "W5500 not found",
            ConfigError::ResetFailed => "software reset failed",
        }
    }
}

// =============================================================================
// Bus Errors
// =============================================================================

/// Errors reported by the HAL underneath the bus primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// SPI transfer failed
    Spi(spi::ErrorKind),
    /// Chip-select pin could not be driven
    ChipSelect(digital::ErrorKind),
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BusError::Spi(kind) => write!(f, "SPI transfer failed: {kind}"),
            BusError::ChipSelect(kind) => write!(f, "chip-select failed: {kind}"),
        }
    }
}

impl BusError {
    /// Convert any SPI HAL error into a [`BusError`]
    pub fn spi<E: spi::Error>(e: E) -> Self {
        BusError::Spi(e.kind())
    }

    /// Convert any GPIO HAL error into a [`BusError`]
    pub fn chip_select<E: digital::Error>(e: E) -> Self {
        BusError::ChipSelect(e.kind())
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime TX/RX errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Not enough free space in the TX buffer
    InsufficientSpace,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::InsufficientSpace => "insufficient TX buffer space",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::ChipNotFound)) => { /* ... */ }
///     Err(Error::Bus(BusError::Spi(kind))) => { /* ... */ }
///     Err(Error::Io(IoError::InsufficientSpace)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// Bus error
    Bus(BusError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Bus(e) => write!(f, "bus: {e}"),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::Bus(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for bus transactions
pub type BusResult<T> = core::result::Result<T, BusError>;

// =============================================================================
// Unit Tests
// =============================================================================
