//! WIZnet W5500 Driver
//!
//! A `no_std`, `no_alloc` driver for the WIZnet W5500 hardwired TCP/IP
//! Ethernet controller, attached over SPI.
//!
//! The W5500 runs the TCP/IP stack itself. The host talks to it through a
//! 3-byte framed SPI protocol that addresses a common register block, eight
//! socket register blocks and eight pairs of 2 KiB TX/RX ring buffers. This
//! crate implements that register and buffer plumbing; socket state machines
//! and higher protocols belong to the application.
//!
//! # Architecture
//!
//! 1. **Bus Layer** ([`bus`]): the [`Bus`] trait plus transports over
//!    `embedded-hal` SPI ([`SpiDeviceBus`], [`ChipSelectBus`])
//! 2. **Ring Layer** ([`ring`]): logical pointer to physical segment
//!    translation for the socket rings
//! 3. **Driver Layer** ([`driver`]): [`W5500`] register accessors, ring
//!    transfers, socket commands and bring-up
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and driver log output
//! - `critical-section`: Enable the ISR-safe `sync::SharedW5500` wrapper
//!
//! # Example
//!
//! ```ignore
//! use wiznet_w5500::{SocketIndex, SpiDeviceBus, W5500, W5500Config};
//!
//! let mut w5500 = W5500::new(SpiDeviceBus::new(spi_device));
//! let config = W5500Config::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56])
//!     .with_ip_address([192, 168, 1, 20])
//!     .with_subnet_mask([255, 255, 255, 0])
//!     .with_gateway([192, 168, 1, 1]);
//!
//! w5500.init(&config, &mut delay)?;
//!
//! let socket = SocketIndex::new(0).unwrap();
//! let sent = w5500.send(socket, b"hello")?;
//! ```

#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]
// Clippy lint levels mirror the [lints] table in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod bus;
pub mod driver;
pub mod ring;
pub mod socket;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use bus::{Bus, ChipSelectBus, SpiDeviceBus};
pub use driver::config::{NetworkConfig, W5500Config};
pub use driver::error::{BusError, BusResult, ConfigError, ConfigResult, Error, IoError, Result};
pub use driver::packet::PacketWriter;
pub use driver::w5500::W5500;
pub use ring::{RingBuffer, Segment, Segments};
pub use socket::{Access, Bank, Command, Protocol, SocketIndex, Status};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedW5500};

/// Register table for use with the generic accessors on [`W5500`].
///
/// Most users should prefer the named helpers (`set_ip_address`,
/// `tx_free_size`, ...) over raw register access.
pub mod registers {
    pub use crate::internal::register::*;
}

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types.
pub mod constants {
    pub use crate::internal::constants::{
        // Chip identity
        CHIP_VERSION,
        // MAC address
        DEFAULT_MAC_ADDR,
        // Retransmission
        DEFAULT_RETRY_COUNT,
        DEFAULT_RETRY_TIME,
        MAC_ADDR_LEN,
        // Timing
        RESET_POLL_INTERVAL_US,
        RESET_TIMEOUT_MS,
        // Buffers
        RSIZE,
        SOCKETS,
        SSIZE,
    };
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static, ISR-safe W5500 slot.
///
/// Expands to an empty [`SharedW5500`](crate::sync::SharedW5500) static; call
/// `init` on it once the bus is available.
///
/// # Examples
///
/// ```ignore
/// wiznet_w5500::w5500_static!(ETH, SpiDeviceBus<MySpi>);
///
/// ETH.init(W5500::new(SpiDeviceBus::new(spi)));
/// ETH.with(|w5500| w5500.init(&config, &mut delay));
/// ```
#[cfg(feature = "critical-section")]
#[macro_export]
macro_rules! w5500_static {
    ($name:ident, $bus:ty) => {
        static $name: $crate::sync::SharedW5500<$bus> = $crate::sync::SharedW5500::new();
    };
}
