//! Core driver components for the W5500.
//!
//! - [`config`] - Chip and network configuration with builder methods
//! - [`error`] - Error types and result aliases
//! - [`w5500`] - The driver: register access, ring transfers, commands
//! - [`packet`] - Multi-call packet assembly in a socket's TX ring
//!
//! # Example
//!
//! ```ignore
//! use wiznet_w5500::driver::{W5500, W5500Config};
//!
//! let config = W5500Config::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01])
//!     .with_ip_address([192, 168, 0, 10]);
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod packet;
pub mod w5500;

// Re-exports for convenience
pub use config::{NetworkConfig, W5500Config};
pub use error::{BusError, BusResult, ConfigError, ConfigResult, Error, IoError, Result};
pub use packet::PacketWriter;
pub use w5500::{RX_RING, TX_RING, W5500};
