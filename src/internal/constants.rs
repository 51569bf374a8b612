//! Centralized Constants
//!
//! This module provides a single source of truth for the magic numbers used
//! throughout the W5500 driver.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Socket geometry**: socket count and per-socket buffer sizes
//! - **Control byte**: block-select and read/write bits of the SPI frame
//! - **Identification**: expected chip version
//! - **Timing**: reset polling
//! - **Default configurations**: default MAC and retry settings
//!
//! # Note
//!
//! Register offsets live in the register table (`internal/register.rs`),
//! next to their width and bank.

// =============================================================================
// Socket Geometry
// =============================================================================

/// Number of hardware sockets on the chip
pub const SOCKETS: usize = 8;

/// Per-socket transmit buffer size in bytes
///
/// Must match the value programmed into `Sn_TXBUF_SIZE` during bring-up.
pub const SSIZE: u16 = 2048;

/// Per-socket receive buffer size in bytes
///
/// Must match the value programmed into `Sn_RXBUF_SIZE` during bring-up.
pub const RSIZE: u16 = 2048;

/// Value written to `Sn_TXBUF_SIZE` / `Sn_RXBUF_SIZE` (KiB)
pub const BUFFER_SIZE_KIB: u8 = (SSIZE / 1024) as u8;

/// Base address of every socket buffer inside its own block
///
/// Each socket's TX and RX buffers are separate blocks selected by the
/// control byte, so the in-block base is zero for all of them.
pub const BUFFER_BASE: u16 = 0x0000;

// =============================================================================
// Control Byte
// =============================================================================

/// Shift of the socket number inside the control byte (bits 7:5)
pub const CONTROL_SOCKET_SHIFT: u8 = 5;

/// Bank select: socket register block (bits 4:3 = 01)
pub const BANK_REGISTERS: u8 = 0x08;

/// Bank select: socket TX buffer block (bits 4:3 = 10)
pub const BANK_TX_BUFFER: u8 = 0x10;

/// Bank select: socket RX buffer block (bits 4:3 = 11)
pub const BANK_RX_BUFFER: u8 = 0x18;

/// Read/write bit (bit 2); set for writes
pub const CONTROL_WRITE: u8 = 0x04;

/// Control byte for reading the common register block
pub const COMMON_READ: u8 = 0x00;

/// Control byte for writing the common register block
pub const COMMON_WRITE: u8 = CONTROL_WRITE;

/// Length of the address + control header of every SPI frame
pub const FRAME_HEADER_LEN: usize = 3;

// =============================================================================
// Identification
// =============================================================================

/// Value of `VERSIONR` on a W5500
pub const CHIP_VERSION: u8 = 0x04;

// =============================================================================
// Mode Register Bits
// =============================================================================

/// Software reset bit in `MR` (self-clearing)
pub const MR_RESET: u8 = 1 << 7;

/// Link status bit in `PHYCFGR`
pub const PHYCFGR_LINK: u8 = 1 << 0;

// =============================================================================
// Timing Constants
// =============================================================================

/// Default software reset timeout in milliseconds
pub const RESET_TIMEOUT_MS: u32 = 100;

/// Reset poll interval in microseconds
pub const RESET_POLL_INTERVAL_US: u32 = 100;

// =============================================================================
// Default Configuration
// =============================================================================

/// Default MAC address (locally administered, unicast)
pub const DEFAULT_MAC_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0x57, 0x55, 0x00];

/// MAC address length
pub const MAC_ADDR_LEN: usize = 6;

/// Default retransmission time in 100 µs units (chip reset value, 200 ms)
pub const DEFAULT_RETRY_TIME: u16 = 2000;

/// Default retransmission count (chip reset value)
pub const DEFAULT_RETRY_COUNT: u8 = 8;
