//! W5500 register table
//!
//! Every register is described once by its offset, width and block. The
//! driver reads and writes them through a handful of generic accessors
//! instead of one function per register.

/// Register block a [`Register`] lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Block {
    /// Common register block (control byte `0x00` / `0x04`)
    Common,
    /// Per-socket register block (control byte `(s << 5) | 0x08` / `0x0C`)
    Socket,
}

/// A fixed-address chip register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register {
    /// Offset within its block
    pub offset: u16,
    /// Width in bytes
    pub width: u8,
    /// Block the offset is relative to
    pub block: Block,
}

impl Register {
    const fn common(offset: u16, width: u8) -> Self {
        Self {
            offset,
            width,
            block: Block::Common,
        }
    }

    const fn socket(offset: u16, width: u8) -> Self {
        Self {
            offset,
            width,
            block: Block::Socket,
        }
    }

    /// Whether the register is addressed relative to a socket block
    #[inline(always)]
    pub const fn is_socket(&self) -> bool {
        matches!(self.block, Block::Socket)
    }
}

// =============================================================================
// Common Registers
// =============================================================================

/// Mode
pub const MR: Register = Register::common(0x0000, 1);
/// Gateway IP address
pub const GAR: Register = Register::common(0x0001, 4);
/// Subnet mask
pub const SUBR: Register = Register::common(0x0005, 4);
/// Source MAC address
pub const SHAR: Register = Register::common(0x0009, 6);
/// Source IP address
pub const SIPR: Register = Register::common(0x000F, 4);
/// Interrupt
pub const IR: Register = Register::common(0x0015, 1);
/// Interrupt mask
pub const IMR: Register = Register::common(0x0016, 1);
/// Retransmission time (100 µs units)
pub const RTR: Register = Register::common(0x0019, 2);
/// Retransmission count
pub const RCR: Register = Register::common(0x001B, 1);
/// Unreachable IP address (UDP)
pub const UIPR: Register = Register::common(0x0028, 4);
/// Unreachable port (UDP)
pub const UPORTR: Register = Register::common(0x002C, 2);
/// PHY configuration
pub const PHYCFGR: Register = Register::common(0x002E, 1);
/// Chip version
pub const VERSIONR: Register = Register::common(0x0039, 1);

// =============================================================================
// Socket Registers
// =============================================================================

/// Socket mode
pub const SN_MR: Register = Register::socket(0x0000, 1);
/// Socket command
pub const SN_CR: Register = Register::socket(0x0001, 1);
/// Socket interrupt
pub const SN_IR: Register = Register::socket(0x0002, 1);
/// Socket status
pub const SN_SR: Register = Register::socket(0x0003, 1);
/// Source port
pub const SN_PORT: Register = Register::socket(0x0004, 2);
/// Destination hardware address
pub const SN_DHAR: Register = Register::socket(0x0006, 6);
/// Destination IP address
pub const SN_DIPR: Register = Register::socket(0x000C, 4);
/// Destination port
pub const SN_DPORT: Register = Register::socket(0x0010, 2);
/// Maximum segment size
pub const SN_MSSR: Register = Register::socket(0x0012, 2);
/// Protocol number in IP raw mode
pub const SN_PROTO: Register = Register::socket(0x0014, 1);
/// IP type of service
pub const SN_TOS: Register = Register::socket(0x0015, 1);
/// IP time to live
pub const SN_TTL: Register = Register::socket(0x0016, 1);
/// RX buffer size (KiB)
pub const SN_RXBUF_SIZE: Register = Register::socket(0x001E, 1);
/// TX buffer size (KiB)
pub const SN_TXBUF_SIZE: Register = Register::socket(0x001F, 1);
/// TX free size
pub const SN_TX_FSR: Register = Register::socket(0x0020, 2);
/// TX read pointer
pub const SN_TX_RD: Register = Register::socket(0x0022, 2);
/// TX write pointer
pub const SN_TX_WR: Register = Register::socket(0x0024, 2);
/// RX received size
pub const SN_RX_RSR: Register = Register::socket(0x0026, 2);
/// RX read pointer
pub const SN_RX_RD: Register = Register::socket(0x0028, 2);
/// RX write pointer
pub const SN_RX_WR: Register = Register::socket(0x002A, 2);
