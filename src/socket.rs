//! Socket vocabulary
//!
//! Types naming one of the chip's eight hardware sockets and the values
//! written to or read from its mode, command and status registers. The
//! driver never tracks socket state itself; [`Status`] is only a decoded
//! view of `Sn_SR`.

use crate::driver::error::ConfigError;
use crate::internal::constants::{
    BANK_REGISTERS, BANK_RX_BUFFER, BANK_TX_BUFFER, CONTROL_SOCKET_SHIFT, CONTROL_WRITE, SOCKETS,
};

// =============================================================================
// Socket Index
// =============================================================================

/// Index of a hardware socket, guaranteed to be in `0..SOCKETS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketIndex(u8);

impl SocketIndex {
    /// Create a socket index, returning `None` when out of range
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < SOCKETS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Iterate over every socket on the chip
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SOCKETS as u8).map(Self)
    }

    /// Raw socket number
    #[inline(always)]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Build the SPI control byte addressing `bank` of this socket
    ///
    /// Layout: bits 7:5 socket, bits 4:3 bank, bit 2 read/write, bits 1:0
    /// operation mode (always variable-length).
    #[inline(always)]
    #[must_use]
    pub const fn control_byte(self, bank: Bank, access: Access) -> u8 {
        let rw = match access {
            Access::Read => 0,
            Access::Write => CONTROL_WRITE,
        };
        (self.0 << CONTROL_SOCKET_SHIFT) | bank.bits() | rw
    }
}

impl TryFrom<u8> for SocketIndex {
    type Error = ConfigError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or(ConfigError::InvalidSocket)
    }
}

impl From<SocketIndex> for u8 {
    fn from(socket: SocketIndex) -> Self {
        socket.0
    }
}

/// Per-socket block selected by the control byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    /// Socket register block
    Registers,
    /// Socket TX buffer
    TxBuffer,
    /// Socket RX buffer
    RxBuffer,
}

impl Bank {
    const fn bits(self) -> u8 {
        match self {
            Bank::Registers => BANK_REGISTERS,
            Bank::TxBuffer => BANK_TX_BUFFER,
            Bank::RxBuffer => BANK_RX_BUFFER,
        }
    }
}

/// Direction of a bus transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Read from the chip
    Read,
    /// Write to the chip
    Write,
}

// =============================================================================
// Command Register
// =============================================================================

/// Socket command written to `Sn_CR`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Initialise the socket according to `Sn_MR`
    Open = 0x01,
    /// Wait for a TCP connection request
    Listen = 0x02,
    /// Connect to the destination in `Sn_DIPR` / `Sn_DPORT`
    Connect = 0x04,
    /// Start a TCP disconnect
    Discon = 0x08,
    /// Close the socket immediately
    Close = 0x10,
    /// Transmit everything up to `Sn_TX_WR`
    Send = 0x20,
    /// UDP send without ARP, using `Sn_DHAR`
    SendMac = 0x21,
    /// TCP keep-alive probe
    SendKeep = 0x22,
    /// Acknowledge data consumed up to `Sn_RX_RD`
    Recv = 0x40,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        cmd as u8
    }
}

// =============================================================================
// Status Register
// =============================================================================

/// Decoded `Sn_SR`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Status {
    /// Socket closed
    Closed = 0x00,
    /// TCP socket opened
    Init = 0x13,
    /// Waiting for a connection request
    Listen = 0x14,
    /// SYN sent
    SynSent = 0x15,
    /// SYN received
    SynRecv = 0x16,
    /// Connection established
    Established = 0x17,
    /// Closing (FIN sent)
    FinWait = 0x18,
    /// Closing
    Closing = 0x1A,
    /// Time wait
    TimeWait = 0x1B,
    /// Peer requested close
    CloseWait = 0x1C,
    /// Last ACK
    LastAck = 0x1D,
    /// UDP socket opened
    Udp = 0x22,
    /// IP raw socket opened
    IpRaw = 0x32,
    /// MAC raw socket opened
    MacRaw = 0x42,
}

impl TryFrom<u8> for Status {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Ok(match raw {
            0x00 => Status::Closed,
            0x13 => Status::Init,
            0x14 => Status::Listen,
            0x15 => Status::SynSent,
            0x16 => Status::SynRecv,
            0x17 => Status::Established,
            0x18 => Status::FinWait,
            0x1A => Status::Closing,
            0x1B => Status::TimeWait,
            0x1C => Status::CloseWait,
            0x1D => Status::LastAck,
            0x22 => Status::Udp,
            0x32 => Status::IpRaw,
            0x42 => Status::MacRaw,
            other => return Err(other),
        })
    }
}

// =============================================================================
// Mode Register
// =============================================================================

/// Protocol field (bits 3:0) of `Sn_MR`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Protocol {
    /// Socket unused
    #[default]
    Closed = 0x00,
    /// TCP
    Tcp = 0x01,
    /// UDP
    Udp = 0x02,
    /// MAC raw (socket 0 only)
    MacRaw = 0x04,
}

impl From<Protocol> for u8 {
    fn from(protocol: Protocol) -> Self {
        protocol as u8
    }
}
