//! Multi-call packet assembly
//!
//! A [`PacketWriter`] stages one outgoing packet in a socket's TX ring over
//! any number of [`write`](PacketWriter::write) calls. `Sn_TX_WR` is read
//! once when the writer is created and written once on
//! [`commit`](PacketWriter::commit); in between the running pointer lives
//! in the writer. Dropping a writer without committing discards the staged
//! bytes.
//!
//! ```ignore
//! let mut packet = w5500.begin_packet(socket)?;
//! packet.write(&header)?;
//! packet.write(&payload)?;
//! packet.send()?;
//! ```

use crate::bus::Bus;
use crate::driver::error::Result;
use crate::driver::w5500::W5500;
use crate::internal::constants::SSIZE;
use crate::socket::{Command, SocketIndex};

/// Packet being staged in one socket's TX ring
#[derive(Debug)]
pub struct PacketWriter<'a, B: Bus> {
    w5500: &'a mut W5500<B>,
    socket: SocketIndex,
    start: u16,
    ptr: u16,
    free: u16,
}

impl<B: Bus> W5500<B> {
    /// Start assembling a packet at the socket's current `Sn_TX_WR`
    ///
    /// Free space is sampled once here; writes beyond it are truncated.
    pub fn begin_packet(&mut self, socket: SocketIndex) -> Result<PacketWriter<'_, B>> {
        let start = self.tx_write_pointer(socket)?;
        let free = self.tx_free_size(socket)?.min(SSIZE);
        Ok(PacketWriter {
            w5500: self,
            socket,
            start,
            ptr: start,
            free,
        })
    }
}

impl<B: Bus> PacketWriter<'_, B> {
    /// Socket this packet belongs to
    pub fn socket(&self) -> SocketIndex {
        self.socket
    }

    /// Bytes staged so far
    pub fn offset(&self) -> u16 {
        self.ptr.wrapping_sub(self.start)
    }

    /// Space left for this packet
    pub fn remaining(&self) -> u16 {
        self.free.saturating_sub(self.offset())
    }

    /// Append as much of `data` as fits, returning the number of bytes staged
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        let len = data.len().min(self.remaining() as usize);
        if len == 0 {
            return Ok(0);
        }
        self.ptr = self
            .w5500
            .send_data_processing_offset(self.socket, self.ptr, &data[..len])?;
        Ok(len)
    }

    /// Persist `Sn_TX_WR` past the staged bytes, returning the packet length
    ///
    /// Nothing is transmitted until [`Command::Send`] is issued.
    pub fn commit(self) -> Result<u16> {
        self.w5500.set_tx_write_pointer(self.socket, self.ptr)?;
        Ok(self.offset())
    }

    /// Commit and issue [`Command::Send`]
    pub fn send(self) -> Result<u16> {
        let socket = self.socket;
        let w5500 = &mut *self.w5500;
        w5500.set_tx_write_pointer(socket, self.ptr)?;
        w5500.exec_cmd(socket, Command::Send)?;
        Ok(self.ptr.wrapping_sub(self.start))
    }
}
