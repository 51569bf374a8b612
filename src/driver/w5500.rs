//! W5500 driver
//!
//! [`W5500`] owns a [`Bus`] and layers on top of it:
//!
//! - the register accessor layer (common and per-socket registers),
//! - ring buffer transfers for socket TX/RX memory,
//! - socket command execution and free/received size queries,
//! - bring-up and network configuration.
//!
//! All operations are blocking and run to completion on the caller. Socket
//! commands are polled without a timeout: a chip that never clears `Sn_CR`
//! hangs [`W5500::exec_cmd`].

use embedded_hal::delay::DelayNs;

use crate::bus::Bus;
use crate::driver::config::{NetworkConfig, W5500Config};
use crate::driver::error::{ConfigError, IoError, Result};
use crate::internal::constants::{
    BUFFER_BASE, BUFFER_SIZE_KIB, CHIP_VERSION, COMMON_READ, COMMON_WRITE, MAC_ADDR_LEN, MR_RESET,
    PHYCFGR_LINK, RESET_POLL_INTERVAL_US, RSIZE, SSIZE,
};
use crate::internal::register::{self, Register};
use crate::ring::RingBuffer;
use crate::socket::{Access, Bank, Command, Protocol, SocketIndex, Status};

/// TX ring geometry, identical for every socket
pub const TX_RING: RingBuffer = RingBuffer::new(BUFFER_BASE, SSIZE);

/// RX ring geometry, identical for every socket
pub const RX_RING: RingBuffer = RingBuffer::new(BUFFER_BASE, RSIZE);

/// W5500 driver instance
///
/// One instance per physical chip. The instance owns its bus transport, so
/// several chips (or a mock) can coexist without global state.
#[derive(Debug)]
pub struct W5500<B> {
    bus: B,
}

impl<B: Bus> W5500<B> {
    /// Wrap a bus transport. No bus traffic happens until [`init`](Self::init)
    /// or another operation is called.
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Borrow the bus transport
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the bus transport
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Release the bus transport
    pub fn release(self) -> B {
        self.bus
    }

    // =========================================================================
    // Bring-up
    // =========================================================================

    /// Reset the chip, verify it is a W5500 and apply `config`
    ///
    /// Every socket's TX and RX buffer is sized to 2 KiB, matching
    /// [`SSIZE`](crate::constants::SSIZE) and [`RSIZE`](crate::constants::RSIZE).
    pub fn init<D: DelayNs>(&mut self, config: &W5500Config, delay: &mut D) -> Result<()> {
        config.validate()?;

        self.soft_reset(config.reset_timeout_ms, delay)?;

        let version = self.version()?;
        if version != CHIP_VERSION {
            #[cfg(feature = "defmt")]
            defmt::warn!("unexpected VERSIONR {=u8:#x}", version);
            return Err(ConfigError::ChipNotFound.into());
        }

        for socket in SocketIndex::all() {
            self.write_socket_register_u8(socket, register::SN_RXBUF_SIZE, BUFFER_SIZE_KIB)?;
            self.write_socket_register_u8(socket, register::SN_TXBUF_SIZE, BUFFER_SIZE_KIB)?;
        }

        self.set_mac_address(config.mac_address)?;
        self.set_network_config(&config.network)?;
        self.set_retransmission_time(config.retransmission_time)?;
        self.set_retransmission_count(config.retransmission_count)?;

        #[cfg(feature = "defmt")]
        defmt::info!("W5500 initialised, {=u16} byte socket buffers", SSIZE);

        Ok(())
    }

    /// Set `MR.RST` and wait for the chip to clear it
    pub fn soft_reset<D: DelayNs>(&mut self, timeout_ms: u32, delay: &mut D) -> Result<()> {
        self.write_register_u8(register::MR, MR_RESET)?;

        let max_polls = timeout_ms.saturating_mul(1000) / RESET_POLL_INTERVAL_US;
        for _ in 0..=max_polls {
            if self.read_register_u8(register::MR)? & MR_RESET == 0 {
                #[cfg(feature = "defmt")]
                defmt::debug!("W5500 soft reset complete");
                return Ok(());
            }
            delay.delay_us(RESET_POLL_INTERVAL_US);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("W5500 soft reset timed out after {=u32} ms", timeout_ms);
        Err(ConfigError::ResetFailed.into())
    }

    /// Read `VERSIONR` (0x04 on a W5500)
    pub fn version(&mut self) -> Result<u8> {
        self.read_register_u8(register::VERSIONR)
    }

    /// Whether the PHY reports link up
    pub fn link_up(&mut self) -> Result<bool> {
        Ok(self.read_register_u8(register::PHYCFGR)? & PHYCFGR_LINK != 0)
    }

    // =========================================================================
    // Network Configuration
    // =========================================================================

    /// Apply IP, subnet and gateway
    pub fn set_network_config(&mut self, network: &NetworkConfig) -> Result<()> {
        self.set_ip_address(network.ip)?;
        self.set_subnet_mask(network.subnet)?;
        self.set_gateway_ip(network.gateway)
    }

    /// Read back IP, subnet and gateway
    pub fn network_config(&mut self) -> Result<NetworkConfig> {
        Ok(NetworkConfig::new(
            self.ip_address()?,
            self.subnet_mask()?,
            self.gateway_ip()?,
        ))
    }

    /// Write `GAR`
    pub fn set_gateway_ip(&mut self, addr: [u8; 4]) -> Result<()> {
        self.write_register(register::GAR, &addr)
    }

    /// Read `GAR`
    pub fn gateway_ip(&mut self) -> Result<[u8; 4]> {
        self.read_register_array(register::GAR)
    }

    /// Write `SUBR`
    pub fn set_subnet_mask(&mut self, addr: [u8; 4]) -> Result<()> {
        self.write_register(register::SUBR, &addr)
    }

    /// Read `SUBR`
    pub fn subnet_mask(&mut self) -> Result<[u8; 4]> {
        self.read_register_array(register::SUBR)
    }

    /// Write `SHAR`
    pub fn set_mac_address(&mut self, addr: [u8; MAC_ADDR_LEN]) -> Result<()> {
        self.write_register(register::SHAR, &addr)
    }

    /// Read `SHAR`
    pub fn mac_address(&mut self) -> Result<[u8; MAC_ADDR_LEN]> {
        self.read_register_array(register::SHAR)
    }

    /// Write `SIPR`
    pub fn set_ip_address(&mut self, addr: [u8; 4]) -> Result<()> {
        self.write_register(register::SIPR, &addr)
    }

    /// Read `SIPR`
    pub fn ip_address(&mut self) -> Result<[u8; 4]> {
        self.read_register_array(register::SIPR)
    }

    /// Write `RTR` (100 µs units)
    pub fn set_retransmission_time(&mut self, time: u16) -> Result<()> {
        self.write_register_u16(register::RTR, time)
    }

    /// Write `RCR`
    pub fn set_retransmission_count(&mut self, count: u8) -> Result<()> {
        self.write_register_u8(register::RCR, count)
    }

    // =========================================================================
    // Register Accessor Layer
    // =========================================================================

    /// Read a common register into `buf`
    pub fn read_register(&mut self, reg: Register, buf: &mut [u8]) -> Result<usize> {
        debug_assert!(!reg.is_socket());
        Ok(self.bus.read(reg.offset, COMMON_READ, buf)?)
    }

    /// Write `data` to a common register
    pub fn write_register(&mut self, reg: Register, data: &[u8]) -> Result<()> {
        debug_assert!(!reg.is_socket());
        self.bus.write(reg.offset, COMMON_WRITE, data)?;
        Ok(())
    }

    /// Read a whole common register as an array
    pub fn read_register_array<const N: usize>(&mut self, reg: Register) -> Result<[u8; N]> {
        debug_assert_eq!(reg.width as usize, N);
        let mut buf = [0u8; N];
        self.read_register(reg, &mut buf)?;
        Ok(buf)
    }

    /// Read an 8-bit common register
    pub fn read_register_u8(&mut self, reg: Register) -> Result<u8> {
        let [value] = self.read_register_array(reg)?;
        Ok(value)
    }

    /// Write an 8-bit common register
    pub fn write_register_u8(&mut self, reg: Register, value: u8) -> Result<()> {
        self.write_register(reg, &[value])
    }

    /// Read a 16-bit common register (high byte first)
    pub fn read_register_u16(&mut self, reg: Register) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_register_array(reg)?))
    }

    /// Write a 16-bit common register (high byte first)
    pub fn write_register_u16(&mut self, reg: Register, value: u16) -> Result<()> {
        self.write_register(reg, &value.to_be_bytes())
    }

    /// Read from `offset` in a socket's register block
    pub fn read_sn(&mut self, socket: SocketIndex, offset: u16, buf: &mut [u8]) -> Result<usize> {
        let control = socket.control_byte(Bank::Registers, Access::Read);
        Ok(self.bus.read(offset, control, buf)?)
    }

    /// Write to `offset` in a socket's register block
    pub fn write_sn(&mut self, socket: SocketIndex, offset: u16, data: &[u8]) -> Result<usize> {
        let control = socket.control_byte(Bank::Registers, Access::Write);
        Ok(self.bus.write(offset, control, data)?)
    }

    /// Read a whole socket register as an array
    pub fn read_socket_register_array<const N: usize>(
        &mut self,
        socket: SocketIndex,
        reg: Register,
    ) -> Result<[u8; N]> {
        debug_assert!(reg.is_socket());
        debug_assert_eq!(reg.width as usize, N);
        let mut buf = [0u8; N];
        self.read_sn(socket, reg.offset, &mut buf)?;
        Ok(buf)
    }

    /// Write a whole socket register
    pub fn write_socket_register(
        &mut self,
        socket: SocketIndex,
        reg: Register,
        data: &[u8],
    ) -> Result<()> {
        debug_assert!(reg.is_socket());
        debug_assert_eq!(reg.width as usize, data.len());
        self.write_sn(socket, reg.offset, data)?;
        Ok(())
    }

    /// Read an 8-bit socket register
    pub fn read_socket_register_u8(&mut self, socket: SocketIndex, reg: Register) -> Result<u8> {
        let [value] = self.read_socket_register_array(socket, reg)?;
        Ok(value)
    }

    /// Write an 8-bit socket register
    pub fn write_socket_register_u8(
        &mut self,
        socket: SocketIndex,
        reg: Register,
        value: u8,
    ) -> Result<()> {
        self.write_socket_register(socket, reg, &[value])
    }

    /// Read a 16-bit socket register (high byte first)
    pub fn read_socket_register_u16(&mut self, socket: SocketIndex, reg: Register) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_socket_register_array(socket, reg)?))
    }

    /// Write a 16-bit socket register (high byte first)
    pub fn write_socket_register_u16(
        &mut self,
        socket: SocketIndex,
        reg: Register,
        value: u16,
    ) -> Result<()> {
        self.write_socket_register(socket, reg, &value.to_be_bytes())
    }

    // =========================================================================
    // Socket Registers
    // =========================================================================

    /// Decoded `Sn_SR`, `None` for transient values not listed in [`Status`]
    pub fn socket_status(&mut self, socket: SocketIndex) -> Result<Option<Status>> {
        let raw = self.read_socket_register_u8(socket, register::SN_SR)?;
        Ok(Status::try_from(raw).ok())
    }

    /// Write the protocol field of `Sn_MR`
    pub fn set_socket_mode(&mut self, socket: SocketIndex, protocol: Protocol) -> Result<()> {
        self.write_socket_register_u8(socket, register::SN_MR, protocol.into())
    }

    /// Write `Sn_PORT`
    pub fn set_source_port(&mut self, socket: SocketIndex, port: u16) -> Result<()> {
        self.write_socket_register_u16(socket, register::SN_PORT, port)
    }

    /// Write `Sn_DIPR` and `Sn_DPORT`
    pub fn set_destination(&mut self, socket: SocketIndex, ip: [u8; 4], port: u16) -> Result<()> {
        self.write_socket_register(socket, register::SN_DIPR, &ip)?;
        self.write_socket_register_u16(socket, register::SN_DPORT, port)
    }

    /// Read `Sn_TX_WR`
    pub fn tx_write_pointer(&mut self, socket: SocketIndex) -> Result<u16> {
        self.read_socket_register_u16(socket, register::SN_TX_WR)
    }

    /// Write `Sn_TX_WR`
    pub fn set_tx_write_pointer(&mut self, socket: SocketIndex, ptr: u16) -> Result<()> {
        self.write_socket_register_u16(socket, register::SN_TX_WR, ptr)
    }

    /// Read `Sn_RX_RD`
    pub fn rx_read_pointer(&mut self, socket: SocketIndex) -> Result<u16> {
        self.read_socket_register_u16(socket, register::SN_RX_RD)
    }

    /// Write `Sn_RX_RD`
    pub fn set_rx_read_pointer(&mut self, socket: SocketIndex, ptr: u16) -> Result<()> {
        self.write_socket_register_u16(socket, register::SN_RX_RD, ptr)
    }

    // =========================================================================
    // Ring Buffer Transfers
    // =========================================================================

    /// Copy `dst.len()` bytes out of the socket's RX ring starting at
    /// logical pointer `src`
    ///
    /// Does not touch `Sn_RX_RD`; advancing it is up to the caller.
    pub fn read_data(&mut self, socket: SocketIndex, src: u16, dst: &mut [u8]) -> Result<()> {
        debug_assert!(dst.len() <= RSIZE as usize);
        let control = socket.control_byte(Bank::RxBuffer, Access::Read);
        for seg in RX_RING.segments(src, dst.len() as u16).iter() {
            self.bus.read(seg.address, control, &mut dst[seg.range()])?;
        }
        Ok(())
    }

    /// Copy `data` into the socket's TX ring at logical pointer `ptr`
    fn write_tx(&mut self, socket: SocketIndex, ptr: u16, data: &[u8]) -> Result<()> {
        debug_assert!(data.len() <= SSIZE as usize);
        let control = socket.control_byte(Bank::TxBuffer, Access::Write);
        for seg in TX_RING.segments(ptr, data.len() as u16).iter() {
            self.bus.write(seg.address, control, &data[seg.range()])?;
        }
        Ok(())
    }

    /// Stage `data` at `Sn_TX_WR` and advance the write pointer past it
    ///
    /// The chip transmits nothing until [`Command::Send`] is issued.
    pub fn send_data_processing(&mut self, socket: SocketIndex, data: &[u8]) -> Result<()> {
        let ptr = self.tx_write_pointer(socket)?;
        self.write_tx(socket, ptr, data)?;
        self.set_tx_write_pointer(socket, ptr.wrapping_add(data.len() as u16))
    }

    /// Stage `data` at logical pointer `ptr` without reading or writing
    /// `Sn_TX_WR`, returning the pointer just past the staged bytes
    ///
    /// Used to assemble one packet over several calls: thread the returned
    /// pointer into the next call and persist it once with
    /// [`set_tx_write_pointer`](Self::set_tx_write_pointer) when done.
    /// `Sn_TX_WR` does not track intermediate progress reliably, so the two
    /// paths must stay separate.
    pub fn send_data_processing_offset(
        &mut self,
        socket: SocketIndex,
        ptr: u16,
        data: &[u8],
    ) -> Result<u16> {
        self.write_tx(socket, ptr, data)?;
        Ok(ptr.wrapping_add(data.len() as u16))
    }

    /// Copy `data.len()` bytes from `Sn_RX_RD`
    ///
    /// Unless `peek` is set, `Sn_RX_RD` is advanced past the copied bytes.
    /// The chip is not told about the consumed space until
    /// [`Command::Recv`] is issued.
    pub fn recv_data_processing(
        &mut self,
        socket: SocketIndex,
        data: &mut [u8],
        peek: bool,
    ) -> Result<()> {
        let ptr = self.rx_read_pointer(socket)?;
        self.read_data(socket, ptr, data)?;
        if !peek {
            self.set_rx_read_pointer(socket, ptr.wrapping_add(data.len() as u16))?;
        }
        Ok(())
    }

    // =========================================================================
    // Command / Status
    // =========================================================================

    /// Write `cmd` to `Sn_CR` and spin until the chip clears it
    ///
    /// There is no timeout: an unresponsive chip blocks forever.
    pub fn exec_cmd(&mut self, socket: SocketIndex, cmd: Command) -> Result<()> {
        #[cfg(feature = "defmt")]
        defmt::trace!("socket {=u8}: {}", socket.get(), cmd);

        self.write_socket_register_u8(socket, register::SN_CR, cmd.into())?;
        while self.read_socket_register_u8(socket, register::SN_CR)? != 0 {
            core::hint::spin_loop();
        }
        Ok(())
    }

    /// Free space in the socket's TX ring (`Sn_TX_FSR`)
    pub fn tx_free_size(&mut self, socket: SocketIndex) -> Result<u16> {
        self.read_stable_u16(socket, register::SN_TX_FSR)
    }

    /// Bytes waiting in the socket's RX ring (`Sn_RX_RSR`)
    pub fn rx_received_size(&mut self, socket: SocketIndex) -> Result<u16> {
        self.read_stable_u16(socket, register::SN_RX_RSR)
    }

    /// Read a 16-bit register the chip may update mid-read until two
    /// consecutive reads agree
    fn read_stable_u16(&mut self, socket: SocketIndex, reg: Register) -> Result<u16> {
        let mut previous = self.read_socket_register_u16(socket, reg)?;
        loop {
            let current = self.read_socket_register_u16(socket, reg)?;
            if current == previous {
                return Ok(current);
            }
            previous = current;
        }
    }

    // =========================================================================
    // Send / Receive
    // =========================================================================

    /// Stage as much of `data` as fits and issue [`Command::Send`]
    ///
    /// The reported free size is capped at the ring size, so garbage from an
    /// absent chip cannot stage more than one ring's worth. Returns the number of bytes queued, `Ok(0)` when the TX ring is full.
    pub fn send(&mut self, socket: SocketIndex, data: &[u8]) -> Result<usize> {
        let free = self.tx_free_size(socket)?.min(SSIZE) as usize;
        let len = data.len().min(free);
        if len == 0 {
            return Ok(0);
        }
        self.send_data_processing(socket, &data[..len])?;
        self.exec_cmd(socket, Command::Send)?;
        Ok(len)
    }

    /// Stage all of `data` or nothing, then issue [`Command::Send`]
    pub fn send_all(&mut self, socket: SocketIndex, data: &[u8]) -> Result<()> {
        let free = self.tx_free_size(socket)?.min(SSIZE) as usize;
        if data.len() > free {
            return Err(IoError::InsufficientSpace.into());
        }
        self.send_data_processing(socket, data)?;
        self.exec_cmd(socket, Command::Send)
    }

    /// Drain up to `buf.len()` received bytes and issue [`Command::Recv`]
    ///
    /// Returns the number of bytes copied, `Ok(0)` when nothing is waiting.
    pub fn recv(&mut self, socket: SocketIndex, buf: &mut [u8]) -> Result<usize> {
        let available = self.rx_received_size(socket)?.min(RSIZE) as usize;
        let len = buf.len().min(available);
        if len == 0 {
            return Ok(0);
        }
        self.recv_data_processing(socket, &mut buf[..len], false)?;
        self.exec_cmd(socket, Command::Recv)?;
        Ok(len)
    }

    /// Copy up to `buf.len()` received bytes without consuming them
    pub fn peek(&mut self, socket: SocketIndex, buf: &mut [u8]) -> Result<usize> {
        let available = self.rx_received_size(socket)?.min(RSIZE) as usize;
        let len = buf.len().min(available);
        if len != 0 {
            self.recv_data_processing(socket, &mut buf[..len], true)?;
        }
        Ok(len)
    }
}

// =============================================================================
// Tests
// =============================================================================
