//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for testing the W5500 driver
//! on the host without hardware access.
//!
//! Only available when running `cargo test`.

#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, Operation, SpiBus, SpiDevice};

use crate::bus::Bus;
use crate::driver::error::BusResult;
use crate::internal::constants::{MR_RESET, SOCKETS, SSIZE};
use crate::internal::register::{self, Register};
use crate::socket::{Access, Bank, SocketIndex};

// =============================================================================
// SPI Event Log
// =============================================================================

/// One observable event on the SPI wires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpiEvent {
    /// Chip-select driven low
    Select,
    /// Chip-select driven high
    Deselect,
    /// Bytes clocked out on MOSI
    Write(Vec<u8>),
    /// Number of bytes clocked in on MISO
    Read(usize),
    /// Bus flushed
    Flush,
}

/// Event log shared between a mock bus and its chip-select pin
pub type EventLog = Rc<RefCell<Vec<SpiEvent>>>;

/// Create an empty shared event log
pub fn shared_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// SPI error carrying an `ErrorKind`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSpiError(pub spi::ErrorKind);

impl spi::Error for MockSpiError {
    fn kind(&self) -> spi::ErrorKind {
        self.0
    }
}

/// GPIO error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

// =============================================================================
// Mock SPI Device
// =============================================================================

/// Mock `SpiDevice` that logs every operation and replays queued MISO bytes
#[derive(Debug, Default)]
pub struct MockSpiDevice {
    events: RefCell<Vec<SpiEvent>>,
    miso: RefCell<VecDeque<u8>>,
    fail: Cell<Option<spi::ErrorKind>>,
}

impl MockSpiDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes returned by subsequent reads
    pub fn queue_miso(&self, bytes: &[u8]) {
        self.miso.borrow_mut().extend(bytes.iter().copied());
    }

    /// Make the next operation fail with `kind`
    pub fn fail_next(&self, kind: spi::ErrorKind) {
        self.fail.set(Some(kind));
    }

    pub fn events(&self) -> Vec<SpiEvent> {
        self.events.borrow().clone()
    }

    fn run(&self, op: &mut Operation<'_, u8>) -> Result<(), MockSpiError> {
        if let Some(kind) = self.fail.take() {
            return Err(MockSpiError(kind));
        }
        let mut events = self.events.borrow_mut();
        let mut miso = self.miso.borrow_mut();
        match op {
            Operation::Write(data) => events.push(SpiEvent::Write(data.to_vec())),
            Operation::Read(buf) => {
                for b in buf.iter_mut() {
                    *b = miso.pop_front().unwrap_or(0);
                }
                events.push(SpiEvent::Read(buf.len()));
            }
            Operation::Transfer(read, write) => {
                events.push(SpiEvent::Write(write.to_vec()));
                for b in read.iter_mut() {
                    *b = miso.pop_front().unwrap_or(0);
                }
                events.push(SpiEvent::Read(read.len()));
            }
            Operation::TransferInPlace(buf) => {
                events.push(SpiEvent::Write(buf.to_vec()));
                for b in buf.iter_mut() {
                    *b = miso.pop_front().unwrap_or(0);
                }
                events.push(SpiEvent::Read(buf.len()));
            }
            Operation::DelayNs(_) => {}
        }
        Ok(())
    }
}

impl spi::ErrorType for MockSpiDevice {
    type Error = MockSpiError;
}

impl SpiDevice for MockSpiDevice {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), MockSpiError> {
        self.events.borrow_mut().push(SpiEvent::Select);
        let mut result = Ok(());
        for op in operations.iter_mut() {
            result = self.run(op);
            if result.is_err() {
                break;
            }
        }
        self.events.borrow_mut().push(SpiEvent::Deselect);
        result
    }
}

// =============================================================================
// Mock SPI Bus + Chip-Select Pin
// =============================================================================

/// Mock `SpiBus` writing into a shared [`EventLog`]
#[derive(Debug)]
pub struct MockSpiBus {
    log: EventLog,
    miso: RefCell<VecDeque<u8>>,
    fail: Cell<Option<spi::ErrorKind>>,
}

impl MockSpiBus {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: Rc::clone(log),
            miso: RefCell::new(VecDeque::new()),
            fail: Cell::new(None),
        }
    }

    pub fn queue_miso(&self, bytes: &[u8]) {
        self.miso.borrow_mut().extend(bytes.iter().copied());
    }

    pub fn fail_next(&self, kind: spi::ErrorKind) {
        self.fail.set(Some(kind));
    }

    fn check(&self) -> Result<(), MockSpiError> {
        match self.fail.take() {
            Some(kind) => Err(MockSpiError(kind)),
            None => Ok(()),
        }
    }

    fn fill(&self, buf: &mut [u8]) {
        let mut miso = self.miso.borrow_mut();
        for b in buf.iter_mut() {
            *b = miso.pop_front().unwrap_or(0);
        }
    }
}

impl spi::ErrorType for MockSpiBus {
    type Error = MockSpiError;
}

impl SpiBus for MockSpiBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), MockSpiError> {
        self.check()?;
        self.fill(words);
        self.log.borrow_mut().push(SpiEvent::Read(words.len()));
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), MockSpiError> {
        self.check()?;
        self.log.borrow_mut().push(SpiEvent::Write(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), MockSpiError> {
        self.check()?;
        self.fill(read);
        let mut log = self.log.borrow_mut();
        log.push(SpiEvent::Write(write.to_vec()));
        log.push(SpiEvent::Read(read.len()));
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), MockSpiError> {
        self.check()?;
        self.log.borrow_mut().push(SpiEvent::Write(words.to_vec()));
        self.fill(words);
        self.log.borrow_mut().push(SpiEvent::Read(words.len()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MockSpiError> {
        self.check()?;
        self.log.borrow_mut().push(SpiEvent::Flush);
        Ok(())
    }
}

/// Mock chip-select pin; low logs [`SpiEvent::Select`], high logs
/// [`SpiEvent::Deselect`]
#[derive(Debug)]
pub struct MockPin {
    log: EventLog,
    fail: Cell<bool>,
}

impl MockPin {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: Rc::clone(log),
            fail: Cell::new(false),
        }
    }

    /// Make the next pin operation fail
    pub fn fail_next(&self) {
        self.fail.set(true);
    }

    fn drive(&self, event: SpiEvent) -> Result<(), MockPinError> {
        if self.fail.take() {
            return Err(MockPinError);
        }
        self.log.borrow_mut().push(event);
        Ok(())
    }
}

impl digital::ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), MockPinError> {
        self.drive(SpiEvent::Select)
    }

    fn set_high(&mut self) -> Result<(), MockPinError> {
        self.drive(SpiEvent::Deselect)
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: RefCell<u64>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns() / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }
}

// =============================================================================
// Mock Chip
// =============================================================================

const COMMON_SIZE: usize = 0x40;
const SOCKET_REG_SIZE: usize = 0x30;
const BUF_SIZE: usize = SSIZE as usize;

/// One transaction seen by [`MockChip`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub address: u16,
    pub control: u8,
    pub len: usize,
    pub write: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Common,
    Registers(usize),
    Tx(usize),
    Rx(usize),
}

impl Target {
    fn decode(control: u8) -> Self {
        let bsb = control >> 3;
        let socket = (bsb >> 2) as usize;
        match (bsb & 0x03, socket) {
            (0, 0) => Target::Common,
            (1, s) => Target::Registers(s),
            (2, s) => Target::Tx(s),
            (3, s) => Target::Rx(s),
            _ => panic!("reserved block select in control byte {control:#04x}"),
        }
    }
}

/// Simulated W5500 memory behind the [`Bus`] trait
///
/// Models the common register block, eight socket register blocks and the
/// eight 2 KiB TX/RX buffers. Buffer accesses outside `[0, 2048)` panic so
/// tests catch any translation that leaves the ring. `Sn_CR` clears itself
/// after a configurable number of polls and `MR.RST` after another.
#[derive(Debug)]
pub struct MockChip {
    common: [u8; COMMON_SIZE],
    socket_regs: [[u8; SOCKET_REG_SIZE]; SOCKETS],
    tx: Vec<[u8; BUF_SIZE]>,
    rx: Vec<[u8; BUF_SIZE]>,
    scripted: HashMap<(u8, u16), VecDeque<Vec<u8>>>,
    log: Vec<Transaction>,
    commands: Vec<(u8, u8)>,
    command_latency: usize,
    pending_polls: [usize; SOCKETS],
    reset_latency: usize,
    reset_polls: usize,
    loopback: bool,
}

impl Default for MockChip {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChip {
    /// A chip in its post-reset state
    pub fn new() -> Self {
        let mut chip = Self {
            common: [0; COMMON_SIZE],
            socket_regs: [[0; SOCKET_REG_SIZE]; SOCKETS],
            tx: vec![[0; BUF_SIZE]; SOCKETS],
            rx: vec![[0; BUF_SIZE]; SOCKETS],
            scripted: HashMap::new(),
            log: Vec::new(),
            commands: Vec::new(),
            command_latency: 0,
            pending_polls: [0; SOCKETS],
            reset_latency: 0,
            reset_polls: 0,
            loopback: false,
        };
        chip.set_common(register::VERSIONR, &[0x04]);
        chip.set_common(register::RTR, &0x07D0u16.to_be_bytes());
        chip.set_common(register::RCR, &[0x08]);
        for s in SocketIndex::all() {
            chip.set_socket_u16(s, register::SN_TX_FSR, SSIZE);
        }
        chip
    }

    fn block_key(control: u8) -> u8 {
        control >> 3
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Number of `Sn_CR` polls that still read non-zero after a command
    pub fn set_command_latency(&mut self, polls: usize) {
        self.command_latency = polls;
    }

    /// Number of `MR` polls that still show the reset bit
    pub fn set_reset_latency(&mut self, polls: usize) {
        self.reset_latency = polls;
    }

    /// Serve RX buffer reads from the TX buffer memory
    pub fn set_loopback(&mut self, enabled: bool) {
        self.loopback = enabled;
    }

    pub fn set_common(&mut self, reg: Register, bytes: &[u8]) {
        let start = reg.offset as usize;
        self.common[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn common(&self, reg: Register) -> Vec<u8> {
        let start = reg.offset as usize;
        self.common[start..start + reg.width as usize].to_vec()
    }

    pub fn set_socket_u8(&mut self, socket: SocketIndex, reg: Register, value: u8) {
        self.socket_regs[socket.get() as usize][reg.offset as usize] = value;
    }

    pub fn socket_u8(&self, socket: SocketIndex, reg: Register) -> u8 {
        self.socket_regs[socket.get() as usize][reg.offset as usize]
    }

    pub fn set_socket_u16(&mut self, socket: SocketIndex, reg: Register, value: u16) {
        let start = reg.offset as usize;
        self.socket_regs[socket.get() as usize][start..start + 2]
            .copy_from_slice(&value.to_be_bytes());
    }

    pub fn socket_u16(&self, socket: SocketIndex, reg: Register) -> u16 {
        let start = reg.offset as usize;
        let regs = &self.socket_regs[socket.get() as usize];
        u16::from_be_bytes([regs[start], regs[start + 1]])
    }

    pub fn socket_bytes(&self, socket: SocketIndex, reg: Register) -> Vec<u8> {
        let start = reg.offset as usize;
        self.socket_regs[socket.get() as usize][start..start + reg.width as usize].to_vec()
    }

    /// Queue values returned by successive reads of a 16-bit socket register
    /// before falling back to register memory
    pub fn script_socket_u16(&mut self, socket: SocketIndex, reg: Register, values: &[u16]) {
        let control = socket.control_byte(Bank::Registers, Access::Read);
        let key = (Self::block_key(control), reg.offset);
        self.scripted
            .entry(key)
            .or_default()
            .extend(values.iter().map(|v| v.to_be_bytes().to_vec()));
    }

    /// Place `data` in the RX ring starting at logical pointer `ptr`
    pub fn fill_rx(&mut self, socket: SocketIndex, ptr: u16, data: &[u8]) {
        let ring = &mut self.rx[socket.get() as usize];
        for (i, &b) in data.iter().enumerate() {
            ring[(ptr as usize + i) % BUF_SIZE] = b;
        }
    }

    pub fn tx_buffer(&self, socket: SocketIndex) -> &[u8] {
        &self.tx[socket.get() as usize]
    }

    pub fn rx_buffer(&self, socket: SocketIndex) -> &[u8] {
        &self.rx[socket.get() as usize]
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Number of reads of a socket register
    pub fn socket_reads(&self, socket: SocketIndex, reg: Register) -> usize {
        let control = socket.control_byte(Bank::Registers, Access::Read);
        self.log
            .iter()
            .filter(|t| !t.write && t.control == control && t.address == reg.offset)
            .count()
    }

    /// `(socket, command)` pairs written to `Sn_CR`, in order
    pub fn commands(&self) -> &[(u8, u8)] {
        &self.commands
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.commands.clear();
    }

    fn check_buffer_range(address: u16, len: usize) {
        assert!(
            address as usize + len <= BUF_SIZE,
            "buffer access out of range: {address:#06x} + {len}"
        );
    }
}

impl Bus for MockChip {
    fn read(&mut self, address: u16, control: u8, buf: &mut [u8]) -> BusResult<usize> {
        assert_eq!(control & 0x04, 0, "read with write control byte {control:#04x}");
        self.log.push(Transaction {
            address,
            control,
            len: buf.len(),
            write: false,
        });

        if let Some(value) = self
            .scripted
            .get_mut(&(Self::block_key(control), address))
            .and_then(VecDeque::pop_front)
        {
            buf.copy_from_slice(&value);
            return Ok(buf.len());
        }

        let start = address as usize;
        match Target::decode(control) {
            Target::Common => {
                if start == register::MR.offset as usize {
                    if self.reset_polls > 0 {
                        self.reset_polls -= 1;
                    } else {
                        self.common[start] &= !MR_RESET;
                    }
                }
                buf.copy_from_slice(&self.common[start..start + buf.len()]);
            }
            Target::Registers(s) => {
                if start == register::SN_CR.offset as usize {
                    if self.pending_polls[s] > 0 {
                        self.pending_polls[s] -= 1;
                    } else {
                        self.socket_regs[s][start] = 0;
                    }
                }
                buf.copy_from_slice(&self.socket_regs[s][start..start + buf.len()]);
            }
            Target::Tx(s) => {
                Self::check_buffer_range(address, buf.len());
                buf.copy_from_slice(&self.tx[s][start..start + buf.len()]);
            }
            Target::Rx(s) => {
                Self::check_buffer_range(address, buf.len());
                let ring = if self.loopback { &self.tx[s] } else { &self.rx[s] };
                buf.copy_from_slice(&ring[start..start + buf.len()]);
            }
        }
        Ok(buf.len())
    }

    fn write(&mut self, address: u16, control: u8, data: &[u8]) -> BusResult<usize> {
        assert_ne!(control & 0x04, 0, "write with read control byte {control:#04x}");
        self.log.push(Transaction {
            address,
            control,
            len: data.len(),
            write: true,
        });

        let start = address as usize;
        let end = start + data.len();
        match Target::decode(control) {
            Target::Common => {
                if start == register::MR.offset as usize && data[0] & MR_RESET != 0 {
                    self.reset_polls = self.reset_latency;
                }
                self.common[start..end].copy_from_slice(data);
            }
            Target::Registers(s) => {
                if start == register::SN_CR.offset as usize {
                    self.commands.push((s as u8, data[0]));
                    self.pending_polls[s] = self.command_latency;
                }
                self.socket_regs[s][start..end].copy_from_slice(data);
            }
            Target::Tx(s) => {
                Self::check_buffer_range(address, data.len());
                self.tx[s][start..end].copy_from_slice(data);
            }
            Target::Rx(s) => {
                Self::check_buffer_range(address, data.len());
                self.rx[s][start..end].copy_from_slice(data);
            }
        }
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(n: u8) -> SocketIndex {
        SocketIndex::new(n).unwrap()
    }

    #[test]
    fn mock_chip_decodes_blocks() {
        let mut chip = MockChip::new();
        chip.write(0x0010, s(2).control_byte(Bank::TxBuffer, Access::Write), &[1, 2, 3])
            .unwrap();

        assert_eq!(&chip.tx_buffer(s(2))[0x10..0x13], &[1, 2, 3]);
        assert!(chip.tx_buffer(s(1)).iter().all(|&b| b == 0));
    }

    #[test]
    fn mock_chip_command_register_clears_after_latency() {
        let mut chip = MockChip::new();
        chip.set_command_latency(2);
        let wr = s(0).control_byte(Bank::Registers, Access::Write);
        let rd = s(0).control_byte(Bank::Registers, Access::Read);

        chip.write_u8(register::SN_CR.offset, wr, 0x01).unwrap();
        assert_eq!(chip.read_u8(register::SN_CR.offset, rd).unwrap(), 0x01);
        assert_eq!(chip.read_u8(register::SN_CR.offset, rd).unwrap(), 0x01);
        assert_eq!(chip.read_u8(register::SN_CR.offset, rd).unwrap(), 0x00);
        assert_eq!(chip.commands(), &[(0, 0x01)]);
    }

    #[test]
    fn mock_chip_scripted_reads_come_first() {
        let mut chip = MockChip::new();
        chip.script_socket_u16(s(1), register::SN_RX_RSR, &[5, 6]);
        chip.set_socket_u16(s(1), register::SN_RX_RSR, 7);
        let rd = s(1).control_byte(Bank::Registers, Access::Read);

        let mut buf = [0u8; 2];
        let mut next = |chip: &mut MockChip| {
            chip.read(register::SN_RX_RSR.offset, rd, &mut buf).unwrap();
            u16::from_be_bytes(buf)
        };
        assert_eq!(next(&mut chip), 5);
        assert_eq!(next(&mut chip), 6);
        assert_eq!(next(&mut chip), 7);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn mock_chip_rejects_buffer_overrun() {
        let mut chip = MockChip::new();
        let mut buf = [0u8; 4];
        chip.read(2046, s(0).control_byte(Bank::RxBuffer, Access::Read), &mut buf)
            .unwrap();
    }

    #[test]
    fn mock_delay_tracking() {
        use embedded_hal::delay::DelayNs;

        let mut delay = MockDelay::new();
        delay.delay_ns(1000);
        delay.delay_us(2);
        assert_eq!(delay.total_ns(), 3000);
        delay.delay_ms(1);
        assert_eq!(delay.total_ms(), 1);
    }
}
