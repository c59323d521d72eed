/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

use core::cell::RefCell;

use crate::interface::{BusService, DeviceInterface, RegisterAddress, Timeout};
use crate::log::{debug, trace};
use crate::Error;

/// Factory default I2C (DDC) address of u-blox modules
pub const DEFAULT_ADDRESS: u8 = 0x42;

/// The device exposes its queued byte count in registers 0xFD (high byte)
/// and 0xFE (low byte)
pub const BYTES_AVAILABLE_REGISTER: u8 = 0xFD;

/// Longest transfer a single write or read call may carry
const MAX_TRANSFER_LEN: usize = u8::MAX as usize;

/// Presence-check settings handed to the bus service by `probe`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeConfig {
    /// Number of address attempts before the device is declared absent
    pub attempts: u8,
    /// Per-attempt timeout
    pub timeout: Timeout,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Timeout::Millis(5),
        }
    }
}

/// Address-scoped byte transport over a shared I2C bus handle.
///
/// The bus handle is borrowed, never owned: several transports addressing
/// different peripherals may hold the same `RefCell`. Keeping the handle alive
/// and serializing access to the physical bus are the caller's job.
///
/// A transport starts unbound; every transfer fails with the sentinel value
/// until `bind` has supplied a handle. Once bound it stays bound.
pub struct BusTransport<'a, B> {
    /// the shared bus service, if bound
    bus: Option<&'a RefCell<B>>,
    /// 7-bit peripheral address
    address: u8,
    probe_config: ProbeConfig,
}

impl<'a, B> Default for BusTransport<'a, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, B> BusTransport<'a, B> {
    pub fn new() -> Self {
        Self::with_probe_config(ProbeConfig::default())
    }

    pub fn with_probe_config(probe_config: ProbeConfig) -> Self {
        Self {
            bus: None,
            address: 0,
            probe_config,
        }
    }

    /// Attach to a bus handle and peripheral address.
    ///
    /// The first handle supplied is kept; later calls leave it in place and
    /// only replace the address. This lets a caller follow a runtime address
    /// change without touching the shared handle. The address is not
    /// range-checked.
    ///
    /// Always returns `true`: reachability is only established by `probe`.
    pub fn bind(&mut self, bus: &'a RefCell<B>, address: u8) -> bool {
        if self.bus.is_none() {
            self.bus = Some(bus);
        }
        self.address = address;
        debug!("bus transport bound to address {=u8:#x}", self.address);
        true
    }

    pub fn is_bound(&self) -> bool {
        self.bus.is_some()
    }

    /// The currently bound peripheral address
    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn probe_config(&self) -> ProbeConfig {
        self.probe_config
    }
}

impl<'a, B, CommE> BusTransport<'a, B>
where
    B: BusService<Error = CommE>,
    CommE: core::fmt::Debug,
{
    /// Run `f` against the bound bus service.
    fn with_bus<T>(
        &self,
        f: impl FnOnce(&mut B, u8) -> Result<T, CommE>,
    ) -> Result<T, Error<CommE>> {
        let bus = self.bus.ok_or(Error::NotBound)?;
        let mut bus = bus.try_borrow_mut().map_err(|_| Error::BusBusy)?;
        f(&mut *bus, self.address).map_err(Error::Comm)
    }

    /// Presence check at the bound address, with the configured retries.
    pub fn try_probe(&mut self) -> Result<(), Error<CommE>> {
        let cfg = self.probe_config;
        self.with_bus(|bus, addr| {
            bus.is_device_ready(addr, cfg.attempts, cfg.timeout)
        })
    }

    /// Read the device's queued byte count.
    pub fn try_available(&mut self) -> Result<u16, Error<CommE>> {
        let mut count = [0u8; 2];
        self.with_bus(|bus, addr| {
            bus.memory_read(
                addr,
                RegisterAddress::Bits8(BYTES_AVAILABLE_REGISTER),
                &mut count,
                Timeout::Forever,
            )
        })?;
        Ok(u16::from_be_bytes(count))
    }

    /// Write all of `data` in a single transaction.
    /// An empty slice returns `Ok(0)` without touching the bus.
    pub fn try_write(&mut self, data: &[u8]) -> Result<u8, Error<CommE>> {
        if data.is_empty() {
            return Ok(0);
        }
        if data.len() > MAX_TRANSFER_LEN {
            return Err(Error::Oversize);
        }
        self.with_bus(|bus, addr| bus.transmit(addr, data, Timeout::Forever))?;
        Ok(data.len() as u8)
    }

    /// Fill all of `buffer` in a single transaction.
    /// An empty buffer returns `Ok(0)` without touching the bus.
    pub fn try_read(&mut self, buffer: &mut [u8]) -> Result<u8, Error<CommE>> {
        if buffer.is_empty() {
            return Ok(0);
        }
        if buffer.len() > MAX_TRANSFER_LEN {
            return Err(Error::Oversize);
        }
        let len = buffer.len() as u8;
        self.with_bus(|bus, addr| bus.receive(addr, buffer, Timeout::Forever))?;
        Ok(len)
    }

    /// Is a device acknowledging at the bound address?
    /// `false` when unbound or on any bus failure.
    pub fn probe(&mut self) -> bool {
        narrow(self.try_probe()).is_some()
    }

    /// Bytes queued on the device.
    ///
    /// Zero is ambiguous: it is returned when nothing is queued, when the
    /// transport is unbound, and when the register read fails.
    pub fn query_available(&mut self) -> u16 {
        narrow(self.try_available()).unwrap_or(0)
    }

    /// Write `data` in one transaction: returns its length, or 0 on failure.
    /// No partial counts are reported and nothing is retried.
    pub fn write_bytes(&mut self, data: &[u8]) -> u8 {
        narrow(self.try_write(data)).unwrap_or(0)
    }

    /// Fill `buffer` in one transaction: returns its length, or 0 on failure.
    pub fn read_bytes(&mut self, buffer: &mut [u8]) -> u8 {
        narrow(self.try_read(buffer)).unwrap_or(0)
    }
}

/// Collapse a failure to `None` at the sentinel boundary
fn narrow<T, CommE: core::fmt::Debug>(res: Result<T, Error<CommE>>) -> Option<T> {
    match res {
        Ok(val) => Some(val),
        Err(_err) => {
            trace!("bus transfer failed: {:?}", defmt::Debug2Format(&_err));
            None
        }
    }
}

impl<'a, B, CommE> DeviceInterface for BusTransport<'a, B>
where
    B: BusService<Error = CommE>,
    CommE: core::fmt::Debug,
{
    fn ping(&mut self) -> bool {
        self.probe()
    }

    fn available(&mut self) -> u16 {
        self.query_available()
    }

    fn write_bytes(&mut self, data: &[u8]) -> u8 {
        BusTransport::write_bytes(self, data)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> u8 {
        BusTransport::read_bytes(self, buffer)
    }
}
