/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Mock bus service for testing

use super::{BusService, RegisterAddress, Timeout};
use std::vec::Vec;

/// Bus transaction recorded by [`MockBus`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusTransaction {
    Transmit { addr: u8, data: Vec<u8> },
    Receive { addr: u8, len: usize },
    MemoryRead { addr: u8, register: RegisterAddress, len: usize },
    DeviceReady { addr: u8, attempts: u8, timeout: Timeout },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Mock bus service
///
/// Records all transactions and answers them from scripted state.
#[derive(Debug, Default)]
pub struct MockBus {
    transactions: Vec<BusTransaction>,
    /// Every transaction fails when set
    pub fail: bool,
    /// Whether the device acknowledges presence checks
    pub ready: bool,
    /// Register contents returned by `memory_read`
    pub registers: Vec<u8>,
    /// Bytes returned by `receive`, consumed front to back
    pub rx_data: Vec<u8>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            ready: true,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// A device that never acknowledges presence checks
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    pub fn with_registers(registers: &[u8]) -> Self {
        Self {
            registers: registers.to_vec(),
            ..Self::new()
        }
    }

    pub fn with_rx_data(rx_data: &[u8]) -> Self {
        Self {
            rx_data: rx_data.to_vec(),
            ..Self::new()
        }
    }

    /// Queue bytes for later `receive` calls
    pub fn queue_rx(mut self, rx_data: &[u8]) -> Self {
        self.rx_data.extend_from_slice(rx_data);
        self
    }

    pub fn transactions(&self) -> &[BusTransaction] {
        &self.transactions
    }

    fn status(&self) -> Result<(), MockError> {
        if self.fail {
            Err(MockError)
        } else {
            Ok(())
        }
    }
}

impl BusService for MockBus {
    type Error = MockError;

    fn transmit(
        &mut self,
        address: u8,
        data: &[u8],
        _timeout: Timeout,
    ) -> Result<(), Self::Error> {
        self.transactions.push(BusTransaction::Transmit {
            addr: address,
            data: data.to_vec(),
        });
        self.status()
    }

    fn receive(
        &mut self,
        address: u8,
        buffer: &mut [u8],
        _timeout: Timeout,
    ) -> Result<(), Self::Error> {
        self.transactions.push(BusTransaction::Receive {
            addr: address,
            len: buffer.len(),
        });
        self.status()?;
        let to_read = core::cmp::min(buffer.len(), self.rx_data.len());
        buffer[..to_read].copy_from_slice(&self.rx_data[..to_read]);
        self.rx_data.drain(..to_read);
        Ok(())
    }

    fn memory_read(
        &mut self,
        address: u8,
        register: RegisterAddress,
        buffer: &mut [u8],
        _timeout: Timeout,
    ) -> Result<(), Self::Error> {
        self.transactions.push(BusTransaction::MemoryRead {
            addr: address,
            register,
            len: buffer.len(),
        });
        self.status()?;
        let to_read = core::cmp::min(buffer.len(), self.registers.len());
        buffer[..to_read].copy_from_slice(&self.registers[..to_read]);
        Ok(())
    }

    fn is_device_ready(
        &mut self,
        address: u8,
        attempts: u8,
        timeout: Timeout,
    ) -> Result<(), Self::Error> {
        self.transactions.push(BusTransaction::DeviceReady {
            addr: address,
            attempts,
            timeout,
        });
        self.status()?;
        if self.ready {
            Ok(())
        } else {
            Err(MockError)
        }
    }
}
