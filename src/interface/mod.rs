/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

pub mod i2c;
pub use self::i2c::HalI2c;

#[cfg(test)]
pub(crate) mod mock;

/// How long the bus service may wait for a single transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Wait until the transaction completes
    Forever,
    /// Give up after this many milliseconds
    Millis(u32),
}

/// A peripheral register address, with its on-the-wire width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterAddress {
    Bits8(u8),
    /// Sent most-significant byte first
    Bits16(u16),
}

impl RegisterAddress {
    /// Write the address bytes into `buf`, returning the used prefix
    pub fn encode<'b>(&self, buf: &'b mut [u8; 2]) -> &'b [u8] {
        match *self {
            RegisterAddress::Bits8(reg) => {
                buf[0] = reg;
                &buf[..1]
            }
            RegisterAddress::Bits16(reg) => {
                *buf = reg.to_be_bytes();
                &buf[..]
            }
        }
    }
}

/// Low-level platform bus service: blocking transactions against
/// a 7-bit peripheral address.
///
/// Implementations report any outcome other than a completed,
/// acknowledged transaction as `Err`.
pub trait BusService {
    /// Bus service associated error type
    type Error: core::fmt::Debug;

    /// Write all of `data` to the peripheral at `address`.
    fn transmit(
        &mut self,
        address: u8,
        data: &[u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;

    /// Fill all of `buffer` from the peripheral at `address`.
    fn receive(
        &mut self,
        address: u8,
        buffer: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;

    /// Random-access read: select `register`, then fill `buffer`
    /// starting from it.
    fn memory_read(
        &mut self,
        address: u8,
        register: RegisterAddress,
        buffer: &mut [u8],
        timeout: Timeout,
    ) -> Result<(), Self::Error>;

    /// Check whether the peripheral at `address` acknowledges,
    /// trying up to `attempts` times.
    fn is_device_ready(
        &mut self,
        address: u8,
        attempts: u8,
        timeout: Timeout,
    ) -> Result<(), Self::Error>;
}

/// A method of exchanging raw bytes with the device.
///
/// Failures are reported as sentinel values: `false` or `0`.
pub trait DeviceInterface {
    /// Is the device connected and acknowledging?
    fn ping(&mut self) -> bool;

    /// Number of bytes the device has queued for us to read.
    fn available(&mut self) -> u16;

    /// Write all of `data` in one transaction.
    /// Returns the number of bytes written: all of them, or zero.
    fn write_bytes(&mut self, data: &[u8]) -> u8;

    /// Fill all of `buffer` in one transaction.
    /// Returns the number of bytes read: all of them, or zero.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> u8;
}
