/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

use embedded_hal as hal;
use hal::blocking::i2c;

use super::{BusService, RegisterAddress, Timeout};

/// This encapsulates a blocking I2C master peripheral
/// so it can serve as the platform bus service.
///
/// embedded-hal transactions carry no timeout of their own, so the
/// `Timeout` passed to each call is not enforced here: the HAL's
/// peripheral configuration decides how long a stalled transaction waits.
pub struct HalI2c<I2C> {
    /// the I2C port to use when communicating
    i2c: I2C,
}

impl<I2C, CommE> HalI2c<I2C>
where
    I2C: i2c::Write<Error = CommE>
        + i2c::Read<Error = CommE>
        + i2c::WriteRead<Error = CommE>,
{
    pub fn new(i2c_port: I2C) -> Self {
        Self { i2c: i2c_port }
    }

    /// Give back the wrapped I2C peripheral
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C, CommE> BusService for HalI2c<I2C>
where
    I2C: i2c::Write<Error = CommE>
        + i2c::Read<Error = CommE>
        + i2c::WriteRead<Error = CommE>,
    CommE: core::fmt::Debug,
{
    type Error = CommE;

    fn transmit(
        &mut self,
        address: u8,
        data: &[u8],
        _timeout: Timeout,
    ) -> Result<(), Self::Error> {
        i2c::Write::write(&mut self.i2c, address, data)
    }

    fn receive(
        &mut self,
        address: u8,
        buffer: &mut [u8],
        _timeout: Timeout,
    ) -> Result<(), Self::Error> {
        i2c::Read::read(&mut self.i2c, address, buffer)
    }

    fn memory_read(
        &mut self,
        address: u8,
        register: RegisterAddress,
        buffer: &mut [u8],
        _timeout: Timeout,
    ) -> Result<(), Self::Error> {
        let mut reg_buf = [0u8; 2];
        let reg_bytes = register.encode(&mut reg_buf);
        i2c::WriteRead::write_read(&mut self.i2c, address, reg_bytes, buffer)
    }

    fn is_device_ready(
        &mut self,
        address: u8,
        attempts: u8,
        _timeout: Timeout,
    ) -> Result<(), Self::Error> {
        // an empty write is just the address byte: the device ACKs or it doesn't
        let mut remaining = attempts.max(1);
        loop {
            match i2c::Write::write(&mut self.i2c, address, &[]) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    remaining -= 1;
                    if remaining == 0 {
                        return Err(e);
                    }
                }
            }
        }
    }
}
