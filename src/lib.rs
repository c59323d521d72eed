/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

#![cfg_attr(not(test), no_std)]

mod log;

mod interface;
pub use interface::{
    BusService, DeviceInterface, HalI2c, RegisterAddress, Timeout,
};

mod transport;
pub use transport::{
    BusTransport, ProbeConfig, BYTES_AVAILABLE_REGISTER, DEFAULT_ADDRESS,
};

/// Errors in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<CommE> {
    /// Bus service reported a failed transaction
    /// (NACK, timeout, arbitration loss, bus fault)
    Comm(CommE),

    /// No bus handle has been bound yet
    NotBound,

    /// The shared bus handle is already borrowed by another caller
    BusBusy,

    /// Transfer longer than a single transaction may carry
    Oversize,
}
