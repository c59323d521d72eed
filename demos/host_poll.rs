/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

use core::cell::RefCell;

use embedded_hal::blocking::i2c;
use ublox_bus::{BusTransport, DeviceInterface, HalI2c, DEFAULT_ADDRESS};

/// This example runs on the host against a scripted I2C master
/// that behaves like a u-blox module answering a UBX-NAV-PVT poll.
/// On a board, swap `ScriptedModule` for the HAL's I2C peripheral.
///
/// Run with `cargo run --example host_poll`
fn main() {
    let i2c_port = ScriptedModule::new(DEFAULT_ADDRESS, &NAV_PVT_ACK);
    let bus = RefCell::new(HalI2c::new(i2c_port));

    let mut gnss = BusTransport::new();
    gnss.bind(&bus, DEFAULT_ADDRESS);
    poll_once(&mut gnss);

    // the module was reconfigured to another address: only the address moves
    gnss.bind(&bus, 0x43);
    println!("after rebind to 0x43: present = {}", gnss.ping());
}

fn poll_once(di: &mut impl DeviceInterface) {
    if !di.ping() {
        println!("no module acknowledging");
        return;
    }

    // UBX-NAV-PVT poll request: sync chars, class/id, empty payload, checksum
    const POLL_NAV_PVT: [u8; 8] = [0xB5, 0x62, 0x01, 0x07, 0x00, 0x00, 0x08, 0x19];
    let written = di.write_bytes(&POLL_NAV_PVT);
    println!("wrote {} bytes", written);

    let queued = di.available() as usize;
    let mut read_buf = [0u8; 255];
    let len = queued.min(read_buf.len());
    let read = di.read_bytes(&mut read_buf[..len]);
    println!("{} queued, read {}: {:x?}", queued, read, &read_buf[..read as usize]);
}

/// Stand-in module response: a UBX-ACK-ACK for class 0x01 id 0x07
const NAV_PVT_ACK: [u8; 10] = [0xB5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x01, 0x07, 0x10, 0x39];

#[derive(Debug)]
struct Nack;

/// I2C master that answers only at one address, serving a fixed response
/// once something has been written to it
struct ScriptedModule {
    address: u8,
    response: Vec<u8>,
    queued: Vec<u8>,
}

impl ScriptedModule {
    fn new(address: u8, response: &[u8]) -> Self {
        Self {
            address,
            response: response.to_vec(),
            queued: Vec::new(),
        }
    }

    fn check(&self, address: u8) -> Result<(), Nack> {
        if address == self.address {
            Ok(())
        } else {
            Err(Nack)
        }
    }
}

impl i2c::Write for ScriptedModule {
    type Error = Nack;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Nack> {
        self.check(address)?;
        if !bytes.is_empty() {
            self.queued = self.response.clone();
        }
        Ok(())
    }
}

impl i2c::Read for ScriptedModule {
    type Error = Nack;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Nack> {
        self.check(address)?;
        let n = buffer.len().min(self.queued.len());
        buffer[..n].copy_from_slice(&self.queued[..n]);
        self.queued.drain(..n);
        Ok(())
    }
}

impl i2c::WriteRead for ScriptedModule {
    type Error = Nack;

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Nack> {
        self.check(address)?;
        // 0xFD/0xFE hold the queued byte count, big-endian
        if bytes == [0xFD] && buffer.len() == 2 {
            let count = self.queued.len() as u16;
            buffer.copy_from_slice(&count.to_be_bytes());
        }
        Ok(())
    }
}
