// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use modbus_pdu::{
    checksum::{check_crc, compute_crc, compute_lrc},
    CommStatus, DataStore, DeviceStatus, Exception, ExceptionResponse, FunctionCode, RequestPdu,
    Response, ResponsePdu, SlaveId, Table,
};
use std::collections::BTreeMap;

/// A sparse device: only addresses present in the maps exist.
#[derive(Default)]
struct Device {
    coils: BTreeMap<u16, bool>,
    holding_registers: BTreeMap<u16, u16>,
    events: Vec<u8>,
}

impl Device {
    fn with_holding_registers(range: std::ops::Range<u16>) -> Self {
        Self {
            holding_registers: range.clone().map(|addr| (addr, addr * 0x10)).collect(),
            coils: range.map(|addr| (addr, false)).collect(),
            ..Default::default()
        }
    }
}

impl DataStore for Device {
    fn validate(&self, table: Table, address: u16, count: u16) -> bool {
        let mut addresses = (address..).take(usize::from(count));
        match table {
            Table::Coils | Table::DiscreteInputs => {
                addresses.all(|addr| self.coils.contains_key(&addr))
            }
            Table::HoldingRegisters | Table::InputRegisters => {
                addresses.all(|addr| self.holding_registers.contains_key(&addr))
            }
        }
    }

    fn read_bits(&self, _: Table, address: u16, count: u16) -> Vec<bool> {
        (address..address + count).map(|addr| self.coils[&addr]).collect()
    }

    fn read_registers(&self, _: Table, address: u16, count: u16) -> Vec<u16> {
        (address..address + count)
            .map(|addr| self.holding_registers[&addr])
            .collect()
    }

    fn write_bits(&mut self, address: u16, bits: &[bool]) -> Result<(), Exception> {
        for (addr, bit) in (address..).zip(bits) {
            self.coils.insert(addr, *bit);
        }
        Ok(())
    }

    fn write_registers(&mut self, address: u16, words: &[u16]) -> Result<(), Exception> {
        for (addr, word) in (address..).zip(words) {
            self.holding_registers.insert(addr, *word);
        }
        Ok(())
    }
}

impl DeviceStatus for Device {
    fn exception_status_summary(&self) -> u8 {
        0x00
    }

    fn event_counter(&self) -> u16 {
        0x0010
    }

    fn bus_message_count(&self) -> u16 {
        0x0020
    }

    fn event_log(&self) -> Vec<u8> {
        self.events.clone()
    }

    fn slave_id_summary(&self) -> (SlaveId, bool) {
        (5, true)
    }
}

/// Decode, execute and encode a request the way a server does.
fn serve(device: &mut Device, fn_code: u8, payload: &[u8]) -> Vec<u8> {
    let RequestPdu(req) = RequestPdu::decode(fn_code, payload).unwrap();
    let rsp = req.execute(device);
    let mut pdu = vec![rsp.function_byte()];
    pdu.extend(rsp.encode().unwrap());
    pdu
}

#[test]
fn read_exception_status() {
    let mut dev = Device::default();
    assert_eq!(serve(&mut dev, 0x07, &[]), [0x07, 0x00]);
}

#[test]
fn get_comm_event_counter() {
    let mut dev = Device::default();
    assert_eq!(serve(&mut dev, 0x0B, &[]), [0x0B, 0x00, 0x00, 0x00, 0x10]);
}

#[test]
fn get_comm_event_log() {
    let mut dev = Device {
        events: vec![0x20, 0x00],
        ..Default::default()
    };
    assert_eq!(
        serve(&mut dev, 0x0C, &[]),
        [0x0C, 0x08, 0x00, 0x00, 0x00, 0x10, 0x00, 0x20, 0x20, 0x00]
    );
}

#[test]
fn report_server_id() {
    let mut dev = Device::default();
    assert_eq!(serve(&mut dev, 0x11, &[]), [0x11, 0x03, 0x05, 0xFF]);
}

#[test]
fn read_too_many_registers() {
    let mut dev = Device::with_holding_registers(0..10);
    assert_eq!(serve(&mut dev, 0x03, &[0x00, 0x00, 0x08, 0x00]), [0x83, 0x03]);
}

#[test]
fn read_missing_registers() {
    let mut dev = Device::with_holding_registers(0..10);
    assert_eq!(serve(&mut dev, 0x03, &[0x00, 0x08, 0x00, 0x03]), [0x83, 0x02]);
}

#[test]
fn write_then_read_registers() {
    let mut dev = Device::with_holding_registers(0..10);
    assert_eq!(
        serve(&mut dev, 0x10, &[0x00, 0x01, 0x00, 0x02, 0x04, 0xAB, 0xCD, 0x12, 0x34]),
        [0x10, 0x00, 0x01, 0x00, 0x02]
    );
    assert_eq!(
        serve(&mut dev, 0x03, &[0x00, 0x00, 0x00, 0x03]),
        [0x03, 0x06, 0x00, 0x00, 0xAB, 0xCD, 0x12, 0x34]
    );
}

#[test]
fn read_write_multiple_registers() {
    let mut dev = Device::with_holding_registers(0..10);
    let payload = [
        0x00, 0x03, 0x00, 0x02, // read 2 registers at 3
        0x00, 0x04, 0x00, 0x01, 0x02, 0xBE, 0xEF, // write 1 register at 4
    ];
    assert_eq!(
        serve(&mut dev, 0x17, &payload),
        [0x17, 0x04, 0x00, 0x30, 0xBE, 0xEF]
    );
}

#[test]
fn write_and_read_coils() {
    let mut dev = Device::with_holding_registers(0..16);
    assert_eq!(
        serve(&mut dev, 0x05, &[0x00, 0x02, 0xFF, 0x00]),
        [0x05, 0x00, 0x02, 0xFF, 0x00]
    );
    assert_eq!(
        serve(&mut dev, 0x0F, &[0x00, 0x08, 0x00, 0x03, 0x01, 0b101]),
        [0x0F, 0x00, 0x08, 0x00, 0x03]
    );
    assert_eq!(
        serve(&mut dev, 0x01, &[0x00, 0x00, 0x00, 0x0B]),
        [0x01, 0x02, 0b0000_0100, 0b0000_0101]
    );
}

#[test]
fn unsupported_function() {
    let mut dev = Device::default();
    assert_eq!(serve(&mut dev, 0x41, &[0x12]), [0xC1, 0x01]);
}

#[test]
fn decode_exception_response() {
    let ResponsePdu(rsp) = ResponsePdu::decode(0x83, &[0x02]).unwrap();
    let ex = rsp.unwrap_err();
    assert_eq!(ex.function, FunctionCode::ReadHoldingRegisters);
    assert_eq!(ex.exception, Exception::IllegalDataAddress);
    let bytes: [u8; 2] = ex.into();
    assert_eq!(bytes, [0x83, 0x02]);
    assert_eq!(ExceptionResponse::try_from(&bytes[..]), Ok(ex));
}

#[test]
fn decode_diagnostic_responses() {
    let ResponsePdu(rsp) = ResponsePdu::decode(0x0B, &[0xFF, 0xFF, 0x00, 0x03]).unwrap();
    assert_eq!(rsp, Ok(Response::GetCommEventCounter(CommStatus::Busy, 3)));
    let ResponsePdu(rsp) = ResponsePdu::decode(0x11, &[0x03, 0x2A, 0x00]).unwrap();
    assert_eq!(rsp, Ok(Response::ReportServerId(0x2A, false)));
    assert!(ResponsePdu::decode(0x11, &[0x03, 0x2A]).is_err());
}

#[test]
fn rtu_checksum_over_a_served_pdu() {
    let mut dev = Device::with_holding_registers(0..10);
    let mut adu = vec![0x01];
    adu.extend(serve(&mut dev, 0x03, &[0x00, 0x02, 0x00, 0x02]));
    assert_eq!(adu, [0x01, 0x03, 0x04, 0x00, 0x20, 0x00, 0x30]);
    let crc = compute_crc(&adu);
    assert!(check_crc(&adu, crc));
    adu.extend_from_slice(&crc.to_le_bytes());
    assert_eq!(compute_crc(&adu), 0);
}

#[test]
fn ascii_checksum_of_a_request() {
    // :010300000001FB
    assert_eq!(compute_lrc(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x01]), 0xFB);
}
