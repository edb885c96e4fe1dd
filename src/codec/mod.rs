// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{error::*, frame::*, util::*};
use alloc::{vec, vec::Vec};
use byteorder::{BigEndian, ByteOrder};

/// Encoding and decoding of the payload that follows the function code.
///
/// The function code itself and any transport framing are not part
/// of the payload.
pub trait Pdu: Sized {
    /// The function code of the message.
    fn function_code(&self) -> FunctionCode;

    /// Encode the payload.
    fn encode(&self) -> Result<Vec<u8>>;

    /// Decode the payload of an already resolved function code.
    fn decode(function: FunctionCode, payload: &[u8]) -> Result<Self>;
}

impl TryFrom<u8> for Exception {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        use crate::frame::Exception::*;
        let ex = match code {
            0x01 => IllegalFunction,
            0x02 => IllegalDataAddress,
            0x03 => IllegalDataValue,
            0x04 => ServerDeviceFailure,
            0x05 => Acknowledge,
            0x06 => ServerDeviceBusy,
            0x08 => MemoryParityError,
            0x0A => GatewayPathUnavailable,
            0x0B => GatewayTargetDevice,
            _ => {
                return Err(Error::ExceptionCode(code));
            }
        };
        Ok(ex)
    }
}

impl From<ExceptionResponse> for [u8; 2] {
    fn from(ex: ExceptionResponse) -> [u8; 2] {
        let fn_code: u8 = ex.function.into();
        debug_assert!(fn_code < 0x80);
        [fn_code | 0x80, ex.exception.code()]
    }
}

impl TryFrom<&[u8]> for ExceptionResponse {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let &[fn_err_code, code] = bytes else {
            return Err(Error::MalformedPayload(2, bytes.len()));
        };
        if fn_err_code < 0x80 {
            return Err(Error::ExceptionFnCode(fn_err_code));
        }
        ExceptionResponse::decode((fn_err_code & 0x7F).into(), &[code])
    }
}

impl Pdu for ExceptionResponse {
    fn function_code(&self) -> FunctionCode {
        self.function
    }

    fn encode(&self) -> Result<Vec<u8>> {
        Ok(vec![self.exception.code()])
    }

    fn decode(function: FunctionCode, payload: &[u8]) -> Result<Self> {
        let &[code] = payload else {
            return Err(Error::MalformedPayload(1, payload.len()));
        };
        let exception = Exception::try_from(code)?;
        Ok(ExceptionResponse {
            function,
            exception,
        })
    }
}

impl Pdu for Request {
    fn function_code(&self) -> FunctionCode {
        self.into()
    }

    fn encode(&self) -> Result<Vec<u8>> {
        use crate::frame::Request::*;

        let mut buf = vec![0; self.pdu_len() - 1];
        match self {
            ReadCoils(address, quantity)
            | ReadDiscreteInputs(address, quantity)
            | ReadInputRegisters(address, quantity)
            | ReadHoldingRegisters(address, quantity)
            | WriteSingleRegister(address, quantity) => {
                BigEndian::write_u16(&mut buf[0..], *address);
                BigEndian::write_u16(&mut buf[2..], *quantity);
            }
            WriteSingleCoil(address, state) => {
                BigEndian::write_u16(&mut buf[0..], *address);
                BigEndian::write_u16(&mut buf[2..], bool_to_u16_coil(*state));
            }
            WriteMultipleCoils(address, coils) => {
                BigEndian::write_u16(&mut buf[0..], *address);
                BigEndian::write_u16(&mut buf[2..], quantity_of(coils.len())?);
                buf[4] = byte_count_of(coils.packed_len())?;
                buf[5..].copy_from_slice(coils.payload());
            }
            WriteMultipleRegisters(address, words) => {
                BigEndian::write_u16(&mut buf[0..], *address);
                BigEndian::write_u16(&mut buf[2..], quantity_of(words.len())?);
                buf[4] = byte_count_of(words.payload().len())?;
                buf[5..].copy_from_slice(words.payload());
            }
            ReadWriteMultipleRegisters(read_address, read_quantity, write_address, words) => {
                BigEndian::write_u16(&mut buf[0..], *read_address);
                BigEndian::write_u16(&mut buf[2..], *read_quantity);
                BigEndian::write_u16(&mut buf[4..], *write_address);
                BigEndian::write_u16(&mut buf[6..], quantity_of(words.len())?);
                buf[8] = byte_count_of(words.payload().len())?;
                buf[9..].copy_from_slice(words.payload());
            }
            ReadExceptionStatus | GetCommEventCounter | GetCommEventLog | ReportServerId => {}
            Custom(_, data) => {
                buf.copy_from_slice(data);
            }
        }
        Ok(buf)
    }

    fn decode(function: FunctionCode, payload: &[u8]) -> Result<Self> {
        use crate::frame::Request::*;
        use FunctionCode as f;

        let req = match function {
            f::ReadCoils
            | f::ReadDiscreteInputs
            | f::ReadInputRegisters
            | f::ReadHoldingRegisters
            | f::WriteSingleRegister => {
                let (addr, quantity) = read_u16_pair(payload)?;
                match function {
                    f::ReadCoils => ReadCoils(addr, quantity),
                    f::ReadDiscreteInputs => ReadDiscreteInputs(addr, quantity),
                    f::ReadInputRegisters => ReadInputRegisters(addr, quantity),
                    f::ReadHoldingRegisters => ReadHoldingRegisters(addr, quantity),
                    f::WriteSingleRegister => WriteSingleRegister(addr, quantity),
                    _ => unreachable!(),
                }
            }
            f::WriteSingleCoil => {
                let (addr, value) = read_u16_pair(payload)?;
                WriteSingleCoil(addr, u16_coil_to_bool(value)?)
            }
            f::WriteMultipleCoils => {
                let (address, quantity, data) = read_write_header(payload, 0)?;
                let quantity = usize::from(quantity);
                if data.len() != packed_coils_len(quantity) {
                    return Err(Error::ByteCount(data.len()));
                }
                let coils = Coils {
                    quantity,
                    data: data.to_vec(),
                };
                WriteMultipleCoils(address, coils)
            }
            f::WriteMultipleRegisters => {
                let (address, quantity, data) = read_write_header(payload, 0)?;
                let data = words_of(quantity, data)?;
                WriteMultipleRegisters(address, data)
            }
            f::ReadWriteMultipleRegisters => {
                if payload.len() < 4 {
                    return Err(Error::MalformedPayload(9, payload.len()));
                }
                let (read_address, read_quantity) = read_u16_pair(&payload[..4])?;
                let (write_address, write_quantity, data) = read_write_header(payload, 4)?;
                let data = words_of(write_quantity, data)?;
                ReadWriteMultipleRegisters(read_address, read_quantity, write_address, data)
            }
            // No parameters
            f::ReadExceptionStatus => ReadExceptionStatus,
            f::GetCommEventCounter => GetCommEventCounter,
            f::GetCommEventLog => GetCommEventLog,
            f::ReportServerId => ReportServerId,
            f::Custom(code) => match code {
                code if code < 0x80 => Custom(function, payload.to_vec()),
                _ => return Err(Error::FnCode(code)),
            },
        };
        Ok(req)
    }
}

impl Pdu for Response {
    fn function_code(&self) -> FunctionCode {
        self.into()
    }

    fn encode(&self) -> Result<Vec<u8>> {
        use crate::frame::Response::*;

        let mut buf = vec![0; self.pdu_len() - 1];
        match self {
            ReadCoils(coils) | ReadDiscreteInputs(coils) => {
                buf[0] = byte_count_of(coils.packed_len())?;
                buf[1..].copy_from_slice(coils.payload());
            }
            ReadInputRegisters(words)
            | ReadHoldingRegisters(words)
            | ReadWriteMultipleRegisters(words) => {
                buf[0] = byte_count_of(words.payload().len())?;
                buf[1..].copy_from_slice(words.payload());
            }
            WriteSingleCoil(address, state) => {
                BigEndian::write_u16(&mut buf[0..], *address);
                BigEndian::write_u16(&mut buf[2..], bool_to_u16_coil(*state));
            }
            WriteMultipleCoils(address, payload)
            | WriteSingleRegister(address, payload)
            | WriteMultipleRegisters(address, payload) => {
                BigEndian::write_u16(&mut buf[0..], *address);
                BigEndian::write_u16(&mut buf[2..], *payload);
            }
            ReadExceptionStatus(status) => {
                buf[0] = *status;
            }
            GetCommEventCounter(status, event_count) => {
                BigEndian::write_u16(&mut buf[0..], status.word());
                BigEndian::write_u16(&mut buf[2..], *event_count);
            }
            GetCommEventLog(status, event_count, message_count, events) => {
                buf[0] = byte_count_of(6 + events.len())?;
                BigEndian::write_u16(&mut buf[1..], status.word());
                BigEndian::write_u16(&mut buf[3..], *event_count);
                BigEndian::write_u16(&mut buf[5..], *message_count);
                buf[7..].copy_from_slice(events);
            }
            ReportServerId(server_id, run_status) => {
                buf[0] = REPORT_SERVER_ID_LEN;
                buf[1] = *server_id;
                buf[2] = if *run_status { 0xFF } else { 0x00 };
            }
            Custom(_, data) => {
                buf.copy_from_slice(data);
            }
        }
        Ok(buf)
    }

    fn decode(function: FunctionCode, payload: &[u8]) -> Result<Self> {
        use crate::frame::Response::*;
        use FunctionCode as f;

        let rsp = match function {
            f::ReadCoils | f::ReadDiscreteInputs => {
                let data = read_byte_count_prefixed(payload)?;
                // Here we have not information about the exact requested quantity
                // therefore we just assume that the whole byte is meant.
                let quantity = data.len() * 8;
                let coils = Coils {
                    quantity,
                    data: data.to_vec(),
                };
                match function {
                    f::ReadCoils => ReadCoils(coils),
                    f::ReadDiscreteInputs => ReadDiscreteInputs(coils),
                    _ => unreachable!(),
                }
            }
            f::WriteSingleCoil => {
                let (addr, value) = read_u16_pair(payload)?;
                WriteSingleCoil(addr, u16_coil_to_bool(value)?)
            }
            f::WriteMultipleCoils | f::WriteSingleRegister | f::WriteMultipleRegisters => {
                let (addr, payload) = read_u16_pair(payload)?;
                match function {
                    f::WriteMultipleCoils => WriteMultipleCoils(addr, payload),
                    f::WriteSingleRegister => WriteSingleRegister(addr, payload),
                    f::WriteMultipleRegisters => WriteMultipleRegisters(addr, payload),
                    _ => unreachable!(),
                }
            }
            f::ReadInputRegisters | f::ReadHoldingRegisters | f::ReadWriteMultipleRegisters => {
                let data = read_byte_count_prefixed(payload)?;
                if data.len() % 2 != 0 {
                    // one byte of the last word is missing
                    return Err(Error::MalformedPayload(payload.len() + 1, payload.len()));
                }
                let data = Data {
                    quantity: data.len() / 2,
                    data: data.to_vec(),
                };
                match function {
                    f::ReadInputRegisters => ReadInputRegisters(data),
                    f::ReadHoldingRegisters => ReadHoldingRegisters(data),
                    f::ReadWriteMultipleRegisters => ReadWriteMultipleRegisters(data),
                    _ => unreachable!(),
                }
            }
            f::ReadExceptionStatus => {
                let &[status] = payload else {
                    return Err(Error::MalformedPayload(1, payload.len()));
                };
                ReadExceptionStatus(status)
            }
            f::GetCommEventCounter => {
                let (status, event_count) = read_u16_pair(payload)?;
                GetCommEventCounter(CommStatus::from_word(status), event_count)
            }
            f::GetCommEventLog => {
                let data = read_byte_count_prefixed(payload)?;
                if data.len() < 6 {
                    return Err(Error::MalformedPayload(7, payload.len()));
                }
                let (counters, events) = data.split_at(6);
                GetCommEventLog(
                    CommStatus::from_word(BigEndian::read_u16(&counters[0..2])),
                    BigEndian::read_u16(&counters[2..4]),
                    BigEndian::read_u16(&counters[4..6]),
                    events.to_vec(),
                )
            }
            f::ReportServerId => {
                let &[byte_count, server_id, run_status] = payload else {
                    return Err(Error::MalformedPayload(3, payload.len()));
                };
                if byte_count != REPORT_SERVER_ID_LEN {
                    return Err(Error::MalformedPayload(
                        REPORT_SERVER_ID_LEN.into(),
                        byte_count.into(),
                    ));
                }
                ReportServerId(server_id, run_status == 0xFF)
            }
            f::Custom(_) => Custom(function, payload.to_vec()),
        };
        Ok(rsp)
    }
}

impl RequestPdu {
    /// Decode a request from its function code byte and payload.
    pub fn decode(fn_code: u8, payload: &[u8]) -> Result<Self> {
        let req = Request::decode(fn_code.into(), payload);
        #[cfg(feature = "log")]
        let req = req.inspect_err(|err| {
            log::error!("Failed to decode request PDU 0x{fn_code:0>2X}: {err}");
        });
        req.map(RequestPdu)
    }
}

impl ResponsePdu {
    /// Decode a response from its function code byte and payload.
    ///
    /// A function code with the high bit set denotes an exception response.
    pub fn decode(fn_code: u8, payload: &[u8]) -> Result<Self> {
        let rsp = if fn_code >= 0x80 {
            ExceptionResponse::decode((fn_code & 0x7F).into(), payload).map(Err)
        } else {
            Response::decode(fn_code.into(), payload).map(Ok)
        };
        #[cfg(feature = "log")]
        let rsp = rsp.inspect_err(|err| {
            log::error!("Failed to decode response PDU 0x{fn_code:0>2X}: {err}");
        });
        rsp.map(ResponsePdu)
    }

    /// The function code byte to transmit in front of the payload.
    #[must_use]
    pub fn function_byte(&self) -> u8 {
        match &self.0 {
            Ok(rsp) => FunctionCode::from(rsp).value(),
            Err(ex) => ex.function.value() | 0x80,
        }
    }

    /// Encode the payload of the response or exception.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match &self.0 {
            Ok(rsp) => rsp.encode(),
            Err(ex) => ex.encode(),
        }
    }
}

impl From<Response> for ResponsePdu {
    fn from(rsp: Response) -> Self {
        ResponsePdu(Ok(rsp))
    }
}

impl From<ExceptionResponse> for ResponsePdu {
    fn from(ex: ExceptionResponse) -> Self {
        ResponsePdu(Err(ex))
    }
}

/// Value of the length byte of a `Report Server ID` response.
const REPORT_SERVER_ID_LEN: u8 = 0x03;

fn read_u16_pair(payload: &[u8]) -> Result<(u16, u16)> {
    if payload.len() != 4 {
        return Err(Error::MalformedPayload(4, payload.len()));
    }
    Ok((
        BigEndian::read_u16(&payload[0..2]),
        BigEndian::read_u16(&payload[2..4]),
    ))
}

/// The data behind a leading byte count that must cover the rest
/// of the payload.
fn read_byte_count_prefixed(payload: &[u8]) -> Result<&[u8]> {
    let Some((&byte_count, data)) = payload.split_first() else {
        return Err(Error::MalformedPayload(1, 0));
    };
    if data.len() != usize::from(byte_count) {
        return Err(Error::MalformedPayload(
            1 + usize::from(byte_count),
            payload.len(),
        ));
    }
    Ok(data)
}

/// Address, quantity and data of a multiple write starting at `offset`.
fn read_write_header(payload: &[u8], offset: usize) -> Result<(Address, Quantity, &[u8])> {
    let header_end = offset + 5;
    if payload.len() < header_end {
        return Err(Error::MalformedPayload(header_end, payload.len()));
    }
    let address = BigEndian::read_u16(&payload[offset..offset + 2]);
    let quantity = BigEndian::read_u16(&payload[offset + 2..offset + 4]);
    let data = read_byte_count_prefixed(&payload[offset + 4..]).map_err(|_| {
        Error::MalformedPayload(
            header_end + usize::from(payload[offset + 4]),
            payload.len(),
        )
    })?;
    Ok((address, quantity, data))
}

fn words_of(quantity: Quantity, data: &[u8]) -> Result<Data> {
    let quantity = usize::from(quantity);
    if data.len() != quantity * 2 {
        return Err(Error::ByteCount(data.len()));
    }
    Ok(Data {
        quantity,
        data: data.to_vec(),
    })
}

fn quantity_of(len: usize) -> Result<Quantity> {
    Quantity::try_from(len).map_err(|_| Error::ByteCount(len))
}

fn byte_count_of(len: usize) -> Result<u8> {
    u8::try_from(len).map_err(|_| Error::ByteCount(len))
}
