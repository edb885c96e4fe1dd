// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

mod coils;
mod data;

pub use self::{coils::*, data::*};
use alloc::{vec, vec::Vec};
use byteorder::{BigEndian, ByteOrder};

/// A Modbus function code.
///
/// It is represented by an unsigned 8 bit integer.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionCode {
    /// Modbus Function Code: `01` (`0x01`).
    ReadCoils,

    /// Modbus Function Code: `02` (`0x02`).
    ReadDiscreteInputs,

    /// Modbus Function Code: `05` (`0x05`).
    WriteSingleCoil,

    /// Modbus Function Code: `06` (`0x06`).
    WriteSingleRegister,

    /// Modbus Function Code: `03` (`0x03`).
    ReadHoldingRegisters,

    /// Modbus Function Code: `04` (`0x04`).
    ReadInputRegisters,

    /// Modbus Function Code: `15` (`0x0F`).
    WriteMultipleCoils,

    /// Modbus Function Code: `16` (`0x10`).
    WriteMultipleRegisters,

    /// Modbus Function Code: `23` (`0x17`).
    ReadWriteMultipleRegisters,

    /// Modbus Function Code: `07` (`0x07`).
    ReadExceptionStatus,

    /// Modbus Function Code: `11` (`0x0B`).
    GetCommEventCounter,

    /// Modbus Function Code: `12` (`0x0C`).
    GetCommEventLog,

    /// Modbus Function Code: `17` (`0x11`).
    ///
    /// Also known as *Report Slave ID*.
    ReportServerId,

    /// Custom Modbus Function Code.
    Custom(u8),
}

impl FunctionCode {
    /// Create a new [`FunctionCode`] with `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        match value {
            0x01 => Self::ReadCoils,
            0x02 => Self::ReadDiscreteInputs,
            0x05 => Self::WriteSingleCoil,
            0x06 => Self::WriteSingleRegister,
            0x03 => Self::ReadHoldingRegisters,
            0x04 => Self::ReadInputRegisters,
            0x0F => Self::WriteMultipleCoils,
            0x10 => Self::WriteMultipleRegisters,
            0x17 => Self::ReadWriteMultipleRegisters,
            0x07 => Self::ReadExceptionStatus,
            0x0B => Self::GetCommEventCounter,
            0x0C => Self::GetCommEventLog,
            0x11 => Self::ReportServerId,
            code => FunctionCode::Custom(code),
        }
    }

    /// Get the [`u8`] value of the current [`FunctionCode`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::ReadCoils => 0x01,
            Self::ReadDiscreteInputs => 0x02,
            Self::WriteSingleCoil => 0x05,
            Self::WriteSingleRegister => 0x06,
            Self::ReadHoldingRegisters => 0x03,
            Self::ReadInputRegisters => 0x04,
            Self::WriteMultipleCoils => 0x0F,
            Self::WriteMultipleRegisters => 0x10,
            Self::ReadWriteMultipleRegisters => 0x17,
            Self::ReadExceptionStatus => 0x07,
            Self::GetCommEventCounter => 0x0B,
            Self::GetCommEventLog => 0x0C,
            Self::ReportServerId => 0x11,
            Self::Custom(code) => code,
        }
    }
}

impl From<u8> for FunctionCode {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<FunctionCode> for u8 {
    fn from(code: FunctionCode) -> Self {
        code.value()
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

/// Slave ID
pub type SlaveId = u8;

/// A Modbus address is represented by 16 bit (from `0` to `65535`).
pub(crate) type Address = u16;

/// A Coil represents a single bit.
///
/// - `true` is equivalent to `ON`, `1` and `0xFF00`.
/// - `false` is equivalent to `OFF`, `0` and `0x0000`.
pub(crate) type Coil = bool;

/// Modbus uses 16 bit for its data items (big-endian representation).
pub(crate) type Word = u16;

/// Number of items to process (`0` - `65535`).
pub(crate) type Quantity = u16;

type EventCount = u16;
type MessageCount = u16;

/// A request represents a message from the client (master) to the server (slave).
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ReadCoils(Address, Quantity),
    ReadDiscreteInputs(Address, Quantity),
    WriteSingleCoil(Address, Coil),
    WriteMultipleCoils(Address, Coils),
    ReadInputRegisters(Address, Quantity),
    ReadHoldingRegisters(Address, Quantity),
    WriteSingleRegister(Address, Word),
    WriteMultipleRegisters(Address, Data),
    ReadWriteMultipleRegisters(Address, Quantity, Address, Data),
    ReadExceptionStatus,
    GetCommEventCounter,
    GetCommEventLog,
    ReportServerId,
    Custom(FunctionCode, Vec<u8>),
}

/// A server (slave) exception response.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionResponse {
    pub function: FunctionCode,
    pub exception: Exception,
}

/// Represents a message from the client (master) to the server (slave).
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPdu(pub Request);

/// Represents a message from the server (slave) to the client (master).
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePdu(pub Result<Response, ExceptionResponse>);

/// Communication status of a remote device.
///
/// On the wire `Ready` is `0x0000` and `Busy` is `0xFFFF`.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommStatus {
    /// No program command is pending.
    #[default]
    Ready,
    /// A previously issued program command is still being processed.
    Busy,
}

impl CommStatus {
    /// The status word.
    #[must_use]
    pub const fn word(self) -> Word {
        match self {
            Self::Ready => 0x0000,
            Self::Busy => 0xFFFF,
        }
    }

    /// Any other word than `0x0000` means busy.
    #[must_use]
    pub const fn from_word(word: Word) -> Self {
        match word {
            0x0000 => Self::Ready,
            _ => Self::Busy,
        }
    }
}

/// The response data of a successful request.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    ReadCoils(Coils),
    ReadDiscreteInputs(Coils),
    WriteSingleCoil(Address, Coil),
    WriteMultipleCoils(Address, Quantity),
    ReadInputRegisters(Data),
    ReadHoldingRegisters(Data),
    WriteSingleRegister(Address, Word),
    WriteMultipleRegisters(Address, Quantity),
    ReadWriteMultipleRegisters(Data),
    ReadExceptionStatus(u8),
    GetCommEventCounter(CommStatus, EventCount),
    /// Events are ordered from the most recent to the oldest one.
    GetCommEventLog(CommStatus, EventCount, MessageCount, Vec<u8>),
    /// Server ID and run indicator status.
    ReportServerId(SlaveId, bool),
    Custom(FunctionCode, Vec<u8>),
}

impl From<&Request> for FunctionCode {
    fn from(r: &Request) -> Self {
        use Request as R;

        match r {
            R::ReadCoils(_, _) => Self::ReadCoils,
            R::ReadDiscreteInputs(_, _) => Self::ReadDiscreteInputs,
            R::WriteSingleCoil(_, _) => Self::WriteSingleCoil,
            R::WriteMultipleCoils(_, _) => Self::WriteMultipleCoils,
            R::ReadInputRegisters(_, _) => Self::ReadInputRegisters,
            R::ReadHoldingRegisters(_, _) => Self::ReadHoldingRegisters,
            R::WriteSingleRegister(_, _) => Self::WriteSingleRegister,
            R::WriteMultipleRegisters(_, _) => Self::WriteMultipleRegisters,
            R::ReadWriteMultipleRegisters(_, _, _, _) => Self::ReadWriteMultipleRegisters,
            R::ReadExceptionStatus => Self::ReadExceptionStatus,
            R::GetCommEventCounter => Self::GetCommEventCounter,
            R::GetCommEventLog => Self::GetCommEventLog,
            R::ReportServerId => Self::ReportServerId,
            R::Custom(code, _) => *code,
        }
    }
}

impl From<&Response> for FunctionCode {
    fn from(r: &Response) -> Self {
        use Response as R;

        match r {
            R::ReadCoils(_) => Self::ReadCoils,
            R::ReadDiscreteInputs(_) => Self::ReadDiscreteInputs,
            R::WriteSingleCoil(_, _) => Self::WriteSingleCoil,
            R::WriteMultipleCoils(_, _) => Self::WriteMultipleCoils,
            R::ReadInputRegisters(_) => Self::ReadInputRegisters,
            R::ReadHoldingRegisters(_) => Self::ReadHoldingRegisters,
            R::WriteSingleRegister(_, _) => Self::WriteSingleRegister,
            R::WriteMultipleRegisters(_, _) => Self::WriteMultipleRegisters,
            R::ReadWriteMultipleRegisters(_) => Self::ReadWriteMultipleRegisters,
            R::ReadExceptionStatus(_) => Self::ReadExceptionStatus,
            R::GetCommEventCounter(_, _) => Self::GetCommEventCounter,
            R::GetCommEventLog(_, _, _, _) => Self::GetCommEventLog,
            R::ReportServerId(_, _) => Self::ReportServerId,
            R::Custom(code, _) => *code,
        }
    }
}

/// A server (slave) exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exception {
    IllegalFunction = 0x01,
    IllegalDataAddress = 0x02,
    IllegalDataValue = 0x03,
    ServerDeviceFailure = 0x04,
    Acknowledge = 0x05,
    ServerDeviceBusy = 0x06,
    MemoryParityError = 0x08,
    GatewayPathUnavailable = 0x0A,
    GatewayTargetDevice = 0x0B,
}

impl Exception {
    /// The exception code sent on the wire.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    const fn get_name(self) -> &'static str {
        match self {
            Self::IllegalFunction => "Illegal function",
            Self::IllegalDataAddress => "Illegal data address",
            Self::IllegalDataValue => "Illegal data value",
            Self::ServerDeviceFailure => "Server device failure",
            Self::Acknowledge => "Acknowledge",
            Self::ServerDeviceBusy => "Server device busy",
            Self::MemoryParityError => "Memory parity error",
            Self::GatewayPathUnavailable => "Gateway path unavailable",
            Self::GatewayTargetDevice => "Gateway target device failed to respond",
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

#[cfg(all(feature = "defmt", target_os = "none"))]
impl defmt::Format for Exception {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.get_name())
    }
}

impl Request {
    /// Number of bytes required for a serialized PDU frame.
    #[must_use]
    pub fn pdu_len(&self) -> usize {
        match self {
            Self::ReadCoils(_, _)
            | Self::ReadDiscreteInputs(_, _)
            | Self::ReadInputRegisters(_, _)
            | Self::ReadHoldingRegisters(_, _)
            | Self::WriteSingleRegister(_, _)
            | Self::WriteSingleCoil(_, _) => 5,
            Self::WriteMultipleCoils(_, coils) => 6 + coils.packed_len(),
            Self::WriteMultipleRegisters(_, words) => 6 + words.len() * 2,
            Self::ReadWriteMultipleRegisters(_, _, _, words) => 10 + words.len() * 2,
            Self::ReadExceptionStatus
            | Self::GetCommEventCounter
            | Self::GetCommEventLog
            | Self::ReportServerId => 1,
            Self::Custom(_, data) => 1 + data.len(),
        }
    }
}

impl Response {
    /// Number of bytes required for a serialized PDU frame.
    #[must_use]
    pub fn pdu_len(&self) -> usize {
        match self {
            Self::ReadCoils(coils) | Self::ReadDiscreteInputs(coils) => 2 + coils.packed_len(),
            Self::WriteSingleCoil(_, _)
            | Self::WriteMultipleCoils(_, _)
            | Self::WriteMultipleRegisters(_, _)
            | Self::WriteSingleRegister(_, _)
            | Self::GetCommEventCounter(_, _) => 5,
            Self::ReadInputRegisters(words)
            | Self::ReadHoldingRegisters(words)
            | Self::ReadWriteMultipleRegisters(words) => 2 + words.len() * 2,
            Self::ReadExceptionStatus(_) => 2,
            Self::GetCommEventLog(_, _, _, events) => 8 + events.len(),
            Self::ReportServerId(_, _) => 4,
            Self::Custom(_, data) => 1 + data.len(),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn function_code_into_u8() {
        let x: u8 = FunctionCode::WriteMultipleCoils.value();
        assert_eq!(x, 15);
        let x: u8 = FunctionCode::Custom(0xBB).into();
        assert_eq!(x, 0xBB);
    }

    #[test]
    fn function_code_from_u8() {
        assert_eq!(FunctionCode::new(15), FunctionCode::WriteMultipleCoils);
        assert_eq!(FunctionCode::new(0x0C), FunctionCode::GetCommEventLog);
        assert_eq!(FunctionCode::new(0xBB), FunctionCode::Custom(0xBB));
        // Not supported by this crate
        assert_eq!(FunctionCode::new(0x16), FunctionCode::Custom(0x16));
    }

    #[test]
    fn function_code_lookup_is_bijective() {
        for value in 0..=u8::MAX {
            assert_eq!(FunctionCode::new(value).value(), value);
        }
    }

    #[test]
    fn function_code_from_request() {
        use Request::*;
        let requests = &[
            (ReadCoils(0, 0), 1),
            (ReadDiscreteInputs(0, 0), 2),
            (WriteSingleCoil(0, true), 5),
            (WriteMultipleCoils(0, Coils::from_bools(&[])), 0x0F),
            (ReadInputRegisters(0, 0), 0x04),
            (ReadHoldingRegisters(0, 0), 0x03),
            (WriteSingleRegister(0, 0), 0x06),
            (WriteMultipleRegisters(0, Data::from_words(&[])), 0x10),
            (
                ReadWriteMultipleRegisters(0, 0, 0, Data::from_words(&[])),
                0x17,
            ),
            (ReadExceptionStatus, 0x07),
            (GetCommEventCounter, 0x0B),
            (GetCommEventLog, 0x0C),
            (ReportServerId, 0x11),
            (Custom(FunctionCode::Custom(88), vec![]), 88),
        ];
        for (req, expected) in requests {
            let code: u8 = FunctionCode::from(req).value();
            assert_eq!(*expected, code);
        }
    }

    #[test]
    fn function_code_from_response() {
        use Response::*;
        let responses = &[
            (ReadCoils(Coils::from_bools(&[])), 1),
            (ReadDiscreteInputs(Coils::from_bools(&[])), 2),
            (WriteSingleCoil(0x0, false), 5),
            (WriteMultipleCoils(0x0, 0x0), 0x0F),
            (ReadInputRegisters(Data::from_words(&[])), 0x04),
            (ReadHoldingRegisters(Data::from_words(&[])), 0x03),
            (WriteSingleRegister(0, 0), 0x06),
            (WriteMultipleRegisters(0, 0), 0x10),
            (ReadWriteMultipleRegisters(Data::from_words(&[])), 0x17),
            (ReadExceptionStatus(0), 0x07),
            (GetCommEventCounter(CommStatus::Ready, 0), 0x0B),
            (GetCommEventLog(CommStatus::Ready, 0, 0, vec![]), 0x0C),
            (ReportServerId(0, true), 0x11),
            (Custom(FunctionCode::Custom(99), vec![]), 99),
        ];
        for (rsp, expected) in responses {
            let code: u8 = FunctionCode::from(rsp).value();
            assert_eq!(*expected, code);
        }
    }

    #[test]
    fn comm_status_words() {
        assert_eq!(CommStatus::Ready.word(), 0x0000);
        assert_eq!(CommStatus::Busy.word(), 0xFFFF);
        assert_eq!(CommStatus::from_word(0x0000), CommStatus::Ready);
        assert_eq!(CommStatus::from_word(0xFFFF), CommStatus::Busy);
        assert_eq!(CommStatus::from_word(0x0001), CommStatus::Busy);
        assert_eq!(CommStatus::default(), CommStatus::Ready);
    }

    #[test]
    fn exception_codes() {
        assert_eq!(Exception::IllegalDataValue.code(), 0x03);
        assert_eq!(Exception::IllegalDataAddress.code(), 0x02);
        assert_eq!(Exception::GatewayTargetDevice.code(), 0x0B);
    }

    #[test]
    fn test_request_pdu_len() {
        assert_eq!(Request::ReadCoils(0x12, 5).pdu_len(), 5);
        assert_eq!(Request::WriteSingleRegister(0x12, 0x33).pdu_len(), 5);
        assert_eq!(
            Request::WriteMultipleCoils(0, Coils::from_bools(&[true, false])).pdu_len(),
            7
        );
        assert_eq!(
            Request::WriteMultipleRegisters(0, Data::from_words(&[1, 2])).pdu_len(),
            10
        );
        assert_eq!(
            Request::ReadWriteMultipleRegisters(0, 1, 0, Data::from_words(&[1])).pdu_len(),
            12
        );
        assert_eq!(Request::ReportServerId.pdu_len(), 1);
    }

    #[test]
    fn test_response_pdu_len() {
        assert_eq!(
            Response::ReadCoils(Coils::from_bools(&[true])).pdu_len(),
            3
        );
        assert_eq!(
            Response::ReadHoldingRegisters(Data::from_words(&[1, 2, 3])).pdu_len(),
            8
        );
        assert_eq!(Response::ReadExceptionStatus(0).pdu_len(), 2);
        assert_eq!(
            Response::GetCommEventCounter(CommStatus::Busy, 3).pdu_len(),
            5
        );
        assert_eq!(
            Response::GetCommEventLog(CommStatus::Ready, 0, 0, vec![1, 2]).pdu_len(),
            10
        );
        assert_eq!(Response::ReportServerId(5, true).pdu_len(), 4);
    }
}
