// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

/// modbus-pdu Error
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Invalid coil value
    CoilValue(u16),
    /// Invalid function code
    FnCode(u8),
    /// Invalid exception code
    ExceptionCode(u8),
    /// Invalid exception function code
    ExceptionFnCode(u8),
    /// Invalid byte count
    ByteCount(usize),
    /// Malformed payload: expected length, actual length
    MalformedPayload(usize, usize),
    /// Invalid ASCII hex digit
    InvalidHexDigit(char),
    /// ASCII hex buffer with an odd length
    MalformedHexBuffer(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match self {
            CoilValue(v) => write!(f, "Invalid coil value: 0x{v:0>4X}"),
            FnCode(fn_code) => write!(f, "Invalid function code: 0x{fn_code:0>2X}"),
            ExceptionCode(code) => write!(f, "Invalid exception code: 0x{code:0>2X}"),
            ExceptionFnCode(code) => write!(f, "Invalid exception function code: 0x{code:0>2X}"),
            ByteCount(cnt) => write!(f, "Invalid byte count: {cnt}"),
            MalformedPayload(expected, actual) => write!(
                f,
                "Malformed payload: expected {expected} byte(s), actual {actual} byte(s)"
            ),
            InvalidHexDigit(c) => write!(f, "Invalid hex digit: {c:?}"),
            MalformedHexBuffer(len) => {
                write!(f, "Malformed hex buffer: odd length {len}")
            }
        }
    }
}

impl core::error::Error for Error {}

pub(crate) type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_malformed_payload() {
        assert_eq!(
            Error::MalformedPayload(4, 3).to_string(),
            "Malformed payload: expected 4 byte(s), actual 3 byte(s)"
        );
    }

    #[test]
    fn display_hex_errors() {
        assert_eq!(
            Error::InvalidHexDigit('G').to_string(),
            "Invalid hex digit: 'G'"
        );
        assert_eq!(
            Error::MalformedHexBuffer(3).to_string(),
            "Malformed hex buffer: odd length 3"
        );
    }

    #[test]
    fn display_codes_as_hex() {
        assert_eq!(
            Error::FnCode(0x9A).to_string(),
            "Invalid function code: 0x9A"
        );
        assert_eq!(
            Error::CoilValue(0x1234).to_string(),
            "Invalid coil value: 0x1234"
        );
    }
}
