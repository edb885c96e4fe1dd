// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error detection codes of the serial line transmission modes.
//!
//! - RTU frames are protected by a CRC-16 with the polynomial `0xA001`
//!   (reflected `0x8005`) and an initial value of `0xFFFF`.
//! - ASCII frames are protected by an LRC, the two's complement of the
//!   byte sum. The LRC is calculated over the raw bytes, so ASCII
//!   characters have to be decoded with [`decode_ascii_hex_pairs`] first.

use crate::error::*;
use alloc::vec::Vec;

/// Lookup table of the CRC-16 for every byte value.
pub const CRC16_TABLE: [u16; 256] = crc16_table();

const fn crc16_table() -> [u16; 256] {
    let mut table = [0; 256];
    let mut i = 0;
    while i < table.len() {
        let mut byte = i as u16;
        let mut crc = 0x0000;
        let mut bit = 0;
        while bit < 8 {
            if (byte ^ crc) & 0x0001 != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
            byte >>= 1;
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Calculate the CRC (Cyclic Redundancy Check) sum.
///
/// The low byte of the result is transmitted first.
#[must_use]
pub fn compute_crc(data: &[u8]) -> u16 {
    data.iter().fold(0xFFFF, |crc, x| {
        (crc >> 8) ^ CRC16_TABLE[usize::from((crc ^ u16::from(*x)) as u8)]
    })
}

/// Check `data` against an expected CRC.
#[must_use]
pub fn check_crc(data: &[u8], expected: u16) -> bool {
    compute_crc(data) == expected
}

/// Calculate the LRC (Longitudinal Redundancy Check) of raw bytes.
#[must_use]
pub fn compute_lrc(data: &[u8]) -> u8 {
    data.iter()
        .fold(0u8, |sum, x| sum.wrapping_add(*x))
        .wrapping_neg()
}

/// Check `data` against an expected LRC.
#[must_use]
pub fn check_lrc(data: &[u8], expected: u8) -> bool {
    compute_lrc(data) == expected
}

/// Convert a single ASCII hex digit into its value.
///
/// For single characters, e.g. while scanning an ASCII frame.
/// Whole buffers are decoded with [`decode_ascii_hex_pairs`].
pub const fn hex_digit_to_value(c: u8) -> Result<u8> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        _ => Err(Error::InvalidHexDigit(c as char)),
    }
}

/// Decode pairs of ASCII hex digits into bytes.
///
/// The buffer must not contain the leading `:` nor the trailing `CR LF`
/// of an ASCII frame.
pub fn decode_ascii_hex_pairs(buf: &[u8]) -> Result<Vec<u8>> {
    hex::decode(buf).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, .. } => Error::InvalidHexDigit(c),
        _ => Error::MalformedHexBuffer(buf.len()),
    })
}
