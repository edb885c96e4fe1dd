// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common helpers

use crate::error::*;
use alloc::{vec, vec::Vec};

/// Turn a bool into a u16 coil value
#[must_use]
pub const fn bool_to_u16_coil(state: bool) -> u16 {
    if state { 0xFF00 } else { 0x0000 }
}

/// Turn a u16 coil value into a boolean value.
pub const fn u16_coil_to_bool(coil: u16) -> Result<bool> {
    match coil {
        0xFF00 => Ok(true),
        0x0000 => Ok(false),
        _ => Err(Error::CoilValue(coil)),
    }
}

/// Calculate the number of bytes required for a given number of coils.
#[must_use]
pub const fn packed_coils_len(bitcount: usize) -> usize {
    bitcount.div_ceil(8)
}

/// Pack bits into bytes, least significant bit first.
///
/// The first bit ends up in bit 0 of the first byte. Unused high bits
/// of the last byte are zero.
#[must_use]
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0; packed_coils_len(bits.len())];
    for (i, _) in bits.iter().enumerate().filter(|(_, b)| **b) {
        bytes[i / 8] |= 1 << (i % 8);
    }
    bytes
}

/// Unpack a byte count prefixed buffer into bits.
///
/// Every byte expands to 8 bits, so the returned sequence has to be
/// truncated by the caller if the exact bit count is known.
/// The byte count is returned along with the bits.
pub fn unpack_bits(buf: &[u8]) -> Result<(Vec<bool>, u8)> {
    let Some((&byte_count, bytes)) = buf.split_first() else {
        return Err(Error::MalformedPayload(1, 0));
    };
    let Some(bytes) = bytes.get(..usize::from(byte_count)) else {
        return Err(Error::MalformedPayload(
            1 + usize::from(byte_count),
            buf.len(),
        ));
    };
    let bits = bytes
        .iter()
        .flat_map(|&byte| (0..8u8).map(move |i| (byte >> i) & 0b1 > 0))
        .collect();
    Ok((bits, byte_count))
}
