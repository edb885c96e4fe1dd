// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quantity limits of the Modbus application protocol.

use core::ops::RangeInclusive;

/// Number of coils or discrete inputs in a read request.
pub const READ_BITS: RangeInclusive<u16> = 1..=0x07D0;

/// Number of registers in a read request.
pub const READ_REGISTERS: RangeInclusive<u16> = 1..=0x007D;

/// Number of coils in a `Write Multiple Coils` request.
pub const WRITE_COILS: RangeInclusive<u16> = 1..=0x07B0;

/// Number of registers in a `Write Multiple Registers` request.
pub const WRITE_REGISTERS: RangeInclusive<u16> = 1..=0x007B;

/// Number of registers written by a `Read/Write Multiple Registers` request.
pub const READ_WRITE_REGISTERS: RangeInclusive<u16> = 1..=0x0079;

/// Maximum number of events returned by `Get Comm Event Log`.
pub const MAX_EVENT_LOG_LEN: usize = 64;

/// Number of addressable items of a data table.
pub const ADDRESS_SPACE: u32 = 0x1_0000;
