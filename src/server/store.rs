// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::frame::{Address, Coil, Exception, Quantity, Word};
use alloc::vec::Vec;

/// The four data tables of a Modbus device.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Single bits, read-write.
    Coils,
    /// Single bits, read-only.
    DiscreteInputs,
    /// 16 bit registers, read-write.
    HoldingRegisters,
    /// 16 bit registers, read-only.
    InputRegisters,
}

/// Register and coil storage of a server.
///
/// Requests only reach the read and write methods after
/// [`DataStore::validate`] accepted the addressed range.
pub trait DataStore {
    /// Whether `count` items starting at `address` exist in `table`.
    fn validate(&self, table: Table, address: Address, count: Quantity) -> bool;

    /// Read `count` bits from [`Table::Coils`] or [`Table::DiscreteInputs`].
    fn read_bits(&self, table: Table, address: Address, count: Quantity) -> Vec<Coil>;

    /// Read `count` words from [`Table::HoldingRegisters`] or
    /// [`Table::InputRegisters`].
    fn read_registers(&self, table: Table, address: Address, count: Quantity) -> Vec<Word>;

    /// Write consecutive coils.
    fn write_bits(&mut self, address: Address, bits: &[Coil]) -> Result<(), Exception>;

    /// Write consecutive holding registers.
    fn write_registers(&mut self, address: Address, words: &[Word]) -> Result<(), Exception>;
}
