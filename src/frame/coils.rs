// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::*;
use crate::util::*;

/// Packed coils
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coils {
    pub(crate) data: Vec<u8>,
    pub(crate) quantity: usize,
}

impl Coils {
    /// Pack coils defined by an bool slice.
    #[must_use]
    pub fn from_bools(bools: &[bool]) -> Self {
        Coils {
            data: pack_bits(bools),
            quantity: bools.len(),
        }
    }
    /// Quantity of coils
    #[must_use]
    pub const fn len(&self) -> usize {
        self.quantity
    }
    ///  Returns `true` if the container has no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quantity == 0
    }
    /// Number of bytes of the packed representation.
    #[must_use]
    pub const fn packed_len(&self) -> usize {
        packed_coils_len(self.quantity)
    }
    /// Get a specific coil.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Coil> {
        if idx + 1 > self.quantity {
            return None;
        }
        Some((self.data[idx / 8] >> (idx % 8)) & 0b1 > 0)
    }
    /// Iterate over all coils.
    #[must_use]
    pub const fn iter(&self) -> CoilsIter<'_> {
        CoilsIter {
            cnt: 0,
            coils: self,
        }
    }
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data
    }
}

/// Coils iterator.
#[derive(Debug, Clone)]
pub struct CoilsIter<'c> {
    cnt: usize,
    coils: &'c Coils,
}

impl Iterator for CoilsIter<'_> {
    type Item = Coil;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.coils.get(self.cnt);
        self.cnt += 1;
        result
    }
}

impl<'c> IntoIterator for &'c Coils {
    type Item = Coil;
    type IntoIter = CoilsIter<'c>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
