// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::*;

/// Modbus data (u16 values)
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    pub(crate) data: Vec<u8>,
    pub(crate) quantity: usize,
}

impl Data {
    /// Pack words (u16 values) into big-endian bytes.
    #[must_use]
    pub fn from_words(words: &[u16]) -> Self {
        let mut data = vec![0; words.len() * 2];
        for (i, w) in words.iter().enumerate() {
            BigEndian::write_u16(&mut data[i * 2..], *w);
        }
        Data {
            data,
            quantity: words.len(),
        }
    }
    /// Quantity of words (u16 values)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.quantity
    }
    ///  Returns `true` if the container has no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quantity == 0
    }
    /// Get a specific word.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Word> {
        if idx + 1 > self.quantity {
            return None;
        }
        let idx = idx * 2;
        Some(BigEndian::read_u16(&self.data[idx..idx + 2]))
    }
    /// Iterate over all words.
    #[must_use]
    pub const fn iter(&self) -> DataIter<'_> {
        DataIter { cnt: 0, data: self }
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data
    }
}

/// Data iterator
#[derive(Debug, Clone)]
pub struct DataIter<'d> {
    cnt: usize,
    data: &'d Data,
}

impl Iterator for DataIter<'_> {
    type Item = Word;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.data.get(self.cnt);
        self.cnt += 1;
        result
    }
}

impl<'d> IntoIterator for &'d Data {
    type Item = Word;
    type IntoIter = DataIter<'d>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn from_word_slice() {
        let words: &[u16] = &[0xABCD, 0xEF00, 0x1234];
        let data = Data::from_words(words);
        assert_eq!(data.len(), 3);
        assert_eq!(data.payload(), &[0xAB, 0xCD, 0xEF, 0x00, 0x12, 0x34]);
        let mut iter = data.iter();
        assert_eq!(iter.next(), Some(0xABCD));
        assert_eq!(iter.next(), Some(0xEF00));
        assert_eq!(iter.next(), Some(0x1234));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn data_len() {
        let data = Data {
            data: vec![0, 1, 2],
            quantity: 5,
        };
        assert_eq!(data.len(), 5);
    }

    #[test]
    fn data_empty() {
        let data = Data::from_words(&[]);
        assert!(data.is_empty());
        assert!(data.payload().is_empty());
    }

    #[test]
    fn data_get() {
        let data = Data {
            data: vec![0xAB, 0xBC, 0x12],
            quantity: 1,
        };
        assert_eq!(data.get(0), Some(0xABBC));
        assert_eq!(data.get(1), None);

        let data = Data {
            data: vec![0xFF, 0xAB, 0xCD, 0xEF, 0x33],
            quantity: 2,
        };
        assert_eq!(data.get(0), Some(0xFFAB));
        assert_eq!(data.get(1), Some(0xCDEF));
        assert_eq!(data.get(2), None);
    }

    #[test]
    fn data_iter() {
        let data = Data {
            data: vec![0x01, 0x02, 0x03, 0x04, 0xAA, 0xBB],
            quantity: 3,
        };
        let words: Vec<_> = (&data).into_iter().collect();
        assert_eq!(words, [0x0102, 0x0304, 0xAABB]);
    }
}
