// Copyright 2021 Datafuse Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;

use super::get_bit;
use super::MutableBitmap;

/// An immutable container semantically equivalent to `Arc<Vec<bool>>` but represented as
/// `Arc<Vec<u8>>` where each boolean is stored as a single bit.
///
/// Cloning and slicing are `O(1)`. The number of unset bits is cached because it drives the
/// null fast paths of every function: `unset_bits() == 0` means "no nulls", and
/// `unset_bits() == len()` means "entirely null".
#[derive(Clone)]
pub struct Bitmap {
    bytes: Arc<Vec<u8>>,
    offset: usize,
    length: usize,
    unset_bits: usize,
}

impl Bitmap {
    /// Initializes an empty [`Bitmap`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes a new [`Bitmap`] filled with `value`.
    pub fn new_constant(value: bool, length: usize) -> Self {
        let mut bitmap = MutableBitmap::with_capacity(length);
        bitmap.extend_constant(length, value);
        bitmap.into()
    }

    /// Initializes a new [`Bitmap`] filled with unset values.
    #[inline]
    pub fn new_zeroed(length: usize) -> Self {
        Self::new_constant(false, length)
    }

    pub(crate) fn from_inner(bytes: Vec<u8>, length: usize) -> Self {
        let unset_bits = (0..length).filter(|i| !get_bit(&bytes, *i)).count();
        Self {
            bytes: Arc::new(bytes),
            offset: 0,
            length,
            unset_bits,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The number of bits set to `false`.
    #[inline]
    pub fn unset_bits(&self) -> usize {
        self.unset_bits
    }

    /// Alias of [`Bitmap::unset_bits`] used where the bitmap is a validity mask.
    #[inline]
    pub fn null_count(&self) -> usize {
        self.unset_bits
    }

    /// Returns whether the bit at position `i` is set.
    ///
    /// # Panics
    /// Panics iff `i >= self.len()`.
    #[inline]
    pub fn get_bit(&self, i: usize) -> bool {
        assert!(i < self.length);
        get_bit(&self.bytes, self.offset + i)
    }

    /// Slices `self`, offsetting by `offset` and truncating up to `length` bits.
    ///
    /// # Panics
    /// Panics iff `offset + length > self.len()`.
    pub fn sliced(self, offset: usize, length: usize) -> Self {
        assert!(offset + length <= self.length);
        if offset == 0 && length == self.length {
            return self;
        }
        let start = self.offset + offset;
        let unset_bits = (start..start + length)
            .filter(|i| !get_bit(&self.bytes, *i))
            .count();
        Self {
            bytes: self.bytes,
            offset: start,
            length,
            unset_bits,
        }
    }

    pub fn iter(&self) -> BitmapIter<'_> {
        BitmapIter {
            bitmap: self,
            index: 0,
        }
    }

    /// Returns a new [`MutableBitmap`] holding a copy of the bits of `self`.
    pub fn make_mut(&self) -> MutableBitmap {
        let mut bitmap = MutableBitmap::with_capacity(self.length);
        for value in self.iter() {
            bitmap.push(value);
        }
        bitmap
    }

    /// The bitwise AND of two masks of the same length.
    ///
    /// # Panics
    /// Panics iff the lengths differ.
    pub fn and(&self, other: &Bitmap) -> Bitmap {
        assert_eq!(self.length, other.length);
        if self.unset_bits == 0 {
            return other.clone();
        }
        if other.unset_bits == 0 {
            return self.clone();
        }
        self.iter().zip(other.iter()).map(|(a, b)| a && b).collect()
    }
}

impl Default for Bitmap {
    fn default() -> Self {
        MutableBitmap::new().into()
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl Eq for Bitmap {}

impl Debug for Bitmap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|v| if v { 1u8 } else { 0u8 }))
            .finish()
    }
}

impl From<MutableBitmap> for Bitmap {
    fn from(bitmap: MutableBitmap) -> Self {
        let (bytes, length) = bitmap.into_inner();
        Bitmap::from_inner(bytes, length)
    }
}

impl From<&[bool]> for Bitmap {
    fn from(slice: &[bool]) -> Self {
        slice.iter().copied().collect()
    }
}

impl From<Vec<bool>> for Bitmap {
    fn from(values: Vec<bool>) -> Self {
        values.into_iter().collect()
    }
}

impl FromIterator<bool> for Bitmap {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        MutableBitmap::from_iter(iter).into()
    }
}

impl<'a> IntoIterator for &'a Bitmap {
    type Item = bool;
    type IntoIter = BitmapIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bits of a [`Bitmap`].
#[derive(Clone)]
pub struct BitmapIter<'a> {
    bitmap: &'a Bitmap,
    index: usize,
}

impl Iterator for BitmapIter<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<bool> {
        if self.index >= self.bitmap.length {
            return None;
        }
        let value = self.bitmap.get_bit(self.index);
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bitmap.length - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitmapIter<'_> {}
