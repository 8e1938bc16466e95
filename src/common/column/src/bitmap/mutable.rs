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

use super::bytes_for;
use super::get_bit;
use super::set_bit;
use super::Bitmap;

/// A container of booleans where each boolean is stored as a single bit.
///
/// Bits are appended with [`MutableBitmap::push`] and the container is frozen into a
/// [`Bitmap`] through `Bitmap::from`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutableBitmap {
    buffer: Vec<u8>,
    length: usize,
}

impl MutableBitmap {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(bytes_for(capacity)),
            length: 0,
        }
    }

    /// Initializes a [`MutableBitmap`] with all bits set to `value`.
    pub fn from_len_constant(length: usize, value: bool) -> Self {
        let mut bitmap = Self::with_capacity(length);
        bitmap.extend_constant(length, value);
        bitmap
    }

    #[inline]
    pub fn push(&mut self, value: bool) {
        if self.length % 8 == 0 {
            self.buffer.push(0);
        }
        set_bit(&mut self.buffer, self.length, value);
        self.length += 1;
    }

    pub fn extend_constant(&mut self, additional: usize, value: bool) {
        self.buffer.reserve(bytes_for(self.length + additional) - self.buffer.len());
        for _ in 0..additional {
            self.push(value);
        }
    }

    #[inline]
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.length);
        get_bit(&self.buffer, i)
    }

    #[inline]
    pub fn set(&mut self, i: usize, value: bool) {
        assert!(i < self.length);
        set_bit(&mut self.buffer, i, value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn unset_bits(&self) -> usize {
        (0..self.length).filter(|i| !get_bit(&self.buffer, *i)).count()
    }

    pub(crate) fn into_inner(self) -> (Vec<u8>, usize) {
        (self.buffer, self.length)
    }
}

impl FromIterator<bool> for MutableBitmap {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bitmap = MutableBitmap::with_capacity(iter.size_hint().0);
        for value in iter {
            bitmap.push(value);
        }
        bitmap
    }
}

impl From<MutableBitmap> for Option<Bitmap> {
    /// Freezes the mask, dropping it entirely when every bit is set.
    fn from(bitmap: MutableBitmap) -> Self {
        let bitmap: Bitmap = bitmap.into();
        if bitmap.unset_bits() > 0 {
            Some(bitmap)
        } else {
            None
        }
    }
}
