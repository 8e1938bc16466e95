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

//! contains [`Bitmap`] and [`MutableBitmap`], containers of `bool`.
mod immutable;
pub use immutable::*;

mod mutable;
pub use mutable::MutableBitmap;

#[inline]
pub(crate) fn get_bit(bytes: &[u8], i: usize) -> bool {
    bytes[i >> 3] & (1 << (i & 7)) != 0
}

#[inline]
pub(crate) fn set_bit(bytes: &mut [u8], i: usize, value: bool) {
    if value {
        bytes[i >> 3] |= 1 << (i & 7);
    } else {
        bytes[i >> 3] &= !(1 << (i & 7));
    }
}

#[inline]
pub(crate) fn bytes_for(bits: usize) -> usize {
    bits.saturating_add(7) / 8
}
