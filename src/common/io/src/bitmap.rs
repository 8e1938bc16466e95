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

use std::fmt;
use std::ops::BitAndAssign;
use std::ops::BitOrAssign;
use std::ops::BitXorAssign;
use std::ops::SubAssign;

use bitmapdb_common_exception::ErrorCode;
use bitmapdb_common_exception::Result;
use roaring::RoaringBitmap;
use roaring::RoaringTreemap;

// Type tags of the binary format. The numbering leaves room for the tags of other writers
// of the same format, which is why it is not contiguous.
const BITMAP_TYPE_EMPTY: u8 = 0;
const BITMAP_TYPE_SINGLE32: u8 = 1;
const BITMAP_TYPE_BITMAP32: u8 = 2;
const BITMAP_TYPE_SINGLE64: u8 = 3;
const BITMAP_TYPE_BITMAP64: u8 = 4;
const BITMAP_TYPE_SET: u8 = 10;

/// Members kept in the sorted small-set representation before promoting to a roaring treemap.
const SMALL_SET_CAPACITY: usize = 32;

#[derive(Clone)]
enum BitmapRepr {
    Empty,
    Single(u64),
    /// Sorted, deduplicated, at most `SMALL_SET_CAPACITY` members.
    Set(Vec<u64>),
    Bitmap(Box<RoaringTreemap>),
}

/// An ordered set of `u64`, the value stored in every row of a bitmap column.
///
/// Small sets are stored inline and grow into a [`RoaringTreemap`] as members are added; the
/// representation is never observable through the public API.
#[derive(Clone)]
pub struct BitmapValue {
    repr: BitmapRepr,
}

impl Default for BitmapValue {
    fn default() -> Self {
        Self::new()
    }
}

impl BitmapValue {
    pub fn new() -> Self {
        BitmapValue {
            repr: BitmapRepr::Empty,
        }
    }

    /// Adds `value`, returning whether it was absent.
    pub fn insert(&mut self, value: u64) -> bool {
        match &mut self.repr {
            BitmapRepr::Empty => {
                self.repr = BitmapRepr::Single(value);
                true
            }
            BitmapRepr::Single(v) => {
                if *v == value {
                    return false;
                }
                let set = if *v < value {
                    vec![*v, value]
                } else {
                    vec![value, *v]
                };
                self.repr = BitmapRepr::Set(set);
                true
            }
            BitmapRepr::Set(set) => match set.binary_search(&value) {
                Ok(_) => false,
                Err(pos) => {
                    if set.len() < SMALL_SET_CAPACITY {
                        set.insert(pos, value);
                    } else {
                        let mut rb = RoaringTreemap::new();
                        rb.extend(set.iter().copied());
                        rb.insert(value);
                        self.repr = BitmapRepr::Bitmap(Box::new(rb));
                    }
                    true
                }
            },
            BitmapRepr::Bitmap(rb) => rb.insert(value),
        }
    }

    /// Removes `value`, returning whether it was present. Removing an absent member is a
    /// no-op.
    pub fn remove(&mut self, value: u64) -> bool {
        match &mut self.repr {
            BitmapRepr::Empty => false,
            BitmapRepr::Single(v) => {
                if *v != value {
                    return false;
                }
                self.repr = BitmapRepr::Empty;
                true
            }
            BitmapRepr::Set(set) => match set.binary_search(&value) {
                Ok(pos) => {
                    set.remove(pos);
                    if set.len() == 1 {
                        let last = set[0];
                        self.repr = BitmapRepr::Single(last);
                    }
                    true
                }
                Err(_) => false,
            },
            BitmapRepr::Bitmap(rb) => rb.remove(value),
        }
    }

    /// Membership test for a signed probe; negative values are never members.
    pub fn contains(&self, value: i64) -> bool {
        value >= 0 && self.contains_unsigned(value as u64)
    }

    pub fn contains_unsigned(&self, value: u64) -> bool {
        match &self.repr {
            BitmapRepr::Empty => false,
            BitmapRepr::Single(v) => *v == value,
            BitmapRepr::Set(set) => set.binary_search(&value).is_ok(),
            BitmapRepr::Bitmap(rb) => rb.contains(value),
        }
    }

    /// The cardinality.
    pub fn len(&self) -> u64 {
        match &self.repr {
            BitmapRepr::Empty => 0,
            BitmapRepr::Single(_) => 1,
            BitmapRepr::Set(set) => set.len() as u64,
            BitmapRepr::Bitmap(rb) => rb.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The smallest member, widened so the whole `u64` domain fits a signed result.
    pub fn min(&self) -> Option<i128> {
        let min = match &self.repr {
            BitmapRepr::Empty => None,
            BitmapRepr::Single(v) => Some(*v),
            BitmapRepr::Set(set) => set.first().copied(),
            BitmapRepr::Bitmap(rb) => rb.min(),
        };
        min.map(i128::from)
    }

    /// The largest member, widened so the whole `u64` domain fits a signed result.
    pub fn max(&self) -> Option<i128> {
        let max = match &self.repr {
            BitmapRepr::Empty => None,
            BitmapRepr::Single(v) => Some(*v),
            BitmapRepr::Set(set) => set.last().copied(),
            BitmapRepr::Bitmap(rb) => rb.max(),
        };
        max.map(i128::from)
    }

    /// Iterates the members in ascending order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u64> + '_> {
        match &self.repr {
            BitmapRepr::Empty => Box::new(std::iter::empty()),
            BitmapRepr::Single(v) => Box::new(std::iter::once(*v)),
            BitmapRepr::Set(set) => Box::new(set.iter().copied()),
            BitmapRepr::Bitmap(rb) => Box::new(rb.iter()),
        }
    }

    /// Appends all members in ascending order, reinterpreting them as `i64`.
    pub fn to_array(&self, out: &mut Vec<i64>) {
        out.reserve(self.len() as usize);
        out.extend(self.iter().map(|v| v as i64));
    }

    /// Members from the `offset`-th one (counted from the largest member when negative,
    /// `-1` being the largest), at most `len` of them, in ascending order.
    ///
    /// Returns `None` when no member falls in the window.
    pub fn sub_bitmap(&self, offset: i64, len: i64) -> Option<BitmapValue> {
        let cardinality = i64::try_from(self.len()).unwrap_or(i64::MAX);
        if cardinality == 0 || len <= 0 {
            return None;
        }
        let start = if offset >= 0 {
            if offset >= cardinality {
                return None;
            }
            offset
        } else {
            if offset < -cardinality {
                return None;
            }
            cardinality + offset
        };
        let take = usize::try_from(len).unwrap_or(usize::MAX);
        let result: BitmapValue = self.iter().skip(start as usize).take(take).collect();
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    /// Members in `[start, end)`. Returns `None` when the range holds no member.
    pub fn subset_in_range(&self, start: u64, end: u64) -> Option<BitmapValue> {
        if start >= end {
            return None;
        }
        let result: BitmapValue = self
            .iter()
            .skip_while(|v| *v < start)
            .take_while(|v| *v < end)
            .collect();
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    /// With a positive `limit`, the first `limit` members `>= start`; with a negative one, the
    /// last `|limit|` members `<= start`. Returns `None` when nothing is selected.
    pub fn subset_limit(&self, start: u64, limit: i64) -> Option<BitmapValue> {
        let result: BitmapValue = if limit > 0 {
            let take = usize::try_from(limit).unwrap_or(usize::MAX);
            self.iter().skip_while(|v| *v < start).take(take).collect()
        } else if limit < 0 {
            let keep = limit.unsigned_abs();
            let below: u64 = self.iter().take_while(|v| *v <= start).count() as u64;
            let skip = below.saturating_sub(keep) as usize;
            self.iter()
                .take_while(|v| *v <= start)
                .skip(skip)
                .collect()
        } else {
            BitmapValue::new()
        };
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    /// Size in bytes of [`BitmapValue::serialize_into`]'s output.
    pub fn serialized_size(&self) -> usize {
        1 + match &self.repr {
            BitmapRepr::Empty => 0,
            BitmapRepr::Single(v) if *v <= u32::MAX as u64 => 4,
            BitmapRepr::Single(_) => 8,
            BitmapRepr::Set(set) => 4 + set.len() * 8,
            BitmapRepr::Bitmap(rb) => match as_bitmap32(rb) {
                Some(rb32) => rb32.serialized_size(),
                None => rb.serialized_size(),
            },
        }
    }

    /// Appends the binary form: a type byte followed by a little-endian payload.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.reserve(self.serialized_size());
        match &self.repr {
            BitmapRepr::Empty => buf.push(BITMAP_TYPE_EMPTY),
            BitmapRepr::Single(v) => {
                if let Ok(v) = u32::try_from(*v) {
                    buf.push(BITMAP_TYPE_SINGLE32);
                    buf.extend_from_slice(&v.to_le_bytes());
                } else {
                    buf.push(BITMAP_TYPE_SINGLE64);
                    buf.extend_from_slice(&v.to_le_bytes());
                }
            }
            BitmapRepr::Set(set) => {
                buf.push(BITMAP_TYPE_SET);
                buf.extend_from_slice(&(set.len() as u32).to_le_bytes());
                for v in set {
                    buf.extend_from_slice(&v.to_le_bytes());
                }
            }
            BitmapRepr::Bitmap(rb) => match as_bitmap32(rb) {
                Some(rb32) => {
                    buf.push(BITMAP_TYPE_BITMAP32);
                    rb32.serialize_into(&mut *buf)?;
                }
                None => {
                    buf.push(BITMAP_TYPE_BITMAP64);
                    rb.serialize_into(&mut *buf)?;
                }
            },
        }
        Ok(())
    }

    fn from_treemap(rb: RoaringTreemap) -> Self {
        if rb.len() as usize <= SMALL_SET_CAPACITY {
            return rb.iter().collect();
        }
        BitmapValue {
            repr: BitmapRepr::Bitmap(Box::new(rb)),
        }
    }
}

/// The 32-bit form of `rb` when every member fits in `u32`.
fn as_bitmap32(rb: &RoaringTreemap) -> Option<RoaringBitmap> {
    match rb.max() {
        Some(max) if max <= u32::MAX as u64 => Some(rb.iter().map(|v| v as u32).collect()),
        _ => None,
    }
}

/// Decodes the output of [`BitmapValue::serialize_into`].
///
/// Truncated, oversized or unknown input is rejected with `BadBytes`.
pub fn deserialize_bitmap(buf: &[u8]) -> Result<BitmapValue> {
    let Some((&tag, payload)) = buf.split_first() else {
        return Err(ErrorCode::BadBytes("bitmap payload is empty"));
    };

    match tag {
        BITMAP_TYPE_EMPTY => {
            expect_len(payload, 0)?;
            Ok(BitmapValue::new())
        }
        BITMAP_TYPE_SINGLE32 => {
            expect_len(payload, 4)?;
            let v = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
            Ok(BitmapValue {
                repr: BitmapRepr::Single(v as u64),
            })
        }
        BITMAP_TYPE_SINGLE64 => {
            expect_len(payload, 8)?;
            Ok(BitmapValue {
                repr: BitmapRepr::Single(read_u64(payload)),
            })
        }
        BITMAP_TYPE_SET => {
            if payload.len() < 4 {
                return Err(ErrorCode::BadBytes("truncated bitmap set header"));
            }
            let count = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
            let body = &payload[4..];
            expect_len(body, count as usize * 8)?;
            Ok(body.chunks_exact(8).map(read_u64).collect())
        }
        BITMAP_TYPE_BITMAP32 => {
            let mut reader = payload;
            let rb = RoaringBitmap::deserialize_from(&mut reader)?;
            expect_len(reader, 0)?;
            Ok(BitmapValue::from_treemap(rb.iter().map(u64::from).collect()))
        }
        BITMAP_TYPE_BITMAP64 => {
            let mut reader = payload;
            let rb = RoaringTreemap::deserialize_from(&mut reader)?;
            expect_len(reader, 0)?;
            Ok(BitmapValue::from_treemap(rb))
        }
        other => Err(ErrorCode::BadBytes(format!(
            "unknown bitmap type tag {}",
            other
        ))),
    }
}

fn expect_len(payload: &[u8], expected: usize) -> Result<()> {
    if payload.len() != expected {
        return Err(ErrorCode::BadBytes(format!(
            "bitmap payload has {} bytes, expected {}",
            payload.len(),
            expected
        )));
    }
    Ok(())
}

#[inline]
fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

impl FromIterator<u64> for BitmapValue {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut bitmap = BitmapValue::new();
        for v in iter {
            bitmap.insert(v);
        }
        bitmap
    }
}

impl BitOrAssign<&BitmapValue> for BitmapValue {
    fn bitor_assign(&mut self, rhs: &BitmapValue) {
        match &rhs.repr {
            BitmapRepr::Empty => {}
            BitmapRepr::Single(v) => {
                self.insert(*v);
            }
            BitmapRepr::Set(set) => {
                for v in set {
                    self.insert(*v);
                }
            }
            BitmapRepr::Bitmap(rhs_rb) => match &mut self.repr {
                BitmapRepr::Bitmap(rb) => **rb |= &**rhs_rb,
                _ => {
                    let mut rb = (**rhs_rb).clone();
                    rb.extend(self.iter());
                    self.repr = BitmapRepr::Bitmap(Box::new(rb));
                }
            },
        }
    }
}

impl BitAndAssign<&BitmapValue> for BitmapValue {
    fn bitand_assign(&mut self, rhs: &BitmapValue) {
        match (&mut self.repr, &rhs.repr) {
            (BitmapRepr::Bitmap(rb), BitmapRepr::Bitmap(rhs_rb)) => **rb &= &**rhs_rb,
            _ => {
                *self = self.iter().filter(|v| rhs.contains_unsigned(*v)).collect();
            }
        }
        self.shrink();
    }
}

impl SubAssign<&BitmapValue> for BitmapValue {
    fn sub_assign(&mut self, rhs: &BitmapValue) {
        match (&mut self.repr, &rhs.repr) {
            (BitmapRepr::Bitmap(rb), BitmapRepr::Bitmap(rhs_rb)) => **rb -= &**rhs_rb,
            (_, BitmapRepr::Bitmap(_)) => {
                *self = self.iter().filter(|v| !rhs.contains_unsigned(*v)).collect();
            }
            _ => {
                for v in rhs.iter() {
                    self.remove(v);
                }
            }
        }
        self.shrink();
    }
}

impl BitXorAssign<&BitmapValue> for BitmapValue {
    fn bitxor_assign(&mut self, rhs: &BitmapValue) {
        match (&mut self.repr, &rhs.repr) {
            (BitmapRepr::Bitmap(rb), BitmapRepr::Bitmap(rhs_rb)) => **rb ^= &**rhs_rb,
            (_, BitmapRepr::Bitmap(rhs_rb)) => {
                let mut rb = (**rhs_rb).clone();
                for v in self.iter() {
                    if !rb.remove(v) {
                        rb.insert(v);
                    }
                }
                self.repr = BitmapRepr::Bitmap(Box::new(rb));
            }
            _ => {
                for v in rhs.iter() {
                    if !self.remove(v) {
                        self.insert(v);
                    }
                }
            }
        }
        self.shrink();
    }
}

impl BitmapValue {
    /// Demotes a treemap that has fallen back into small-set range.
    fn shrink(&mut self) {
        if let BitmapRepr::Bitmap(rb) = &self.repr {
            if rb.len() as usize <= SMALL_SET_CAPACITY {
                *self = rb.iter().collect();
            }
        }
    }
}

impl PartialEq for BitmapValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for BitmapValue {}

impl fmt::Display for BitmapValue {
    /// Ascending, comma separated, no spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitmapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
