// Copyright 2022 Datafuse Labs.
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

use std::collections::BTreeSet;

use bitmapdb_common_exception::ErrorCode;
use bitmapdb_common_exception::Result;
use bitmapdb_common_io::deserialize_bitmap;
use bitmapdb_common_io::BitmapValue;
use proptest::prelude::*;

fn bitmap_of(values: &[u64]) -> BitmapValue {
    values.iter().copied().collect()
}

fn members(bitmap: &BitmapValue) -> Vec<u64> {
    bitmap.iter().collect()
}

#[test]
fn test_insert_remove_across_representations() {
    let mut bitmap = BitmapValue::new();
    assert!(bitmap.is_empty());
    assert_eq!(bitmap.min(), None);
    assert_eq!(bitmap.max(), None);

    assert!(bitmap.insert(5));
    assert!(!bitmap.insert(5));
    assert_eq!(bitmap.len(), 1);

    // grows past the small-set capacity into a treemap
    for v in (0..100).rev() {
        bitmap.insert(v * 3);
    }
    assert_eq!(bitmap.len(), 101);
    assert_eq!(bitmap.min(), Some(0));
    assert_eq!(bitmap.max(), Some(297));
    assert!(bitmap.contains(5));
    assert!(bitmap.contains(297));
    assert!(!bitmap.contains(298));
    assert!(!bitmap.contains(-3));

    assert!(bitmap.remove(5));
    assert!(!bitmap.remove(5));
    assert!(!bitmap.remove(1_000_000));
    assert_eq!(bitmap.len(), 100);

    let mut small = bitmap_of(&[7, 3]);
    assert!(small.remove(3));
    assert_eq!(members(&small), vec![7]);
    assert!(small.remove(7));
    assert!(small.is_empty());
}

#[test]
fn test_min_max_full_domain() {
    let bitmap = bitmap_of(&[u64::MAX, 0]);
    assert_eq!(bitmap.min(), Some(0));
    assert_eq!(bitmap.max(), Some(u64::MAX as i128));
}

#[test]
fn test_display_and_to_array() {
    let bitmap = bitmap_of(&[10, 2, 33, 2]);
    assert_eq!(bitmap.to_string(), "2,10,33");
    assert_eq!(BitmapValue::new().to_string(), "");

    let mut out = vec![-1];
    bitmap.to_array(&mut out);
    assert_eq!(out, vec![-1, 2, 10, 33]);

    let mut out = vec![];
    bitmap_of(&[u64::MAX]).to_array(&mut out);
    assert_eq!(out, vec![-1]);
}

#[test]
fn test_set_algebra() {
    let small = bitmap_of(&[1, 2, 3, 4]);
    let large: BitmapValue = (3..200).collect();

    let mut or = small.clone();
    or |= &large;
    assert_eq!(or.len(), 199);

    let mut and = small.clone();
    and &= &large;
    assert_eq!(members(&and), vec![3, 4]);

    let mut and = large.clone();
    and &= &small;
    assert_eq!(members(&and), vec![3, 4]);

    let mut andnot = small.clone();
    andnot -= &large;
    assert_eq!(members(&andnot), vec![1, 2]);

    let mut andnot = large.clone();
    andnot -= &small;
    assert_eq!(andnot.len(), 195);
    assert_eq!(andnot.min(), Some(5));

    let mut xor = small.clone();
    xor ^= &large;
    assert_eq!(xor.len(), 2 + 195);
    assert!(xor.contains(1));
    assert!(!xor.contains(3));

    let mut big_xor = large.clone();
    big_xor ^= &large;
    assert!(big_xor.is_empty());
}

#[test]
fn test_sub_bitmap() {
    let bitmap = bitmap_of(&[1, 2, 3, 4, 5]);
    assert_eq!(bitmap.sub_bitmap(1, 2), Some(bitmap_of(&[2, 3])));
    assert_eq!(bitmap.sub_bitmap(-2, 2), Some(bitmap_of(&[4, 5])));
    assert_eq!(bitmap.sub_bitmap(-5, 1), Some(bitmap_of(&[1])));
    assert_eq!(bitmap.sub_bitmap(0, i64::MAX), Some(bitmap.clone()));
    assert_eq!(bitmap.sub_bitmap(4, 10), Some(bitmap_of(&[5])));

    assert_eq!(bitmap.sub_bitmap(5, 1), None);
    assert_eq!(bitmap.sub_bitmap(-6, 1), None);
    assert_eq!(bitmap.sub_bitmap(0, 0), None);
    assert_eq!(bitmap.sub_bitmap(0, -1), None);
    assert_eq!(BitmapValue::new().sub_bitmap(0, 1), None);
    assert_eq!(bitmap.sub_bitmap(i64::MIN, 1), None);
}

#[test]
fn test_subset_in_range_and_limit() {
    let bitmap = bitmap_of(&[1, 3, 5, 7, 9]);
    assert_eq!(bitmap.subset_in_range(3, 8), Some(bitmap_of(&[3, 5, 7])));
    assert_eq!(bitmap.subset_in_range(10, 20), None);
    assert_eq!(bitmap.subset_in_range(5, 5), None);

    assert_eq!(bitmap.subset_limit(4, 2), Some(bitmap_of(&[5, 7])));
    assert_eq!(bitmap.subset_limit(6, -2), Some(bitmap_of(&[3, 5])));
    assert_eq!(bitmap.subset_limit(0, -2), None);
    assert_eq!(bitmap.subset_limit(0, 0), None);
    assert_eq!(bitmap.subset_limit(100, 3), None);
}

#[test]
fn test_serialize_every_representation() -> Result<()> {
    let cases = vec![
        BitmapValue::new(),
        bitmap_of(&[7]),
        bitmap_of(&[u64::MAX]),
        bitmap_of(&[1, 1 << 40, 9]),
        (0..1000u64).collect::<BitmapValue>(),
        (0..1000u64).map(|v| v << 33).collect::<BitmapValue>(),
    ];

    for bitmap in cases {
        let mut buf = vec![];
        bitmap.serialize_into(&mut buf)?;
        assert_eq!(buf.len(), bitmap.serialized_size());
        assert_eq!(deserialize_bitmap(&buf)?, bitmap);
    }
    Ok(())
}

#[test]
fn test_deserialize_malformed() {
    assert!(deserialize_bitmap(&[]).is_err());
    assert!(deserialize_bitmap(&[99]).is_err());
    assert!(deserialize_bitmap(&[1, 0, 0]).is_err());
    assert!(deserialize_bitmap(&[3, 1, 2, 3, 4]).is_err());
    assert!(deserialize_bitmap(&[10, 2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]).is_err());
    assert!(deserialize_bitmap(&[2, 0xff, 0xff]).is_err());
    assert!(deserialize_bitmap(&[4, 0xff, 0xff, 0xff]).is_err());
    assert!(deserialize_bitmap(&[0, 0]).is_err());
}

#[test]
fn test_deserialize_rejects_trailing_bytes() -> Result<()> {
    for bitmap in [
        (0..1000u64).collect::<BitmapValue>(),
        (0..1000u64).map(|v| v << 33).collect::<BitmapValue>(),
    ] {
        let mut buf = vec![];
        bitmap.serialize_into(&mut buf)?;
        assert_eq!(deserialize_bitmap(&buf)?, bitmap);

        buf.push(0);
        let err = deserialize_bitmap(&buf).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadBytes("").code());
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_set_algebra_matches_btreeset(
        a in proptest::collection::vec(0u64..500, 0..120),
        b in proptest::collection::vec(0u64..500, 0..120),
    ) {
        let (sa, sb): (BTreeSet<u64>, BTreeSet<u64>) =
            (a.iter().copied().collect(), b.iter().copied().collect());
        let (ba, bb) = (bitmap_of(&a), bitmap_of(&b));

        let mut or = ba.clone();
        or |= &bb;
        prop_assert_eq!(members(&or), sa.union(&sb).copied().collect::<Vec<_>>());

        let mut and = ba.clone();
        and &= &bb;
        prop_assert_eq!(members(&and), sa.intersection(&sb).copied().collect::<Vec<_>>());

        let mut andnot = ba.clone();
        andnot -= &bb;
        prop_assert_eq!(members(&andnot), sa.difference(&sb).copied().collect::<Vec<_>>());

        let mut xor = ba.clone();
        xor ^= &bb;
        prop_assert_eq!(members(&xor), sa.symmetric_difference(&sb).copied().collect::<Vec<_>>());
    }

    #[test]
    fn test_serialize_roundtrip(values in proptest::collection::vec(any::<u64>(), 0..100)) {
        let bitmap = bitmap_of(&values);
        let mut buf = vec![];
        bitmap.serialize_into(&mut buf).unwrap();
        prop_assert_eq!(deserialize_bitmap(&buf).unwrap(), bitmap);
    }
}
