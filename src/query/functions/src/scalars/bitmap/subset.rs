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

use bitmapdb_common_expression::types::BitmapType;
use bitmapdb_common_expression::types::Int64Type;
use bitmapdb_common_expression::types::NullableType;
use bitmapdb_common_expression::vectorize_with_builder_2_arg;
use bitmapdb_common_expression::vectorize_with_builder_3_arg;
use bitmapdb_common_expression::FunctionRegistry;
use bitmapdb_common_io::BitmapValue;

use super::push_bitmap_or_null;

/// Length used when `sub_bitmap` is called without one.
const SUB_BITMAP_DEFAULT_LENGTH: i64 = i32::MAX as i64;

pub fn register(registry: &mut FunctionRegistry) {
    registry.register_combine_nullable_2_arg::<BitmapType, Int64Type, BitmapType, _>(
        "sub_bitmap",
        vectorize_with_builder_2_arg::<BitmapType, Int64Type, NullableType<BitmapType>>(
            |bitmap, offset, builder, _| {
                push_bitmap_or_null(
                    builder,
                    sub_bitmap(bitmap, offset, SUB_BITMAP_DEFAULT_LENGTH),
                );
                Ok(())
            },
        ),
    );

    registry.register_combine_nullable_3_arg::<BitmapType, Int64Type, Int64Type, BitmapType, _>(
        "sub_bitmap",
        vectorize_with_builder_3_arg::<BitmapType, Int64Type, Int64Type, NullableType<BitmapType>>(
            |bitmap, offset, len, builder, _| {
                push_bitmap_or_null(builder, sub_bitmap(bitmap, offset, len));
                Ok(())
            },
        ),
    );

    registry.register_combine_nullable_3_arg::<BitmapType, Int64Type, Int64Type, BitmapType, _>(
        "bitmap_subset_in_range",
        vectorize_with_builder_3_arg::<BitmapType, Int64Type, Int64Type, NullableType<BitmapType>>(
            |bitmap, start, end, builder, _| {
                push_bitmap_or_null(builder, subset_in_range(bitmap, start, end));
                Ok(())
            },
        ),
    );

    registry.register_combine_nullable_3_arg::<BitmapType, Int64Type, Int64Type, BitmapType, _>(
        "bitmap_subset_limit",
        vectorize_with_builder_3_arg::<BitmapType, Int64Type, Int64Type, NullableType<BitmapType>>(
            |bitmap, start, limit, builder, _| {
                push_bitmap_or_null(builder, subset_limit(bitmap, start, limit));
                Ok(())
            },
        ),
    );
}

/// `None` for an empty source, a non-positive `len`, an `offset` of `i32::MIN` or a window
/// holding no member.
fn sub_bitmap(bitmap: &BitmapValue, offset: i64, len: i64) -> Option<BitmapValue> {
    if bitmap.is_empty() || offset == i32::MIN as i64 || len <= 0 {
        return None;
    }
    bitmap.sub_bitmap(offset, len)
}

fn subset_in_range(bitmap: &BitmapValue, start: i64, end: i64) -> Option<BitmapValue> {
    if bitmap.is_empty() || end <= 0 || start >= end {
        return None;
    }
    // Members are never negative.
    let start = start.max(0) as u64;
    bitmap.subset_in_range(start, end as u64)
}

fn subset_limit(bitmap: &BitmapValue, start: i64, limit: i64) -> Option<BitmapValue> {
    if bitmap.is_empty() || limit == 0 {
        return None;
    }
    let start = start.max(0) as u64;
    bitmap.subset_limit(start, limit)
}
