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

use bitmapdb_common_exception::Result;
use bitmapdb_common_expression::types::BitmapType;
use bitmapdb_common_expression::types::BooleanType;
use bitmapdb_common_expression::types::Int128Type;
use bitmapdb_common_expression::types::Int64Type;
use bitmapdb_common_expression::types::NullableType;
use bitmapdb_common_expression::types::StringType;
use bitmapdb_common_expression::vectorize_with_builder_1_arg;
use bitmapdb_common_expression::vectorize_with_builder_2_arg;
use bitmapdb_common_expression::EvalContext;
use bitmapdb_common_expression::FunctionRegistry;
use bitmapdb_common_expression::Value;
use bitmapdb_common_expression::ValueRef;
use bitmapdb_common_io::murmur_hash3_32;
use bitmapdb_common_io::parse_unsigned_int;
use bitmapdb_common_io::BitmapValue;
use bitmapdb_common_io::MURMUR3_32_SEED;

use super::push_bitmap;

pub fn register(registry: &mut FunctionRegistry) {
    registry.register_combine_nullable_1_arg::<StringType, BitmapType, _>("to_bitmap", to_bitmap);

    // NULL text hashes to the empty bitmap.
    registry.register_1_arg_core::<NullableType<StringType>, BitmapType, _>(
        "bitmap_hash",
        vectorize_with_builder_1_arg::<NullableType<StringType>, BitmapType>(
            |text, builder, _| {
                let mut bitmap = BitmapValue::new();
                if let Some(text) = text {
                    bitmap.insert(murmur_hash3_32(text.as_bytes(), MURMUR3_32_SEED) as u64);
                }
                builder.push(bitmap);
                Ok(())
            },
        ),
    );

    registry.register_0_arg_core::<BitmapType, _>("bitmap_empty", |_| {
        Ok(Value::Scalar(BitmapValue::new()))
    });

    registry.register_1_arg_core::<NullableType<BitmapType>, Int64Type, _>(
        "bitmap_count",
        vectorize_with_builder_1_arg::<NullableType<BitmapType>, Int64Type>(
            |bitmap, builder, _| {
                let count = bitmap.map_or(0, |bitmap| bitmap.len());
                builder.push(i64::try_from(count).unwrap_or(i64::MAX));
                Ok(())
            },
        ),
    );

    // The result starts empty and takes the left operand in before the operator is applied.
    registry.register_passthrough_nullable_2_arg::<BitmapType, BitmapType, BitmapType, _>(
        "bitmap_or",
        vectorize_with_builder_2_arg::<BitmapType, BitmapType, BitmapType>(
            |lhs, rhs, builder, _| {
                let mut bitmap = BitmapValue::new();
                bitmap |= lhs;
                bitmap |= rhs;
                builder.push(bitmap);
                Ok(())
            },
        ),
    );

    registry.register_passthrough_nullable_2_arg::<BitmapType, BitmapType, BitmapType, _>(
        "bitmap_and",
        vectorize_with_builder_2_arg::<BitmapType, BitmapType, BitmapType>(
            |lhs, rhs, builder, _| {
                let mut bitmap = BitmapValue::new();
                bitmap |= lhs;
                bitmap &= rhs;
                builder.push(bitmap);
                Ok(())
            },
        ),
    );

    registry.register_passthrough_nullable_2_arg::<BitmapType, BitmapType, BitmapType, _>(
        "bitmap_xor",
        vectorize_with_builder_2_arg::<BitmapType, BitmapType, BitmapType>(
            |lhs, rhs, builder, _| {
                let mut bitmap = BitmapValue::new();
                bitmap |= lhs;
                bitmap ^= rhs;
                builder.push(bitmap);
                Ok(())
            },
        ),
    );

    registry.register_passthrough_nullable_2_arg::<BitmapType, BitmapType, BitmapType, _>(
        "bitmap_andnot",
        vectorize_with_builder_2_arg::<BitmapType, BitmapType, BitmapType>(
            |lhs, rhs, builder, _| {
                let mut bitmap = BitmapValue::new();
                bitmap |= lhs;
                bitmap -= rhs;
                builder.push(bitmap);
                Ok(())
            },
        ),
    );

    registry.register_passthrough_nullable_2_arg::<BitmapType, Int64Type, BitmapType, _>(
        "bitmap_remove",
        vectorize_with_builder_2_arg::<BitmapType, Int64Type, BitmapType>(
            |lhs, value, builder, _| {
                let mut bitmap = BitmapValue::new();
                bitmap |= lhs;
                // A negative value is never a member.
                if let Ok(value) = u64::try_from(value) {
                    bitmap.remove(value);
                }
                builder.push(bitmap);
                Ok(())
            },
        ),
    );

    registry.register_passthrough_nullable_2_arg::<BitmapType, Int64Type, BooleanType, _>(
        "bitmap_contains",
        vectorize_with_builder_2_arg::<BitmapType, Int64Type, BooleanType>(
            |bitmap, value, builder, _| {
                builder.push(bitmap.contains(value));
                Ok(())
            },
        ),
    );

    registry.register_passthrough_nullable_2_arg::<BitmapType, BitmapType, BooleanType, _>(
        "bitmap_has_any",
        vectorize_with_builder_2_arg::<BitmapType, BitmapType, BooleanType>(
            |lhs, rhs, builder, _| {
                let mut bitmap = BitmapValue::new();
                bitmap |= lhs;
                bitmap &= rhs;
                builder.push(!bitmap.is_empty());
                Ok(())
            },
        ),
    );

    registry.register_combine_nullable_1_arg::<BitmapType, Int128Type, _>(
        "bitmap_max",
        vectorize_with_builder_1_arg::<BitmapType, NullableType<Int128Type>>(
            |bitmap, builder, _| {
                match bitmap.max() {
                    Some(max) => builder.push(max),
                    None => builder.push_null(),
                }
                Ok(())
            },
        ),
    );

    registry.register_combine_nullable_1_arg::<BitmapType, Int128Type, _>(
        "bitmap_min",
        vectorize_with_builder_1_arg::<BitmapType, NullableType<Int128Type>>(
            |bitmap, builder, _| {
                match bitmap.min() {
                    Some(min) => builder.push(min),
                    None => builder.push_null(),
                }
                Ok(())
            },
        ),
    );
}

fn to_bitmap(
    arg: ValueRef<StringType>,
    ctx: &mut EvalContext,
) -> Result<Value<NullableType<BitmapType>>> {
    let is_scalar = arg.is_scalar();
    let value = vectorize_with_builder_1_arg::<StringType, NullableType<BitmapType>>(
        |text, builder, ctx| {
            match parse_unsigned_int(text) {
                Ok(value) => {
                    let mut bitmap = BitmapValue::new();
                    bitmap.insert(value);
                    push_bitmap(builder, bitmap);
                }
                Err(_) => {
                    ctx.set_error(
                        builder.len(),
                        format!(
                            "The input: {} is not valid, to_bitmap only supports integers in range [0, {}]",
                            text,
                            u64::MAX
                        ),
                    );
                    builder.push_null();
                }
            }
            Ok(())
        },
    )(arg, ctx)?;
    // A constant stands for every row of the batch.
    if is_scalar && ctx.has_error() {
        for row in 1..ctx.num_rows {
            ctx.set_error(row, "");
        }
    }
    Ok(value)
}
