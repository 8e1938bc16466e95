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

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bitmapdb_common_column::bitmap::Bitmap;
use bitmapdb_common_exception::Result;
use bitmapdb_common_expression::types::ArrayColumnBuilder;
use bitmapdb_common_expression::types::ArrayType;
use bitmapdb_common_expression::types::BitmapType;
use bitmapdb_common_expression::types::Int64Type;
use bitmapdb_common_expression::types::NullableColumn;
use bitmapdb_common_expression::types::NullableColumnBuilder;
use bitmapdb_common_expression::types::NullableType;
use bitmapdb_common_expression::types::StringColumnBuilder;
use bitmapdb_common_expression::types::StringType;
use bitmapdb_common_expression::types::ValueType;
use bitmapdb_common_expression::vectorize_with_builder_1_arg;
use bitmapdb_common_expression::EvalContext;
use bitmapdb_common_expression::FunctionRegistry;
use bitmapdb_common_expression::Value;
use bitmapdb_common_expression::ValueRef;
use bitmapdb_common_io::deserialize_bitmap;
use bitmapdb_common_io::split_and_parse_unsigned;
use bitmapdb_common_io::BitmapValue;
use itertools::Itertools;

use super::is_null_row;
use super::push_bitmap;
use super::push_bitmap_or_null;
use super::BitmapLengthGuard;

type Int64ArrayType = ArrayType<NullableType<Int64Type>>;

pub fn register(registry: &mut FunctionRegistry) {
    registry.register_passthrough_nullable_1_arg::<BitmapType, StringType, _>(
        "bitmap_to_string",
        |arg, ctx| {
            eval_bitmap_to_text("bitmap_to_string", arg, ctx, |bitmap, builder| {
                builder.put_str(&bitmap.iter().join(","));
                Ok(())
            })
        },
    );

    registry.register_passthrough_nullable_1_arg::<BitmapType, StringType, _>(
        "bitmap_to_base64",
        |arg, ctx| {
            let mut buf = Vec::new();
            eval_bitmap_to_text("bitmap_to_base64", arg, ctx, |bitmap, builder| {
                buf.clear();
                bitmap.serialize_into(&mut buf)?;
                builder.put_str(&STANDARD.encode(&buf));
                Ok(())
            })
        },
    );

    registry.register_combine_nullable_1_arg::<StringType, BitmapType, _>(
        "bitmap_from_string",
        vectorize_with_builder_1_arg::<StringType, NullableType<BitmapType>>(
            |text, builder, ctx| {
                if text.len() as u64 > ctx.func_ctx.max_length_for_bitmap_from_string {
                    builder.push_null();
                    return Ok(());
                }
                match split_and_parse_unsigned(text, ',') {
                    Ok(values) => push_bitmap(builder, values.into_iter().collect()),
                    Err(_) => builder.push_null(),
                }
                Ok(())
            },
        ),
    );

    registry.register_combine_nullable_1_arg::<StringType, BitmapType, _>(
        "base64_to_bitmap",
        base64_to_bitmap,
    );

    registry.register_passthrough_nullable_1_arg::<BitmapType, Int64ArrayType, _>(
        "bitmap_to_array",
        bitmap_to_array,
    );

    registry.register_passthrough_nullable_1_arg::<Int64ArrayType, BitmapType, _>(
        "array_to_bitmap",
        vectorize_with_builder_1_arg::<Int64ArrayType, BitmapType>(|array, builder, _| {
            // NULL and negative elements are skipped.
            let bitmap: BitmapValue = NullableType::<Int64Type>::iter_column(&array)
                .flatten()
                .filter_map(|value| u64::try_from(value).ok())
                .collect();
            builder.push(bitmap);
            Ok(())
        }),
    );
}

/// Renders every non-NULL bitmap with `write` once its own cardinality passes the length guard.
fn eval_bitmap_to_text(
    function: &'static str,
    arg: ValueRef<BitmapType>,
    ctx: &mut EvalContext,
    mut write: impl FnMut(&BitmapValue, &mut StringColumnBuilder) -> Result<()>,
) -> Result<Value<StringType>> {
    let guard = BitmapLengthGuard::new(function, ctx.func_ctx);
    match arg {
        ValueRef::Scalar(bitmap) => {
            guard.check_row(bitmap.len())?;
            let mut builder = StringColumnBuilder::with_capacity(1, 0);
            write(bitmap, &mut builder)?;
            builder.commit_row();
            Ok(Value::Scalar(builder.build_scalar()))
        }
        ValueRef::Column(col) => {
            let mut builder = StringColumnBuilder::with_capacity(col.len(), 0);
            for (row, bitmap) in col.iter().enumerate() {
                if !is_null_row(ctx, row) {
                    guard.check_row(bitmap.len())?;
                    write(bitmap, &mut builder)?;
                }
                builder.commit_row();
            }
            Ok(Value::Column(builder.build()))
        }
    }
}

fn base64_to_bitmap(
    arg: ValueRef<StringType>,
    _ctx: &mut EvalContext,
) -> Result<Value<NullableType<BitmapType>>> {
    // Decoded bytes of the current row; keeps the capacity of the largest row so far.
    let mut scratch = Vec::new();
    let mut decode = |text: &str| -> Option<BitmapValue> {
        if text.is_empty() {
            return None;
        }
        scratch.clear();
        STANDARD.decode_vec(text, &mut scratch).ok()?;
        deserialize_bitmap(&scratch).ok()
    };

    match arg {
        ValueRef::Scalar(text) => Ok(Value::Scalar(decode(text))),
        ValueRef::Column(col) => {
            let mut builder = NullableColumnBuilder::<BitmapType>::with_capacity(col.len());
            for text in col.iter() {
                push_bitmap_or_null(&mut builder, decode(text));
            }
            Ok(Value::Column(builder.build()))
        }
    }
}

fn bitmap_to_array(
    arg: ValueRef<BitmapType>,
    ctx: &mut EvalContext,
) -> Result<Value<Int64ArrayType>> {
    let mut guard = BitmapLengthGuard::new("bitmap_to_array", ctx.func_ctx);
    match arg {
        ValueRef::Scalar(bitmap) => {
            guard.check(bitmap.len())?;
            let mut values = Vec::new();
            bitmap.to_array(&mut values);
            let len = values.len();
            Ok(Value::Scalar(NullableColumn {
                column: values.into(),
                validity: Bitmap::new_constant(true, len),
            }))
        }
        ValueRef::Column(col) => {
            // Size the elements of every row before anything is copied.
            for (row, bitmap) in col.iter().enumerate() {
                if !is_null_row(ctx, row) {
                    guard.check(bitmap.len())?;
                }
            }

            let total = guard.accumulated() as usize;
            let mut builder =
                ArrayColumnBuilder::<NullableType<Int64Type>>::with_capacity(col.len(), total);
            for (row, bitmap) in col.iter().enumerate() {
                if !is_null_row(ctx, row) {
                    let elements = &mut builder.builder;
                    bitmap.to_array(&mut elements.builder);
                    let added = elements.builder.len() - elements.validity.len();
                    elements.validity.extend_constant(added, true);
                }
                builder.commit_row();
            }
            Ok(Value::Column(builder.build()))
        }
    }
}
