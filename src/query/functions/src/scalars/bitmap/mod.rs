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

//! The bitmap function family.
//!
//! Every function is registered with one of the registry's null policies:
//! - passthrough: a row is NULL iff an argument is NULL on that row;
//! - combine: additionally NULL where the kernel gives up on a row;
//! - core: the kernel sees the NULLs itself (`bitmap_hash`, `bitmap_count`).

mod algebra;
mod convert;
mod guard;
mod subset;

use bitmapdb_common_expression::types::BitmapType;
use bitmapdb_common_expression::types::NullableColumnBuilder;
use bitmapdb_common_expression::EvalContext;
use bitmapdb_common_expression::FunctionRegistry;
use bitmapdb_common_io::BitmapValue;
pub use guard::BitmapLengthGuard;

pub fn register(registry: &mut FunctionRegistry) {
    algebra::register(registry);
    convert::register(registry);
    subset::register(registry);
}

/// Pushes an owned bitmap as a valid row.
#[inline]
fn push_bitmap(builder: &mut NullableColumnBuilder<BitmapType>, bitmap: BitmapValue) {
    builder.builder.push(bitmap);
    builder.validity.push(true);
}

#[inline]
fn push_bitmap_or_null(builder: &mut NullableColumnBuilder<BitmapType>, bitmap: Option<BitmapValue>) {
    match bitmap {
        Some(bitmap) => push_bitmap(builder, bitmap),
        None => builder.push_null(),
    }
}

/// Whether `row` is NULL in the arguments of the running call.
#[inline]
fn is_null_row(ctx: &EvalContext, row: usize) -> bool {
    ctx.validity
        .as_ref()
        .is_some_and(|validity| !validity.get_bit(row))
}
