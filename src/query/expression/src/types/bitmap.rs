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


use std::ops::Range;

use bitmapdb_common_column::buffer::Buffer;
use bitmapdb_common_io::BitmapValue;

use crate::types::ArgType;
use crate::types::DataType;
use crate::types::ValueType;
use crate::values::Column;
use crate::values::Scalar;
use crate::ScalarRef;

/// Rows holding a [`BitmapValue`] each. Every row owns its own value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapType;

impl ValueType for BitmapType {
    type Scalar = BitmapValue;
    type ScalarRef<'a> = &'a BitmapValue;
    type Column = Buffer<BitmapValue>;
    type ColumnIterator<'a> = std::slice::Iter<'a, BitmapValue>;
    type ColumnBuilder = Vec<BitmapValue>;

    #[inline]
    fn upcast_gat<'short, 'long: 'short>(long: &'long BitmapValue) -> &'short BitmapValue {
        long
    }

    fn to_owned_scalar(scalar: Self::ScalarRef<'_>) -> Self::Scalar {
        scalar.clone()
    }

    fn to_scalar_ref(scalar: &Self::Scalar) -> Self::ScalarRef<'_> {
        scalar
    }

    fn try_downcast_scalar<'a>(scalar: &'a ScalarRef) -> Option<Self::ScalarRef<'a>> {
        scalar.as_bitmap().copied()
    }

    fn try_downcast_column(col: &Column) -> Option<Self::Column> {
        col.as_bitmap().cloned()
    }

    fn upcast_scalar(scalar: Self::Scalar) -> Scalar {
        Scalar::Bitmap(scalar)
    }

    fn upcast_column(col: Self::Column) -> Column {
        Column::Bitmap(col)
    }

    fn column_len(col: &Self::Column) -> usize {
        col.len()
    }

    fn index_column(col: &Self::Column, index: usize) -> Option<Self::ScalarRef<'_>> {
        col.get(index)
    }

    fn slice_column(col: &Self::Column, range: Range<usize>) -> Self::Column {
        col.clone().sliced(range.start, range.len())
    }

    fn iter_column(col: &Self::Column) -> Self::ColumnIterator<'_> {
        col.iter()
    }

    fn builder_len(builder: &Self::ColumnBuilder) -> usize {
        builder.len()
    }

    fn push_item(builder: &mut Self::ColumnBuilder, item: Self::ScalarRef<'_>) {
        builder.push(item.clone());
    }

    fn push_default(builder: &mut Self::ColumnBuilder) {
        builder.push(BitmapValue::new());
    }

    fn build_column(builder: Self::ColumnBuilder) -> Self::Column {
        builder.into()
    }

    fn build_scalar(builder: Self::ColumnBuilder) -> Self::Scalar {
        debug_assert_eq!(builder.len(), 1);
        builder.into_iter().next().unwrap_or_default()
    }
}

impl ArgType for BitmapType {
    fn data_type() -> DataType {
        DataType::Bitmap
    }

    fn create_builder(capacity: usize) -> Self::ColumnBuilder {
        Vec::with_capacity(capacity)
    }
}
