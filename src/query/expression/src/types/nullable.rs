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


use std::marker::PhantomData;
use std::ops::Range;

use bitmapdb_common_column::bitmap::Bitmap;
use bitmapdb_common_column::bitmap::BitmapIter;
use bitmapdb_common_column::bitmap::MutableBitmap;

use crate::types::ArgType;
use crate::types::DataType;
use crate::types::ValueType;
use crate::values::Column;
use crate::values::Scalar;
use crate::ScalarRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullableType<T: ValueType>(PhantomData<T>);

impl<T: ArgType> ValueType for NullableType<T> {
    type Scalar = Option<T::Scalar>;
    type ScalarRef<'a> = Option<T::ScalarRef<'a>>;
    type Column = NullableColumn<T>;
    type ColumnIterator<'a> = NullableIterator<'a, T>;
    type ColumnBuilder = NullableColumnBuilder<T>;

    #[inline]
    fn upcast_gat<'short, 'long: 'short>(
        long: Option<T::ScalarRef<'long>>,
    ) -> Option<T::ScalarRef<'short>> {
        long.map(|long| T::upcast_gat(long))
    }

    fn to_owned_scalar(scalar: Self::ScalarRef<'_>) -> Self::Scalar {
        scalar.map(T::to_owned_scalar)
    }

    fn to_scalar_ref(scalar: &Self::Scalar) -> Self::ScalarRef<'_> {
        scalar.as_ref().map(T::to_scalar_ref)
    }

    fn try_downcast_scalar<'a>(scalar: &'a ScalarRef) -> Option<Self::ScalarRef<'a>> {
        match scalar {
            ScalarRef::Null => Some(None),
            scalar => Some(Some(T::try_downcast_scalar(scalar)?)),
        }
    }

    /// Accepts nullable columns, untyped all-NULL columns and, wrapped with an all-valid
    /// mask, plain columns of `T`.
    fn try_downcast_column(col: &Column) -> Option<Self::Column> {
        match col {
            Column::Nullable(nullable) => Some(NullableColumn {
                column: T::try_downcast_column(&nullable.column)?,
                validity: nullable.validity.clone(),
            }),
            Column::Null { len } => {
                let mut builder = T::create_builder(*len);
                for _ in 0..*len {
                    T::push_default(&mut builder);
                }
                Some(NullableColumn {
                    column: T::build_column(builder),
                    validity: Bitmap::new_constant(false, *len),
                })
            }
            col => {
                let column = T::try_downcast_column(col)?;
                let validity = Bitmap::new_constant(true, T::column_len(&column));
                Some(NullableColumn { column, validity })
            }
        }
    }

    fn upcast_scalar(scalar: Self::Scalar) -> Scalar {
        match scalar {
            Some(scalar) => T::upcast_scalar(scalar),
            None => Scalar::Null,
        }
    }

    fn upcast_column(col: Self::Column) -> Column {
        Column::Nullable(Box::new(NullableColumn {
            column: T::upcast_column(col.column),
            validity: col.validity,
        }))
    }

    fn column_len(col: &Self::Column) -> usize {
        col.len()
    }

    fn index_column(col: &Self::Column, index: usize) -> Option<Self::ScalarRef<'_>> {
        col.index(index)
    }

    fn slice_column(col: &Self::Column, range: Range<usize>) -> Self::Column {
        col.slice(range)
    }

    fn iter_column(col: &Self::Column) -> Self::ColumnIterator<'_> {
        NullableIterator {
            iter: T::iter_column(&col.column),
            validity: col.validity.iter(),
        }
    }

    fn builder_len(builder: &Self::ColumnBuilder) -> usize {
        builder.len()
    }

    fn push_item(builder: &mut Self::ColumnBuilder, item: Self::ScalarRef<'_>) {
        match item {
            Some(item) => builder.push(item),
            None => builder.push_null(),
        }
    }

    fn push_default(builder: &mut Self::ColumnBuilder) {
        builder.push_null();
    }

    fn build_column(builder: Self::ColumnBuilder) -> Self::Column {
        builder.build()
    }

    fn build_scalar(builder: Self::ColumnBuilder) -> Self::Scalar {
        builder.build_scalar()
    }
}

impl<T: ArgType> ArgType for NullableType<T> {
    fn data_type() -> DataType {
        T::data_type().wrap_nullable()
    }

    fn create_builder(capacity: usize) -> Self::ColumnBuilder {
        NullableColumnBuilder::with_capacity(capacity)
    }
}

/// A column of `T` with a validity mask: bit `i` unset means row `i` is NULL. The value stored
/// under a NULL row is unspecified.
#[derive(Debug, Clone, PartialEq)]
pub struct NullableColumn<T: ValueType> {
    pub column: T::Column,
    pub validity: Bitmap,
}

impl<T: ValueType> NullableColumn<T> {
    pub fn len(&self) -> usize {
        self.validity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every row is NULL. An empty column counts as all NULL.
    pub fn is_all_null(&self) -> bool {
        self.validity.null_count() == self.len()
    }

    pub fn index(&self, index: usize) -> Option<Option<T::ScalarRef<'_>>> {
        if index >= self.len() {
            return None;
        }
        if !self.validity.get_bit(index) {
            return Some(None);
        }
        Some(Some(T::index_column(&self.column, index)?))
    }

    pub fn slice(&self, range: Range<usize>) -> Self {
        NullableColumn {
            column: T::slice_column(&self.column, range.clone()),
            validity: self.validity.clone().sliced(range.start, range.len()),
        }
    }
}

pub struct NullableIterator<'a, T: ValueType> {
    iter: T::ColumnIterator<'a>,
    validity: BitmapIter<'a>,
}

impl<'a, T: ValueType> Iterator for NullableIterator<'a, T> {
    type Item = Option<T::ScalarRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.iter.next()?;
        let valid = self.validity.next()?;
        Some(valid.then_some(value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.validity.size_hint()
    }
}

#[derive(Debug, Clone)]
pub struct NullableColumnBuilder<T: ValueType> {
    pub builder: T::ColumnBuilder,
    pub validity: MutableBitmap,
}

impl<T: ArgType> NullableColumnBuilder<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        NullableColumnBuilder {
            builder: T::create_builder(capacity),
            validity: MutableBitmap::with_capacity(capacity),
        }
    }
}

impl<T: ValueType> NullableColumnBuilder<T> {
    pub fn len(&self) -> usize {
        self.validity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, item: T::ScalarRef<'_>) {
        T::push_item(&mut self.builder, item);
        self.validity.push(true);
    }

    pub fn push_null(&mut self) {
        T::push_default(&mut self.builder);
        self.validity.push(false);
    }

    pub fn build(self) -> NullableColumn<T> {
        NullableColumn {
            column: T::build_column(self.builder),
            validity: self.validity.into(),
        }
    }

    pub fn build_scalar(self) -> Option<T::Scalar> {
        debug_assert_eq!(self.len(), 1);
        if self.validity.len() == 1 && self.validity.get(0) {
            Some(T::build_scalar(self.builder))
        } else {
            None
        }
    }
}
