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

use bitmapdb_common_column::buffer::Buffer;

use crate::types::ArgType;
use crate::types::DataType;
use crate::types::ValueType;
use crate::values::Column;
use crate::values::Scalar;
use crate::ScalarRef;

/// Variable-length lists of `T`. A single list is represented by a column of `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType<T: ValueType>(PhantomData<T>);

impl<T: ArgType> ValueType for ArrayType<T> {
    type Scalar = T::Column;
    type ScalarRef<'a> = T::Column;
    type Column = ArrayColumn<T>;
    type ColumnIterator<'a> = ArrayIterator<'a, T>;
    type ColumnBuilder = ArrayColumnBuilder<T>;

    #[inline]
    fn upcast_gat<'short, 'long: 'short>(long: T::Column) -> T::Column {
        long
    }

    fn to_owned_scalar(scalar: Self::ScalarRef<'_>) -> Self::Scalar {
        scalar
    }

    fn to_scalar_ref(scalar: &Self::Scalar) -> Self::ScalarRef<'_> {
        scalar.clone()
    }

    fn try_downcast_scalar<'a>(scalar: &'a ScalarRef) -> Option<Self::ScalarRef<'a>> {
        T::try_downcast_column(scalar.as_array()?)
    }

    fn try_downcast_column(col: &Column) -> Option<Self::Column> {
        let array = col.as_array()?;
        Some(ArrayColumn {
            values: T::try_downcast_column(&array.values)?,
            offsets: array.offsets.clone(),
        })
    }

    fn upcast_scalar(scalar: Self::Scalar) -> Scalar {
        Scalar::Array(T::upcast_column(scalar))
    }

    fn upcast_column(col: Self::Column) -> Column {
        Column::Array(Box::new(ArrayColumn {
            values: T::upcast_column(col.values),
            offsets: col.offsets,
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
        ArrayIterator { col, index: 0 }
    }

    fn builder_len(builder: &Self::ColumnBuilder) -> usize {
        builder.len()
    }

    fn push_item(builder: &mut Self::ColumnBuilder, item: Self::ScalarRef<'_>) {
        builder.push(item);
    }

    fn push_default(builder: &mut Self::ColumnBuilder) {
        builder.commit_row();
    }

    fn build_column(builder: Self::ColumnBuilder) -> Self::Column {
        builder.build()
    }

    fn build_scalar(builder: Self::ColumnBuilder) -> Self::Scalar {
        builder.build_scalar()
    }
}

impl<T: ArgType> ArgType for ArrayType<T> {
    fn data_type() -> DataType {
        DataType::Array(Box::new(T::data_type()))
    }

    fn create_builder(capacity: usize) -> Self::ColumnBuilder {
        ArrayColumnBuilder::with_capacity(capacity, 0)
    }
}

/// The elements of all rows flattened into `values`; row `i` spans
/// `offsets[i]..offsets[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayColumn<T: ValueType> {
    pub values: T::Column,
    pub offsets: Buffer<u64>,
}

impl<T: ValueType> ArrayColumn<T> {
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, index: usize) -> Option<T::Column> {
        if index + 1 >= self.offsets.len() {
            return None;
        }
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        Some(T::slice_column(&self.values, start..end))
    }

    pub fn slice(&self, range: Range<usize>) -> Self {
        ArrayColumn {
            values: self.values.clone(),
            offsets: self
                .offsets
                .clone()
                .sliced(range.start, range.end - range.start + 1),
        }
    }
}

pub struct ArrayIterator<'a, T: ValueType> {
    col: &'a ArrayColumn<T>,
    index: usize,
}

impl<T: ValueType> Iterator for ArrayIterator<'_, T> {
    type Item = T::Column;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.col.index(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.col.len() - self.index;
        (remaining, Some(remaining))
    }
}

#[derive(Debug, Clone)]
pub struct ArrayColumnBuilder<T: ValueType> {
    pub builder: T::ColumnBuilder,
    pub offsets: Vec<u64>,
}

impl<T: ArgType> ArrayColumnBuilder<T> {
    pub fn with_capacity(len: usize, values_capacity: usize) -> Self {
        let mut offsets = Vec::with_capacity(len + 1);
        offsets.push(0);
        ArrayColumnBuilder {
            builder: T::create_builder(values_capacity),
            offsets,
        }
    }
}

impl<T: ValueType> ArrayColumnBuilder<T> {
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends every element of `item` as one row.
    pub fn push(&mut self, item: T::Column) {
        for value in T::iter_column(&item) {
            T::push_item(&mut self.builder, value);
        }
        self.commit_row();
    }

    /// Closes the current row; elements pushed to `builder` since the previous commit belong
    /// to it.
    pub fn commit_row(&mut self) {
        self.offsets.push(T::builder_len(&self.builder) as u64);
    }

    pub fn build(self) -> ArrayColumn<T> {
        ArrayColumn {
            values: T::build_column(self.builder),
            offsets: self.offsets.into(),
        }
    }

    pub fn build_scalar(self) -> T::Column {
        debug_assert_eq!(self.len(), 1);
        T::build_column(self.builder)
    }
}
