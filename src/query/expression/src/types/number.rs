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


use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::marker::PhantomData;
use std::ops::Range;

use bitmapdb_common_column::buffer::Buffer;
use enum_as_inner::EnumAsInner;
use serde::Deserialize;
use serde::Serialize;

use crate::types::ArgType;
use crate::types::DataType;
use crate::types::ValueType;
use crate::values::Column;
use crate::values::Scalar;
use crate::ScalarRef;

pub type Int64Type = NumberType<i64>;
pub type UInt64Type = NumberType<u64>;
pub type Int128Type = NumberType<i128>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberType<T: Number>(PhantomData<T>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberDataType {
    Int64,
    UInt64,
    Int128,
}

impl Display for NumberDataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberDataType::Int64 => write!(f, "Int64"),
            NumberDataType::UInt64 => write!(f, "UInt64"),
            NumberDataType::Int128 => write!(f, "Int128"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumAsInner)]
pub enum NumberScalar {
    Int64(i64),
    UInt64(u64),
    Int128(i128),
}

impl NumberScalar {
    pub fn data_type(&self) -> NumberDataType {
        match self {
            NumberScalar::Int64(_) => NumberDataType::Int64,
            NumberScalar::UInt64(_) => NumberDataType::UInt64,
            NumberScalar::Int128(_) => NumberDataType::Int128,
        }
    }
}

#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum NumberColumn {
    Int64(Buffer<i64>),
    UInt64(Buffer<u64>),
    Int128(Buffer<i128>),
}

impl NumberColumn {
    pub fn len(&self) -> usize {
        match self {
            NumberColumn::Int64(col) => col.len(),
            NumberColumn::UInt64(col) => col.len(),
            NumberColumn::Int128(col) => col.len(),
        }
    }

    pub fn index(&self, index: usize) -> Option<NumberScalar> {
        match self {
            NumberColumn::Int64(col) => col.get(index).copied().map(NumberScalar::Int64),
            NumberColumn::UInt64(col) => col.get(index).copied().map(NumberScalar::UInt64),
            NumberColumn::Int128(col) => col.get(index).copied().map(NumberScalar::Int128),
        }
    }

    pub fn slice(&self, range: Range<usize>) -> Self {
        match self {
            NumberColumn::Int64(col) => NumberColumn::Int64(col.clone().sliced(range.start, range.len())),
            NumberColumn::UInt64(col) => NumberColumn::UInt64(col.clone().sliced(range.start, range.len())),
            NumberColumn::Int128(col) => NumberColumn::Int128(col.clone().sliced(range.start, range.len())),
        }
    }

    pub fn data_type(&self) -> NumberDataType {
        match self {
            NumberColumn::Int64(_) => NumberDataType::Int64,
            NumberColumn::UInt64(_) => NumberDataType::UInt64,
            NumberColumn::Int128(_) => NumberDataType::Int128,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberColumnBuilder {
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Int128(Vec<i128>),
}

impl NumberColumnBuilder {
    pub fn with_capacity(ty: &NumberDataType, capacity: usize) -> Self {
        match ty {
            NumberDataType::Int64 => NumberColumnBuilder::Int64(Vec::with_capacity(capacity)),
            NumberDataType::UInt64 => NumberColumnBuilder::UInt64(Vec::with_capacity(capacity)),
            NumberDataType::Int128 => NumberColumnBuilder::Int128(Vec::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NumberColumnBuilder::Int64(builder) => builder.len(),
            NumberColumnBuilder::UInt64(builder) => builder.len(),
            NumberColumnBuilder::Int128(builder) => builder.len(),
        }
    }

    /// Pushes `item`, which must match the builder's number type.
    pub fn push(&mut self, item: NumberScalar) {
        match (self, item) {
            (NumberColumnBuilder::Int64(builder), NumberScalar::Int64(v)) => builder.push(v),
            (NumberColumnBuilder::UInt64(builder), NumberScalar::UInt64(v)) => builder.push(v),
            (NumberColumnBuilder::Int128(builder), NumberScalar::Int128(v)) => builder.push(v),
            (builder, item) => unreachable!("unable to push {item:?} to {builder:?}"),
        }
    }

    pub fn push_default(&mut self) {
        match self {
            NumberColumnBuilder::Int64(builder) => builder.push(0),
            NumberColumnBuilder::UInt64(builder) => builder.push(0),
            NumberColumnBuilder::Int128(builder) => builder.push(0),
        }
    }

    pub fn build(self) -> NumberColumn {
        match self {
            NumberColumnBuilder::Int64(builder) => NumberColumn::Int64(builder.into()),
            NumberColumnBuilder::UInt64(builder) => NumberColumn::UInt64(builder.into()),
            NumberColumnBuilder::Int128(builder) => NumberColumn::Int128(builder.into()),
        }
    }

    pub fn build_scalar(self) -> NumberScalar {
        debug_assert_eq!(self.len(), 1);
        match self {
            NumberColumnBuilder::Int64(builder) => NumberScalar::Int64(builder.first().copied().unwrap_or_default()),
            NumberColumnBuilder::UInt64(builder) => NumberScalar::UInt64(builder.first().copied().unwrap_or_default()),
            NumberColumnBuilder::Int128(builder) => NumberScalar::Int128(builder.first().copied().unwrap_or_default()),
        }
    }
}

/// A primitive that can live in a [`NumberColumn`].
pub trait Number: Debug + Clone + Copy + PartialEq + Default + Send + Sync + 'static {
    fn data_type() -> NumberDataType;
    fn try_downcast_scalar(scalar: &NumberScalar) -> Option<Self>;
    fn try_downcast_column(col: &NumberColumn) -> Option<Buffer<Self>>;
    fn upcast_scalar(scalar: Self) -> NumberScalar;
    fn upcast_column(col: Buffer<Self>) -> NumberColumn;
}

macro_rules! impl_number {
    ($ty:ty, $variant:ident) => {
        impl Number for $ty {
            fn data_type() -> NumberDataType {
                NumberDataType::$variant
            }

            fn try_downcast_scalar(scalar: &NumberScalar) -> Option<Self> {
                match scalar {
                    NumberScalar::$variant(v) => Some(*v),
                    _ => None,
                }
            }

            fn try_downcast_column(col: &NumberColumn) -> Option<Buffer<Self>> {
                match col {
                    NumberColumn::$variant(col) => Some(col.clone()),
                    _ => None,
                }
            }

            fn upcast_scalar(scalar: Self) -> NumberScalar {
                NumberScalar::$variant(scalar)
            }

            fn upcast_column(col: Buffer<Self>) -> NumberColumn {
                NumberColumn::$variant(col)
            }
        }
    };
}

impl_number!(i64, Int64);
impl_number!(u64, UInt64);
impl_number!(i128, Int128);

impl<Num: Number> ValueType for NumberType<Num> {
    type Scalar = Num;
    type ScalarRef<'a> = Num;
    type Column = Buffer<Num>;
    type ColumnIterator<'a> = std::iter::Copied<std::slice::Iter<'a, Num>>;
    type ColumnBuilder = Vec<Num>;

    #[inline]
    fn upcast_gat<'short, 'long: 'short>(long: Num) -> Num {
        long
    }

    fn to_owned_scalar(scalar: Self::ScalarRef<'_>) -> Self::Scalar {
        scalar
    }

    fn to_scalar_ref(scalar: &Self::Scalar) -> Self::ScalarRef<'_> {
        *scalar
    }

    fn try_downcast_scalar<'a>(scalar: &'a ScalarRef) -> Option<Self::ScalarRef<'a>> {
        Num::try_downcast_scalar(scalar.as_number()?)
    }

    fn try_downcast_column(col: &Column) -> Option<Self::Column> {
        Num::try_downcast_column(col.as_number()?)
    }

    fn upcast_scalar(scalar: Self::Scalar) -> Scalar {
        Scalar::Number(Num::upcast_scalar(scalar))
    }

    fn upcast_column(col: Self::Column) -> Column {
        Column::Number(Num::upcast_column(col))
    }

    fn column_len(col: &Self::Column) -> usize {
        col.len()
    }

    fn index_column(col: &Self::Column, index: usize) -> Option<Self::ScalarRef<'_>> {
        col.get(index).copied()
    }

    fn slice_column(col: &Self::Column, range: Range<usize>) -> Self::Column {
        col.clone().sliced(range.start, range.len())
    }

    fn iter_column(col: &Self::Column) -> Self::ColumnIterator<'_> {
        col.iter().copied()
    }

    fn builder_len(builder: &Self::ColumnBuilder) -> usize {
        builder.len()
    }

    fn push_item(builder: &mut Self::ColumnBuilder, item: Self::ScalarRef<'_>) {
        builder.push(item);
    }

    fn push_default(builder: &mut Self::ColumnBuilder) {
        builder.push(Num::default());
    }

    fn build_column(builder: Self::ColumnBuilder) -> Self::Column {
        builder.into()
    }

    fn build_scalar(builder: Self::ColumnBuilder) -> Self::Scalar {
        debug_assert_eq!(builder.len(), 1);
        builder.first().copied().unwrap_or_default()
    }
}

impl<Num: Number> ArgType for NumberType<Num> {
    fn data_type() -> DataType {
        DataType::Number(Num::data_type())
    }

    fn create_builder(capacity: usize) -> Self::ColumnBuilder {
        Vec::with_capacity(capacity)
    }
}
