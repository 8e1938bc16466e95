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

use bitmapdb_common_column::bitmap::Bitmap;
use bitmapdb_common_column::bitmap::MutableBitmap;
use bitmapdb_common_column::buffer::Buffer;
use bitmapdb_common_io::BitmapValue;
use enum_as_inner::EnumAsInner;

use crate::types::array::ArrayColumn;
use crate::types::array::ArrayColumnBuilder;
use crate::types::nullable::NullableColumn;
use crate::types::nullable::NullableColumnBuilder;
use crate::types::number::NumberColumn;
use crate::types::number::NumberColumnBuilder;
use crate::types::number::NumberScalar;
use crate::types::string::StringColumn;
use crate::types::string::StringColumnBuilder;
use crate::types::AnyType;
use crate::types::BitmapType;
use crate::types::BooleanType;
use crate::types::DataType;
use crate::types::ValueType;

/// The result of evaluating a function over a batch: a constant shared by every row, or one
/// value per row.
#[derive(EnumAsInner, Debug, Clone, PartialEq)]
pub enum Value<T: ValueType> {
    Scalar(T::Scalar),
    Column(T::Column),
}

/// The borrowed form of [`Value`], used for function arguments.
#[derive(EnumAsInner, Debug, Clone, PartialEq)]
pub enum ValueRef<'a, T: ValueType> {
    Scalar(T::ScalarRef<'a>),
    Column(T::Column),
}

impl<T: ValueType> Value<T> {
    pub fn as_ref(&self) -> ValueRef<'_, T> {
        match self {
            Value::Scalar(scalar) => ValueRef::Scalar(T::to_scalar_ref(scalar)),
            Value::Column(col) => ValueRef::Column(col.clone()),
        }
    }

    pub fn upcast(self) -> Value<AnyType> {
        match self {
            Value::Scalar(scalar) => Value::Scalar(T::upcast_scalar(scalar)),
            Value::Column(col) => Value::Column(T::upcast_column(col)),
        }
    }
}

impl<'a, T: ValueType> ValueRef<'a, T> {
    pub fn to_owned(&self) -> Value<T> {
        match self {
            ValueRef::Scalar(scalar) => Value::Scalar(T::to_owned_scalar(scalar.clone())),
            ValueRef::Column(col) => Value::Column(col.clone()),
        }
    }

    /// The value of row `index`; a constant answers for every row.
    pub fn index(&self, index: usize) -> Option<T::ScalarRef<'_>> {
        match self {
            ValueRef::Scalar(scalar) => Some(T::upcast_gat(scalar.clone())),
            ValueRef::Column(col) => T::index_column(col, index),
        }
    }

    /// Iterates the rows, repeating a constant `num_rows` times.
    pub fn iter(&self, num_rows: usize) -> impl Iterator<Item = T::ScalarRef<'_>> + '_ {
        let (scalar, column) = match self {
            ValueRef::Scalar(scalar) => (
                Some(std::iter::repeat(T::upcast_gat(scalar.clone())).take(num_rows)),
                None,
            ),
            ValueRef::Column(col) => (None, Some(T::iter_column(col))),
        };
        scalar
            .into_iter()
            .flatten()
            .chain(column.into_iter().flatten())
    }
}

impl Value<AnyType> {
    pub fn try_downcast<T: ValueType>(&self) -> Option<Value<T>> {
        Some(match self {
            Value::Scalar(scalar) => {
                let scalar = scalar.as_ref();
                let scalar = T::to_owned_scalar(T::try_downcast_scalar(&scalar)?);
                Value::Scalar(scalar)
            }
            Value::Column(col) => Value::Column(T::try_downcast_column(col)?),
        })
    }

    /// The value of row `index`, NULL rows included.
    pub fn index(&self, index: usize) -> Option<ScalarRef<'_>> {
        match self {
            Value::Scalar(scalar) => Some(scalar.as_ref()),
            Value::Column(col) => col.index(index),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Value::Scalar(scalar) => scalar.as_ref().data_type(),
            Value::Column(col) => col.data_type(),
        }
    }
}

impl<'a> ValueRef<'a, AnyType> {
    pub fn try_downcast<T: ValueType>(&self) -> Option<ValueRef<'_, T>> {
        Some(match self {
            ValueRef::Scalar(scalar) => ValueRef::Scalar(T::try_downcast_scalar(scalar)?),
            ValueRef::Column(col) => ValueRef::Column(T::try_downcast_column(col)?),
        })
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ValueRef::Scalar(scalar) => scalar.data_type(),
            ValueRef::Column(col) => col.data_type(),
        }
    }
}

#[derive(EnumAsInner, Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(bool),
    String(String),
    Number(NumberScalar),
    Bitmap(BitmapValue),
    Array(Column),
}

#[derive(EnumAsInner, Debug, Clone, PartialEq)]
pub enum ScalarRef<'a> {
    Null,
    Boolean(bool),
    String(&'a str),
    Number(NumberScalar),
    Bitmap(&'a BitmapValue),
    Array(Column),
}

impl Scalar {
    pub fn as_ref(&self) -> ScalarRef<'_> {
        match self {
            Scalar::Null => ScalarRef::Null,
            Scalar::Boolean(b) => ScalarRef::Boolean(*b),
            Scalar::String(s) => ScalarRef::String(s.as_str()),
            Scalar::Number(n) => ScalarRef::Number(*n),
            Scalar::Bitmap(b) => ScalarRef::Bitmap(b),
            Scalar::Array(col) => ScalarRef::Array(col.clone()),
        }
    }
}

impl ScalarRef<'_> {
    pub fn to_owned(&self) -> Scalar {
        match self {
            ScalarRef::Null => Scalar::Null,
            ScalarRef::Boolean(b) => Scalar::Boolean(*b),
            ScalarRef::String(s) => Scalar::String(s.to_string()),
            ScalarRef::Number(n) => Scalar::Number(*n),
            ScalarRef::Bitmap(b) => Scalar::Bitmap((*b).clone()),
            ScalarRef::Array(col) => Scalar::Array(col.clone()),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ScalarRef::Null => DataType::Null,
            ScalarRef::Boolean(_) => DataType::Boolean,
            ScalarRef::String(_) => DataType::String,
            ScalarRef::Number(n) => DataType::Number(n.data_type()),
            ScalarRef::Bitmap(_) => DataType::Bitmap,
            ScalarRef::Array(col) => DataType::Array(Box::new(col.data_type())),
        }
    }
}

#[derive(EnumAsInner, Debug, Clone, PartialEq)]
pub enum Column {
    Null { len: usize },
    Boolean(Bitmap),
    String(StringColumn),
    Number(NumberColumn),
    Bitmap(Buffer<BitmapValue>),
    Array(Box<ArrayColumn<AnyType>>),
    Nullable(Box<NullableColumn<AnyType>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Null { len } => *len,
            Column::Boolean(col) => col.len(),
            Column::String(col) => col.len(),
            Column::Number(col) => col.len(),
            Column::Bitmap(col) => col.len(),
            Column::Array(col) => col.len(),
            Column::Nullable(col) => col.len(),
        }
    }

    pub fn index(&self, index: usize) -> Option<ScalarRef<'_>> {
        match self {
            Column::Null { len } => (index < *len).then_some(ScalarRef::Null),
            Column::Boolean(col) => BooleanType::index_column(col, index).map(ScalarRef::Boolean),
            Column::String(col) => col.index(index).map(ScalarRef::String),
            Column::Number(col) => col.index(index).map(ScalarRef::Number),
            Column::Bitmap(col) => BitmapType::index_column(col, index).map(ScalarRef::Bitmap),
            Column::Array(col) => col.index(index).map(ScalarRef::Array),
            Column::Nullable(col) => col.index(index).map(|v| v.unwrap_or(ScalarRef::Null)),
        }
    }

    pub fn slice(&self, range: Range<usize>) -> Self {
        assert!(
            range.end <= self.len(),
            "range {:?} out of len {}",
            range,
            self.len()
        );
        match self {
            Column::Null { .. } => Column::Null { len: range.len() },
            Column::Boolean(col) => Column::Boolean(BooleanType::slice_column(col, range)),
            Column::String(col) => Column::String(col.slice(range)),
            Column::Number(col) => Column::Number(col.slice(range)),
            Column::Bitmap(col) => Column::Bitmap(BitmapType::slice_column(col, range)),
            Column::Array(col) => Column::Array(Box::new(col.slice(range))),
            Column::Nullable(col) => Column::Nullable(Box::new(col.slice(range))),
        }
    }

    pub fn iter(&self) -> ColumnIterator<'_> {
        ColumnIterator {
            column: self,
            index: 0,
            len: self.len(),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Column::Null { .. } => DataType::Null,
            Column::Boolean(_) => DataType::Boolean,
            Column::String(_) => DataType::String,
            Column::Number(col) => DataType::Number(col.data_type()),
            Column::Bitmap(_) => DataType::Bitmap,
            Column::Array(col) => DataType::Array(Box::new(col.values.data_type())),
            Column::Nullable(col) => col.column.data_type().wrap_nullable(),
        }
    }

    /// The validity mask of a nullable column, `None` when no row can be NULL.
    pub fn validity(&self) -> Option<&Bitmap> {
        match self {
            Column::Nullable(col) => Some(&col.validity),
            _ => None,
        }
    }
}

pub struct ColumnIterator<'a> {
    column: &'a Column,
    index: usize,
    len: usize,
}

impl<'a> Iterator for ColumnIterator<'a> {
    type Item = ScalarRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let item = self.column.index(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

#[derive(EnumAsInner, Debug, Clone)]
pub enum ColumnBuilder {
    Null { len: usize },
    Boolean(MutableBitmap),
    String(StringColumnBuilder),
    Number(NumberColumnBuilder),
    Bitmap(Vec<BitmapValue>),
    Array(Box<ArrayColumnBuilder<AnyType>>),
    Nullable(Box<NullableColumnBuilder<AnyType>>),
}

impl ColumnBuilder {
    pub fn with_capacity(ty: &DataType, capacity: usize) -> ColumnBuilder {
        match ty {
            DataType::Null => ColumnBuilder::Null { len: 0 },
            DataType::Boolean => ColumnBuilder::Boolean(MutableBitmap::with_capacity(capacity)),
            DataType::String => {
                ColumnBuilder::String(StringColumnBuilder::with_capacity(capacity, 0))
            }
            DataType::Number(num_ty) => {
                ColumnBuilder::Number(NumberColumnBuilder::with_capacity(num_ty, capacity))
            }
            DataType::Bitmap => ColumnBuilder::Bitmap(Vec::with_capacity(capacity)),
            DataType::Array(ty) => {
                let mut offsets = Vec::with_capacity(capacity + 1);
                offsets.push(0);
                ColumnBuilder::Array(Box::new(ArrayColumnBuilder {
                    builder: ColumnBuilder::with_capacity(ty, 0),
                    offsets,
                }))
            }
            DataType::Nullable(ty) => ColumnBuilder::Nullable(Box::new(NullableColumnBuilder {
                builder: ColumnBuilder::with_capacity(ty, capacity),
                validity: MutableBitmap::with_capacity(capacity),
            })),
        }
    }

    /// A builder holding `n` copies of `item`.
    pub fn repeat(item: &ScalarRef, n: usize, ty: &DataType) -> ColumnBuilder {
        let mut builder = ColumnBuilder::with_capacity(ty, n);
        for _ in 0..n {
            builder.push(item.clone());
        }
        builder
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnBuilder::Null { len } => *len,
            ColumnBuilder::Boolean(builder) => builder.len(),
            ColumnBuilder::String(builder) => builder.len(),
            ColumnBuilder::Number(builder) => builder.len(),
            ColumnBuilder::Bitmap(builder) => builder.len(),
            ColumnBuilder::Array(builder) => builder.len(),
            ColumnBuilder::Nullable(builder) => builder.len(),
        }
    }

    pub fn push(&mut self, item: ScalarRef) {
        match (self, item) {
            (ColumnBuilder::Null { len }, ScalarRef::Null) => *len += 1,
            (ColumnBuilder::Boolean(builder), ScalarRef::Boolean(value)) => builder.push(value),
            (ColumnBuilder::String(builder), ScalarRef::String(value)) => {
                builder.put_str(value);
                builder.commit_row();
            }
            (ColumnBuilder::Number(builder), ScalarRef::Number(value)) => builder.push(value),
            (ColumnBuilder::Bitmap(builder), ScalarRef::Bitmap(value)) => {
                builder.push(value.clone())
            }
            (ColumnBuilder::Array(builder), ScalarRef::Array(value)) => builder.push(value),
            (ColumnBuilder::Nullable(builder), ScalarRef::Null) => builder.push_null(),
            (ColumnBuilder::Nullable(builder), value) => builder.push(value),
            (builder, value) => unreachable!("unable to push {value:?} to {builder:?}"),
        }
    }

    pub fn push_default(&mut self) {
        match self {
            ColumnBuilder::Null { len } => *len += 1,
            ColumnBuilder::Boolean(builder) => builder.push(false),
            ColumnBuilder::String(builder) => builder.commit_row(),
            ColumnBuilder::Number(builder) => builder.push_default(),
            ColumnBuilder::Bitmap(builder) => builder.push(BitmapValue::new()),
            ColumnBuilder::Array(builder) => builder.commit_row(),
            ColumnBuilder::Nullable(builder) => builder.push_null(),
        }
    }

    pub fn build(self) -> Column {
        match self {
            ColumnBuilder::Null { len } => Column::Null { len },
            ColumnBuilder::Boolean(builder) => Column::Boolean(builder.into()),
            ColumnBuilder::String(builder) => Column::String(builder.build()),
            ColumnBuilder::Number(builder) => Column::Number(builder.build()),
            ColumnBuilder::Bitmap(builder) => Column::Bitmap(builder.into()),
            ColumnBuilder::Array(builder) => Column::Array(Box::new(builder.build())),
            ColumnBuilder::Nullable(builder) => Column::Nullable(Box::new(builder.build())),
        }
    }

    pub fn build_scalar(self) -> Scalar {
        match self {
            ColumnBuilder::Null { .. } => Scalar::Null,
            ColumnBuilder::Boolean(builder) => Scalar::Boolean(BooleanType::build_scalar(builder)),
            ColumnBuilder::String(builder) => Scalar::String(builder.build_scalar()),
            ColumnBuilder::Number(builder) => Scalar::Number(builder.build_scalar()),
            ColumnBuilder::Bitmap(builder) => Scalar::Bitmap(BitmapType::build_scalar(builder)),
            ColumnBuilder::Array(builder) => Scalar::Array(builder.build_scalar()),
            ColumnBuilder::Nullable(builder) => builder.build_scalar().unwrap_or(Scalar::Null),
        }
    }
}
