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


pub mod any;
pub mod array;
pub mod bitmap;
pub mod boolean;
pub mod nullable;
pub mod number;
pub mod string;

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

pub use self::any::AnyType;
pub use self::array::ArrayColumn;
pub use self::array::ArrayColumnBuilder;
pub use self::array::ArrayType;
pub use self::bitmap::BitmapType;
pub use self::boolean::BooleanType;
pub use self::nullable::NullableColumn;
pub use self::nullable::NullableColumnBuilder;
pub use self::nullable::NullableType;
pub use self::number::*;
pub use self::string::StringColumn;
pub use self::string::StringColumnBuilder;
pub use self::string::StringType;
use crate::values::Column;
use crate::values::Scalar;
use crate::ScalarRef;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Null,
    Boolean,
    String,
    Number(NumberDataType),
    Bitmap,
    Nullable(Box<DataType>),
    Array(Box<DataType>),
}

impl DataType {
    pub fn wrap_nullable(&self) -> Self {
        match self {
            DataType::Null | DataType::Nullable(_) => self.clone(),
            _ => DataType::Nullable(Box::new(self.clone())),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, DataType::Nullable(_))
    }

    pub fn is_nullable_or_null(&self) -> bool {
        matches!(self, DataType::Nullable(_) | DataType::Null)
    }

    pub fn remove_nullable(&self) -> Self {
        match self {
            DataType::Nullable(ty) => (**ty).clone(),
            _ => self.clone(),
        }
    }

    /// Whether a value of `self` may be passed where `expected` is declared.
    ///
    /// Non-nullable values and untyped NULLs are accepted by nullable parameters.
    pub fn is_compatible_with(&self, expected: &DataType) -> bool {
        match (self, expected) {
            (DataType::Null, DataType::Nullable(_)) => true,
            (DataType::Nullable(ty), DataType::Nullable(expected)) => ty.is_compatible_with(expected),
            (ty, DataType::Nullable(expected)) => ty.is_compatible_with(expected),
            (DataType::Array(ty), DataType::Array(expected)) => ty.is_compatible_with(expected),
            (ty, expected) => ty == expected,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Null => write!(f, "NULL"),
            DataType::Boolean => write!(f, "Boolean"),
            DataType::String => write!(f, "String"),
            DataType::Number(num) => write!(f, "{num}"),
            DataType::Bitmap => write!(f, "Bitmap"),
            DataType::Nullable(inner) => write!(f, "{inner} NULL"),
            DataType::Array(inner) => write!(f, "Array({inner})"),
        }
    }
}

/// Statically typed access to one kind of scalar and column.
///
/// Kernels are written against a `ValueType` and the registry moves values between the typed
/// and the dynamic ([`Scalar`], [`Column`]) worlds with the downcast/upcast pairs.
pub trait ValueType: Debug + Clone + PartialEq + Sized + 'static {
    type Scalar: Debug + Clone + PartialEq;
    type ScalarRef<'a>: Debug + Clone + PartialEq;
    type Column: Debug + Clone + PartialEq;
    type ColumnIterator<'a>: Iterator<Item = Self::ScalarRef<'a>>;
    type ColumnBuilder: Debug + Clone;

    /// Upcast GAT type's lifetime.
    fn upcast_gat<'short, 'long: 'short>(long: Self::ScalarRef<'long>) -> Self::ScalarRef<'short>;

    fn to_owned_scalar(scalar: Self::ScalarRef<'_>) -> Self::Scalar;
    fn to_scalar_ref(scalar: &Self::Scalar) -> Self::ScalarRef<'_>;

    fn try_downcast_scalar<'a>(scalar: &'a ScalarRef) -> Option<Self::ScalarRef<'a>>;
    fn try_downcast_column(col: &Column) -> Option<Self::Column>;

    fn upcast_scalar(scalar: Self::Scalar) -> Scalar;
    fn upcast_column(col: Self::Column) -> Column;

    fn column_len(col: &Self::Column) -> usize;
    fn index_column(col: &Self::Column, index: usize) -> Option<Self::ScalarRef<'_>>;
    fn slice_column(col: &Self::Column, range: Range<usize>) -> Self::Column;
    fn iter_column(col: &Self::Column) -> Self::ColumnIterator<'_>;

    fn builder_len(builder: &Self::ColumnBuilder) -> usize;
    fn push_item(builder: &mut Self::ColumnBuilder, item: Self::ScalarRef<'_>);
    fn push_default(builder: &mut Self::ColumnBuilder);
    fn build_column(builder: Self::ColumnBuilder) -> Self::Column;
    fn build_scalar(builder: Self::ColumnBuilder) -> Self::Scalar;
}

/// A [`ValueType`] with a fixed [`DataType`], usable as a function argument or result.
pub trait ArgType: ValueType {
    fn data_type() -> DataType;

    fn create_builder(capacity: usize) -> Self::ColumnBuilder;

    fn column_from_vec(vec: Vec<Self::Scalar>) -> Self::Column {
        Self::column_from_iter(vec.iter().map(Self::to_scalar_ref))
    }

    fn column_from_iter<'a>(iter: impl Iterator<Item = Self::ScalarRef<'a>>) -> Self::Column {
        let mut builder = Self::create_builder(iter.size_hint().0);
        for item in iter {
            Self::push_item(&mut builder, item);
        }
        Self::build_column(builder)
    }
}
