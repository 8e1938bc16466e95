// Copyright 2022 Datafuse Labs.
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


use crate::types::ArgType;
use crate::types::NullableType;
use crate::types::ValueType;
use crate::Column;

/// Builds dynamic columns from plain vectors, mostly for tests.
pub trait FromData<D>: Sized {
    fn from_data(data: Vec<D>) -> Column;

    fn from_opt_data(data: Vec<Option<D>>) -> Column;
}

impl<T: ArgType, D: Into<T::Scalar>> FromData<D> for T {
    fn from_data(data: Vec<D>) -> Column {
        T::upcast_column(T::column_from_vec(data.into_iter().map(Into::into).collect()))
    }

    fn from_opt_data(data: Vec<Option<D>>) -> Column {
        let data = data
            .into_iter()
            .map(|item| item.map(Into::into))
            .collect::<Vec<_>>();
        NullableType::<T>::upcast_column(NullableType::<T>::column_from_vec(data))
    }
}
