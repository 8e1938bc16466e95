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


#![allow(clippy::uninlined_format_args)]
#![allow(clippy::len_without_is_empty)]

//! Column access layer: data types, typed and dynamic columns, and the function registry the
//! scalar functions are evaluated through.

mod evaluator;
mod function;
mod register;
pub mod types;
pub mod utils;
pub mod values;

pub use crate::evaluator::*;
pub use crate::function::*;
pub use crate::register::*;
pub use crate::utils::*;
pub use crate::values::*;
