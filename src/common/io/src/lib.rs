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

mod bitmap;
mod hash;
mod number;

pub use bitmap::deserialize_bitmap;
pub use bitmap::BitmapValue;
pub use hash::murmur_hash3_32;
pub use hash::MURMUR3_32_SEED;
pub use number::parse_unsigned_int;
pub use number::split_and_parse_unsigned;
