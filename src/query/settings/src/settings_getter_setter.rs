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

use bitmapdb_common_exception::Result;
use bitmapdb_common_expression::FunctionContext;

use crate::settings::Settings;

impl Settings {
    pub fn get_max_length_for_bitmap_function(&self) -> Result<u64> {
        self.try_get_u64("max_length_for_bitmap_function")
    }

    pub fn set_max_length_for_bitmap_function(&self, val: u64) -> Result<()> {
        self.try_set_u64("max_length_for_bitmap_function", val)
    }

    pub fn get_max_length_for_bitmap_from_string(&self) -> Result<u64> {
        self.try_get_u64("max_length_for_bitmap_from_string")
    }

    pub fn set_max_length_for_bitmap_from_string(&self, val: u64) -> Result<()> {
        self.try_set_u64("max_length_for_bitmap_from_string", val)
    }

    /// Snapshots the limits the bitmap functions run under.
    pub fn get_function_context(&self) -> Result<FunctionContext> {
        Ok(FunctionContext {
            max_length_for_bitmap_function: self.get_max_length_for_bitmap_function()?,
            max_length_for_bitmap_from_string: self.get_max_length_for_bitmap_from_string()?,
        })
    }
}
