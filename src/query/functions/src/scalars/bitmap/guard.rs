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

use bitmapdb_common_exception::ErrorCode;
use bitmapdb_common_exception::Result;
use bitmapdb_common_expression::FunctionContext;

/// Counts the bitmap members one function call materializes and aborts the call once the
/// total would pass `max_length_for_bitmap_function`. [`BitmapLengthGuard::check_row`]
/// applies the same limit to a single bitmap.
///
/// A guard lives for one call only; it is never shared between calls.
#[derive(Debug)]
pub struct BitmapLengthGuard {
    function: &'static str,
    limit: u64,
    accumulated: u64,
}

impl BitmapLengthGuard {
    pub fn new(function: &'static str, func_ctx: &FunctionContext) -> Self {
        BitmapLengthGuard {
            function,
            limit: func_ctx.max_length_for_bitmap_function,
            accumulated: 0,
        }
    }

    pub fn check(&mut self, cardinality: u64) -> Result<()> {
        match self.accumulated.checked_add(cardinality) {
            Some(total) if total <= self.limit => {
                self.accumulated = total;
                Ok(())
            }
            _ => Err(self.limit_exceeded()),
        }
    }

    /// Checks one bitmap on its own, leaving the running total untouched.
    pub fn check_row(&self, cardinality: u64) -> Result<()> {
        if cardinality > self.limit {
            return Err(self.limit_exceeded());
        }
        Ok(())
    }

    fn limit_exceeded(&self) -> ErrorCode {
        ErrorCode::BitmapLimitExceeded(format!(
            "{} not supported size > {}",
            self.function, self.limit
        ))
    }

    pub fn accumulated(&self) -> u64 {
        self.accumulated
    }
}
