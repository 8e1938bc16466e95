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


mod column_from;

pub use self::column_from::*;
use crate::evaluator::EvalOutput;
use crate::evaluator::Evaluator;
use crate::function::FunctionContext;
use crate::function::FunctionRegistry;
use crate::types::AnyType;
use crate::Value;

/// A convenient shortcut to evaluate a scalar function.
pub fn eval_function(
    fn_name: &str,
    args: &[Value<AnyType>],
    num_rows: usize,
    func_ctx: &FunctionContext,
    fn_registry: &FunctionRegistry,
) -> bitmapdb_common_exception::Result<EvalOutput> {
    Evaluator::new(num_rows, func_ctx, fn_registry).run(fn_name, args)
}
