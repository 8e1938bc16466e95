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

//! Builtin scalar functions and the entry point that evaluates them over a batch.

use bitmapdb_common_exception::Result;
use bitmapdb_common_expression::types::AnyType;
use bitmapdb_common_expression::EvalOutput;
use bitmapdb_common_expression::Evaluator;
use bitmapdb_common_expression::FunctionContext;
use bitmapdb_common_expression::FunctionRegistry;
use bitmapdb_common_expression::Value;
use log::debug;
use once_cell::sync::Lazy;

pub mod scalars;

pub static BUILTIN_FUNCTIONS: Lazy<FunctionRegistry> = Lazy::new(builtin_functions);

fn builtin_functions() -> FunctionRegistry {
    let mut registry = FunctionRegistry::empty();
    scalars::register(&mut registry);
    debug!(
        "Registered {} builtin function overloads",
        registry.num_functions()
    );
    registry
}

/// Evaluates the builtin function `name` over one batch of `num_rows` rows.
///
/// Rows that fail on their own come back as NULL and are listed in [`EvalOutput::errors`];
/// an `Err` aborts the whole batch.
pub fn eval_function(
    name: &str,
    args: &[Value<AnyType>],
    num_rows: usize,
    func_ctx: &FunctionContext,
) -> Result<EvalOutput> {
    Evaluator::new(num_rows, func_ctx, &BUILTIN_FUNCTIONS).run(name, args)
}
