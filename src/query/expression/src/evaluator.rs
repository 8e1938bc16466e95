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
use log::debug;
use log::warn;

use crate::function::EvalContext;
use crate::function::FunctionContext;
use crate::function::FunctionRegistry;
use crate::function::RowErrors;
use crate::types::AnyType;
use crate::values::Value;

/// The outcome of a call that was not aborted.
#[derive(Debug, Clone)]
pub struct EvalOutput {
    pub value: Value<AnyType>,
    /// Rows that failed on their own and were emitted as NULL.
    pub errors: Option<RowErrors>,
}

pub struct Evaluator<'a> {
    num_rows: usize,
    func_ctx: &'a FunctionContext,
    fn_registry: &'a FunctionRegistry,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        num_rows: usize,
        func_ctx: &'a FunctionContext,
        fn_registry: &'a FunctionRegistry,
    ) -> Self {
        Evaluator {
            num_rows,
            func_ctx,
            fn_registry,
        }
    }

    /// Evaluates `func_name` over one batch of `num_rows` rows.
    ///
    /// A constant argument stands for every row. The `Err` arm means the whole call was
    /// aborted and no output exists.
    pub fn run(&self, func_name: &str, args: &[Value<AnyType>]) -> Result<EvalOutput> {
        let func = self.fn_registry.get(func_name, args.len())?;

        for (i, arg) in args.iter().enumerate() {
            if let Value::Column(col) = arg {
                if col.len() != self.num_rows {
                    return Err(ErrorCode::BadArguments(format!(
                        "Argument {} of {} has {} rows, expected {}",
                        i + 1,
                        func_name,
                        col.len(),
                        self.num_rows
                    )));
                }
            }
        }

        let args = args.iter().map(Value::as_ref).collect::<Vec<_>>();
        let mut ctx = EvalContext::new(self.num_rows, self.func_ctx);
        let value = (func.eval)(&args, &mut ctx).map_err(|err| {
            warn!("{} aborted: {}", func.signature, err);
            err
        })?;

        let errors = ctx.take_errors();
        if let Some(errors) = &errors {
            debug!(
                "{} emitted NULL for {} failed rows: {}",
                func_name,
                errors.num_failed(),
                errors.message
            );
        }
        Ok(EvalOutput { value, errors })
    }
}
