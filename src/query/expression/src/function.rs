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


use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

use bitmapdb_common_column::bitmap::Bitmap;
use bitmapdb_common_column::bitmap::MutableBitmap;
use bitmapdb_common_exception::ErrorCode;
use bitmapdb_common_exception::Result;
use itertools::Itertools;
use log::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::types::AnyType;
use crate::types::DataType;
use crate::values::Value;
use crate::values::ValueRef;

pub type ScalarFunction =
    dyn Fn(&[ValueRef<AnyType>], &mut EvalContext) -> Result<Value<AnyType>> + Send + Sync;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub args_type: Vec<DataType>,
    pub return_type: DataType,
}

impl Display for FunctionSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}) -> {}",
            self.name,
            self.args_type.iter().join(", "),
            self.return_type
        )
    }
}

pub struct Function {
    pub signature: FunctionSignature,
    pub eval: Box<ScalarFunction>,
}

/// Limits every function call runs under. Snapshotted from the session settings before a
/// batch is evaluated and never changed during the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionContext {
    /// Largest cardinality a size-proportional function may materialize in one call.
    pub max_length_for_bitmap_function: u64,
    /// Longest text, in bytes, `bitmap_from_string` accepts.
    pub max_length_for_bitmap_from_string: u64,
}

impl Default for FunctionContext {
    fn default() -> Self {
        FunctionContext {
            max_length_for_bitmap_function: 1_000_000,
            max_length_for_bitmap_from_string: i32::MAX as u64,
        }
    }
}

pub struct EvalContext<'a> {
    pub num_rows: usize,
    /// Rows NULL in the arguments. Errors raised on them are ignored.
    pub validity: Option<Bitmap>,
    /// Unset bits mark the failed rows; the message is the first one reported.
    pub errors: Option<(MutableBitmap, String)>,
    pub func_ctx: &'a FunctionContext,
}

impl<'a> EvalContext<'a> {
    pub fn new(num_rows: usize, func_ctx: &'a FunctionContext) -> Self {
        EvalContext {
            num_rows,
            validity: None,
            errors: None,
            func_ctx,
        }
    }

    /// Reports a row-local failure. The row's output is decided by the caller; evaluation of
    /// the remaining rows continues.
    #[inline]
    pub fn set_error(&mut self, row: usize, error_msg: impl Into<String>) {
        // If the row is NULL, we don't need to set error.
        if self
            .validity
            .as_ref()
            .map(|v| row < v.len() && !v.get_bit(row))
            .unwrap_or(false)
        {
            return;
        }

        match self.errors.as_mut() {
            Some((valids, _)) => {
                valids.set(row, false);
            }
            None => {
                let mut valids = MutableBitmap::from_len_constant(self.num_rows.max(row + 1), true);
                valids.set(row, false);
                self.errors = Some((valids, error_msg.into()));
            }
        }
    }

    pub fn has_error(&self) -> bool {
        self.errors.is_some()
    }

    pub fn take_errors(&mut self) -> Option<RowErrors> {
        let (valids, message) = self.errors.take()?;
        let failed: Bitmap = Bitmap::from(valids).iter().map(|valid| !valid).collect();
        Some(RowErrors { failed, message })
    }
}

/// Diagnostics of the rows that failed without aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowErrors {
    /// Set bits mark the failed rows.
    pub failed: Bitmap,
    /// The first reported message.
    pub message: String,
}

impl RowErrors {
    pub fn failed_rows(&self) -> Vec<usize> {
        self.failed
            .iter()
            .enumerate()
            .filter_map(|(row, failed)| failed.then_some(row))
            .collect()
    }

    pub fn num_failed(&self) -> usize {
        self.failed.len() - self.failed.unset_bits()
    }
}

#[derive(Default)]
pub struct FunctionRegistry {
    pub funcs: HashMap<String, Vec<Arc<Function>>>,
}

impl FunctionRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn register_function(&mut self, func: Function) {
        let name = func.signature.name.clone();
        debug!("register function {}", func.signature);
        self.funcs.entry(name).or_default().push(Arc::new(func));
    }

    pub fn contains(&self, func_name: &str) -> bool {
        self.funcs.contains_key(func_name)
    }

    pub fn num_functions(&self) -> usize {
        self.funcs.values().map(Vec::len).sum()
    }

    pub fn signatures(&self, func_name: &str) -> Vec<&FunctionSignature> {
        self.funcs
            .get(func_name)
            .map(|funcs| funcs.iter().map(|func| &func.signature).collect())
            .unwrap_or_default()
    }

    /// The overload of `func_name` taking `num_args` arguments.
    pub fn get(&self, func_name: &str, num_args: usize) -> Result<Arc<Function>> {
        let funcs = self
            .funcs
            .get(func_name)
            .ok_or_else(|| ErrorCode::UnknownFunction(format!("Unknown function {func_name}")))?;
        funcs
            .iter()
            .find(|func| func.signature.args_type.len() == num_args)
            .cloned()
            .ok_or_else(|| {
                ErrorCode::NumberArgumentsNotMatch(format!(
                    "Function {} expects {} arguments, but got {}",
                    func_name,
                    funcs
                        .iter()
                        .map(|func| func.signature.args_type.len())
                        .join(" or "),
                    num_args
                ))
            })
    }
}
