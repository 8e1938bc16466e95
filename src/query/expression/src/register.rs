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


use bitmapdb_common_column::bitmap::Bitmap;
use bitmapdb_common_exception::ErrorCode;
use bitmapdb_common_exception::Result;

use crate::function::EvalContext;
use crate::function::Function;
use crate::function::FunctionRegistry;
use crate::function::FunctionSignature;
use crate::function::ScalarFunction;
use crate::types::nullable::NullableColumn;
use crate::types::AnyType;
use crate::types::ArgType;
use crate::types::NullableType;
use crate::values::Value;
use crate::values::ValueRef;

impl FunctionRegistry {
    pub fn register_0_arg_core<O: ArgType, F>(&mut self, name: &str, func: F)
    where F: Fn(&mut EvalContext) -> Result<Value<O>> + 'static + Send + Sync {
        self.register_function(Function {
            signature: FunctionSignature {
                name: name.to_string(),
                args_type: vec![],
                return_type: O::data_type(),
            },
            eval: erase_function(move |_, ctx| Ok(func(ctx)?.upcast())),
        });
    }

    pub fn register_1_arg_core<I1: ArgType, O: ArgType, F>(&mut self, name: &str, func: F)
    where F: for<'a> Fn(ValueRef<'a, I1>, &mut EvalContext) -> Result<Value<O>>
            + 'static
            + Send
            + Sync {
        let fn_name = name.to_string();
        self.register_function(Function {
            signature: FunctionSignature {
                name: name.to_string(),
                args_type: vec![I1::data_type()],
                return_type: O::data_type(),
            },
            eval: erase_function(move |args, ctx| {
                let arg1 = downcast_arg::<I1>(&fn_name, args, 0)?;
                Ok(func(arg1, ctx)?.upcast())
            }),
        });
    }

    pub fn register_2_arg_core<I1: ArgType, I2: ArgType, O: ArgType, F>(
        &mut self,
        name: &str,
        func: F,
    ) where
        F: for<'a> Fn(ValueRef<'a, I1>, ValueRef<'a, I2>, &mut EvalContext) -> Result<Value<O>>
            + 'static
            + Send
            + Sync,
    {
        let fn_name = name.to_string();
        self.register_function(Function {
            signature: FunctionSignature {
                name: name.to_string(),
                args_type: vec![I1::data_type(), I2::data_type()],
                return_type: O::data_type(),
            },
            eval: erase_function(move |args, ctx| {
                let arg1 = downcast_arg::<I1>(&fn_name, args, 0)?;
                let arg2 = downcast_arg::<I2>(&fn_name, args, 1)?;
                Ok(func(arg1, arg2, ctx)?.upcast())
            }),
        });
    }

    pub fn register_3_arg_core<I1: ArgType, I2: ArgType, I3: ArgType, O: ArgType, F>(
        &mut self,
        name: &str,
        func: F,
    ) where
        F: for<'a> Fn(
                ValueRef<'a, I1>,
                ValueRef<'a, I2>,
                ValueRef<'a, I3>,
                &mut EvalContext,
            ) -> Result<Value<O>>
            + 'static
            + Send
            + Sync,
    {
        let fn_name = name.to_string();
        self.register_function(Function {
            signature: FunctionSignature {
                name: name.to_string(),
                args_type: vec![I1::data_type(), I2::data_type(), I3::data_type()],
                return_type: O::data_type(),
            },
            eval: erase_function(move |args, ctx| {
                let arg1 = downcast_arg::<I1>(&fn_name, args, 0)?;
                let arg2 = downcast_arg::<I2>(&fn_name, args, 1)?;
                let arg3 = downcast_arg::<I3>(&fn_name, args, 2)?;
                Ok(func(arg1, arg2, arg3, ctx)?.upcast())
            }),
        });
    }

    /// Registers `func`, written for non-NULL arguments, over nullable arguments: a row is
    /// NULL in the output iff it is NULL in any argument. If an argument is NULL on every row
    /// `func` is not called at all. When no row is NULL the result carries no validity mask.
    pub fn register_passthrough_nullable_1_arg<I1: ArgType, O: ArgType, F>(
        &mut self,
        name: &str,
        func: F,
    ) where
        F: for<'a> Fn(ValueRef<'a, I1>, &mut EvalContext) -> Result<Value<O>>
            + 'static
            + Copy
            + Send
            + Sync,
    {
        let func = passthrough_nullable_1_arg(func);
        let fn_name = name.to_string();
        self.register_function(Function {
            signature: FunctionSignature {
                name: name.to_string(),
                args_type: vec![NullableType::<I1>::data_type()],
                return_type: NullableType::<O>::data_type(),
            },
            eval: erase_function(move |args, ctx| {
                let arg1 = downcast_arg::<NullableType<I1>>(&fn_name, args, 0)?;
                Ok(upcast_omitting_validity(func(arg1, ctx)?))
            }),
        });
    }

    pub fn register_passthrough_nullable_2_arg<I1: ArgType, I2: ArgType, O: ArgType, F>(
        &mut self,
        name: &str,
        func: F,
    ) where
        F: for<'a> Fn(ValueRef<'a, I1>, ValueRef<'a, I2>, &mut EvalContext) -> Result<Value<O>>
            + 'static
            + Copy
            + Send
            + Sync,
    {
        let func = passthrough_nullable_2_arg(func);
        let fn_name = name.to_string();
        self.register_function(Function {
            signature: FunctionSignature {
                name: name.to_string(),
                args_type: vec![
                    NullableType::<I1>::data_type(),
                    NullableType::<I2>::data_type(),
                ],
                return_type: NullableType::<O>::data_type(),
            },
            eval: erase_function(move |args, ctx| {
                let arg1 = downcast_arg::<NullableType<I1>>(&fn_name, args, 0)?;
                let arg2 = downcast_arg::<NullableType<I2>>(&fn_name, args, 1)?;
                Ok(upcast_omitting_validity(func(arg1, arg2, ctx)?))
            }),
        });
    }

    /// Like the passthrough registration, but `func` may itself produce NULL rows; the
    /// output validity is the conjunction of the arguments' and `func`'s.
    pub fn register_combine_nullable_1_arg<I1: ArgType, O: ArgType, F>(
        &mut self,
        name: &str,
        func: F,
    ) where
        F: for<'a> Fn(ValueRef<'a, I1>, &mut EvalContext) -> Result<Value<NullableType<O>>>
            + 'static
            + Copy
            + Send
            + Sync,
    {
        self.register_1_arg_core::<NullableType<I1>, NullableType<O>, _>(
            name,
            combine_nullable_1_arg(func),
        );
    }

    pub fn register_combine_nullable_2_arg<I1: ArgType, I2: ArgType, O: ArgType, F>(
        &mut self,
        name: &str,
        func: F,
    ) where
        F: for<'a> Fn(
                ValueRef<'a, I1>,
                ValueRef<'a, I2>,
                &mut EvalContext,
            ) -> Result<Value<NullableType<O>>>
            + 'static
            + Copy
            + Send
            + Sync,
    {
        self.register_2_arg_core::<NullableType<I1>, NullableType<I2>, NullableType<O>, _>(
            name,
            combine_nullable_2_arg(func),
        );
    }

    pub fn register_combine_nullable_3_arg<
        I1: ArgType,
        I2: ArgType,
        I3: ArgType,
        O: ArgType,
        F,
    >(
        &mut self,
        name: &str,
        func: F,
    ) where
        F: for<'a> Fn(
                ValueRef<'a, I1>,
                ValueRef<'a, I2>,
                ValueRef<'a, I3>,
                &mut EvalContext,
            ) -> Result<Value<NullableType<O>>>
            + 'static
            + Copy
            + Send
            + Sync,
    {
        self.register_3_arg_core::<
            NullableType<I1>,
            NullableType<I2>,
            NullableType<I3>,
            NullableType<O>,
            _,
        >(name, combine_nullable_3_arg(func));
    }
}

fn erase_function<F>(func: F) -> Box<ScalarFunction>
where F: Fn(&[ValueRef<AnyType>], &mut EvalContext) -> Result<Value<AnyType>>
        + 'static
        + Send
        + Sync {
    Box::new(func)
}

fn downcast_arg<'a, T: ArgType>(
    fn_name: &str,
    args: &'a [ValueRef<AnyType>],
    index: usize,
) -> Result<ValueRef<'a, T>> {
    let arg = args.get(index).ok_or_else(|| {
        ErrorCode::NumberArgumentsNotMatch(format!(
            "Function {} expects at least {} arguments, but got {}",
            fn_name,
            index + 1,
            args.len()
        ))
    })?;
    arg.try_downcast::<T>().ok_or_else(|| {
        ErrorCode::IllegalDataType(format!(
            "Function {} expects argument {} of type {}, but got {}",
            fn_name,
            index + 1,
            T::data_type(),
            arg.data_type()
        ))
    })
}

/// Splits a nullable argument into its values and validity. Returns `None` when the argument
/// is NULL on every row.
fn split_nullable<T: ArgType>(arg: ValueRef<NullableType<T>>) -> Option<(ValueRef<T>, Option<Bitmap>)> {
    match arg {
        ValueRef::Scalar(None) => None,
        ValueRef::Scalar(Some(scalar)) => Some((ValueRef::Scalar(scalar), None)),
        ValueRef::Column(col) if col.is_all_null() => None,
        ValueRef::Column(NullableColumn { column, validity }) => {
            Some((ValueRef::Column(column), Some(validity)))
        }
    }
}

fn and_validity(lhs: Option<Bitmap>, rhs: Option<Bitmap>) -> Option<Bitmap> {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => Some(lhs.and(&rhs)),
        (lhs, None) => lhs,
        (None, rhs) => rhs,
    }
}

/// NULL on every row: a NULL constant if every argument was constant, otherwise a column.
fn all_null<O: ArgType>(is_scalar: bool, num_rows: usize) -> Value<NullableType<O>> {
    if is_scalar {
        return Value::Scalar(None);
    }
    let mut builder = O::create_builder(num_rows);
    for _ in 0..num_rows {
        O::push_default(&mut builder);
    }
    Value::Column(NullableColumn {
        column: O::build_column(builder),
        validity: Bitmap::new_constant(false, num_rows),
    })
}

fn with_validity<O: ArgType>(value: Value<O>, validity: Option<Bitmap>) -> Value<NullableType<O>> {
    match value {
        Value::Scalar(scalar) => Value::Scalar(Some(scalar)),
        Value::Column(column) => {
            let validity =
                validity.unwrap_or_else(|| Bitmap::new_constant(true, O::column_len(&column)));
            Value::Column(NullableColumn { column, validity })
        }
    }
}

fn merge_validity<O: ArgType>(
    value: Value<NullableType<O>>,
    validity: Option<Bitmap>,
) -> Value<NullableType<O>> {
    match (value, validity) {
        (Value::Column(col), Some(validity)) => Value::Column(NullableColumn {
            validity: col.validity.and(&validity),
            column: col.column,
        }),
        (value, _) => value,
    }
}

fn upcast_omitting_validity<O: ArgType>(value: Value<NullableType<O>>) -> Value<AnyType> {
    match value {
        Value::Column(col) if col.validity.null_count() == 0 => {
            Value::Column(O::upcast_column(col.column))
        }
        value => value.upcast(),
    }
}

pub fn passthrough_nullable_1_arg<I1: ArgType, O: ArgType>(
    func: impl for<'a> Fn(ValueRef<'a, I1>, &mut EvalContext) -> Result<Value<O>> + Copy + Send + Sync,
) -> impl for<'a> Fn(ValueRef<'a, NullableType<I1>>, &mut EvalContext) -> Result<Value<NullableType<O>>>
+ Copy
+ Send
+ Sync {
    move |arg1, ctx| {
        let is_scalar = arg1.is_scalar();
        let Some((arg1, validity)) = split_nullable(arg1) else {
            return Ok(all_null::<O>(is_scalar, ctx.num_rows));
        };
        ctx.validity = validity.clone();
        let value = func(arg1, ctx)?;
        Ok(with_validity(value, validity))
    }
}

pub fn passthrough_nullable_2_arg<I1: ArgType, I2: ArgType, O: ArgType>(
    func: impl for<'a> Fn(ValueRef<'a, I1>, ValueRef<'a, I2>, &mut EvalContext) -> Result<Value<O>>
    + Copy
    + Send
    + Sync,
) -> impl for<'a> Fn(
    ValueRef<'a, NullableType<I1>>,
    ValueRef<'a, NullableType<I2>>,
    &mut EvalContext,
) -> Result<Value<NullableType<O>>>
+ Copy
+ Send
+ Sync {
    move |arg1, arg2, ctx| {
        let is_scalar = arg1.is_scalar() && arg2.is_scalar();
        let (Some((arg1, validity1)), Some((arg2, validity2))) =
            (split_nullable(arg1), split_nullable(arg2))
        else {
            return Ok(all_null::<O>(is_scalar, ctx.num_rows));
        };
        let validity = and_validity(validity1, validity2);
        ctx.validity = validity.clone();
        let value = func(arg1, arg2, ctx)?;
        Ok(with_validity(value, validity))
    }
}

pub fn combine_nullable_1_arg<I1: ArgType, O: ArgType>(
    func: impl for<'a> Fn(ValueRef<'a, I1>, &mut EvalContext) -> Result<Value<NullableType<O>>>
    + Copy
    + Send
    + Sync,
) -> impl for<'a> Fn(ValueRef<'a, NullableType<I1>>, &mut EvalContext) -> Result<Value<NullableType<O>>>
+ Copy
+ Send
+ Sync {
    move |arg1, ctx| {
        let is_scalar = arg1.is_scalar();
        let Some((arg1, validity)) = split_nullable(arg1) else {
            return Ok(all_null::<O>(is_scalar, ctx.num_rows));
        };
        ctx.validity = validity.clone();
        let value = func(arg1, ctx)?;
        Ok(merge_validity(value, validity))
    }
}

pub fn combine_nullable_2_arg<I1: ArgType, I2: ArgType, O: ArgType>(
    func: impl for<'a> Fn(
        ValueRef<'a, I1>,
        ValueRef<'a, I2>,
        &mut EvalContext,
    ) -> Result<Value<NullableType<O>>>
    + Copy
    + Send
    + Sync,
) -> impl for<'a> Fn(
    ValueRef<'a, NullableType<I1>>,
    ValueRef<'a, NullableType<I2>>,
    &mut EvalContext,
) -> Result<Value<NullableType<O>>>
+ Copy
+ Send
+ Sync {
    move |arg1, arg2, ctx| {
        let is_scalar = arg1.is_scalar() && arg2.is_scalar();
        let (Some((arg1, validity1)), Some((arg2, validity2))) =
            (split_nullable(arg1), split_nullable(arg2))
        else {
            return Ok(all_null::<O>(is_scalar, ctx.num_rows));
        };
        let validity = and_validity(validity1, validity2);
        ctx.validity = validity.clone();
        let value = func(arg1, arg2, ctx)?;
        Ok(merge_validity(value, validity))
    }
}

pub fn combine_nullable_3_arg<I1: ArgType, I2: ArgType, I3: ArgType, O: ArgType>(
    func: impl for<'a> Fn(
        ValueRef<'a, I1>,
        ValueRef<'a, I2>,
        ValueRef<'a, I3>,
        &mut EvalContext,
    ) -> Result<Value<NullableType<O>>>
    + Copy
    + Send
    + Sync,
) -> impl for<'a> Fn(
    ValueRef<'a, NullableType<I1>>,
    ValueRef<'a, NullableType<I2>>,
    ValueRef<'a, NullableType<I3>>,
    &mut EvalContext,
) -> Result<Value<NullableType<O>>>
+ Copy
+ Send
+ Sync {
    move |arg1, arg2, arg3, ctx| {
        let is_scalar = arg1.is_scalar() && arg2.is_scalar() && arg3.is_scalar();
        let (Some((arg1, validity1)), Some((arg2, validity2)), Some((arg3, validity3))) =
            (split_nullable(arg1), split_nullable(arg2), split_nullable(arg3))
        else {
            return Ok(all_null::<O>(is_scalar, ctx.num_rows));
        };
        let validity = and_validity(and_validity(validity1, validity2), validity3);
        ctx.validity = validity.clone();
        let value = func(arg1, arg2, arg3, ctx)?;
        Ok(merge_validity(value, validity))
    }
}

pub fn vectorize_with_builder_1_arg<I1: ArgType, O: ArgType>(
    func: impl Fn(I1::ScalarRef<'_>, &mut O::ColumnBuilder, &mut EvalContext) -> Result<()>
    + Copy
    + Send
    + Sync,
) -> impl Fn(ValueRef<I1>, &mut EvalContext) -> Result<Value<O>> + Copy + Send + Sync {
    move |arg1, ctx| match arg1 {
        ValueRef::Scalar(val) => {
            let mut builder = O::create_builder(1);
            func(val, &mut builder, ctx)?;
            Ok(Value::Scalar(O::build_scalar(builder)))
        }
        ValueRef::Column(col) => {
            let mut builder = O::create_builder(I1::column_len(&col));
            for val in I1::iter_column(&col) {
                func(val, &mut builder, ctx)?;
            }
            Ok(Value::Column(O::build_column(builder)))
        }
    }
}

pub fn vectorize_with_builder_2_arg<I1: ArgType, I2: ArgType, O: ArgType>(
    func: impl Fn(I1::ScalarRef<'_>, I2::ScalarRef<'_>, &mut O::ColumnBuilder, &mut EvalContext) -> Result<()>
    + Copy
    + Send
    + Sync,
) -> impl Fn(ValueRef<I1>, ValueRef<I2>, &mut EvalContext) -> Result<Value<O>> + Copy + Send + Sync
{
    move |arg1, arg2, ctx| {
        if let (ValueRef::Scalar(val1), ValueRef::Scalar(val2)) = (&arg1, &arg2) {
            let mut builder = O::create_builder(1);
            func(val1.clone(), val2.clone(), &mut builder, ctx)?;
            return Ok(Value::Scalar(O::build_scalar(builder)));
        }
        let num_rows = ctx.num_rows;
        let mut builder = O::create_builder(num_rows);
        for (val1, val2) in arg1.iter(num_rows).zip(arg2.iter(num_rows)) {
            func(val1, val2, &mut builder, ctx)?;
        }
        Ok(Value::Column(O::build_column(builder)))
    }
}

pub fn vectorize_with_builder_3_arg<I1: ArgType, I2: ArgType, I3: ArgType, O: ArgType>(
    func: impl Fn(
        I1::ScalarRef<'_>,
        I2::ScalarRef<'_>,
        I3::ScalarRef<'_>,
        &mut O::ColumnBuilder,
        &mut EvalContext,
    ) -> Result<()>
    + Copy
    + Send
    + Sync,
) -> impl Fn(ValueRef<I1>, ValueRef<I2>, ValueRef<I3>, &mut EvalContext) -> Result<Value<O>>
+ Copy
+ Send
+ Sync {
    move |arg1, arg2, arg3, ctx| {
        if let (ValueRef::Scalar(val1), ValueRef::Scalar(val2), ValueRef::Scalar(val3)) =
            (&arg1, &arg2, &arg3)
        {
            let mut builder = O::create_builder(1);
            func(val1.clone(), val2.clone(), val3.clone(), &mut builder, ctx)?;
            return Ok(Value::Scalar(O::build_scalar(builder)));
        }
        let num_rows = ctx.num_rows;
        let mut builder = O::create_builder(num_rows);
        for ((val1, val2), val3) in arg1
            .iter(num_rows)
            .zip(arg2.iter(num_rows))
            .zip(arg3.iter(num_rows))
        {
            func(val1, val2, val3, &mut builder, ctx)?;
        }
        Ok(Value::Column(O::build_column(builder)))
    }
}

