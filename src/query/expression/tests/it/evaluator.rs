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

use bitmapdb_common_exception::ErrorCode;
use bitmapdb_common_exception::Result;
use bitmapdb_common_expression::eval_function;
use bitmapdb_common_expression::types::AnyType;
use bitmapdb_common_expression::types::Int64Type;
use bitmapdb_common_expression::types::NullableType;
use bitmapdb_common_expression::types::NumberScalar;
use bitmapdb_common_expression::types::StringType;
use bitmapdb_common_expression::vectorize_with_builder_1_arg;
use bitmapdb_common_expression::vectorize_with_builder_2_arg;
use bitmapdb_common_expression::Column;
use bitmapdb_common_expression::EvalOutput;
use bitmapdb_common_expression::FromData;
use bitmapdb_common_expression::FunctionContext;
use bitmapdb_common_expression::FunctionRegistry;
use bitmapdb_common_expression::Scalar;
use bitmapdb_common_expression::Value;
use proptest::prelude::*;

fn test_registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::empty();

    registry.register_passthrough_nullable_1_arg::<Int64Type, Int64Type, _>(
        "negate",
        vectorize_with_builder_1_arg::<Int64Type, Int64Type>(|v, builder, _| {
            builder.push(-v);
            Ok(())
        }),
    );

    registry.register_passthrough_nullable_1_arg::<Int64Type, Int64Type, _>("explode", |_, _| {
        Err(ErrorCode::Internal("explode was called"))
    });

    registry.register_passthrough_nullable_2_arg::<Int64Type, Int64Type, Int64Type, _>(
        "explode",
        |_, _, _| Err(ErrorCode::Internal("explode was called")),
    );

    registry.register_combine_nullable_2_arg::<Int64Type, Int64Type, Int64Type, _>(
        "checked_div",
        vectorize_with_builder_2_arg::<Int64Type, Int64Type, NullableType<Int64Type>>(
            |a, b, builder, ctx| {
                if b == 0 {
                    ctx.set_error(builder.len(), "division by zero");
                    builder.push_null();
                } else {
                    builder.push(a / b);
                }
                Ok(())
            },
        ),
    );

    registry
}

fn run(name: &str, args: &[Value<AnyType>], num_rows: usize) -> Result<EvalOutput> {
    eval_function(
        name,
        args,
        num_rows,
        &FunctionContext::default(),
        &test_registry(),
    )
}

fn int(v: i64) -> Value<AnyType> {
    Value::Scalar(Scalar::Number(NumberScalar::Int64(v)))
}

#[test]
fn test_constant_stays_constant() -> Result<()> {
    let output = run("negate", &[int(3)], 1024)?;
    assert_eq!(output.value, int(-3));
    assert!(output.errors.is_none());
    Ok(())
}

#[test]
fn test_passthrough_nulls() -> Result<()> {
    // No NULL row, no validity mask.
    let output = run("negate", &[Value::Column(Int64Type::from_data(vec![1i64, 2]))], 2)?;
    assert_eq!(
        output.value,
        Value::Column(Int64Type::from_data(vec![-1i64, -2]))
    );

    let output = run(
        "negate",
        &[Value::Column(Int64Type::from_opt_data(vec![Some(1i64), None]))],
        2,
    )?;
    assert_eq!(
        output.value,
        Value::Column(Int64Type::from_opt_data(vec![Some(-1i64), None]))
    );
    Ok(())
}

#[test]
fn test_entirely_null_short_circuits() -> Result<()> {
    let output = run("explode", &[Value::Scalar(Scalar::Null)], 3)?;
    assert_eq!(output.value, Value::Scalar(Scalar::Null));

    let all_null = Int64Type::from_opt_data(vec![None::<i64>; 3]);
    let output = run("explode", &[Value::Column(Column::Null { len: 3 })], 3)?;
    assert_eq!(output.value, Value::Column(all_null.clone()));

    let output = run("explode", &[Value::Column(all_null.clone())], 3)?;
    assert_eq!(output.value, Value::Column(all_null.clone()));

    let output = run("explode", &[int(1), Value::Column(all_null.clone())], 3)?;
    assert_eq!(output.value, Value::Column(all_null));
    Ok(())
}

#[test]
fn test_fatal_error_aborts() {
    let err = run("explode", &[int(1)], 1).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Internal("").code());
    assert_eq!(err.message(), "explode was called");
}

#[test]
fn test_row_errors() -> Result<()> {
    let a = Int64Type::from_opt_data(vec![Some(1i64), None, Some(4)]);
    let b = Int64Type::from_data(vec![0i64, 0, 2]);
    let output = run("checked_div", &[Value::Column(a), Value::Column(b)], 3)?;

    assert_eq!(
        output.value,
        Value::Column(Int64Type::from_opt_data(vec![None, None, Some(2i64)]))
    );
    // The NULL row also divides by zero but is not reported.
    let errors = output.errors.unwrap();
    assert_eq!(errors.failed_rows(), vec![0]);
    assert_eq!(errors.num_failed(), 1);
    assert_eq!(errors.message, "division by zero");

    let output = run("checked_div", &[int(1), int(0)], 5)?;
    assert_eq!(output.value, Value::Scalar(Scalar::Null));
    assert_eq!(output.errors.unwrap().failed_rows(), vec![0]);
    Ok(())
}

#[test]
fn test_resolution_errors() {
    let err = run("no_such_function", &[], 1).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownFunction("").code());

    let err = run("negate", &[int(1), int(2)], 1).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NumberArgumentsNotMatch("").code());

    let strings = Value::Column(StringType::from_data(vec!["1"]));
    let err = run("negate", &[strings], 1).unwrap_err();
    assert_eq!(err.code(), ErrorCode::IllegalDataType("").code());

    let short = Value::Column(Int64Type::from_data(vec![1i64, 2]));
    let err = run("negate", &[short], 3).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadArguments("").code());
}

#[test]
fn test_signatures() {
    let registry = test_registry();
    assert!(registry.contains("explode"));
    assert_eq!(registry.num_functions(), 4);
    let signatures = registry
        .signatures("explode")
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    assert_eq!(signatures, vec![
        "explode(Int64 NULL) -> Int64 NULL",
        "explode(Int64 NULL, Int64 NULL) -> Int64 NULL",
    ]);
}

proptest! {
    #[test]
    fn prop_passthrough_keeps_null_rows(rows in prop::collection::vec(prop::option::of(-1000i64..1000), 1..64)) {
        let num_rows = rows.len();
        let input = Value::Column(Int64Type::from_opt_data(rows.clone()));
        let output = run("negate", &[input], num_rows).unwrap();

        let has_null = rows.iter().any(Option::is_none);
        let is_nullable = matches!(output.value, Value::Column(Column::Nullable(_)));
        prop_assert_eq!(is_nullable, has_null);

        for (row, value) in rows.iter().enumerate() {
            let expected = match value {
                Some(v) => Scalar::Number(NumberScalar::Int64(-v)),
                None => Scalar::Null,
            };
            prop_assert_eq!(output.value.index(row).unwrap().to_owned(), expected);
        }
    }
}
