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
use bitmapdb_common_expression::types::NumberScalar;
use bitmapdb_common_expression::Column;
use bitmapdb_common_expression::FunctionContext;
use bitmapdb_common_expression::Scalar;
use bitmapdb_common_expression::Value;
use bitmapdb_common_functions::scalars::BitmapLengthGuard;
use bitmapdb_common_functions::BUILTIN_FUNCTIONS;
use bitmapdb_common_settings::Settings;
use itertools::Itertools;
use proptest::prelude::*;

use super::*;

#[test]
fn test_registered_functions() {
    for name in [
        "to_bitmap",
        "bitmap_hash",
        "bitmap_empty",
        "bitmap_count",
        "bitmap_or",
        "bitmap_and",
        "bitmap_xor",
        "bitmap_andnot",
        "bitmap_remove",
        "bitmap_contains",
        "bitmap_has_any",
        "bitmap_to_string",
        "bitmap_from_string",
        "bitmap_to_base64",
        "base64_to_bitmap",
        "bitmap_to_array",
        "array_to_bitmap",
        "bitmap_max",
        "bitmap_min",
        "sub_bitmap",
        "bitmap_subset_in_range",
        "bitmap_subset_limit",
    ] {
        assert!(BUILTIN_FUNCTIONS.contains(name), "{name} is not registered");
    }
    assert_eq!(BUILTIN_FUNCTIONS.signatures("sub_bitmap").len(), 2);
}

#[test]
fn test_to_bitmap() -> Result<()> {
    let input = string_column(&[
        Some("1"),
        Some("18446744073709551615"),
        Some("-1"),
        Some("abc"),
        None,
        Some(" 7 "),
    ]);
    let output = run("to_bitmap", &[input], 6)?;
    assert_eq!(rows(&output.value, 6), vec![
        bitmap_scalar(&[1]),
        bitmap_scalar(&[u64::MAX]),
        Scalar::Null,
        Scalar::Null,
        Scalar::Null,
        bitmap_scalar(&[7]),
    ]);

    let errors = output.errors.unwrap();
    assert_eq!(errors.failed_rows(), vec![2, 3]);
    assert!(errors.message.contains("The input: -1 is not valid"));
    assert!(errors.message.contains("18446744073709551615"));

    let output = run("to_bitmap", &[string_value("42")], 3)?;
    assert_eq!(output.value, bitmap_value(&[42]));
    assert!(output.errors.is_none());

    // A constant input fails on every row it stands for.
    let output = run("to_bitmap", &[string_value("18446744073709551616")], 3)?;
    assert_eq!(output.value, Value::Scalar(Scalar::Null));
    let errors = output.errors.unwrap();
    assert_eq!(errors.failed_rows(), vec![0, 1, 2]);
    assert_eq!(errors.num_failed(), 3);
    assert!(errors.message.contains("The input: 18446744073709551616 is not valid"));
    Ok(())
}

#[test]
fn test_bitmap_hash() -> Result<()> {
    let input = string_column(&[Some("abc"), None, Some("")]);
    let output = run("bitmap_hash", &[input], 3)?;
    assert!(matches!(output.value, Value::Column(Column::Bitmap(_))));
    assert_eq!(rows(&output.value, 3), vec![
        bitmap_scalar(&[3409700625]),
        bitmap_scalar(&[]),
        bitmap_scalar(&[3329588566]),
    ]);

    let output = run("bitmap_hash", &[Value::Scalar(Scalar::Null)], 3)?;
    assert_eq!(output.value, bitmap_value(&[]));
    Ok(())
}

#[test]
fn test_bitmap_empty() -> Result<()> {
    let output = run("bitmap_empty", &[], 1024)?;
    assert_eq!(output.value, bitmap_value(&[]));
    Ok(())
}

#[test]
fn test_bitmap_count() -> Result<()> {
    let input = bitmap_column(&[Some(&[1, 2, 3]), None, Some(&[])]);
    let output = run("bitmap_count", &[input], 3)?;
    assert_eq!(rows(&output.value, 3), vec![
        int_scalar(3),
        int_scalar(0),
        int_scalar(0),
    ]);

    let output = run("bitmap_count", &[Value::Scalar(Scalar::Null)], 3)?;
    assert_eq!(output.value, int_value(0));

    let output = run("bitmap_count", &[Value::Column(Column::Null { len: 2 })], 2)?;
    assert_eq!(rows(&output.value, 2), vec![int_scalar(0), int_scalar(0)]);
    Ok(())
}

#[test]
fn test_set_algebra() -> Result<()> {
    let lhs = bitmap_column(&[Some(&[1, 2, 3]), Some(&[]), None, Some(&[5])]);
    let rhs = bitmap_column(&[Some(&[2, 3, 4]), Some(&[1]), Some(&[1]), Some(&[])]);

    let cases: [(&str, Vec<Scalar>); 4] = [
        ("bitmap_or", vec![
            bitmap_scalar(&[1, 2, 3, 4]),
            bitmap_scalar(&[1]),
            Scalar::Null,
            bitmap_scalar(&[5]),
        ]),
        ("bitmap_and", vec![
            bitmap_scalar(&[2, 3]),
            bitmap_scalar(&[]),
            Scalar::Null,
            bitmap_scalar(&[]),
        ]),
        ("bitmap_xor", vec![
            bitmap_scalar(&[1, 4]),
            bitmap_scalar(&[1]),
            Scalar::Null,
            bitmap_scalar(&[5]),
        ]),
        ("bitmap_andnot", vec![
            bitmap_scalar(&[1]),
            bitmap_scalar(&[]),
            Scalar::Null,
            bitmap_scalar(&[5]),
        ]),
    ];
    for (name, expected) in cases {
        let output = run(name, &[lhs.clone(), rhs.clone()], 4)?;
        assert_eq!(rows(&output.value, 4), expected, "{name}");
        assert!(output.errors.is_none());
    }
    Ok(())
}

#[test]
fn test_set_algebra_constants() -> Result<()> {
    let output = run(
        "bitmap_and",
        &[bitmap_value(&[1, 2, 3]), bitmap_value(&[2, 3, 4])],
        100,
    )?;
    assert_eq!(output.value, bitmap_value(&[2, 3]));

    let column = bitmap_column(&[Some(&[1]), Some(&[9])]);
    let output = run("bitmap_or", &[bitmap_value(&[9]), column], 2)?;
    assert!(matches!(output.value, Value::Column(Column::Bitmap(_))));
    assert_eq!(rows(&output.value, 2), vec![
        bitmap_scalar(&[1, 9]),
        bitmap_scalar(&[9]),
    ]);

    let column = bitmap_column(&[Some(&[1]), Some(&[9])]);
    let output = run("bitmap_or", &[Value::Scalar(Scalar::Null), column], 2)?;
    assert_eq!(rows(&output.value, 2), vec![Scalar::Null, Scalar::Null]);

    let output = run(
        "bitmap_xor",
        &[Value::Scalar(Scalar::Null), bitmap_value(&[1])],
        2,
    )?;
    assert_eq!(output.value, Value::Scalar(Scalar::Null));
    Ok(())
}

#[test]
fn test_bitmap_remove_and_contains() -> Result<()> {
    let bitmaps = bitmap_column(&[Some(&[1, 2]), Some(&[1, 2]), Some(&[1, 2]), None]);
    let values = int_column(&[Some(1), Some(-1), Some(5), Some(1)]);

    let output = run("bitmap_remove", &[bitmaps.clone(), values.clone()], 4)?;
    assert_eq!(rows(&output.value, 4), vec![
        bitmap_scalar(&[2]),
        bitmap_scalar(&[1, 2]),
        bitmap_scalar(&[1, 2]),
        Scalar::Null,
    ]);

    let output = run("bitmap_contains", &[bitmaps, values], 4)?;
    assert_eq!(rows(&output.value, 4), vec![
        Scalar::Boolean(true),
        Scalar::Boolean(false),
        Scalar::Boolean(false),
        Scalar::Null,
    ]);

    let output = run(
        "bitmap_contains",
        &[bitmap_value(&[u64::MAX]), int_value(-1)],
        1,
    )?;
    assert_eq!(output.value, Value::Scalar(Scalar::Boolean(false)));
    Ok(())
}

#[test]
fn test_bitmap_has_any() -> Result<()> {
    let lhs = bitmap_column(&[Some(&[1, 2]), Some(&[1, 2]), Some(&[]), None]);
    let rhs = bitmap_column(&[Some(&[2, 3]), Some(&[3, 4]), Some(&[]), Some(&[1])]);
    let output = run("bitmap_has_any", &[lhs, rhs], 4)?;
    assert_eq!(rows(&output.value, 4), vec![
        Scalar::Boolean(true),
        Scalar::Boolean(false),
        Scalar::Boolean(false),
        Scalar::Null,
    ]);
    Ok(())
}

#[test]
fn test_bitmap_max_min() -> Result<()> {
    let input = bitmap_column(&[Some(&[1, 5]), Some(&[]), None, Some(&[u64::MAX])]);
    let int128 = |v: i128| Scalar::Number(NumberScalar::Int128(v));

    let output = run("bitmap_max", &[input.clone()], 4)?;
    assert_eq!(rows(&output.value, 4), vec![
        int128(5),
        Scalar::Null,
        Scalar::Null,
        int128(u64::MAX as i128),
    ]);

    let output = run("bitmap_min", &[input], 4)?;
    assert_eq!(rows(&output.value, 4), vec![
        int128(1),
        Scalar::Null,
        Scalar::Null,
        int128(u64::MAX as i128),
    ]);

    let output = run("bitmap_max", &[bitmap_value(&[])], 4)?;
    assert_eq!(output.value, Value::Scalar(Scalar::Null));
    Ok(())
}

#[test]
fn test_bitmap_to_string() -> Result<()> {
    let input = bitmap_column(&[Some(&[3, 1, 2]), Some(&[]), None]);
    let output = run("bitmap_to_string", &[input], 3)?;
    assert_eq!(rows(&output.value, 3), vec![
        Scalar::String("1,2,3".to_string()),
        Scalar::String("".to_string()),
        Scalar::Null,
    ]);
    Ok(())
}

#[test]
fn test_bitmap_length_limit() {
    let func_ctx = FunctionContext {
        max_length_for_bitmap_function: 3,
        ..FunctionContext::default()
    };

    let input = bitmap_column(&[Some(&[1, 2, 3, 4])]);
    let err = run_with_context("bitmap_to_string", &[input], 1, &func_ctx).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BitmapLimitExceeded("").code());
    assert_eq!(err.message(), "bitmap_to_string not supported size > 3");

    // bitmap_to_array sums the whole call.
    let input = bitmap_column(&[Some(&[1, 2]), Some(&[3, 4])]);
    let err = run_with_context("bitmap_to_array", &[input], 2, &func_ctx).unwrap_err();
    assert_eq!(err.message(), "bitmap_to_array not supported size > 3");

    // Text renderings check each row on its own.
    let input = bitmap_column(&[Some(&[1, 2]), Some(&[3, 4])]);
    let output = run_with_context("bitmap_to_string", &[input.clone()], 2, &func_ctx).unwrap();
    assert_eq!(rows(&output.value, 2), vec![
        Scalar::String("1,2".to_string()),
        Scalar::String("3,4".to_string()),
    ]);
    let output = run_with_context("bitmap_to_base64", &[input], 2, &func_ctx).unwrap();
    assert!(output.errors.is_none());

    let input = bitmap_column(&[Some(&[1, 2]), Some(&[3, 4, 5, 6])]);
    let err = run_with_context("bitmap_to_base64", &[input], 2, &func_ctx).unwrap_err();
    assert_eq!(err.message(), "bitmap_to_base64 not supported size > 3");

    let input = bitmap_column(&[Some(&[1, 2]), None, Some(&[3])]);
    let output = run_with_context("bitmap_to_string", &[input], 3, &func_ctx).unwrap();
    assert_eq!(rows(&output.value, 3), vec![
        Scalar::String("1,2".to_string()),
        Scalar::Null,
        Scalar::String("3".to_string()),
    ]);

    let err =
        run_with_context("bitmap_to_string", &[bitmap_value(&[1, 2, 3, 4])], 8, &func_ctx)
            .unwrap_err();
    assert_eq!(err.code(), ErrorCode::BitmapLimitExceeded("").code());
}

#[test]
fn test_length_guard() {
    let func_ctx = FunctionContext {
        max_length_for_bitmap_function: 10,
        ..FunctionContext::default()
    };
    let mut guard = BitmapLengthGuard::new("bitmap_to_array", &func_ctx);
    guard.check(4).unwrap();
    guard.check(6).unwrap();
    assert_eq!(guard.accumulated(), 10);

    let err = guard.check(1).unwrap_err();
    assert_eq!(err.message(), "bitmap_to_array not supported size > 10");
    assert_eq!(guard.accumulated(), 10);

    let mut guard = BitmapLengthGuard::new("bitmap_to_array", &func_ctx);
    assert!(guard.check(u64::MAX).is_err());

    let guard = BitmapLengthGuard::new("bitmap_to_string", &func_ctx);
    for _ in 0..5 {
        guard.check_row(10).unwrap();
    }
    assert_eq!(guard.accumulated(), 0);
    let err = guard.check_row(11).unwrap_err();
    assert_eq!(err.message(), "bitmap_to_string not supported size > 10");
}

#[test]
fn test_bitmap_to_string_many_rows() -> Result<()> {
    // 4096 rows of 300 members each, well past the default limit in total.
    let members: Vec<u64> = (0..300).collect();
    let input: Vec<Option<&[u64]>> = vec![Some(members.as_slice()); 4096];
    let output = run("bitmap_to_string", &[bitmap_column(&input)], 4096)?;
    assert!(output.errors.is_none());
    let expected = Scalar::String(members.iter().join(","));
    assert!(rows(&output.value, 4096).iter().all(|row| row == &expected));
    Ok(())
}

#[test]
fn test_length_limit_from_settings() -> Result<()> {
    let settings = Settings::create();
    settings.set_setting(
        "max_length_for_bitmap_function".to_string(),
        "2".to_string(),
    )?;
    let func_ctx = settings.get_function_context()?;

    let input = bitmap_column(&[Some(&[1, 2, 3])]);
    let err = run_with_context("bitmap_to_string", &[input], 1, &func_ctx).unwrap_err();
    assert_eq!(err.message(), "bitmap_to_string not supported size > 2");
    Ok(())
}

#[test]
fn test_bitmap_from_string() -> Result<()> {
    let input = string_column(&[
        Some("1,2,3"),
        Some(""),
        Some("1,a"),
        Some(" 4 , 5 "),
        None,
        Some("3,3,1"),
        Some("-1"),
    ]);
    let output = run("bitmap_from_string", &[input], 7)?;
    assert_eq!(rows(&output.value, 7), vec![
        bitmap_scalar(&[1, 2, 3]),
        bitmap_scalar(&[]),
        Scalar::Null,
        bitmap_scalar(&[4, 5]),
        Scalar::Null,
        bitmap_scalar(&[1, 3]),
        Scalar::Null,
    ]);
    assert!(output.errors.is_none());

    let func_ctx = FunctionContext {
        max_length_for_bitmap_from_string: 3,
        ..FunctionContext::default()
    };
    let input = string_column(&[Some("1,2,3"), Some("1,2")]);
    let output = run_with_context("bitmap_from_string", &[input], 2, &func_ctx)?;
    assert_eq!(rows(&output.value, 2), vec![
        Scalar::Null,
        bitmap_scalar(&[1, 2]),
    ]);
    Ok(())
}

#[test]
fn test_base64() -> Result<()> {
    let output = run("base64_to_bitmap", &[string_value("AQUAAAA=")], 1)?;
    assert_eq!(output.value, bitmap_value(&[5]));

    let output = run("bitmap_to_base64", &[bitmap_value(&[5])], 1)?;
    assert_eq!(
        output.value,
        Value::Scalar(Scalar::String("AQUAAAA=".to_string()))
    );

    // Empty text, bad base64, an unknown type byte and a truncated payload.
    let input = string_column(&[Some(""), Some("!!!"), Some("Yw=="), Some("AwE="), None]);
    let output = run("base64_to_bitmap", &[input], 5)?;
    assert_eq!(rows(&output.value, 5), vec![Scalar::Null; 5]);
    assert!(output.errors.is_none());
    Ok(())
}

#[test]
fn test_base64_round_trip() -> Result<()> {
    let many = (0..1000).map(|v| v * 3).collect::<Vec<u64>>();
    let wide = vec![1, u64::MAX - 1, u64::MAX];
    let wide_many = (0..100).map(|v| v << 40).collect::<Vec<u64>>();
    let input = bitmap_column(&[
        Some(&[]),
        Some(&[7]),
        Some(&[u64::MAX]),
        Some(&[1, 2, 3]),
        Some(&many),
        Some(&wide),
        Some(&wide_many),
        None,
    ]);
    let encoded = run("bitmap_to_base64", &[input.clone()], 8)?;
    let decoded = run("base64_to_bitmap", &[encoded.value], 8)?;
    assert_eq!(rows(&decoded.value, 8), rows(&input, 8));
    Ok(())
}

#[test]
fn test_bitmap_to_array() -> Result<()> {
    let input = bitmap_column(&[Some(&[3, 1, 2]), Some(&[]), Some(&[u64::MAX])]);
    let output = run("bitmap_to_array", &[input], 3)?;
    // No NULL input row, no validity mask.
    assert!(matches!(output.value, Value::Column(Column::Array(_))));
    assert_eq!(rows(&output.value, 3), vec![
        int_array_scalar(&[Some(1), Some(2), Some(3)]),
        int_array_scalar(&[]),
        int_array_scalar(&[Some(-1)]),
    ]);

    let input = bitmap_column(&[Some(&[1]), None, Some(&[2, 3])]);
    let output = run("bitmap_to_array", &[input], 3)?;
    assert!(matches!(output.value, Value::Column(Column::Nullable(_))));
    assert_eq!(rows(&output.value, 3), vec![
        int_array_scalar(&[Some(1)]),
        Scalar::Null,
        int_array_scalar(&[Some(2), Some(3)]),
    ]);

    let output = run("bitmap_to_array", &[bitmap_value(&[4, 5])], 10)?;
    assert_eq!(
        output.value,
        Value::Scalar(int_array_scalar(&[Some(4), Some(5)]))
    );
    Ok(())
}

#[test]
fn test_array_to_bitmap() -> Result<()> {
    let input = int_array_column(&[
        Some(&[Some(1), Some(-1), None, Some(2)]),
        Some(&[]),
        None,
        Some(&[Some(5), Some(5)]),
    ]);
    let output = run("array_to_bitmap", &[input], 4)?;
    assert_eq!(rows(&output.value, 4), vec![
        bitmap_scalar(&[1, 2]),
        bitmap_scalar(&[]),
        Scalar::Null,
        bitmap_scalar(&[5]),
    ]);

    let input = Value::Scalar(int_array_scalar(&[Some(3), None, Some(-4)]));
    let output = run("array_to_bitmap", &[input], 2)?;
    assert_eq!(output.value, bitmap_value(&[3]));
    Ok(())
}

#[test]
fn test_sub_bitmap() -> Result<()> {
    let source = bitmap_value(&[1, 2, 3, 4, 5]);
    let sub = |offset: i64, len: i64| -> Result<Value<AnyType>> {
        Ok(run("sub_bitmap", &[source.clone(), int_value(offset), int_value(len)], 1)?.value)
    };

    assert_eq!(sub(1, 2)?, bitmap_value(&[2, 3]));
    assert_eq!(sub(-2, 2)?, bitmap_value(&[4, 5]));
    assert_eq!(sub(-5, 1)?, bitmap_value(&[1]));
    assert_eq!(sub(3, 100)?, bitmap_value(&[4, 5]));
    assert_eq!(sub(1, 0)?, Value::Scalar(Scalar::Null));
    assert_eq!(sub(1, -1)?, Value::Scalar(Scalar::Null));
    assert_eq!(sub(5, 1)?, Value::Scalar(Scalar::Null));
    assert_eq!(sub(-6, 1)?, Value::Scalar(Scalar::Null));
    assert_eq!(sub(i32::MIN as i64, 1)?, Value::Scalar(Scalar::Null));

    let output = run("sub_bitmap", &[source.clone(), int_value(2)], 1)?;
    assert_eq!(output.value, bitmap_value(&[3, 4, 5]));

    let output = run(
        "sub_bitmap",
        &[bitmap_value(&[]), int_value(0), int_value(1)],
        1,
    )?;
    assert_eq!(output.value, Value::Scalar(Scalar::Null));

    let bitmaps = bitmap_column(&[Some(&[1, 2, 3]), Some(&[1, 2, 3]), None, Some(&[1, 2, 3])]);
    let offsets = int_column(&[Some(0), None, Some(0), Some(1)]);
    let lengths = int_column(&[Some(2), Some(2), Some(2), None]);
    let output = run("sub_bitmap", &[bitmaps, offsets, lengths], 4)?;
    assert_eq!(rows(&output.value, 4), vec![
        bitmap_scalar(&[1, 2]),
        Scalar::Null,
        Scalar::Null,
        Scalar::Null,
    ]);

    let output = run(
        "sub_bitmap",
        &[source, int_value(0), Value::Column(Column::Null { len: 3 })],
        3,
    )?;
    assert_eq!(rows(&output.value, 3), vec![Scalar::Null; 3]);
    Ok(())
}

#[test]
fn test_bitmap_subset_in_range() -> Result<()> {
    let source = bitmap_value(&[1, 2, 3, 4, 5, 10]);
    let subset = |start: i64, end: i64| -> Result<Value<AnyType>> {
        Ok(run(
            "bitmap_subset_in_range",
            &[source.clone(), int_value(start), int_value(end)],
            1,
        )?
        .value)
    };

    assert_eq!(subset(2, 5)?, bitmap_value(&[2, 3, 4]));
    assert_eq!(subset(-3, 3)?, bitmap_value(&[1, 2]));
    assert_eq!(subset(4, 100)?, bitmap_value(&[4, 5, 10]));
    assert_eq!(subset(5, 5)?, Value::Scalar(Scalar::Null));
    assert_eq!(subset(-5, 0)?, Value::Scalar(Scalar::Null));
    assert_eq!(subset(6, 10)?, Value::Scalar(Scalar::Null));
    Ok(())
}

#[test]
fn test_bitmap_subset_limit() -> Result<()> {
    let source = bitmap_value(&[1, 3, 5, 7, 9]);
    let subset = |start: i64, limit: i64| -> Result<Value<AnyType>> {
        Ok(run(
            "bitmap_subset_limit",
            &[source.clone(), int_value(start), int_value(limit)],
            1,
        )?
        .value)
    };

    assert_eq!(subset(3, 2)?, bitmap_value(&[3, 5]));
    assert_eq!(subset(4, 10)?, bitmap_value(&[5, 7, 9]));
    assert_eq!(subset(6, -2)?, bitmap_value(&[3, 5]));
    assert_eq!(subset(100, -1)?, bitmap_value(&[9]));
    assert_eq!(subset(-1, 1)?, bitmap_value(&[1]));
    assert_eq!(subset(3, 0)?, Value::Scalar(Scalar::Null));
    assert_eq!(subset(100, 1)?, Value::Scalar(Scalar::Null));
    assert_eq!(subset(0, -1)?, Value::Scalar(Scalar::Null));
    Ok(())
}

fn bitmap_members() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(prop_oneof![0u64..256, any::<u64>()], 0..80)
}

fn eval_scalar(name: &str, args: &[Value<AnyType>]) -> Scalar {
    let output = run(name, args, 1).unwrap();
    output.value.into_scalar().unwrap()
}

fn cardinality(scalar: &Scalar) -> u64 {
    scalar.as_bitmap().unwrap().len()
}

proptest! {
    #[test]
    fn prop_to_bitmap_parses_every_u64(value in any::<u64>()) {
        let result = eval_scalar("to_bitmap", &[string_value(&value.to_string())]);
        let bitmap = result.as_bitmap().unwrap();
        prop_assert_eq!(bitmap.len(), 1);
        prop_assert!(bitmap.contains_unsigned(value));
    }

    #[test]
    fn prop_and_or_cardinality(a in bitmap_members(), b in bitmap_members()) {
        let lhs = bitmap_value(&a);
        let rhs = bitmap_value(&b);
        let a_len = cardinality(lhs.as_scalar().unwrap());
        let b_len = cardinality(rhs.as_scalar().unwrap());

        let and = eval_scalar("bitmap_and", &[lhs.clone(), rhs.clone()]);
        let or = eval_scalar("bitmap_or", &[lhs.clone(), rhs.clone()]);
        prop_assert!(cardinality(&and) <= a_len.min(b_len));
        prop_assert!(cardinality(&or) >= a_len.max(b_len));

        let has_any = eval_scalar("bitmap_has_any", &[lhs, rhs]);
        let count = eval_scalar("bitmap_count", &[Value::Scalar(and)]);
        prop_assert_eq!(
            has_any,
            Scalar::Boolean(*count.as_number().unwrap().as_int64().unwrap() > 0)
        );
    }

    #[test]
    fn prop_array_round_trip(members in prop::collection::vec(0..=i64::MAX as u64, 0..80)) {
        let source = bitmap_value(&members);
        let array = eval_scalar("bitmap_to_array", &[source.clone()]);
        let result = eval_scalar("array_to_bitmap", &[Value::Scalar(array)]);
        prop_assert_eq!(Value::Scalar(result), source);
    }

    #[test]
    fn prop_string_round_trip(members in bitmap_members()) {
        let source = bitmap_value(&members);
        let text = eval_scalar("bitmap_to_string", &[source.clone()]);
        let result = eval_scalar("bitmap_from_string", &[Value::Scalar(text)]);
        prop_assert_eq!(Value::Scalar(result), source);
    }
}
