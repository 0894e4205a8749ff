use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::json;
use settngs_schema::{CoerceError, SettingKind, Value};

#[rstest]
#[case(SettingKind::Boolean, json!("yes"), Value::Boolean(true))]
#[case(SettingKind::Boolean, json!("OFF"), Value::Boolean(false))]
#[case(SettingKind::Boolean, json!(true), Value::Boolean(true))]
#[case(SettingKind::Integer, json!(-7), Value::Integer(-7))]
#[case(SettingKind::Integer, json!("42"), Value::Integer(42))]
#[case(SettingKind::Integer, json!(3.0), Value::Integer(3))]
#[case(SettingKind::Integer, json!(-9223372036854775808.0), Value::Integer(i64::MIN))]
#[case(SettingKind::Float, json!("2.5"), Value::Float(2.5))]
#[case(SettingKind::Float, json!(1), Value::Float(1.0))]
#[case(SettingKind::String, json!("text"), Value::from("text"))]
#[case(SettingKind::StringList, json!([]), Value::List(vec![]))]
#[case(SettingKind::StringList, json!(["a", "b"]), Value::from(vec!["a", "b"]))]
fn test_coerce_accepts(#[case] kind: SettingKind, #[case] raw: serde_json::Value, #[case] expected: Value) {
    assert_eq!(kind.coerce(&raw), Ok(expected));
}

#[rstest]
#[case(SettingKind::Boolean, json!("maybe"))]
#[case(SettingKind::Boolean, json!(1))]
#[case(SettingKind::Integer, json!("4.5"))]
#[case(SettingKind::Integer, json!(null))]
#[case(SettingKind::Integer, json!(9223372036854775808.0))]
#[case(SettingKind::Integer, json!(9223372036854775808u64))]
#[case(SettingKind::Integer, json!(1.0e19))]
#[case(SettingKind::Float, json!("nan"))]
#[case(SettingKind::String, json!(false))]
#[case(SettingKind::StringList, json!(null))]
fn test_coerce_soft_rejections(#[case] kind: SettingKind, #[case] raw: serde_json::Value) {
    let err = kind.coerce(&raw).unwrap_err();
    assert!(matches!(err, CoerceError::Invalid { .. }), "{:?}", err);
}

#[rstest]
#[case(SettingKind::Boolean, json!([true]), "array")]
#[case(SettingKind::String, json!({"a": 1}), "object")]
#[case(SettingKind::Integer, json!([1, 2]), "array")]
#[case(SettingKind::StringList, json!("a"), "string")]
#[case(SettingKind::StringList, json!({"a": "b"}), "object")]
fn test_coerce_mismatches(
    #[case] kind: SettingKind,
    #[case] raw: serde_json::Value,
    #[case] found: &'static str,
) {
    let err = kind.coerce(&raw).unwrap_err();
    assert_eq!(err, CoerceError::Mismatch { expected: kind, found });
}

#[test]
fn test_parse_str_list_wraps_single_token() {
    assert_eq!(
        SettingKind::StringList.parse_str("one"),
        Ok(Value::from(vec!["one"]))
    );
}

proptest! {
    #[test]
    fn integers_coerce_to_themselves(n in any::<i64>()) {
        prop_assert_eq!(SettingKind::Integer.coerce(&json!(n)), Ok(Value::Integer(n)));
        prop_assert_eq!(SettingKind::Integer.parse_str(&n.to_string()), Ok(Value::Integer(n)));
    }

    #[test]
    fn finite_floats_survive_json(f in -1.0e12f64..1.0e12f64) {
        let value = Value::Float(f);
        prop_assert_eq!(SettingKind::Float.coerce(&value.to_json()), Ok(value.clone()));
        prop_assert_eq!(SettingKind::Float.parse_str(&value.to_string()), Ok(value));
    }

    #[test]
    fn strings_coerce_verbatim(s in "\\PC*") {
        prop_assert_eq!(SettingKind::String.coerce(&json!(s.clone())), Ok(Value::String(s)));
    }

    #[test]
    fn typed_values_coerce_through_json(items in proptest::collection::vec("\\PC*", 0..5), b in any::<bool>()) {
        let list = Value::List(items);
        prop_assert_eq!(SettingKind::StringList.coerce(&list.to_json()), Ok(list));
        prop_assert_eq!(SettingKind::Boolean.coerce(&Value::Boolean(b).to_json()), Ok(Value::Boolean(b)));
    }
}
