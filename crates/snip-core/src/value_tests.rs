use crate::Value;

fn to_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap()
}

#[test]
fn scalars_serialize_as_json_primitives() {
    assert_eq!(to_json(&Value::Null), "null");
    assert_eq!(to_json(&Value::Bool(true)), "true");
    assert_eq!(to_json(&Value::Int(-4)), "-4");
    assert_eq!(to_json(&Value::Double(2.5)), "2.5");
    assert_eq!(to_json(&Value::Char('x')), r#""x""#);
    assert_eq!(to_json(&Value::String("hi".into())), r#""hi""#);
}

#[test]
fn non_finite_doubles_serialize_as_strings() {
    assert_eq!(to_json(&Value::Double(f64::NAN)), r#""NaN""#);
    assert_eq!(to_json(&Value::Double(f64::INFINITY)), r#""Infinity""#);
}

#[test]
fn dictionary_keys_use_display_and_keep_order() {
    let dict = Value::Dictionary(vec![
        (Value::Int(2), Value::String("two".into())),
        (Value::Int(1), Value::String("one".into())),
        (Value::Bool(true), Value::Null),
    ]);

    assert_eq!(to_json(&dict), r#"{"2":"two","1":"one","True":null}"#);
}

#[test]
fn nested_collections_pretty() {
    let value = Value::Object(vec![
        ("type".into(), Value::String("Exception".into())),
        (
            "items".into(),
            Value::List(vec![Value::Int(1), Value::Double(0.5)]),
        ),
    ]);

    insta::assert_snapshot!(serde_json::to_string_pretty(&value).unwrap(), @r#"
    {
      "type": "Exception",
      "items": [
        1,
        0.5
      ]
    }
    "#);
}

#[test]
fn display_follows_to_string_rules() {
    assert_eq!(Value::Bool(false).to_string(), "False");
    assert_eq!(Value::Null.to_string(), "");
    assert_eq!(Value::Double(4.0).to_string(), "4");
    assert_eq!(
        Value::List(vec![Value::Int(1), Value::String("a".into())]).to_string(),
        "[1, a]"
    );
    assert_eq!(
        Value::Dictionary(vec![(Value::String("k".into()), Value::Int(3))]).to_string(),
        "{[k, 3]}"
    );
}

#[test]
fn type_names() {
    assert_eq!(Value::Int(1).type_name(), "int");
    assert_eq!(Value::List(vec![]).type_name(), "List");
    assert!(Value::Null.is_null());
}
