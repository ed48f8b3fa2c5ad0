use std::cmp::Ordering;

use snip_bytecode::{BinaryOp, CastKind};

use super::error::RuntimeError;
use super::ops::{binary, cast, compare, loose_equals, negate, not, sort_values};
use super::value::{Key, Value};

fn eval(op: BinaryOp, lhs: Value, rhs: Value) -> String {
    match binary(op, &lhs, &rhs) {
        Ok(value) => format!("{} {value}", value.type_name()),
        Err(err) => format!("error: {err}"),
    }
}

fn int(n: i64) -> Value {
    Value::Int(n)
}

fn double(d: f64) -> Value {
    Value::Double(d)
}

#[test]
fn integer_arithmetic_wraps() {
    assert_eq!(eval(BinaryOp::Add, int(i64::MAX), int(1)), format!("int {}", i64::MIN));
    assert_eq!(eval(BinaryOp::Mul, int(i64::MAX), int(2)), "int -2");
    assert_eq!(eval(BinaryOp::Sub, int(i64::MIN), int(1)), format!("int {}", i64::MAX));
}

#[test]
fn integer_division_edge_cases() {
    assert_eq!(eval(BinaryOp::Div, int(7), int(0)), "error: Attempted to divide by zero.");
    assert_eq!(eval(BinaryOp::Rem, int(7), int(0)), "error: Attempted to divide by zero.");
    assert_eq!(
        eval(BinaryOp::Div, int(i64::MIN), int(-1)),
        "error: Arithmetic operation resulted in an overflow."
    );
    assert_eq!(eval(BinaryOp::Rem, int(-7), int(3)), "int -1");
}

#[test]
fn double_promotes() {
    assert_eq!(eval(BinaryOp::Add, int(1), double(0.5)), "double 1.5");
    assert_eq!(eval(BinaryOp::Div, double(1.0), int(0)), "double Infinity");
    assert_eq!(eval(BinaryOp::Div, double(0.0), double(0.0)), "double NaN");
}

#[test]
fn char_widens_to_int() {
    assert_eq!(eval(BinaryOp::Add, Value::Char('a'), int(1)), "int 98");
    assert_eq!(eval(BinaryOp::Sub, Value::Char('c'), Value::Char('a')), "int 2");
}

#[test]
fn plus_concatenates_with_strings() {
    assert_eq!(eval(BinaryOp::Add, Value::string("n="), double(1.5)), "string n=1.5");
    assert_eq!(eval(BinaryOp::Add, Value::Bool(true), Value::string("!")), "string True!");
    assert_eq!(eval(BinaryOp::Add, Value::Null, Value::string("x")), "string x");
}

#[test]
fn mismatched_operands() {
    assert_eq!(
        eval(BinaryOp::Sub, Value::string("a"), int(1)),
        "error: Operator '-' cannot be applied to operands of type 'string' and 'int'"
    );
    assert_eq!(
        eval(BinaryOp::Lt, Value::Bool(true), Value::Bool(false)),
        "error: Operator '<' cannot be applied to operands of type 'bool' and 'bool'"
    );
}

#[test]
fn relational_with_nan_is_false() {
    assert_eq!(eval(BinaryOp::Lt, double(f64::NAN), int(1)), "bool False");
    assert_eq!(eval(BinaryOp::Ge, double(f64::NAN), int(1)), "bool False");
    assert_eq!(eval(BinaryOp::Le, int(2), double(2.0)), "bool True");
}

#[test]
fn equality() {
    assert!(loose_equals(&Value::Int(65), &Value::Char('A')));
    assert!(loose_equals(&Value::Int(2), &Value::Double(2.0)));
    assert!(loose_equals(&Value::string("a"), &Value::string("a")));
    assert!(!loose_equals(&Value::string("1"), &Value::Int(1)));
    assert!(!loose_equals(&Value::Double(f64::NAN), &Value::Double(f64::NAN)));
    assert!(!loose_equals(&Value::list(vec![]), &Value::list(vec![])));

    let list = Value::list(vec![Value::Int(1)]);
    assert!(loose_equals(&list, &list.clone()));
}

#[test]
fn keys_unify_integral_doubles() {
    assert!(Key(Value::Int(3)) == Key(Value::Double(3.0)));
    assert!(Key(Value::Double(f64::NAN)) == Key(Value::Double(f64::NAN)));
    assert!(Key(Value::Int(3)) != Key(Value::Char('\u{3}')));
}

#[test]
fn unary_operators() {
    assert_eq!(negate(&Value::Int(i64::MIN)).unwrap().to_string(), i64::MIN.to_string());
    assert_eq!(negate(&Value::Char('A')).unwrap().to_string(), "-65");
    assert_eq!(not(&Value::Bool(true)).unwrap().to_string(), "False");
    assert_eq!(
        not(&Value::Int(1)).unwrap_err().to_string(),
        "Operator '!' cannot be applied to operand of type 'int'"
    );
}

#[test]
fn casts() {
    let cast_str = |kind, value| match cast(kind, value) {
        Ok(value) => format!("{} {value}", value.type_name()),
        Err(err) => format!("error: {err}"),
    };

    assert_eq!(cast_str(CastKind::Int, Value::Double(-3.9)), "int -3");
    assert_eq!(cast_str(CastKind::Int, Value::Double(1e300)), format!("int {}", i64::MAX));
    assert_eq!(cast_str(CastKind::Int, Value::Char('A')), "int 65");
    assert_eq!(cast_str(CastKind::Char, Value::Int(66)), "char B");
    assert_eq!(cast_str(CastKind::Double, Value::Int(2)), "double 2");
    assert_eq!(cast_str(CastKind::String, Value::Null), "null ");
    assert_eq!(
        cast_str(CastKind::Int, Value::Null),
        "error: Object reference not set to an instance of an object."
    );
    assert_eq!(
        cast_str(CastKind::Bool, Value::Int(1)),
        "error: Unable to cast object of type 'int' to type 'bool'."
    );
}

#[test]
fn ordering() {
    assert_eq!(compare(&Value::Null, &Value::Int(0)).unwrap(), Ordering::Less);
    assert_eq!(
        compare(&Value::Double(f64::NAN), &Value::Double(f64::NEG_INFINITY)).unwrap(),
        Ordering::Less
    );
    assert_eq!(
        compare(&Value::string("B"), &Value::string("a")).unwrap(),
        Ordering::Less
    );
    assert_eq!(compare(&Value::Int(2), &Value::Double(1.5)).unwrap(), Ordering::Greater);
    assert!(matches!(
        compare(&Value::Int(1), &Value::string("1")),
        Err(RuntimeError::InvalidComparison)
    ));
}

#[test]
fn sort_is_stable_and_checked() {
    let mut values = vec![
        Value::Double(2.0),
        Value::Int(1),
        Value::Int(2),
        Value::Null,
    ];
    sort_values(&mut values).unwrap();
    let rendered: Vec<String> = values
        .iter()
        .map(|v| format!("{}:{v}", v.type_name()))
        .collect();
    assert_eq!(rendered, ["null:", "int:1", "double:2", "int:2"]);

    let mut mixed = vec![Value::Int(1), Value::Bool(true)];
    assert!(matches!(
        sort_values(&mut mixed),
        Err(RuntimeError::InvalidComparison)
    ));
}
