use super::error::RuntimeError;
use super::format::{composite, format_value};
use super::value::Value;

fn fmt(format: &str, args: &[Value]) -> String {
    match composite(format, args) {
        Ok(text) => text,
        Err(err) => format!("error: {err}"),
    }
}

fn spec(value: Value, spec: &str) -> String {
    match format_value(&value, spec) {
        Ok(text) => text,
        Err(err) => format!("error: {err}"),
    }
}

#[test]
fn positional_items() {
    let args = [Value::Int(1), Value::Int(2), Value::Int(3)];

    assert_eq!(fmt("{0} + {1} = {2}", &args), "1 + 2 = 3");
    assert_eq!(fmt("{2}{2}{0}", &args), "331");
}

#[test]
fn brace_escapes() {
    assert_eq!(fmt("{{{0}}}", &[Value::Int(5)]), "{5}");
    assert_eq!(fmt("{{}}", &[]), "{}");
}

#[test]
fn malformed_items() {
    let args = [Value::Int(1)];

    assert_eq!(fmt("a}", &args), "error: Input string was not in a correct format.");
    assert_eq!(fmt("{0", &args), "error: Input string was not in a correct format.");
    assert_eq!(fmt("{a}", &args), "error: Input string was not in a correct format.");
    assert_eq!(fmt("{0,x}", &args), "error: Input string was not in a correct format.");
}

#[test]
fn missing_argument() {
    assert!(matches!(
        composite("{1}", &[Value::Int(1)]),
        Err(RuntimeError::FormatIndex)
    ));
}

#[test]
fn alignment() {
    let args = [Value::Int(7)];

    assert_eq!(fmt("[{0,4}]", &args), "[   7]");
    assert_eq!(fmt("[{0,-4}]", &args), "[7   ]");
    assert_eq!(fmt("[{0,1}]", &args), "[7]");
    assert_eq!(
        fmt("{0,1000000}", &args),
        "error: Input string was not in a correct format."
    );
}

#[test]
fn alignment_with_spec() {
    assert_eq!(fmt("[{0,8:F2}]", &[Value::Double(3.14159)]), "[    3.14]");
}

#[test]
fn values_render_with_to_string() {
    let args = [
        Value::Bool(true),
        Value::Null,
        Value::list(vec![Value::Int(1), Value::string("a")]),
    ];

    assert_eq!(fmt("{0}|{1}|{2}", &args), "True||[1, a]");
}

#[test]
fn fixed_point() {
    assert_eq!(spec(Value::Double(3.14159), "F2"), "3.14");
    assert_eq!(spec(Value::Double(2.0), "F0"), "2");
    assert_eq!(spec(Value::Int(3), "F"), "3.00");
    assert_eq!(spec(Value::Double(f64::INFINITY), "F2"), "Infinity");
}

#[test]
fn grouped_number() {
    assert_eq!(spec(Value::Int(-1234567), "N0"), "-1,234,567");
    assert_eq!(spec(Value::Double(1234.5), "N"), "1,234.50");
    assert_eq!(spec(Value::Int(999), "N0"), "999");
}

#[test]
fn percent() {
    assert_eq!(spec(Value::Double(0.256), "P1"), "25.6 %");
    assert_eq!(spec(Value::Int(12), "P0"), "1,200 %");
}

#[test]
fn decimal_and_hex() {
    assert_eq!(spec(Value::Int(42), "D5"), "00042");
    assert_eq!(spec(Value::Int(-42), "D4"), "-0042");
    assert_eq!(spec(Value::Int(255), "X"), "FF");
    assert_eq!(spec(Value::Int(255), "x4"), "00ff");
    assert_eq!(
        spec(Value::Double(1.5), "D"),
        "error: Input string was not in a correct format."
    );
}

#[test]
fn unsupported_specs_fall_back() {
    assert_eq!(spec(Value::Double(1.5), "0.00"), "1.5");
    assert_eq!(spec(Value::Double(1.5), "Z"), "1.5");
    assert_eq!(spec(Value::string("abc"), "F2"), "abc");
    assert_eq!(spec(Value::Char('a'), "F2"), "a");
}

#[test]
fn precision_is_capped() {
    assert_eq!(
        spec(Value::Double(1.0), "F100"),
        "error: Input string was not in a correct format."
    );
}
