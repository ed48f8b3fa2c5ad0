//! Operator and conversion semantics.
//!
//! Integers are `i64` with wrapping arithmetic; chars widen to integers and
//! any double operand promotes the operation to `f64`. `+` concatenates as
//! soon as either side is a string.

use std::cmp::Ordering;

use snip_bytecode::{BinaryOp, CastKind};

use super::error::RuntimeError;
use super::value::Value;

pub fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Add => add(lhs, rhs),
        BinaryOp::Sub => arithmetic(op, lhs, rhs, |a, b| Ok(a.wrapping_sub(b)), |a, b| a - b),
        BinaryOp::Mul => arithmetic(op, lhs, rhs, |a, b| Ok(a.wrapping_mul(b)), |a, b| a * b),
        BinaryOp::Div => arithmetic(op, lhs, rhs, divide, |a, b| a / b),
        BinaryOp::Rem => arithmetic(op, lhs, rhs, remainder, |a, b| a % b),
        BinaryOp::Eq => Ok(Value::Bool(loose_equals(lhs, rhs))),
        BinaryOp::Ne => Ok(Value::Bool(!loose_equals(lhs, rhs))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => relational(op, lhs, rhs),
    }
}

fn int_like(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        Value::Char(c) => Some(i64::from(u32::from(*c))),
        _ => None,
    }
}

fn mismatch(op: BinaryOp, lhs: &Value, rhs: &Value) -> RuntimeError {
    RuntimeError::type_mismatch(op.symbol(), lhs.type_name(), rhs.type_name())
}

fn add(lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    if matches!(lhs, Value::Str(_)) || matches!(rhs, Value::Str(_)) {
        return Ok(Value::from(format!("{lhs}{rhs}")));
    }
    arithmetic(BinaryOp::Add, lhs, rhs, |a, b| Ok(a.wrapping_add(b)), |a, b| a + b)
}

fn arithmetic(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    int_op: impl FnOnce(i64, i64) -> Result<i64, RuntimeError>,
    double_op: impl FnOnce(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    if let (Some(a), Some(b)) = (int_like(lhs), int_like(rhs)) {
        return int_op(a, b).map(Value::Int);
    }
    match (lhs.as_double(), rhs.as_double()) {
        (Some(a), Some(b)) => Ok(Value::Double(double_op(a, b))),
        _ => Err(mismatch(op, lhs, rhs)),
    }
}

fn divide(a: i64, b: i64) -> Result<i64, RuntimeError> {
    if b == 0 {
        return Err(RuntimeError::DivideByZero);
    }
    a.checked_div(b).ok_or(RuntimeError::Overflow)
}

fn remainder(a: i64, b: i64) -> Result<i64, RuntimeError> {
    if b == 0 {
        return Err(RuntimeError::DivideByZero);
    }
    a.checked_rem(b).ok_or(RuntimeError::Overflow)
}

fn relational(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let ordering = if let (Some(a), Some(b)) = (int_like(lhs), int_like(rhs)) {
        Some(a.cmp(&b))
    } else {
        match (lhs.as_double(), rhs.as_double()) {
            // NaN compares false against everything.
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return Err(mismatch(op, lhs, rhs)),
        }
    };
    let result = ordering.is_some_and(|ordering| match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        _ => ordering.is_ge(),
    });
    Ok(Value::Bool(result))
}

/// `==` semantics: numeric across int, double and char, by content for
/// strings, by reference for collections.
pub fn loose_equals(lhs: &Value, rhs: &Value) -> bool {
    if let (Some(a), Some(b)) = (int_like(lhs), int_like(rhs)) {
        return a == b;
    }
    match (lhs.as_double(), rhs.as_double()) {
        (Some(a), Some(b)) => a == b,
        _ => lhs.equals(rhs),
    }
}

pub fn negate(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Double(d) => Ok(Value::Double(-d)),
        other => match int_like(other) {
            Some(n) => Ok(Value::Int(n.wrapping_neg())),
            None => Err(unary_mismatch("-", other)),
        },
    }
}

pub fn plus(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Double(d) => Ok(Value::Double(*d)),
        other => match int_like(other) {
            Some(n) => Ok(Value::Int(n)),
            None => Err(unary_mismatch("+", other)),
        },
    }
}

pub fn not(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(unary_mismatch("!", other)),
    }
}

fn unary_mismatch(op: &'static str, operand: &Value) -> RuntimeError {
    RuntimeError::UnaryOperator {
        op,
        operand: operand.type_name().to_owned(),
    }
}

/// Explicit `(T)value` conversion.
pub fn cast(kind: CastKind, value: Value) -> Result<Value, RuntimeError> {
    let invalid = |value: &Value| RuntimeError::InvalidCast {
        from: value.type_name().to_owned(),
        to: kind.type_name(),
    };
    match (kind, value) {
        (CastKind::Object, value) => Ok(value),
        (CastKind::String, value @ (Value::Str(_) | Value::Null)) => Ok(value),
        (_, Value::Null) => Err(RuntimeError::NullReference),
        (CastKind::Int, Value::Int(n)) => Ok(Value::Int(n)),
        // Truncates toward zero; out-of-range values saturate.
        (CastKind::Int, Value::Double(d)) => Ok(Value::Int(d as i64)),
        (CastKind::Int, Value::Char(c)) => Ok(Value::Int(i64::from(u32::from(c)))),
        (CastKind::Double, value @ (Value::Int(_) | Value::Double(_) | Value::Char(_))) => {
            Ok(Value::Double(value.as_double().unwrap_or_default()))
        }
        (CastKind::Char, Value::Char(c)) => Ok(Value::Char(c)),
        (CastKind::Char, Value::Int(n)) => Ok(Value::Char(utf16_unit(n as u16))),
        (CastKind::Char, Value::Double(d)) => Ok(Value::Char(utf16_unit(d as u16))),
        (CastKind::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
        (_, value) => Err(invalid(&value)),
    }
}

/// Char for a UTF-16 code unit. Lone surrogates have no `char`.
fn utf16_unit(unit: u16) -> char {
    char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Default ordering used by sorting and `Min`/`Max`.
///
/// Null sorts first, numbers compare numerically (NaN lowest), strings
/// compare ordinally. Other combinations are not comparable.
pub fn compare(lhs: &Value, rhs: &Value) -> Result<Ordering, RuntimeError> {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => return Ok(Ordering::Equal),
        (Value::Null, _) => return Ok(Ordering::Less),
        (_, Value::Null) => return Ok(Ordering::Greater),
        (Value::Str(a), Value::Str(b)) => return Ok(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => return Ok(a.cmp(b)),
        _ => {}
    }
    if let (Some(a), Some(b)) = (int_like(lhs), int_like(rhs)) {
        return Ok(a.cmp(&b));
    }
    match (lhs.as_double(), rhs.as_double()) {
        (Some(a), Some(b)) => Ok(match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }),
        _ => Err(RuntimeError::InvalidComparison),
    }
}

/// Fails unless every non-null value can be ordered against the others.
pub fn ensure_comparable<'a>(
    values: impl IntoIterator<Item = &'a Value>,
) -> Result<(), RuntimeError> {
    let mut first: Option<&Value> = None;
    for value in values.into_iter().filter(|v| !v.is_null()) {
        match first {
            Some(first) => {
                compare(first, value)?;
            }
            None => {
                compare(value, value)?;
                first = Some(value);
            }
        }
    }
    Ok(())
}

/// Stable in-place sort using [`compare`].
pub fn sort_values(values: &mut [Value]) -> Result<(), RuntimeError> {
    if values.len() < 2 {
        return Ok(());
    }
    ensure_comparable(values.iter())?;
    values.sort_by(|a, b| compare(a, b).unwrap_or(Ordering::Equal));
    Ok(())
}
