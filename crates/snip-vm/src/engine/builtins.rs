//! Static members and constructors.

use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use snip_bytecode::{Builtin, Constructor};

use super::error::RuntimeError;
use super::format;
use super::value::{ExceptionValue, Key, Value};
use super::vm::VM;

/// Rounding digits accepted by `Math.Round(x, digits)`.
const MAX_ROUND_DIGITS: i64 = 15;

impl VM<'_> {
    pub(super) fn call_builtin(
        &mut self,
        builtin: Builtin,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        match (builtin, args.as_slice()) {
            (Builtin::MathAbs, [x]) => abs(x),
            (Builtin::MathMax, [a, b]) => min_max(a, b, true),
            (Builtin::MathMin, [a, b]) => min_max(a, b, false),
            (Builtin::MathPow, [x, y]) => Ok(Value::Double(double_arg(x)?.powf(double_arg(y)?))),
            (Builtin::MathSqrt, [x]) => Ok(Value::Double(double_arg(x)?.sqrt())),
            (Builtin::MathFloor, [x]) => Ok(Value::Double(double_arg(x)?.floor())),
            (Builtin::MathCeiling, [x]) => Ok(Value::Double(double_arg(x)?.ceil())),
            (Builtin::MathRound, [x]) => Ok(Value::Double(double_arg(x)?.round_ties_even())),
            (Builtin::MathRound, [x, digits]) => round_digits(double_arg(x)?, digits.as_int()?),
            (Builtin::MathPi, []) => Ok(Value::Double(std::f64::consts::PI)),
            (Builtin::MathE, []) => Ok(Value::Double(std::f64::consts::E)),
            (Builtin::ConsoleWriteLine | Builtin::ConsoleWrite, args) => {
                let text = match args {
                    [] => String::new(),
                    [value] => value.to_string(),
                    [template, rest @ ..] => format::composite(&template.to_string(), rest)?,
                };
                tracing::info!(target: "snip::console", unit = %self.module.name, "{text}");
                Ok(Value::Null)
            }
            (Builtin::ConvertToInt32, [x]) => {
                to_integer(x, i64::from(i32::MIN), i64::from(i32::MAX), "Int32")
            }
            (Builtin::ConvertToInt64, [x]) => to_integer(x, i64::MIN, i64::MAX, "Int64"),
            (Builtin::ConvertToDouble, [x]) => to_double(x),
            (Builtin::ConvertToString, [x]) => Ok(Value::from(x.to_string())),
            (Builtin::StringJoin, [separator, rest @ ..]) => {
                let parts = self.spread(rest)?;
                self.join(&parts, &separator.to_string())
            }
            (Builtin::StringConcat, args) => {
                let parts = self.spread(args)?;
                self.join(&parts, "")
            }
            (Builtin::StringFormat, [template, rest @ ..]) => match template {
                Value::Str(template) => {
                    let text = format::composite(template, rest)?;
                    self.checked_string(text)
                }
                Value::Null => Err(RuntimeError::ArgumentNull("format")),
                other => Err(RuntimeError::ImplicitConversion {
                    from: other.type_name().to_owned(),
                    to: "string",
                }),
            },
            (Builtin::StringIsNullOrEmpty, [value]) => Ok(Value::Bool(match value {
                Value::Null => true,
                Value::Str(s) => s.is_empty(),
                _ => false,
            })),
            (Builtin::IntParse, [text]) => {
                let text = parse_arg(text)?;
                text.parse::<i64>().map(Value::Int).map_err(|err| {
                    use std::num::IntErrorKind;
                    match err.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                            RuntimeError::ConversionOverflow("Int64")
                        }
                        _ => RuntimeError::Format,
                    }
                })
            }
            (Builtin::IntMaxValue, []) => Ok(Value::Int(i64::MAX)),
            (Builtin::IntMinValue, []) => Ok(Value::Int(i64::MIN)),
            (Builtin::DoubleParse, [text]) => parse_arg(text)?
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| RuntimeError::Format),
            (Builtin::EnumerableRange, [start, count]) => {
                let start = start.as_int()?;
                let count = self.count_arg(count)?;
                start
                    .checked_add(count as i64)
                    .ok_or(RuntimeError::ArgumentOutOfRange("count"))?;
                Ok(Value::list((0..count as i64).map(|i| Value::Int(start + i)).collect()))
            }
            (Builtin::EnumerableRepeat, [element, count]) => {
                let count = self.count_arg(count)?;
                Ok(Value::list(vec![element.clone(); count]))
            }
            (builtin, args) => Err(RuntimeError::argument_count(builtin.member(), args.len())),
        }
    }

    pub(super) fn construct(
        &mut self,
        ctor: Constructor,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        match (ctor, args.as_slice()) {
            (Constructor::List, []) => Ok(Value::list(Vec::new())),
            (Constructor::List, [Value::Int(capacity)]) => {
                if *capacity < 0 {
                    return Err(RuntimeError::ArgumentOutOfRange("capacity"));
                }
                Ok(Value::list(Vec::new()))
            }
            (Constructor::List, [source]) => Ok(Value::list(self.sequence(source)?)),
            (Constructor::HashSet, []) | (Constructor::HashSet, [Value::Int(_)]) => {
                Ok(Value::set(IndexSet::new()))
            }
            (Constructor::HashSet, [source]) => {
                let items = self.sequence(source)?;
                Ok(Value::set(items.into_iter().map(Key).collect()))
            }
            (Constructor::Dictionary, []) => {
                Ok(Value::dict(IndexMap::new()))
            }
            (Constructor::Array, [length, default]) => {
                let length = length.as_int()?;
                let length = usize::try_from(length).map_err(|_| RuntimeError::Overflow)?;
                self.check_size(length)?;
                self.consume(length)?;
                Ok(Value::list(vec![default.clone(); length]))
            }
            (ctor, args) if ctor.is_exception() => {
                let message = match args {
                    [] | [Value::Null] => default_message(ctor).to_owned(),
                    [message] => message.to_string(),
                    _ => return Err(RuntimeError::argument_count(ctor.type_name(), args.len())),
                };
                Ok(Value::Exception(Rc::new(ExceptionValue::new(
                    ctor.type_name(),
                    message,
                ))))
            }
            (ctor, args) => Err(RuntimeError::argument_count(ctor.type_name(), args.len())),
        }
    }

    /// Arguments of `String.Join`/`String.Concat`: a single collection
    /// contributes its items.
    fn spread(&mut self, args: &[Value]) -> Result<Vec<Value>, RuntimeError> {
        match args {
            [single @ (Value::List(_) | Value::Set(_))] => self.sequence(single),
            _ => Ok(args.to_vec()),
        }
    }

    /// Validates the element count of a generated sequence.
    fn count_arg(&mut self, count: &Value) -> Result<usize, RuntimeError> {
        let count = usize::try_from(count.as_int()?)
            .map_err(|_| RuntimeError::ArgumentOutOfRange("count"))?;
        self.check_size(count)?;
        self.consume(count)?;
        Ok(count)
    }

    /// Joins rendered values, failing as soon as the result grows too long.
    fn join(&mut self, parts: &[Value], separator: &str) -> Result<Value, RuntimeError> {
        self.consume(parts.len())?;
        let mut joined = String::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                joined.push_str(separator);
            }
            joined.push_str(&part.to_string());
            self.check_size(joined.len())?;
        }
        Ok(Value::from(joined))
    }

    fn checked_string(&self, text: String) -> Result<Value, RuntimeError> {
        self.check_size(text.len())?;
        Ok(Value::from(text))
    }
}

fn default_message(ctor: Constructor) -> &'static str {
    match ctor {
        Constructor::InvalidOperationException => {
            "Operation is not valid due to the current state of the object."
        }
        Constructor::ArgumentException => "Value does not fall within the expected range.",
        _ => "Exception of type 'System.Exception' was thrown.",
    }
}

fn double_arg(value: &Value) -> Result<f64, RuntimeError> {
    match value {
        Value::Null => Err(RuntimeError::NullReference),
        other => other.as_double().ok_or_else(|| RuntimeError::ImplicitConversion {
            from: other.type_name().to_owned(),
            to: "double",
        }),
    }
}

fn abs(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Int(n) => n.checked_abs().map(Value::Int).ok_or(RuntimeError::Overflow),
        Value::Char(c) => Ok(Value::Int(i64::from(u32::from(*c)))),
        other => Ok(Value::Double(double_arg(other)?.abs())),
    }
}

fn min_max(a: &Value, b: &Value, max: bool) -> Result<Value, RuntimeError> {
    if let (Value::Int(x), Value::Int(y)) = (a, b) {
        return Ok(Value::Int(if max { *x.max(y) } else { *x.min(y) }));
    }
    let (x, y) = (double_arg(a)?, double_arg(b)?);
    if x.is_nan() || y.is_nan() {
        return Ok(Value::Double(f64::NAN));
    }
    Ok(Value::Double(if max { x.max(y) } else { x.min(y) }))
}

fn round_digits(x: f64, digits: i64) -> Result<Value, RuntimeError> {
    if !(0..=MAX_ROUND_DIGITS).contains(&digits) {
        return Err(RuntimeError::Argument(
            "Rounding digits must be between 0 and 15, inclusive. (Parameter 'digits')".to_owned(),
        ));
    }
    let scale = 10f64.powi(digits as i32);
    let rounded = (x * scale).round_ties_even() / scale;
    // Scaling overflows for huge magnitudes; those have no fraction anyway.
    Ok(Value::Double(if rounded.is_finite() { rounded } else { x }))
}

/// `Convert.ToInt32`/`ToInt64`: doubles round half to even, then range-check.
fn to_integer(
    value: &Value,
    min: i64,
    max: i64,
    type_name: &'static str,
) -> Result<Value, RuntimeError> {
    let overflow = || RuntimeError::ConversionOverflow(type_name);
    let n = match value {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Int(n) => *n,
        Value::Char(c) => i64::from(u32::from(*c)),
        Value::Double(d) => {
            let rounded = d.round_ties_even();
            if rounded.is_nan() || rounded < min as f64 || rounded >= max as f64 + 1.0 {
                return Err(overflow());
            }
            rounded as i64
        }
        Value::Str(s) => s.trim().parse::<i64>().map_err(|err| {
            use std::num::IntErrorKind;
            match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => overflow(),
                _ => RuntimeError::Format,
            }
        })?,
        other => {
            return Err(RuntimeError::InvalidCast {
                from: other.type_name().to_owned(),
                to: "int",
            });
        }
    };
    if n < min || n > max {
        return Err(overflow());
    }
    Ok(Value::Int(n))
}

fn to_double(value: &Value) -> Result<Value, RuntimeError> {
    Ok(Value::Double(match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Int(n) => *n as f64,
        Value::Double(d) => *d,
        Value::Str(s) => s.trim().parse::<f64>().map_err(|_| RuntimeError::Format)?,
        other => {
            return Err(RuntimeError::InvalidCast {
                from: other.type_name().to_owned(),
                to: "double",
            });
        }
    }))
}

fn parse_arg(value: &Value) -> Result<&str, RuntimeError> {
    match value {
        Value::Str(s) => Ok(s.trim()),
        Value::Null => Err(RuntimeError::ArgumentNull("s")),
        other => Err(RuntimeError::ImplicitConversion {
            from: other.type_name().to_owned(),
            to: "string",
        }),
    }
}
