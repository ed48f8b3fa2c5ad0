//! Composite formatting for `String.Format` and `Console.WriteLine`.
//!
//! Supports `{index[,alignment][:spec]}` items with `{{`/`}}` escapes and
//! the standard numeric specifiers `F`, `N`, `P`, `D` and `X`. Other
//! specifiers fall back to `ToString()`.

use snip_core::format_double;

use super::error::RuntimeError;
use super::value::Value;

/// Largest precision accepted by a numeric specifier.
const MAX_PRECISION: usize = 99;

/// Alignments at or beyond this width are rejected, as in .NET.
const MAX_ALIGNMENT: u64 = 1_000_000;

pub fn composite(format: &str, args: &[Value]) -> Result<String, RuntimeError> {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(RuntimeError::Format),
            '{' => {
                let mut item = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(RuntimeError::Format),
                        Some(c) => item.push(c),
                    }
                }
                format_item(&item, args, &mut out)?;
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

fn format_item(item: &str, args: &[Value], out: &mut String) -> Result<(), RuntimeError> {
    let (head, spec) = match item.split_once(':') {
        Some((head, spec)) => (head, Some(spec)),
        None => (item, None),
    };
    let (index, alignment) = match head.split_once(',') {
        Some((index, alignment)) => {
            let alignment: i64 = alignment.trim().parse().map_err(|_| RuntimeError::Format)?;
            (index, alignment)
        }
        None => (head, 0),
    };
    let index: usize = index.trim().parse().map_err(|_| RuntimeError::Format)?;
    let value = args.get(index).ok_or(RuntimeError::FormatIndex)?;

    let text = match spec {
        Some(spec) => format_value(value, spec)?,
        None => value.to_string(),
    };

    if alignment.unsigned_abs() >= MAX_ALIGNMENT {
        return Err(RuntimeError::Format);
    }
    let width = alignment.unsigned_abs() as usize;
    let padding = width.saturating_sub(text.chars().count());
    if alignment < 0 {
        out.push_str(&text);
        out.extend(std::iter::repeat_n(' ', padding));
    } else {
        out.extend(std::iter::repeat_n(' ', padding));
        out.push_str(&text);
    }
    Ok(())
}

/// Applies a format specifier, as `value.ToString(spec)` would.
pub fn format_value(value: &Value, spec: &str) -> Result<String, RuntimeError> {
    let mut chars = spec.chars();
    let Some(letter) = chars.next().filter(char::is_ascii_alphabetic) else {
        return Ok(value.to_string());
    };
    let digits = chars.as_str();
    let precision = if digits.is_empty() {
        None
    } else {
        match digits.parse::<usize>() {
            Ok(p) if p <= MAX_PRECISION => Some(p),
            Ok(_) => return Err(RuntimeError::Format),
            // Custom pattern such as `C0x`: not a standard specifier.
            Err(_) => return Ok(value.to_string()),
        }
    };

    let integer = match value {
        Value::Int(n) => Some(*n),
        _ => None,
    };
    let Some(number) = value.as_double().filter(|_| !matches!(value, Value::Char(_))) else {
        return Ok(value.to_string());
    };

    match letter.to_ascii_uppercase() {
        'F' => Ok(fixed(number, precision.unwrap_or(2))),
        'N' => Ok(group_thousands(&fixed(number, precision.unwrap_or(2)))),
        'P' => {
            let percent = fixed(number * 100.0, precision.unwrap_or(2));
            Ok(format!("{} %", group_thousands(&percent)))
        }
        'D' => {
            let n = integer.ok_or(RuntimeError::Format)?;
            let digits = format!("{:0width$}", n.unsigned_abs(), width = precision.unwrap_or(0));
            Ok(if n < 0 { format!("-{digits}") } else { digits })
        }
        'X' => {
            let n = integer.ok_or(RuntimeError::Format)?;
            let width = precision.unwrap_or(0);
            Ok(if letter.is_ascii_uppercase() {
                format!("{n:0width$X}")
            } else {
                format!("{n:0width$x}")
            })
        }
        _ => Ok(value.to_string()),
    }
}

fn fixed(number: f64, precision: usize) -> String {
    if !number.is_finite() {
        return format_double(number);
    }
    format!("{number:.precision$}")
}

/// Inserts `,` separators into the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, fraction) = match unsigned.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (unsigned, None),
    };
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return formatted.to_owned();
    }

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
