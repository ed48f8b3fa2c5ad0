//! Enumeration and the `System.Linq` sequence operators.
//!
//! Operators run eagerly over a snapshot of the receiver and return lists.
//! `Where` and `Select` pass the element index to two-parameter lambdas.

use std::cmp::Ordering;

use indexmap::IndexSet;

use super::error::RuntimeError;
use super::ops;
use super::value::{Key, Value};
use super::vm::VM;

const OPERATORS: &[&str] = &[
    "Where",
    "Select",
    "OrderBy",
    "OrderByDescending",
    "Any",
    "All",
    "Count",
    "First",
    "FirstOrDefault",
    "Last",
    "LastOrDefault",
    "Sum",
    "Min",
    "Max",
    "Average",
    "Aggregate",
    "Distinct",
    "Reverse",
    "Take",
    "Skip",
    "Contains",
    "ToList",
    "ToArray",
];

impl VM<'_> {
    /// Snapshot of the items of an enumerable value.
    ///
    /// Dictionaries yield `KeyValuePair` entries, strings yield chars.
    pub(crate) fn sequence(&mut self, value: &Value) -> Result<Vec<Value>, RuntimeError> {
        let items: Vec<Value> = match value {
            Value::List(items) => items.borrow().clone(),
            Value::Set(set) => set.borrow().iter().map(|key| key.0.clone()).collect(),
            Value::Dict(map) => map
                .borrow()
                .iter()
                .map(|(key, value)| Value::entry(key.0.clone(), value.clone()))
                .collect(),
            Value::Str(s) => s.chars().map(Value::Char).collect(),
            Value::Null => return Err(RuntimeError::NullReference),
            other => return Err(RuntimeError::NotEnumerable(other.type_name().to_owned())),
        };
        self.consume(items.len())?;
        Ok(items)
    }

    /// Runs a sequence operator. `None` when `name` is not one, or the
    /// receiver is not enumerable.
    pub(super) fn call_linq(
        &mut self,
        receiver: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        if !OPERATORS.contains(&name) {
            return Ok(None);
        }
        let items = match self.sequence(receiver) {
            Ok(items) => items,
            Err(RuntimeError::NotEnumerable(_)) => return Ok(None),
            Err(err) => return Err(err),
        };

        let value = match (name, args) {
            ("Where", [predicate]) => {
                let mut kept = Vec::new();
                for (i, item) in items.into_iter().enumerate() {
                    if self.test(predicate, item.clone(), Some(i))? {
                        kept.push(item);
                    }
                }
                Value::list(kept)
            }
            ("Select", [selector]) => {
                let mut mapped = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    mapped.push(self.apply(selector, item, Some(i))?);
                }
                Value::list(mapped)
            }
            ("OrderBy", [key]) => Value::list(self.order_by(items, key, false)?),
            ("OrderByDescending", [key]) => Value::list(self.order_by(items, key, true)?),
            ("Any", []) => Value::Bool(!items.is_empty()),
            ("Any", [predicate]) => Value::Bool(self.find(items, predicate)?.is_some()),
            ("All", [predicate]) => {
                let mut all = true;
                for item in items {
                    if !self.test(predicate, item, None)? {
                        all = false;
                        break;
                    }
                }
                Value::Bool(all)
            }
            ("Count", []) => Value::Int(items.len() as i64),
            ("Count", [predicate]) => {
                let mut count = 0i64;
                for item in items {
                    if self.test(predicate, item, None)? {
                        count += 1;
                    }
                }
                Value::Int(count)
            }
            ("First", []) => items.into_iter().next().ok_or(RuntimeError::EmptySequence)?,
            ("First", [predicate]) => self.find(items, predicate)?.ok_or(RuntimeError::NoMatch)?,
            ("FirstOrDefault", []) => items.into_iter().next().unwrap_or(Value::Null),
            ("FirstOrDefault", [predicate]) => self.find(items, predicate)?.unwrap_or(Value::Null),
            ("Last", []) => items.into_iter().next_back().ok_or(RuntimeError::EmptySequence)?,
            ("Last", [predicate]) => {
                let reversed = items.into_iter().rev().collect();
                self.find(reversed, predicate)?.ok_or(RuntimeError::NoMatch)?
            }
            ("LastOrDefault", []) => items.into_iter().next_back().unwrap_or(Value::Null),
            ("LastOrDefault", [predicate]) => {
                let reversed = items.into_iter().rev().collect();
                self.find(reversed, predicate)?.unwrap_or(Value::Null)
            }
            ("Sum", []) => sum(&items)?,
            ("Sum", [selector]) => sum(&self.select(items, selector)?)?,
            ("Min", []) => extreme(items, Ordering::Less)?,
            ("Min", [selector]) => extreme(self.select(items, selector)?, Ordering::Less)?,
            ("Max", []) => extreme(items, Ordering::Greater)?,
            ("Max", [selector]) => extreme(self.select(items, selector)?, Ordering::Greater)?,
            ("Average", []) => average(&items)?,
            ("Average", [selector]) => average(&self.select(items, selector)?)?,
            ("Aggregate", [func]) => {
                let mut items = items.into_iter();
                let seed = items.next().ok_or(RuntimeError::EmptySequence)?;
                self.fold(seed, items, func)?
            }
            ("Aggregate", [seed, func]) => self.fold(seed.clone(), items.into_iter(), func)?,
            ("Distinct", []) => {
                let distinct: IndexSet<Key> = items.into_iter().map(Key).collect();
                Value::list(distinct.into_iter().map(|key| key.0).collect())
            }
            ("Reverse", []) => Value::list(items.into_iter().rev().collect()),
            ("Take", [count]) => {
                let count = non_negative(count)?;
                Value::list(items.into_iter().take(count).collect())
            }
            ("Skip", [count]) => {
                let count = non_negative(count)?;
                Value::list(items.into_iter().skip(count).collect())
            }
            ("Contains", [value]) => Value::Bool(items.iter().any(|item| item.equals(value))),
            ("ToList" | "ToArray", []) => Value::list(items),
            (name, args) => return Err(RuntimeError::argument_count(name, args.len())),
        };
        Ok(Some(value))
    }

    /// Invokes a selector or predicate. Two-parameter lambdas also receive
    /// the element index when one is available.
    fn apply(
        &mut self,
        func: &Value,
        item: Value,
        index: Option<usize>,
    ) -> Result<Value, RuntimeError> {
        let args = match (index, self.lambda_arity(func)) {
            (Some(i), Some(2)) => vec![item, Value::Int(i as i64)],
            _ => vec![item],
        };
        self.invoke(func, args)
    }

    fn test(
        &mut self,
        predicate: &Value,
        item: Value,
        index: Option<usize>,
    ) -> Result<bool, RuntimeError> {
        self.apply(predicate, item, index)?.as_bool()
    }

    fn find(
        &mut self,
        items: Vec<Value>,
        predicate: &Value,
    ) -> Result<Option<Value>, RuntimeError> {
        for item in items {
            if self.test(predicate, item.clone(), None)? {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn select(&mut self, items: Vec<Value>, selector: &Value) -> Result<Vec<Value>, RuntimeError> {
        items
            .into_iter()
            .map(|item| self.apply(selector, item, None))
            .collect()
    }

    fn fold(
        &mut self,
        seed: Value,
        items: impl Iterator<Item = Value>,
        func: &Value,
    ) -> Result<Value, RuntimeError> {
        let mut acc = seed;
        for item in items {
            acc = self.invoke(func, vec![acc, item])?;
        }
        Ok(acc)
    }

    /// Stable sort by selected keys.
    fn order_by(
        &mut self,
        items: Vec<Value>,
        key: &Value,
        descending: bool,
    ) -> Result<Vec<Value>, RuntimeError> {
        let keys = self.select(items.clone(), key)?;
        ops::ensure_comparable(&keys)?;
        let mut pairs: Vec<(Value, Value)> = keys.into_iter().zip(items).collect();
        pairs.sort_by(|(a, _), (b, _)| {
            let ordering = ops::compare(a, b).unwrap_or(Ordering::Equal);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        Ok(pairs.into_iter().map(|(_, item)| item).collect())
    }
}

fn non_negative(count: &Value) -> Result<usize, RuntimeError> {
    Ok(usize::try_from(count.as_int()?).unwrap_or(0))
}

fn not_numeric(value: &Value) -> RuntimeError {
    RuntimeError::ImplicitConversion {
        from: value.type_name().to_owned(),
        to: "double",
    }
}

/// Integer sum while every element is an integer; doubles promote the rest.
fn sum(values: &[Value]) -> Result<Value, RuntimeError> {
    let mut total = Value::Int(0);
    for value in values.iter().filter(|v| !v.is_null()) {
        total = match (&total, value) {
            (Value::Int(a), Value::Int(b)) => {
                Value::Int(a.checked_add(*b).ok_or(RuntimeError::Overflow)?)
            }
            (acc, value) => {
                let a = acc.as_double().ok_or_else(|| not_numeric(acc))?;
                let b = value.as_double().ok_or_else(|| not_numeric(value))?;
                Value::Double(a + b)
            }
        };
    }
    Ok(total)
}

fn average(values: &[Value]) -> Result<Value, RuntimeError> {
    let numbers: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();
    if numbers.is_empty() {
        return Err(RuntimeError::EmptySequence);
    }
    let mut total = 0.0;
    for value in &numbers {
        total += value.as_double().ok_or_else(|| not_numeric(value))?;
    }
    Ok(Value::Double(total / numbers.len() as f64))
}

/// Smallest (`Less`) or largest (`Greater`) element; the first one wins ties.
fn extreme(values: Vec<Value>, wanted: Ordering) -> Result<Value, RuntimeError> {
    ops::ensure_comparable(&values)?;
    let mut values = values.into_iter();
    let mut best = values.next().ok_or(RuntimeError::EmptySequence)?;
    for value in values {
        if ops::compare(&value, &best)? == wanted {
            best = value;
        }
    }
    Ok(best)
}
