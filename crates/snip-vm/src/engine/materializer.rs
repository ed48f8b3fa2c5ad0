//! Converts a VM value into a self-contained [`snip_core::Value`].
//!
//! Shared collections become owned copies. A collection that contains
//! itself, directly or through others, cannot be copied and is reported as
//! [`RuntimeError::CyclicValue`].

use std::rc::Rc;

use snip_core::Value as Output;

use super::error::RuntimeError;
use super::value::Value;
use super::vm::FuelLimits;

/// Deepest nesting a result may have.
const MAX_DEPTH: usize = 256;

pub fn materialize(value: &Value, limits: &FuelLimits) -> Result<Output, RuntimeError> {
    let mut materializer = Materializer {
        path: Vec::new(),
        // Nodes across the whole result, not per collection.
        budget: limits.get_max_collection(),
    };
    materializer.convert(value)
}

struct Materializer {
    /// Addresses of the collections currently being copied.
    path: Vec<usize>,
    budget: usize,
}

impl Materializer {
    fn convert(&mut self, value: &Value) -> Result<Output, RuntimeError> {
        self.budget = self
            .budget
            .checked_sub(1)
            .ok_or(RuntimeError::CollectionLimitExceeded)?;

        Ok(match value {
            Value::Null => Output::Null,
            Value::Bool(b) => Output::Bool(*b),
            Value::Int(n) => Output::Int(*n),
            Value::Double(d) => Output::Double(*d),
            Value::Char(c) => Output::Char(*c),
            Value::Str(s) => Output::String(s.to_string()),
            Value::List(items) => {
                self.enter(Rc::as_ptr(items) as *const () as usize)?;
                let items = items
                    .borrow()
                    .iter()
                    .map(|item| self.convert(item))
                    .collect::<Result<_, _>>()?;
                self.path.pop();
                Output::List(items)
            }
            Value::Set(items) => {
                self.enter(Rc::as_ptr(items) as *const () as usize)?;
                let items = items
                    .borrow()
                    .iter()
                    .map(|key| self.convert(&key.0))
                    .collect::<Result<_, _>>()?;
                self.path.pop();
                Output::List(items)
            }
            Value::Dict(entries) => {
                self.enter(Rc::as_ptr(entries) as *const () as usize)?;
                let entries = entries
                    .borrow()
                    .iter()
                    .map(|(key, value)| Ok((self.convert(&key.0)?, self.convert(value)?)))
                    .collect::<Result<_, RuntimeError>>()?;
                self.path.pop();
                Output::Dictionary(entries)
            }
            Value::Entry(entry) => {
                self.enter(Rc::as_ptr(entry) as *const () as usize)?;
                let fields = vec![
                    ("key".to_owned(), self.convert(&entry.0)?),
                    ("value".to_owned(), self.convert(&entry.1)?),
                ];
                self.path.pop();
                Output::Object(fields)
            }
            Value::Exception(exception) => Output::Object(vec![
                ("type".to_owned(), Output::String(exception.full_name())),
                ("message".to_owned(), Output::String(exception.message.clone())),
            ]),
            Value::Lambda(_) => Output::String("<lambda>".to_owned()),
            Value::Iterator(_) => Output::String("<iterator>".to_owned()),
        })
    }

    fn enter(&mut self, address: usize) -> Result<(), RuntimeError> {
        if self.path.contains(&address) {
            return Err(RuntimeError::CyclicValue);
        }
        if self.path.len() >= MAX_DEPTH {
            return Err(RuntimeError::NestingTooDeep);
        }
        self.path.push(address);
        Ok(())
    }
}
