//! Instance members, indexers and method dispatch.
//!
//! Type-specific methods win over the sequence operators, so
//! `list.Contains(x)` is the list method and `list.Where(..)` falls through
//! to LINQ.

use std::rc::Rc;

use super::error::RuntimeError;
use super::format;
use super::ops;
use super::value::{DictRef, Key, ListRef, SetRef, Value};
use super::vm::VM;

const STRING_METHODS: &[&str] = &[
    "ToUpper",
    "ToLower",
    "Trim",
    "TrimStart",
    "TrimEnd",
    "Contains",
    "StartsWith",
    "EndsWith",
    "IndexOf",
    "Substring",
    "Replace",
    "PadLeft",
    "PadRight",
    "ToCharArray",
];

const LIST_METHODS: &[&str] = &[
    "Add", "AddRange", "Remove", "RemoveAt", "Insert", "Clear", "IndexOf", "Contains", "Sort",
];

const DICT_METHODS: &[&str] = &["Add", "Remove", "ContainsKey", "ContainsValue", "Clear"];

const SET_METHODS: &[&str] = &["Add", "Remove", "Contains", "Clear"];

impl VM<'_> {
    pub(super) fn get_member(
        &mut self,
        receiver: &Value,
        name: &str,
    ) -> Result<Value, RuntimeError> {
        Ok(match (receiver, name) {
            (Value::Null, _) => return Err(RuntimeError::NullReference),
            (Value::Str(s), "Length") => count(s.chars().count()),
            (Value::List(items), "Count" | "Length") => count(items.borrow().len()),
            (Value::Dict(map), "Count") => count(map.borrow().len()),
            (Value::Dict(map), "Keys") => {
                let map = map.borrow();
                self.consume(map.len())?;
                Value::list(map.keys().map(|key| key.0.clone()).collect())
            }
            (Value::Dict(map), "Values") => {
                let map = map.borrow();
                self.consume(map.len())?;
                Value::list(map.values().cloned().collect())
            }
            (Value::Set(set), "Count") => count(set.borrow().len()),
            (Value::Entry(entry), "Key") => entry.0.clone(),
            (Value::Entry(entry), "Value") => entry.1.clone(),
            (Value::Exception(exception), "Message") => Value::string(exception.message.as_str()),
            (other, name) => return Err(RuntimeError::unknown_member(other.type_name(), name)),
        })
    }

    pub(super) fn call_method(
        &mut self,
        receiver: Value,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        if let Value::Lambda(_) = receiver
            && name == "Invoke"
        {
            return self.invoke(&receiver, args);
        }

        match (&receiver, name, args.as_slice()) {
            (Value::Null, ..) => return Err(RuntimeError::NullReference),
            (_, "ToString", []) => {
                let text = receiver.to_string();
                self.check_size(text.len())?;
                return Ok(Value::from(text));
            }
            (_, "ToString", [spec]) if receiver.is_numeric() => {
                return Ok(Value::from(format::format_value(&receiver, &spec.to_string())?));
            }
            (_, "Equals", [other]) => return Ok(Value::Bool(receiver.equals(other))),
            _ => {}
        }

        let handled = match &receiver {
            Value::Str(s) => self.string_method(s, name, &args)?,
            Value::List(items) => self.list_method(items, name, &args)?,
            Value::Dict(map) => self.dict_method(map, name, &args)?,
            Value::Set(set) => self.set_method(set, name, &args)?,
            _ => None,
        };
        if let Some(value) = handled {
            return Ok(value);
        }
        if let Some(value) = self.call_linq(&receiver, name, &args)? {
            return Ok(value);
        }
        Err(RuntimeError::unknown_member(receiver.type_name(), name))
    }

    fn string_method(
        &mut self,
        s: &Rc<str>,
        name: &str,
        args: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        let value = match (name, args) {
            ("ToUpper", []) => Value::from(s.to_uppercase()),
            ("ToLower", []) => Value::from(s.to_lowercase()),
            ("Trim", []) => Value::string(s.trim()),
            ("TrimStart", []) => Value::string(s.trim_start()),
            ("TrimEnd", []) => Value::string(s.trim_end()),
            ("Trim", [Value::Char(c)]) => Value::string(s.trim_matches(*c)),
            ("TrimStart", [Value::Char(c)]) => Value::string(s.trim_start_matches(*c)),
            ("TrimEnd", [Value::Char(c)]) => Value::string(s.trim_end_matches(*c)),
            ("Contains", [needle]) => Value::Bool(s.contains(text_arg(needle, "value")?.as_str())),
            ("StartsWith", [needle]) => {
                Value::Bool(s.starts_with(text_arg(needle, "value")?.as_str()))
            }
            ("EndsWith", [needle]) => Value::Bool(s.ends_with(text_arg(needle, "value")?.as_str())),
            ("IndexOf", [needle]) => {
                let needle = text_arg(needle, "value")?;
                let position = s
                    .find(needle.as_str())
                    .map_or(-1, |byte| s[..byte].chars().count() as i64);
                Value::Int(position)
            }
            ("Substring", [start]) => {
                let chars: Vec<char> = s.chars().collect();
                let start = substring_start(start, chars.len())?;
                Value::from(chars[start..].iter().collect::<String>())
            }
            ("Substring", [start, length]) => {
                let chars: Vec<char> = s.chars().collect();
                let start = substring_start(start, chars.len())?;
                let length = usize::try_from(length.as_int()?).map_err(|_| {
                    RuntimeError::Argument(
                        "Length cannot be less than zero. (Parameter 'length')".to_owned(),
                    )
                })?;
                let end = start
                    .checked_add(length)
                    .filter(|end| *end <= chars.len())
                    .ok_or_else(|| {
                        RuntimeError::Argument(
                            "Index and length must refer to a location within the string. (Parameter 'length')"
                                .to_owned(),
                        )
                    })?;
                Value::from(chars[start..end].iter().collect::<String>())
            }
            ("Replace", [old, new]) => {
                let old = text_arg(old, "oldValue")?;
                if old.is_empty() {
                    return Err(RuntimeError::Argument(
                        "The value cannot be an empty string. (Parameter 'oldValue')".to_owned(),
                    ));
                }
                let new = match new {
                    Value::Null => String::new(),
                    other => text_arg(other, "newValue")?,
                };
                let matches = s.matches(old.as_str()).count();
                self.check_size(s.len() - matches * old.len() + matches * new.len())?;
                Value::from(s.replace(old.as_str(), &new))
            }
            ("Split", separators) => {
                let separators = separators
                    .iter()
                    .map(|sep| text_arg(sep, "separator"))
                    .collect::<Result<Vec<_>, _>>()?;
                let parts = split(s, &separators);
                self.consume(parts.len())?;
                Value::list(parts.into_iter().map(Value::from).collect())
            }
            ("PadLeft" | "PadRight", [width, fill @ ..]) if fill.len() <= 1 => {
                let fill = match fill {
                    [Value::Char(c)] => *c,
                    [other] => {
                        return Err(RuntimeError::ImplicitConversion {
                            from: other.type_name().to_owned(),
                            to: "char",
                        });
                    }
                    _ => ' ',
                };
                let width = usize::try_from(width.as_int()?)
                    .map_err(|_| RuntimeError::ArgumentOutOfRange("totalWidth"))?;
                self.check_size(width)?;
                let padding: String =
                    std::iter::repeat_n(fill, width.saturating_sub(s.chars().count())).collect();
                Value::from(if name == "PadLeft" {
                    format!("{padding}{s}")
                } else {
                    format!("{s}{padding}")
                })
            }
            ("ToCharArray", []) => Value::list(s.chars().map(Value::Char).collect()),
            (name, args) if STRING_METHODS.contains(&name) => {
                return Err(RuntimeError::argument_count(name, args.len()));
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    fn list_method(
        &mut self,
        items: &ListRef,
        name: &str,
        args: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        let value = match (name, args) {
            ("Add", [item]) => {
                self.check_size(items.borrow().len() + 1)?;
                items.borrow_mut().push(item.clone());
                Value::Null
            }
            ("AddRange", [source]) => {
                let extra = self.sequence(source)?;
                self.check_size(items.borrow().len() + extra.len())?;
                items.borrow_mut().extend(extra);
                Value::Null
            }
            ("Remove", [item]) => {
                let mut items = items.borrow_mut();
                let position = items.iter().position(|x| x.equals(item));
                if let Some(index) = position {
                    items.remove(index);
                }
                Value::Bool(position.is_some())
            }
            ("RemoveAt", [index]) => {
                let mut items = items.borrow_mut();
                let index = usize::try_from(index.as_int()?)
                    .ok()
                    .filter(|i| *i < items.len())
                    .ok_or(RuntimeError::CollectionIndex("index"))?;
                items.remove(index);
                Value::Null
            }
            ("Insert", [index, item]) => {
                let len = items.borrow().len();
                let index = usize::try_from(index.as_int()?)
                    .ok()
                    .filter(|i| *i <= len)
                    .ok_or_else(|| {
                        RuntimeError::Argument(
                            "Index must be within the bounds of the List. (Parameter 'index')"
                                .to_owned(),
                        )
                    })?;
                self.check_size(len + 1)?;
                items.borrow_mut().insert(index, item.clone());
                Value::Null
            }
            ("Clear", []) => {
                items.borrow_mut().clear();
                Value::Null
            }
            ("IndexOf", [item]) => {
                let position = items.borrow().iter().position(|x| x.equals(item));
                Value::Int(position.map_or(-1, |i| i as i64))
            }
            ("Contains", [item]) => Value::Bool(items.borrow().iter().any(|x| x.equals(item))),
            ("Sort", []) => {
                let mut sorted = items.borrow().clone();
                self.consume(sorted.len())?;
                ops::sort_values(&mut sorted)?;
                *items.borrow_mut() = sorted;
                Value::Null
            }
            (name, args) if LIST_METHODS.contains(&name) => {
                return Err(RuntimeError::argument_count(name, args.len()));
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    fn dict_method(
        &mut self,
        map: &DictRef,
        name: &str,
        args: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        let value = match (name, args) {
            ("Add", [key, value]) => {
                let key = dict_key(key)?;
                if map.borrow().contains_key(&key) {
                    return Err(RuntimeError::DuplicateKey(key.0.to_string()));
                }
                self.check_size(map.borrow().len() + 1)?;
                map.borrow_mut().insert(key, value.clone());
                Value::Null
            }
            ("Remove", [key]) => {
                let key = dict_key(key)?;
                Value::Bool(map.borrow_mut().shift_remove(&key).is_some())
            }
            ("ContainsKey", [key]) => {
                let key = dict_key(key)?;
                Value::Bool(map.borrow().contains_key(&key))
            }
            ("ContainsValue", [value]) => {
                Value::Bool(map.borrow().values().any(|v| v.equals(value)))
            }
            ("Clear", []) => {
                map.borrow_mut().clear();
                Value::Null
            }
            (name, args) if DICT_METHODS.contains(&name) => {
                return Err(RuntimeError::argument_count(name, args.len()));
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    fn set_method(
        &mut self,
        set: &SetRef,
        name: &str,
        args: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        let value = match (name, args) {
            ("Add", [item]) => {
                let key = Key(item.clone());
                if set.borrow().contains(&key) {
                    Value::Bool(false)
                } else {
                    self.check_size(set.borrow().len() + 1)?;
                    Value::Bool(set.borrow_mut().insert(key))
                }
            }
            ("Remove", [item]) => Value::Bool(set.borrow_mut().shift_remove(&Key(item.clone()))),
            ("Contains", [item]) => Value::Bool(set.borrow().contains(&Key(item.clone()))),
            ("Clear", []) => {
                set.borrow_mut().clear();
                Value::Null
            }
            (name, args) if SET_METHODS.contains(&name) => {
                return Err(RuntimeError::argument_count(name, args.len()));
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    pub(super) fn get_index(
        &mut self,
        target: &Value,
        index: &Value,
    ) -> Result<Value, RuntimeError> {
        match target {
            Value::List(items) => {
                let items = items.borrow();
                let index = element_index(index, items.len())?;
                Ok(items[index].clone())
            }
            Value::Str(s) => {
                let index =
                    usize::try_from(index.as_int()?).map_err(|_| RuntimeError::IndexOutOfRange)?;
                s.chars()
                    .nth(index)
                    .map(Value::Char)
                    .ok_or(RuntimeError::IndexOutOfRange)
            }
            Value::Dict(map) => {
                let key = dict_key(index)?;
                map.borrow()
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| RuntimeError::KeyNotFound(key.0.to_string()))
            }
            Value::Null => Err(RuntimeError::NullReference),
            other => Err(RuntimeError::NotIndexable(other.type_name().to_owned())),
        }
    }

    pub(super) fn set_index(
        &mut self,
        target: &Value,
        index: Value,
        value: Value,
    ) -> Result<(), RuntimeError> {
        match target {
            Value::List(items) => {
                let mut items = items.borrow_mut();
                let index = element_index(&index, items.len())?;
                items[index] = value;
                Ok(())
            }
            Value::Dict(map) => {
                let key = dict_key(&index)?;
                let len = map.borrow().len();
                if !map.borrow().contains_key(&key) {
                    self.check_size(len + 1)?;
                }
                map.borrow_mut().insert(key, value);
                Ok(())
            }
            Value::Str(_) => Err(RuntimeError::ReadOnlyIndexer("string".to_owned())),
            Value::Null => Err(RuntimeError::NullReference),
            other => Err(RuntimeError::NotIndexable(other.type_name().to_owned())),
        }
    }
}

fn count(len: usize) -> Value {
    Value::Int(len as i64)
}

fn element_index(index: &Value, len: usize) -> Result<usize, RuntimeError> {
    usize::try_from(index.as_int()?)
        .ok()
        .filter(|i| *i < len)
        .ok_or(RuntimeError::IndexOutOfRange)
}

fn dict_key(key: &Value) -> Result<Key, RuntimeError> {
    match key {
        Value::Null => Err(RuntimeError::ArgumentNull("key")),
        key => Ok(Key(key.clone())),
    }
}

/// String or char argument as text.
fn text_arg(value: &Value, param: &'static str) -> Result<String, RuntimeError> {
    match value {
        Value::Str(s) => Ok(s.to_string()),
        Value::Char(c) => Ok(c.to_string()),
        Value::Null => Err(RuntimeError::ArgumentNull(param)),
        other => Err(RuntimeError::ImplicitConversion {
            from: other.type_name().to_owned(),
            to: "string",
        }),
    }
}

fn substring_start(start: &Value, len: usize) -> Result<usize, RuntimeError> {
    let start = start.as_int()?;
    if start < 0 {
        return Err(RuntimeError::Argument(
            "StartIndex cannot be less than zero. (Parameter 'startIndex')".to_owned(),
        ));
    }
    usize::try_from(start)
        .ok()
        .filter(|s| *s <= len)
        .ok_or_else(|| {
            RuntimeError::Argument(
                "startIndex cannot be larger than length of string. (Parameter 'startIndex')"
                    .to_owned(),
            )
        })
}

/// `String.Split`: any of the separators delimits; none splits on whitespace.
fn split(s: &str, separators: &[String]) -> Vec<String> {
    let separators: Vec<&str> = separators
        .iter()
        .map(String::as_str)
        .filter(|sep| !sep.is_empty())
        .collect();
    if separators.is_empty() {
        return s.split(char::is_whitespace).map(str::to_owned).collect();
    }

    let mut parts = Vec::new();
    let mut start = 0;
    let mut at = 0;
    while at < s.len() {
        match separators.iter().find(|sep| s[at..].starts_with(**sep)) {
            Some(sep) => {
                parts.push(s[start..at].to_owned());
                at += sep.len();
                start = at;
            }
            None => at += s[at..].chars().next().map_or(1, char::len_utf8),
        }
    }
    parts.push(s[start..].to_owned());
    parts
}
