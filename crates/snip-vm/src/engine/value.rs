//! Runtime values.
//!
//! Collections are shared, mutable and compared by reference, like their
//! .NET counterparts. Nothing here is `Send`; results leave the VM through
//! the materializer.
//!
//! Snippets can nest collections arbitrarily deep, so dropping one frees its
//! contents with an explicit work list instead of recursing.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::Deref;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use snip_bytecode::Constant;
use snip_core::format_double;

use super::error::RuntimeError;

/// Nesting depth after which `ToString` stops descending into collections.
const DISPLAY_DEPTH: usize = 64;

/// Nesting depth after which entries compare by reference.
const COMPARE_DEPTH: usize = 64;

pub type ListRef = Rc<Shared<Vec<Value>>>;
pub type DictRef = Rc<Shared<IndexMap<Key, Value>>>;
pub type SetRef = Rc<Shared<IndexSet<Key>>>;
pub type IterRef = Rc<Shared<std::vec::IntoIter<Value>>>;

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Char(char),
    Str(Rc<str>),
    /// `List<T>` and arrays.
    List(ListRef),
    Dict(DictRef),
    Set(SetRef),
    /// `KeyValuePair<K, V>` produced by iterating a dictionary.
    Entry(Rc<Pair>),
    Exception(Rc<ExceptionValue>),
    /// Index into the module's function table.
    Lambda(u16),
    /// Snapshot iterator held in a hidden local by `foreach`.
    Iterator(IterRef),
}

/// Interior-mutable collection storage that frees nested values iteratively.
#[derive(Debug)]
pub struct Shared<T: Reclaim>(RefCell<T>);

impl<T: Reclaim> Shared<T> {
    pub fn new(inner: T) -> Self {
        Self(RefCell::new(inner))
    }
}

impl<T: Reclaim> Deref for Shared<T> {
    type Target = RefCell<T>;

    fn deref(&self) -> &RefCell<T> {
        &self.0
    }
}

impl<T: Reclaim> Drop for Shared<T> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.0.get_mut().reclaim(&mut pending);
        release_all(pending);
    }
}

/// Containers whose elements can be moved out ahead of a drop.
pub trait Reclaim {
    fn reclaim(&mut self, pending: &mut Vec<Value>);
}

impl Reclaim for Vec<Value> {
    fn reclaim(&mut self, pending: &mut Vec<Value>) {
        pending.append(self);
    }
}

impl Reclaim for IndexMap<Key, Value> {
    fn reclaim(&mut self, pending: &mut Vec<Value>) {
        for (key, value) in self.drain(..) {
            pending.push(key.0);
            pending.push(value);
        }
    }
}

impl Reclaim for IndexSet<Key> {
    fn reclaim(&mut self, pending: &mut Vec<Value>) {
        pending.extend(self.drain(..).map(|key| key.0));
    }
}

impl Reclaim for std::vec::IntoIter<Value> {
    fn reclaim(&mut self, pending: &mut Vec<Value>) {
        pending.extend(self.by_ref());
    }
}

/// Key and value of a `KeyValuePair`.
#[derive(Debug)]
pub struct Pair(pub Value, pub Value);

impl Drop for Pair {
    fn drop(&mut self) {
        if self.0.is_scalar() && self.1.is_scalar() {
            return;
        }
        release_all(vec![
            mem::replace(&mut self.0, Value::Null),
            mem::replace(&mut self.1, Value::Null),
        ]);
    }
}

/// Drops `pending` one value at a time, flattening sole-owner containers.
fn release_all(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        value.release(&mut pending);
    }
}

fn reclaim<T: Reclaim>(shared: Rc<Shared<T>>, pending: &mut Vec<Value>) {
    if let Some(mut shared) = Rc::into_inner(shared) {
        shared.0.get_mut().reclaim(pending);
    }
}

/// Exception object created by `new Exception(..)` and friends.
#[derive(Clone, Debug, PartialEq)]
pub struct ExceptionValue {
    /// Simple type name, e.g. `InvalidOperationException`.
    pub type_name: &'static str,
    pub message: String,
}

impl ExceptionValue {
    pub fn new(type_name: &'static str, message: impl Into<String>) -> Self {
        Self {
            type_name,
            message: message.into(),
        }
    }

    /// Namespace-qualified type name.
    pub fn full_name(&self) -> String {
        format!("System.{}", self.type_name)
    }
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Self::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Self::List(Rc::new(Shared::new(items)))
    }

    pub fn dict(entries: IndexMap<Key, Value>) -> Self {
        Self::Dict(Rc::new(Shared::new(entries)))
    }

    pub fn set(items: IndexSet<Key>) -> Self {
        Self::Set(Rc::new(Shared::new(items)))
    }

    pub fn entry(key: Value, value: Value) -> Self {
        Self::Entry(Rc::new(Pair(key, value)))
    }

    pub fn iterator(items: Vec<Value>) -> Self {
        Self::Iterator(Rc::new(Shared::new(items.into_iter())))
    }

    pub fn from_constant(constant: &Constant) -> Self {
        match constant {
            Constant::Null => Self::Null,
            Constant::Bool(b) => Self::Bool(*b),
            Constant::Int(n) => Self::Int(*n),
            Constant::Double(d) => Self::Double(*d),
            Constant::Char(c) => Self::Char(*c),
            Constant::Str(s) => Self::string(s.as_str()),
        }
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::List(_) => "List",
            Self::Dict(_) => "Dictionary",
            Self::Set(_) => "HashSet",
            Self::Entry(_) => "KeyValuePair",
            Self::Exception(e) => e.type_name,
            Self::Lambda(_) => "Func",
            Self::Iterator(_) => "IEnumerator",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for values that hold no other values.
    fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Self::List(_) | Self::Dict(_) | Self::Set(_) | Self::Entry(_) | Self::Iterator(_)
        )
    }

    /// Moves the contents of a solely owned container onto `pending`.
    fn release(self, pending: &mut Vec<Value>) {
        match self {
            Self::List(list) => reclaim(list, pending),
            Self::Dict(dict) => reclaim(dict, pending),
            Self::Set(set) => reclaim(set, pending),
            Self::Iterator(iter) => reclaim(iter, pending),
            Self::Entry(entry) => {
                if let Some(mut pair) = Rc::into_inner(entry) {
                    pending.push(mem::replace(&mut pair.0, Value::Null));
                    pending.push(mem::replace(&mut pair.1, Value::Null));
                }
            }
            _ => {}
        }
    }

    pub fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(RuntimeError::not_bool(other.type_name())),
        }
    }

    /// Integer view for indices and counts. Chars widen implicitly.
    pub fn as_int(&self) -> Result<i64, RuntimeError> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Char(c) => Ok(i64::from(u32::from(*c))),
            Self::Null => Err(RuntimeError::NullReference),
            other => Err(RuntimeError::ImplicitConversion {
                from: other.type_name().to_owned(),
                to: "int",
            }),
        }
    }

    /// Numeric view with implicit widening to double.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Double(d) => Some(*d),
            Self::Char(c) => Some(f64::from(u32::from(*c))),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Double(_) | Self::Char(_))
    }

    /// `object.Equals` semantics: value equality for primitives and entries,
    /// reference equality for collections. An integral double equals the
    /// same integer.
    pub fn equals(&self, other: &Value) -> bool {
        self.equals_at(other, 0)
    }

    fn equals_at(&self, other: &Value, depth: usize) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Int(a), Self::Double(b)) | (Self::Double(b), Self::Int(a)) => {
                integral(*b) == Some(*a)
            }
            (Self::Double(a), Self::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Dict(a), Self::Dict(b)) => Rc::ptr_eq(a, b),
            (Self::Set(a), Self::Set(b)) => Rc::ptr_eq(a, b),
            (Self::Entry(a), Self::Entry(b)) => {
                Rc::ptr_eq(a, b)
                    || (depth < COMPARE_DEPTH
                        && a.0.equals_at(&b.0, depth + 1)
                        && a.1.equals_at(&b.1, depth + 1))
            }
            (Self::Exception(a), Self::Exception(b)) => Rc::ptr_eq(a, b),
            (Self::Lambda(a), Self::Lambda(b)) => a == b,
            (Self::Iterator(a), Self::Iterator(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn hash_into<H: Hasher>(&self, state: &mut H, depth: usize) {
        match self {
            Self::Null => 0u8.hash(state),
            Self::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Self::Int(n) => {
                2u8.hash(state);
                n.hash(state);
            }
            Self::Double(d) => match integral(*d) {
                Some(n) => {
                    2u8.hash(state);
                    n.hash(state);
                }
                None if d.is_nan() => 3u8.hash(state),
                None => {
                    3u8.hash(state);
                    d.to_bits().hash(state);
                }
            },
            Self::Char(c) => {
                4u8.hash(state);
                c.hash(state);
            }
            Self::Str(s) => {
                5u8.hash(state);
                s.hash(state);
            }
            Self::List(l) => {
                6u8.hash(state);
                std::ptr::hash(Rc::as_ptr(l), state);
            }
            Self::Dict(d) => {
                7u8.hash(state);
                std::ptr::hash(Rc::as_ptr(d), state);
            }
            Self::Set(s) => {
                8u8.hash(state);
                std::ptr::hash(Rc::as_ptr(s), state);
            }
            Self::Entry(e) => {
                9u8.hash(state);
                if depth < COMPARE_DEPTH {
                    e.0.hash_into(state, depth + 1);
                    e.1.hash_into(state, depth + 1);
                }
            }
            Self::Exception(e) => {
                10u8.hash(state);
                std::ptr::hash(Rc::as_ptr(e), state);
            }
            Self::Lambda(index) => {
                11u8.hash(state);
                index.hash(state);
            }
            Self::Iterator(it) => {
                12u8.hash(state);
                std::ptr::hash(Rc::as_ptr(it), state);
            }
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        if depth > DISPLAY_DEPTH {
            return f.write_str("...");
        }
        match self {
            Self::Null => Ok(()),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Double(d) => f.write_str(&format_double(*d)),
            Self::Char(c) => write!(f, "{c}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => render_seq(f, items.borrow().iter(), depth),
            Self::Set(items) => render_seq(f, items.borrow().iter().map(|k| &k.0), depth),
            Self::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    render_pair(f, &key.0, value, depth)?;
                }
                f.write_str("}")
            }
            Self::Entry(entry) => render_pair(f, &entry.0, &entry.1, depth),
            Self::Exception(e) => write!(f, "{}: {}", e.full_name(), e.message),
            Self::Lambda(_) => f.write_str("<lambda>"),
            Self::Iterator(_) => f.write_str("<iterator>"),
        }
    }
}

/// The integer an integral, in-range double is equal to.
fn integral(d: f64) -> Option<i64> {
    (d.fract() == 0.0 && d >= i64::MIN as f64 && d < i64::MAX as f64).then_some(d as i64)
}

fn render_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'a Value>,
    depth: usize,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.render(f, depth + 1)?;
    }
    f.write_str("]")
}

fn render_pair(
    f: &mut fmt::Formatter<'_>,
    key: &Value,
    value: &Value,
    depth: usize,
) -> fmt::Result {
    f.write_str("[")?;
    key.render(f, depth + 1)?;
    f.write_str(", ")?;
    value.render(f, depth + 1)?;
    f.write_str("]")
}

/// `ToString()` semantics.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::string(s)
    }
}

/// Hash key for dictionaries and hash sets, using [`Value::equals`].
#[derive(Clone, Debug)]
pub struct Key(pub Value);

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.0.equals(&other.0)
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_into(state, 0);
    }
}
