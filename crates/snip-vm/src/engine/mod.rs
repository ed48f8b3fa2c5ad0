//! Runtime engine for compiled snippets.
//!
//! The VM interprets a module's stack code against a single shared frame of
//! locals. Collections live on an `Rc` heap private to one execution;
//! [`materialize`] detaches the result once the entry method returns.

mod builtins;
mod error;
mod format;
mod linq;
mod materializer;
mod methods;
mod ops;
mod value;
mod vm;

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod format_tests;
#[cfg(test)]
mod ops_tests;

pub use error::RuntimeError;
pub use materializer::materialize;
pub use value::{ExceptionValue, Key, Value};
pub use vm::{FuelLimits, VM};
