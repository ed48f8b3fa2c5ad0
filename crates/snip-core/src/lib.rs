#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shared result vocabulary for the snip evaluator.
//!
//! Everything above the compiler speaks in these types:
//! - [`Value`]: a self-contained snippet result, detached from the VM heap
//! - [`EvaluationResult`]: the three-way outcome of one evaluation
//! - [`CompileFailure`]: ordered compiler diagnostics, rendered as strings
//! - [`CompiledUnit`]: the in-memory image handed from compiler to executor

mod result;
mod unit;
mod utils;
mod value;

#[cfg(test)]
mod value_tests;

pub use result::{CompileFailure, EvaluationResult};
pub use unit::CompiledUnit;
pub use utils::format_double;
pub use value::Value;
