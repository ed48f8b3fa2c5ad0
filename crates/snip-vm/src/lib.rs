//! Runtime VM for executing compiled snip units.
//!
//! [`SnippetExecutor`] is the entry point: it loads a [`CompiledUnit`](snip_core::CompiledUnit),
//! runs its entry method on a fresh [`VM`] and turns every outcome, panics
//! included, into an [`EvaluationResult`](snip_core::EvaluationResult).

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

mod executor;


pub use engine::{FuelLimits, RuntimeError, VM, Value, materialize};
pub use executor::SnippetExecutor;

pub type Result<T> = std::result::Result<T, RuntimeError>;
