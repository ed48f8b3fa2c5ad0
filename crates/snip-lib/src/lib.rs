//! Snip: compile and run C#-flavoured snippets in-process.
//!
//! # Example
//!
//! ```
//! use snip_lib::{Evaluator, EvaluatorConfig, EvaluationResult, Value};
//!
//! let evaluator = Evaluator::new(EvaluatorConfig::default());
//! let result = evaluator.evaluate("return 2 + 2;");
//! assert_eq!(result, EvaluationResult::success(Value::Int(4)));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod evaluator;


pub use evaluator::{Evaluation, Evaluator, EvaluatorConfig};

pub use snip_compiler::{CompileOptions, UnitCounter};
pub use snip_core::{CompileFailure, EvaluationResult, Value};
pub use snip_vm::FuelLimits;
