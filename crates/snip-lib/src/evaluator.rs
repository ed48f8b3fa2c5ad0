//! Compile-then-execute orchestration.

use std::sync::Arc;
use std::time::Instant;

use snip_compiler::{CompileOptions, SnippetCompiler, UnitCounter};
use snip_core::EvaluationResult;
use snip_vm::{FuelLimits, SnippetExecutor};
use tracing::{debug, info};

/// Settings for one [`Evaluator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvaluatorConfig {
    pub compile: CompileOptions,
    pub limits: FuelLimits,
}

impl EvaluatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat compiler warnings as errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.compile.warnings_as_errors = strict;
        self
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Outcome of [`Evaluator::evaluate_traced`].
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Name of the compiled unit; `None` when compilation failed.
    pub unit: Option<String>,
    pub result: EvaluationResult,
}

/// Compiles and runs snippets.
///
/// Owns the process-wide [`UnitCounter`] and hands it to the compiler, so
/// every unit produced through one evaluator gets a distinct name. Share it
/// through an `Arc`; all methods take `&self`.
#[derive(Debug, Clone)]
pub struct Evaluator {
    compiler: SnippetCompiler,
    executor: SnippetExecutor,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        let counter = Arc::new(UnitCounter::new());
        Self {
            compiler: SnippetCompiler::new(counter, config.compile),
            executor: SnippetExecutor::new(config.limits),
        }
    }

    /// Number of compilations started so far.
    pub fn units_compiled(&self) -> u64 {
        self.compiler.counter().current()
    }

    pub fn evaluate(&self, snippet: &str) -> EvaluationResult {
        self.evaluate_traced(snippet).result
    }

    /// Like [`evaluate`](Self::evaluate), also reporting the unit name.
    pub fn evaluate_traced(&self, snippet: &str) -> Evaluation {
        let started = Instant::now();

        let unit = match self.compiler.compile(snippet) {
            Ok(unit) => unit,
            Err(failure) => {
                info!(
                    diagnostics = failure.diagnostics.len(),
                    "snippet failed to compile"
                );
                return Evaluation {
                    unit: None,
                    result: failure.into(),
                };
            }
        };

        let result = self.executor.execute(&unit);
        debug!(
            unit = %unit.name,
            outcome = result.outcome(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "evaluated snippet"
        );
        Evaluation {
            unit: Some(unit.name),
            result,
        }
    }
}
