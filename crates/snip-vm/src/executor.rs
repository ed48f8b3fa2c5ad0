//! Runs compiled units and reports every outcome as data.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use snip_bytecode::Module;
use snip_core::{CompiledUnit, EvaluationResult};
use tracing::{debug, warn};

use crate::engine::{FuelLimits, RuntimeError, VM, materialize};

/// Loads a [`CompiledUnit`], invokes its entry method and converts the
/// result.
///
/// Holds no per-run state, so one executor serves concurrent callers.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnippetExecutor {
    limits: FuelLimits,
}

impl SnippetExecutor {
    pub fn new(limits: FuelLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> FuelLimits {
        self.limits
    }

    /// Never panics: load errors, runtime errors and panics inside the VM
    /// all become [`EvaluationResult::RuntimeFailure`].
    pub fn execute(&self, unit: &CompiledUnit) -> EvaluationResult {
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(unit, self.limits)));

        let result = match outcome {
            Ok(Ok(value)) => EvaluationResult::success(value),
            Ok(Err(err)) => EvaluationResult::runtime_failure(innermost_message(&err)),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(unit = %unit.name, %message, "execution panicked");
                EvaluationResult::runtime_failure(RuntimeError::Panic(message).to_string())
            }
        };

        debug!(
            unit = %unit.name,
            outcome = result.outcome(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "executed snippet"
        );
        result
    }
}

fn run(unit: &CompiledUnit, limits: FuelLimits) -> Result<snip_core::Value, RuntimeError> {
    let module = Module::load(&unit.image)?;
    let entry = module.entry_point(&unit.entry)?;

    let mut vm = VM::new(&module, limits);
    let value = vm.run(entry);
    debug!(unit = %unit.name, steps = vm.steps(), "vm finished");

    materialize(&value?, &limits)
}

/// Message of the deepest error in the `source()` chain.
fn innermost_message(err: &RuntimeError) -> String {
    let mut current: &dyn std::error::Error = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}
