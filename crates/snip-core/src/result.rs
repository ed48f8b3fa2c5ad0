//! Outcome of a single snippet evaluation.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::Value;

/// Ordered, already-formatted compiler diagnostics.
///
/// Each entry reads `(<line>,<column>): <severity>: <message>`, or
/// `<severity>: <message>` when the location has no counterpart in the
/// submitted text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompileFailure {
    pub diagnostics: Vec<String>,
}

impl CompileFailure {
    pub fn new(diagnostics: Vec<String>) -> Self {
        Self { diagnostics }
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl std::fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "compilation failed with {} diagnostics", self.diagnostics.len())
    }
}

impl std::error::Error for CompileFailure {}

/// Exactly one of these is produced per evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluationResult {
    Success { value: Value },
    CompileFailure { diagnostics: Vec<String> },
    RuntimeFailure { message: String },
}

impl EvaluationResult {
    pub fn success(value: Value) -> Self {
        Self::Success { value }
    }

    pub fn runtime_failure(message: impl Into<String>) -> Self {
        Self::RuntimeFailure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Short label used in logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::CompileFailure { .. } => "compile_failure",
            Self::RuntimeFailure { .. } => "runtime_failure",
        }
    }
}

impl From<CompileFailure> for EvaluationResult {
    fn from(failure: CompileFailure) -> Self {
        Self::CompileFailure {
            diagnostics: failure.diagnostics,
        }
    }
}

impl Serialize for EvaluationResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Self::Success { value } => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("result", value)?;
            }
            Self::CompileFailure { diagnostics } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", "Compilation failed")?;
                map.serialize_entry("details", diagnostics)?;
            }
            Self::RuntimeFailure { message } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", "Runtime error")?;
                map.serialize_entry("details", message)?;
            }
        }
        map.end()
    }
}
