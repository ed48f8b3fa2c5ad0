//! Snippet compiler: turns a body of statements into a bytecode module image.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use snip_compiler::{CompileOptions, SnippetCompiler, UnitCounter};
//!
//! let compiler = SnippetCompiler::new(Arc::new(UnitCounter::new()), CompileOptions::default());
//! let unit = compiler.compile("return 2 + 2;").expect("valid snippet");
//! assert!(unit.name.starts_with("Snippet_1_"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod compile;
pub mod diagnostics;
pub mod emit;
pub mod parser;
pub mod snippet;

mod compiler;

#[cfg(test)]
mod compiler_tests;

pub use compiler::{CompileOptions, Compilation, SnippetCompiler, compile_unit};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use snippet::{ImportSet, LineMap, UnitCounter};

/// Errors that abort compilation before diagnostics can be produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input nested too deeply for the parser.
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("parser produced a malformed syntax tree")]
    MalformedTree,

    #[error("invalid program: {0}")]
    Emit(#[from] emit::EmitError),

    #[error("failed to encode module image")]
    Module(#[from] snip_bytecode::ModuleError),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
