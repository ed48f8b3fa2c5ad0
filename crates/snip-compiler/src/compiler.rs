//! The snippet pipeline: split, synthesize, parse, analyze, lower, emit.

use std::sync::Arc;
use std::time::Instant;

use snip_bytecode::{ENTRY_POINT, Module};
use snip_core::{CompileFailure, CompiledUnit};
use tracing::{debug, warn};

use crate::analyze::{check_flow, resolve_imports};
use crate::compile::Compiler;
use crate::diagnostics::{DiagnosticMessage, Diagnostics, Severity};
use crate::snippet::{ImportSet, Synthesized, UnitCounter, split, synthesize, unit_name};
use crate::{Error, Result, emit, parser};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fail compilation on warnings too.
    pub warnings_as_errors: bool,
}

/// Everything one run of the pipeline produced.
#[derive(Debug)]
pub struct Compilation {
    pub name: String,
    pub source: Synthesized,
    /// Ordered by position in the synthesized unit.
    pub diagnostics: Diagnostics,
    /// Present when no error was reported.
    pub module: Option<Module>,
}

impl Compilation {
    /// Diagnostics in wire form, positioned relative to the snippet.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|diag| self.format(diag))
            .collect()
    }

    fn format(&self, diag: &DiagnosticMessage) -> String {
        match self.source.locate(diag.range().start()) {
            Some(location) => format!("{location}: {}: {}", diag.severity(), diag.message()),
            None => format!("{}: {}", diag.severity(), diag.message()),
        }
    }
}

/// Runs the pipeline on `snippet` as a unit called `name`.
///
/// Analysis only runs on a syntactically valid unit, so a snippet with
/// syntax errors reports nothing else.
pub fn compile_unit(snippet: &str, name: &str) -> Result<Compilation> {
    let parts = split(snippet);
    let mut imports = ImportSet::new();
    for line in &parts.imports {
        imports.insert(line.text, line.number);
    }
    let source = synthesize(&imports, &parts.body, name);

    let parsed = parser::parse(&source.text)?;
    let mut diagnostics = parsed.diagnostics;
    let mut module = None;

    if !diagnostics.has_errors() {
        let root = parsed.root;
        let resolved = resolve_imports(&root, &mut diagnostics);
        let method = root
            .class()
            .and_then(|class| class.method())
            .ok_or(Error::MalformedTree)?;
        check_flow(&method, &mut diagnostics);
        let program = Compiler::compile(&method, &resolved, &mut diagnostics);
        if !diagnostics.has_errors() {
            module = Some(emit::emit(name, program)?);
        }
    }

    diagnostics.sort_by_position();
    Ok(Compilation {
        name: name.to_string(),
        source,
        diagnostics,
        module,
    })
}

/// Compiles snippets into uniquely named units.
///
/// Cheap to share: the only state is the injected counter.
#[derive(Debug, Clone)]
pub struct SnippetCompiler {
    counter: Arc<UnitCounter>,
    options: CompileOptions,
}

impl SnippetCompiler {
    pub fn new(counter: Arc<UnitCounter>, options: CompileOptions) -> Self {
        Self { counter, options }
    }

    pub fn counter(&self) -> &Arc<UnitCounter> {
        &self.counter
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Compiles a snippet, or returns its diagnostics.
    pub fn compile(&self, snippet: &str) -> std::result::Result<CompiledUnit, CompileFailure> {
        let name = unit_name(&self.counter);
        let started = Instant::now();

        let compilation = compile_unit(snippet, &name).map_err(|err| fatal(&name, err))?;
        let diagnostics = &compilation.diagnostics;
        let failed = diagnostics.has_errors()
            || (self.options.warnings_as_errors && diagnostics.has_warnings());

        let module = match &compilation.module {
            Some(module) if !failed => module,
            _ => {
                debug!(
                    unit = %name,
                    errors = diagnostics.error_count(),
                    "compilation failed\n{}",
                    diagnostics.printer().source(&compilation.source.text).render()
                );
                return Err(CompileFailure::new(compilation.messages()));
            }
        };

        let image = module
            .to_bytes()
            .map_err(|err| fatal(&name, Error::from(err)))?;
        debug!(
            unit = %name,
            bytes = image.len(),
            warnings = diagnostics.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "compiled snippet"
        );
        debug!(unit = %name, "disassembly\n{}", snip_bytecode::dump(module));

        Ok(CompiledUnit::new(name, image, ENTRY_POINT))
    }
}

fn fatal(name: &str, err: Error) -> CompileFailure {
    warn!(unit = %name, error = %err, "compilation aborted");
    CompileFailure::new(vec![format!("{}: {err}", Severity::Error)])
}
