//! Lowering from the typed AST to stack-machine bytecode.
//!
//! Every expression leaves exactly one value on the operand stack; statements
//! leave none. All locals of a unit, lambda parameters included, live in one
//! shared frame, so lambdas see enclosing locals by reference.
//!
//! # Module Organization
//!
//! - `builder`: per-function instruction buffers with jump patching
//! - `scope`: block scopes, slot allocation, unused-variable warnings
//! - `statements`: statements and control flow
//! - `expressions`: expressions, calls, member access, `new`
//! - `literals`: decoding of literal tokens
//! - `types`: declared-type checks and default values

mod builder;
mod expressions;
mod literals;
mod scope;
mod statements;
mod types;

#[cfg(test)]
mod compile_tests;
#[cfg(test)]
mod literals_tests;

use indexmap::IndexSet;
use rowan::TextRange;
use snip_bytecode::{Constant, ENTRY_POINT, Function, Instruction, Label};

use crate::analyze::Imports;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::ast::MethodDecl;

pub use builder::FunctionBuilder;
pub use literals::{
    LiteralError, parse_int, parse_real, unescape_char, unescape_string, unescape_verbatim,
};
use scope::Scopes;

/// Lowered unit, ready for emission.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub constants: Vec<Constant>,
    pub names: Vec<String>,
    /// Function 0 is the entry point.
    pub functions: Vec<Function>,
    /// Size of the shared frame.
    pub locals: u16,
}

/// Jumps out of the innermost loop, patched when the loop is closed.
#[derive(Debug, Default)]
struct LoopContext {
    breaks: Vec<usize>,
    continues: Vec<usize>,
}

/// Lowering state for one compilation unit.
pub struct Compiler<'a> {
    imports: &'a Imports,
    diagnostics: &'a mut Diagnostics,
    constants: Vec<Constant>,
    names: IndexSet<String>,
    functions: Vec<FunctionBuilder>,
    /// Index of the function being emitted into.
    current: usize,
    scopes: Scopes,
    loops: Vec<LoopContext>,
}

impl<'a> Compiler<'a> {
    fn new(imports: &'a Imports, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            imports,
            diagnostics,
            constants: Vec::new(),
            names: IndexSet::new(),
            functions: vec![FunctionBuilder::new(ENTRY_POINT, Vec::new())],
            current: 0,
            scopes: Scopes::default(),
            loops: Vec::new(),
        }
    }

    /// Lowers the entry method. Problems are reported into `diagnostics`;
    /// the returned program is only meaningful when none are errors.
    pub fn compile(
        method: &MethodDecl,
        imports: &'a Imports,
        diagnostics: &'a mut Diagnostics,
    ) -> Program {
        let mut compiler = Self::new(imports, diagnostics);

        if let Some(body) = method.body() {
            compiler.block(&body);
        }
        // Falling off the end is rejected by flow analysis; keep the code well-formed anyway.
        compiler.push_null();
        compiler.emit(Instruction::Return);

        let locals = compiler.scopes.slot_count();
        let locals = compiler.index(locals, method.text_range(), "more than 65535 locals");

        Program {
            constants: compiler.constants,
            names: compiler.names.into_iter().collect(),
            functions: compiler
                .functions
                .into_iter()
                .map(FunctionBuilder::finish)
                .collect(),
            locals,
        }
    }

    fn function(&mut self) -> &mut FunctionBuilder {
        &mut self.functions[self.current]
    }

    fn emit(&mut self, instr: Instruction) -> usize {
        self.function().emit(instr)
    }

    fn here(&self) -> Label {
        self.functions[self.current].here()
    }

    /// Points the jump at `at` to the next instruction.
    fn patch_here(&mut self, at: usize) {
        let here = self.here();
        self.function().patch(at, here);
    }

    fn patch(&mut self, at: usize, target: Label) {
        self.function().patch(at, target);
    }

    /// Pool index of a constant, reusing an identical entry.
    fn constant(&mut self, constant: Constant) -> u16 {
        let existing = self.constants.iter().position(|c| match (c, &constant) {
            (Constant::Double(a), Constant::Double(b)) => a.to_bits() == b.to_bits(),
            (a, b) => a == b,
        });
        let index = match existing {
            Some(index) => index,
            None => {
                self.constants.push(constant);
                self.constants.len() - 1
            }
        };
        self.index(index, TextRange::default(), "more than 65535 constants")
    }

    fn push_constant(&mut self, constant: Constant) {
        let index = self.constant(constant);
        self.emit(Instruction::Const(index));
    }

    fn push_null(&mut self) {
        self.push_constant(Constant::Null);
    }

    /// Name table index for member and method names.
    fn name(&mut self, name: &str) -> u16 {
        let (index, _) = self.names.insert_full(name.to_string());
        self.index(index, TextRange::default(), "more than 65535 member names")
    }

    fn report(&mut self, kind: DiagnosticKind, range: TextRange, detail: impl Into<String>) {
        self.diagnostics.report(kind, range).message(detail).emit();
    }

    fn index(&mut self, value: usize, range: TextRange, what: &str) -> u16 {
        match u16::try_from(value) {
            Ok(index) => index,
            Err(_) => {
                self.report(DiagnosticKind::Unsupported, range, what);
                u16::MAX
            }
        }
    }
}
