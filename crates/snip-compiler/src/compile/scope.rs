//! Block scopes and local slots.
//!
//! Slots are never reused: each declaration, lambda parameter and hidden
//! temporary gets a fresh slot in the shared frame.

use rowan::TextRange;

use super::Compiler;
use crate::diagnostics::DiagnosticKind;
use crate::parser::SyntaxToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum LocalKind {
    Declared,
    /// `foreach` variable.
    Iteration,
    /// Lambda parameter.
    Parameter,
}

#[derive(Clone, Debug)]
pub(super) struct Local {
    name: String,
    pub(super) slot: u16,
    range: TextRange,
    kind: LocalKind,
    read: bool,
    assigned: bool,
    /// Every value stored so far was a literal.
    constant_only: bool,
}

/// Opaque handle to a declared local.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct LocalId(usize);

#[derive(Debug, Default)]
pub(super) struct Scopes {
    locals: Vec<Local>,
    /// Active scopes, innermost last, each listing its locals.
    frames: Vec<Vec<LocalId>>,
    next_slot: usize,
}

impl Scopes {
    pub(super) fn slot_count(&self) -> usize {
        self.next_slot
    }

    fn lookup(&self, name: &str) -> Option<LocalId> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter().rev())
            .copied()
            .find(|id| self.locals[id.0].name == name)
    }

    fn allocate(&mut self) -> usize {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }
}

impl Compiler<'_> {
    pub(super) fn push_scope(&mut self) {
        self.scopes.frames.push(Vec::new());
    }

    /// Closes the innermost scope, warning about locals never read.
    pub(super) fn pop_scope(&mut self) {
        let Some(frame) = self.scopes.frames.pop() else {
            return;
        };
        for id in frame {
            let local = &self.scopes.locals[id.0];
            if local.kind != LocalKind::Declared || local.read {
                continue;
            }
            let kind = if !local.assigned {
                DiagnosticKind::UnusedDeclared
            } else if local.constant_only {
                DiagnosticKind::UnusedAssigned
            } else {
                continue;
            };
            let (range, name) = (local.range, local.name.clone());
            self.diagnostics.report(kind, range).message(name).emit();
        }
    }

    /// Declares a local in the innermost scope and returns it.
    ///
    /// A name already visible is reported, but still gets its own slot so
    /// lowering can continue.
    pub(super) fn declare(&mut self, name: &SyntaxToken, kind: LocalKind) -> LocalId {
        let text = name.text();
        if self.scopes.lookup(text).is_some() {
            self.diagnostics
                .report(DiagnosticKind::DuplicateLocal, name.text_range())
                .message(text)
                .emit();
        }

        let slot = self.scopes.allocate();
        let slot = self.index(slot, name.text_range(), "more than 65535 locals");
        let id = LocalId(self.scopes.locals.len());
        self.scopes.locals.push(Local {
            name: text.to_string(),
            slot,
            range: name.text_range(),
            kind,
            read: false,
            assigned: kind != LocalKind::Declared,
            constant_only: true,
        });
        if let Some(frame) = self.scopes.frames.last_mut() {
            frame.push(id);
        }
        id
    }

    /// A slot no name refers to, e.g. a `foreach` iterator.
    pub(super) fn hidden_slot(&mut self) -> u16 {
        let slot = self.scopes.allocate();
        self.index(slot, TextRange::default(), "more than 65535 locals")
    }

    pub(super) fn lookup(&self, name: &str) -> Option<LocalId> {
        self.scopes.lookup(name)
    }

    pub(super) fn slot(&self, id: LocalId) -> u16 {
        self.scopes.locals[id.0].slot
    }

    pub(super) fn mark_read(&mut self, id: LocalId) {
        self.scopes.locals[id.0].read = true;
    }

    pub(super) fn mark_assigned(&mut self, id: LocalId, constant: bool) {
        let local = &mut self.scopes.locals[id.0];
        local.assigned = true;
        local.constant_only &= constant;
    }
}
