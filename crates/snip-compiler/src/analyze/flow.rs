//! Reachability analysis.
//!
//! Only literal `true`/`false` conditions count as constant. A loop whose
//! condition is constant `true` completes only through a reachable `break`.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::ast::{Block, Expr, MethodDecl, Stmt};
use crate::parser::cst::SyntaxKind;

/// Reports unreachable statements and a reachable end of the method body.
pub fn check_flow(method: &MethodDecl, diagnostics: &mut Diagnostics) {
    let Some(body) = method.body() else {
        return;
    };

    let mut flow = Flow {
        diagnostics,
        loops: Vec::new(),
        dead: false,
    };

    if flow.block(&body, true) {
        let range = method
            .name()
            .map(|name| name.text_range())
            .unwrap_or_else(|| method.text_range());
        flow.diagnostics
            .report(DiagnosticKind::NotAllPathsReturn, range)
            .emit();
    }
}

struct Flow<'d> {
    diagnostics: &'d mut Diagnostics,
    /// Per enclosing loop: whether a reachable `break` targets it.
    loops: Vec<bool>,
    /// Inside a region already reported as unreachable.
    dead: bool,
}

fn constant_bool(expr: Option<Expr>) -> Option<bool> {
    let Expr::Literal(literal) = expr?.unparenthesized() else {
        return None;
    };
    match literal.token()?.kind() {
        SyntaxKind::KwTrue => Some(true),
        SyntaxKind::KwFalse => Some(false),
        _ => None,
    }
}

impl Flow<'_> {
    /// Returns whether the end of the block is reachable.
    fn block(&mut self, block: &Block, reachable: bool) -> bool {
        let saved = self.dead;
        let mut reachable = reachable;
        for stmt in block.statements() {
            reachable = self.visit(&stmt, reachable);
        }
        self.dead = saved;
        reachable
    }

    fn embedded(&mut self, stmt: Option<Stmt>, reachable: bool) -> bool {
        let Some(stmt) = stmt else {
            return reachable;
        };
        let saved = self.dead;
        let end = self.visit(&stmt, reachable);
        self.dead = saved;
        end
    }

    fn visit(&mut self, stmt: &Stmt, reachable: bool) -> bool {
        if !reachable && !self.dead && !matches!(stmt, Stmt::Block(_) | Stmt::Empty(_)) {
            self.diagnostics
                .report(DiagnosticKind::UnreachableCode, stmt.text_range())
                .emit();
            self.dead = true;
        }
        self.stmt(stmt, reachable)
    }

    fn stmt(&mut self, stmt: &Stmt, reachable: bool) -> bool {
        match stmt {
            Stmt::Block(block) => self.block(block, reachable),
            Stmt::Local(_) | Stmt::Expr(_) | Stmt::Empty(_) => reachable,
            Stmt::Return(_) | Stmt::Throw(_) | Stmt::Continue(_) => false,
            Stmt::Break(_) => {
                if reachable && let Some(breaks) = self.loops.last_mut() {
                    *breaks = true;
                }
                false
            }
            Stmt::If(stmt) => {
                let cond = constant_bool(stmt.condition());
                let then_end = self.embedded(stmt.then_branch(), reachable && cond != Some(false));
                let else_reachable = reachable && cond != Some(true);
                let else_end = match stmt.else_branch() {
                    Some(branch) => self.embedded(Some(branch), else_reachable),
                    None => else_reachable,
                };
                then_end || else_end
            }
            Stmt::While(stmt) => {
                self.looping(constant_bool(stmt.condition()), stmt.body(), reachable)
            }
            Stmt::For(stmt) => {
                let cond = match stmt.condition() {
                    None => Some(true),
                    cond => constant_bool(cond),
                };
                self.looping(cond, stmt.body(), reachable)
            }
            Stmt::Foreach(stmt) => {
                self.looping(None, stmt.body(), reachable);
                reachable
            }
        }
    }

    fn looping(&mut self, cond: Option<bool>, body: Option<Stmt>, reachable: bool) -> bool {
        self.loops.push(false);
        self.embedded(body, reachable && cond != Some(false));
        let breaks = self.loops.pop().unwrap_or(false);
        (reachable && cond != Some(true)) || breaks
    }
}
