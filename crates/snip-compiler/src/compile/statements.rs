//! Statement lowering. Statements leave the operand stack as they found it.

use snip_bytecode::{Instruction, Label};

use super::scope::LocalKind;
use super::types::default_value;
use super::{Compiler, LoopContext};
use crate::diagnostics::DiagnosticKind;
use crate::parser::ast::{
    Block, Expr, ExprStmt, ForStmt, ForeachStmt, IfStmt, LocalDecl, Stmt, WhileStmt,
};
use crate::parser::cst::SyntaxKind;

/// Expressions allowed on their own as a statement.
fn is_statement_expression(expr: &Expr) -> bool {
    match expr {
        Expr::Assign(_) | Expr::Call(_) | Expr::New(_) | Expr::Postfix(_) => true,
        Expr::Prefix(prefix) => prefix
            .op()
            .is_some_and(|op| matches!(op.kind(), SyntaxKind::PlusPlus | SyntaxKind::MinusMinus)),
        _ => false,
    }
}

impl Compiler<'_> {
    pub(super) fn block(&mut self, block: &Block) {
        self.push_scope();
        for stmt in block.statements() {
            self.stmt(&stmt);
        }
        self.pop_scope();
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::Local(local) => self.local(local),
            Stmt::If(stmt) => self.if_stmt(stmt),
            Stmt::While(stmt) => self.while_stmt(stmt),
            Stmt::For(stmt) => self.for_stmt(stmt),
            Stmt::Foreach(stmt) => self.foreach_stmt(stmt),
            Stmt::Return(stmt) => match stmt.value() {
                Some(value) => {
                    self.expr(&value);
                    self.emit(Instruction::Return);
                }
                None => {
                    self.diagnostics
                        .report(DiagnosticKind::MissingReturnValue, stmt.text_range())
                        .emit();
                }
            },
            Stmt::Throw(stmt) => {
                self.expr_opt(stmt.value());
                self.emit(Instruction::Throw);
            }
            Stmt::Break(stmt) => {
                let jump = self.emit(Instruction::Jump(0));
                match self.loops.last_mut() {
                    Some(ctx) => ctx.breaks.push(jump),
                    None => self
                        .diagnostics
                        .report(DiagnosticKind::NoEnclosingLoop, stmt.text_range())
                        .emit(),
                }
            }
            Stmt::Continue(stmt) => {
                let jump = self.emit(Instruction::Jump(0));
                match self.loops.last_mut() {
                    Some(ctx) => ctx.continues.push(jump),
                    None => self
                        .diagnostics
                        .report(DiagnosticKind::NoEnclosingLoop, stmt.text_range())
                        .emit(),
                }
            }
            Stmt::Expr(stmt) => self.expr_stmt(stmt),
            Stmt::Empty(_) => {}
        }
    }

    /// Body of `if`/`while`/`for`/`foreach`. Declarations need a block there.
    fn embedded(&mut self, stmt: Option<Stmt>) {
        let Some(stmt) = stmt else {
            return;
        };
        if let Stmt::Local(local) = &stmt {
            self.report(
                DiagnosticKind::Unsupported,
                local.text_range(),
                "a declaration as an embedded statement",
            );
        }
        self.push_scope();
        self.stmt(&stmt);
        self.pop_scope();
    }

    fn local(&mut self, local: &LocalDecl) {
        let Some(name) = local.name() else {
            return;
        };
        let ty = local.ty();
        let init = local.init();

        if local.is_var() {
            if init.is_none() {
                self.diagnostics
                    .report(DiagnosticKind::ImplicitlyTypedWithoutInit, name.text_range())
                    .emit();
            }
        } else if let Some(ty) = &ty {
            self.check_type(ty);
        }

        // The initializer cannot see the variable it initializes.
        match &init {
            Some(init) => self.expr(init),
            None => {
                let default = default_value(ty.as_ref());
                self.push_constant(default);
            }
        }

        let id = self.declare(&name, LocalKind::Declared);
        if let Some(init) = &init {
            self.mark_assigned(id, super::expressions::is_literal(init));
        }
        let slot = self.slot(id);
        self.emit(Instruction::StoreLocal(slot));
    }

    fn if_stmt(&mut self, stmt: &IfStmt) {
        self.expr_opt(stmt.condition());
        let to_else = self.emit(Instruction::JumpIfFalse(0));
        self.embedded(stmt.then_branch());

        match stmt.else_branch() {
            Some(else_branch) => {
                let to_end = self.emit(Instruction::Jump(0));
                self.patch_here(to_else);
                self.embedded(Some(else_branch));
                self.patch_here(to_end);
            }
            None => self.patch_here(to_else),
        }
    }

    fn while_stmt(&mut self, stmt: &WhileStmt) {
        let start = self.here();
        self.expr_opt(stmt.condition());
        let exit = self.emit(Instruction::JumpIfFalse(0));

        self.loops.push(LoopContext::default());
        self.embedded(stmt.body());
        self.emit(Instruction::Jump(start));

        self.patch_here(exit);
        self.close_loop(start);
    }

    fn for_stmt(&mut self, stmt: &ForStmt) {
        self.push_scope();

        if let Some(init) = stmt.init() {
            match init.local() {
                Some(local) => self.local(&local),
                None => {
                    for expr in init.exprs() {
                        self.statement_expr(&expr);
                    }
                }
            }
        }

        let start = self.here();
        let exit = stmt.condition().map(|cond| {
            self.expr(&cond);
            self.emit(Instruction::JumpIfFalse(0))
        });

        self.loops.push(LoopContext::default());
        self.embedded(stmt.body());

        let next = self.here();
        for update in stmt.updates() {
            self.statement_expr(&update);
        }
        self.emit(Instruction::Jump(start));

        if let Some(exit) = exit {
            self.patch_here(exit);
        }
        self.close_loop(next);
        self.pop_scope();
    }

    fn foreach_stmt(&mut self, stmt: &ForeachStmt) {
        self.push_scope();

        self.expr_opt(stmt.iterable());
        let iter = self.hidden_slot();
        self.emit(Instruction::IterStart(iter));

        let start = self.here();
        let exit = self.emit(Instruction::IterNext { slot: iter, exit: 0 });
        match stmt.name() {
            Some(name) => {
                let id = self.declare(&name, LocalKind::Iteration);
                let slot = self.slot(id);
                self.emit(Instruction::StoreLocal(slot));
            }
            None => {
                self.emit(Instruction::Pop);
            }
        }

        self.loops.push(LoopContext::default());
        self.embedded(stmt.body());
        self.emit(Instruction::Jump(start));

        self.patch_here(exit);
        self.close_loop(start);
        self.pop_scope();
    }

    /// Pops the innermost loop, sending breaks here and continues to `next`.
    fn close_loop(&mut self, next: Label) {
        let Some(ctx) = self.loops.pop() else {
            return;
        };
        for jump in ctx.breaks {
            self.patch_here(jump);
        }
        for jump in ctx.continues {
            self.patch(jump, next);
        }
    }

    fn expr_stmt(&mut self, stmt: &ExprStmt) {
        if let Some(expr) = stmt.expr() {
            self.statement_expr(&expr);
        }
    }

    /// Evaluates an expression for its effect and drops the value.
    fn statement_expr(&mut self, expr: &Expr) {
        if !is_statement_expression(expr) {
            self.diagnostics
                .report(DiagnosticKind::InvalidStatement, expr.text_range())
                .emit();
        }
        self.expr(expr);
        self.emit(Instruction::Pop);
    }
}
