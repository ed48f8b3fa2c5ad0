use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::{EXPR_FIRST, STMT_RECOVERY};

impl Parser<'_> {
    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) {
        self.assert_current(SyntaxKind::BraceOpen);
        self.start_node(SyntaxKind::Block);
        self.bump();

        while !self.currently_is(SyntaxKind::BraceClose) && !self.should_stop() && !self.at_eof() {
            self.parse_statement();
        }

        self.expect(SyntaxKind::BraceClose, "`}`");
        self.finish_node();
    }

    pub(crate) fn parse_statement(&mut self) {
        if !self.enter_recursion() {
            self.bump_remaining_as_error();
            return;
        }

        match self.current() {
            SyntaxKind::BraceOpen => self.parse_block(),
            SyntaxKind::Semicolon => {
                self.start_node(SyntaxKind::EmptyStmt);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::KwIf => self.parse_if(),
            SyntaxKind::KwWhile => self.parse_while(),
            SyntaxKind::KwFor => self.parse_for(),
            SyntaxKind::KwForeach => self.parse_foreach(),
            SyntaxKind::KwReturn => self.parse_return(),
            SyntaxKind::KwThrow => self.parse_throw(),
            SyntaxKind::KwBreak => self.parse_jump(SyntaxKind::BreakStmt),
            SyntaxKind::KwContinue => self.parse_jump(SyntaxKind::ContinueStmt),
            _ if self.looks_like_local_decl() => {
                self.parse_local_decl();
                self.expect_statement_end();
            }
            SyntaxKind::KwVar => {
                // `var` not followed by a name
                self.parse_local_decl();
                self.expect_statement_end();
            }
            kind if EXPR_FIRST.contains(kind) => {
                self.start_node(SyntaxKind::ExprStmt);
                self.parse_expr();
                self.expect_statement_end();
                self.finish_node();
            }
            _ => self.error_and_bump_unexpected(),
        }

        self.exit_recursion();
    }

    /// Expects `;`, skipping to a statement boundary on failure.
    fn expect_statement_end(&mut self) {
        if self.expect(SyntaxKind::Semicolon, "`;`") {
            return;
        }
        self.recover_until(STMT_RECOVERY);
        self.eat_token(SyntaxKind::Semicolon);
    }

    /// `var x = e` | `Type x` | `Type x = e` (without the trailing `;`)
    pub(super) fn parse_local_decl(&mut self) {
        self.start_node(SyntaxKind::LocalDecl);
        if !self.eat_token(SyntaxKind::KwVar) {
            self.parse_type();
        }
        self.expect(SyntaxKind::Ident, "identifier");
        if self.eat_token(SyntaxKind::Eq) {
            self.parse_expr_or_error();
        }
        self.finish_node();
    }

    fn parse_if(&mut self) {
        self.start_node(SyntaxKind::IfStmt);
        self.bump();
        self.parse_condition();
        self.parse_embedded_statement();
        if self.currently_is(SyntaxKind::KwElse) {
            self.start_node(SyntaxKind::ElseClause);
            self.bump();
            self.parse_embedded_statement();
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_while(&mut self) {
        self.start_node(SyntaxKind::WhileStmt);
        self.bump();
        self.parse_condition();
        self.parse_embedded_statement();
        self.finish_node();
    }

    /// `( expr )`
    fn parse_condition(&mut self) {
        self.expect(SyntaxKind::ParenOpen, "`(`");
        self.parse_expr_or_error();
        self.expect(SyntaxKind::ParenClose, "`)`");
    }

    fn parse_embedded_statement(&mut self) {
        if self.at_eof() || self.currently_is(SyntaxKind::BraceClose) {
            self.error_msg(DiagnosticKind::ExpectedToken, "statement");
            return;
        }
        self.parse_statement();
    }

    /// `for (init; cond; update) stmt`
    fn parse_for(&mut self) {
        self.start_node(SyntaxKind::ForStmt);
        self.bump();
        self.expect(SyntaxKind::ParenOpen, "`(`");

        self.start_node(SyntaxKind::ForInit);
        if !self.currently_is(SyntaxKind::Semicolon) {
            if self.looks_like_local_decl() {
                self.parse_local_decl();
            } else {
                self.parse_expr_list(SyntaxKind::Semicolon);
            }
        }
        self.finish_node();
        self.expect(SyntaxKind::Semicolon, "`;`");

        self.start_node(SyntaxKind::ForCond);
        if !self.currently_is(SyntaxKind::Semicolon) {
            self.parse_expr_or_error();
        }
        self.finish_node();
        self.expect(SyntaxKind::Semicolon, "`;`");

        self.start_node(SyntaxKind::ForUpdate);
        if !self.currently_is(SyntaxKind::ParenClose) {
            self.parse_expr_list(SyntaxKind::ParenClose);
        }
        self.finish_node();
        self.expect(SyntaxKind::ParenClose, "`)`");

        self.parse_embedded_statement();
        self.finish_node();
    }

    fn parse_expr_list(&mut self, terminator: SyntaxKind) {
        loop {
            self.parse_expr_or_error();
            if self.currently_is(terminator) || !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
    }

    /// `foreach (var x in e) stmt`
    fn parse_foreach(&mut self) {
        self.start_node(SyntaxKind::ForeachStmt);
        self.bump();
        self.expect(SyntaxKind::ParenOpen, "`(`");
        if !self.eat_token(SyntaxKind::KwVar) {
            self.parse_type();
        }
        self.expect(SyntaxKind::Ident, "identifier");
        self.expect(SyntaxKind::KwIn, "`in`");
        self.parse_expr_or_error();
        self.expect(SyntaxKind::ParenClose, "`)`");
        self.parse_embedded_statement();
        self.finish_node();
    }

    fn parse_return(&mut self) {
        self.start_node(SyntaxKind::ReturnStmt);
        self.bump();
        if !self.currently_is(SyntaxKind::Semicolon) {
            self.parse_expr_or_error();
        }
        self.expect_statement_end();
        self.finish_node();
    }

    fn parse_throw(&mut self) {
        self.start_node(SyntaxKind::ThrowStmt);
        self.bump();
        self.parse_expr_or_error();
        self.expect_statement_end();
        self.finish_node();
    }

    /// `break;` | `continue;`
    fn parse_jump(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.expect_statement_end();
        self.finish_node();
    }
}
