//! Expression productions.
//!
//! Precedence climbing over a checkpoint: the left operand is parsed first,
//! then retroactively wrapped once an operator shows up.

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::{ARG_RECOVERY, EXPR_FIRST, LITERALS};

/// Binding power of binary operators; higher binds tighter.
fn infix_binding_power(kind: SyntaxKind) -> Option<u8> {
    Some(match kind {
        SyntaxKind::PipePipe => 1,
        SyntaxKind::AmpAmp => 2,
        SyntaxKind::EqEq | SyntaxKind::NotEq => 3,
        SyntaxKind::Lt | SyntaxKind::LtEq | SyntaxKind::Gt | SyntaxKind::GtEq => 4,
        SyntaxKind::Plus | SyntaxKind::Minus => 5,
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => 6,
        _ => return None,
    })
}

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) {
        if !self.enter_recursion() {
            self.bump_remaining_as_error();
            return;
        }
        self.parse_assignment();
        self.exit_recursion();
    }

    pub(super) fn parse_expr_or_error(&mut self) {
        if self.currently_is_one_of(EXPR_FIRST) {
            self.parse_expr();
        } else {
            self.error(DiagnosticKind::ExpectedExpression);
        }
    }

    /// `target = value`, right-associative.
    fn parse_assignment(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_conditional();
        if self.current().is_assign_op() {
            self.start_node_at(checkpoint, SyntaxKind::AssignExpr);
            self.bump();
            self.parse_expr_or_error();
            self.finish_node();
        }
    }

    /// `cond ? a : b`
    fn parse_conditional(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_coalesce();
        if self.currently_is(SyntaxKind::Question) {
            self.start_node_at(checkpoint, SyntaxKind::ConditionalExpr);
            self.bump();
            self.parse_expr_or_error();
            self.expect(SyntaxKind::Colon, "`:`");
            self.parse_expr_or_error();
            self.finish_node();
        }
    }

    /// `a ?? b`, right-associative.
    fn parse_coalesce(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_binary(0);
        if self.currently_is(SyntaxKind::QuestionQuestion) {
            self.start_node_at(checkpoint, SyntaxKind::BinaryExpr);
            self.bump();
            if self.enter_recursion() {
                self.parse_coalesce();
                self.exit_recursion();
            }
            self.finish_node();
        }
    }

    fn parse_binary(&mut self, min_bp: u8) {
        let checkpoint = self.checkpoint();
        self.parse_unary();
        let mut wraps = 0;
        loop {
            let Some(bp) = infix_binding_power(self.current()) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            if !self.wrap_at(checkpoint, SyntaxKind::BinaryExpr) {
                self.bump_remaining_as_error();
                break;
            }
            wraps += 1;
            self.bump();
            self.parse_binary(bp + 1);
            self.finish_node();
        }
        self.unwrap_levels(wraps);
    }

    fn parse_unary(&mut self) {
        if !self.enter_recursion() {
            self.bump_remaining_as_error();
            return;
        }

        match self.current() {
            SyntaxKind::Bang
            | SyntaxKind::Minus
            | SyntaxKind::Plus
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus => {
                self.start_node(SyntaxKind::PrefixExpr);
                self.bump();
                self.parse_unary();
                self.finish_node();
            }
            SyntaxKind::ParenOpen if self.is_cast() => {
                self.start_node(SyntaxKind::CastExpr);
                self.bump();
                self.parse_type();
                self.expect(SyntaxKind::ParenClose, "`)`");
                self.parse_unary();
                self.finish_node();
            }
            _ => self.parse_postfix(),
        }

        self.exit_recursion();
    }

    /// `(int) x`: casts are limited to type keywords.
    fn is_cast(&mut self) -> bool {
        self.peek_nth(1).is_type_keyword() && self.peek_nth(2) == SyntaxKind::ParenClose
    }

    fn parse_postfix(&mut self) {
        let checkpoint = self.checkpoint();
        if !self.parse_primary() {
            return;
        }

        let mut wraps = 0;
        loop {
            let kind = match self.current() {
                SyntaxKind::ParenOpen => SyntaxKind::CallExpr,
                SyntaxKind::Dot => SyntaxKind::MemberExpr,
                SyntaxKind::BracketOpen => SyntaxKind::IndexExpr,
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => SyntaxKind::PostfixExpr,
                _ => break,
            };
            if !self.wrap_at(checkpoint, kind) {
                self.bump_remaining_as_error();
                break;
            }
            wraps += 1;
            match kind {
                SyntaxKind::CallExpr => self.parse_arg_list(),
                SyntaxKind::MemberExpr => {
                    self.bump();
                    self.expect(SyntaxKind::Ident, "identifier");
                }
                SyntaxKind::IndexExpr => {
                    self.bump();
                    self.parse_expr_or_error();
                    self.expect(SyntaxKind::BracketClose, "`]`");
                }
                _ => self.bump(),
            }
            self.finish_node();
        }
        self.unwrap_levels(wraps);
    }

    /// `( args )`
    fn parse_arg_list(&mut self) {
        self.assert_current(SyntaxKind::ParenOpen);
        self.start_node(SyntaxKind::ArgList);
        self.bump();
        if !self.currently_is(SyntaxKind::ParenClose) {
            loop {
                if !self.currently_is_one_of(EXPR_FIRST) {
                    self.error(DiagnosticKind::ExpectedExpression);
                    self.recover_until(ARG_RECOVERY);
                    break;
                }
                self.parse_expr();
                if !self.eat_token(SyntaxKind::Comma) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::ParenClose, "`)`");
        self.finish_node();
    }

    /// Returns false when no primary expression could be parsed.
    fn parse_primary(&mut self) -> bool {
        let current = self.current();
        match current {
            kind if LITERALS.contains(kind) => {
                if kind == SyntaxKind::UnterminatedString {
                    self.error(DiagnosticKind::UnterminatedString);
                }
                self.start_node(SyntaxKind::Literal);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::Ident if self.next_is(SyntaxKind::FatArrow) => self.parse_lambda(),
            SyntaxKind::Ident => {
                self.start_node(SyntaxKind::NameRef);
                self.bump();
                self.finish_node();
            }
            kind if kind.is_type_keyword() => {
                self.start_node(SyntaxKind::NameRef);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::ParenOpen if self.is_lambda_params() => self.parse_lambda(),
            SyntaxKind::ParenOpen => {
                self.start_node(SyntaxKind::ParenExpr);
                self.bump();
                self.parse_expr_or_error();
                self.expect(SyntaxKind::ParenClose, "`)`");
                self.finish_node();
            }
            SyntaxKind::KwNew => self.parse_new(),
            SyntaxKind::Garbage => {
                self.error_and_bump_unexpected();
                return false;
            }
            _ => {
                self.error(DiagnosticKind::ExpectedExpression);
                return false;
            }
        }
        true
    }

    /// `(a, b) =>` lookahead.
    fn is_lambda_params(&mut self) -> bool {
        let mut i = 1;
        if self.peek_nth(i) == SyntaxKind::ParenClose {
            return self.peek_nth(i + 1) == SyntaxKind::FatArrow;
        }
        loop {
            if self.peek_nth(i) != SyntaxKind::Ident {
                return false;
            }
            match self.peek_nth(i + 1) {
                SyntaxKind::Comma => i += 2,
                SyntaxKind::ParenClose => return self.peek_nth(i + 2) == SyntaxKind::FatArrow,
                _ => return false,
            }
        }
    }

    /// `x => body` | `(a, b) => body`
    fn parse_lambda(&mut self) {
        self.start_node(SyntaxKind::LambdaExpr);
        self.start_node(SyntaxKind::ParamList);
        if self.eat_token(SyntaxKind::ParenOpen) {
            while self.eat_token(SyntaxKind::Ident) {
                if !self.eat_token(SyntaxKind::Comma) {
                    break;
                }
            }
            self.expect(SyntaxKind::ParenClose, "`)`");
        } else {
            self.bump();
        }
        self.finish_node();
        self.expect(SyntaxKind::FatArrow, "`=>`");

        if self.currently_is(SyntaxKind::BraceOpen) {
            self.error_msg(DiagnosticKind::Unsupported, "a statement-bodied lambda");
            self.parse_block();
        } else {
            self.parse_expr_or_error();
        }
        self.finish_node();
    }

    /// `new T(args) { init }` | `new T[n]` | `new T[] { init }` | `new[] { init }`
    fn parse_new(&mut self) {
        self.assert_current(SyntaxKind::KwNew);
        let checkpoint = self.checkpoint();
        self.bump();

        if self.currently_is(SyntaxKind::BracketOpen) {
            self.start_node_at(checkpoint, SyntaxKind::ArrayNewExpr);
            self.bump();
            self.expect(SyntaxKind::BracketClose, "`]`");
            if self.currently_is(SyntaxKind::BraceOpen) {
                self.parse_initializer();
            } else {
                self.error_msg(DiagnosticKind::ExpectedToken, "`{`");
            }
            self.finish_node();
            return;
        }

        self.start_node_at(checkpoint, SyntaxKind::NewExpr);
        self.parse_type();

        let mut has_tail = false;
        if self.currently_is(SyntaxKind::BracketOpen) {
            self.start_node(SyntaxKind::ArraySize);
            self.bump();
            self.parse_expr_or_error();
            self.expect(SyntaxKind::BracketClose, "`]`");
            self.finish_node();
            has_tail = true;
        }
        if !has_tail && self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_arg_list();
            has_tail = true;
        }
        if self.currently_is(SyntaxKind::BraceOpen) {
            self.parse_initializer();
            has_tail = true;
        }
        if !has_tail {
            self.error_msg(DiagnosticKind::ExpectedToken, "`(`");
        }
        self.finish_node();
    }

    /// `{ a, b }` | `{ {k, v}, ... }`
    fn parse_initializer(&mut self) {
        self.assert_current(SyntaxKind::BraceOpen);
        self.start_node(SyntaxKind::Initializer);
        self.bump();
        while !self.currently_is(SyntaxKind::BraceClose) && !self.at_eof() {
            if self.currently_is(SyntaxKind::BraceOpen) {
                self.start_node(SyntaxKind::InitElement);
                self.bump();
                loop {
                    self.parse_expr_or_error();
                    if !self.eat_token(SyntaxKind::Comma) {
                        break;
                    }
                }
                self.expect(SyntaxKind::BraceClose, "`}`");
                self.finish_node();
            } else if self.currently_is_one_of(EXPR_FIRST) {
                self.parse_expr();
            } else {
                self.error(DiagnosticKind::ExpectedExpression);
                break;
            }
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::BraceClose, "`}`");
        self.finish_node();
    }
}
