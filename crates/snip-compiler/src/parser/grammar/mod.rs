//! Grammar productions: compilation unit, declarations and types.

mod expressions;
mod statements;

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;

impl Parser<'_> {
    /// `using* class`
    pub(crate) fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);

        while self.currently_is(SyntaxKind::KwUsing) {
            self.parse_using();
        }

        if !self.at_eof() {
            self.parse_class();
        }

        while !self.at_eof() && !self.has_fatal_error() {
            self.error_and_bump_unexpected();
        }

        self.skip_trivia_to_buffer();
        self.drain_trivia();
        self.finish_node();
    }

    pub(super) fn at_eof(&mut self) -> bool {
        self.skip_trivia_to_buffer();
        self.eof()
    }

    /// `using System.Collections.Generic;`
    fn parse_using(&mut self) {
        self.assert_current(SyntaxKind::KwUsing);
        self.start_node(SyntaxKind::UsingDecl);
        self.bump();
        if self.currently_is(SyntaxKind::Ident) {
            self.parse_qualified_name();
        } else {
            self.error_msg(DiagnosticKind::ExpectedToken, "namespace name");
        }
        self.expect(SyntaxKind::Semicolon, "`;`");
        self.finish_node();
    }

    fn parse_qualified_name(&mut self) {
        self.start_node(SyntaxKind::QualifiedName);
        self.bump();
        while self.currently_is(SyntaxKind::Dot) && self.next_is(SyntaxKind::Ident) {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    /// `public class Name { method }`
    fn parse_class(&mut self) {
        self.start_node(SyntaxKind::ClassDecl);
        self.eat_modifiers();
        self.expect(SyntaxKind::KwClass, "`class`");
        self.expect(SyntaxKind::Ident, "class name");
        if self.expect(SyntaxKind::BraceOpen, "`{`") {
            if !self.currently_is(SyntaxKind::BraceClose) && !self.at_eof() {
                self.parse_method();
            }
            self.expect(SyntaxKind::BraceClose, "`}`");
        }
        self.finish_node();
    }

    /// `public object Name() { ... }`
    fn parse_method(&mut self) {
        self.start_node(SyntaxKind::MethodDecl);
        self.eat_modifiers();
        if self.currently_is(SyntaxKind::KwVoid) {
            self.start_node(SyntaxKind::TypeRef);
            self.bump();
            self.finish_node();
        } else {
            self.parse_type();
        }
        self.expect(SyntaxKind::Ident, "method name");
        self.expect(SyntaxKind::ParenOpen, "`(`");
        self.expect(SyntaxKind::ParenClose, "`)`");
        if self.currently_is(SyntaxKind::BraceOpen) {
            self.parse_block();
        } else {
            self.error_msg(DiagnosticKind::ExpectedToken, "`{`");
        }
        self.finish_node();
    }

    fn eat_modifiers(&mut self) {
        while self.eat_token(SyntaxKind::KwPublic) || self.eat_token(SyntaxKind::KwStatic) {}
    }

    /// `int` | `List<int>` | `System.Exception` | `string[]`
    pub(super) fn parse_type(&mut self) {
        let current = self.current();
        if !current.is_type_keyword() && current != SyntaxKind::Ident {
            self.error_msg(DiagnosticKind::ExpectedToken, "type");
            return;
        }

        self.start_node(SyntaxKind::TypeRef);
        self.bump();
        if current == SyntaxKind::Ident {
            while self.currently_is(SyntaxKind::Dot) && self.next_is(SyntaxKind::Ident) {
                self.bump();
                self.bump();
            }
            if self.currently_is(SyntaxKind::Lt) {
                self.parse_type_args();
            }
        }
        while self.currently_is(SyntaxKind::BracketOpen) && self.next_is(SyntaxKind::BracketClose) {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    fn parse_type_args(&mut self) {
        self.start_node(SyntaxKind::TypeArgs);
        self.bump();
        loop {
            self.parse_type();
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::Gt, "`>`");
        self.finish_node();
    }

    /// Lookahead: does a local declaration (`Type name =`/`;`/`in`) start here?
    pub(super) fn looks_like_local_decl(&mut self) -> bool {
        let first = self.peek_nth(0);
        if first == SyntaxKind::KwVar {
            return self.peek_nth(1) == SyntaxKind::Ident;
        }

        let mut i = 1;
        if first == SyntaxKind::Ident {
            while self.peek_nth(i) == SyntaxKind::Dot && self.peek_nth(i + 1) == SyntaxKind::Ident {
                i += 2;
            }
            if self.peek_nth(i) == SyntaxKind::Lt {
                let Some(end) = self.skip_type_args(i) else {
                    return false;
                };
                i = end;
            }
        } else if !first.is_type_keyword() {
            return false;
        }

        while self.peek_nth(i) == SyntaxKind::BracketOpen
            && self.peek_nth(i + 1) == SyntaxKind::BracketClose
        {
            i += 2;
        }

        self.peek_nth(i) == SyntaxKind::Ident
            && matches!(
                self.peek_nth(i + 1),
                SyntaxKind::Eq | SyntaxKind::Semicolon | SyntaxKind::KwIn
            )
    }

    /// Skips a balanced `<...>` starting at lookahead `start`; returns the index after it.
    fn skip_type_args(&mut self, start: usize) -> Option<usize> {
        let mut depth = 0u32;
        let mut i = start;
        loop {
            match self.peek_nth(i) {
                SyntaxKind::Lt => depth += 1,
                SyntaxKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                SyntaxKind::Ident
                | SyntaxKind::Comma
                | SyntaxKind::Dot
                | SyntaxKind::BracketOpen
                | SyntaxKind::BracketClose => {}
                kind if kind.is_type_keyword() => {}
                _ => return None,
            }
            i += 1;
        }
    }
}
