//! Parser for the snippet language.
//!
//! # Architecture
//!
//! Produces a lossless concrete syntax tree (CST) via Rowan's green tree builder:
//!
//! - Zero-copy lexing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Checkpoint-based wrapping: binary operators and postfix chains wrap their left operand
//! - Explicit recovery sets: statements resynchronize on `;`, braces and statement keywords
//!
//! # Recovery Strategy
//!
//! The parser is resilient and always produces a tree:
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume
//! 3. On recursion limit, remaining input goes into a single Error node and
//!    parsing fails with [`Error::RecursionLimitExceeded`](crate::Error)

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod dump;
mod grammar;
mod invariants;

#[cfg(test)]
mod ast_tests;
#[cfg(test)]
mod lexer_tests;

pub use ast::{Expr, Root, Stmt};
pub use core::{ParseResult, Parser};
pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};
pub use dump::dump_cst;

use crate::Result;
use lexer::lex;

/// Nesting depth at which parsing gives up.
pub const RECURSION_LIMIT: u32 = 256;

/// Parses a compilation unit. Returns Err only when nesting is too deep.
pub fn parse(source: &str) -> Result<ParseResult> {
    Parser::new(source, lex(source))
        .with_recursion_fuel(Some(RECURSION_LIMIT))
        .parse()
}
