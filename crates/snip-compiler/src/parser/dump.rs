//! Indented CST dump without trivia, for tests and debug logs.

use std::fmt::Write;

use super::cst::{SyntaxElement, SyntaxNode};

/// One node per line, two spaces per level; tokens print their text.
pub fn dump_cst(node: &SyntaxNode) -> String {
    let mut out = String::new();
    dump_node(node, 0, &mut out);
    out
}

fn dump_node(node: &SyntaxNode, depth: usize, out: &mut String) {
    let _ = writeln!(out, "{:indent$}{:?}", "", node.kind(), indent = depth * 2);
    for child in node.children_with_tokens() {
        match child {
            SyntaxElement::Node(n) => dump_node(&n, depth + 1, out),
            SyntaxElement::Token(t) if !t.kind().is_trivia() => {
                let _ = writeln!(
                    out,
                    "{:indent$}{:?} {:?}",
                    "",
                    t.kind(),
                    t.text(),
                    indent = (depth + 1) * 2
                );
            }
            SyntaxElement::Token(_) => {}
        }
    }
}
