use super::cst::SyntaxKind;
use super::lexer::{lex, token_text};

/// Non-trivia tokens as `(kind, text)` pairs.
fn significant(source: &str) -> Vec<(SyntaxKind, &str)> {
    lex(source)
        .iter()
        .filter(|t| !t.kind.is_trivia())
        .map(|t| (t.kind, token_text(source, t)))
        .collect()
}

fn kinds(source: &str) -> Vec<SyntaxKind> {
    lex(source).iter().map(|t| t.kind).collect()
}

#[test]
fn keywords_take_precedence_over_identifiers() {
    use SyntaxKind::*;

    assert_eq!(
        significant("var variable int integer foreach for_each"),
        [
            (KwVar, "var"),
            (Ident, "variable"),
            (KwInt, "int"),
            (Ident, "integer"),
            (KwForeach, "foreach"),
            (Ident, "for_each"),
        ]
    );
}

#[test]
fn numeric_literals() {
    use SyntaxKind::*;

    assert_eq!(
        significant("42 0x1F 10L 3.14 1e5 2.5f 7d"),
        [
            (IntLiteral, "42"),
            (IntLiteral, "0x1F"),
            (IntLiteral, "10L"),
            (RealLiteral, "3.14"),
            (RealLiteral, "1e5"),
            (RealLiteral, "2.5f"),
            (RealLiteral, "7d"),
        ]
    );
}

#[test]
fn string_and_char_literals() {
    use SyntaxKind::*;

    assert_eq!(
        significant(r#""a\"b" @"c""d" 'x' '\n'"#),
        [
            (StringLiteral, r#""a\"b""#),
            (VerbatimString, r#"@"c""d""#),
            (CharLiteral, "'x'"),
            (CharLiteral, r"'\n'"),
        ]
    );
}

#[test]
fn unterminated_string_stops_at_line_end() {
    use SyntaxKind::*;

    assert_eq!(
        significant("\"abc\nx"),
        [(UnterminatedString, "\"abc"), (Ident, "x")]
    );
}

#[test]
fn multi_character_operators() {
    use SyntaxKind::*;

    assert_eq!(
        significant("a ?? b => c && d || !e <= f != g += 1 ++ --"),
        [
            (Ident, "a"),
            (QuestionQuestion, "??"),
            (Ident, "b"),
            (FatArrow, "=>"),
            (Ident, "c"),
            (AmpAmp, "&&"),
            (Ident, "d"),
            (PipePipe, "||"),
            (Bang, "!"),
            (Ident, "e"),
            (LtEq, "<="),
            (Ident, "f"),
            (NotEq, "!="),
            (Ident, "g"),
            (PlusEq, "+="),
            (IntLiteral, "1"),
            (PlusPlus, "++"),
            (MinusMinus, "--"),
        ]
    );
}

#[test]
fn trivia_is_preserved() {
    use SyntaxKind::*;

    assert_eq!(
        kinds("// hi\n/* block */x\r\ny"),
        [LineComment, Newline, BlockComment, Ident, Newline, Ident]
    );
}

#[test]
fn unknown_characters_coalesce_into_garbage() {
    use SyntaxKind::*;

    let source = "a $$ b";
    let tokens = lex(source);

    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        [Ident, Whitespace, Garbage, Whitespace, Ident]
    );
    assert_eq!(token_text(source, &tokens[2]), "$$");
}

#[test]
fn trailing_garbage_reaches_end_of_input() {
    let source = "x ##";
    let tokens = lex(source);

    let last = tokens.last().unwrap();
    assert_eq!(last.kind, SyntaxKind::Garbage);
    assert_eq!(token_text(source, last), "##");
}
