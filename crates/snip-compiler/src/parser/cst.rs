//! Syntax kinds for the snippet language.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! Logos derives token recognition; node kinds lack token/regex attributes.
//! `SnipLang` implements Rowan's `Language` trait for tree construction.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("??")]
    QuestionQuestion,
    #[token(":")]
    Colon,
    #[token("=>")]
    FatArrow,

    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    /// Decimal or hex integer, optional `L`/`U` suffixes.
    #[regex(r"[0-9][0-9_]*[lLuU]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+[lLuU]*")]
    IntLiteral,

    /// Real number: fraction, exponent or a `f`/`d`/`m` suffix.
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdDmM]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fFdDmM]?")]
    #[regex(r"[0-9][0-9_]*[fFdDmM]")]
    RealLiteral,

    #[regex(r#""(?:[^"\\\r\n]|\\.)*""#)]
    StringLiteral,

    #[regex(r#"@"(?:[^"]|"")*""#)]
    VerbatimString,

    /// A regular string cut off by end of line or input.
    #[regex(r#""(?:[^"\\\r\n]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"'(?:[^'\\\r\n]|\\.)*'")]
    CharLiteral,

    // Keywords
    #[token("using")]
    KwUsing,
    #[token("public")]
    KwPublic,
    #[token("static")]
    KwStatic,
    #[token("class")]
    KwClass,
    #[token("var")]
    KwVar,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("while")]
    KwWhile,
    #[token("for")]
    KwFor,
    #[token("foreach")]
    KwForeach,
    #[token("in")]
    KwIn,
    #[token("return")]
    KwReturn,
    #[token("throw")]
    KwThrow,
    #[token("break")]
    KwBreak,
    #[token("continue")]
    KwContinue,
    #[token("new")]
    KwNew,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,
    #[token("null")]
    KwNull,

    // Type keywords
    #[token("int")]
    KwInt,
    #[token("long")]
    KwLong,
    #[token("double")]
    KwDouble,
    #[token("float")]
    KwFloat,
    #[token("decimal")]
    KwDecimal,
    #[token("bool")]
    KwBool,
    #[token("string")]
    KwString,
    #[token("char")]
    KwChar,
    #[token("object")]
    KwObject,
    #[token("void")]
    KwVoid,

    /// Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[ \t\f]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    #[token("\r")]
    Newline,

    #[regex(r"//[^\r\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*+[^*/])*\*+/")]
    BlockComment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    UsingDecl,
    QualifiedName,
    ClassDecl,
    MethodDecl,
    TypeRef,
    TypeArgs,

    Block,
    LocalDecl,
    IfStmt,
    ElseClause,
    WhileStmt,
    ForStmt,
    ForInit,
    ForCond,
    ForUpdate,
    ForeachStmt,
    ReturnStmt,
    ThrowStmt,
    BreakStmt,
    ContinueStmt,
    ExprStmt,
    EmptyStmt,

    Literal,
    NameRef,
    ParenExpr,
    AssignExpr,
    ConditionalExpr,
    BinaryExpr,
    PrefixExpr,
    PostfixExpr,
    CastExpr,
    CallExpr,
    ArgList,
    MemberExpr,
    IndexExpr,
    LambdaExpr,
    ParamList,
    NewExpr,
    ArraySize,
    ArrayNewExpr,
    Initializer,
    InitElement,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment | BlockComment)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage)
    }

    /// Built-in type keywords (`int`, `string`, ...), excluding `void`.
    #[inline]
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            KwInt | KwLong | KwDouble | KwFloat | KwDecimal | KwBool | KwString | KwChar | KwObject
        )
    }

    #[inline]
    pub fn is_assign_op(self) -> bool {
        matches!(self, Eq | PlusEq | MinusEq | StarEq | SlashEq | PercentEq)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SnipLang {}

impl Language for SnipLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<SnipLang>;
pub type SyntaxToken = rowan::SyntaxToken<SnipLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 128-bit bitset of token `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Creates an empty token set.
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 128.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1u128 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 128 {
            return false;
        }
        self.0 & (1u128 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..128u16 {
            if self.0 & (1u128 << i) != 0 && i < __LAST as u16 {
                // SAFETY: bounds checked against __LAST, SyntaxKind is repr(u16)
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    pub const TYPE_KEYWORDS: TokenSet = TokenSet::new(&[
        KwInt, KwLong, KwDouble, KwFloat, KwDecimal, KwBool, KwString, KwChar, KwObject,
    ]);

    pub const LITERALS: TokenSet = TokenSet::new(&[
        IntLiteral,
        RealLiteral,
        StringLiteral,
        VerbatimString,
        UnterminatedString,
        CharLiteral,
        KwTrue,
        KwFalse,
        KwNull,
    ]);

    /// FIRST set of expressions.
    pub const EXPR_FIRST: TokenSet = LITERALS.union(TYPE_KEYWORDS).union(TokenSet::new(&[
        Ident, ParenOpen, KwNew, Bang, Minus, Plus, PlusPlus, MinusMinus,
    ]));

    pub const ASSIGN_OPS: TokenSet =
        TokenSet::new(&[Eq, PlusEq, MinusEq, StarEq, SlashEq, PercentEq]);

    /// Statement keywords where recovery can resume.
    pub const STMT_RECOVERY: TokenSet = TokenSet::new(&[
        Semicolon, BraceOpen, BraceClose, KwIf, KwWhile, KwFor, KwForeach, KwReturn, KwThrow,
        KwBreak, KwContinue, KwVar,
    ]);

    pub const ARG_RECOVERY: TokenSet = TokenSet::new(&[ParenClose, Semicolon, BraceClose]);
}
