use rowan::TextRange;

/// Diagnostic kinds, syntax first, then semantics, then warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Lexical and syntax errors
    UnexpectedToken,
    ExpectedToken,
    ExpectedExpression,
    UnterminatedString,
    InvalidEscape,
    InvalidCharLiteral,
    InvalidNumber,

    // Valid syntax, invalid semantics
    UnknownNamespace,
    UndefinedName,
    DuplicateLocal,
    NoEnclosingLoop,
    UnknownMember,
    WrongArgumentCount,
    UnknownType,
    ImplicitlyTypedWithoutInit,
    InvalidAssignmentTarget,
    InvalidIncrementTarget,
    InvalidStatement,
    TypeUsedAsValue,
    MissingReturnValue,
    NotAllPathsReturn,
    Unsupported,

    // Warnings
    UnreachableCode,
    UnusedAssigned,
    UnusedDeclared,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnreachableCode | Self::UnusedAssigned | Self::UnusedDeclared => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    pub fn is_syntax(&self) -> bool {
        *self <= Self::InvalidNumber
    }

    /// Base message for this kind, used when no detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected token",
            Self::ExpectedToken => "expected token",
            Self::ExpectedExpression => "expected expression",
            Self::UnterminatedString => "unterminated string literal",
            Self::InvalidEscape => "unrecognized escape sequence",
            Self::InvalidCharLiteral => "too many characters in character literal",
            Self::InvalidNumber => "invalid numeric literal",

            Self::UnknownNamespace => "the type or namespace name could not be found",
            Self::UndefinedName => "the name does not exist in the current context",
            Self::DuplicateLocal => "a local variable is already defined in this scope",
            Self::NoEnclosingLoop => "no enclosing loop out of which to break or continue",
            Self::UnknownMember => "the type does not contain this definition",
            Self::WrongArgumentCount => "no overload takes this many arguments",
            Self::UnknownType => "the type name could not be found",
            Self::ImplicitlyTypedWithoutInit => "implicitly-typed variables must be initialized",
            Self::InvalidAssignmentTarget => {
                "the left-hand side of an assignment must be a variable or indexer"
            }
            Self::InvalidIncrementTarget => {
                "the operand of an increment or decrement operator must be a variable or indexer"
            }
            Self::InvalidStatement => {
                "only assignment, call, increment, decrement and new object expressions can be used as a statement"
            }
            Self::TypeUsedAsValue => "a type is not valid in the given context",
            Self::MissingReturnValue => {
                "an object of a type convertible to 'object' is required"
            }
            Self::NotAllPathsReturn => "not all code paths return a value",
            Self::Unsupported => "construct is not supported",

            Self::UnreachableCode => "unreachable code detected",
            Self::UnusedAssigned => "the variable is assigned but its value is never used",
            Self::UnusedDeclared => "the variable is declared but never used",
        }
    }

    /// Template for custom messages. `{}` is replaced by the caller's detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::ExpectedToken => "expected {}".to_string(),
            Self::UnexpectedToken => "unexpected token {}".to_string(),
            Self::UnknownNamespace => {
                "the type or namespace name '{}' could not be found".to_string()
            }
            Self::UndefinedName => {
                "the name '{}' does not exist in the current context".to_string()
            }
            Self::DuplicateLocal => {
                "a local variable named '{}' is already defined in this scope".to_string()
            }
            Self::UnknownType => "the type name '{}' could not be found".to_string(),
            Self::TypeUsedAsValue => {
                "'{}' is a type, which is not valid in the given context".to_string()
            }
            Self::Unsupported => "{} is not supported".to_string(),
            Self::UnusedAssigned => {
                "the variable '{}' is assigned but its value is never used".to_string()
            }
            Self::UnusedDeclared => "the variable '{}' is declared but never used".to_string(),

            // Callers provide the full sentence
            Self::UnknownMember
            | Self::WrongArgumentCount
            | Self::InvalidCharLiteral
            | Self::InvalidNumber => "{}".to_string(),

            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Range in the synthesized compilation unit.
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.fallback_message().to_string(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )
    }
}
