//! Runtime errors for VM execution.
//!
//! Messages mirror what the corresponding .NET exception would report, so a
//! snippet fails with the text its author expects.

use snip_bytecode::ModuleError;

use super::value::ExceptionValue;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Exception raised by a `throw` statement. Carries the message verbatim.
    #[error("{}", .0.message)]
    Thrown(ExceptionValue),

    #[error("Attempted to divide by zero.")]
    DivideByZero,

    #[error("Arithmetic operation resulted in an overflow.")]
    Overflow,

    #[error("Object reference not set to an instance of an object.")]
    NullReference,

    #[error("Index was outside the bounds of the array.")]
    IndexOutOfRange,

    #[error(
        "Index was out of range. Must be non-negative and less than the size of the collection. (Parameter '{0}')"
    )]
    CollectionIndex(&'static str),

    #[error("Specified argument was out of the range of valid values. (Parameter '{0}')")]
    ArgumentOutOfRange(&'static str),

    #[error("Value cannot be null. (Parameter '{0}')")]
    ArgumentNull(&'static str),

    #[error("Value was either too large or too small for an {0}.")]
    ConversionOverflow(&'static str),

    /// Argument validation failure with a complete message.
    #[error("{0}")]
    Argument(String),

    #[error("The given key '{0}' was not present in the dictionary.")]
    KeyNotFound(String),

    #[error("An item with the same key has already been added. Key: {0}")]
    DuplicateKey(String),

    #[error("Sequence contains no elements")]
    EmptySequence,

    #[error("Sequence contains no matching element")]
    NoMatch,

    #[error("Input string was not in a correct format.")]
    Format,

    #[error("Index (zero based) must be greater than or equal to zero and less than the size of the argument list.")]
    FormatIndex,

    #[error("Failed to compare two elements in the array.")]
    InvalidComparison,

    #[error("Unable to cast object of type '{from}' to type '{to}'.")]
    InvalidCast { from: String, to: &'static str },

    #[error("Cannot implicitly convert type '{from}' to '{to}'")]
    ImplicitConversion { from: String, to: &'static str },

    #[error("Operator '{op}' cannot be applied to operands of type '{lhs}' and '{rhs}'")]
    BinaryOperator {
        op: &'static str,
        lhs: String,
        rhs: String,
    },

    #[error("Operator '{op}' cannot be applied to operand of type '{operand}'")]
    UnaryOperator { op: &'static str, operand: String },

    #[error("'{type_name}' does not contain a definition for '{member}'")]
    UnknownMember { type_name: String, member: String },

    #[error("No overload for method '{method}' takes {argc} arguments")]
    WrongArgumentCount { method: String, argc: usize },

    #[error("Cannot invoke a non-delegate value of type '{0}'")]
    NotCallable(String),

    #[error("Delegate 'Func' does not take {0} arguments")]
    LambdaArity(usize),

    #[error("foreach statement cannot operate on variables of type '{0}'")]
    NotEnumerable(String),

    #[error("Cannot apply indexing with [] to an expression of type '{0}'")]
    NotIndexable(String),

    #[error("Property or indexer '{0}.this[int]' cannot be assigned to -- it is read only")]
    ReadOnlyIndexer(String),

    #[error("The type caught or thrown must be derived from System.Exception")]
    NotAnException,

    #[error("execution limit exceeded ({0} steps)")]
    ExecFuelExhausted(u64),

    #[error("runtime recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("collection size limit exceeded")]
    CollectionLimitExceeded,

    #[error("the result contains a reference cycle")]
    CyclicValue,

    #[error("the result is nested too deeply")]
    NestingTooDeep,

    #[error("invalid program: {0}")]
    InvalidProgram(&'static str),

    #[error("failed to load compiled unit")]
    Module(#[from] ModuleError),

    #[error("internal error: {0}")]
    Panic(String),
}

impl RuntimeError {
    pub(crate) fn type_mismatch(op: &'static str, lhs: &str, rhs: &str) -> Self {
        Self::BinaryOperator {
            op,
            lhs: lhs.to_owned(),
            rhs: rhs.to_owned(),
        }
    }

    pub(crate) fn unknown_member(type_name: &str, member: &str) -> Self {
        Self::UnknownMember {
            type_name: type_name.to_owned(),
            member: member.to_owned(),
        }
    }

    pub(crate) fn argument_count(method: &str, argc: usize) -> Self {
        Self::WrongArgumentCount {
            method: method.to_owned(),
            argc,
        }
    }

    pub(crate) fn not_bool(from: &str) -> Self {
        Self::ImplicitConversion {
            from: from.to_owned(),
            to: "bool",
        }
    }
}
