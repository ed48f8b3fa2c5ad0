//! Catalogue of static members and constructors available to snippets.
//!
//! The compiler resolves `Owner.Member(..)` and `new T(..)` against this
//! table; the VM dispatches on the same enums.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Import namespaces that make builtins visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    System,
    Collections,
    Linq,
}

impl Namespace {
    pub fn path(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Collections => "System.Collections.Generic",
            Self::Linq => "System.Linq",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Some(match path {
            "System" => Self::System,
            "System.Collections.Generic" => Self::Collections,
            "System.Linq" => Self::Linq,
            _ => return None,
        })
    }
}

macro_rules! builtins {
    ($($variant:ident => $ns:ident, $owner:literal, $member:literal, $min:literal ..= $max:literal;)*) => {
        /// Static method or property reachable as `Owner.Member`.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Builtin {
            $($variant,)*
        }

        impl Builtin {
            pub const ALL: &'static [Builtin] = &[$(Builtin::$variant,)*];

            pub fn namespace(self) -> Namespace {
                match self {
                    $(Self::$variant => Namespace::$ns,)*
                }
            }

            /// Canonical owner type name.
            pub fn owner(self) -> &'static str {
                match self {
                    $(Self::$variant => $owner,)*
                }
            }

            pub fn member(self) -> &'static str {
                match self {
                    $(Self::$variant => $member,)*
                }
            }

            /// Accepted argument counts. Properties accept exactly zero.
            pub fn arity(self) -> RangeInclusive<u8> {
                match self {
                    $(Self::$variant => $min..=$max,)*
                }
            }
        }
    };
}

builtins! {
    MathAbs => System, "Math", "Abs", 1..=1;
    MathMax => System, "Math", "Max", 2..=2;
    MathMin => System, "Math", "Min", 2..=2;
    MathPow => System, "Math", "Pow", 2..=2;
    MathSqrt => System, "Math", "Sqrt", 1..=1;
    MathFloor => System, "Math", "Floor", 1..=1;
    MathCeiling => System, "Math", "Ceiling", 1..=1;
    MathRound => System, "Math", "Round", 1..=2;
    MathPi => System, "Math", "PI", 0..=0;
    MathE => System, "Math", "E", 0..=0;
    ConsoleWriteLine => System, "Console", "WriteLine", 0..=16;
    ConsoleWrite => System, "Console", "Write", 1..=16;
    ConvertToInt32 => System, "Convert", "ToInt32", 1..=1;
    ConvertToInt64 => System, "Convert", "ToInt64", 1..=1;
    ConvertToDouble => System, "Convert", "ToDouble", 1..=1;
    ConvertToString => System, "Convert", "ToString", 1..=1;
    StringJoin => System, "String", "Join", 2..=16;
    StringConcat => System, "String", "Concat", 1..=16;
    StringFormat => System, "String", "Format", 1..=16;
    StringIsNullOrEmpty => System, "String", "IsNullOrEmpty", 1..=1;
    IntParse => System, "int", "Parse", 1..=1;
    IntMaxValue => System, "int", "MaxValue", 0..=0;
    IntMinValue => System, "int", "MinValue", 0..=0;
    DoubleParse => System, "double", "Parse", 1..=1;
    EnumerableRange => Linq, "Enumerable", "Range", 2..=2;
    EnumerableRepeat => Linq, "Enumerable", "Repeat", 2..=2;
}

impl Builtin {
    /// Maps the spellings snippets may use for an owner to its canonical name.
    pub fn canonical_owner(name: &str) -> Option<&'static str> {
        Some(match name {
            "Math" => "Math",
            "Console" => "Console",
            "Convert" => "Convert",
            "String" | "string" => "String",
            "int" | "long" | "Int32" | "Int64" => "int",
            "double" | "float" | "Double" => "double",
            "Enumerable" => "Enumerable",
            _ => return None,
        })
    }

    /// Namespace an owner lives in. Type keywords need no import.
    pub fn owner_namespace(name: &str) -> Option<Namespace> {
        match name {
            "string" | "int" | "long" | "double" | "float" => None,
            _ => Self::canonical_owner(name).and_then(|owner| {
                Self::ALL
                    .iter()
                    .find(|b| b.owner() == owner)
                    .map(|b| b.namespace())
            }),
        }
    }

    pub fn lookup(owner: &str, member: &str) -> Option<Builtin> {
        let owner = Self::canonical_owner(owner)?;
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.owner() == owner && b.member() == member)
    }

    pub fn is_property(self) -> bool {
        matches!(
            self,
            Self::MathPi | Self::MathE | Self::IntMaxValue | Self::IntMinValue
        )
    }
}

/// Type instantiable with `new`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constructor {
    List,
    Dictionary,
    HashSet,
    /// Sized array: `new T[n]`. Takes the length and the element default.
    Array,
    Exception,
    InvalidOperationException,
    ArgumentException,
}

impl Constructor {
    pub const NAMED: &'static [Constructor] = &[
        Self::List,
        Self::Dictionary,
        Self::HashSet,
        Self::Exception,
        Self::InvalidOperationException,
        Self::ArgumentException,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Dictionary => "Dictionary",
            Self::HashSet => "HashSet",
            Self::Array => "Array",
            Self::Exception => "Exception",
            Self::InvalidOperationException => "InvalidOperationException",
            Self::ArgumentException => "ArgumentException",
        }
    }

    pub fn namespace(self) -> Namespace {
        match self {
            Self::List | Self::Dictionary | Self::HashSet => Namespace::Collections,
            _ => Namespace::System,
        }
    }

    /// Number of generic type arguments the type expects.
    pub fn generic_arity(self) -> usize {
        match self {
            Self::List | Self::HashSet => 1,
            Self::Dictionary => 2,
            _ => 0,
        }
    }

    pub fn arity(self) -> RangeInclusive<u8> {
        match self {
            Self::List | Self::HashSet => 0..=1,
            Self::Dictionary => 0..=0,
            Self::Array => 2..=2,
            Self::Exception | Self::InvalidOperationException | Self::ArgumentException => 0..=1,
        }
    }

    pub fn is_exception(self) -> bool {
        matches!(
            self,
            Self::Exception | Self::InvalidOperationException | Self::ArgumentException
        )
    }

    pub fn lookup(name: &str) -> Option<Constructor> {
        Self::NAMED.iter().copied().find(|c| c.type_name() == name)
    }
}
