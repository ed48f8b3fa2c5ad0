//! Instruction set of the snippet VM.
//!
//! The VM is a stack machine. Every function owns an operand stack; locals
//! live in a single frame shared by `Execute` and the lambdas it creates.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::builtins::{Builtin, Constructor};

/// Index into a function's instruction vector.
pub type Label = u32;

/// Binary operators that pop two operands and push one result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    /// Operator as written in source.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Rem,
            "==" => Self::Eq,
            "!=" => Self::Ne,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            _ => return None,
        })
    }
}

/// Target of an explicit `(T)` conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastKind {
    Int,
    Double,
    Char,
    Bool,
    String,
    Object,
}

impl CastKind {
    /// Maps a type keyword to its conversion.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "int" | "long" => Self::Int,
            "double" | "float" | "decimal" => Self::Double,
            "char" => Self::Char,
            "bool" => Self::Bool,
            "string" => Self::String,
            "object" => Self::Object,
            _ => return None,
        })
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::Char => "char",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Object => "object",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Push constant pool entry.
    Const(u16),
    LoadLocal(u16),
    /// Pop into a local.
    StoreLocal(u16),
    Pop,
    Dup,
    /// Duplicate the top two values, keeping their order.
    Dup2,
    Neg,
    Pos,
    Not,
    Binary(BinaryOp),
    Jump(Label),
    JumpIfFalse(Label),
    JumpIfTrue(Label),
    /// Short-circuit `&&`: jump keeping the value when false, else pop it.
    JumpIfFalseOrPop(Label),
    /// Short-circuit `||`: jump keeping the value when true, else pop it.
    JumpIfTrueOrPop(Label),
    /// `??`: jump keeping the value when it is not null, else pop it.
    JumpIfNotNullOrPop(Label),
    CallStatic { builtin: Builtin, argc: u8 },
    New { ctor: Constructor, argc: u8 },
    /// Receiver sits below the arguments. `name` indexes the name table.
    CallMethod { name: u16, argc: u8 },
    /// Callee sits below the arguments.
    CallValue { argc: u8 },
    GetMember(u16),
    GetIndex,
    /// Pops target, index and value; pushes the value back.
    SetIndex,
    MakeList(u16),
    MakeLambda(u16),
    Cast(CastKind),
    Throw,
    Return,
    /// Pop a collection and store a snapshot iterator in the given local.
    IterStart(u16),
    /// Push the next item of the iterator local, or jump when exhausted.
    IterNext { slot: u16, exit: Label },
}

impl Instruction {
    /// Jump target, if this instruction can branch.
    pub fn target(&self) -> Option<Label> {
        match self {
            Self::Jump(l)
            | Self::JumpIfFalse(l)
            | Self::JumpIfTrue(l)
            | Self::JumpIfFalseOrPop(l)
            | Self::JumpIfTrueOrPop(l)
            | Self::JumpIfNotNullOrPop(l)
            | Self::IterNext { exit: l, .. } => Some(*l),
            _ => None,
        }
    }

    /// Rewrites the jump target. No-op for non-branching instructions.
    pub fn set_target(&mut self, label: Label) {
        match self {
            Self::Jump(l)
            | Self::JumpIfFalse(l)
            | Self::JumpIfTrue(l)
            | Self::JumpIfFalseOrPop(l)
            | Self::JumpIfTrueOrPop(l)
            | Self::JumpIfNotNullOrPop(l)
            | Self::IterNext { exit: l, .. } => *l = label,
            _ => {}
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Const(_) => "Const",
            Self::LoadLocal(_) => "LoadLocal",
            Self::StoreLocal(_) => "StoreLocal",
            Self::Pop => "Pop",
            Self::Dup => "Dup",
            Self::Dup2 => "Dup2",
            Self::Neg => "Neg",
            Self::Pos => "Pos",
            Self::Not => "Not",
            Self::Binary(_) => "Binary",
            Self::Jump(_) => "Jump",
            Self::JumpIfFalse(_) => "JumpIfFalse",
            Self::JumpIfTrue(_) => "JumpIfTrue",
            Self::JumpIfFalseOrPop(_) => "JumpIfFalseOrPop",
            Self::JumpIfTrueOrPop(_) => "JumpIfTrueOrPop",
            Self::JumpIfNotNullOrPop(_) => "JumpIfNotNullOrPop",
            Self::CallStatic { .. } => "CallStatic",
            Self::New { .. } => "New",
            Self::CallMethod { .. } => "CallMethod",
            Self::CallValue { .. } => "CallValue",
            Self::GetMember(_) => "GetMember",
            Self::GetIndex => "GetIndex",
            Self::SetIndex => "SetIndex",
            Self::MakeList(_) => "MakeList",
            Self::MakeLambda(_) => "MakeLambda",
            Self::Cast(_) => "Cast",
            Self::Throw => "Throw",
            Self::Return => "Return",
            Self::IterStart(_) => "IterStart",
            Self::IterNext { .. } => "IterNext",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.mnemonic();
        match self {
            Self::Const(i) => write!(f, "{name} #{i}"),
            Self::LoadLocal(s) | Self::StoreLocal(s) | Self::IterStart(s) => {
                write!(f, "{name} L{s}")
            }
            Self::Binary(op) => write!(f, "{name} {}", op.symbol()),
            Self::Jump(l)
            | Self::JumpIfFalse(l)
            | Self::JumpIfTrue(l)
            | Self::JumpIfFalseOrPop(l)
            | Self::JumpIfTrueOrPop(l)
            | Self::JumpIfNotNullOrPop(l) => write!(f, "{name} @{l}"),
            Self::CallStatic { builtin, argc } => {
                write!(f, "{name} {}.{}/{argc}", builtin.owner(), builtin.member())
            }
            Self::New { ctor, argc } => write!(f, "{name} {}/{argc}", ctor.type_name()),
            Self::CallMethod { name: n, argc } => write!(f, "{name} N{n}/{argc}"),
            Self::CallValue { argc } => write!(f, "{name} /{argc}"),
            Self::GetMember(n) => write!(f, "{name} N{n}"),
            Self::MakeList(n) => write!(f, "{name} {n}"),
            Self::MakeLambda(func) => write!(f, "{name} F{func}"),
            Self::Cast(kind) => write!(f, "{name} {}", kind.type_name()),
            Self::IterNext { slot, exit } => write!(f, "{name} L{slot} @{exit}"),
            Self::Pop
            | Self::Dup
            | Self::Dup2
            | Self::Neg
            | Self::Pos
            | Self::Not
            | Self::GetIndex
            | Self::SetIndex
            | Self::Throw
            | Self::Return => f.write_str(name),
        }
    }
}
