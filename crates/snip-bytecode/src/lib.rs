//! Bytecode format for compiled snippets.
//!
//! This crate contains:
//! - The instruction set executed by the VM ([`Instruction`])
//! - The builtin catalogue shared by compiler and VM ([`Builtin`], [`Constructor`])
//! - Checksummed module images ([`Module`], [`Header`])
//! - A disassembler for debugging ([`dump`])

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod builtins;
mod dump;
mod header;
mod instructions;
mod module;

#[cfg(test)]
mod header_tests;
#[cfg(test)]
mod module_tests;

pub use builtins::{Builtin, Constructor, Namespace};
pub use dump::dump;
pub use header::Header;
pub use instructions::{BinaryOp, CastKind, Instruction, Label};
pub use module::{Constant, Function, Module, ModuleError};

pub type Result<T> = std::result::Result<T, ModuleError>;

/// Magic bytes at the start of every module image.
pub const MAGIC: [u8; 4] = *b"SNPB";

/// Image format version.
pub const VERSION: u32 = 1;

/// Size of the fixed header preceding the payload.
pub const HEADER_SIZE: usize = 16;

/// Name of the method every compiled unit exposes.
pub const ENTRY_POINT: &str = "Execute";
