//! Module assembly from a lowered program.
//!
//! Checks every cross-reference (jump targets, pool and table indices,
//! frame slots) before the program becomes a [`Module`], so the VM only
//! ever sees images whose indices resolve.


use snip_bytecode::{Function, Instruction, Module};

use crate::compile::Program;

/// A lowered program that refers to something it does not contain.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    #[error("function `{function}` jumps to {target}, outside its code")]
    JumpOutOfRange { function: String, target: u32 },
    #[error("function `{function}` references constant {index}")]
    UnknownConstant { function: String, index: u16 },
    #[error("function `{function}` references name {index}")]
    UnknownName { function: String, index: u16 },
    #[error("function `{function}` references function {index}")]
    UnknownFunction { function: String, index: u16 },
    #[error("function `{function}` uses slot {slot} of a {locals}-slot frame")]
    SlotOutOfRange {
        function: String,
        slot: u16,
        locals: u16,
    },
    #[error("function `{0}` can run off its end")]
    MissingTerminator(String),
}

/// Wraps a lowered program into a module named `name`.
pub fn emit(name: &str, program: Program) -> Result<Module, EmitError> {
    for function in &program.functions {
        verify(function, &program)?;
    }

    Ok(Module {
        name: name.to_string(),
        constants: program.constants,
        names: program.names,
        functions: program.functions,
        locals: program.locals,
    })
}

fn verify(function: &Function, program: &Program) -> Result<(), EmitError> {
    let name = || function.name.clone();
    let len = function.code.len();
    let slot_ok = |slot: u16| slot < program.locals;

    for param in &function.params {
        if !slot_ok(*param) {
            return Err(EmitError::SlotOutOfRange {
                function: name(),
                slot: *param,
                locals: program.locals,
            });
        }
    }

    for instr in &function.code {
        if let Some(target) = instr.target().filter(|t| *t as usize >= len) {
            return Err(EmitError::JumpOutOfRange {
                function: name(),
                target,
            });
        }

        match *instr {
            Instruction::Const(index) if index as usize >= program.constants.len() => {
                return Err(EmitError::UnknownConstant {
                    function: name(),
                    index,
                });
            }
            Instruction::GetMember(index) | Instruction::CallMethod { name: index, .. }
                if index as usize >= program.names.len() =>
            {
                return Err(EmitError::UnknownName {
                    function: name(),
                    index,
                });
            }
            Instruction::MakeLambda(index) if index as usize >= program.functions.len() => {
                return Err(EmitError::UnknownFunction {
                    function: name(),
                    index,
                });
            }
            Instruction::LoadLocal(slot)
            | Instruction::StoreLocal(slot)
            | Instruction::IterStart(slot)
            | Instruction::IterNext { slot, .. }
                if !slot_ok(slot) =>
            {
                return Err(EmitError::SlotOutOfRange {
                    function: name(),
                    slot,
                    locals: program.locals,
                });
            }
            _ => {}
        }
    }

    match function.code.last() {
        Some(Instruction::Return | Instruction::Throw | Instruction::Jump(_)) => Ok(()),
        _ => Err(EmitError::MissingTerminator(name())),
    }
}
