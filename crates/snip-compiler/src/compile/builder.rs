//! Per-function instruction buffers.

use snip_bytecode::{Function, Instruction, Label};

/// Instructions of one function under construction.
///
/// Forward jumps are emitted with a placeholder target and patched once the
/// destination is known.
#[derive(Debug)]
pub struct FunctionBuilder {
    name: String,
    params: Vec<u16>,
    code: Vec<Instruction>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>, params: Vec<u16>) -> Self {
        Self {
            name: name.into(),
            params,
            code: Vec::new(),
        }
    }

    /// Appends an instruction and returns its index.
    pub fn emit(&mut self, instr: Instruction) -> usize {
        self.code.push(instr);
        self.code.len() - 1
    }

    /// Label of the next instruction to be emitted.
    pub fn here(&self) -> Label {
        self.code.len() as Label
    }

    pub fn patch(&mut self, at: usize, target: Label) {
        if let Some(instr) = self.code.get_mut(at) {
            instr.set_target(target);
        }
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn finish(self) -> Function {
        Function {
            name: self.name,
            params: self.params,
            code: self.code,
        }
    }
}
