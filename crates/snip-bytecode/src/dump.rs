//! Human-readable module disassembly for debugging.

use std::fmt::Write as _;

use super::instructions::Instruction;
use super::module::Module;

/// Renders constants, names and every function's code.
pub fn dump(module: &Module) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_dump(&mut out, module);
    out
}

fn write_dump(out: &mut String, module: &Module) -> std::fmt::Result {
    writeln!(out, "module {} (locals: {})", module.name, module.locals)?;

    if !module.constants.is_empty() {
        writeln!(out, "\n[constants]")?;
        for (i, constant) in module.constants.iter().enumerate() {
            writeln!(out, "#{i:<3} {constant}")?;
        }
    }

    if !module.names.is_empty() {
        writeln!(out, "\n[names]")?;
        for (i, name) in module.names.iter().enumerate() {
            writeln!(out, "N{i:<3} {name}")?;
        }
    }

    for (index, function) in module.functions.iter().enumerate() {
        let params: Vec<String> = function.params.iter().map(|p| format!("L{p}")).collect();
        writeln!(out, "\n[F{index}] {}({})", function.name, params.join(", "))?;
        for (pc, instr) in function.code.iter().enumerate() {
            write!(out, "{pc:04}  {instr}")?;
            if let Some(comment) = comment(module, instr) {
                write!(out, "  ; {comment}")?;
            }
            out.push('\n');
        }
    }

    Ok(())
}

fn comment(module: &Module, instr: &Instruction) -> Option<String> {
    match instr {
        Instruction::Const(i) => module.constants.get(*i as usize).map(|c| c.to_string()),
        Instruction::GetMember(n) | Instruction::CallMethod { name: n, .. } => {
            Some(module.name_at(*n).to_string())
        }
        _ => None,
    }
}
