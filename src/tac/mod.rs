//! Three-address code: instruction model, generator, and listing renderer.

mod generator;
mod instruction;

pub use generator::TacGenerator;
pub use instruction::{Instruction, InstructionList, Opcode};

use crate::semantic::{SymbolId, SymbolTable};
use std::fmt::Write;

/// Render an instruction list as readable three-address text.
///
/// Labels and function markers sit flush left; everything else is indented.
pub fn render_listing(code: &InstructionList, symbols: &SymbolTable) -> String {
    let mut out = String::new();
    for instruction in code {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", render_instruction(instruction, symbols));
    }
    out
}

/// Render a single instruction
pub fn render_instruction(instruction: &Instruction, symbols: &SymbolTable) -> String {
    let result = operand_name(instruction.result, symbols);
    let op1 = operand_name(instruction.operand1, symbols);
    let op2 = operand_name(instruction.operand2, symbols);

    match instruction.op {
        Opcode::Move => format!("  {} = {}", result, op1),

        Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::Mod
        | Opcode::And
        | Opcode::Or
        | Opcode::Less
        | Opcode::Greater
        | Opcode::LessEqual
        | Opcode::GreaterEqual
        | Opcode::Equal
        | Opcode::NotEqual => {
            format!("  {} = {} {} {}", result, op1, operator_text(instruction.op), op2)
        }

        Opcode::Label => format!("{}:", result),
        Opcode::BeginFunction => format!("begin {}:", result),
        Opcode::EndFunction => format!("end {}", result),

        Opcode::JumpIfZero => format!("  ifz {} goto {}", op1, result),
        Opcode::Jump => format!("  goto {}", result),

        Opcode::Call => format!("  {} = call {}", result, op1),
        Opcode::Argument => format!("  arg {}", op1),
        Opcode::Return => {
            if instruction.operand1.is_some() {
                format!("  ret {}", op1)
            } else {
                "  ret".to_string()
            }
        }

        Opcode::Print => format!("  print {}", op1),
        Opcode::Read => format!("  read {}", result),

        Opcode::VectorRead => format!("  {} = {}[{}]", result, op1, op2),
        Opcode::VectorWrite => format!("  {}[{}] = {}", result, op1, op2),
    }
}

fn operand_name(id: Option<SymbolId>, symbols: &SymbolTable) -> &str {
    match id {
        Some(id) => symbols.name(id),
        None => "_",
    }
}

fn operator_text(op: Opcode) -> &'static str {
    match op {
        Opcode::Add => "+",
        Opcode::Sub => "-",
        Opcode::Mul => "*",
        Opcode::Div => "/",
        Opcode::Mod => "%",
        Opcode::And => "&",
        Opcode::Or => "|",
        Opcode::Less => "<",
        Opcode::Greater => ">",
        Opcode::LessEqual => "<=",
        Opcode::GreaterEqual => ">=",
        Opcode::Equal => "==",
        Opcode::NotEqual => "!=",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_arithmetic_and_moves() {
        let mut symbols = SymbolTable::new();
        let a = symbols.intern("a");
        let one = symbols.intern("1");
        let temp = symbols.intern("_temp0");

        let mut code = InstructionList::new();
        code.push(Instruction::new(Opcode::Add, Some(temp), Some(a), Some(one)));
        code.push(Instruction::new(Opcode::Move, Some(a), Some(temp), None));

        let listing = render_listing(&code, &symbols);
        assert_eq!(listing, "  _temp0 = a + 1\n  a = _temp0\n");
    }

    #[test]
    fn renders_control_flow() {
        let mut symbols = SymbolTable::new();
        let label = symbols.intern("_label0");
        let temp = symbols.intern("_temp0");

        let mut code = InstructionList::new();
        code.push(Instruction::new(
            Opcode::JumpIfZero,
            Some(label),
            Some(temp),
            None,
        ));
        code.push(Instruction::new(Opcode::Label, Some(label), None, None));

        let listing = render_listing(&code, &symbols);
        assert_eq!(listing, "  ifz _temp0 goto _label0\n_label0:\n");
    }
}
