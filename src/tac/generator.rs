//! TAC generator: lowers a checked syntax tree into a linear instruction
//! list.
//!
//! Generation runs after semantic analysis and does not re-validate; on a
//! program with recorded errors it still completes and produces a
//! best-effort list. Every expression lowers to a (code, result symbol)
//! pair; statements lower to plain code.

use super::instruction::{Instruction, InstructionList, Opcode};
use crate::parser::{
    BinaryOp, Block, Declaration, Expr, FunctionDecl, Program, Stmt, VariableDecl, VariableShape,
};
use crate::semantic::{expr_type, DataType, SymbolId, SymbolTable};

/// Lowers programs to three-address code
pub struct TacGenerator<'a> {
    symbols: &'a mut SymbolTable,
    temp_count: usize,
    label_count: usize,
}

impl<'a> TacGenerator<'a> {
    pub fn new(symbols: &'a mut SymbolTable) -> Self {
        Self {
            symbols,
            temp_count: 0,
            label_count: 0,
        }
    }

    /// Lower an entire program, concatenating declarations in order
    pub fn lower(&mut self, program: &Program) -> InstructionList {
        let mut code = InstructionList::new();
        for decl in &program.declarations {
            code = code.join(self.lower_declaration(decl));
        }
        code
    }

    fn lower_declaration(&mut self, decl: &Declaration) -> InstructionList {
        match decl {
            Declaration::Variable(var) => self.lower_variable(var),
            Declaration::Function(func) => self.lower_function(func),
        }
    }

    fn lower_variable(&mut self, var: &VariableDecl) -> InstructionList {
        match &var.shape {
            // A plain declaration generates no code
            VariableShape::Scalar { initializer: None } => InstructionList::new(),

            VariableShape::Scalar {
                initializer: Some(init),
            } => {
                let (code, result) = self.lower_expr(init);
                code.join(InstructionList::single(Instruction::new(
                    Opcode::Move,
                    Some(var.name),
                    Some(result),
                    None,
                )))
            }

            VariableShape::Vector { initializer, .. } => {
                let mut code = InstructionList::new();
                for (i, element) in initializer.iter().enumerate() {
                    let (element_code, result) = self.lower_expr(element);
                    let index = self
                        .symbols
                        .intern_literal(&i.to_string(), DataType::Int);
                    code = code.join(element_code);
                    code.push(Instruction::new(
                        Opcode::VectorWrite,
                        Some(var.name),
                        Some(index),
                        Some(result),
                    ));
                }
                code
            }
        }
    }

    fn lower_function(&mut self, func: &FunctionDecl) -> InstructionList {
        let body = self.lower_block(&func.body);

        InstructionList::single(Instruction::new(
            Opcode::BeginFunction,
            Some(func.name),
            None,
            None,
        ))
        .join(body)
        .join(InstructionList::single(Instruction::new(
            Opcode::EndFunction,
            Some(func.name),
            None,
            None,
        )))
    }

    fn lower_block(&mut self, block: &Block) -> InstructionList {
        let mut code = InstructionList::new();
        for stmt in &block.statements {
            code = code.join(self.lower_stmt(stmt));
        }
        code
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> InstructionList {
        match stmt {
            Stmt::Assign {
                target,
                index: None,
                value,
                ..
            } => {
                let (code, result) = self.lower_expr(value);
                code.join(InstructionList::single(Instruction::new(
                    Opcode::Move,
                    Some(*target),
                    Some(result),
                    None,
                )))
            }

            Stmt::Assign {
                target,
                index: Some(ix),
                value,
                ..
            } => {
                let (index_code, index_result) = self.lower_expr(ix);
                let (value_code, value_result) = self.lower_expr(value);
                index_code
                    .join(value_code)
                    .join(InstructionList::single(Instruction::new(
                        Opcode::VectorWrite,
                        Some(*target),
                        Some(index_result),
                        Some(value_result),
                    )))
            }

            Stmt::Read { target, .. } => InstructionList::single(Instruction::new(
                Opcode::Read,
                Some(*target),
                None,
                None,
            )),

            Stmt::Print { args } => {
                let mut code = InstructionList::new();
                for arg in args {
                    let (arg_code, result) = self.lower_expr(arg);
                    code = code.join(arg_code);
                    code.push(Instruction::new(Opcode::Print, None, Some(result), None));
                }
                code
            }

            Stmt::Return { value, .. } => match value {
                Some(expr) => {
                    let (code, result) = self.lower_expr(expr);
                    code.join(InstructionList::single(Instruction::new(
                        Opcode::Return,
                        None,
                        Some(result),
                        None,
                    )))
                }
                None => InstructionList::single(Instruction::new(
                    Opcode::Return,
                    None,
                    None,
                    None,
                )),
            },

            Stmt::If {
                condition,
                then_branch,
                else_branch: None,
            } => {
                let (condition_code, condition_result) = self.lower_expr(condition);
                let end_label = self.make_label();

                condition_code
                    .join(InstructionList::single(Instruction::new(
                        Opcode::JumpIfZero,
                        Some(end_label),
                        Some(condition_result),
                        None,
                    )))
                    .join(self.lower_stmt(then_branch))
                    .join(InstructionList::single(Instruction::new(
                        Opcode::Label,
                        Some(end_label),
                        None,
                        None,
                    )))
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch: Some(else_branch),
            } => {
                let (condition_code, condition_result) = self.lower_expr(condition);
                let else_label = self.make_label();
                let end_label = self.make_label();

                condition_code
                    .join(InstructionList::single(Instruction::new(
                        Opcode::JumpIfZero,
                        Some(else_label),
                        Some(condition_result),
                        None,
                    )))
                    .join(self.lower_stmt(then_branch))
                    .join(InstructionList::single(Instruction::new(
                        Opcode::Jump,
                        Some(end_label),
                        None,
                        None,
                    )))
                    .join(InstructionList::single(Instruction::new(
                        Opcode::Label,
                        Some(else_label),
                        None,
                        None,
                    )))
                    .join(self.lower_stmt(else_branch))
                    .join(InstructionList::single(Instruction::new(
                        Opcode::Label,
                        Some(end_label),
                        None,
                        None,
                    )))
            }

            Stmt::While { condition, body } => {
                let begin_label = self.make_label();
                let end_label = self.make_label();
                let (condition_code, condition_result) = self.lower_expr(condition);

                InstructionList::single(Instruction::new(
                    Opcode::Label,
                    Some(begin_label),
                    None,
                    None,
                ))
                .join(condition_code)
                .join(InstructionList::single(Instruction::new(
                    Opcode::JumpIfZero,
                    Some(end_label),
                    Some(condition_result),
                    None,
                )))
                .join(self.lower_stmt(body))
                .join(InstructionList::single(Instruction::new(
                    Opcode::Jump,
                    Some(begin_label),
                    None,
                    None,
                )))
                .join(InstructionList::single(Instruction::new(
                    Opcode::Label,
                    Some(end_label),
                    None,
                    None,
                )))
            }

            // The post-test loop exits by falling through its backward
            // conditional jump; its test polarity is not the while loop's
            Stmt::DoWhile { body, condition } => {
                let begin_label = self.make_label();
                let body_code = self.lower_stmt(body);
                let (condition_code, condition_result) = self.lower_expr(condition);

                InstructionList::single(Instruction::new(
                    Opcode::Label,
                    Some(begin_label),
                    None,
                    None,
                ))
                .join(body_code)
                .join(condition_code)
                .join(InstructionList::single(Instruction::new(
                    Opcode::JumpIfZero,
                    Some(begin_label),
                    Some(condition_result),
                    None,
                )))
            }

            Stmt::Block(block) => self.lower_block(block),

            Stmt::Expression(expr) => self.lower_expr(expr).0,

            Stmt::Empty => InstructionList::new(),
        }
    }

    /// Lower an expression to (code, result symbol)
    fn lower_expr(&mut self, expr: &Expr) -> (InstructionList, SymbolId) {
        match expr {
            // Literals and identifiers are already symbols; no code
            Expr::IntLiteral { symbol, .. }
            | Expr::RealLiteral { symbol, .. }
            | Expr::StringLiteral { symbol, .. }
            | Expr::CharLiteral { symbol, .. }
            | Expr::Identifier { symbol, .. } => (InstructionList::new(), *symbol),

            Expr::Binary {
                op, left, right, ..
            } => {
                let (left_code, left_result) = self.lower_expr(left);
                let (right_code, right_result) = self.lower_expr(right);

                let result_type = expr_type(self.symbols, expr);
                let temp = self.make_temp(result_type);

                let code = left_code.join(right_code).join(InstructionList::single(
                    Instruction::new(
                        opcode_for(*op),
                        Some(temp),
                        Some(left_result),
                        Some(right_result),
                    ),
                ));
                (code, temp)
            }

            Expr::Index { base, index, .. } => {
                let (index_code, index_result) = self.lower_expr(index);

                let result_type = expr_type(self.symbols, expr);
                let temp = self.make_temp(result_type);

                let code = index_code.join(InstructionList::single(Instruction::new(
                    Opcode::VectorRead,
                    Some(temp),
                    Some(*base),
                    Some(index_result),
                )));
                (code, temp)
            }

            Expr::Call { callee, args, .. } => {
                // Each argument's code is followed immediately by its
                // argument instruction, interleaved in call order
                let mut code = InstructionList::new();
                for arg in args {
                    let (arg_code, arg_result) = self.lower_expr(arg);
                    code = code.join(arg_code);
                    code.push(Instruction::new(
                        Opcode::Argument,
                        None,
                        Some(arg_result),
                        None,
                    ));
                }

                let result_type = expr_type(self.symbols, expr);
                let temp = self.make_temp(result_type);

                code.push(Instruction::new(
                    Opcode::Call,
                    Some(temp),
                    Some(*callee),
                    None,
                ));
                (code, temp)
            }
        }
    }

    /// Allocate a fresh temporary, interned and typed
    fn make_temp(&mut self, data_type: DataType) -> SymbolId {
        let name = format!("_temp{}", self.temp_count);
        self.temp_count += 1;

        let id = self.symbols.intern(&name);
        self.symbols.symbol_mut(id).data_type = data_type;
        id
    }

    /// Allocate a fresh label symbol
    fn make_label(&mut self) -> SymbolId {
        let name = format!("_label{}", self.label_count);
        self.label_count += 1;

        self.symbols.intern(&name)
    }
}

fn opcode_for(op: BinaryOp) -> Opcode {
    match op {
        BinaryOp::Add => Opcode::Add,
        BinaryOp::Sub => Opcode::Sub,
        BinaryOp::Mul => Opcode::Mul,
        BinaryOp::Div => Opcode::Div,
        BinaryOp::Mod => Opcode::Mod,
        BinaryOp::Less => Opcode::Less,
        BinaryOp::Greater => Opcode::Greater,
        BinaryOp::LessEqual => Opcode::LessEqual,
        BinaryOp::GreaterEqual => Opcode::GreaterEqual,
        BinaryOp::Equal => Opcode::Equal,
        BinaryOp::NotEqual => Opcode::NotEqual,
        BinaryOp::And => Opcode::And,
        BinaryOp::Or => Opcode::Or,
    }
}
