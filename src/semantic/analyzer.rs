//! Semantic analyzer: a single-pass walk that resolves every name against
//! the symbol table, computes expression types, and accumulates diagnostics.
//!
//! Every check is non-fatal. A failed check records one diagnostic and the
//! walk continues into every child, so independent errors elsewhere in the
//! program are still reported in the same pass.

use super::symbol_table::{DataType, ParamInfo, SymbolId, SymbolKind, SymbolTable};
use super::types::{binary_result, compatible, is_small_integral};
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};
use crate::parser::{
    Block, Declaration, Expr, FunctionDecl, Program, Span, Stmt, TypeName, VariableDecl,
    VariableShape,
};

/// Semantic analyzer over a parsed program
pub struct Analyzer<'a> {
    symbols: &'a mut SymbolTable,
    reporter: &'a mut DiagnosticReporter,
    /// Return type of the function being checked (for return statements)
    current_return_type: Option<DataType>,
}

impl<'a> Analyzer<'a> {
    pub fn new(symbols: &'a mut SymbolTable, reporter: &'a mut DiagnosticReporter) -> Self {
        Self {
            symbols,
            reporter,
            current_return_type: None,
        }
    }

    /// Check an entire program
    pub fn check(&mut self, program: &Program) {
        for decl in &program.declarations {
            self.check_declaration(decl);
        }
    }

    fn check_declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Variable(var) => self.check_variable(var),
            Declaration::Function(func) => self.check_function(func),
        }
    }

    /// Check a variable declaration (scalar or vector)
    fn check_variable(&mut self, var: &VariableDecl) {
        let var_type = declared_type(var.type_name);
        let name = self.symbols.name(var.name).to_string();

        match &var.shape {
            VariableShape::Scalar { initializer } => {
                self.declare(var.name, var.name_span, SymbolKind::Scalar, var_type);

                if let Some(init) = initializer {
                    let init_type = self.type_of(init);
                    if !compatible(var_type, init_type) {
                        let span = init.span();
                        self.reporter.report(
                            Diagnostic::error(
                                codes::INCOMPATIBLE_INITIALIZATION,
                                format!("incompatible initialization of '{}'", name),
                            )
                            .with_help(format!(
                                "expected '{}', found '{}'",
                                var_type.name(),
                                init_type.name()
                            )),
                            span.offset,
                            span.length,
                        );
                    }
                }
            }

            VariableShape::Vector { size, initializer } => {
                if self.declare(var.name, var.name_span, SymbolKind::Vector, var_type) {
                    // Record the element count when the size is a literal
                    if let Expr::IntLiteral { symbol, .. } = size {
                        let count = self.symbols.name(*symbol).parse().ok();
                        self.symbols.symbol_mut(var.name).vector_size = count;
                    }
                }

                let size_type = self.type_of(size);
                if !is_small_integral(size_type) && size_type != DataType::Undefined {
                    let span = size.span();
                    self.reporter.report(
                        Diagnostic::error(
                            codes::INVALID_VECTOR_SIZE,
                            format!("vector size must be an integer in declaration of '{}'", name),
                        )
                        .with_help(format!("found '{}'", size_type.name())),
                        span.offset,
                        span.length,
                    );
                }

                for element in initializer {
                    let element_type = self.type_of(element);
                    if !compatible(var_type, element_type) {
                        let span = element.span();
                        self.reporter.report(
                            Diagnostic::error(
                                codes::INCOMPATIBLE_INITIALIZATION,
                                format!("incompatible initialization of '{}'", name),
                            )
                            .with_help(format!(
                                "expected '{}', found '{}'",
                                var_type.name(),
                                element_type.name()
                            )),
                            span.offset,
                            span.length,
                        );
                    }
                }
            }
        }
    }

    /// Check a function declaration and its body
    fn check_function(&mut self, func: &FunctionDecl) {
        let return_type = declared_type(func.return_type);

        if self.declare(func.name, func.name_span, SymbolKind::Function, return_type) {
            let parameters: Vec<ParamInfo> = func
                .params
                .iter()
                .map(|p| ParamInfo {
                    name: self.symbols.name(p.name).to_string(),
                    data_type: declared_type(p.type_name),
                })
                .collect();

            let sym = self.symbols.symbol_mut(func.name);
            sym.return_type = return_type;
            sym.parameters = parameters;
        }

        // Parameters become declared scalars in the flat table
        for param in &func.params {
            self.declare(
                param.name,
                param.name_span,
                SymbolKind::Scalar,
                declared_type(param.type_name),
            );
        }

        let saved = self.current_return_type.replace(return_type);
        self.check_block(&func.body);
        self.current_return_type = saved;
    }

    fn check_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.check_stmt(stmt);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign {
                target,
                target_span,
                index,
                value,
            } => self.check_assignment(*target, *target_span, index.as_ref(), value),

            Stmt::Read {
                target,
                target_span,
            } => {
                let (declared, kind, _, name) = self.snapshot(*target);
                if !declared {
                    self.report_not_declared(&name, *target_span);
                } else if kind != SymbolKind::Scalar {
                    self.reporter.report(
                        Diagnostic::error(
                            codes::INVALID_READ_TARGET,
                            format!("read target '{}' must be a scalar variable", name),
                        ),
                        target_span.offset,
                        target_span.length,
                    );
                }
            }

            Stmt::Print { args } => {
                for arg in args {
                    self.type_of(arg);
                }
            }

            Stmt::Return { value, span } => self.check_return(value.as_ref(), *span),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition("if", condition);
                self.check_stmt(then_branch);
                if let Some(else_stmt) = else_branch {
                    self.check_stmt(else_stmt);
                }
            }

            Stmt::While { condition, body } => {
                self.check_condition("while", condition);
                self.check_stmt(body);
            }

            Stmt::DoWhile { body, condition } => {
                self.check_stmt(body);
                self.check_condition("do-while", condition);
            }

            Stmt::Block(block) => self.check_block(block),

            // A call in statement position must resolve; other expression
            // statements are just typed
            Stmt::Expression(expr) => match expr {
                Expr::Call {
                    callee,
                    callee_span,
                    args,
                    span,
                } => self.check_call_statement(*callee, *callee_span, args, *span),
                _ => {
                    self.type_of(expr);
                }
            },

            Stmt::Empty => {}
        }
    }

    fn check_assignment(
        &mut self,
        target: SymbolId,
        target_span: Span,
        index: Option<&Expr>,
        value: &Expr,
    ) {
        let (declared, kind, data_type, name) = self.snapshot(target);

        if !declared {
            self.report_not_declared(&name, target_span);
            // Still type the operands so their own errors surface
            if let Some(ix) = index {
                self.type_of(ix);
            }
            self.type_of(value);
            return;
        }

        if kind == SymbolKind::Function {
            self.reporter.report(
                Diagnostic::error(
                    codes::ASSIGN_TO_FUNCTION,
                    format!("cannot assign to function '{}'", name),
                ),
                target_span.offset,
                target_span.length,
            );
            if let Some(ix) = index {
                self.type_of(ix);
            }
            self.type_of(value);
            return;
        }

        match index {
            Some(ix) => {
                if kind != SymbolKind::Vector {
                    self.reporter.report_with_label(
                        Diagnostic::error(
                            codes::NOT_A_VECTOR,
                            format!("'{}' is not a vector", name),
                        ),
                        target_span.offset,
                        target_span.length,
                        "indexed assignment to non-vector",
                    );
                }

                let index_type = self.type_of(ix);
                if !is_small_integral(index_type) && index_type != DataType::Undefined {
                    let span = ix.span();
                    self.reporter.report(
                        Diagnostic::error(
                            codes::INVALID_INDEX_TYPE,
                            "vector index must be an integer",
                        )
                        .with_help(format!("found '{}'", index_type.name())),
                        span.offset,
                        span.length,
                    );
                }

                let value_type = self.type_of(value);
                if kind == SymbolKind::Vector && !compatible(data_type, value_type) {
                    let span = value.span();
                    self.reporter.report(
                        Diagnostic::error(
                            codes::INCOMPATIBLE_ASSIGNMENT,
                            format!("incompatible assignment to '{}'", name),
                        )
                        .with_help(format!(
                            "expected '{}', found '{}'",
                            data_type.name(),
                            value_type.name()
                        )),
                        span.offset,
                        span.length,
                    );
                }
            }

            None => {
                if kind != SymbolKind::Scalar {
                    self.reporter.report(
                        Diagnostic::error(
                            codes::INCOMPATIBLE_ASSIGNMENT,
                            format!("cannot assign to vector '{}' without an index", name),
                        ),
                        target_span.offset,
                        target_span.length,
                    );
                }

                let value_type = self.type_of(value);
                if kind == SymbolKind::Scalar && !compatible(data_type, value_type) {
                    let span = value.span();
                    self.reporter.report(
                        Diagnostic::error(
                            codes::INCOMPATIBLE_ASSIGNMENT,
                            format!("incompatible assignment to '{}'", name),
                        )
                        .with_help(format!(
                            "expected '{}', found '{}'",
                            data_type.name(),
                            value_type.name()
                        )),
                        span.offset,
                        span.length,
                    );
                }
            }
        }
    }

    fn check_return(&mut self, value: Option<&Expr>, span: Span) {
        match value {
            Some(expr) => {
                let value_type = self.type_of(expr);
                if let Some(expected) = self.current_return_type {
                    if !compatible(expected, value_type) {
                        let span = expr.span();
                        self.reporter.report(
                            Diagnostic::error(codes::RETURN_TYPE_MISMATCH, "incompatible return type")
                                .with_help(format!(
                                    "expected '{}', found '{}'",
                                    expected.name(),
                                    value_type.name()
                                )),
                            span.offset,
                            span.length,
                        );
                    }
                }
            }
            None => {
                if let Some(expected) = self.current_return_type {
                    if expected != DataType::Undefined {
                        self.reporter.report(
                            Diagnostic::error(
                                codes::MISSING_RETURN_VALUE,
                                format!(
                                    "return statement requires a value in a function returning '{}'",
                                    expected.name()
                                ),
                            ),
                            span.offset,
                            span.length,
                        );
                    }
                }
            }
        }
    }

    /// Conditions accept bool and the small-integral family; string and real
    /// are rejected with the construct named in the message
    fn check_condition(&mut self, construct: &str, condition: &Expr) {
        let condition_type = self.type_of(condition);
        if matches!(condition_type, DataType::String | DataType::Real) {
            let span = condition.span();
            self.reporter.report(
                Diagnostic::error(
                    codes::INVALID_CONDITION,
                    format!(
                        "'{}' condition must be a boolean or numeric expression, found '{}'",
                        construct,
                        condition_type.name()
                    ),
                ),
                span.offset,
                span.length,
            );
        }
    }

    /// A call in statement position: the callee must resolve to a function
    fn check_call_statement(
        &mut self,
        callee: SymbolId,
        callee_span: Span,
        args: &[Expr],
        span: Span,
    ) {
        let (declared, kind, _, name) = self.snapshot(callee);

        if kind == SymbolKind::Function {
            self.check_call_arguments(callee, span, args);
        } else if declared {
            self.reporter.report(
                Diagnostic::error(
                    codes::NOT_A_FUNCTION,
                    format!("'{}' is not a function", name),
                ),
                callee_span.offset,
                callee_span.length,
            );
            for arg in args {
                self.type_of(arg);
            }
        } else {
            self.report_not_declared(&name, callee_span);
            for arg in args {
                self.type_of(arg);
            }
        }
    }

    /// Check argument count and positional compatibility against a known
    /// function signature. A count mismatch skips the positional checks.
    fn check_call_arguments(&mut self, callee: SymbolId, span: Span, args: &[Expr]) {
        let arg_types: Vec<DataType> = args.iter().map(|a| self.type_of(a)).collect();

        let (name, parameters) = {
            let sym = self.symbols.symbol(callee);
            (sym.name.clone(), sym.parameters.clone())
        };

        if arg_types.len() != parameters.len() {
            self.reporter.report(
                Diagnostic::error(
                    codes::WRONG_ARGUMENT_COUNT,
                    format!("wrong number of arguments in call to '{}'", name),
                )
                .with_help(format!(
                    "expected {}, got {}",
                    parameters.len(),
                    arg_types.len()
                )),
                span.offset,
                span.length,
            );
            return;
        }

        for (i, (param, arg_type)) in parameters.iter().zip(&arg_types).enumerate() {
            if !compatible(param.data_type, *arg_type) {
                let arg_span = args[i].span();
                self.reporter.report(
                    Diagnostic::error(
                        codes::INCOMPATIBLE_ARGUMENT,
                        format!("incompatible argument type for parameter '{}'", param.name),
                    )
                    .with_help(format!(
                        "expected '{}', found '{}'",
                        param.data_type.name(),
                        arg_type.name()
                    )),
                    arg_span.offset,
                    arg_span.length,
                );
            }
        }
    }

    /// Type an expression, reporting any violations found inside it
    fn type_of(&mut self, expr: &Expr) -> DataType {
        match expr {
            Expr::IntLiteral { .. } => DataType::Int,
            Expr::RealLiteral { .. } => DataType::Real,
            Expr::StringLiteral { .. } => DataType::String,
            Expr::CharLiteral { .. } => DataType::Char,

            Expr::Identifier { symbol, span } => {
                let (declared, _, data_type, name) = self.snapshot(*symbol);
                if declared {
                    data_type
                } else {
                    self.report_not_declared(&name, *span);
                    DataType::Undefined
                }
            }

            Expr::Binary {
                op,
                left,
                right,
                span,
            } => {
                let left_type = self.type_of(left);
                let right_type = self.type_of(right);

                if op.is_relational() {
                    if !compatible(left_type, right_type) {
                        self.reporter.report(
                            Diagnostic::error(
                                codes::INCOMPATIBLE_OPERANDS,
                                "incompatible types in relational expression",
                            )
                            .with_help(format!(
                                "'{}' {} '{}'",
                                left_type.name(),
                                op.symbol(),
                                right_type.name()
                            )),
                            span.offset,
                            span.length,
                        );
                    }
                    DataType::Boolean
                } else if op.is_logical() {
                    let is_boolean =
                        |t: DataType| t == DataType::Boolean || t == DataType::Undefined;
                    if !is_boolean(left_type) || !is_boolean(right_type) {
                        self.reporter.report(
                            Diagnostic::error(
                                codes::BOOLEAN_OPERANDS_REQUIRED,
                                "logical operators require boolean operands",
                            )
                            .with_help(format!(
                                "'{}' {} '{}'",
                                left_type.name(),
                                op.symbol(),
                                right_type.name()
                            )),
                            span.offset,
                            span.length,
                        );
                    }
                    DataType::Boolean
                } else {
                    if !compatible(left_type, right_type) {
                        self.reporter.report(
                            Diagnostic::error(
                                codes::INCOMPATIBLE_OPERANDS,
                                "incompatible types in arithmetic expression",
                            )
                            .with_help(format!(
                                "'{}' {} '{}'",
                                left_type.name(),
                                op.symbol(),
                                right_type.name()
                            )),
                            span.offset,
                            span.length,
                        );
                        return DataType::Undefined;
                    }
                    binary_result(*op, left_type, right_type)
                }
            }

            Expr::Index {
                base,
                base_span,
                index,
                ..
            } => {
                let index_type = self.type_of(index);
                if !is_small_integral(index_type) && index_type != DataType::Undefined {
                    let span = index.span();
                    self.reporter.report(
                        Diagnostic::error(
                            codes::INVALID_INDEX_TYPE,
                            "vector index must be an integer",
                        )
                        .with_help(format!("found '{}'", index_type.name())),
                        span.offset,
                        span.length,
                    );
                }

                let (declared, kind, data_type, name) = self.snapshot(*base);
                if !declared {
                    self.report_not_declared(&name, *base_span);
                    DataType::Undefined
                } else if kind != SymbolKind::Vector {
                    self.reporter.report_with_label(
                        Diagnostic::error(
                            codes::NOT_A_VECTOR,
                            format!("'{}' is not a vector", name),
                        ),
                        base_span.offset,
                        base_span.length,
                        "indexed expression is not a vector",
                    );
                    DataType::Undefined
                } else {
                    data_type
                }
            }

            Expr::Call {
                callee, args, span, ..
            } => {
                if self.symbols.symbol(*callee).kind == SymbolKind::Function {
                    self.check_call_arguments(*callee, *span, args);
                    self.symbols.symbol(*callee).return_type
                } else {
                    // Callee not known yet: defer with a provisional type so
                    // forward references check cleanly
                    for arg in args {
                        self.type_of(arg);
                    }
                    DataType::Int
                }
            }
        }
    }

    // === Helpers ===

    /// Mark a symbol declared, or report a redeclaration. Returns whether
    /// this call performed the declaration.
    fn declare(&mut self, id: SymbolId, span: Span, kind: SymbolKind, data_type: DataType) -> bool {
        let (already_declared, name) = {
            let sym = self.symbols.symbol(id);
            (sym.declared, sym.name.clone())
        };

        if already_declared {
            self.reporter.report_with_label(
                Diagnostic::error(codes::REDECLARED, format!("'{}' is already declared", name)),
                span.offset,
                span.length,
                "redeclared here",
            );
            return false;
        }

        let sym = self.symbols.symbol_mut(id);
        sym.declared = true;
        sym.kind = kind;
        sym.data_type = data_type;
        true
    }

    fn report_not_declared(&mut self, name: &str, span: Span) {
        self.reporter.report(
            Diagnostic::error(codes::NOT_DECLARED, format!("'{}' is not declared", name)),
            span.offset,
            span.length,
        );
    }

    fn snapshot(&self, id: SymbolId) -> (bool, SymbolKind, DataType, String) {
        let sym = self.symbols.symbol(id);
        (sym.declared, sym.kind, sym.data_type, sym.name.clone())
    }
}

fn declared_type(type_name: TypeName) -> DataType {
    match type_name {
        TypeName::Byte => DataType::Byte,
        TypeName::Int => DataType::Int,
        TypeName::Real => DataType::Real,
        TypeName::String => DataType::String,
        TypeName::Char => DataType::Char,
    }
}
