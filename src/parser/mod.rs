//! Parser module for building the AST from tokens.

mod ast;
mod expression;
mod statement;

pub use ast::*;
pub use expression::ExpressionParser;
pub use statement::StatementParser;

use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};
use crate::lexer::{Token, TokenKind};
use crate::semantic::{DataType, SymbolId, SymbolTable};

/// Recursive descent parser for Tack.
///
/// The parser owns symbol creation: every identifier and literal it sees is
/// interned into the symbol table, and the AST carries the resulting ids.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    current: usize,
    symbols: &'a mut SymbolTable,
    reporter: &'a mut DiagnosticReporter,
    panic_mode: bool,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        symbols: &'a mut SymbolTable,
        reporter: &'a mut DiagnosticReporter,
    ) -> Self {
        Self {
            tokens,
            current: 0,
            symbols,
            reporter,
            panic_mode: false,
        }
    }

    /// Parse the entire program
    pub fn parse(&mut self) -> Program {
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Some(decl) => declarations.push(decl),
                None => {
                    // Error recovery: skip to the next sync point
                    self.synchronize();
                }
            }
        }

        Program { declarations }
    }

    /// Parse a top-level declaration (variable or function)
    fn declaration(&mut self) -> Option<Declaration> {
        let type_name = self.parse_type()?;
        let (name, name_span) = self.expect_identifier("expected identifier after type")?;

        if self.check(TokenKind::LeftParen) {
            return self.function_declaration(type_name, name, name_span);
        }

        self.variable_declaration(type_name, name, name_span)
    }

    /// Parse a variable declaration after `type name`
    fn variable_declaration(
        &mut self,
        type_name: TypeName,
        name: SymbolId,
        name_span: Span,
    ) -> Option<Declaration> {
        let shape = if self.match_token(TokenKind::LeftBracket) {
            let size = self.expression()?;
            self.expect(TokenKind::RightBracket, "expected ']' after vector size")?;

            let mut initializer = Vec::new();
            if self.match_token(TokenKind::Equal) {
                loop {
                    initializer.push(self.expression()?);
                    if !self.match_token(TokenKind::Comma) {
                        break;
                    }
                }
            }

            VariableShape::Vector { size, initializer }
        } else {
            let initializer = if self.match_token(TokenKind::Equal) {
                Some(self.expression()?)
            } else {
                None
            };

            VariableShape::Scalar { initializer }
        };

        self.expect(TokenKind::Semicolon, "expected ';' after variable declaration")?;

        Some(Declaration::Variable(VariableDecl {
            type_name,
            name,
            name_span,
            shape,
        }))
    }

    /// Parse a function declaration after `type name`
    fn function_declaration(
        &mut self,
        return_type: TypeName,
        name: SymbolId,
        name_span: Span,
    ) -> Option<Declaration> {
        self.expect(TokenKind::LeftParen, "expected '(' after function name")?;

        let mut params = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                let param_type = self.parse_type()?;
                let (param_name, param_span) = self.expect_identifier("expected parameter name")?;

                params.push(Parameter {
                    type_name: param_type,
                    name: param_name,
                    name_span: param_span,
                });

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "expected ')' after parameters")?;

        let body = self.block()?;

        Some(Declaration::Function(FunctionDecl {
            return_type,
            name,
            name_span,
            params,
            body,
        }))
    }

    /// Parse a type keyword
    fn parse_type(&mut self) -> Option<TypeName> {
        let type_name = match self.peek().kind {
            TokenKind::Byte => TypeName::Byte,
            TokenKind::Int => TypeName::Int,
            TokenKind::Real => TypeName::Real,
            TokenKind::String => TypeName::String,
            TokenKind::Char => TypeName::Char,
            _ => {
                let lexeme = self.peek().lexeme.clone();
                self.error_at_current(
                    codes::EXPECTED_TYPE,
                    &format!("expected type, found '{}'", lexeme),
                );
                return None;
            }
        };

        self.advance();
        Some(type_name)
    }

    /// Parse a block of statements
    pub(crate) fn block(&mut self) -> Option<Block> {
        self.expect(TokenKind::LeftBrace, "expected '{'")?;

        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.statement() {
                Some(stmt) => statements.push(stmt),
                None => {
                    self.synchronize();
                }
            }
        }

        self.expect(TokenKind::RightBrace, "expected '}'")?;

        Some(Block { statements })
    }

    // === Symbol interning ===

    /// Intern an identifier token and return its symbol id
    pub(crate) fn intern_identifier(&mut self, lexeme: &str) -> SymbolId {
        self.symbols.intern(lexeme)
    }

    /// Intern a literal token with its data type preset
    pub(crate) fn intern_literal(&mut self, lexeme: &str, data_type: DataType) -> SymbolId {
        self.symbols.intern_literal(lexeme, data_type)
    }

    // === Helper methods ===

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(crate) fn peek_next(&self) -> &Token {
        if self.current + 1 < self.tokens.len() {
            &self.tokens[self.current + 1]
        } else {
            &self.tokens[self.tokens.len() - 1]
        }
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> Option<&Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_at_current(codes::EXPECTED_TOKEN, message);
            None
        }
    }

    /// Expect an identifier, intern it, and return (id, span)
    pub(crate) fn expect_identifier(&mut self, message: &str) -> Option<(SymbolId, Span)> {
        if self.check(TokenKind::Identifier) {
            let (lexeme, span) = {
                let token = self.advance();
                (token.lexeme.clone(), Span::new(token.offset, token.length))
            };
            let id = self.intern_identifier(&lexeme);
            Some((id, span))
        } else {
            self.error_at_current(codes::EXPECTED_IDENTIFIER, message);
            None
        }
    }

    pub(crate) fn error_at_current(&mut self, code: &str, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;

        let (offset, length) = (self.peek().offset, self.peek().length);
        self.reporter
            .report(Diagnostic::error(code, message), offset, length);
    }

    /// Error recovery: skip tokens until a likely statement/declaration start
    fn synchronize(&mut self) {
        self.panic_mode = false;

        while !self.is_at_end() {
            if self.current > 0 && self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Byte
                | TokenKind::Int
                | TokenKind::Real
                | TokenKind::String
                | TokenKind::Char
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::Read
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::RightBrace => {
                    return;
                }
                _ => {}
            }

            self.advance();
        }
    }
}
