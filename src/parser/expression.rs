//! Expression parser for Tack.
//! Implements a precedence-climbing parser over the binary operator levels.

use super::{BinaryOp, Expr, Parser, Span};
use crate::diagnostics::codes;
use crate::lexer::TokenKind;
use crate::semantic::{DataType, SymbolId};

/// Trait extension for expression parsing
pub trait ExpressionParser {
    fn expression(&mut self) -> Option<Expr>;
}

impl<'a> ExpressionParser for Parser<'a> {
    fn expression(&mut self) -> Option<Expr> {
        self.parse_or()
    }
}

impl<'a> Parser<'a> {
    /// Parse logical OR: `a | b`
    fn parse_or(&mut self) -> Option<Expr> {
        let mut expr = self.parse_and()?;

        while self.match_token(TokenKind::Pipe) {
            let right = self.parse_and()?;
            expr = binary(BinaryOp::Or, expr, right);
        }

        Some(expr)
    }

    /// Parse logical AND: `a & b`
    fn parse_and(&mut self) -> Option<Expr> {
        let mut expr = self.parse_equality()?;

        while self.match_token(TokenKind::Ampersand) {
            let right = self.parse_equality()?;
            expr = binary(BinaryOp::And, expr, right);
        }

        Some(expr)
    }

    /// Parse equality: `a == b`, `a != b`
    fn parse_equality(&mut self) -> Option<Expr> {
        let mut expr = self.parse_relational()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::EqualEqual => BinaryOp::Equal,
                TokenKind::BangEqual => BinaryOp::NotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            expr = binary(op, expr, right);
        }

        Some(expr)
    }

    /// Parse relational: `a < b`, `a > b`, `a <= b`, `a >= b`
    fn parse_relational(&mut self) -> Option<Expr> {
        let mut expr = self.parse_additive()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Less => BinaryOp::Less,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::LessEqual => BinaryOp::LessEqual,
                TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            expr = binary(op, expr, right);
        }

        Some(expr)
    }

    /// Parse additive: `a + b`, `a - b`
    fn parse_additive(&mut self) -> Option<Expr> {
        let mut expr = self.parse_multiplicative()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            expr = binary(op, expr, right);
        }

        Some(expr)
    }

    /// Parse multiplicative: `a * b`, `a / b`, `a % b`
    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_primary()?;
            expr = binary(op, expr, right);
        }

        Some(expr)
    }

    /// Parse a primary expression: literal, identifier, call, index, or parens
    fn parse_primary(&mut self) -> Option<Expr> {
        match self.peek().kind {
            TokenKind::IntLiteral => {
                let (lexeme, span) = self.take_lexeme();
                let symbol = self.intern_literal(&lexeme, DataType::Int);
                Some(Expr::IntLiteral { symbol, span })
            }

            TokenKind::RealLiteral => {
                let (lexeme, span) = self.take_lexeme();
                let symbol = self.intern_literal(&lexeme, DataType::Real);
                Some(Expr::RealLiteral { symbol, span })
            }

            TokenKind::StringLiteral => {
                let (lexeme, span) = self.take_lexeme();
                let symbol = self.intern_literal(&lexeme, DataType::String);
                Some(Expr::StringLiteral { symbol, span })
            }

            TokenKind::CharLiteral => {
                let (lexeme, span) = self.take_lexeme();
                let symbol = self.intern_literal(&lexeme, DataType::Char);
                Some(Expr::CharLiteral { symbol, span })
            }

            TokenKind::Identifier => {
                let (lexeme, span) = self.take_lexeme();
                let symbol = self.intern_identifier(&lexeme);

                if self.match_token(TokenKind::LeftParen) {
                    return self.finish_call(symbol, span);
                }

                if self.match_token(TokenKind::LeftBracket) {
                    let index = self.expression()?;
                    self.expect(TokenKind::RightBracket, "expected ']' after vector index")?;
                    let close = self.previous();
                    let full = span.merge(&Span::new(close.offset, close.length));
                    return Some(Expr::Index {
                        base: symbol,
                        base_span: span,
                        index: Box::new(index),
                        span: full,
                    });
                }

                Some(Expr::Identifier { symbol, span })
            }

            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RightParen, "expected ')' after expression")?;
                Some(expr)
            }

            _ => {
                let lexeme = self.peek().lexeme.clone();
                self.error_at_current(
                    codes::EXPECTED_EXPRESSION,
                    &format!("expected expression, found '{}'", lexeme),
                );
                None
            }
        }
    }

    /// Parse call arguments after the opening paren
    pub(crate) fn finish_call(&mut self, callee: SymbolId, callee_span: Span) -> Option<Expr> {
        let mut args = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "expected ')' after arguments")?;
        let close = self.previous();
        let span = callee_span.merge(&Span::new(close.offset, close.length));

        Some(Expr::Call {
            callee,
            callee_span,
            args,
            span,
        })
    }

    /// Consume the current token, returning its lexeme and span
    fn take_lexeme(&mut self) -> (String, Span) {
        let token = self.advance();
        (token.lexeme.clone(), Span::new(token.offset, token.length))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span().merge(&right.span());
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    }
}
