//! Scanner for Tack source code tokenization.

use super::token::{lookup_keyword, Token, TokenKind};
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};

/// Scanner that produces tokens from source code
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_offset: usize,
    start_offset: usize,
    reporter: &'a mut DiagnosticReporter,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, reporter: &'a mut DiagnosticReporter) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_offset: 0,
            start_offset: 0,
            reporter,
        }
    }

    /// Tokenize the entire source
    pub fn scan_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;

            if token.kind != TokenKind::Error {
                tokens.push(token);
            }

            if is_eof {
                break;
            }
        }

        tokens
    }

    /// Scan a single token
    fn scan_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start_offset = self.current_offset;

        match self.advance() {
            None => Token::eof(self.current_offset),
            Some((offset, c)) => {
                self.start_offset = offset;

                match c {
                    '(' => self.make_token(TokenKind::LeftParen),
                    ')' => self.make_token(TokenKind::RightParen),
                    '[' => self.make_token(TokenKind::LeftBracket),
                    ']' => self.make_token(TokenKind::RightBracket),
                    '{' => self.make_token(TokenKind::LeftBrace),
                    '}' => self.make_token(TokenKind::RightBrace),
                    ',' => self.make_token(TokenKind::Comma),
                    ';' => self.make_token(TokenKind::Semicolon),
                    '+' => self.make_token(TokenKind::Plus),
                    '-' => self.make_token(TokenKind::Minus),
                    '*' => self.make_token(TokenKind::Star),
                    '/' => self.make_token(TokenKind::Slash),
                    '%' => self.make_token(TokenKind::Percent),
                    '&' => self.make_token(TokenKind::Ampersand),
                    '|' => self.make_token(TokenKind::Pipe),

                    '<' => self.match_compound('=', TokenKind::LessEqual, TokenKind::Less),
                    '>' => self.match_compound('=', TokenKind::GreaterEqual, TokenKind::Greater),
                    '=' => self.match_compound('=', TokenKind::EqualEqual, TokenKind::Equal),

                    '!' => {
                        if self.match_char('=') {
                            self.make_token(TokenKind::BangEqual)
                        } else {
                            self.error_token(c)
                        }
                    }

                    '"' => self.scan_string(),
                    '\'' => self.scan_char(),

                    '0'..='9' => self.scan_number(),

                    c if is_ident_start(c) => self.scan_identifier(),

                    _ => self.error_token(c),
                }
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance();
                }
                Some('/') => {
                    // Look ahead for a comment
                    let mut chars = self.chars.clone();
                    chars.next(); // consume '/'
                    match chars.peek() {
                        Some((_, '/')) => {
                            // Line comment
                            self.advance();
                            self.advance();
                            while self.peek().map_or(false, |c| c != '\n') {
                                self.advance();
                            }
                        }
                        Some((_, '*')) => {
                            // Block comment
                            self.advance();
                            self.advance();
                            loop {
                                match self.advance() {
                                    None => break,
                                    Some((_, '*')) => {
                                        if self.match_char('/') {
                                            break;
                                        }
                                    }
                                    _ => {}
                                }
                            }
                        }
                        _ => break,
                    }
                }
                _ => break,
            }
        }
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((offset, c)) = result {
            self.current_offset = offset + c.len_utf8();
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_compound(&mut self, next: char, compound: TokenKind, single: TokenKind) -> Token {
        if self.match_char(next) {
            self.make_token(compound)
        } else {
            self.make_token(single)
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let lexeme = &self.source[self.start_offset..self.current_offset];
        Token::new(
            kind,
            lexeme,
            self.start_offset,
            self.current_offset - self.start_offset,
        )
    }

    fn error_token(&mut self, c: char) -> Token {
        self.reporter.report(
            Diagnostic::error(
                codes::UNEXPECTED_CHARACTER,
                format!("unexpected character '{}'", c),
            ),
            self.start_offset,
            c.len_utf8(),
        );
        Token::new(TokenKind::Error, c, self.start_offset, c.len_utf8())
    }

    fn scan_identifier(&mut self) -> Token {
        while self.peek().map_or(false, is_ident_continue) {
            self.advance();
        }

        let lexeme = &self.source[self.start_offset..self.current_offset];
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind)
    }

    fn scan_number(&mut self) -> Token {
        let mut is_real = false;

        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal point only counts when a digit follows, so `v[1].` style
        // juxtapositions never swallow the dot
        if self.peek() == Some('.') {
            let mut chars = self.chars.clone();
            chars.next();
            if chars.peek().map_or(false, |(_, c)| c.is_ascii_digit()) {
                self.advance();
                is_real = true;

                while self.peek().map_or(false, |c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        self.make_token(if is_real {
            TokenKind::RealLiteral
        } else {
            TokenKind::IntLiteral
        })
    }

    fn scan_string(&mut self) -> Token {
        while let Some(c) = self.peek() {
            match c {
                '"' => {
                    self.advance();
                    return self.make_token(TokenKind::StringLiteral);
                }
                '\\' => {
                    self.advance(); // consume backslash
                    self.advance(); // consume escaped char
                }
                '\n' => break,
                _ => {
                    self.advance();
                }
            }
        }

        self.reporter.report(
            Diagnostic::error(codes::UNTERMINATED_STRING, "unterminated string literal")
                .with_help("add a closing '\"' at the end of the string"),
            self.start_offset,
            self.current_offset - self.start_offset,
        );
        Token::new(TokenKind::Error, "", self.start_offset, 0)
    }

    fn scan_char(&mut self) -> Token {
        match self.advance() {
            None | Some((_, '\'')) | Some((_, '\n')) => {
                self.reporter.report(
                    Diagnostic::error(codes::UNTERMINATED_CHAR, "malformed character literal"),
                    self.start_offset,
                    self.current_offset - self.start_offset,
                );
                return Token::new(TokenKind::Error, "", self.start_offset, 0);
            }
            Some((_, '\\')) => {
                // Escape sequence
                self.advance();
            }
            _ => {}
        }

        if !self.match_char('\'') {
            self.reporter.report(
                Diagnostic::error(codes::UNTERMINATED_CHAR, "unterminated character literal")
                    .with_help("add a closing '\\'' after the character"),
                self.start_offset,
                self.current_offset - self.start_offset,
            );
            return Token::new(TokenKind::Error, "", self.start_offset, 0);
        }

        self.make_token(TokenKind::CharLiteral)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_xid::UnicodeXID::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || unicode_xid::UnicodeXID::is_xid_continue(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        let mut reporter = DiagnosticReporter::new("test.tk", source);
        let tokens = Scanner::new(source, &mut reporter).scan_tokens();
        assert!(!reporter.has_errors(), "unexpected lex errors");
        tokens
    }

    #[test]
    fn scans_declaration() {
        let kinds: Vec<TokenKind> = scan("int a = 5;").iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::IntLiteral,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn distinguishes_int_and_real_literals() {
        let tokens = scan("12 12.5");
        assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[1].kind, TokenKind::RealLiteral);
        assert_eq!(tokens[1].lexeme, "12.5");
    }

    #[test]
    fn scans_compound_operators() {
        let kinds: Vec<TokenKind> = scan("<= >= == != < >").iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::EqualEqual,
                TokenKind::BangEqual,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_comments() {
        let tokens = scan("a // comment\n/* block */ b");
        let idents: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(idents, vec!["a", "b"]);
    }

    #[test]
    fn reports_unexpected_character() {
        let mut reporter = DiagnosticReporter::new("test.tk", "int a @;");
        let _ = Scanner::new("int a @;", &mut reporter).scan_tokens();
        assert_eq!(reporter.error_count(), 1);
    }
}
