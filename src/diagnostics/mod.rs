//! Diagnostic reporting for rich, actionable compiler messages.

mod reporter;

pub use reporter::DiagnosticReporter;

use colored::Colorize;
use std::fmt;

/// Location in source code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl SourceLocation {
    pub fn new(file: &str, line: usize, column: usize, length: usize) -> Self {
        Self {
            file: file.to_string(),
            line,
            column,
            length,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Note,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "{}", "error".red().bold()),
            DiagnosticLevel::Warning => write!(f, "{}", "warning".yellow().bold()),
            DiagnosticLevel::Note => write!(f, "{}", "note".cyan().bold()),
        }
    }
}

/// A compiler diagnostic with source context
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub code: String,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub source_line: Option<String>,
    pub label: Option<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            code: code.to_string(),
            message: message.into(),
            location: None,
            source_line: None,
            label: None,
            help: None,
        }
    }

    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            code: code.to_string(),
            message: message.into(),
            location: None,
            source_line: None,
            label: None,
            help: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_source_line(mut self, line: impl Into<String>) -> Self {
        self.source_line = Some(line.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.level, DiagnosticLevel::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header: error[E200]: message
        writeln!(f, "{}[{}]: {}", self.level, self.code.cyan(), self.message)?;

        if let Some(ref loc) = self.location {
            let line_num = loc.line.to_string();
            let padding = " ".repeat(line_num.len());

            writeln!(f, "{}--> {}", padding, loc.to_string().blue())?;
            writeln!(f, "{} {}", padding, "|".blue())?;

            if let Some(ref source) = self.source_line {
                writeln!(f, "{} {} {}", line_num.blue().bold(), "|".blue(), source)?;

                let underline_padding = " ".repeat(loc.column.saturating_sub(1));
                let underline = "^".repeat(loc.length.max(1));

                let colored_underline = match self.level {
                    DiagnosticLevel::Error => underline.red().bold().to_string(),
                    DiagnosticLevel::Warning => underline.yellow().bold().to_string(),
                    DiagnosticLevel::Note => underline.cyan().to_string(),
                };

                write!(
                    f,
                    "{} {} {}{}",
                    padding,
                    "|".blue(),
                    underline_padding,
                    colored_underline
                )?;

                if let Some(ref label) = self.label {
                    let colored_label = match self.level {
                        DiagnosticLevel::Error => label.red().to_string(),
                        DiagnosticLevel::Warning => label.yellow().to_string(),
                        DiagnosticLevel::Note => label.cyan().to_string(),
                    };
                    write!(f, " {}", colored_label)?;
                }
                writeln!(f)?;
            }

            writeln!(f, "{} {}", padding, "|".blue())?;
        }

        if let Some(ref help) = self.help {
            writeln!(f, "   {} {}: {}", "=".blue(), "help".green().bold(), help)?;
        }

        Ok(())
    }
}

/// Error codes for Tack diagnostics
pub mod codes {
    // Lexer errors (E0xx)
    pub const UNEXPECTED_CHARACTER: &str = "E001";
    pub const UNTERMINATED_STRING: &str = "E002";
    pub const UNTERMINATED_CHAR: &str = "E003";

    // Parser errors (E1xx)
    pub const EXPECTED_TOKEN: &str = "E100";
    pub const EXPECTED_EXPRESSION: &str = "E101";
    pub const EXPECTED_TYPE: &str = "E102";
    pub const EXPECTED_IDENTIFIER: &str = "E103";

    // Declaration errors (E20x)
    pub const REDECLARED: &str = "E200";
    pub const NOT_DECLARED: &str = "E201";

    // Type errors (E21x)
    pub const INCOMPATIBLE_OPERANDS: &str = "E210";
    pub const BOOLEAN_OPERANDS_REQUIRED: &str = "E211";
    pub const INCOMPATIBLE_INITIALIZATION: &str = "E212";
    pub const INCOMPATIBLE_ASSIGNMENT: &str = "E213";
    pub const INVALID_INDEX_TYPE: &str = "E214";
    pub const INVALID_VECTOR_SIZE: &str = "E215";
    pub const INVALID_CONDITION: &str = "E216";
    pub const RETURN_TYPE_MISMATCH: &str = "E217";
    pub const MISSING_RETURN_VALUE: &str = "E218";
    pub const INCOMPATIBLE_ARGUMENT: &str = "E219";

    // Arity errors (E22x)
    pub const WRONG_ARGUMENT_COUNT: &str = "E220";

    // Kind errors (E23x)
    pub const NOT_A_FUNCTION: &str = "E230";
    pub const NOT_A_VECTOR: &str = "E231";
    pub const ASSIGN_TO_FUNCTION: &str = "E232";
    pub const INVALID_READ_TARGET: &str = "E233";
}
