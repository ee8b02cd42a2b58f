//! Driver that orchestrates the compilation pipeline.

use crate::diagnostics::{Diagnostic, DiagnosticReporter};
use crate::lexer::Scanner;
use crate::parser::Parser;
use crate::semantic::{Analyzer, SymbolTable};
use crate::tac::{render_listing, TacGenerator};

/// Why a compilation did not produce output
#[derive(Debug)]
pub enum CompileFailure {
    /// Lexical or syntax errors; analysis never ran
    Syntax(Vec<Diagnostic>),
    /// Semantic errors; code generation still ran to completion
    Semantic(Vec<Diagnostic>),
}

impl CompileFailure {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompileFailure::Syntax(diags) | CompileFailure::Semantic(diags) => diags,
        }
    }
}

/// The compilation driver
pub struct Driver {
    file: String,
    source: String,
    dump_tokens: bool,
    dump_ast: bool,
    dump_symbols: bool,
}

impl Driver {
    pub fn new(file: String, source: String) -> Self {
        Self {
            file,
            source,
            dump_tokens: false,
            dump_ast: false,
            dump_symbols: false,
        }
    }

    pub fn set_dump_tokens(&mut self, enabled: bool) {
        self.dump_tokens = enabled;
    }

    pub fn set_dump_ast(&mut self, enabled: bool) {
        self.dump_ast = enabled;
    }

    pub fn set_dump_symbols(&mut self, enabled: bool) {
        self.dump_symbols = enabled;
    }

    /// Run the compilation pipeline, producing the TAC listing
    pub fn compile(&mut self) -> Result<String, CompileFailure> {
        let mut reporter = DiagnosticReporter::new(&self.file, &self.source);
        let mut symbols = SymbolTable::new();

        // === Lexical analysis ===
        let scanner = Scanner::new(&self.source, &mut reporter);
        let tokens = scanner.scan_tokens();

        if self.dump_tokens {
            eprintln!("=== Tokens ===");
            for token in &tokens {
                eprintln!("  {}", token);
            }
            eprintln!();
        }

        if reporter.has_errors() {
            return Err(CompileFailure::Syntax(reporter.take_diagnostics()));
        }

        // === Parsing ===
        let mut parser = Parser::new(tokens, &mut symbols, &mut reporter);
        let program = parser.parse();

        if self.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{:#?}", program);
            eprintln!();
        }

        if reporter.has_errors() {
            return Err(CompileFailure::Syntax(reporter.take_diagnostics()));
        }

        // === Semantic analysis ===
        let mut analyzer = Analyzer::new(&mut symbols, &mut reporter);
        analyzer.check(&program);

        // === Code generation ===
        // Generation runs even when analysis reported errors, so that the
        // whole program is exercised; the listing is only written on success.
        let mut generator = TacGenerator::new(&mut symbols);
        let code = generator.lower(&program);

        if self.dump_symbols {
            eprintln!("=== Symbols ===");
            for (_, symbol) in symbols.iter() {
                eprintln!(
                    "  {} [{:?}, {}{}]",
                    symbol.name,
                    symbol.kind,
                    symbol.data_type.name(),
                    if symbol.declared { ", declared" } else { "" },
                );
            }
            eprintln!();
        }

        if reporter.has_errors() {
            return Err(CompileFailure::Semantic(reporter.take_diagnostics()));
        }

        // Surface any warnings before emitting
        for diag in reporter.diagnostics() {
            eprintln!("{}", diag);
        }

        Ok(render_listing(&code, &symbols))
    }
}
