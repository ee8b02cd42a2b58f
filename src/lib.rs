//! Tack - a small imperative language lowered to three-address code.
//!
//! The pipeline is scan, parse, analyze, lower: the parser builds a tree
//! whose names are interned into a flat program-wide symbol table, the
//! analyzer resolves and type-checks the tree while accumulating
//! diagnostics, and the generator lowers the checked tree to a linear
//! three-address-code listing for a later back end.

pub mod diagnostics;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod tac;

// Re-export commonly used types
pub use diagnostics::{Diagnostic, DiagnosticLevel, DiagnosticReporter, SourceLocation};
pub use driver::{CompileFailure, Driver};
