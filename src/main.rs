//! Tack compiler CLI
//!
//! Usage: tackc <input.tk> [-o output.tac]

use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tack::{CompileFailure, Driver};

// Exit codes: lexical/syntax errors and semantic errors are distinguished so
// callers can tell how far compilation got
const EXIT_SYNTAX_ERROR: u8 = 2;
const EXIT_SEMANTIC_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "tackc")]
#[command(version = "0.1.0")]
#[command(about = "Tack compiler - lowers Tack source to three-address code", long_about = None)]
struct Args {
    /// Input Tack file (.tk)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file for the instruction listing (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Print tokens for debugging
    #[arg(long, default_value_t = false)]
    dump_tokens: bool,

    /// Print the AST for debugging
    #[arg(long, default_value_t = false)]
    dump_ast: bool,

    /// Print the symbol table for debugging
    #[arg(long, default_value_t = false)]
    dump_symbols: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Read source file
    let source = match std::fs::read_to_string(&args.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}: could not read file '{}': {}",
                "error".red().bold(),
                args.input.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    let mut driver = Driver::new(args.input.to_string_lossy().to_string(), source);
    driver.set_dump_tokens(args.dump_tokens);
    driver.set_dump_ast(args.dump_ast);
    driver.set_dump_symbols(args.dump_symbols);

    match driver.compile() {
        Ok(listing) => {
            match args.output {
                Some(ref path) => {
                    if let Err(e) = std::fs::write(path, &listing) {
                        eprintln!(
                            "{}: could not write file '{}': {}",
                            "error".red().bold(),
                            path.display(),
                            e
                        );
                        return ExitCode::FAILURE;
                    }
                    eprintln!(
                        "{}: {} -> {}",
                        "compiled".green().bold(),
                        args.input.display(),
                        path.display()
                    );
                }
                None => {
                    let mut stdout = std::io::stdout();
                    if stdout.write_all(listing.as_bytes()).is_err() {
                        return ExitCode::FAILURE;
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            for diag in failure.diagnostics() {
                eprintln!("{}", diag);
            }

            let error_count = failure.diagnostics().iter().filter(|d| d.is_error()).count();
            eprintln!(
                "\n{} generated",
                format!(
                    "{} error{}",
                    error_count,
                    if error_count == 1 { "" } else { "s" }
                )
                .red()
                .bold()
            );

            match failure {
                CompileFailure::Syntax(_) => ExitCode::from(EXIT_SYNTAX_ERROR),
                CompileFailure::Semantic(_) => ExitCode::from(EXIT_SEMANTIC_ERROR),
            }
        }
    }
}
