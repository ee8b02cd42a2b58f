//! End-to-end semantic analysis tests: each program is scanned, parsed, and
//! checked, and the test asserts the exact number of recorded errors.

use tack::diagnostics::DiagnosticReporter;
use tack::lexer::Scanner;
use tack::parser::Parser;
use tack::semantic::{Analyzer, SymbolTable};

/// Run the front end and the analyzer, returning the error count and the
/// diagnostic messages
fn analyze(source: &str) -> (usize, Vec<String>) {
    let mut reporter = DiagnosticReporter::new("test.tk", source);
    let mut symbols = SymbolTable::new();

    let tokens = Scanner::new(source, &mut reporter).scan_tokens();
    assert!(
        !reporter.has_errors(),
        "unexpected lex errors: {:?}",
        reporter.diagnostics()
    );

    let program = Parser::new(tokens, &mut symbols, &mut reporter).parse();
    assert!(
        !reporter.has_errors(),
        "unexpected parse errors: {:?}",
        reporter.diagnostics()
    );

    Analyzer::new(&mut symbols, &mut reporter).check(&program);

    let messages = reporter
        .diagnostics()
        .iter()
        .map(|d| d.message.clone())
        .collect();
    (reporter.error_count(), messages)
}

fn error_count(source: &str) -> usize {
    analyze(source).0
}

#[test]
fn valid_scalar_program_has_no_errors() {
    assert_eq!(error_count("int a = 5; int main() { a = a + 1; }"), 0);
}

#[test]
fn undeclared_assignment_target_is_one_error() {
    let (count, messages) = analyze("int main() { b = 3; }");
    assert_eq!(count, 1);
    assert!(messages[0].contains("'b' is not declared"), "{:?}", messages);
}

#[test]
fn undeclared_reference_in_expression_is_one_error() {
    let (count, messages) = analyze("int a; int main() { a = c + 1; }");
    assert_eq!(count, 1);
    assert!(messages[0].contains("'c' is not declared"), "{:?}", messages);
}

#[test]
fn redeclaration_is_an_error() {
    let (count, messages) = analyze("int a; real a;");
    assert_eq!(count, 1);
    assert!(messages[0].contains("already declared"), "{:?}", messages);
}

#[test]
fn duplicate_parameter_is_a_redeclaration() {
    let (count, messages) = analyze("int f(int a, real a) { return 1; }");
    assert_eq!(count, 1);
    assert!(messages[0].contains("already declared"), "{:?}", messages);
}

#[test]
fn vector_index_must_be_integral() {
    // An int index is fine
    assert_eq!(
        error_count("int v[10]; int x; int main() { x = v[1]; }"),
        0
    );
    // A char index is in the small-integral family
    assert_eq!(
        error_count("int v[10]; int x; int main() { x = v['a']; }"),
        0
    );

    // A real index is exactly one error
    let (count, messages) = analyze("int v[10]; int x; int main() { x = v[1.5]; }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("vector index must be an integer"),
        "{:?}",
        messages
    );
}

#[test]
fn vector_size_must_be_integral() {
    assert_eq!(error_count("int v[10];"), 0);

    let (count, messages) = analyze("int v[1.5];");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("vector size must be an integer"),
        "{:?}",
        messages
    );
}

#[test]
fn indexing_a_scalar_is_a_kind_error() {
    let (count, messages) = analyze("int x; int y; int main() { y = x[1]; }");
    assert_eq!(count, 1);
    assert!(messages[0].contains("'x' is not a vector"), "{:?}", messages);
}

#[test]
fn indexed_assignment_to_scalar_is_a_kind_error() {
    let (count, messages) = analyze("int x; int main() { x[1] = 2; }");
    assert_eq!(count, 1);
    assert!(messages[0].contains("'x' is not a vector"), "{:?}", messages);
}

#[test]
fn whole_vector_assignment_is_rejected() {
    let (count, messages) = analyze("int v[3]; int main() { v = 1; }");
    assert_eq!(count, 1);
    assert!(messages[0].contains("without an index"), "{:?}", messages);
}

#[test]
fn division_always_widens_to_real() {
    // x = y / 2 is fine for real x even with integral operands
    assert_eq!(error_count("real x; int y; int main() { x = y / 2; }"), 0);

    // ...and therefore does not fit an int target
    let (count, messages) = analyze("int x; int y; int main() { x = y / 2; }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("incompatible assignment"),
        "{:?}",
        messages
    );
}

#[test]
fn real_does_not_mix_with_integrals_in_assignment() {
    let (count, _) = analyze("real x; int main() { x = 1 + 2; }");
    assert_eq!(count, 1);
}

#[test]
fn function_arity_is_checked() {
    assert_eq!(
        error_count("int f(int p) { return p; } int main() { f(1); }"),
        0
    );

    let (count, messages) = analyze("int f(int p) { return p; } int main() { f(1, 2); }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("wrong number of arguments"),
        "{:?}",
        messages
    );
}

#[test]
fn argument_types_are_checked_positionally() {
    let (count, messages) =
        analyze("int f(int p, string s) { return p; } int main() { f(1, 2); }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("incompatible argument type for parameter 's'"),
        "{:?}",
        messages
    );
}

#[test]
fn calling_a_non_function_is_a_kind_error() {
    let (count, messages) = analyze("int x; int main() { x(1); }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("'x' is not a function"),
        "{:?}",
        messages
    );
}

#[test]
fn calling_an_unknown_name_as_statement_is_not_declared() {
    let (count, messages) = analyze("int main() { missing(1); }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("'missing' is not declared"),
        "{:?}",
        messages
    );
}

#[test]
fn forward_call_in_expression_is_deferred() {
    // The callee is declared later; expression-position typing defers with a
    // provisional int and records no error
    assert_eq!(
        error_count("int x; int main() { x = helper(1); } int helper(int p) { return p; }"),
        0
    );
}

#[test]
fn string_condition_names_the_construct_and_type() {
    let (count, messages) = analyze("int x; int main() { while (\"text\") x = 1; }");
    assert_eq!(count, 1);
    assert!(messages[0].contains("'while'"), "{:?}", messages);
    assert!(messages[0].contains("'string'"), "{:?}", messages);
}

#[test]
fn real_condition_is_rejected() {
    let (count, messages) = analyze("int x; int main() { if (1.5) x = 1; }");
    assert_eq!(count, 1);
    assert!(messages[0].contains("'if'"), "{:?}", messages);
    assert!(messages[0].contains("'real'"), "{:?}", messages);
}

#[test]
fn boolean_and_integral_conditions_are_accepted() {
    assert_eq!(
        error_count("int x; int main() { if (x < 10) x = 1; while (x) x = x - 1; }"),
        0
    );
    assert_eq!(
        error_count("int x; int main() { do x = x + 1; while (x < 10); }"),
        0
    );
}

#[test]
fn logical_operators_require_boolean_operands() {
    assert_eq!(
        error_count("int x; int main() { if ((1 < 2) & (x > 0)) x = 1; }"),
        0
    );

    let (count, messages) = analyze("int x; int main() { if (1 & 2) x = 1; }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("logical operators require boolean operands"),
        "{:?}",
        messages
    );
}

#[test]
fn relational_operands_must_be_compatible() {
    let (count, messages) = analyze("int x; int main() { if (1 < \"a\") x = 1; }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("incompatible types in relational expression"),
        "{:?}",
        messages
    );
}

#[test]
fn incompatible_arithmetic_reports_once() {
    // The malformed operand types as Undefined, so the enclosing assignment
    // stays quiet instead of cascading
    let (count, messages) = analyze("int x; int main() { x = 1 + \"a\"; }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("incompatible types in arithmetic expression"),
        "{:?}",
        messages
    );
}

#[test]
fn initializers_must_be_compatible() {
    // char fits an int scalar (small-integral family)
    assert_eq!(error_count("int a = 'c';"), 0);

    let (count, messages) = analyze("int a = \"text\";");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("incompatible initialization of 'a'"),
        "{:?}",
        messages
    );
}

#[test]
fn vector_initializer_elements_are_checked() {
    assert_eq!(error_count("int v[3] = 1, 2, 3;"), 0);

    let (count, messages) = analyze("int v[3] = 1, 2.5, 3;");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("incompatible initialization of 'v'"),
        "{:?}",
        messages
    );
}

#[test]
fn assigning_to_a_function_is_a_kind_error() {
    let (count, messages) = analyze("int f() { return 1; } int main() { f = 1; }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("cannot assign to function 'f'"),
        "{:?}",
        messages
    );
}

#[test]
fn return_type_must_be_compatible() {
    assert_eq!(error_count("int f() { return 1; }"), 0);
    assert_eq!(error_count("char f() { return 1; }"), 0);

    let (count, messages) = analyze("int f() { return \"s\"; }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("incompatible return type"),
        "{:?}",
        messages
    );
}

#[test]
fn bare_return_in_typed_function_is_an_error() {
    let (count, messages) = analyze("int f() { return; }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("requires a value"),
        "{:?}",
        messages
    );
}

#[test]
fn read_requires_a_declared_scalar() {
    assert_eq!(error_count("int x; int main() { read x; }"), 0);

    let (count, _) = analyze("int main() { read x; }");
    assert_eq!(count, 1);

    let (count, messages) = analyze("int v[3]; int main() { read v; }");
    assert_eq!(count, 1);
    assert!(
        messages[0].contains("must be a scalar"),
        "{:?}",
        messages
    );
}

#[test]
fn independent_errors_all_surface_in_one_pass() {
    // Two undeclared targets and one bad condition: three distinct errors
    let (count, _) = analyze("int x; int main() { b = 3; c = 4; if (1.5) x = 1; }");
    assert_eq!(count, 3);
}
