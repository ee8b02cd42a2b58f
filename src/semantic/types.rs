//! Type compatibility rules and expression typing.
//!
//! The compatibility lattice is small and deliberately permissive: int, char,
//! and byte form one interchangeable family, and Undefined is compatible with
//! everything so that one malformed sub-expression is reported once instead
//! of cascading.

use crate::parser::{BinaryOp, Expr};
use crate::semantic::{DataType, SymbolKind, SymbolTable};

/// The mutually compatible integral family: int, char, byte
pub fn is_small_integral(t: DataType) -> bool {
    matches!(t, DataType::Int | DataType::Char | DataType::Byte)
}

/// Check whether two types may meet across an assignment, initialization,
/// argument, return, or operator
pub fn compatible(a: DataType, b: DataType) -> bool {
    if a == DataType::Undefined || b == DataType::Undefined {
        return true;
    }

    a == b || (is_small_integral(a) && is_small_integral(b))
}

/// Result type of a binary operator over already-typed operands.
///
/// Relational and logical operators always yield bool. Arithmetic yields
/// real when either operand is real or the operator is division (division
/// always widens), int otherwise, and Undefined for incompatible operands.
pub fn binary_result(op: BinaryOp, left: DataType, right: DataType) -> DataType {
    if op.is_relational() || op.is_logical() {
        return DataType::Boolean;
    }

    if !compatible(left, right) {
        return DataType::Undefined;
    }

    if left == DataType::Real || right == DataType::Real || op == BinaryOp::Div {
        DataType::Real
    } else {
        DataType::Int
    }
}

/// Derive an expression's type from the tree and the symbol table, without
/// reporting anything. The analyzer computes the same types with
/// diagnostics; the generator uses this to type its temporaries.
pub fn expr_type(symbols: &SymbolTable, expr: &Expr) -> DataType {
    match expr {
        Expr::IntLiteral { .. } => DataType::Int,
        Expr::RealLiteral { .. } => DataType::Real,
        Expr::StringLiteral { .. } => DataType::String,
        Expr::CharLiteral { .. } => DataType::Char,

        Expr::Identifier { symbol, .. } => {
            let sym = symbols.symbol(*symbol);
            if sym.declared {
                sym.data_type
            } else {
                DataType::Undefined
            }
        }

        Expr::Binary {
            op, left, right, ..
        } => binary_result(*op, expr_type(symbols, left), expr_type(symbols, right)),

        Expr::Index { base, .. } => {
            let sym = symbols.symbol(*base);
            if sym.declared && sym.kind == SymbolKind::Vector {
                sym.data_type
            } else {
                DataType::Undefined
            }
        }

        Expr::Call { callee, .. } => {
            let sym = symbols.symbol(*callee);
            if sym.kind == SymbolKind::Function {
                sym.return_type
            } else {
                // Unknown callee: provisional int, same as the analyzer
                DataType::Int
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DataType; 7] = [
        DataType::Undefined,
        DataType::Byte,
        DataType::Int,
        DataType::Real,
        DataType::Boolean,
        DataType::String,
        DataType::Char,
    ];

    #[test]
    fn compatibility_is_symmetric() {
        for &a in &ALL {
            for &b in &ALL {
                assert_eq!(compatible(a, b), compatible(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn undefined_is_compatible_with_everything() {
        for &t in &ALL {
            assert!(compatible(DataType::Undefined, t));
            assert!(compatible(t, DataType::Undefined));
        }
    }

    #[test]
    fn small_integrals_are_mutually_compatible() {
        for &a in &[DataType::Int, DataType::Char, DataType::Byte] {
            for &b in &[DataType::Int, DataType::Char, DataType::Byte] {
                assert!(compatible(a, b));
            }
        }
    }

    #[test]
    fn real_is_not_compatible_with_integrals() {
        assert!(!compatible(DataType::Real, DataType::Int));
        assert!(!compatible(DataType::Real, DataType::Char));
        assert!(!compatible(DataType::Real, DataType::Byte));
        assert!(compatible(DataType::Real, DataType::Real));
    }

    #[test]
    fn strings_only_match_strings() {
        assert!(compatible(DataType::String, DataType::String));
        assert!(!compatible(DataType::String, DataType::Int));
        assert!(!compatible(DataType::String, DataType::Boolean));
    }

    #[test]
    fn division_always_widens() {
        assert_eq!(
            binary_result(BinaryOp::Div, DataType::Int, DataType::Int),
            DataType::Real
        );
        assert_eq!(
            binary_result(BinaryOp::Add, DataType::Int, DataType::Int),
            DataType::Int
        );
        assert_eq!(
            binary_result(BinaryOp::Add, DataType::Real, DataType::Int),
            DataType::Real
        );
    }

    #[test]
    fn relational_and_logical_yield_bool() {
        assert_eq!(
            binary_result(BinaryOp::Less, DataType::Int, DataType::Char),
            DataType::Boolean
        );
        assert_eq!(
            binary_result(BinaryOp::And, DataType::Boolean, DataType::Boolean),
            DataType::Boolean
        );
    }

    #[test]
    fn incompatible_arithmetic_is_undefined() {
        assert_eq!(
            binary_result(BinaryOp::Add, DataType::Int, DataType::String),
            DataType::Undefined
        );
    }
}
