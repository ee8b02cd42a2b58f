//! Symbol table for tracking every name in a compilation unit.
//!
//! The table interns by text: identifiers, literals, and compiler-generated
//! temporaries and labels all share one namespace, and a given text maps to
//! exactly one record for the lifetime of the compilation. Identity is the
//! `SymbolId`, so "same record" is directly checkable.

use std::collections::HashMap;
use std::fmt;

/// Handle to an interned symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

/// Semantic data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Undefined,
    Byte,
    Int,
    Real,
    Boolean,
    String,
    Char,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Undefined => "undefined",
            DataType::Byte => "byte",
            DataType::Int => "int",
            DataType::Real => "real",
            DataType::Boolean => "bool",
            DataType::String => "string",
            DataType::Char => "char",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a symbol names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Scalar,
    Vector,
    Function,
}

/// A declared function parameter
#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: String,
    pub data_type: DataType,
}

/// One record per distinct name
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Flips to true exactly once, when a declaration for this name is checked
    pub declared: bool,
    pub data_type: DataType,
    /// Declared element count (Vector only, when the size is a literal)
    pub vector_size: Option<i64>,
    /// Declared return type (Function only)
    pub return_type: DataType,
    /// Declared parameter signature (Function only)
    pub parameters: Vec<ParamInfo>,
}

impl Symbol {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SymbolKind::Scalar,
            declared: false,
            data_type: DataType::Undefined,
            vector_size: None,
            return_type: DataType::Undefined,
            parameters: Vec::new(),
        }
    }
}

/// Interning symbol table with a flat, program-wide namespace
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-or-get: the first call for a text creates an undeclared record,
    /// every later call returns the identical record
    pub fn intern(&mut self, text: &str) -> SymbolId {
        if let Some(&id) = self.index.get(text) {
            return id;
        }

        let id = SymbolId(self.symbols.len());
        self.symbols.push(Symbol::new(text));
        self.index.insert(text.to_string(), id);
        id
    }

    /// Intern a literal, presetting its data type on first sight
    pub fn intern_literal(&mut self, text: &str, data_type: DataType) -> SymbolId {
        let known = self.index.contains_key(text);
        let id = self.intern(text);
        if !known {
            self.symbols[id.0].data_type = data_type;
        }
        id
    }

    /// Look up without creating
    pub fn find(&self, text: &str) -> Option<SymbolId> {
        self.index.get(text).copied()
    }

    /// Look up a function symbol; a non-function record with the same name
    /// yields `None` so callers can produce a specific diagnostic
    pub fn find_function(&self, text: &str) -> Option<SymbolId> {
        self.find(text)
            .filter(|&id| self.symbols[id.0].kind == SymbolKind::Function)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    /// Symbol name, for diagnostics and listings
    pub fn name(&self, id: SymbolId) -> &str {
        &self.symbols[id.0].name
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over all records in interning order
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.symbols.iter().enumerate().map(|(i, s)| (SymbolId(i), s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut table = SymbolTable::new();
        let first = table.intern("x");
        let second = table.intern("x");
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn find_does_not_create() {
        let mut table = SymbolTable::new();
        assert!(table.find("x").is_none());
        let id = table.intern("x");
        assert_eq!(table.find("x"), Some(id));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn find_function_filters_on_kind() {
        let mut table = SymbolTable::new();
        let id = table.intern("f");
        assert!(table.find_function("f").is_none());

        table.symbol_mut(id).kind = SymbolKind::Function;
        assert_eq!(table.find_function("f"), Some(id));
    }

    #[test]
    fn literal_interning_presets_type_once() {
        let mut table = SymbolTable::new();
        let id = table.intern_literal("5", DataType::Int);
        assert_eq!(table.symbol(id).data_type, DataType::Int);

        // A second sighting must not disturb the existing record
        let again = table.intern_literal("5", DataType::Real);
        assert_eq!(id, again);
        assert_eq!(table.symbol(id).data_type, DataType::Int);
    }

    #[test]
    fn new_records_start_undeclared() {
        let mut table = SymbolTable::new();
        let id = table.intern("a");
        let sym = table.symbol(id);
        assert!(!sym.declared);
        assert_eq!(sym.kind, SymbolKind::Scalar);
        assert_eq!(sym.data_type, DataType::Undefined);
    }
}
