use std::collections::HashMap;
use std::fmt;

use crate::lexer::{SyntaxKind, Token};

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Integer,
    Decimal,
    String,
}

impl VarType {
    pub fn from_keyword(kind: SyntaxKind) -> Option<Self> {
        match kind {
            SyntaxKind::IntegerKw => Some(VarType::Integer),
            SyntaxKind::DecimalKw => Some(VarType::Decimal),
            SyntaxKind::StringKw => Some(VarType::String),
            _ => None,
        }
    }

    /// Type a literal token carries on its own: a number with a `.` is
    /// `decimal`, any other number `integer`.
    pub fn of_literal(token: &Token) -> Option<Self> {
        match token.kind {
            SyntaxKind::Number if token.text.contains('.') => Some(VarType::Decimal),
            SyntaxKind::Number => Some(VarType::Integer),
            SyntaxKind::StringLiteral => Some(VarType::String),
            _ => None,
        }
    }

    /// Literal token kind an initializer of this type must have.
    pub fn literal_kind(self) -> SyntaxKind {
        match self {
            VarType::Integer | VarType::Decimal => SyntaxKind::Number,
            VarType::String => SyntaxKind::StringLiteral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VarType::Integer => "integer",
            VarType::Decimal => "decimal",
            VarType::String => "string",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat, program-wide name to type mapping.
#[derive(Debug, Default)]
pub struct SymbolTable {
    table: HashMap<String, VarType>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any existing entry; callers check [`SymbolTable::exists`]
    /// first.
    pub fn insert(&mut self, name: &str, ty: VarType) {
        self.table.insert(name.to_owned(), ty);
    }

    pub fn exists(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn get_type(&self, name: &str) -> Option<VarType> {
        self.table.get(name).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    #[test]
    fn lookup() {
        let mut symbols = SymbolTable::new();
        assert!(!symbols.exists("x"));
        assert_eq!(symbols.get_type("x"), None);

        symbols.insert("x", VarType::Decimal);
        assert!(symbols.exists("x"));
        assert_eq!(symbols.get_type("x"), Some(VarType::Decimal));
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn literal_inference() {
        let number = |text: &str| Token::new(SyntaxKind::Number, text, Span::default());
        assert_eq!(VarType::of_literal(&number("5")), Some(VarType::Integer));
        assert_eq!(VarType::of_literal(&number("5.0")), Some(VarType::Decimal));
        assert_eq!(
            VarType::of_literal(&Token::new(SyntaxKind::StringLiteral, "5", Span::default())),
            Some(VarType::String)
        );
        assert_eq!(
            VarType::of_literal(&Token::new(SyntaxKind::Ident, "x", Span::default())),
            None
        );
    }
}
