use thiserror::Error;

/// A condition string that is not a `lhs op rhs` triple.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("invalid condition format: `{0}` (expected `lhs op rhs`)")]
    MissingField(String),
    #[error("invalid condition format: `{0}` (only a single `lhs op rhs` comparison is supported)")]
    TrailingField(String),
    #[error("unknown operator `{op}` in condition `{condition}`")]
    UnknownOperator { condition: String, op: String },
}

/// A line of IR text that fits none of the instruction shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed IR on line {line}: `{text}` ({reason})")]
pub struct IrParseError {
    /// 1-based line number inside the IR text.
    pub line: usize,
    pub text: String,
    pub reason: &'static str,
}

impl IrParseError {
    pub(crate) fn new(line: usize, text: &str, reason: &'static str) -> Self {
        Self {
            line,
            text: text.to_owned(),
            reason,
        }
    }
}
