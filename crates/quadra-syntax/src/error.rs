use libquadra::ConditionError;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::symbols::VarType;

/// The first fatal problem found in a program. Parsing stops at it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SyntaxError {
    #[error("unexpected statement at `{found}`")]
    #[diagnostic(code(quadra::syntax::unexpected_statement))]
    UnexpectedStatement {
        found: String,
        #[label("a statement cannot start here")]
        span: SourceSpan,
    },

    #[error("expected {expected}, found `{found}`")]
    #[diagnostic(code(quadra::syntax::expected))]
    Expected {
        expected: &'static str,
        found: String,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("expected `}}` before end of input")]
    #[diagnostic(code(quadra::syntax::unclosed_block))]
    UnclosedBlock {
        #[label("block opened here")]
        open: SourceSpan,
        #[label("input ends here")]
        span: SourceSpan,
    },

    #[error("variable `{name}` already declared")]
    #[diagnostic(
        code(quadra::sema::redeclared),
        help("every variable is declared once for the whole program")
    )]
    Redeclared {
        name: String,
        #[label("declared again here")]
        span: SourceSpan,
    },

    #[error("undeclared variable `{name}`")]
    #[diagnostic(code(quadra::sema::undeclared))]
    Undeclared {
        name: String,
        #[label("not declared")]
        span: SourceSpan,
    },

    #[error("type mismatch: `{declared}` variable `{name}` needs a {expected}")]
    #[diagnostic(code(quadra::sema::initializer_mismatch))]
    InitializerMismatch {
        name: String,
        declared: VarType,
        expected: &'static str,
        #[label("wrong kind of literal")]
        span: SourceSpan,
    },

    #[error("type mismatch in assignment to `{name}`: expected {expected}, got {found}")]
    #[diagnostic(code(quadra::sema::assignment_mismatch))]
    AssignmentMismatch {
        name: String,
        expected: VarType,
        found: VarType,
        #[label("assigned value")]
        span: SourceSpan,
    },

    #[error("{reason}")]
    #[diagnostic(
        code(quadra::syntax::malformed_condition),
        help("conditions are a single comparison such as \"x < 10\"")
    )]
    MalformedCondition {
        reason: ConditionError,
        #[label("in this condition")]
        span: SourceSpan,
    },
}
