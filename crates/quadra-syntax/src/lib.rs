//! Front half of the Quadra pipeline: tokens, symbols, and a parser that
//! validates the program while emitting its quadruples.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbols;

pub use error::SyntaxError;
pub use lexer::{Lexer, Span, SyntaxKind, Token, lex};
pub use parser::Parser;
pub use symbols::{SymbolTable, VarType};

use libquadra::IrProgram;
use tracing::debug;

/// Tokenizes and parses `source`, returning its IR or the first fatal error.
pub fn compile(source: &str) -> Result<IrProgram, SyntaxError> {
    let tokens = lex(source);
    debug!(tokens = tokens.len(), "lexed source");
    Parser::new(tokens).parse()
}
