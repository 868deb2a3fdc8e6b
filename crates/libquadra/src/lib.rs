//! Back half of the Quadra pipeline.
//!
//! - `ir` holds the quadruple value object and its line-oriented text form.
//! - `emitter` builds a quadruple sequence with fresh temporaries and labels.
//! - `asm` rewrites IR text into pseudo-assembly, one template per line.
//! - `config` names the files the two pipeline stages hand to each other.

pub mod asm;
pub mod config;
pub mod emitter;
pub mod error;
pub mod ir;

pub use asm::assemble;
pub use config::Config;
pub use emitter::IrEmitter;
pub use error::{ConditionError, IrParseError};
pub use ir::{BinOp, IrProgram, Literal, Quad};
