//! Lexical input: tokenizer, escapes and the lexical-unit tree values are
//! built from.

pub mod escape;
pub mod parser;
pub mod tokenizer;
pub mod unit;

pub use parser::{parse, LexicalError};
pub use unit::{LexicalUnit, Operator};
