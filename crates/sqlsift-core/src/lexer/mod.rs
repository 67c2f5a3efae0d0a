//! Lexical analysis: SQL text to a sentinel-terminated token stream.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{tokenize, Lexer};
