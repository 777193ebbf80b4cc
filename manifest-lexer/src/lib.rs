//! Recovering tokenizer for manifest headers.
//!
//! ```
//! use manifest_lexer::{token::TokenKind, tokenize};
//!
//! let stream = tokenize("Bundle-Name: Example\nImport-Package: a,\n b\n");
//! let values: Vec<_> = stream
//!     .tokens()
//!     .iter()
//!     .filter(|token| token.kind == TokenKind::Value)
//!     .map(|token| token.text.as_str())
//!     .collect();
//! assert_eq!(values, ["Example", "a,b"]);
//! assert!(!stream.contains_problems());
//! ```

pub mod chars;
mod lexer;
pub mod problem;
pub mod token;
pub mod token_stream;

pub use lexer::*;
