//! lute-lex - Lexer (Lexical Analyzer)
//!
//! Transforms Lute source text into a stream of positioned tokens:
//!
//! ```text
//! Source Text  ->  Cursor  ->  Token Stream (ends with Eof)
//! ```
//!
//! Lexical rules:
//!
//! - Whitespace separates tokens and is otherwise ignored.
//! - `#` starts a comment running to the end of the line; a pair of
//!   backslashes (`\ ... \`) delimits a block comment.
//! - String literals use `'` or `"` with the escapes
//!   `\n \t \r \b \f \a \\ \" \'`; anything else after a backslash is a
//!   syntax error.
//! - Numbers are runs of digits and `_` (underscores are skipped). A single
//!   `.` makes the literal a float; `..` inside a number ends the literal
//!   and becomes the range operator, so `0..3` lexes as `0`, `..`, `3`.
//! - Identifiers are ASCII `[A-Za-z_][A-Za-z0-9_]*`. A spelling present in
//!   the [`KeywordTable`] becomes a keyword token instead; the table is
//!   configurable by the embedder.
//! - Multi-character operators: `==`, `!=`, `<=`, `>=`, `..`. A `!` not
//!   followed by `=` is a syntax error.
//!
//! Every token records the position of its first character, and every error
//! carries the position it was detected at.

pub mod cursor;
pub mod keyword;
pub mod lexer;
pub mod token;

mod edge_cases;

pub use keyword::{KeywordKind, KeywordTable};
pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};
