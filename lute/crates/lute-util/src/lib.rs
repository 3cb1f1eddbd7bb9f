//! lute-util - Shared infrastructure for the Lute interpreter.
//!
//! This crate holds the types every phase of the pipeline needs:
//!
//! - [`Position`] - a source location (line, row, file name, source text)
//!   attached to every token, AST node and error.
//! - [`Error`] / [`ErrorKind`] - the structured interpreter error that flows
//!   through lexing, parsing and evaluation, and its caret-style rendering.
//! - [`LuteResult`] - the `Result` alias used across the workspace.
//!
//! Nothing in here knows about tokens, AST nodes or values; the dependency
//! arrow always points from the phase crates to this one.

pub mod error;
pub mod position;

pub use error::{Error, ErrorKind, LuteResult};
pub use position::Position;
