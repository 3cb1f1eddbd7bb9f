//! Structured interpreter errors.
//!
//! Every failure in the pipeline is an [`Error`]: a kind out of a fixed
//! taxonomy, a message, and the [`Position`] of the failure site. Lexer and
//! parser errors terminate the run; evaluator errors travel back through the
//! ordinary `Result` channel until the driver renders them.
//!
//! Rendering shows the file, the 1-based line and row, the offending source
//! line, and a caret span:
//!
//! ```text
//! NameError: variable 'a' is not defined
//!     at demo.lute:3:9
//! println(a);
//!         ^^
//! ```

use std::fmt;

use crate::Position;

/// The error taxonomy of the interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Catch-all for failures raised by user code (`error("...")`).
    Generic,
    /// Malformed source detected while lexing or parsing.
    Syntax,
    /// A well-formed program doing something the runtime cannot.
    Runtime,
    /// An identifier that is not bound in the current scope.
    Name,
    /// Division or modulo with a zero divisor.
    ZeroDivision,
    /// A construct the implementation knows about but does not support.
    Unimplemented,
    /// An index outside the bounds of its collection.
    Index,
    /// A module that could not be resolved, read, parsed or queried.
    Import,
    /// An operation applied to operands of unsupported types.
    Type,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Generic => "Error",
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Runtime => "RunTimeError",
            ErrorKind::Name => "NameError",
            ErrorKind::ZeroDivision => "ZeroDivisionError",
            ErrorKind::Unimplemented => "UnimplementedError",
            ErrorKind::Index => "IndexError",
            ErrorKind::Import => "ImportError",
            ErrorKind::Type => "TypeError",
        };
        f.write_str(name)
    }
}

/// A positioned interpreter error.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{}", self.render())]
pub struct Error {
    /// Which family of failure this is.
    pub kind: ErrorKind,

    /// Human-readable description of the failure.
    pub message: String,

    /// Where in the source the failure happened.
    pub pos: Position,
}

/// Result alias used throughout the interpreter.
pub type LuteResult<T> = Result<T, Error>;

impl Error {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            pos,
        }
    }

    /// Shorthand for a syntax error.
    pub fn syntax(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::Syntax, message, pos)
    }

    /// Shorthand for a runtime error.
    pub fn runtime(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::Runtime, message, pos)
    }

    /// Shorthand for a name error.
    pub fn name(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::Name, message, pos)
    }

    /// Shorthand for a type error.
    pub fn type_error(message: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::Type, message, pos)
    }

    /// Renders the error with its source line and caret span.
    pub fn render(&self) -> String {
        let mut out = format!(
            "{}: {}\n\tat {}:{}:{}",
            self.kind,
            self.message,
            self.pos.file_name,
            self.pos.line + 1,
            self.pos.row + 1
        );

        let line = self.pos.source_line();
        if !line.is_empty() {
            let row = self.pos.row as usize;
            let carets = line.chars().count().saturating_sub(row).max(1);
            out.push('\n');
            out.push_str(line);
            out.push('\n');
            out.push_str(&" ".repeat(row.min(line.chars().count())));
            out.push_str(&"^".repeat(carets));
        }
        out
    }
}
