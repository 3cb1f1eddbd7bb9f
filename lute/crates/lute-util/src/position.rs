//! Source location tracking.
//!
//! A [`Position`] pins down a single point in a script: the line, the row
//! (column) within the line, and shared handles on the file name and the
//! complete source text. Carrying the source along makes positions
//! self-contained: an error produced deep inside an imported module can be
//! rendered long after that module's run has finished, without consulting a
//! side table.

use std::fmt;
use std::sync::Arc;

/// A location in a source file.
///
/// `line` and `row` are 0-based internally and rendered 1-based. The row
/// advances once per character and resets to zero on a newline.
///
/// # Example
///
/// ```
/// use lute_util::Position;
///
/// let mut pos = Position::start("demo.lute", "a\nb");
/// pos.advance('a');
/// pos.advance('\n');
/// assert_eq!(pos.line, 1);
/// assert_eq!(pos.row, 0);
/// ```
#[derive(Clone, Debug)]
pub struct Position {
    /// 0-based line number.
    pub line: u32,

    /// 0-based character column within the line.
    pub row: u32,

    /// Name of the file this position points into.
    pub file_name: Arc<str>,

    /// Complete source text of that file.
    pub source: Arc<str>,
}

impl Position {
    /// Creates a position at the very start of `source`.
    pub fn start(file_name: &str, source: &str) -> Self {
        Self {
            line: 0,
            row: 0,
            file_name: Arc::from(file_name),
            source: Arc::from(source),
        }
    }

    /// A position with no backing source, for tests and synthesized values.
    pub fn dummy() -> Self {
        Self::start("", "")
    }

    /// Advances past `ch`, updating line and row accordingly.
    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.row = 0;
        } else {
            self.row += 1;
        }
    }

    /// The text of the line this position points at, without its newline.
    pub fn source_line(&self) -> &str {
        self.source.lines().nth(self.line as usize).unwrap_or("")
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position() {
        let pos = Position::start("x.lute", "abc");
        assert_eq!(pos.line, 0);
        assert_eq!(pos.row, 0);
        assert_eq!(&*pos.file_name, "x.lute");
    }

    #[test]
    fn test_advance_tracks_rows() {
        let mut pos = Position::start("x.lute", "ab");
        pos.advance('a');
        pos.advance('b');
        assert_eq!(pos.line, 0);
        assert_eq!(pos.row, 2);
    }

    #[test]
    fn test_newline_resets_row() {
        let mut pos = Position::start("x.lute", "a\nbb");
        pos.advance('a');
        pos.advance('\n');
        pos.advance('b');
        assert_eq!(pos.line, 1);
        assert_eq!(pos.row, 1);
    }

    #[test]
    fn test_display_is_one_based() {
        let pos = Position::start("x.lute", "abc");
        assert_eq!(pos.to_string(), "1:1");
    }

    #[test]
    fn test_source_line() {
        let mut pos = Position::start("x.lute", "first\nsecond");
        assert_eq!(pos.source_line(), "first");
        for ch in "first\n".chars() {
            pos.advance(ch);
        }
        assert_eq!(pos.source_line(), "second");
    }
}
