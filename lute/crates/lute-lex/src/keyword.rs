//! Configurable keyword table.
//!
//! Keywords are not baked into the lexer: every keyword has a [`KeywordKind`]
//! and a spelling looked up in a [`KeywordTable`]. Embedders can respell any
//! keyword before lexing, so a host could ship `si`/`sino` instead of
//! `if`/`else` without touching the grammar.

use indexmap::IndexMap;

/// The fixed set of keyword roles in the language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    If,
    Elseif,
    Else,
    Fn,
    While,
    Break,
    For,
    Struct,
    And,
    Or,
    Not,
    Return,
    From,
    Import,
}

impl KeywordKind {
    /// All keyword kinds, in declaration order.
    pub const ALL: [KeywordKind; 14] = [
        KeywordKind::If,
        KeywordKind::Elseif,
        KeywordKind::Else,
        KeywordKind::Fn,
        KeywordKind::While,
        KeywordKind::Break,
        KeywordKind::For,
        KeywordKind::Struct,
        KeywordKind::And,
        KeywordKind::Or,
        KeywordKind::Not,
        KeywordKind::Return,
        KeywordKind::From,
        KeywordKind::Import,
    ];

    /// The default spelling of this keyword.
    pub fn default_spelling(&self) -> &'static str {
        match self {
            KeywordKind::If => "if",
            KeywordKind::Elseif => "elseif",
            KeywordKind::Else => "else",
            KeywordKind::Fn => "fn",
            KeywordKind::While => "while",
            KeywordKind::Break => "break",
            KeywordKind::For => "for",
            KeywordKind::Struct => "struct",
            KeywordKind::And => "and",
            KeywordKind::Or => "or",
            KeywordKind::Not => "not",
            KeywordKind::Return => "return",
            KeywordKind::From => "from",
            KeywordKind::Import => "import",
        }
    }
}

/// Maps keyword roles to their current spellings.
///
/// # Example
///
/// ```
/// use lute_lex::keyword::{KeywordKind, KeywordTable};
///
/// let mut table = KeywordTable::default();
/// assert_eq!(table.spelling(KeywordKind::Fn), "fn");
/// table.respell(KeywordKind::Fn, "func");
/// assert_eq!(table.lookup("func"), Some(KeywordKind::Fn));
/// assert_eq!(table.lookup("fn"), None);
/// ```
#[derive(Clone, Debug)]
pub struct KeywordTable {
    spellings: IndexMap<KeywordKind, String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        let spellings = KeywordKind::ALL
            .iter()
            .map(|kind| (*kind, kind.default_spelling().to_string()))
            .collect();
        Self { spellings }
    }
}

impl KeywordTable {
    /// The current spelling of `kind`.
    pub fn spelling(&self, kind: KeywordKind) -> &str {
        &self.spellings[&kind]
    }

    /// Replaces the spelling of `kind`.
    pub fn respell(&mut self, kind: KeywordKind, spelling: impl Into<String>) {
        self.spellings.insert(kind, spelling.into());
    }

    /// Finds the keyword spelled `ident`, if any.
    pub fn lookup(&self, ident: &str) -> Option<KeywordKind> {
        self.spellings
            .iter()
            .find(|(_, spelling)| spelling.as_str() == ident)
            .map(|(kind, _)| *kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spellings() {
        let table = KeywordTable::default();
        assert_eq!(table.spelling(KeywordKind::If), "if");
        assert_eq!(table.spelling(KeywordKind::Elseif), "elseif");
        assert_eq!(table.spelling(KeywordKind::Import), "import");
    }

    #[test]
    fn test_lookup_roundtrip() {
        let table = KeywordTable::default();
        for kind in KeywordKind::ALL {
            assert_eq!(table.lookup(kind.default_spelling()), Some(kind));
        }
        assert_eq!(table.lookup("banana"), None);
    }

    #[test]
    fn test_respell() {
        let mut table = KeywordTable::default();
        table.respell(KeywordKind::While, "loop");
        assert_eq!(table.spelling(KeywordKind::While), "loop");
        assert_eq!(table.lookup("loop"), Some(KeywordKind::While));
        assert_eq!(table.lookup("while"), None);
    }
}
