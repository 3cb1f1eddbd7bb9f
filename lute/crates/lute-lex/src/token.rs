//! Token model.
//!
//! A [`Token`] is a kind, the raw lexeme, and the [`Position`] of its first
//! character. Literal payloads stay in the lexeme; the parser converts them
//! when it builds AST nodes, so the token stream remains a faithful record
//! of the source.

use std::fmt;

use lute_util::Position;

use crate::keyword::KeywordKind;

/// The kind of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// A string literal (lexeme holds the unescaped content).
    Str,
    /// An integer literal.
    Int,
    /// A floating-point literal.
    Float,

    // Brackets
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,

    // Arithmetic
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,

    // Punctuation
    /// `.`
    Dot,
    /// `..` - the range operator
    DotDot,
    /// `,`
    Comma,
    /// `;`
    Semi,
    /// `:`
    Colon,
    /// `=`
    Eq,

    // Comparisons
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,

    // Names
    /// An identifier.
    Ident,
    /// A keyword, resolved through the keyword table.
    Keyword(KeywordKind),

    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Str => "string",
            TokenKind::Int => "int",
            TokenKind::Float => "float",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Colon => ":",
            TokenKind::Eq => "=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Ident => "identifier",
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Eof => "end of file",
        };
        f.write_str(text)
    }
}

/// A single token with its source position.
#[derive(Clone, Debug)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,

    /// The raw text of the token (unescaped content for strings).
    pub lexeme: String,

    /// Position of the first character of the token.
    pub pos: Position,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            pos,
        }
    }

    /// A synthetic end-of-file token, for tests and synthesized values.
    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "", Position::dummy())
    }

    /// True if this token has the given kind.
    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// True if this token is the given keyword.
    #[inline]
    pub fn is_keyword(&self, kind: KeywordKind) -> bool {
        self.kind == TokenKind::Keyword(kind)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident | TokenKind::Str | TokenKind::Int | TokenKind::Float => {
                write!(f, "{} '{}'", self.kind, self.lexeme)
            }
            TokenKind::Keyword(_) => write!(f, "keyword '{}'", self.lexeme),
            _ => write!(f, "'{}'", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(TokenKind::DotDot.to_string(), "..");
        assert_eq!(TokenKind::NotEq.to_string(), "!=");
        assert_eq!(TokenKind::Ident.to_string(), "identifier");
    }

    #[test]
    fn test_token_predicates() {
        let tok = Token::new(
            TokenKind::Keyword(KeywordKind::Fn),
            "fn",
            Position::dummy(),
        );
        assert!(tok.is(TokenKind::Keyword(KeywordKind::Fn)));
        assert!(tok.is_keyword(KeywordKind::Fn));
        assert!(!tok.is_keyword(KeywordKind::If));
    }

    #[test]
    fn test_token_display() {
        let tok = Token::new(TokenKind::Int, "42", Position::dummy());
        assert_eq!(tok.to_string(), "int '42'");
        assert_eq!(Token::eof().to_string(), "'end of file'");
    }
}
