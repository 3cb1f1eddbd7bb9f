//! Main lexer implementation.
//!
//! The lexer walks the source with a [`Cursor`] and dispatches on the first
//! character of every token. Whitespace is skipped, `#` starts a line
//! comment, and a pair of backslashes delimits a block comment. All failures
//! are positioned syntax errors; on success the token stream always ends
//! with [`TokenKind::Eof`].

use std::sync::Arc;

use lute_util::{Error, LuteResult, Position};

use crate::cursor::Cursor;
use crate::keyword::KeywordTable;
use crate::token::{Token, TokenKind};

/// The lexer for Lute source code.
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// Keyword spellings to resolve identifiers against.
    keywords: &'a KeywordTable,

    /// Shared handle on the file name, copied into every position.
    file_name: Arc<str>,

    /// Shared handle on the source text, copied into every position.
    source: Arc<str>,

    /// Tokens produced so far.
    tokens: Vec<Token>,
}

/// Tokenizes `source`, resolving keywords through `keywords`.
///
/// # Example
///
/// ```
/// use lute_lex::{tokenize, KeywordTable, TokenKind};
///
/// let tokens = tokenize("demo.lute", "x = 1", &KeywordTable::default()).unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::Ident);
/// assert_eq!(tokens[1].kind, TokenKind::Eq);
/// assert_eq!(tokens[2].kind, TokenKind::Int);
/// assert_eq!(tokens[3].kind, TokenKind::Eof);
/// ```
pub fn tokenize(
    file_name: &str,
    source: &str,
    keywords: &KeywordTable,
) -> LuteResult<Vec<Token>> {
    Lexer::new(file_name, source, keywords).run()
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`.
    pub fn new(file_name: &str, source: &'a str, keywords: &'a KeywordTable) -> Self {
        Self {
            cursor: Cursor::new(source),
            keywords,
            file_name: Arc::from(file_name),
            source: Arc::from(source),
            tokens: Vec::new(),
        }
    }

    /// Consumes the whole source, producing an `Eof`-terminated stream.
    pub fn run(mut self) -> LuteResult<Vec<Token>> {
        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();

            if c.is_whitespace() {
                self.cursor.advance();
                continue;
            }

            match c {
                '#' => self.skip_line_comment(),
                '\\' => self.skip_block_comment(),
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                '[' => self.single(TokenKind::LBracket),
                ']' => self.single(TokenKind::RBracket),
                '+' => self.single(TokenKind::Plus),
                '-' => self.single(TokenKind::Minus),
                '*' => self.single(TokenKind::Star),
                '/' => self.single(TokenKind::Slash),
                '%' => self.single(TokenKind::Percent),
                ',' => self.single(TokenKind::Comma),
                ';' => self.single(TokenKind::Semi),
                ':' => self.single(TokenKind::Colon),
                '.' => self.lex_dot(),
                '=' => self.lex_eq(),
                '<' => self.lex_less(),
                '>' => self.lex_greater(),
                '!' => self.lex_bang()?,
                '\'' | '"' => self.lex_string()?,
                _ if c.is_ascii_digit() => self.lex_number()?,
                _ if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
                _ => {
                    return Err(Error::syntax(
                        format!("unknown character '{c}'"),
                        self.pos(),
                    ));
                }
            }
        }

        let pos = self.pos();
        self.tokens.push(Token::new(TokenKind::Eof, "", pos));
        Ok(self.tokens)
    }

    /// Position of the character currently under the cursor.
    fn pos(&self) -> Position {
        Position {
            line: self.cursor.line(),
            row: self.cursor.row(),
            file_name: Arc::clone(&self.file_name),
            source: Arc::clone(&self.source),
        }
    }

    /// Emits a one-character token and consumes it.
    fn single(&mut self, kind: TokenKind) {
        let pos = self.pos();
        let lexeme = self.cursor.current_char().to_string();
        self.cursor.advance();
        self.tokens.push(Token::new(kind, lexeme, pos));
    }

    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.cursor.advance();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\\' {
            self.cursor.advance();
        }
        self.cursor.advance();
    }

    fn lex_dot(&mut self) {
        let pos = self.pos();
        self.cursor.advance();
        if self.cursor.current_char() == '.' {
            self.cursor.advance();
            self.tokens.push(Token::new(TokenKind::DotDot, "..", pos));
        } else {
            self.tokens.push(Token::new(TokenKind::Dot, ".", pos));
        }
    }

    fn lex_eq(&mut self) {
        let pos = self.pos();
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.tokens.push(Token::new(TokenKind::EqEq, "==", pos));
        } else {
            self.tokens.push(Token::new(TokenKind::Eq, "=", pos));
        }
    }

    fn lex_less(&mut self) {
        let pos = self.pos();
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.tokens.push(Token::new(TokenKind::LtEq, "<=", pos));
        } else {
            self.tokens.push(Token::new(TokenKind::Lt, "<", pos));
        }
    }

    fn lex_greater(&mut self) {
        let pos = self.pos();
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.tokens.push(Token::new(TokenKind::GtEq, ">=", pos));
        } else {
            self.tokens.push(Token::new(TokenKind::Gt, ">", pos));
        }
    }

    /// `!` is only valid as the start of `!=`.
    fn lex_bang(&mut self) -> LuteResult<()> {
        let pos = self.pos();
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.tokens.push(Token::new(TokenKind::NotEq, "!=", pos));
            Ok(())
        } else {
            Err(Error::syntax("unexpected character '!'", pos))
        }
    }

    /// Lexes a string literal delimited by `'` or `"`.
    ///
    /// The lexeme holds the unescaped content. Newlines are allowed inside
    /// the literal; end of input before the closing quote is an error.
    fn lex_string(&mut self) -> LuteResult<()> {
        let pos = self.pos();
        let quote = self.cursor.current_char();
        self.cursor.advance();

        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(Error::syntax("unterminated string literal", pos));
            }

            let c = self.cursor.current_char();
            if c == quote {
                self.cursor.advance();
                break;
            }

            if c == '\\' {
                let escape_pos = self.pos();
                self.cursor.advance();
                let escaped = match self.cursor.current_char() {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    'b' => '\u{0008}',
                    'f' => '\u{000C}',
                    'a' => '\u{0007}',
                    '\\' => '\\',
                    '"' => '"',
                    '\'' => '\'',
                    _ => {
                        return Err(Error::syntax("unknown escape character", escape_pos));
                    }
                };
                content.push(escaped);
                self.cursor.advance();
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        self.tokens.push(Token::new(TokenKind::Str, content, pos));
        Ok(())
    }

    /// Lexes an integer or float literal.
    ///
    /// Underscores are skipped, a single `.` promotes the literal to a
    /// float, and a `..` cuts the literal short: the digits collected so far
    /// are emitted, followed by the range operator.
    fn lex_number(&mut self) -> LuteResult<()> {
        let pos = self.pos();
        let mut text = String::new();
        let mut dot_found = false;

        loop {
            let c = self.cursor.current_char();
            if c.is_ascii_digit() {
                text.push(c);
                self.cursor.advance();
            } else if c == '_' {
                self.cursor.advance();
            } else if c == '.' {
                if self.cursor.peek_char(1) == '.' {
                    // Range operator: emit what we have, then `..`.
                    self.push_number(text, dot_found, pos)?;
                    let dots_pos = self.pos();
                    self.cursor.advance();
                    self.cursor.advance();
                    self.tokens
                        .push(Token::new(TokenKind::DotDot, "..", dots_pos));
                    return Ok(());
                }
                if dot_found {
                    return Err(Error::syntax(
                        "invalid number literal: more than one '.'",
                        self.pos(),
                    ));
                }
                dot_found = true;
                text.push('.');
                self.cursor.advance();
            } else {
                break;
            }
        }

        self.push_number(text, dot_found, pos)
    }

    fn push_number(&mut self, text: String, is_float: bool, pos: Position) -> LuteResult<()> {
        if is_float {
            text.parse::<f64>().map_err(|_| {
                Error::syntax(format!("invalid float literal '{text}'"), pos.clone())
            })?;
            self.tokens.push(Token::new(TokenKind::Float, text, pos));
        } else {
            text.parse::<i64>().map_err(|_| {
                Error::syntax(format!("integer literal '{text}' out of range"), pos.clone())
            })?;
            self.tokens.push(Token::new(TokenKind::Int, text, pos));
        }
        Ok(())
    }

    /// Lexes an identifier, resolving it against the keyword table.
    fn lex_identifier(&mut self) {
        let pos = self.pos();
        let mut ident = String::new();

        loop {
            let c = self.cursor.current_char();
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }

        let kind = match self.keywords.lookup(&ident) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Ident,
        };
        self.tokens.push(Token::new(kind, ident, pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::KeywordKind;

    fn lex(source: &str) -> Vec<Token> {
        tokenize("test.lute", source, &KeywordTable::default()).unwrap()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_simple_statement() {
        assert_eq!(
            kinds("x = 42;"),
            vec![
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Int,
                TokenKind::Semi,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_keywords_resolve_through_table() {
        let tokens = lex("fn if elseif else not");
        assert!(tokens[0].is_keyword(KeywordKind::Fn));
        assert!(tokens[1].is_keyword(KeywordKind::If));
        assert!(tokens[2].is_keyword(KeywordKind::Elseif));
        assert!(tokens[3].is_keyword(KeywordKind::Else));
        assert!(tokens[4].is_keyword(KeywordKind::Not));
    }

    #[test]
    fn test_respelled_keyword() {
        let mut table = KeywordTable::default();
        table.respell(KeywordKind::Fn, "func");
        let tokens = tokenize("t.lute", "func fn", &table).unwrap();
        assert!(tokens[0].is_keyword(KeywordKind::Fn));
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("1 23 4.5 1_000");
        assert_eq!(tokens[0].lexeme, "1");
        assert_eq!(tokens[1].lexeme, "23");
        assert_eq!(tokens[2].kind, TokenKind::Float);
        assert_eq!(tokens[2].lexeme, "4.5");
        assert_eq!(tokens[3].kind, TokenKind::Int);
        assert_eq!(tokens[3].lexeme, "1000");
    }

    #[test]
    fn test_range_cuts_number() {
        assert_eq!(
            kinds("0..3"),
            vec![
                TokenKind::Int,
                TokenKind::DotDot,
                TokenKind::Int,
                TokenKind::Eof
            ]
        );
        let tokens = lex("10..20");
        assert_eq!(tokens[0].lexeme, "10");
        assert_eq!(tokens[2].lexeme, "20");
    }

    #[test]
    fn test_two_dots_in_number_is_error() {
        let err = tokenize("t.lute", "1.2.3", &KeywordTable::default()).unwrap_err();
        assert!(err.message.contains("more than one '.'"));
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#""a\tb\n" '\''"#);
        assert_eq!(tokens[0].lexeme, "a\tb\n");
        assert_eq!(tokens[1].lexeme, "'");
    }

    #[test]
    fn test_unknown_escape_is_error() {
        let err = tokenize("t.lute", r#""\q""#, &KeywordTable::default()).unwrap_err();
        assert!(err.message.contains("unknown escape"));
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = tokenize("t.lute", "'abc", &KeywordTable::default()).unwrap_err();
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("1 # the rest is ignored\n2"),
            vec![TokenKind::Int, TokenKind::Int, TokenKind::Eof]
        );
        assert_eq!(
            kinds("1 \\ a block\ncomment \\ 2"),
            vec![TokenKind::Int, TokenKind::Int, TokenKind::Eof]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("== != <= >= < > = .."),
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eq,
                TokenKind::DotDot,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_stray_bang_is_error() {
        let err = tokenize("t.lute", "!x", &KeywordTable::default()).unwrap_err();
        assert!(err.message.contains("'!'"));
    }

    #[test]
    fn test_unknown_character_is_error() {
        let err = tokenize("t.lute", "a ? b", &KeywordTable::default()).unwrap_err();
        assert!(err.message.contains("unknown character"));
        assert_eq!(err.pos.row, 2);
    }

    #[test]
    fn test_token_positions() {
        let tokens = lex("ab\n cd");
        assert_eq!((tokens[0].pos.line, tokens[0].pos.row), (0, 0));
        assert_eq!((tokens[1].pos.line, tokens[1].pos.row), (1, 1));
    }
}
