//! lute-par - Parser (Syntactic Analyzer)
//!
//! Recursive descent over the token stream, with one token of lookahead and
//! chained postfix parsing. One function per grammar level keeps precedence
//! explicit:
//!
//! ```text
//! program     := statement*
//! statement   := keyword_stmt | expression
//! expression  := range ( ('and'|'or') range )*
//! range       := comparison ( '..' comparison )?
//! comparison  := additive ( ('<'|'>'|'<='|'>='|'=='|'!=') additive )*
//! additive    := term ( ('+'|'-') term )*
//! term        := pre_unary ( ('*'|'/'|'%') pre_unary )*
//! pre_unary   := ('not')* postfix
//! postfix     := primary ( call | index ('=' expression)? | '.' primary )*
//! primary     := literal | ident | '(' expression ')' | list | dict
//!              | ('+'|'-') expression | funcDef
//! ```
//!
//! A call after a bare identifier becomes [`Node::Call`]; a call after any
//! other expression becomes [`Node::CallExpr`]. An identifier directly
//! followed by `=` is an assignment. All parse failures are positioned
//! syntax errors and abort the parse.

pub mod ast;

mod edge_cases;
mod expr;
mod stmt;

pub use ast::{ArgList, BinOp, LogicalOp, Node, UnaryOp};

use lute_lex::{KeywordKind, Token, TokenKind};
use lute_util::{Error, ErrorKind, LuteResult};

/// The recursive-descent parser.
pub struct Parser {
    /// Token stream, always terminated by an `Eof` token.
    tokens: Vec<Token>,

    /// Index of the token currently under consideration.
    current: usize,
}

/// Parses a token stream into a [`Node::Program`].
///
/// # Example
///
/// ```
/// use lute_lex::{tokenize, KeywordTable};
/// use lute_par::parse;
///
/// let tokens = tokenize("demo.lute", "1 + 2", &KeywordTable::default()).unwrap();
/// let program = parse(tokens).unwrap();
/// assert_eq!(program.to_json()["type"], "Program");
/// ```
pub fn parse(tokens: Vec<Token>) -> LuteResult<Node> {
    Parser::new(tokens).program()
}

impl Parser {
    /// Creates a parser over `tokens`.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::eof());
        }
        Self { tokens, current: 0 }
    }

    /// Parses the whole stream as a program.
    pub fn program(&mut self) -> LuteResult<Node> {
        let tok = self.token().clone();
        let mut statements = Vec::new();
        while !self.at(TokenKind::Eof) {
            statements.push(self.statement()?);
        }
        Ok(Node::Program { statements, tok })
    }

    // =========================================================================
    // Token cursor helpers
    // =========================================================================

    /// The token under consideration.
    fn token(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// One token of lookahead.
    fn peek(&self) -> &Token {
        let next = (self.current + 1).min(self.tokens.len() - 1);
        &self.tokens[next]
    }

    /// Consumes and returns the current token. The final `Eof` is sticky.
    fn advance(&mut self) -> Token {
        let tok = self.token().clone();
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
        tok
    }

    /// True if the current token has the given kind.
    fn at(&self, kind: TokenKind) -> bool {
        self.token().kind == kind
    }

    /// True if the current token is the given keyword.
    fn at_keyword(&self, kind: KeywordKind) -> bool {
        self.token().is_keyword(kind)
    }

    /// Consumes a token of the given kind or fails with a syntax error.
    fn expect(&mut self, kind: TokenKind) -> LuteResult<Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(Error::syntax(
                format!("invalid syntax: found {}, expected '{kind}'", self.token()),
                self.token().pos.clone(),
            ))
        }
    }

    /// Consumes the given keyword or fails with a syntax error.
    fn expect_keyword(&mut self, kind: KeywordKind) -> LuteResult<Token> {
        if self.at_keyword(kind) {
            Ok(self.advance())
        } else {
            Err(Error::syntax(
                format!(
                    "invalid syntax: found {}, expected keyword \"{}\"",
                    self.token(),
                    kind.default_spelling()
                ),
                self.token().pos.clone(),
            ))
        }
    }

    /// An `Unimplemented` error for a keyword the parser has no rule for.
    fn unsupported_keyword(&self) -> Error {
        Error::new(
            ErrorKind::Unimplemented,
            format!("keyword \"{}\" is not yet supported here", self.token().lexeme),
            self.token().pos.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lute_lex::{tokenize, KeywordTable};

    fn parse_src(source: &str) -> LuteResult<Node> {
        let tokens = tokenize("test.lute", source, &KeywordTable::default())?;
        parse(tokens)
    }

    fn json(source: &str) -> serde_json::Value {
        parse_src(source).unwrap().to_json()
    }

    #[test]
    fn test_empty_program() {
        let program = json("");
        assert_eq!(program["type"], "Program");
        assert_eq!(program["statements"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let program = json("1 + 2 * 3");
        let top = &program["statements"][0];
        assert_eq!(top["op"], "+");
        assert_eq!(top["rhs"]["op"], "*");
        assert_eq!(top["rhs"]["lhs"]["value"], 2);
    }

    #[test]
    fn test_left_associativity() {
        let program = json("1 - 2 - 3");
        let top = &program["statements"][0];
        assert_eq!(top["op"], "-");
        assert_eq!(top["lhs"]["op"], "-");
        assert_eq!(top["rhs"]["value"], 3);
    }

    #[test]
    fn test_comparison_binds_looser_than_add() {
        let program = json("1 + 1 == 2");
        let top = &program["statements"][0];
        assert_eq!(top["op"], "==");
        assert_eq!(top["lhs"]["op"], "+");
    }

    #[test]
    fn test_logical_binds_loosest() {
        let program = json("1 < 2 and 3 < 4");
        let top = &program["statements"][0];
        assert_eq!(top["type"], "LogicalOp");
        assert_eq!(top["op"], "and");
        assert_eq!(top["lhs"]["op"], "<");
    }

    #[test]
    fn test_range_expression() {
        let program = json("0..3");
        let top = &program["statements"][0];
        assert_eq!(top["type"], "Range");
        assert_eq!(top["start"]["value"], 0);
        assert_eq!(top["end"]["value"], 3);
    }

    #[test]
    fn test_assignment() {
        let program = json("x = 1 + 2");
        let top = &program["statements"][0];
        assert_eq!(top["type"], "Assign");
        assert_eq!(top["name"], "x");
        assert_eq!(top["value"]["op"], "+");
    }

    #[test]
    fn test_call_and_call_expr() {
        let program = json("f(1)(2)");
        let top = &program["statements"][0];
        assert_eq!(top["type"], "CallExpr");
        assert_eq!(top["callee"]["type"], "Call");
        assert_eq!(top["callee"]["name"], "f");
    }

    #[test]
    fn test_member_chain() {
        let program = json("a.b.c");
        let top = &program["statements"][0];
        assert_eq!(top["type"], "MemberAccess");
        assert_eq!(top["object"]["type"], "MemberAccess");
        assert_eq!(top["member"]["name"], "c");
    }

    #[test]
    fn test_index_and_index_assign() {
        let program = json("xs[0] xs[1] = 9");
        let read = &program["statements"][0];
        assert_eq!(read["type"], "Index");
        let write = &program["statements"][1];
        assert_eq!(write["type"], "IndexAssign");
        assert_eq!(write["value"]["value"], 9);
    }

    #[test]
    fn test_parser_determinism() {
        let source = "fn f(a, b = 2) { return a + b } f(1, b = 3);";
        assert_eq!(json(source), json(source));
    }

    #[test]
    fn test_unexpected_token_is_syntax_error() {
        let err = parse_src(")").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_unsupported_keyword_statement() {
        let err = parse_src("from").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unimplemented);
    }
}
