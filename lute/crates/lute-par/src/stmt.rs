//! Statement parsing.
//!
//! A statement is either a keyword-led construct (function, record, control
//! flow, import, `break`) or a plain expression. Keyword dispatch happens on
//! the resolved [`KeywordKind`], so respelled keyword tables parse the same
//! programs.

use std::rc::Rc;

use lute_lex::{KeywordKind, Token, TokenKind};
use lute_util::{Error, LuteResult};

use crate::ast::Node;
use crate::Parser;

impl Parser {
    /// `statement := keyword_stmt | expression`
    ///
    /// Trailing semicolons after a statement are consumed as separators.
    pub(crate) fn statement(&mut self) -> LuteResult<Node> {
        let node = self.statement_inner()?;
        while self.at(TokenKind::Semi) {
            self.advance();
        }
        Ok(node)
    }

    fn statement_inner(&mut self) -> LuteResult<Node> {
        if let TokenKind::Keyword(keyword) = self.token().kind {
            return match keyword {
                KeywordKind::Fn => self.func_def(),
                KeywordKind::Struct => self.record_def(),
                KeywordKind::If => self.if_statement(),
                KeywordKind::Return => self.return_statement(),
                KeywordKind::While => self.while_statement(),
                KeywordKind::For => self.for_statement(),
                KeywordKind::Import => self.import_statement(),
                KeywordKind::Break => {
                    let tok = self.advance();
                    self.expect(TokenKind::Semi)?;
                    Ok(Node::Break { tok })
                }
                _ => Err(self.unsupported_keyword()),
            };
        }

        self.expression()
    }

    /// `{ statement* }`, anchored at `tok`.
    pub(crate) fn scope_block(&mut self, tok: Token) -> LuteResult<Node> {
        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            statements.push(self.statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Node::Block { statements, tok })
    }

    /// `fn name? ( params ) { body }`
    ///
    /// Without a name the function is anonymous and usable only as an
    /// expression.
    pub(crate) fn func_def(&mut self) -> LuteResult<Node> {
        let tok = self.expect_keyword(KeywordKind::Fn)?;

        let (name, is_anon) = if self.at(TokenKind::Ident) {
            (self.advance().lexeme, false)
        } else {
            ("anonymous".to_string(), true)
        };

        let params = self.arg_list(true, tok.clone())?;
        let body = self.scope_block(tok.clone())?;

        Ok(Node::FuncDef {
            name,
            is_anon,
            params,
            body: Rc::new(body),
            tok,
        })
    }

    /// `struct Name { (assignment | funcDef)* }`
    fn record_def(&mut self) -> LuteResult<Node> {
        self.expect_keyword(KeywordKind::Struct)?;
        let name_tok = self.expect(TokenKind::Ident)?;

        self.expect(TokenKind::LBrace)?;
        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            members.push(self.record_member()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(Node::RecordDef {
            name: name_tok.lexeme.clone(),
            members,
            tok: name_tok,
        })
    }

    /// One record member: a default-value assignment or a method.
    fn record_member(&mut self) -> LuteResult<Node> {
        if self.at(TokenKind::Ident) {
            if self.peek().is(TokenKind::Eq) {
                return self.assignment();
            }
            return Err(Error::syntax(
                format!("{} is not allowed inside a struct body", self.token()),
                self.token().pos.clone(),
            ));
        }

        if self.at_keyword(KeywordKind::Fn) {
            return self.func_def();
        }

        if matches!(self.token().kind, TokenKind::Keyword(_)) {
            return Err(self.unsupported_keyword());
        }

        Err(Error::syntax(
            format!("{} is not allowed inside a struct body", self.token()),
            self.token().pos.clone(),
        ))
    }

    /// `if cond { .. } (elseif cond { .. })* (else { .. })?`
    fn if_statement(&mut self) -> LuteResult<Node> {
        let tok = self.expect_keyword(KeywordKind::If)?;
        let cond = self.expression()?;
        let body = self.scope_block(tok.clone())?;

        let mut else_ifs = Vec::new();
        while self.at_keyword(KeywordKind::Elseif) {
            let elseif_tok = self.advance();
            let elseif_cond = self.expression()?;
            let elseif_body = self.scope_block(elseif_tok)?;
            else_ifs.push((elseif_cond, elseif_body));
        }

        let else_body = if self.at_keyword(KeywordKind::Else) {
            let else_tok = self.advance();
            Some(Box::new(self.scope_block(else_tok)?))
        } else {
            None
        };

        Ok(Node::If {
            cond: Box::new(cond),
            body: Box::new(body),
            else_ifs,
            else_body,
            tok,
        })
    }

    /// `while cond { body }`
    fn while_statement(&mut self) -> LuteResult<Node> {
        let tok = self.expect_keyword(KeywordKind::While)?;
        let cond = self.expression()?;
        let body = self.scope_block(tok.clone())?;

        Ok(Node::While {
            cond: Box::new(cond),
            body: Box::new(body),
            tok,
        })
    }

    /// `for ident from iterable { body }`
    fn for_statement(&mut self) -> LuteResult<Node> {
        let tok = self.expect_keyword(KeywordKind::For)?;
        let ident_tok = self.expect(TokenKind::Ident)?;
        self.expect_keyword(KeywordKind::From)?;
        let iter = self.expression()?;
        let body = self.scope_block(tok.clone())?;

        Ok(Node::For {
            ident: ident_tok.lexeme,
            iter: Box::new(iter),
            body: Box::new(body),
            tok,
        })
    }

    /// `return expression`
    fn return_statement(&mut self) -> LuteResult<Node> {
        let tok = self.expect_keyword(KeywordKind::Return)?;
        let value = self.expression()?;
        Ok(Node::Return {
            value: Box::new(value),
            tok,
        })
    }

    /// `import "path"` or `import [sym, sym] from "path"`
    fn import_statement(&mut self) -> LuteResult<Node> {
        let tok = self.expect_keyword(KeywordKind::Import)?;

        if self.at(TokenKind::LBracket) {
            self.advance();
            let mut symbols = Vec::new();
            while !self.at(TokenKind::RBracket) && !self.at(TokenKind::Eof) {
                let sym = self.expect(TokenKind::Ident)?;
                symbols.push(sym.lexeme);
                if self.at(TokenKind::RBracket) {
                    break;
                }
                if self.at(TokenKind::Comma) {
                    self.advance();
                }
            }
            self.expect(TokenKind::RBracket)?;
            self.expect_keyword(KeywordKind::From)?;
            let path = self.expect(TokenKind::Str)?;

            return Ok(Node::Import {
                path: path.lexeme,
                symbols,
                import_all: false,
                tok,
            });
        }

        let path = self.expect(TokenKind::Str)?;
        Ok(Node::Import {
            path: path.lexeme,
            symbols: Vec::new(),
            import_all: true,
            tok,
        })
    }
}
