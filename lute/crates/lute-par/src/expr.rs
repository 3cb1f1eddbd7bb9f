//! Expression parsing.
//!
//! One function per precedence level, lowest first. Postfix forms (calls,
//! indexing, member access) chain in a loop rather than recursing, so
//! `a.b(1)[2](3)` builds left to right.

use lute_lex::{KeywordKind, Token, TokenKind};
use lute_util::{Error, LuteResult};

use crate::ast::{ArgList, BinOp, LogicalOp, Node, UnaryOp};
use crate::Parser;

impl Parser {
    /// `expression := range ( ('and'|'or') range )*`
    pub(crate) fn expression(&mut self) -> LuteResult<Node> {
        let mut left = self.range_expr()?;

        loop {
            let op = if self.at_keyword(KeywordKind::And) {
                LogicalOp::And
            } else if self.at_keyword(KeywordKind::Or) {
                LogicalOp::Or
            } else {
                break;
            };
            let tok = self.advance();
            let right = self.range_expr()?;
            left = Node::LogicalOp {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
                tok,
            };
        }

        Ok(left)
    }

    /// `range := comparison ( '..' comparison )?`
    fn range_expr(&mut self) -> LuteResult<Node> {
        let left = self.comparison()?;

        if self.at(TokenKind::DotDot) {
            let tok = self.advance();
            let right = self.comparison()?;
            return Ok(Node::Range {
                start: Box::new(left),
                end: Box::new(right),
                tok,
            });
        }

        Ok(left)
    }

    /// `comparison := additive ( cmp-op additive )*`
    fn comparison(&mut self) -> LuteResult<Node> {
        let mut left = self.additive()?;

        loop {
            let op = match self.token().kind {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::LtEq => BinOp::LtEq,
                TokenKind::GtEq => BinOp::GtEq,
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                _ => break,
            };
            let tok = self.advance();
            let right = self.additive()?;
            left = Node::BinOp {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
                tok,
            };
        }

        Ok(left)
    }

    /// `additive := term ( ('+'|'-') term )*`
    fn additive(&mut self) -> LuteResult<Node> {
        let mut left = self.term()?;

        loop {
            let op = match self.token().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let tok = self.advance();
            let right = self.term()?;
            left = Node::BinOp {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
                tok,
            };
        }

        Ok(left)
    }

    /// `term := pre_unary ( ('*'|'/'|'%') pre_unary )*`
    fn term(&mut self) -> LuteResult<Node> {
        let mut left = self.pre_unary()?;

        loop {
            let op = match self.token().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            let tok = self.advance();
            let right = self.pre_unary()?;
            left = Node::BinOp {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
                tok,
            };
        }

        Ok(left)
    }

    /// `pre_unary := ('not')* postfix`
    fn pre_unary(&mut self) -> LuteResult<Node> {
        if self.at_keyword(KeywordKind::Not) {
            let tok = self.advance();
            let rhs = self.pre_unary()?;
            return Ok(Node::UnaryOp {
                op: UnaryOp::Not,
                rhs: Box::new(rhs),
                tok,
            });
        }
        self.postfix()
    }

    /// `postfix := primary ( call | index ('=' expression)? | '.' primary )*`
    fn postfix(&mut self) -> LuteResult<Node> {
        let mut left = self.primary()?;

        loop {
            match self.token().kind {
                TokenKind::LParen => {
                    let tok = self.token().clone();
                    let args = self.arg_list(false, tok.clone())?;
                    left = Node::CallExpr {
                        callee: Box::new(left),
                        args,
                        tok,
                    };
                }
                TokenKind::LBracket => {
                    let tok = self.token().clone();
                    let (args, _) = self.bracket_items()?;
                    if self.at(TokenKind::Eq) {
                        self.advance();
                        let value = self.expression()?;
                        left = Node::IndexAssign {
                            object: Box::new(left),
                            args,
                            value: Box::new(value),
                            tok,
                        };
                    } else {
                        left = Node::Index {
                            object: Box::new(left),
                            args,
                            tok,
                        };
                    }
                }
                TokenKind::Dot => {
                    let tok = self.advance();
                    let member = self.primary()?;
                    left = Node::MemberAccess {
                        object: Box::new(left),
                        member: Box::new(member),
                        tok,
                    };
                }
                _ => break,
            }
        }

        Ok(left)
    }

    /// `primary := literal | identOrAssign | '(' expression ')' | list | dict
    ///           | ('+'|'-') expression | funcDef`
    fn primary(&mut self) -> LuteResult<Node> {
        match self.token().kind {
            TokenKind::Str => {
                let tok = self.advance();
                Ok(Node::Str {
                    value: tok.lexeme.clone(),
                    tok,
                })
            }
            TokenKind::Int => {
                let tok = self.advance();
                let value = tok.lexeme.parse::<i64>().map_err(|_| {
                    Error::syntax(
                        format!("integer literal '{}' out of range", tok.lexeme),
                        tok.pos.clone(),
                    )
                })?;
                Ok(Node::Int { value, tok })
            }
            TokenKind::Float => {
                let tok = self.advance();
                let value = tok.lexeme.parse::<f64>().map_err(|_| {
                    Error::syntax(
                        format!("invalid float literal '{}'", tok.lexeme),
                        tok.pos.clone(),
                    )
                })?;
                Ok(Node::Float { value, tok })
            }
            TokenKind::Ident => {
                if self.peek().is(TokenKind::LParen) {
                    return self.named_call();
                }
                if self.peek().is(TokenKind::Eq) {
                    return self.assignment();
                }
                let tok = self.advance();
                Ok(Node::VarRef {
                    name: tok.lexeme.clone(),
                    tok,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                let tok = self.token().clone();
                let (items, _) = self.bracket_items()?;
                Ok(Node::List { items, tok })
            }
            TokenKind::LBrace => self.dict_literal(),
            TokenKind::Plus | TokenKind::Minus => {
                let tok = self.advance();
                let op = if tok.is(TokenKind::Plus) {
                    UnaryOp::Plus
                } else {
                    UnaryOp::Minus
                };
                // The sign binds the whole following expression; `-1 + 2`
                // negates the sum.
                let rhs = self.expression()?;
                Ok(Node::UnaryOp {
                    op,
                    rhs: Box::new(rhs),
                    tok,
                })
            }
            TokenKind::Keyword(KeywordKind::Fn) => self.func_def(),
            _ => Err(Error::syntax(
                format!("unexpected {} in expression", self.token()),
                self.token().pos.clone(),
            )),
        }
    }

    /// A call of a bare identifier: `name(args)`.
    fn named_call(&mut self) -> LuteResult<Node> {
        let tok = self.expect(TokenKind::Ident)?;
        let args = self.arg_list(false, tok.clone())?;
        Ok(Node::Call {
            name: tok.lexeme.clone(),
            args,
            tok,
        })
    }

    /// `name = expression`, detected at primary position.
    pub(crate) fn assignment(&mut self) -> LuteResult<Node> {
        let tok = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Eq)?;
        let value = self.expression()?;
        Ok(Node::Assign {
            name: tok.lexeme.clone(),
            value: Box::new(value),
            tok,
        })
    }

    /// Parses `( ... )` into an [`ArgList`].
    ///
    /// Bare identifiers are positional entries and `name = expr` entries are
    /// named. In a definition (`is_define`) nothing else is allowed; at a
    /// call site any expression is a valid positional argument.
    pub(crate) fn arg_list(&mut self, is_define: bool, tok: Token) -> LuteResult<ArgList> {
        let mut list = ArgList::empty(tok);

        self.expect(TokenKind::LParen)?;
        while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            let entry = self.expression()?;
            match entry {
                Node::VarRef { .. } => list.args.push(entry),
                Node::Assign { name, value, .. } => {
                    list.named.insert(name, *value);
                }
                _ if is_define => {
                    return Err(Error::syntax("invalid argument", entry.token().pos.clone()));
                }
                _ => list.args.push(entry),
            }

            if self.at(TokenKind::Comma) {
                self.advance();
            }
        }
        self.expect(TokenKind::RParen)?;

        Ok(list)
    }

    /// Parses `[ ... ]` into its item expressions.
    pub(crate) fn bracket_items(&mut self) -> LuteResult<(Vec<Node>, Token)> {
        let tok = self.expect(TokenKind::LBracket)?;
        let mut items = Vec::new();

        while !self.at(TokenKind::RBracket) && !self.at(TokenKind::Eof) {
            items.push(self.expression()?);
            if self.at(TokenKind::Comma) {
                self.advance();
            }
        }
        self.expect(TokenKind::RBracket)?;

        Ok((items, tok))
    }

    /// Parses `{ key: value, ... }`.
    fn dict_literal(&mut self) -> LuteResult<Node> {
        let tok = self.expect(TokenKind::LBrace)?;
        let mut items = Vec::new();

        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let key = self.expression()?;
            self.expect(TokenKind::Colon)?;
            let value = self.expression()?;
            items.push((key, value));

            if self.at(TokenKind::RBrace) {
                break;
            }
            if self.at(TokenKind::Comma) {
                self.advance();
            }
        }
        self.expect(TokenKind::RBrace)?;

        Ok(Node::Dict { items, tok })
    }
}
