//! AST node definitions.
//!
//! The whole tree is one sum type, [`Node`]; statements and expressions are
//! not distinguished at the type level because the evaluator treats every
//! node uniformly (everything evaluates to a value). Each variant keeps the
//! token it grew out of, which is where error positions come from during
//! evaluation.
//!
//! [`Node::to_json`] serializes the tree for debugging; each node becomes a
//! `{"type": "<NodeName>", ...}` object.

use std::rc::Rc;

use indexmap::IndexMap;
use lute_lex::Token;
use serde_json::{json, Value as Json};

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
}

impl BinOp {
    /// The source spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
        }
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

impl UnaryOp {
    /// The source spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "not",
        }
    }
}

/// Logical operators (eager, truthiness-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// The source spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

/// An argument list, shared between call sites and function definitions.
///
/// At a definition the positional entries must be bare names and `named`
/// holds default-value expressions; at a call site positional entries are
/// arbitrary expressions and `named` holds caller-supplied named arguments.
#[derive(Clone, Debug)]
pub struct ArgList {
    /// Positional entries, in source order.
    pub args: Vec<Node>,

    /// Named entries (`name = expr`), in source order.
    pub named: IndexMap<String, Node>,

    /// The token the list is anchored to (usually the callee).
    pub tok: Token,
}

impl ArgList {
    /// An empty argument list anchored at `tok`.
    pub fn empty(tok: Token) -> Self {
        Self {
            args: Vec::new(),
            named: IndexMap::new(),
            tok,
        }
    }

    fn to_json(&self) -> Json {
        let named = self
            .named
            .iter()
            .map(|(name, expr)| {
                let mut entry = serde_json::Map::new();
                entry.insert(name.clone(), expr.to_json());
                Json::Object(entry)
            })
            .collect::<Vec<_>>();
        json!({
            "args": self.args.iter().map(Node::to_json).collect::<Vec<_>>(),
            "named": named,
        })
    }
}

/// A node of the syntax tree.
#[derive(Clone, Debug)]
pub enum Node {
    /// The root of a parsed source file.
    Program { statements: Vec<Node>, tok: Token },

    /// A `{ ... }` body.
    Block { statements: Vec<Node>, tok: Token },

    /// The `none` value, synthesized where the grammar needs a placeholder.
    None { tok: Token },

    /// An integer literal.
    Int { value: i64, tok: Token },

    /// A float literal.
    Float { value: f64, tok: Token },

    /// A string literal.
    Str { value: String, tok: Token },

    /// A list literal.
    List { items: Vec<Node>, tok: Token },

    /// A dictionary literal (key/value pairs in source order).
    Dict { items: Vec<(Node, Node)>, tok: Token },

    /// A half-open integer range `start..end`.
    Range {
        start: Box<Node>,
        end: Box<Node>,
        tok: Token,
    },

    /// `break`.
    Break { tok: Token },

    /// A variable read.
    VarRef { name: String, tok: Token },

    /// `name = expr`.
    Assign {
        name: String,
        value: Box<Node>,
        tok: Token,
    },

    /// `object.member` or `object.method(...)`.
    MemberAccess {
        object: Box<Node>,
        member: Box<Node>,
        tok: Token,
    },

    /// `object[args]`.
    Index {
        object: Box<Node>,
        args: Vec<Node>,
        tok: Token,
    },

    /// `object[args] = value`.
    IndexAssign {
        object: Box<Node>,
        args: Vec<Node>,
        value: Box<Node>,
        tok: Token,
    },

    /// A binary operation.
    BinOp {
        op: BinOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
        tok: Token,
    },

    /// A prefix operation.
    UnaryOp {
        op: UnaryOp,
        rhs: Box<Node>,
        tok: Token,
    },

    /// An eager `and`/`or`.
    LogicalOp {
        op: LogicalOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
        tok: Token,
    },

    /// A function definition, named or anonymous.
    FuncDef {
        name: String,
        is_anon: bool,
        params: ArgList,
        body: Rc<Node>,
        tok: Token,
    },

    /// A call of a bare identifier.
    Call {
        name: String,
        args: ArgList,
        tok: Token,
    },

    /// A call of an arbitrary callee expression.
    CallExpr {
        callee: Box<Node>,
        args: ArgList,
        tok: Token,
    },

    /// `return expr`.
    Return { value: Box<Node>, tok: Token },

    /// A record (struct) definition; members are assignments or functions.
    RecordDef {
        name: String,
        members: Vec<Node>,
        tok: Token,
    },

    /// `if`/`elseif`/`else`.
    If {
        cond: Box<Node>,
        body: Box<Node>,
        else_ifs: Vec<(Node, Node)>,
        else_body: Option<Box<Node>>,
        tok: Token,
    },

    /// `while cond { ... }`.
    While {
        cond: Box<Node>,
        body: Box<Node>,
        tok: Token,
    },

    /// `for ident from iter { ... }`.
    For {
        ident: String,
        iter: Box<Node>,
        body: Box<Node>,
        tok: Token,
    },

    /// `import "path"` or `import [a, b] from "path"`.
    Import {
        path: String,
        symbols: Vec<String>,
        import_all: bool,
        tok: Token,
    },
}

impl Node {
    /// The token this node is anchored to.
    pub fn token(&self) -> &Token {
        match self {
            Node::Program { tok, .. }
            | Node::Block { tok, .. }
            | Node::None { tok }
            | Node::Int { tok, .. }
            | Node::Float { tok, .. }
            | Node::Str { tok, .. }
            | Node::List { tok, .. }
            | Node::Dict { tok, .. }
            | Node::Range { tok, .. }
            | Node::Break { tok }
            | Node::VarRef { tok, .. }
            | Node::Assign { tok, .. }
            | Node::MemberAccess { tok, .. }
            | Node::Index { tok, .. }
            | Node::IndexAssign { tok, .. }
            | Node::BinOp { tok, .. }
            | Node::UnaryOp { tok, .. }
            | Node::LogicalOp { tok, .. }
            | Node::FuncDef { tok, .. }
            | Node::Call { tok, .. }
            | Node::CallExpr { tok, .. }
            | Node::Return { tok, .. }
            | Node::RecordDef { tok, .. }
            | Node::If { tok, .. }
            | Node::While { tok, .. }
            | Node::For { tok, .. }
            | Node::Import { tok, .. } => tok,
        }
    }

    /// Serializes the tree for debugging.
    pub fn to_json(&self) -> Json {
        match self {
            Node::Program { statements, .. } => json!({
                "type": "Program",
                "statements": statements.iter().map(Node::to_json).collect::<Vec<_>>(),
            }),
            Node::Block { statements, .. } => json!({
                "type": "Block",
                "statements": statements.iter().map(Node::to_json).collect::<Vec<_>>(),
            }),
            Node::None { .. } => json!({ "type": "None" }),
            Node::Int { value, .. } => json!({ "type": "Int", "value": value }),
            Node::Float { value, .. } => json!({ "type": "Float", "value": value }),
            Node::Str { value, .. } => json!({ "type": "Str", "value": value }),
            Node::List { items, .. } => json!({
                "type": "List",
                "items": items.iter().map(Node::to_json).collect::<Vec<_>>(),
            }),
            Node::Dict { items, .. } => json!({
                "type": "Dict",
                "items": items.iter()
                    .map(|(k, v)| json!({ "key": k.to_json(), "value": v.to_json() }))
                    .collect::<Vec<_>>(),
            }),
            Node::Range { start, end, .. } => json!({
                "type": "Range",
                "start": start.to_json(),
                "end": end.to_json(),
            }),
            Node::Break { .. } => json!({ "type": "Break" }),
            Node::VarRef { name, .. } => json!({ "type": "VarRef", "name": name }),
            Node::Assign { name, value, .. } => json!({
                "type": "Assign",
                "name": name,
                "value": value.to_json(),
            }),
            Node::MemberAccess { object, member, .. } => json!({
                "type": "MemberAccess",
                "object": object.to_json(),
                "member": member.to_json(),
            }),
            Node::Index { object, args, .. } => json!({
                "type": "Index",
                "object": object.to_json(),
                "args": args.iter().map(Node::to_json).collect::<Vec<_>>(),
            }),
            Node::IndexAssign {
                object,
                args,
                value,
                ..
            } => json!({
                "type": "IndexAssign",
                "object": object.to_json(),
                "args": args.iter().map(Node::to_json).collect::<Vec<_>>(),
                "value": value.to_json(),
            }),
            Node::BinOp { op, lhs, rhs, .. } => json!({
                "type": "BinOp",
                "op": op.as_str(),
                "lhs": lhs.to_json(),
                "rhs": rhs.to_json(),
            }),
            Node::UnaryOp { op, rhs, .. } => json!({
                "type": "UnaryOp",
                "op": op.as_str(),
                "rhs": rhs.to_json(),
            }),
            Node::LogicalOp { op, lhs, rhs, .. } => json!({
                "type": "LogicalOp",
                "op": op.as_str(),
                "lhs": lhs.to_json(),
                "rhs": rhs.to_json(),
            }),
            Node::FuncDef {
                name,
                is_anon,
                params,
                body,
                ..
            } => json!({
                "type": "FuncDef",
                "name": name,
                "anonymous": is_anon,
                "params": params.to_json(),
                "body": body.to_json(),
            }),
            Node::Call { name, args, .. } => json!({
                "type": "Call",
                "name": name,
                "args": args.to_json(),
            }),
            Node::CallExpr { callee, args, .. } => json!({
                "type": "CallExpr",
                "callee": callee.to_json(),
                "args": args.to_json(),
            }),
            Node::Return { value, .. } => json!({
                "type": "Return",
                "value": value.to_json(),
            }),
            Node::RecordDef { name, members, .. } => json!({
                "type": "RecordDef",
                "name": name,
                "members": members.iter().map(Node::to_json).collect::<Vec<_>>(),
            }),
            Node::If {
                cond,
                body,
                else_ifs,
                else_body,
                ..
            } => json!({
                "type": "If",
                "cond": cond.to_json(),
                "body": body.to_json(),
                "else_ifs": else_ifs.iter()
                    .map(|(c, b)| json!({ "cond": c.to_json(), "body": b.to_json() }))
                    .collect::<Vec<_>>(),
                "else": else_body.as_ref().map(|b| b.to_json()),
            }),
            Node::While { cond, body, .. } => json!({
                "type": "While",
                "cond": cond.to_json(),
                "body": body.to_json(),
            }),
            Node::For {
                ident, iter, body, ..
            } => json!({
                "type": "For",
                "ident": ident,
                "iter": iter.to_json(),
                "body": body.to_json(),
            }),
            Node::Import {
                path,
                symbols,
                import_all,
                ..
            } => json!({
                "type": "Import",
                "path": path,
                "symbols": symbols,
                "import_all": import_all,
            }),
        }
    }
}
