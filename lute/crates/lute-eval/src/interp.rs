//! The tree-walking evaluator.
//!
//! A single visitor over the AST: `eval(node) -> Result<Value, Error>`.
//! Errors travel through the `Result` channel; `return` and `break` travel
//! as ordinary values that sequencing points inspect. Blocks stop early on
//! either; loops consume `Break`; function calls unwrap `Return`.
//!
//! Scopes are entered for function calls, `for` loops and imported modules
//! only. `if` and `while` bodies run in the enclosing scope.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use lute_lex::{tokenize, KeywordTable, Token};
use lute_par::{parse, ArgList, BinOp, LogicalOp, Node, UnaryOp};
use lute_util::{Error, ErrorKind, LuteResult, Position};

use crate::env::Context;
use crate::host::{HostCreator, HostMethod, HostType};
use crate::value::{Args, Builtin, BuiltinFn, Function, RecordInstance, RecordType, Value};

/// File extension appended to import paths that lack one.
pub const MODULE_EXTENSION: &str = "lute";

/// Environment variable overriding the standard-library root.
pub const STD_PATH_ENV: &str = "LUTE_STD_PATH";

/// The interpreter: scope stack, keyword table and import configuration.
pub struct Interp {
    /// The scope stack and context names.
    pub ctx: Context,

    /// Keyword spellings used when lexing imported modules.
    keywords: KeywordTable,

    /// Root directory for `std:` imports.
    std_path: PathBuf,
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

impl Interp {
    /// A fresh interpreter with an empty module scope.
    ///
    /// The standard-library root is taken from `LUTE_STD_PATH` when set.
    pub fn new() -> Self {
        let std_path = std::env::var(STD_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("lute_std"));
        Self {
            ctx: Context::new(),
            keywords: KeywordTable::default(),
            std_path,
        }
    }

    /// The keyword table used for lexing.
    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Mutable access to the keyword table, for respelling keywords.
    pub fn keywords_mut(&mut self) -> &mut KeywordTable {
        &mut self.keywords
    }

    /// Overrides the standard-library root used by `std:` imports.
    pub fn set_std_path(&mut self, path: impl Into<PathBuf>) {
        self.std_path = path.into();
    }

    // =========================================================================
    // Embedder API
    // =========================================================================

    /// Registers a builtin function in the module scope.
    pub fn register_builtin(&mut self, name: &str, func: BuiltinFn, doc: &str) {
        let builtin = Builtin {
            name: name.to_string(),
            func,
            doc: doc.to_string(),
        };
        self.ctx
            .current_mut()
            .set(name, Value::Builtin(Rc::new(builtin)));
    }

    /// Registers a host type with its creator and method table.
    pub fn register_host_type(
        &mut self,
        name: &str,
        creator: HostCreator,
        methods: &[(&str, HostMethod)],
        doc: &str,
    ) {
        let ty = HostType {
            name: name.to_string(),
            creator,
            methods: methods
                .iter()
                .map(|(method, func)| (method.to_string(), *func))
                .collect(),
            doc: doc.to_string(),
        };
        self.ctx
            .current_mut()
            .set(name, Value::HostType(Rc::new(ty)));
    }

    /// Binds a global value in the module scope.
    pub fn set_global(&mut self, name: &str, value: Value) {
        self.ctx.current_mut().set(name, value);
    }

    /// Reads, lexes, parses and evaluates a script file.
    pub fn run_file(&mut self, path: &Path) -> LuteResult<Value> {
        let source = fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorKind::Generic,
                format!("could not read file '{}': {e}", path.display()),
                Position::dummy(),
            )
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.ctx.set_base_name(stem);
        self.run_source(&path.to_string_lossy(), &source)
    }

    /// Lexes, parses and evaluates `source` against the current context.
    pub fn run_source(&mut self, file_name: &str, source: &str) -> LuteResult<Value> {
        let tokens = tokenize(file_name, source, &self.keywords)?;
        let ast = parse(tokens)?;
        self.eval(&ast)
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Evaluates one node.
    pub fn eval(&mut self, node: &Node) -> LuteResult<Value> {
        match node {
            Node::Program { statements, .. } => {
                let mut value = Value::None;
                for statement in statements {
                    value = self.eval(statement)?;
                    if value.is_return() {
                        return Ok(value);
                    }
                }
                Ok(value)
            }
            Node::Block { statements, .. } => {
                let mut value = Value::None;
                for statement in statements {
                    value = self.eval(statement)?;
                    if value.is_return() || value.is_break() {
                        return Ok(value);
                    }
                }
                Ok(value)
            }
            Node::None { .. } => Ok(Value::None),
            Node::Int { value, .. } => Ok(Value::Int(*value)),
            Node::Float { value, .. } => Ok(Value::Float(*value)),
            Node::Str { value, .. } => Ok(Value::str(value.clone())),
            Node::List { items, .. } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item)?);
                }
                Ok(Value::list(values))
            }
            Node::Dict { items, .. } => {
                let mut entries = IndexMap::new();
                for (key_node, value_node) in items {
                    let key = self.eval(key_node)?;
                    let hash = key.hash_key(key_node.token())?;
                    let value = self.eval(value_node)?;
                    entries.insert(hash, (key, value));
                }
                Ok(Value::dict(entries))
            }
            Node::Range { start, end, tok } => {
                let start_val = self.eval(start)?;
                let end_val = self.eval(end)?;
                let Value::Int(start_int) = start_val else {
                    return Err(Error::runtime(
                        format!("range start takes an int but received {}", start_val.type_name()),
                        tok.pos.clone(),
                    ));
                };
                let Value::Int(end_int) = end_val else {
                    return Err(Error::runtime(
                        format!("range end takes an int but received {}", end_val.type_name()),
                        tok.pos.clone(),
                    ));
                };
                Ok(Value::Range {
                    start: start_int,
                    end: end_int,
                })
            }
            Node::Break { .. } => Ok(Value::Break),
            Node::Return { value, .. } => {
                let inner = self.eval(value)?;
                Ok(Value::Return(Box::new(inner)))
            }
            Node::VarRef { name, tok } => self.lookup(name, tok),
            Node::Assign { name, value, .. } => {
                let value = self.eval(value)?;
                self.ctx.current_mut().set(name.clone(), value);
                Ok(Value::None)
            }
            Node::BinOp { op, lhs, rhs, tok } => {
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                match op {
                    BinOp::Add => left.add(&right, tok),
                    BinOp::Sub => left.sub(&right, tok),
                    BinOp::Mul => left.mul(&right, tok),
                    BinOp::Div => left.div(&right, tok),
                    BinOp::Mod => left.rem(&right, tok),
                    BinOp::Lt => left.lt(&right, tok),
                    BinOp::Gt => left.gt(&right, tok),
                    BinOp::LtEq => left.le(&right, tok),
                    BinOp::GtEq => left.ge(&right, tok),
                    BinOp::Eq => Ok(Value::Bool(left.eq_value(&right))),
                    BinOp::NotEq => Ok(Value::Bool(!left.eq_value(&right))),
                }
            }
            Node::UnaryOp { op, rhs, tok } => {
                let value = self.eval(rhs)?;
                match op {
                    UnaryOp::Plus => value.unary_plus(tok),
                    UnaryOp::Minus => value.unary_minus(tok),
                    UnaryOp::Not => Ok(value.unary_not()),
                }
            }
            Node::LogicalOp { op, lhs, rhs, .. } => {
                // Both sides are always evaluated; `and`/`or` are eager.
                let left = self.eval(lhs)?.truthy();
                let right = self.eval(rhs)?.truthy();
                let result = match op {
                    LogicalOp::And => left && right,
                    LogicalOp::Or => left || right,
                };
                Ok(Value::Bool(result))
            }
            Node::If {
                cond,
                body,
                else_ifs,
                else_body,
                ..
            } => {
                if self.eval(cond)?.truthy() {
                    return self.eval(body);
                }
                for (elseif_cond, elseif_body) in else_ifs {
                    if self.eval(elseif_cond)?.truthy() {
                        return self.eval(elseif_body);
                    }
                }
                if let Some(body) = else_body {
                    return self.eval(body);
                }
                Ok(Value::None)
            }
            Node::While { cond, body, .. } => {
                let mut result = Value::None;
                while self.eval(cond)?.truthy() {
                    let value = self.eval(body)?;
                    if value.is_break() {
                        break;
                    }
                    if value.is_return() {
                        return Ok(value);
                    }
                    result = value;
                }
                Ok(result)
            }
            Node::For {
                ident, iter, body, ..
            } => self.eval_for(ident, iter, body, node.token()),
            Node::FuncDef { .. } => {
                let func = self.make_function(node)?;
                let Node::FuncDef { name, is_anon, .. } = node else {
                    unreachable!()
                };
                let value = Value::Func(Rc::new(func));
                if !is_anon {
                    self.ctx.current_mut().set(name.clone(), value.clone());
                }
                Ok(value)
            }
            Node::RecordDef { name, members, tok } => {
                let mut member_map = IndexMap::new();
                for member in members {
                    match member {
                        Node::Assign {
                            name: member_name,
                            value,
                            ..
                        } => {
                            let value = self.eval(value)?;
                            member_map.insert(member_name.clone(), value);
                        }
                        Node::FuncDef {
                            name: method_name, ..
                        } => {
                            let func = self.make_function(member)?;
                            member_map
                                .insert(method_name.clone(), Value::Func(Rc::new(func)));
                        }
                        other => {
                            return Err(Error::syntax(
                                "only assignments and function definitions are allowed inside a struct body",
                                other.token().pos.clone(),
                            ));
                        }
                    }
                }
                let record = Value::Record(Rc::new(RecordType {
                    name: name.clone(),
                    members: member_map,
                    doc: String::new(),
                }));
                self.ctx.current_mut().set(name.clone(), record.clone());
                Ok(record)
            }
            Node::Call { name, args, tok } => {
                let callee = self.lookup(name, tok)?;
                let args = self.eval_args(args)?;
                self.call_value(callee, args, tok)
            }
            Node::CallExpr { callee, args, tok } => {
                let callee = self.eval(callee)?;
                let args = self.eval_args(args)?;
                self.call_value(callee, args, tok)
            }
            Node::MemberAccess { object, member, tok } => self.eval_member(object, member, tok),
            Node::Index { object, args, tok } => {
                let target = self.eval(object)?;
                let index_args = self.eval_nodes(args)?;
                target.index(&index_args, tok)
            }
            Node::IndexAssign {
                object,
                args,
                value,
                tok,
            } => {
                let target = self.eval(object)?;
                let index_args = self.eval_nodes(args)?;
                let value = self.eval(value)?;
                target.index_assign(&index_args, value, tok)
            }
            Node::Import {
                path,
                symbols,
                import_all,
                tok,
            } => self.eval_import(path, symbols, *import_all, tok),
        }
    }

    /// Calls any callable value with evaluated arguments.
    pub fn call_value(&mut self, callee: Value, args: Args, tok: &Token) -> LuteResult<Value> {
        match callee {
            Value::Func(func) => self.call_function(&func, args, tok),
            Value::Builtin(builtin) => (builtin.func)(self, &args, tok),
            Value::Record(record) => {
                let mut members = record.members.clone();
                for (name, value) in args.named {
                    if members.contains_key(&name) {
                        members.insert(name, value);
                    }
                }
                Ok(Value::Instance(Rc::new(RecordInstance {
                    type_name: record.name.clone(),
                    members: std::cell::RefCell::new(members),
                })))
            }
            Value::HostType(ty) => {
                let handle = (ty.creator)(&args, tok)?;
                Ok(Value::HostInstance(Rc::new(crate::host::HostInstance {
                    ty: Rc::clone(&ty),
                    handle,
                })))
            }
            other => Err(Error::type_error(
                format!("'{}' is not callable", other.type_name()),
                tok.pos.clone(),
            )),
        }
    }

    /// Calls a user-defined function: arity check, scope entry, parameter
    /// binding, body evaluation, `Return` unwrapping.
    fn call_function(&mut self, func: &Function, args: Args, tok: &Token) -> LuteResult<Value> {
        let required = func.params.len();
        let given = args.len();
        if given < required {
            return Err(Error::name(
                format!(
                    "{} takes at least {required} arguments but {given} were given",
                    func.name
                ),
                tok.pos.clone(),
            ));
        }
        if args.positional.len() > required {
            return Err(Error::name(
                format!(
                    "{} takes at most {required} arguments but {given} were given",
                    func.name
                ),
                tok.pos.clone(),
            ));
        }

        let caller_name = self.ctx.name().to_string();
        self.ctx.set_name(format!("{caller_name}.{}", func.name));
        if !self.ctx.enter_scope() {
            self.ctx.set_name(caller_name);
            return Err(Error::runtime(
                "maximum scope depth exceeded",
                tok.pos.clone(),
            ));
        }
        tracing::trace!(function = %func.name, depth = self.ctx.depth(), "call");

        for (param, value) in func.params.iter().zip(args.positional.into_iter()) {
            self.ctx.current_mut().set(param.clone(), value);
        }
        for (name, default) in &func.defaults {
            let value = args
                .named
                .get(name)
                .cloned()
                .unwrap_or_else(|| default.clone());
            self.ctx.current_mut().set(name.clone(), value);
        }
        for (name, value) in args.named {
            self.ctx.current_mut().set(name, value);
        }

        let result = self.eval(&func.body);
        self.ctx.exit_scope();
        self.ctx.set_name(caller_name);

        match result? {
            Value::Return(inner) => Ok(*inner),
            other => Ok(other),
        }
    }

    /// Builds a [`Function`] from a `FuncDef` node, evaluating the default
    /// parameter values now.
    fn make_function(&mut self, node: &Node) -> LuteResult<Function> {
        let Node::FuncDef {
            name,
            is_anon,
            params,
            body,
            ..
        } = node
        else {
            unreachable!("make_function is only called on FuncDef nodes");
        };

        let mut param_names = Vec::with_capacity(params.args.len());
        for param in &params.args {
            match param {
                Node::VarRef { name, .. } => param_names.push(name.clone()),
                other => {
                    return Err(Error::syntax(
                        "invalid argument",
                        other.token().pos.clone(),
                    ));
                }
            }
        }

        let mut defaults = IndexMap::new();
        for (name, expr) in &params.named {
            let value = self.eval(expr)?;
            defaults.insert(name.clone(), value);
        }

        Ok(Function {
            name: name.clone(),
            is_anon: *is_anon,
            params: param_names,
            defaults,
            body: Rc::clone(body),
        })
    }

    fn lookup(&self, name: &str, tok: &Token) -> LuteResult<Value> {
        self.ctx
            .current()
            .get(name)
            .cloned()
            .ok_or_else(|| {
                Error::name(
                    format!("variable '{name}' is not defined"),
                    tok.pos.clone(),
                )
            })
    }

    /// Evaluates an argument list left to right, positional before named.
    fn eval_args(&mut self, list: &ArgList) -> LuteResult<Args> {
        let mut args = Args::default();
        for node in &list.args {
            args.positional.push(self.eval(node)?);
        }
        for (name, node) in &list.named {
            let value = self.eval(node)?;
            args.named.insert(name.clone(), value);
        }
        Ok(args)
    }

    fn eval_nodes(&mut self, nodes: &[Node]) -> LuteResult<Vec<Value>> {
        let mut values = Vec::with_capacity(nodes.len());
        for node in nodes {
            values.push(self.eval(node)?);
        }
        Ok(values)
    }

    /// `lhs.name` and `lhs.method(args)`.
    fn eval_member(&mut self, object: &Node, member: &Node, tok: &Token) -> LuteResult<Value> {
        let target = self.eval(object)?;

        match member {
            Node::VarRef { name, tok: member_tok } => target.get_property(name, member_tok),
            Node::Call {
                name,
                args,
                tok: call_tok,
            } => {
                let mut args = self.eval_args(args)?;
                // A record instance is its methods' implicit first argument.
                if matches!(target, Value::Instance(_)) {
                    args.positional.insert(0, target.clone());
                }
                target.call_method(name, self, args, call_tok)
            }
            other => Err(Error::runtime(
                format!("invalid property '{}'", other.token().lexeme),
                tok.pos.clone(),
            )),
        }
    }

    /// `for ident from iterable { body }` over ranges, lists and strings.
    fn eval_for(
        &mut self,
        ident: &str,
        iter: &Node,
        body: &Node,
        tok: &Token,
    ) -> LuteResult<Value> {
        let iterable = self.eval(iter)?;

        let caller_name = self.ctx.name().to_string();
        self.ctx.set_name(format!("{caller_name}.{ident}"));
        if !self.ctx.enter_scope() {
            self.ctx.set_name(caller_name);
            return Err(Error::runtime(
                "maximum scope depth exceeded",
                tok.pos.clone(),
            ));
        }

        let result = self.run_for_loop(ident, &iterable, body, tok);

        self.ctx.exit_scope();
        self.ctx.set_name(caller_name);
        result
    }

    fn run_for_loop(
        &mut self,
        ident: &str,
        iterable: &Value,
        body: &Node,
        tok: &Token,
    ) -> LuteResult<Value> {
        let mut result = Value::None;

        macro_rules! step {
            ($item:expr) => {{
                self.ctx.current_mut().set(ident.to_string(), $item);
                let value = self.eval(body)?;
                if value.is_break() {
                    break;
                }
                if value.is_return() {
                    return Ok(value);
                }
                result = value;
            }};
        }

        match iterable {
            Value::Range { start, end } => {
                // A reverse range iterates zero times.
                for i in *start..*end {
                    step!(Value::Int(i));
                }
            }
            Value::List(items) => {
                let snapshot = items.borrow().clone();
                for item in snapshot {
                    step!(item);
                }
            }
            Value::Str(s) => {
                for ch in s.chars() {
                    step!(Value::str(ch.to_string()));
                }
            }
            other => {
                return Err(Error::runtime(
                    format!("'{}' is not iterable", other.type_name()),
                    tok.pos.clone(),
                ));
            }
        }

        Ok(result)
    }

    /// Resolves and evaluates an import.
    fn eval_import(
        &mut self,
        path_str: &str,
        symbols: &[String],
        import_all: bool,
        tok: &Token,
    ) -> LuteResult<Value> {
        let mut path = match path_str.strip_prefix("std:") {
            Some(rest) => self.std_path.join(rest),
            None => PathBuf::from(path_str),
        };
        if path.extension().is_none() {
            path.set_extension(MODULE_EXTENSION);
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem == self.ctx.base_name() {
            return Err(Error::new(
                ErrorKind::Import,
                format!("cannot import same file '{path_str}'"),
                tok.pos.clone(),
            ));
        }

        let source = fs::read_to_string(&path).map_err(|_| {
            Error::new(
                ErrorKind::Import,
                format!("could not import module '{}'", path.display()),
                tok.pos.clone(),
            )
        })?;

        tracing::debug!(module = %path.display(), import_all, "importing module");

        let file_name = path.to_string_lossy();
        let tokens = tokenize(&file_name, &source, &self.keywords)
            .map_err(|e| import_parse_error(path_str, &e, tok))?;
        let ast = parse(tokens).map_err(|e| import_parse_error(path_str, &e, tok))?;

        let caller_name = self.ctx.name().to_string();
        let caller_base = self.ctx.base_name().to_string();
        self.ctx.set_name(format!("{caller_name}.{stem}"));
        self.ctx.set_base_name(stem);
        if !self.ctx.enter_scope() {
            self.ctx.set_name(caller_name);
            self.ctx.set_base_name(caller_base);
            return Err(Error::runtime(
                "maximum scope depth exceeded",
                tok.pos.clone(),
            ));
        }

        let result = self.eval(&ast);
        self.ctx.set_name(caller_name);
        self.ctx.set_base_name(caller_base);

        let value = match result {
            Ok(value) => value,
            Err(e) => {
                self.ctx.pop_scope();
                return Err(e);
            }
        };

        let module_scope = self.ctx.pop_scope();
        if import_all {
            *self.ctx.current_mut() = module_scope;
        } else {
            for symbol in symbols {
                match module_scope.get(symbol) {
                    Some(found) => {
                        self.ctx.current_mut().set(symbol.clone(), found.clone());
                    }
                    None => {
                        return Err(Error::new(
                            ErrorKind::Import,
                            format!("module '{path_str}' doesn't contain symbol '{symbol}'"),
                            tok.pos.clone(),
                        ));
                    }
                }
            }
        }

        Ok(value)
    }
}

fn import_parse_error(path: &str, inner: &Error, tok: &Token) -> Error {
    Error::new(
        ErrorKind::Import,
        format!("could not import module '{path}': {}", inner.message),
        tok.pos.clone(),
    )
}
