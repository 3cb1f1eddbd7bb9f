//! The runtime value model.
//!
//! [`Value`] is a tagged variant; per-operation behaviour is a match on the
//! tag, not dynamic dispatch. Aggregates (lists, dictionaries, record
//! instances) are `Rc`-shared with interior mutability, so a value that
//! escapes into two containers is one object seen from two places.
//!
//! `Return` and `Break` are control-flow values: evaluating a `return` or a
//! `break` produces them, and block/loop/call boundaries detect them to
//! unwind. They are not errors and never cross a function-call boundary
//! intact.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;
use lute_lex::Token;
use lute_par::Node;
use lute_util::{Error, LuteResult};
use rustc_hash::FxHasher;

use crate::host::{HostInstance, HostType};
use crate::interp::Interp;

/// A user-defined function.
#[derive(Debug)]
pub struct Function {
    /// Name the function was defined with (`anonymous` for lambdas).
    pub name: String,

    /// True for `fn (..) { .. }` expressions.
    pub is_anon: bool,

    /// Positional parameter names.
    pub params: Vec<String>,

    /// Default parameter values, evaluated at definition time.
    pub defaults: IndexMap<String, Value>,

    /// The body block.
    pub body: Rc<Node>,
}

/// Signature of a host-provided builtin function.
pub type BuiltinFn = fn(&mut Interp, &Args, &Token) -> LuteResult<Value>;

/// A builtin function injected by the embedder.
#[derive(Debug)]
pub struct Builtin {
    /// Name the builtin is registered under.
    pub name: String,

    /// The host function.
    pub func: BuiltinFn,

    /// Documentation string surfaced through `_doc`.
    pub doc: String,
}

/// A user-defined record type: named members with default values/methods.
#[derive(Debug)]
pub struct RecordType {
    /// The record's name.
    pub name: String,

    /// Member defaults and methods, in declaration order.
    pub members: IndexMap<String, Value>,

    /// Documentation string surfaced through `_doc`.
    pub doc: String,
}

/// An instance of a record type, with its own member map.
#[derive(Debug)]
pub struct RecordInstance {
    /// Name of the record type this instance came from.
    pub type_name: String,

    /// Per-instance members.
    pub members: RefCell<IndexMap<String, Value>>,
}

/// Dictionary storage: hashed key -> (original key, value).
///
/// The original key is preserved for iteration and display; lookup always
/// goes through the hash. Duplicate hashed keys overwrite earlier entries.
#[derive(Debug, Default)]
pub struct Dict {
    pub entries: IndexMap<u64, (Value, Value)>,
}

/// Evaluated call arguments: positional values plus named values.
#[derive(Debug, Default)]
pub struct Args {
    /// Positional arguments, in source order.
    pub positional: Vec<Value>,

    /// Named arguments, in source order.
    pub named: IndexMap<String, Value>,
}

impl Args {
    /// Arguments with only positional values.
    pub fn from_positional(positional: Vec<Value>) -> Self {
        Self {
            positional,
            named: IndexMap::new(),
        }
    }

    /// Total number of arguments supplied.
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// True when no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// The `none` value.
    None,

    /// A boolean.
    Bool(bool),

    /// A signed 64-bit integer.
    Int(i64),

    /// A 64-bit float.
    Float(f64),

    /// An immutable string.
    Str(Rc<String>),

    /// A mutable, shared list.
    List(Rc<RefCell<Vec<Value>>>),

    /// A mutable, shared dictionary.
    Dict(Rc<RefCell<Dict>>),

    /// A half-open integer interval.
    Range { start: i64, end: i64 },

    /// A user-defined function.
    Func(Rc<Function>),

    /// A host-provided builtin function.
    Builtin(Rc<Builtin>),

    /// A record type.
    Record(Rc<RecordType>),

    /// A record instance.
    Instance(Rc<RecordInstance>),

    /// An embedder-registered type.
    HostType(Rc<HostType>),

    /// An instance of an embedder-registered type.
    HostInstance(Rc<HostInstance>),

    /// Control-flow wrapper produced by `return`.
    Return(Box<Value>),

    /// Control-flow marker produced by `break`.
    Break,
}

impl Value {
    /// A string value.
    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(Rc::new(value.into()))
    }

    /// A list value over `items`.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// An empty dictionary value.
    pub fn dict(entries: IndexMap<u64, (Value, Value)>) -> Self {
        Value::Dict(Rc::new(RefCell::new(Dict { entries })))
    }

    /// True for the `Return` control-flow wrapper.
    pub fn is_return(&self) -> bool {
        matches!(self, Value::Return(_))
    }

    /// True for the `Break` control-flow marker.
    pub fn is_break(&self) -> bool {
        matches!(self, Value::Break)
    }

    /// The truthiness used by conditionals and logical operators.
    ///
    /// `none`, `false`, `0`, `0.0`, the empty string and the empty list are
    /// false; everything else is true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Return(inner) => inner.truthy(),
            _ => true,
        }
    }

    /// The type name reported by `type(...)` and used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::None => "none".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Dict(_) => "dict".to_string(),
            Value::Range { .. } => "range".to_string(),
            Value::Func(_) => "function".to_string(),
            Value::Builtin(_) => "builtin".to_string(),
            Value::Record(r) => r.name.clone(),
            Value::Instance(i) => i.type_name.clone(),
            Value::HostType(t) => t.name.clone(),
            Value::HostInstance(i) => i.type_name(),
            Value::Return(inner) => format!("return({})", inner.type_name()),
            Value::Break => "break".to_string(),
        }
    }

    /// The documentation string exposed through the `_doc` property.
    pub fn doc(&self) -> String {
        match self {
            Value::Builtin(b) => b.doc.clone(),
            Value::Record(r) => r.doc.clone(),
            Value::HostType(t) => t.doc.clone(),
            _ => String::new(),
        }
    }

    /// Hashes the value for use as a dictionary key.
    ///
    /// `int`, `float`, `string`, `bool`, functions and builtins are
    /// hashable; the digest is deterministic within a process run.
    /// Collections, ranges and records are not hashable.
    pub fn hash_key(&self, tok: &Token) -> LuteResult<u64> {
        let mut hasher = FxHasher::default();
        match self {
            Value::Int(v) => {
                0u8.hash(&mut hasher);
                v.hash(&mut hasher);
            }
            Value::Float(v) => {
                1u8.hash(&mut hasher);
                v.to_bits().hash(&mut hasher);
            }
            Value::Str(s) => {
                2u8.hash(&mut hasher);
                s.hash(&mut hasher);
            }
            Value::Bool(b) => {
                3u8.hash(&mut hasher);
                b.hash(&mut hasher);
            }
            Value::Func(f) => {
                4u8.hash(&mut hasher);
                (Rc::as_ptr(f) as usize).hash(&mut hasher);
            }
            Value::Builtin(b) => {
                5u8.hash(&mut hasher);
                (Rc::as_ptr(b) as usize).hash(&mut hasher);
            }
            _ => {
                return Err(Error::type_error(
                    format!("'{}' is not hashable", self.type_name()),
                    tok.pos.clone(),
                ));
            }
        }
        Ok(hasher.finish())
    }
}

/// Formats a float the way the language prints it: whole floats keep a
/// trailing `.0` so they stay distinguishable from ints.
pub(crate) fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Dict(dict) => {
                f.write_str("{")?;
                for (i, (_, (key, value))) in dict.borrow().entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Range { start, end } => write!(f, "range({start}..{end})"),
            Value::Func(func) => write!(f, "function<{}>", func.name),
            Value::Builtin(b) => write!(f, "builtin<{}>", b.name),
            Value::Record(r) => write!(f, "struct<{}>", r.name),
            Value::Instance(i) => write!(f, "instance<{}>", i.type_name),
            Value::HostType(t) => write!(f, "type<{}>", t.name),
            Value::HostInstance(i) => write!(f, "instance<{}>", i.type_name()),
            Value::Return(inner) => write!(f, "{inner}"),
            Value::Break => f.write_str("break"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lute_util::ErrorKind;

    fn tok() -> Token {
        Token::eof()
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::None.truthy());
        assert!(!Value::Bool(false).truthy());
        assert!(!Value::Int(0).truthy());
        assert!(!Value::Float(0.0).truthy());
        assert!(!Value::str("").truthy());
        assert!(!Value::list(vec![]).truthy());

        assert!(Value::Bool(true).truthy());
        assert!(Value::Int(-1).truthy());
        assert!(Value::Float(0.5).truthy());
        assert!(Value::str("x").truthy());
        assert!(Value::list(vec![Value::None]).truthy());
        // An empty dict is still truthy.
        assert!(Value::dict(IndexMap::new()).truthy());
        assert!(Value::Range { start: 0, end: 0 }.truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::None.to_string(), "none");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(3.25).to_string(), "3.25");
        assert_eq!(Value::str("hi").to_string(), "hi");
        assert_eq!(
            Value::list(vec![Value::Int(1), Value::str("a")]).to_string(),
            "[1, a]"
        );
        assert_eq!(Value::Range { start: 0, end: 3 }.to_string(), "range(0..3)");
    }

    #[test]
    fn test_hash_determinism_and_equality() {
        let a = Value::str("key").hash_key(&tok()).unwrap();
        let b = Value::str("key").hash_key(&tok()).unwrap();
        assert_eq!(a, b);

        let x = Value::Int(7).hash_key(&tok()).unwrap();
        let y = Value::Int(7).hash_key(&tok()).unwrap();
        assert_eq!(x, y);
        assert_ne!(a, x);
    }

    #[test]
    fn test_unhashable_kinds() {
        assert!(Value::list(vec![]).hash_key(&tok()).is_err());
        assert!(Value::dict(IndexMap::new()).hash_key(&tok()).is_err());
        assert!(Value::Range { start: 0, end: 1 }.hash_key(&tok()).is_err());
        let err = Value::None.hash_key(&tok()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_shared_list_mutation() {
        let list = Value::list(vec![Value::Int(1)]);
        let alias = list.clone();
        if let Value::List(items) = &list {
            items.borrow_mut().push(Value::Int(2));
        }
        if let Value::List(items) = &alias {
            assert_eq!(items.borrow().len(), 2);
        }
    }

    #[test]
    fn test_control_flow_predicates() {
        assert!(Value::Return(Box::new(Value::Int(1))).is_return());
        assert!(Value::Break.is_break());
        assert!(!Value::Int(1).is_return());
    }
}
