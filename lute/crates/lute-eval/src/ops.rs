//! The operation protocol: arithmetic, comparison, unary and indexing.
//!
//! Binary operators dispatch on the left operand and inspect the right one.
//! Mixed int/float arithmetic promotes to float; `/` always yields a float;
//! `%` follows the same promotion with remainder semantics (the sign
//! follows the dividend). Booleans participate in arithmetic as 0/1. A zero
//! divisor for `/` or `%` is a zero-division error.
//!
//! `==` is total: numbers compare by value across int/float, strings by
//! content, aggregates by identity, and unrelated types compare unequal.
//! The ordering operators are defined for numbers only.

use lute_lex::Token;
use lute_util::{Error, ErrorKind, LuteResult};

use crate::value::Value;

/// A numeric view of a value, used for promotion.
enum Num {
    Int(i64),
    Float(f64),
}

impl Value {
    fn as_num(&self) -> Option<Num> {
        match self {
            Value::Int(v) => Some(Num::Int(*v)),
            Value::Float(v) => Some(Num::Float(*v)),
            Value::Bool(b) => Some(Num::Int(i64::from(*b))),
            _ => None,
        }
    }

    /// `self + other`
    pub fn add(&self, other: &Value, tok: &Token) -> LuteResult<Value> {
        if let (Some(l), Some(r)) = (self.as_num(), other.as_num()) {
            return Ok(match (l, r) {
                (Num::Int(a), Num::Int(b)) => Value::Int(a.wrapping_add(b)),
                (l, r) => Value::Float(to_f64(l) + to_f64(r)),
            });
        }
        if let (Value::Str(a), Value::Str(b)) = (self, other) {
            return Ok(Value::str(format!("{a}{b}")));
        }
        if let (Value::List(a), Value::List(b)) = (self, other) {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            return Ok(Value::list(items));
        }
        Err(self.op_type_error("addition", other, tok))
    }

    /// `self - other`
    pub fn sub(&self, other: &Value, tok: &Token) -> LuteResult<Value> {
        match (self.as_num(), other.as_num()) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(Value::Int(a.wrapping_sub(b))),
            (Some(l), Some(r)) => Ok(Value::Float(to_f64(l) - to_f64(r))),
            _ => Err(self.op_type_error("subtraction", other, tok)),
        }
    }

    /// `self * other`
    pub fn mul(&self, other: &Value, tok: &Token) -> LuteResult<Value> {
        match (self.as_num(), other.as_num()) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(Value::Int(a.wrapping_mul(b))),
            (Some(l), Some(r)) => Ok(Value::Float(to_f64(l) * to_f64(r))),
            _ => Err(self.op_type_error("multiplication", other, tok)),
        }
    }

    /// `self / other` - always a float, or a zero-division error.
    pub fn div(&self, other: &Value, tok: &Token) -> LuteResult<Value> {
        match (self.as_num(), other.as_num()) {
            (Some(l), Some(r)) => {
                let divisor = to_f64(r);
                if divisor == 0.0 {
                    return Err(zero_division(tok));
                }
                Ok(Value::Float(to_f64(l) / divisor))
            }
            _ => Err(self.op_type_error("division", other, tok)),
        }
    }

    /// `self % other` - int stays int, mixed promotes to float.
    pub fn rem(&self, other: &Value, tok: &Token) -> LuteResult<Value> {
        match (self.as_num(), other.as_num()) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => {
                if b == 0 {
                    return Err(zero_division(tok));
                }
                Ok(Value::Int(a.wrapping_rem(b)))
            }
            (Some(l), Some(r)) => {
                let divisor = to_f64(r);
                if divisor == 0.0 {
                    return Err(zero_division(tok));
                }
                Ok(Value::Float(to_f64(l) % divisor))
            }
            _ => Err(self.op_type_error("modulo", other, tok)),
        }
    }

    /// `self < other`
    pub fn lt(&self, other: &Value, tok: &Token) -> LuteResult<Value> {
        self.order_op("<", other, tok, |a, b| a < b)
    }

    /// `self > other`
    pub fn gt(&self, other: &Value, tok: &Token) -> LuteResult<Value> {
        self.order_op(">", other, tok, |a, b| a > b)
    }

    /// `self <= other`
    pub fn le(&self, other: &Value, tok: &Token) -> LuteResult<Value> {
        self.order_op("<=", other, tok, |a, b| a <= b)
    }

    /// `self >= other`
    pub fn ge(&self, other: &Value, tok: &Token) -> LuteResult<Value> {
        self.order_op(">=", other, tok, |a, b| a >= b)
    }

    fn order_op(
        &self,
        op: &str,
        other: &Value,
        tok: &Token,
        cmp: fn(f64, f64) -> bool,
    ) -> LuteResult<Value> {
        match (self.as_num(), other.as_num()) {
            (Some(l), Some(r)) => Ok(Value::Bool(cmp(to_f64(l), to_f64(r)))),
            _ => Err(Error::type_error(
                format!(
                    "'{op}' is not supported by {} with {}",
                    self.type_name(),
                    other.type_name()
                ),
                tok.pos.clone(),
            )),
        }
    }

    /// `self == other` - total; unrelated types are simply unequal.
    pub fn eq_value(&self, other: &Value) -> bool {
        if let (Some(l), Some(r)) = (self.as_num(), other.as_num()) {
            return to_f64(l) == to_f64(r);
        }
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Range { start: a, end: b }, Value::Range { start: c, end: d }) => {
                a == c && b == d
            }
            (Value::List(a), Value::List(b)) => std::rc::Rc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => std::rc::Rc::ptr_eq(a, b),
            (Value::Func(a), Value::Func(b)) => std::rc::Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => std::rc::Rc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => std::rc::Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => std::rc::Rc::ptr_eq(a, b),
            (Value::HostType(a), Value::HostType(b)) => std::rc::Rc::ptr_eq(a, b),
            (Value::HostInstance(a), Value::HostInstance(b)) => std::rc::Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Unary `+`.
    pub fn unary_plus(&self, tok: &Token) -> LuteResult<Value> {
        match self {
            Value::Int(v) => Ok(Value::Int(*v)),
            Value::Float(v) => Ok(Value::Float(*v)),
            _ => Err(Error::type_error(
                format!("unary '+' is not supported by {}", self.type_name()),
                tok.pos.clone(),
            )),
        }
    }

    /// Unary `-`.
    pub fn unary_minus(&self, tok: &Token) -> LuteResult<Value> {
        match self {
            Value::Int(v) => Ok(Value::Int(v.wrapping_neg())),
            Value::Float(v) => Ok(Value::Float(-v)),
            _ => Err(Error::type_error(
                format!("unary '-' is not supported by {}", self.type_name()),
                tok.pos.clone(),
            )),
        }
    }

    /// Unary `not` - defined for every value through truthiness.
    pub fn unary_not(&self) -> Value {
        Value::Bool(!self.truthy())
    }

    /// `self[args]`
    pub fn index(&self, args: &[Value], tok: &Token) -> LuteResult<Value> {
        match self {
            Value::Str(s) => {
                let arg = single_index_arg(args, tok)?;
                match arg {
                    Value::Int(i) => {
                        let bytes = s.as_bytes();
                        let i = *i;
                        if i < 0 || i as usize >= bytes.len() {
                            return Err(index_out_of_range(i, tok));
                        }
                        Ok(Value::str((bytes[i as usize] as char).to_string()))
                    }
                    Value::Range { start, end } => {
                        let bytes = s.as_bytes();
                        let (start, end) = (*start, *end);
                        // String slices include the end index.
                        if start < 0
                            || end < 0
                            || start as usize >= bytes.len()
                            || end as usize >= bytes.len()
                            || start > end
                        {
                            return Err(index_out_of_range(start, tok));
                        }
                        let slice = &bytes[start as usize..=end as usize];
                        Ok(Value::str(String::from_utf8_lossy(slice).into_owned()))
                    }
                    other => Err(Error::type_error(
                        format!("string index must be an int or a range, not {}", other.type_name()),
                        tok.pos.clone(),
                    )),
                }
            }
            Value::List(items) => {
                let arg = single_index_arg(args, tok)?;
                match arg {
                    Value::Int(i) => {
                        let items = items.borrow();
                        let i = *i;
                        if i < 0 || i as usize >= items.len() {
                            return Err(index_out_of_range(i, tok));
                        }
                        Ok(items[i as usize].clone())
                    }
                    other => Err(Error::type_error(
                        format!("list index must be an int, not {}", other.type_name()),
                        tok.pos.clone(),
                    )),
                }
            }
            Value::Dict(dict) => {
                let key = single_index_arg(args, tok)?;
                let hash = key.hash_key(tok)?;
                match dict.borrow().entries.get(&hash) {
                    Some((_, value)) => Ok(value.clone()),
                    None => Err(Error::name(
                        format!("key {key} not found in dict"),
                        tok.pos.clone(),
                    )),
                }
            }
            _ => Err(Error::new(
                ErrorKind::Unimplemented,
                format!("indexing is not supported by {}", self.type_name()),
                tok.pos.clone(),
            )),
        }
    }

    /// `self[args] = value`
    pub fn index_assign(&self, args: &[Value], value: Value, tok: &Token) -> LuteResult<Value> {
        match self {
            Value::List(items) => {
                let arg = single_index_arg(args, tok)?;
                match arg {
                    Value::Int(i) => {
                        let mut items = items.borrow_mut();
                        let i = *i;
                        if i < 0 || i as usize >= items.len() {
                            return Err(index_out_of_range(i, tok));
                        }
                        items[i as usize] = value.clone();
                        Ok(value)
                    }
                    other => Err(Error::type_error(
                        format!("list index must be an int, not {}", other.type_name()),
                        tok.pos.clone(),
                    )),
                }
            }
            Value::Dict(dict) => {
                let key = single_index_arg(args, tok)?;
                let hash = key.hash_key(tok)?;
                dict.borrow_mut()
                    .entries
                    .insert(hash, (key.clone(), value.clone()));
                Ok(value)
            }
            _ => Err(Error::new(
                ErrorKind::Unimplemented,
                format!("index assignment is not supported by {}", self.type_name()),
                tok.pos.clone(),
            )),
        }
    }

    fn op_type_error(&self, op: &str, other: &Value, tok: &Token) -> Error {
        Error::type_error(
            format!(
                "{op} is not supported by {} with {}",
                self.type_name(),
                other.type_name()
            ),
            tok.pos.clone(),
        )
    }
}

fn to_f64(n: Num) -> f64 {
    match n {
        Num::Int(v) => v as f64,
        Num::Float(v) => v,
    }
}

fn zero_division(tok: &Token) -> Error {
    Error::new(ErrorKind::ZeroDivision, "division by zero", tok.pos.clone())
}

fn index_out_of_range(index: i64, tok: &Token) -> Error {
    Error::new(
        ErrorKind::Index,
        format!("index out of range {index}"),
        tok.pos.clone(),
    )
}

fn single_index_arg<'a>(args: &'a [Value], tok: &Token) -> LuteResult<&'a Value> {
    if args.len() != 1 {
        return Err(Error::new(
            ErrorKind::Index,
            format!("index takes 1 argument but {} were given", args.len()),
            tok.pos.clone(),
        ));
    }
    Ok(&args[0])
}
