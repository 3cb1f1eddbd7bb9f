//! Properties and built-in methods, per value type.
//!
//! `lhs.name` goes through [`Value::get_property`]; `lhs.name(args)` goes
//! through [`Value::call_method`] with the arguments already evaluated.
//! Every value exposes `_doc`; strings, lists and dictionaries expose
//! `size`; record instances read their member map. Method tables mirror the
//! language's standard surface (`push`, `split`, `exists`, `toList`, ...).

use lute_lex::Token;
use lute_util::{Error, ErrorKind, LuteResult};

use crate::interp::Interp;
use crate::value::{format_float, Args, Value};

impl Value {
    /// Reads a property (`lhs.name`).
    pub fn get_property(&self, name: &str, tok: &Token) -> LuteResult<Value> {
        if let Value::Instance(instance) = self {
            if let Some(value) = instance.members.borrow().get(name) {
                return Ok(value.clone());
            }
            if name == "_doc" {
                return Ok(Value::str(self.doc()));
            }
            return Err(Error::runtime(
                format!("property {name} not found"),
                tok.pos.clone(),
            ));
        }

        if name == "_doc" {
            return Ok(Value::str(self.doc()));
        }

        match self {
            Value::Str(s) => match name {
                "size" => Ok(Value::Int(s.as_bytes().len() as i64)),
                _ => Err(self.no_property(name, tok)),
            },
            Value::List(items) => match name {
                "size" => Ok(Value::Int(items.borrow().len() as i64)),
                _ => Err(self.no_property(name, tok)),
            },
            Value::Dict(dict) => match name {
                "size" => Ok(Value::Int(dict.borrow().entries.len() as i64)),
                _ => Err(self.no_property(name, tok)),
            },
            _ => Err(self.no_property(name, tok)),
        }
    }

    /// Calls a method (`lhs.name(args)`) with evaluated arguments.
    ///
    /// For record instances the interpreter has already prepended the
    /// instance itself as the first positional argument.
    pub fn call_method(
        &self,
        name: &str,
        interp: &mut Interp,
        args: Args,
        tok: &Token,
    ) -> LuteResult<Value> {
        match self {
            Value::Str(_) => self.call_string_method(name, args, tok),
            Value::List(_) => self.call_list_method(name, interp, args, tok),
            Value::Dict(_) => self.call_dict_method(name, args, tok),
            Value::Range { start, end } => match name {
                "toList" => {
                    verify_args(&args, 0, name, tok)?;
                    let items = (*start..*end).map(Value::Int).collect();
                    Ok(Value::list(items))
                }
                _ => Err(self.no_method(name, tok)),
            },
            Value::Int(v) => match name {
                "toStr" => {
                    verify_args(&args, 0, name, tok)?;
                    Ok(Value::str(v.to_string()))
                }
                _ => Err(self.no_method(name, tok)),
            },
            Value::Float(v) => match name {
                "toStr" => {
                    verify_args(&args, 0, name, tok)?;
                    Ok(Value::str(format_float(*v)))
                }
                _ => Err(self.no_method(name, tok)),
            },
            Value::Instance(instance) => {
                let member = instance.members.borrow().get(name).cloned();
                match member {
                    Some(func) => interp.call_value(func, args, tok),
                    None => Err(self.no_method(name, tok)),
                }
            }
            Value::HostInstance(instance) => {
                let method = instance.ty.methods.get(name).copied();
                match method {
                    Some(func) => func(&instance.handle, interp, &args, tok),
                    None => Err(self.no_method(name, tok)),
                }
            }
            _ => Err(self.no_method(name, tok)),
        }
    }

    fn call_string_method(&self, name: &str, args: Args, tok: &Token) -> LuteResult<Value> {
        let Value::Str(s) = self else { unreachable!() };
        match name {
            "get" => {
                verify_args(&args, 1, name, tok)?;
                let index = int_arg(&args.positional[0], "get", tok)?;
                let bytes = s.as_bytes();
                if index < 0 || index as usize >= bytes.len() {
                    return Err(Error::new(
                        ErrorKind::Index,
                        format!("index out of range {index}"),
                        tok.pos.clone(),
                    ));
                }
                Ok(Value::str((bytes[index as usize] as char).to_string()))
            }
            "split" => {
                verify_args(&args, 1, name, tok)?;
                let delim = str_arg(&args.positional[0], "split", tok)?;
                if delim.is_empty() {
                    return Ok(Value::list(vec![Value::str(s.as_str())]));
                }
                let parts = s
                    .split(delim.as_str())
                    .map(Value::str)
                    .collect();
                Ok(Value::list(parts))
            }
            "toInt" => {
                verify_args(&args, 0, name, tok)?;
                parse_leading_int(s).map(Value::Int).ok_or_else(|| {
                    Error::runtime(format!("invalid integer '{s}'"), tok.pos.clone())
                })
            }
            "toFloat" => {
                verify_args(&args, 0, name, tok)?;
                parse_leading_float(s).map(Value::Float).ok_or_else(|| {
                    Error::runtime(format!("invalid float '{s}'"), tok.pos.clone())
                })
            }
            "toLower" => {
                verify_args(&args, 0, name, tok)?;
                Ok(Value::str(s.to_lowercase()))
            }
            "toUpper" => {
                verify_args(&args, 0, name, tok)?;
                Ok(Value::str(s.to_uppercase()))
            }
            "isDigit" => {
                verify_args(&args, 0, name, tok)?;
                Ok(Value::Bool(s.chars().all(|c| c.is_ascii_digit())))
            }
            "isAlpha" => {
                verify_args(&args, 0, name, tok)?;
                Ok(Value::Bool(s.chars().all(|c| c.is_ascii_alphabetic())))
            }
            "replace" => {
                verify_args(&args, 2, name, tok)?;
                let from = str_arg(&args.positional[0], "replace", tok)?;
                let to = str_arg(&args.positional[1], "replace", tok)?;
                if from.is_empty() {
                    return Ok(Value::str(s.as_str()));
                }
                Ok(Value::str(s.replace(from.as_str(), &to)))
            }
            "isUpper" => {
                verify_args(&args, 0, name, tok)?;
                Ok(Value::Bool(s.chars().all(|c| c.is_ascii_uppercase())))
            }
            "isLower" => {
                verify_args(&args, 0, name, tok)?;
                Ok(Value::Bool(s.chars().all(|c| c.is_ascii_lowercase())))
            }
            "getCodeAt" => {
                verify_args(&args, 1, name, tok)?;
                let index = int_arg(&args.positional[0], "getCodeAt", tok)?;
                let bytes = s.as_bytes();
                if index < 0 || index as usize >= bytes.len() {
                    return Err(Error::new(
                        ErrorKind::Index,
                        format!("index out of range {index}"),
                        tok.pos.clone(),
                    ));
                }
                Ok(Value::Int(i64::from(bytes[index as usize])))
            }
            "join" => {
                verify_args(&args, 1, name, tok)?;
                let Value::List(items) = &args.positional[0] else {
                    return Err(Error::runtime(
                        format!(
                            "'join' expects a list as an argument, received {}",
                            args.positional[0].type_name()
                        ),
                        tok.pos.clone(),
                    ));
                };
                let joined = items
                    .borrow()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(s.as_str());
                Ok(Value::str(joined))
            }
            "find" => {
                verify_args(&args, 1, name, tok)?;
                let needle = str_arg(&args.positional[0], "find", tok)?;
                match s.find(needle.as_str()) {
                    Some(at) => Ok(Value::Int(at as i64)),
                    None => Ok(Value::Int(-1)),
                }
            }
            "startsWith" => {
                verify_args(&args, 1, name, tok)?;
                let prefix = str_arg(&args.positional[0], "startsWith", tok)?;
                Ok(Value::Bool(s.starts_with(prefix.as_str())))
            }
            "endsWith" => {
                verify_args(&args, 1, name, tok)?;
                let suffix = str_arg(&args.positional[0], "endsWith", tok)?;
                Ok(Value::Bool(s.ends_with(suffix.as_str())))
            }
            _ => Err(self.no_method(name, tok)),
        }
    }

    fn call_list_method(
        &self,
        name: &str,
        interp: &mut Interp,
        args: Args,
        tok: &Token,
    ) -> LuteResult<Value> {
        let Value::List(items) = self else { unreachable!() };
        match name {
            "get" => {
                verify_args(&args, 1, name, tok)?;
                let index = int_arg(&args.positional[0], "get", tok)?;
                let items = items.borrow();
                if index < 0 || index as usize >= items.len() {
                    return Err(Error::new(
                        ErrorKind::Index,
                        format!("index out of range {index}"),
                        tok.pos.clone(),
                    ));
                }
                Ok(items[index as usize].clone())
            }
            "set" => {
                verify_args(&args, 2, name, tok)?;
                let index = int_arg(&args.positional[0], "set", tok)?;
                let mut items = items.borrow_mut();
                if index < 0 || index as usize >= items.len() {
                    return Err(Error::new(
                        ErrorKind::Index,
                        format!("index out of range {index}"),
                        tok.pos.clone(),
                    ));
                }
                items[index as usize] = args.positional[1].clone();
                Ok(Value::None)
            }
            "push" => {
                verify_args(&args, 1, name, tok)?;
                items.borrow_mut().push(args.positional[0].clone());
                Ok(Value::None)
            }
            "pop" => {
                verify_args(&args, 0, name, tok)?;
                match items.borrow_mut().pop() {
                    Some(value) => Ok(value),
                    None => Err(Error::new(
                        ErrorKind::Index,
                        "cannot pop from empty list",
                        tok.pos.clone(),
                    )),
                }
            }
            "forEach" => {
                verify_args(&args, 1, name, tok)?;
                let callback = args.positional[0].clone();
                // Snapshot so the callback may mutate the list.
                let snapshot = items.borrow().clone();
                let mut last = Value::None;
                for item in snapshot {
                    last = interp.call_value(
                        callback.clone(),
                        Args::from_positional(vec![item]),
                        tok,
                    )?;
                }
                Ok(last)
            }
            "map" => {
                verify_args(&args, 1, name, tok)?;
                let callback = args.positional[0].clone();
                let snapshot = items.borrow().clone();
                let mut mapped = Vec::with_capacity(snapshot.len());
                for item in snapshot {
                    mapped.push(interp.call_value(
                        callback.clone(),
                        Args::from_positional(vec![item]),
                        tok,
                    )?);
                }
                Ok(Value::list(mapped))
            }
            _ => Err(self.no_method(name, tok)),
        }
    }

    fn call_dict_method(&self, name: &str, args: Args, tok: &Token) -> LuteResult<Value> {
        let Value::Dict(dict) = self else { unreachable!() };
        match name {
            "get" => {
                verify_args(&args, 1, name, tok)?;
                let hash = args.positional[0].hash_key(tok)?;
                match dict.borrow().entries.get(&hash) {
                    Some((_, value)) => Ok(value.clone()),
                    None => Ok(Value::None),
                }
            }
            "exists" => {
                verify_args(&args, 1, name, tok)?;
                let hash = args.positional[0].hash_key(tok)?;
                Ok(Value::Bool(dict.borrow().entries.contains_key(&hash)))
            }
            "keys" => {
                verify_args(&args, 0, name, tok)?;
                let keys = dict
                    .borrow()
                    .entries
                    .values()
                    .map(|(key, _)| key.clone())
                    .collect();
                Ok(Value::list(keys))
            }
            "values" => {
                verify_args(&args, 0, name, tok)?;
                let values = dict
                    .borrow()
                    .entries
                    .values()
                    .map(|(_, value)| value.clone())
                    .collect();
                Ok(Value::list(values))
            }
            _ => Err(self.no_method(name, tok)),
        }
    }

    fn no_property(&self, name: &str, tok: &Token) -> Error {
        Error::name(
            format!("{} does not contain property {name}", self.type_name()),
            tok.pos.clone(),
        )
    }

    fn no_method(&self, name: &str, tok: &Token) -> Error {
        Error::runtime(
            format!(
                "{} does not contain property function {name}",
                self.type_name()
            ),
            tok.pos.clone(),
        )
    }
}

/// Fails unless exactly `expected` positional arguments were supplied.
pub fn verify_args(args: &Args, expected: usize, what: &str, tok: &Token) -> LuteResult<()> {
    let count = args.positional.len();
    if count != expected {
        return Err(Error::runtime(
            format!("{what} expects exactly {expected} arguments but received {count}"),
            tok.pos.clone(),
        ));
    }
    Ok(())
}

/// Extracts an int argument.
pub fn int_arg(value: &Value, what: &str, tok: &Token) -> LuteResult<i64> {
    match value {
        Value::Int(v) => Ok(*v),
        other => Err(Error::runtime(
            format!("'{what}' expects an int as an argument, received {}", other.type_name()),
            tok.pos.clone(),
        )),
    }
}

/// Extracts a string argument.
pub fn str_arg(value: &Value, what: &str, tok: &Token) -> LuteResult<String> {
    match value {
        Value::Str(s) => Ok(s.as_str().to_string()),
        other => Err(Error::runtime(
            format!(
                "'{what}' expects a string as an argument, received {}",
                other.type_name()
            ),
            tok.pos.clone(),
        )),
    }
}

/// Parses a leading integer (optional sign, digit run) from `s`.
fn parse_leading_int(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let mut end = 0;
    let bytes = trimmed.as_bytes();
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    trimmed[..end].parse().ok()
}

/// Parses a leading float (optional sign, digits, optional fraction).
fn parse_leading_float(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end == digits_start {
        return None;
    }
    trimmed[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok() -> Token {
        Token::eof()
    }

    #[test]
    fn test_size_properties() {
        let t = tok();
        assert!(matches!(
            Value::str("abc").get_property("size", &t).unwrap(),
            Value::Int(3)
        ));
        assert!(matches!(
            Value::list(vec![Value::Int(1)]).get_property("size", &t).unwrap(),
            Value::Int(1)
        ));
        assert!(matches!(
            Value::dict(Default::default()).get_property("size", &t).unwrap(),
            Value::Int(0)
        ));
    }

    #[test]
    fn test_doc_property_exists_everywhere() {
        let t = tok();
        let doc = Value::Int(1).get_property("_doc", &t).unwrap();
        assert_eq!(doc.to_string(), "");
    }

    #[test]
    fn test_unknown_property_is_name_error() {
        let t = tok();
        let err = Value::Int(1).get_property("size", &t).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Name);
    }

    #[test]
    fn test_leading_int_parse() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  -7 trailing"), Some(-7));
        assert_eq!(parse_leading_int("12abc"), Some(12));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_leading_float_parse() {
        assert_eq!(parse_leading_float("3.25"), Some(3.25));
        assert_eq!(parse_leading_float("-2"), Some(-2.0));
        assert_eq!(parse_leading_float("1.5x"), Some(1.5));
        assert_eq!(parse_leading_float("x"), None);
    }
}
