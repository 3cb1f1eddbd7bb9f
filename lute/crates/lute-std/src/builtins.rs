//! The builtin functions.
//!
//! Plain function pointers with the `BuiltinFn` signature, registered by
//! [`register`]. Argument checking reuses the runtime's `verify_args`
//! helpers so the error wording matches method calls.

use std::io::Write as _;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use lute_eval::{int_arg, str_arg, verify_args, Args, Interp, Value};
use lute_lex::Token;
use lute_util::{Error, ErrorKind, LuteResult};

/// Registers the global values and builtin functions.
pub fn register(interp: &mut Interp) {
    interp.set_global("true", Value::Bool(true));
    interp.set_global("false", Value::Bool(false));

    interp.register_builtin(
        "println",
        print_line,
        "println(values,...): print values to the console followed by a newline",
    );
    interp.register_builtin(
        "print",
        print_same_line,
        "print(values,...): print values to the console without a newline",
    );
    interp.register_builtin(
        "readLine",
        read_line,
        "readLine(): pause the terminal and read a line of input as a string",
    );
    interp.register_builtin(
        "type",
        get_type,
        "type(value): get the type of the value as a string",
    );
    interp.register_builtin(
        "hash",
        hash_value,
        "hash(value): return the hash of the value, errors for unhashable values",
    );
    interp.register_builtin("getTime", get_time, "getTime(): current time in milliseconds");
    interp.register_builtin(
        "getElapsedTimeMS",
        elapsed_ms,
        "getElapsedTimeMS(start, end): difference between two getTime() readings in milliseconds",
    );
    interp.register_builtin(
        "getElapsedTimeNS",
        elapsed_ns,
        "getElapsedTimeNS(start, end): difference between two getTime() readings in nanoseconds",
    );
    interp.register_builtin("sleep", sleep, "sleep(ms): sleep for the given amount of milliseconds");
    interp.register_builtin("rnd", random_int, "rnd(max): a random number between 0 and max");
    interp.register_builtin("round", math_round, "round(value): the value rounded to the nearest int");
    interp.register_builtin("floor", math_floor, "floor(value): the value rounded down to an int");
    interp.register_builtin(
        "fillList",
        fill_list,
        "fillList(list, count): append count zeros to the list",
    );
    interp.register_builtin(
        "fromCharCode",
        from_char_code,
        "fromCharCode(int or list): build a string from ascii codes",
    );
    interp.register_builtin("error", raise_error, "error(msg): raise an error with the given message");
    interp.register_builtin("exit", exit, "exit(code = 0): stop the interpreter");
}

fn print_line(_: &mut Interp, args: &Args, _tok: &Token) -> LuteResult<Value> {
    let line = args
        .positional
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    println!("{line}");
    Ok(Value::None)
}

fn print_same_line(_: &mut Interp, args: &Args, _tok: &Token) -> LuteResult<Value> {
    for value in &args.positional {
        print!("{value}");
    }
    let _ = std::io::stdout().flush();
    Ok(Value::None)
}

fn read_line(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 0, "readLine", tok)?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| Error::runtime(format!("could not read input: {e}"), tok.pos.clone()))?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Value::str(line))
}

fn get_type(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 1, "type", tok)?;
    Ok(Value::str(args.positional[0].type_name()))
}

fn hash_value(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 1, "hash", tok)?;
    let digest = args.positional[0].hash_key(tok)?;
    Ok(Value::Int(digest as i64))
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn get_time(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 0, "getTime", tok)?;
    Ok(Value::Int(now_ms()))
}

fn elapsed_ms(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 2, "getElapsedTimeMS", tok)?;
    let start = int_arg(&args.positional[0], "getElapsedTimeMS", tok)?;
    let end = int_arg(&args.positional[1], "getElapsedTimeMS", tok)?;
    Ok(Value::Int(end.wrapping_sub(start)))
}

fn elapsed_ns(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 2, "getElapsedTimeNS", tok)?;
    let start = int_arg(&args.positional[0], "getElapsedTimeNS", tok)?;
    let end = int_arg(&args.positional[1], "getElapsedTimeNS", tok)?;
    Ok(Value::Int(end.wrapping_sub(start).wrapping_mul(1_000_000)))
}

fn sleep(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 1, "sleep", tok)?;
    let ms = int_arg(&args.positional[0], "sleep", tok)?;
    if ms > 0 {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
    Ok(Value::None)
}

fn random_int(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 1, "rnd", tok)?;
    let max = int_arg(&args.positional[0], "rnd", tok)?;
    if max <= 0 {
        return Err(Error::runtime(
            "rnd expects a max greater than zero",
            tok.pos.clone(),
        ));
    }
    Ok(Value::Int(fastrand::i64(0..max)))
}

fn math_round(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 1, "round", tok)?;
    match &args.positional[0] {
        Value::Int(v) => Ok(Value::Int(*v)),
        Value::Float(v) => Ok(Value::Int(v.round() as i64)),
        other => Err(Error::runtime(
            format!("round expects a number, received {}", other.type_name()),
            tok.pos.clone(),
        )),
    }
}

fn math_floor(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 1, "floor", tok)?;
    match &args.positional[0] {
        Value::Int(v) => Ok(Value::Int(*v)),
        Value::Float(v) => Ok(Value::Int(v.floor() as i64)),
        other => Err(Error::runtime(
            format!("floor expects a number, received {}", other.type_name()),
            tok.pos.clone(),
        )),
    }
}

fn fill_list(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 2, "fillList", tok)?;
    let Value::List(items) = &args.positional[0] else {
        return Err(Error::runtime(
            format!(
                "fillList expects a list, received {}",
                args.positional[0].type_name()
            ),
            tok.pos.clone(),
        ));
    };
    let count = int_arg(&args.positional[1], "fillList", tok)?;
    let mut items = items.borrow_mut();
    for _ in 0..count.max(0) {
        items.push(Value::Int(0));
    }
    Ok(Value::None)
}

fn from_char_code(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 1, "fromCharCode", tok)?;

    fn code_to_char(code: i64, tok: &Token) -> LuteResult<char> {
        u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                Error::runtime(format!("invalid character code {code}"), tok.pos.clone())
            })
    }

    match &args.positional[0] {
        Value::Int(code) => Ok(Value::str(code_to_char(*code, tok)?.to_string())),
        Value::List(items) => {
            let mut out = String::new();
            for item in items.borrow().iter() {
                let code = int_arg(item, "fromCharCode", tok)?;
                out.push(code_to_char(code, tok)?);
            }
            Ok(Value::str(out))
        }
        other => Err(Error::runtime(
            format!(
                "fromCharCode expects an int or a list of ints, received {}",
                other.type_name()
            ),
            tok.pos.clone(),
        )),
    }
}

fn raise_error(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 1, "error", tok)?;
    let message = str_arg(&args.positional[0], "error", tok)?;
    Err(Error::new(ErrorKind::Generic, message, tok.pos.clone()))
}

fn exit(_: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    let code = if args.positional.is_empty() {
        0
    } else {
        verify_args(args, 1, "exit", tok)?;
        int_arg(&args.positional[0], "exit", tok)? as i32
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interp() -> Interp {
        let mut interp = Interp::new();
        register(&mut interp);
        interp
    }

    fn eval(source: &str) -> String {
        interp().run_source("<test>", source).unwrap().to_string()
    }

    #[test]
    fn test_type_builtin() {
        assert_eq!(eval("type(1)"), "int");
        assert_eq!(eval("type(1.5)"), "float");
        assert_eq!(eval("type('x')"), "string");
        assert_eq!(eval("type([1])"), "list");
        assert_eq!(eval("type(true)"), "bool");
        assert_eq!(eval("type(println)"), "builtin");
    }

    #[test]
    fn test_hash_builtin_deterministic() {
        let mut interp = interp();
        let a = interp.run_source("<t>", "hash('k')").unwrap().to_string();
        let b = interp.run_source("<t>", "hash('k')").unwrap().to_string();
        assert_eq!(a, b);
        assert!(interp.run_source("<t>", "hash([1])").is_err());
    }

    #[test]
    fn test_round_and_floor() {
        assert_eq!(eval("round(2.5)"), "3");
        assert_eq!(eval("round(2.4)"), "2");
        assert_eq!(eval("floor(2.9)"), "2");
        assert_eq!(eval("round(7)"), "7");
    }

    #[test]
    fn test_rnd_bounds() {
        let mut interp = interp();
        for _ in 0..50 {
            let value = interp.run_source("<t>", "rnd(10)").unwrap();
            let Value::Int(v) = value else { panic!("rnd must yield an int") };
            assert!((0..10).contains(&v));
        }
        assert!(interp.run_source("<t>", "rnd(0)").is_err());
    }

    #[test]
    fn test_fill_list() {
        assert_eq!(eval("xs = [1] fillList(xs, 3) xs"), "[1, 0, 0, 0]");
    }

    #[test]
    fn test_from_char_code() {
        assert_eq!(eval("fromCharCode(65)"), "A");
        assert_eq!(eval("fromCharCode([104, 105])"), "hi");
        assert!(interp().run_source("<t>", "fromCharCode(-5)").is_err());
    }

    #[test]
    fn test_elapsed_helpers() {
        assert_eq!(eval("getElapsedTimeMS(100, 350)"), "250");
        assert_eq!(eval("getElapsedTimeNS(1, 2)"), "1000000");
    }

    #[test]
    fn test_error_builtin() {
        let err = interp().run_source("<t>", "error('boom')").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Generic);
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn test_builtins_carry_docs() {
        let doc = eval("println._doc");
        assert!(doc.contains("newline"));
    }
}
