//! The `File` host type.
//!
//! Doubles as the reference use of the host-extension API: a creator that
//! validates its arguments into an opaque handle, plus a method table of
//! plain function pointers that downcast the handle back.
//!
//! ```text
//! f = File("notes.txt")
//! if f.exists() { println(f.read()) }
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;
use std::rc::Rc;

use lute_eval::{str_arg, verify_args, Args, HostHandle, HostValue, Interp, Value};
use lute_lex::Token;
use lute_util::{Error, LuteResult};

/// Registers the `File` host type.
pub fn register(interp: &mut Interp) {
    interp.register_host_type(
        "File",
        create,
        &[
            ("exists", exists),
            ("size", size),
            ("read", read),
            ("write", write),
        ],
        "File(path, mode = \"r\"): a file handle; methods: exists, size, read, write",
    );
}

struct FileHandle {
    path: PathBuf,
    mode: String,
}

impl HostValue for FileHandle {
    fn type_name(&self) -> &str {
        "File"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn create(args: &Args, tok: &Token) -> LuteResult<HostHandle> {
    if args.positional.is_empty() || args.positional.len() > 2 {
        return Err(Error::runtime(
            format!(
                "File expects a path and an optional mode but received {} arguments",
                args.positional.len()
            ),
            tok.pos.clone(),
        ));
    }

    let path = str_arg(&args.positional[0], "File", tok)?;
    let mode = match args.positional.get(1) {
        Some(value) => str_arg(value, "File", tok)?,
        None => "r".to_string(),
    };
    if !matches!(mode.as_str(), "r" | "w" | "a") {
        return Err(Error::runtime(
            format!("File mode must be \"r\", \"w\" or \"a\", received \"{mode}\""),
            tok.pos.clone(),
        ));
    }

    Ok(Rc::new(RefCell::new(FileHandle {
        path: PathBuf::from(path),
        mode,
    })))
}

fn with_handle<T>(handle: &HostHandle, f: impl FnOnce(&FileHandle) -> T) -> T {
    let borrowed = handle.borrow();
    let file = borrowed
        .as_any()
        .downcast_ref::<FileHandle>()
        .expect("File handle always wraps a FileHandle");
    f(file)
}

fn exists(handle: &HostHandle, _: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 0, "exists", tok)?;
    Ok(with_handle(handle, |file| Value::Bool(file.path.exists())))
}

fn size(handle: &HostHandle, _: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 0, "size", tok)?;
    with_handle(handle, |file| {
        fs::metadata(&file.path)
            .map(|meta| Value::Int(meta.len() as i64))
            .map_err(|e| {
                Error::runtime(
                    format!("could not stat '{}': {e}", file.path.display()),
                    tok.pos.clone(),
                )
            })
    })
}

fn read(handle: &HostHandle, _: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 0, "read", tok)?;
    with_handle(handle, |file| {
        fs::read_to_string(&file.path).map(Value::str).map_err(|e| {
            Error::runtime(
                format!("could not read '{}': {e}", file.path.display()),
                tok.pos.clone(),
            )
        })
    })
}

fn write(handle: &HostHandle, _: &mut Interp, args: &Args, tok: &Token) -> LuteResult<Value> {
    verify_args(args, 1, "write", tok)?;
    let text = str_arg(&args.positional[0], "write", tok)?;
    with_handle(handle, |file| {
        if file.mode == "r" {
            return Err(Error::runtime(
                format!("'{}' is not opened for writing", file.path.display()),
                tok.pos.clone(),
            ));
        }
        let mut options = OpenOptions::new();
        if file.mode == "a" {
            options.append(true).create(true);
        } else {
            options.write(true).create(true).truncate(true);
        }
        options
            .open(&file.path)
            .and_then(|mut f| f.write_all(text.as_bytes()))
            .map_err(|e| {
                Error::runtime(
                    format!("could not write '{}': {e}", file.path.display()),
                    tok.pos.clone(),
                )
            })?;
        Ok(Value::None)
    })
}
