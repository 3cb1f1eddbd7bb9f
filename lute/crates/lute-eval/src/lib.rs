//! lute-eval - The Lute runtime.
//!
//! Everything past the parser lives here:
//!
//! - [`Value`] - the polymorphic runtime value and its operation protocol
//!   (arithmetic, comparison, indexing, properties, methods, hashing).
//! - [`Scope`] / [`Context`] - the scope stack with copy-on-enter and
//!   merge-existing-on-exit semantics, capped at [`MAX_SCOPE_DEPTH`].
//! - [`Interp`] - the tree-walking evaluator and the embedder API
//!   ([`Interp::register_builtin`], [`Interp::register_host_type`],
//!   [`Interp::set_global`], [`Interp::run_file`]).
//! - Host extension plumbing ([`HostValue`], [`HostType`], [`HostHandle`]).
//!
//! Control flow uses value wrappers, not unwinding: `return` evaluates to a
//! `Return` value and `break` to a `Break` value; sequencing points detect
//! them, function calls strip the `Return` wrapper, loops consume `Break`.
//! Errors are ordinary `Result::Err` values carrying a source position.

pub mod env;
pub mod host;
pub mod interp;
pub mod methods;
pub mod ops;
pub mod value;

mod edge_cases;

pub use env::{Context, Scope, MAX_SCOPE_DEPTH};
pub use host::{HostCreator, HostHandle, HostInstance, HostMethod, HostType, HostValue};
pub use interp::{Interp, MODULE_EXTENSION, STD_PATH_ENV};
pub use methods::{int_arg, str_arg, verify_args};
pub use value::{Args, Builtin, BuiltinFn, Dict, Function, RecordInstance, RecordType, Value};
