//! lute-std - The Lute standard library.
//!
//! Everything here is injected through the embedder API of `lute-eval`;
//! the core interpreter has no built-in names at all. [`install`] registers
//! the `true`/`false` globals, the builtin functions (`println`, `print`,
//! `readLine`, `type`, `hash`, time and random helpers, ...) and the `File`
//! host type. Each builtin carries a `_doc` string.

mod builtins;
mod file;

use lute_eval::Interp;

/// Installs the standard library into `interp`'s module scope.
pub fn install(interp: &mut Interp) {
    builtins::register(interp);
    file::register(interp);
}
