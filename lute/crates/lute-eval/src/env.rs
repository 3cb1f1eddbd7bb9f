//! Scopes and the scope stack.
//!
//! A [`Scope`] is an ordered mapping from identifier to value. The
//! [`Context`] keeps a stack of scopes with two invariants:
//!
//! - `enter_scope` pushes a copy of the top scope, so inner code sees every
//!   outer binding.
//! - `exit_scope` pops the top and writes back only those entries whose key
//!   already existed in the parent: updates of existing names propagate
//!   outward, newly introduced names are dropped.
//!
//! Values are shared handles, so copying a scope copies bindings, not the
//! lists and dictionaries they point at.
//!
//! The stack is capped at [`MAX_SCOPE_DEPTH`]; exceeding it (usually via
//! runaway recursion) is a hard runtime error at the call site.

use indexmap::IndexMap;

use crate::value::Value;

/// Hard cap on the scope stack depth.
pub const MAX_SCOPE_DEPTH: usize = 1000;

/// An ordered mapping from identifier to value.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    values: IndexMap<String, Value>,
}

impl Scope {
    /// Looks up a binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Creates or replaces a binding.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// True if `name` is bound in this scope.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no bindings exist.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn into_values(self) -> IndexMap<String, Value> {
        self.values
    }
}

/// The scope stack plus the dotted context name used for diagnostics and
/// the module (base) name used by the re-import check.
#[derive(Debug)]
pub struct Context {
    stack: Vec<Scope>,
    name: String,
    base_name: String,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// A context with a single empty module scope.
    pub fn new() -> Self {
        Self {
            stack: vec![Scope::default()],
            name: "_default".to_string(),
            base_name: "_module".to_string(),
        }
    }

    /// The scope lookups and assignments go through.
    pub fn current(&self) -> &Scope {
        self.stack.last().expect("scope stack is never empty")
    }

    /// Mutable access to the active scope.
    pub fn current_mut(&mut self) -> &mut Scope {
        self.stack.last_mut().expect("scope stack is never empty")
    }

    /// Pushes a copy of the top scope. Returns `false` when the stack is at
    /// [`MAX_SCOPE_DEPTH`]; the caller turns that into a runtime error.
    #[must_use]
    pub fn enter_scope(&mut self) -> bool {
        if self.stack.len() >= MAX_SCOPE_DEPTH {
            return false;
        }
        let top = self.current().clone();
        self.stack.push(top);
        true
    }

    /// Pops the top scope, merging updates of pre-existing names into the
    /// parent and dropping names introduced in the popped scope.
    pub fn exit_scope(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let popped = self.stack.pop().expect("checked above");
        let parent = self.current_mut();
        for (name, value) in popped.into_values() {
            if parent.has(&name) {
                parent.set(name, value);
            }
        }
    }

    /// Pops the top scope without merging. Used by imports, which decide
    /// themselves which module symbols flow into the caller.
    pub fn pop_scope(&mut self) -> Scope {
        if self.stack.len() <= 1 {
            return std::mem::take(self.current_mut());
        }
        self.stack.pop().expect("checked above")
    }

    /// Current stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The dotted context name (e.g. `_default.main.loop`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the dotted context name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The base (module) name of the file currently evaluating.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Replaces the base (module) name.
    pub fn set_base_name(&mut self, name: impl Into<String>) {
        self.base_name = name.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_scope_sees_outer_bindings() {
        let mut ctx = Context::new();
        ctx.current_mut().set("x", Value::Int(1));
        assert!(ctx.enter_scope());
        assert!(matches!(ctx.current().get("x"), Some(Value::Int(1))));
        ctx.exit_scope();
    }

    #[test]
    fn test_exit_merges_existing_names() {
        let mut ctx = Context::new();
        ctx.current_mut().set("x", Value::Int(1));
        assert!(ctx.enter_scope());
        ctx.current_mut().set("x", Value::Int(2));
        ctx.exit_scope();
        assert!(matches!(ctx.current().get("x"), Some(Value::Int(2))));
    }

    #[test]
    fn test_exit_drops_new_names() {
        let mut ctx = Context::new();
        assert!(ctx.enter_scope());
        ctx.current_mut().set("local", Value::Int(7));
        ctx.exit_scope();
        assert!(ctx.current().get("local").is_none());
    }

    #[test]
    fn test_depth_limit() {
        let mut ctx = Context::new();
        let mut entered = 0;
        while ctx.enter_scope() {
            entered += 1;
        }
        assert_eq!(entered, MAX_SCOPE_DEPTH - 1);
        assert_eq!(ctx.depth(), MAX_SCOPE_DEPTH);
    }

    #[test]
    fn test_pop_scope_does_not_merge() {
        let mut ctx = Context::new();
        ctx.current_mut().set("x", Value::Int(1));
        assert!(ctx.enter_scope());
        ctx.current_mut().set("x", Value::Int(9));
        let popped = ctx.pop_scope();
        assert!(matches!(popped.get("x"), Some(Value::Int(9))));
        assert!(matches!(ctx.current().get("x"), Some(Value::Int(1))));
    }

    #[test]
    fn test_names() {
        let mut ctx = Context::new();
        assert_eq!(ctx.name(), "_default");
        assert_eq!(ctx.base_name(), "_module");
        ctx.set_name("_default.f");
        ctx.set_base_name("main");
        assert_eq!(ctx.name(), "_default.f");
        assert_eq!(ctx.base_name(), "main");
    }
}
