//! Host extension types.
//!
//! An embedder can expose its own aggregate types to scripts without the
//! core knowing anything about them: a [`HostType`] carries a creator
//! function and a method table of plain function pointers, and instances
//! carry an opaque [`HostHandle`] the methods downcast back to the concrete
//! type. This mirrors how records work, minus record syntax: calling the
//! type constructs an instance, calling a member dispatches through the
//! method table.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use lute_lex::Token;
use lute_util::LuteResult;

use crate::interp::Interp;
use crate::value::{Args, Value};

/// Behaviour the core needs from an embedder-defined value.
pub trait HostValue {
    /// The type name reported by `type(...)` and error messages.
    fn type_name(&self) -> &str;

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Shared, mutable handle on an embedder-defined value.
pub type HostHandle = Rc<RefCell<dyn HostValue>>;

/// Constructs an instance from the evaluated call arguments.
pub type HostCreator = fn(&Args, &Token) -> LuteResult<HostHandle>;

/// A method on a host type: receives the instance handle, the interpreter
/// (for nested evaluation), the evaluated arguments and the call token.
pub type HostMethod = fn(&HostHandle, &mut Interp, &Args, &Token) -> LuteResult<Value>;

/// An embedder-registered type.
pub struct HostType {
    /// Name the type is registered under.
    pub name: String,

    /// Constructor function.
    pub creator: HostCreator,

    /// Method table, keyed by method name.
    pub methods: IndexMap<String, HostMethod>,

    /// Documentation string surfaced through `_doc`.
    pub doc: String,
}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostType")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// An instance of a host type: the type (for its method table) plus the
/// opaque handle produced by the creator.
pub struct HostInstance {
    /// The type this instance belongs to.
    pub ty: Rc<HostType>,

    /// The embedder's value.
    pub handle: HostHandle,
}

impl HostInstance {
    /// The instance's type name as reported by the handle.
    pub fn type_name(&self) -> String {
        self.handle.borrow().type_name().to_string()
    }
}

impl fmt::Debug for HostInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostInstance({})", self.ty.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        n: i64,
    }

    impl HostValue for Counter {
        fn type_name(&self) -> &str {
            "Counter"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_handle_downcast() {
        let handle: HostHandle = Rc::new(RefCell::new(Counter { n: 41 }));
        {
            let mut borrowed = handle.borrow_mut();
            let counter = borrowed
                .as_any_mut()
                .downcast_mut::<Counter>()
                .expect("downcast");
            counter.n += 1;
        }
        let borrowed = handle.borrow();
        let counter = borrowed.as_any().downcast_ref::<Counter>().expect("downcast");
        assert_eq!(counter.n, 42);
        assert_eq!(borrowed.type_name(), "Counter");
    }
}
