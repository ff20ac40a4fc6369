//! Side-channel information available to rewrite procedures.

use fnv::FnvBuildHasher;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Table of named values of arbitrary types.
///
/// A context is passed to every rewrite procedure.
/// It can be seeded by the caller of normalization and
/// is extended by the enrichers of a rule set before the first step.
/// Cloning a context is cheap, because its table is persistent.
///
/// ~~~
/// # use qnorm::Context;
/// let mut ctx = Context::new();
/// ctx.insert("universe", vec!["i", "j"]);
/// assert_eq!(ctx.get::<Vec<&str>>("universe").map(|u| u.len()), Some(2));
/// // values are only found with their original type
/// assert!(ctx.get::<String>("universe").is_none());
/// assert!(!ctx.contains("dims"));
/// ~~~
#[derive(Clone, Default)]
pub struct Context(im::HashMap<String, Rc<dyn Any>, FnvBuildHasher>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for a name, replacing any previous value.
    pub fn insert<T: Any>(&mut self, name: impl Into<String>, value: T) {
        self.0.insert(name.into(), Rc::new(value));
    }

    /// Return the value for a name if it exists and has type `T`.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        let value: &dyn Any = &**self.0.get(name)?;
        value.downcast_ref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<_> = self.0.keys().collect();
        names.sort();
        f.debug_set().entries(names).finish()
    }
}
