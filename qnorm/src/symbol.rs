//! Symbols tagging compound terms.

use std::borrow::Borrow;
use std::fmt::{self, Display};
use std::rc::Rc;

/// Symbol tag of a compound term, such as `ADD` or `SUM`.
///
/// Symbols are compared, ordered, and hashed by their name.
/// Cloning a symbol only increments a reference count.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Rc<str>);

impl Symbol {
    /// Create a new symbol.
    ///
    /// ~~~
    /// # use qnorm::Symbol;
    /// assert_eq!(Symbol::new("ADD"), Symbol::from("ADD"));
    /// assert_eq!(Symbol::new("ADD").name(), "ADD");
    /// ~~~
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[test]
fn debug() {
    let add = Symbol::new("ADD");
    assert_eq!(format!("{:?}", add), "ADD");
    assert_eq!(format!("{:?}", [add.clone(), add]), "[ADD, ADD]");
}
