//! Opaque leaf values owned by external domains.

use crate::Subst;
use crate::term::Name;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::rc::Rc;

/// Value of an external domain, such as a scalar or an atomic label.
///
/// The kernel never inspects leaves; it only compares, hashes, and prints them,
/// and asks them for their free variables, to absorb substitutions, and
/// to simplify themselves.
pub trait Leaf: Clone + Eq + Hash + Debug + Display + 'static {
    /// Return the names of the variables that the leaf references.
    fn free_vars(&self) -> Vec<Name> {
        Vec::new()
    }

    /// Absorb the bindings of a substitution.
    ///
    /// The substitution is restricted to variables that the leaf references.
    /// Return `None` if the leaf remains unchanged.
    fn subst(&self, _subst: &Subst<Self>) -> Option<Self> {
        None
    }

    /// Return a simplified version of the leaf, or `None` if it is already reduced.
    fn reduce(&self) -> Option<Self> {
        None
    }
}

/// Atomic label without variables, such as a basis vector name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label(Rc<str>);

impl Label {
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Leaf for Label {}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'{}'", self.0)
    }
}
