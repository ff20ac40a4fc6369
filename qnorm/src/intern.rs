//! Interning of leaves.

use fnv::FnvHashMap;
use std::hash::Hash;
use std::rc::Rc;

/// Handle of an interned leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(usize);

/// Arena that shares one instance among all equal leaves.
///
/// The arena belongs to the session that creates leaves, e.g. a parser,
/// and is passed to wherever leaves are constructed.
/// Interned leaves can be compared by pointer, which makes
/// comparing terms containing them cheaper.
///
/// ~~~
/// # use qnorm::{Interner, Label};
/// # use std::rc::Rc;
/// let mut interner = Interner::new();
/// let a1 = interner.intern(Label::new("a"));
/// let a2 = interner.intern(Label::new("a"));
/// let b = interner.intern(Label::new("b"));
/// assert!(Rc::ptr_eq(&a1, &a2));
/// assert_eq!(interner.len(), 2);
///
/// let id = interner.id(&b).unwrap();
/// assert!(Rc::ptr_eq(interner.get(id).unwrap(), &b));
/// ~~~
#[derive(Debug)]
pub struct Interner<L> {
    leaves: Vec<Rc<L>>,
    ids: FnvHashMap<Rc<L>, LeafId>,
}

impl<L> Default for Interner<L> {
    fn default() -> Self {
        Self {
            leaves: Vec::new(),
            ids: Default::default(),
        }
    }
}

impl<L: Eq + Hash> Interner<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared instance of the leaf, inserting it if it is new.
    pub fn intern(&mut self, leaf: L) -> Rc<L> {
        if let Some(id) = self.ids.get(&leaf) {
            return self.leaves[id.0].clone();
        }
        let id = LeafId(self.leaves.len());
        let leaf = Rc::new(leaf);
        self.leaves.push(leaf.clone());
        self.ids.insert(leaf.clone(), id);
        leaf
    }

    /// Return the handle of a previously interned leaf.
    pub fn id(&self, leaf: &L) -> Option<LeafId> {
        self.ids.get(leaf).copied()
    }

    pub fn get(&self, id: LeafId) -> Option<&Rc<L>> {
        self.leaves.get(id.0)
    }

    /// Return the number of distinct leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}
