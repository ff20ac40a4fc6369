//! Terms: variables, leaves, and compound terms.
//!
//! Compound terms are only built through the smart constructors of [`Term`],
//! which establish the structural invariants of every term shape:
//!
//! * AC children are flattened and sorted by [`Term::key`],
//!   and an AC term with a single child collapses to that child.
//! * Commutative pairs are stored in canonical order.
//! * A multi-binder without binders degenerates to its body, and
//!   a multi-binder whose body is a multi-binder with the same symbol
//!   merges both binder lists.

use crate::fresh::fresh;
use crate::{Error, Leaf, Subst, Symbol};
use fnv::FnvHashSet;
use std::fmt::{self, Display};
use std::ops::Deref;
use std::rc::Rc;

/// Name of a variable.
pub type Name = Rc<str>;

/// Shape of a term, used mostly for error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Var,
    Leaf,
    Std,
    Ac,
    Comm,
    Bind,
    MultiBind,
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Var => "variable",
            Self::Leaf => "leaf",
            Self::Std => "standard",
            Self::Ac => "AC",
            Self::Comm => "commutative",
            Self::Bind => "binder",
            Self::MultiBind => "multi-binder",
        };
        s.fmt(f)
    }
}

/// Term with leaves of type `L`.
#[derive(Clone, Debug)]
pub enum Term<L> {
    Var(Name),
    Leaf(Rc<L>),
    Comb(RTerm<L>),
}

/// Compound term.
#[derive(Clone, Debug)]
pub enum TermC<L> {
    /// ordered application of a symbol
    Std(Symbol, Vec<Term<L>>),
    /// application of an associative-commutative symbol
    Ac(Symbol, Vec<Term<L>>),
    /// application of a commutative binary symbol
    Comm(Symbol, [Term<L>; 2]),
    /// binding of a single variable in a body
    Bind(Symbol, Name, Term<L>),
    /// binding of several variables in a body
    MultiBind(Symbol, Vec<Binder<L>>, Term<L>),
}

/// Variable bound by a multi-binder, with an optional domain.
///
/// A binder without domain ranges over the universal domain.
/// Domains lie outside the scope of the multi-binder.
#[derive(Clone, Debug)]
pub struct Binder<L> {
    pub var: Name,
    pub dom: Option<Term<L>>,
}

impl<L> Binder<L> {
    pub fn new(var: impl Into<Name>, dom: Term<L>) -> Self {
        let var = var.into();
        let dom = Some(dom);
        Self { var, dom }
    }

    pub fn universal(var: impl Into<Name>) -> Self {
        let var = var.into();
        Self { var, dom: None }
    }
}

/// Pointer to a shared compound term.
#[derive(Clone, Debug)]
pub struct RTerm<L>(Rc<TermC<L>>);

impl<L> RTerm<L> {
    fn new(tm: TermC<L>) -> Self {
        Self(Rc::new(tm))
    }

    /// Compare the memory addresses of two term pointers.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<L> Deref for RTerm<L> {
    type Target = TermC<L>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<L> TermC<L> {
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::Std(s, _) | Self::Ac(s, _) => s,
            Self::Comm(s, _) | Self::Bind(s, ..) | Self::MultiBind(s, ..) => s,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Std(..) => Kind::Std,
            Self::Ac(..) => Kind::Ac,
            Self::Comm(..) => Kind::Comm,
            Self::Bind(..) => Kind::Bind,
            Self::MultiBind(..) => Kind::MultiBind,
        }
    }
}

impl<L> Term<L> {
    pub fn var(name: impl Into<Name>) -> Self {
        Self::Var(name.into())
    }

    pub fn leaf(leaf: L) -> Self {
        Self::Leaf(Rc::new(leaf))
    }

    fn comb(tm: TermC<L>) -> Self {
        Self::Comb(RTerm::new(tm))
    }

    /// Return the compound term if the term is one.
    pub fn get(&self) -> Option<&TermC<L>> {
        match self {
            Self::Comb(c) => Some(&**c),
            _ => None,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Var(_) => Kind::Var,
            Self::Leaf(_) => Kind::Leaf,
            Self::Comb(c) => c.kind(),
        }
    }

    /// Return the children of an AC term with the given symbol.
    pub fn get_ac(&self, tag: &Symbol) -> Option<&[Self]> {
        match self.get()? {
            TermC::Ac(s, args) if s == tag => Some(args),
            _ => None,
        }
    }

    fn get_multi_bind(&self, tag: &Symbol) -> Option<(&[Binder<L>], &Self)> {
        match self.get()? {
            TermC::MultiBind(s, binders, body) if s == tag => Some((binders, body)),
            _ => None,
        }
    }

    /// Compare the memory addresses of two term pointers.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Var(x), Self::Var(y)) => x == y,
            (Self::Leaf(l), Self::Leaf(r)) => Rc::ptr_eq(l, r),
            (Self::Comb(l), Self::Comb(r)) => l.ptr_eq(r),
            _ => false,
        }
    }

    /// Number of nodes of the term.
    ///
    /// A binder node counts as the size of its body plus
    /// the number of its bound variables plus one.
    ///
    /// ~~~
    /// # use qnorm::{Label, Symbol, Term};
    /// let f = Symbol::new("F");
    /// let tm: Term<Label> = Term::std(f.clone(), [Term::var("x"), Term::var("y")]);
    /// assert_eq!(tm.size(), 3);
    /// assert_eq!(Term::bind(Symbol::new("LAM"), "x", tm).size(), 5);
    /// ~~~
    pub fn size(&self) -> usize {
        match self {
            Self::Var(_) | Self::Leaf(_) => 1,
            Self::Comb(c) => match &**c {
                TermC::Std(_, args) | TermC::Ac(_, args) => {
                    1 + args.iter().map(|a| a.size()).sum::<usize>()
                }
                TermC::Comm(_, [a, b]) => 1 + a.size() + b.size(),
                TermC::Bind(_, _, body) => body.size() + 2,
                TermC::MultiBind(_, binders, body) => body.size() + binders.len() + 1,
            },
        }
    }
}

impl<L: Leaf> Term<L> {
    /// Constant, i.e. a standard symbol without arguments.
    pub fn constant(tag: Symbol) -> Self {
        Self::std(tag, Vec::new())
    }

    pub fn std(tag: Symbol, args: impl IntoIterator<Item = Self>) -> Self {
        Self::comb(TermC::Std(tag, args.into_iter().collect()))
    }

    /// Construct an AC term, flattening and sorting its children.
    ///
    /// ~~~
    /// # use qnorm::{Error, Label, Symbol, Term};
    /// let add = Symbol::new("ADD");
    /// let (x, y) = (Term::<Label>::var("x"), Term::var("y"));
    /// let xy = Term::ac(add.clone(), [x.clone(), y.clone()])?;
    /// let l = Term::ac(add.clone(), [xy, x.clone()])?;
    /// let r = Term::ac(add.clone(), [y.clone(), x.clone(), x.clone()])?;
    /// assert_eq!(l, r);
    /// assert_eq!(l.size(), 4);
    ///
    /// assert_eq!(Term::ac(add.clone(), [x.clone()])?, x);
    /// assert_eq!(Term::<Label>::ac(add.clone(), []), Err(Error::EmptyAc(add)));
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn ac(tag: Symbol, args: impl IntoIterator<Item = Self>) -> Result<Self, Error> {
        match Self::ac_flat(tag.clone(), args) {
            Some(tm) => Ok(tm),
            None => Err(Error::EmptyAc(tag)),
        }
    }

    /// Construct an AC term, returning `None` if there are no children.
    pub(crate) fn ac_flat(tag: Symbol, args: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut children = Vec::new();
        for arg in args {
            let nested = arg.get_ac(&tag).map(<[_]>::to_vec);
            match nested {
                Some(nested) => children.extend(nested),
                None => children.push(arg),
            }
        }
        if children.len() <= 1 {
            return children.pop();
        }
        children.sort_by_cached_key(Term::key);
        Some(Self::comb(TermC::Ac(tag, children)))
    }

    /// Construct a commutative binary term.
    pub fn comm(tag: Symbol, a: Self, b: Self) -> Self {
        let pair = if b.key() < a.key() { [b, a] } else { [a, b] };
        Self::comb(TermC::Comm(tag, pair))
    }

    pub fn bind(tag: Symbol, var: impl Into<Name>, body: Self) -> Self {
        Self::comb(TermC::Bind(tag, var.into(), body))
    }

    /// Construct a multi-binder.
    ///
    /// ~~~
    /// # use qnorm::{Binder, Error, Label, Symbol, Term};
    /// let sum = Symbol::new("SUM");
    /// let p = |x, y| Term::<Label>::std(Symbol::new("P"), [Term::var(x), Term::var(y)]);
    ///
    /// // binders are merged and compared modulo permutation
    /// let inner = Term::multi_bind(sum.clone(), [Binder::universal("j")], p("i", "j"))?;
    /// let nested = Term::multi_bind(sum.clone(), [Binder::universal("i")], inner)?;
    /// let flat = Term::multi_bind(sum.clone(), ["j", "i"].map(Binder::universal), p("i", "j"))?;
    /// assert_eq!(nested, flat);
    ///
    /// // no binders
    /// assert_eq!(Term::multi_bind(sum.clone(), [], p("i", "j"))?, p("i", "j"));
    ///
    /// let dup = Term::multi_bind(sum.clone(), ["i", "i"].map(Binder::universal), p("i", "i"));
    /// assert_eq!(dup, Err(Error::DuplicateBinder(sum, "i".into())));
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn multi_bind(
        tag: Symbol,
        binders: impl IntoIterator<Item = Binder<L>>,
        body: Self,
    ) -> Result<Self, Error> {
        let binders: Vec<_> = binders.into_iter().collect();
        let mut seen = FnvHashSet::default();
        for b in &binders {
            if !seen.insert(b.var.clone()) {
                return Err(Error::DuplicateBinder(tag, b.var.clone()));
            }
        }
        Ok(Self::multi_bind_unique(tag, binders, body))
    }

    /// Construct a multi-binder from binders with pairwise different names.
    pub(crate) fn multi_bind_unique(tag: Symbol, mut binders: Vec<Binder<L>>, body: Self) -> Self {
        if binders.is_empty() {
            return body;
        }
        if let Some((inner, inner_body)) = body.get_multi_bind(&tag) {
            let outer: FnvHashSet<Name> = binders.iter().map(|b| b.var.clone()).collect();
            let mut doms = inner.iter().filter_map(|b| b.dom.as_ref());
            // inner domains are in the scope of the outer binders
            if !doms.any(|dom| dom.free_vars().iter().any(|x| outer.contains(x))) {
                let mut avoid = body.vars();
                avoid.extend(outer.iter().cloned());
                let mut renaming = Subst::new();
                for b in inner {
                    let var = if outer.contains(&b.var) {
                        let x = fresh(&b.var, |x| avoid.contains(x));
                        avoid.insert(x.clone());
                        renaming = renaming.with(b.var.clone(), Term::Var(x.clone()));
                        x
                    } else {
                        b.var.clone()
                    };
                    binders.push(Binder { var, dom: b.dom.clone() });
                }
                let inner_body = inner_body.subst(&renaming);
                return Self::comb(TermC::MultiBind(tag, binders, inner_body));
            }
        }
        Self::comb(TermC::MultiBind(tag, binders, body))
    }

    /// Names of all variables occurring in the term, bound or free.
    pub fn vars(&self) -> FnvHashSet<Name> {
        let mut acc = FnvHashSet::default();
        self.vars_into(&mut acc, true);
        acc
    }

    /// Names of all variables occurring in the term, ignoring those of leaves.
    ///
    /// ~~~
    /// # use qnorm::{Leaf, Name, Symbol, Term};
    /// # #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    /// # struct Param(Name);
    /// # impl Leaf for Param {
    /// #     fn free_vars(&self) -> Vec<Name> { vec![self.0.clone()] }
    /// # }
    /// # impl std::fmt::Display for Param {
    /// #     fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result { write!(f, "{}", self.0) }
    /// # }
    /// let tm = Term::std(Symbol::new("F"), [Term::var("x"), Term::leaf(Param("p".into()))]);
    /// assert_eq!(tm.vars().len(), 2);
    /// assert_eq!(tm.vars_outside_leaves().len(), 1);
    /// ~~~
    pub fn vars_outside_leaves(&self) -> FnvHashSet<Name> {
        let mut acc = FnvHashSet::default();
        self.vars_into(&mut acc, false);
        acc
    }

    fn vars_into(&self, acc: &mut FnvHashSet<Name>, leaves: bool) {
        match self {
            Self::Var(x) => {
                acc.insert(x.clone());
            }
            Self::Leaf(l) if leaves => acc.extend(l.free_vars()),
            Self::Leaf(_) => (),
            Self::Comb(c) => match &**c {
                TermC::Std(_, args) | TermC::Ac(_, args) => {
                    args.iter().for_each(|a| a.vars_into(acc, leaves))
                }
                TermC::Comm(_, pair) => pair.iter().for_each(|a| a.vars_into(acc, leaves)),
                TermC::Bind(_, x, body) => {
                    acc.insert(x.clone());
                    body.vars_into(acc, leaves)
                }
                TermC::MultiBind(_, binders, body) => {
                    for b in binders {
                        acc.insert(b.var.clone());
                        b.dom.iter().for_each(|dom| dom.vars_into(acc, leaves));
                    }
                    body.vars_into(acc, leaves)
                }
            },
        }
    }

    /// Names of the variables occurring unbound in the term.
    ///
    /// ~~~
    /// # use qnorm::{Label, Symbol, Term};
    /// let f = Symbol::new("F");
    /// let tm: Term<Label> = Term::std(f, [Term::var("x"), Term::var("y")]);
    /// let lam = Term::bind(Symbol::new("LAM"), "x", tm);
    /// assert_eq!(lam.free_vars().len(), 1);
    /// assert!(lam.free_vars().contains("y"));
    /// assert_eq!(lam.vars().len(), 2);
    /// ~~~
    pub fn free_vars(&self) -> FnvHashSet<Name> {
        let mut acc = FnvHashSet::default();
        self.free_vars_into(&mut Vec::new(), &mut acc);
        acc
    }

    fn free_vars_into(&self, bound: &mut Vec<Name>, acc: &mut FnvHashSet<Name>) {
        match self {
            Self::Var(x) => {
                if !bound.contains(x) {
                    acc.insert(x.clone());
                }
            }
            Self::Leaf(l) => acc.extend(l.free_vars().into_iter().filter(|x| !bound.contains(x))),
            Self::Comb(c) => match &**c {
                TermC::Std(_, args) | TermC::Ac(_, args) => {
                    args.iter().for_each(|a| a.free_vars_into(bound, acc))
                }
                TermC::Comm(_, pair) => pair.iter().for_each(|a| a.free_vars_into(bound, acc)),
                TermC::Bind(_, x, body) => {
                    bound.push(x.clone());
                    body.free_vars_into(bound, acc);
                    bound.pop();
                }
                TermC::MultiBind(_, binders, body) => {
                    let doms = binders.iter().filter_map(|b| b.dom.as_ref());
                    doms.for_each(|dom| dom.free_vars_into(bound, acc));
                    let len = bound.len();
                    bound.extend(binders.iter().map(|b| b.var.clone()));
                    body.free_vars_into(bound, acc);
                    bound.truncate(len);
                }
            },
        }
    }

    /// Return true if the term has no free variables.
    pub fn is_ground(&self) -> bool {
        self.free_vars().is_empty()
    }
}

impl<L> From<Rc<L>> for Term<L> {
    fn from(leaf: Rc<L>) -> Self {
        Self::Leaf(leaf)
    }
}

fn format<H: Display, T: Display>(head: &H, tail: &[T], f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}(", head)?;
    let mut iter = tail.iter();
    if let Some(first) = iter.next() {
        write!(f, "{}", first)?;
    }
    iter.try_for_each(|t| write!(f, ", {}", t))?;
    write!(f, ")")
}

impl<L: Display> Display for Term<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Var(x) => x.fmt(f),
            Self::Leaf(l) => l.fmt(f),
            Self::Comb(c) => c.fmt(f),
        }
    }
}

impl<L: Display> Display for TermC<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Std(s, args) if args.is_empty() => s.fmt(f),
            Self::Std(s, args) | Self::Ac(s, args) => format(s, args, f),
            Self::Comm(s, pair) => format(s, pair, f),
            Self::Bind(s, x, body) => write!(f, "{}({}. {})", s, x, body),
            Self::MultiBind(s, binders, body) => {
                write!(f, "{}(", s)?;
                let mut iter = binders.iter();
                if let Some(first) = iter.next() {
                    write!(f, "{}", first)?;
                }
                iter.try_for_each(|b| write!(f, ", {}", b))?;
                write!(f, ". {})", body)
            }
        }
    }
}

impl<L: Display> Display for Binder<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.dom {
            None => self.var.fmt(f),
            Some(dom) => write!(f, "{} : {}", self.var, dom),
        }
    }
}

#[test]
fn display() {
    use crate::Label;
    let add = Symbol::new("ADD");
    let zero = Term::<Label>::constant(Symbol::new("ZERO"));
    let tm = Term::std(Symbol::new("F"), [zero, Term::leaf(Label::new("a"))]);
    assert_eq!(tm.to_string(), "F(ZERO, 'a')");

    let ac = Term::<Label>::ac(add.clone(), [Term::var("x"), Term::var("x")]).unwrap();
    assert_eq!(ac.to_string(), "ADD(x, x)");

    let sum = Term::multi_bind(
        Symbol::new("SUM"),
        [Binder::new("i", Term::constant(Symbol::new("U"))), Binder::universal("j")],
        Term::<Label>::var("i"),
    );
    assert_eq!(sum.unwrap().to_string(), "SUM(i : U, j. i)");
}

#[test]
fn comm_order() {
    use crate::Label;
    let pair = Symbol::new("PAIR");
    let (x, y) = (Term::<Label>::var("x"), Term::var("y"));
    let l = Term::comm(pair.clone(), x.clone(), y.clone());
    let r = Term::comm(pair, y, x);
    assert_eq!(l.to_string(), r.to_string());
}

#[test]
fn merge_shadowed() {
    use crate::Label;
    let sum = Symbol::new("SUM");
    let p = |x, y| Term::<Label>::std(Symbol::new("P"), [Term::var(x), Term::var(y)]);

    // SUM(i. SUM(i. P(i, j))): the outer `i` is shadowed
    let inner = Term::multi_bind(sum.clone(), [Binder::universal("i")], p("i", "j")).unwrap();
    let nested = Term::multi_bind(sum.clone(), [Binder::universal("i")], inner).unwrap();
    match nested.get() {
        Some(TermC::MultiBind(_, binders, body)) => {
            assert_eq!(binders.len(), 2);
            assert_ne!(binders[0].var, binders[1].var);
            assert!(body.free_vars().contains("j"));
            assert!(body.free_vars().contains(&*binders[1].var));
        }
        _ => panic!("expected multi-binder"),
    }

    // inner domain depending on outer binder prevents merging
    let dom = Term::std(Symbol::new("RANGE"), [Term::var("i")]);
    let inner = Term::multi_bind(sum.clone(), [Binder::new("j", dom)], p("i", "j")).unwrap();
    let nested = Term::multi_bind(sum, [Binder::universal("i")], inner).unwrap();
    match nested.get() {
        Some(TermC::MultiBind(_, binders, body)) => {
            assert_eq!(binders.len(), 1);
            assert_eq!(body.kind(), Kind::MultiBind);
        }
        _ => panic!("expected multi-binder"),
    }
}
