//! Substitutions and capture-avoiding substitution of terms.

use crate::Leaf;
use crate::fresh::fresh;
use crate::term::{Binder, Name, Term, TermC};
use fnv::{FnvHashMap, FnvHashSet};
use im::OrdMap;
use std::fmt::{self, Display};

/// Immutable mapping from variable names to terms.
///
/// Names not in the domain of a substitution are left unchanged by it.
#[derive(Clone, Debug)]
pub struct Subst<L>(OrdMap<Name, Term<L>>);

impl<L> Default for Subst<L> {
    fn default() -> Self {
        Self(OrdMap::new())
    }
}

fn is_identity<L>(x: &Name, tm: &Term<L>) -> bool {
    matches!(tm, Term::Var(y) if x == y)
}

impl<L> Subst<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, x: &str) -> Option<&Term<L>> {
        self.0.get(x)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Term<L>)> {
        self.0.iter()
    }

    /// Names bound by the substitution.
    pub fn domain(&self) -> impl Iterator<Item = &Name> {
        self.0.keys()
    }

    /// Terms that names are mapped to.
    pub fn range(&self) -> impl Iterator<Item = &Term<L>> {
        self.0.values()
    }
}

impl<L: Clone> Subst<L> {
    pub fn singleton(x: impl Into<Name>, tm: Term<L>) -> Self {
        Self(OrdMap::unit(x.into(), tm))
    }

    /// Return the substitution extended (or overridden) by a binding.
    pub fn with(&self, x: impl Into<Name>, tm: Term<L>) -> Self {
        Self(self.0.update(x.into(), tm))
    }

    /// Return the substitution without a binding for the given name.
    pub fn without(&self, x: &str) -> Self {
        Self(self.0.without(x))
    }

    /// Keep only the bindings of names that satisfy the predicate.
    pub fn restrict(&self, keep: impl Fn(&str) -> bool) -> Self {
        let iter = self.0.iter().filter(|(x, _)| keep(x));
        Self(iter.map(|(x, tm)| (x.clone(), tm.clone())).collect())
    }
}

impl<L: Leaf> Subst<L> {
    /// Free variables occurring in the range.
    pub fn vrange(&self) -> FnvHashSet<Name> {
        self.range().flat_map(|tm| tm.free_vars()).collect()
    }

    pub fn apply(&self, tm: &Term<L>) -> Term<L> {
        tm.subst(self)
    }

    /// Return the composition `self ∘ other`, which applies `other` first.
    ///
    /// Identity bindings `x := x` are dropped from the result.
    ///
    /// ~~~
    /// # use qnorm::{Label, Subst, Term};
    /// let f = Subst::singleton("x", Term::<Label>::var("y"));
    /// let g = Subst::singleton("z", Term::var("x"));
    /// let fg = f.compose(&g);
    /// let z = Term::var("z");
    /// assert_eq!(fg.apply(&z), f.apply(&g.apply(&z)));
    /// assert_eq!(fg.apply(&z), Term::var("y"));
    /// ~~~
    pub fn compose(&self, other: &Self) -> Self {
        let applied = other.iter().map(|(x, tm)| (x.clone(), tm.subst(self)));
        let rest = self.iter().filter(|(x, _)| !other.0.contains_key(*x));
        let rest = rest.map(|(x, tm)| (x.clone(), tm.clone()));
        let all = applied.chain(rest).filter(|(x, tm)| !is_identity(x, tm));
        Self(all.collect())
    }

    /// Return true if no name of the domain occurs free in the range.
    pub fn is_idempotent(&self) -> bool {
        let vrange = self.vrange();
        self.domain().all(|x| !vrange.contains(x))
    }

    /// Return true if some name depends on itself via the bindings,
    /// such as in `x := f(y); y := g(x)`.
    pub fn is_cyclic(&self) -> bool {
        let binds = |x: &Name| matches!(self.get(x), Some(tm) if !is_identity(x, tm));
        let deps: FnvHashMap<&Name, Vec<Name>> = self
            .iter()
            .filter(|(x, tm)| !is_identity(x, tm))
            .map(|(x, tm)| (x, tm.free_vars().into_iter().filter(|y| binds(y)).collect()))
            .collect();

        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Active,
            Done,
        }

        fn visit(x: &Name, deps: &FnvHashMap<&Name, Vec<Name>>, marks: &mut FnvHashMap<Name, Mark>) -> bool {
            match marks.get(x) {
                Some(Mark::Active) => return true,
                Some(Mark::Done) => return false,
                None => (),
            }
            marks.insert(x.clone(), Mark::Active);
            let next = deps.get(x).map(|ys| ys.as_slice()).unwrap_or_default();
            let cyclic = next.iter().any(|y| visit(y, deps, marks));
            marks.insert(x.clone(), Mark::Done);
            cyclic
        }

        let mut marks = FnvHashMap::default();
        deps.keys().any(|x| visit(x, &deps, &mut marks))
    }

    /// Self-compose the substitution until it is idempotent.
    ///
    /// Return `None` if the bindings are cyclic,
    /// in which case self-composition never terminates.
    ///
    /// ~~~
    /// # use qnorm::{Label, Subst, Symbol, Term};
    /// let f = |x| Term::<Label>::std(Symbol::new("F"), [Term::var(x)]);
    /// let s = Subst::new().with("x", f("y")).with("y", f("z"));
    /// assert!(!s.is_idempotent());
    ///
    /// let idem = s.get_idempotent().unwrap();
    /// assert!(idem.is_idempotent());
    /// assert_eq!(idem.get("x"), Some(&Term::std(Symbol::new("F"), [f("z")])));
    ///
    /// let cyclic = Subst::new().with("x", f("y")).with("y", f("x"));
    /// assert_eq!(cyclic.get_idempotent(), None);
    /// ~~~
    pub fn get_idempotent(&self) -> Option<Self> {
        if self.is_cyclic() {
            warn!("cyclic substitution {}", self);
            return None;
        }
        let mut subst = self.clone();
        while !subst.is_idempotent() {
            subst = subst.compose(&subst);
        }
        Some(subst)
    }
}

impl<L: Leaf> PartialEq for Subst<L> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<L: Leaf> Eq for Subst<L> {}

impl<L: Clone, N: Into<Name>> FromIterator<(N, Term<L>)> for Subst<L> {
    fn from_iter<I: IntoIterator<Item = (N, Term<L>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(x, tm)| (x.into(), tm)).collect())
    }
}

impl<L: Display> Display for Subst<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        self.iter().try_for_each(|(x, tm)| write!(f, " {} : {} ;", x, tm))?;
        write!(f, " }}")
    }
}

impl<L: Leaf> Term<L> {
    /// Replace the free variables of the term by their bindings.
    ///
    /// Bound variables that would capture a variable of the substitution
    /// are renamed to fresh names.
    /// If the substitution does not change the term,
    /// the result shares its memory with the original term.
    ///
    /// ~~~
    /// # use qnorm::{Label, Subst, Symbol, Term};
    /// let lam = Symbol::new("LAM");
    /// let f = |x, y| Term::<Label>::std(Symbol::new("F"), [Term::var(x), Term::var(y)]);
    ///
    /// // `y` is renamed to avoid capturing the substituted `y`
    /// let tm = Term::bind(lam.clone(), "y", f("x", "y"));
    /// let s = Subst::singleton("x", Term::var("y"));
    /// assert_eq!(tm.subst(&s), Term::bind(lam.clone(), "z", f("y", "z")));
    ///
    /// // bound variables are not substituted
    /// let s = Subst::singleton("y", Term::var("a"));
    /// assert!(tm.subst(&s).ptr_eq(&tm));
    /// ~~~
    pub fn subst(&self, subst: &Subst<L>) -> Self {
        if subst.is_empty() {
            return self.clone();
        }
        self.subst_opt(subst).unwrap_or_else(|| self.clone())
    }

    /// Substitute, returning `None` if the term did not change.
    fn subst_opt(&self, subst: &Subst<L>) -> Option<Self> {
        match self {
            Self::Var(x) => subst.get(x).cloned(),
            Self::Leaf(l) => {
                let fv = l.free_vars();
                if fv.is_empty() {
                    return None;
                }
                let subst = subst.restrict(|x| fv.iter().any(|y| &**y == x));
                if subst.is_empty() {
                    return None;
                }
                l.subst(&subst).map(Self::leaf)
            }
            Self::Comb(c) => match &**c {
                TermC::Std(tag, args) => Some(Self::std(tag.clone(), subst_args(args, subst)?)),
                TermC::Ac(tag, args) => Self::ac_flat(tag.clone(), subst_args(args, subst)?),
                TermC::Comm(tag, [a, b]) => {
                    let (a2, b2) = (a.subst_opt(subst), b.subst_opt(subst));
                    if a2.is_none() && b2.is_none() {
                        return None;
                    }
                    let a = a2.unwrap_or_else(|| a.clone());
                    let b = b2.unwrap_or_else(|| b.clone());
                    Some(Self::comm(tag.clone(), a, b))
                }
                TermC::Bind(tag, x, body) => {
                    let subst = self.relevant(subst)?;
                    let vrange = subst.vrange();
                    if vrange.contains(x) {
                        let y = self.fresh_for(x, &subst, &vrange, &FnvHashSet::default());
                        debug!("rename bound variable {} to {}", x, y);
                        let subst = subst.with(x.clone(), Self::Var(y.clone()));
                        Some(Self::bind(tag.clone(), y, body.subst(&subst)))
                    } else {
                        let body = body.subst_opt(&subst)?;
                        Some(Self::bind(tag.clone(), x.clone(), body))
                    }
                }
                TermC::MultiBind(tag, binders, body) => {
                    let subst = self.relevant(subst)?;
                    let vrange = subst.vrange();
                    let mut inner = subst.clone();
                    let mut taken = FnvHashSet::default();
                    let mut renamed = Vec::with_capacity(binders.len());
                    for b in binders {
                        let dom = b.dom.as_ref().map(|dom| dom.subst(&subst));
                        inner = inner.without(&b.var);
                        let var = if vrange.contains(&b.var) {
                            let y = self.fresh_for(&b.var, &subst, &vrange, &taken);
                            debug!("rename bound variable {} to {}", b.var, y);
                            inner = inner.with(b.var.clone(), Self::Var(y.clone()));
                            y
                        } else {
                            b.var.clone()
                        };
                        taken.insert(var.clone());
                        renamed.push(Binder { var, dom });
                    }
                    let body = body.subst(&inner);
                    Some(Self::multi_bind_unique(tag.clone(), renamed, body))
                }
            },
        }
    }

    /// Restrict a substitution to the free variables of the term,
    /// returning `None` if nothing remains.
    fn relevant(&self, subst: &Subst<L>) -> Option<Subst<L>> {
        let fv = self.free_vars();
        let subst = subst.restrict(|x| fv.contains(x));
        (!subst.is_empty()).then_some(subst)
    }

    /// Return a name for a renamed binder that occurs neither
    /// in the substitution nor in the term nor among names already taken.
    fn fresh_for(&self, x: &str, subst: &Subst<L>, vrange: &FnvHashSet<Name>, taken: &FnvHashSet<Name>) -> Name {
        let vars = self.vars();
        let avoid = |y: &str| vrange.contains(y) || subst.get(y).is_some() || vars.contains(y);
        fresh(x, |y| avoid(y) || taken.contains(y))
    }
}

/// Substitute into a list of terms, returning `None` if no term changed.
fn subst_args<L: Leaf>(args: &[Term<L>], subst: &Subst<L>) -> Option<Vec<Term<L>>> {
    let new: Vec<_> = args.iter().map(|a| a.subst_opt(subst)).collect();
    if new.iter().all(Option::is_none) {
        return None;
    }
    let iter = new.into_iter().zip(args);
    Some(iter.map(|(n, a)| n.unwrap_or_else(|| a.clone())).collect())
}

#[test]
fn capture() {
    use crate::{Label, Symbol};
    let lam = Symbol::new("LAM");
    let b = |x, body| Term::<Label>::bind(lam.clone(), x, body);
    let s = Subst::singleton("b", Term::var("a"));

    // `b` is bound locally
    let bb = b("b", Term::var("b"));
    assert_eq!(bb.subst(&s), bb);

    let cb = b("c", Term::var("b"));
    assert_eq!(cb.subst(&s), b("c", Term::var("a")));

    // substituting `a` for `b` under a binder of `a` renames the binder
    let ab = b("a", Term::var("b"));
    match ab.subst(&s).get() {
        Some(TermC::Bind(_, x, body)) => {
            assert_ne!(&**x, "a");
            assert_eq!(body, &Term::var("a"));
        }
        _ => panic!("expected binder"),
    }
}

#[test]
fn capture_multi_bind() {
    use crate::{Label, Symbol};
    let sum = Symbol::new("SUM");
    let p = |x, y, z| Term::<Label>::std(Symbol::new("P"), [x, y, z].map(Term::var));
    let range = |x| Term::<Label>::std(Symbol::new("RANGE"), [Term::var(x)]);

    // SUM(i : RANGE(i), j. P(i, j, k)), where the domain of `i` is outside its scope
    let binders = [Binder::new("i", range("i")), Binder::universal("j")];
    let tm = Term::multi_bind(sum.clone(), binders, p("i", "j", "k")).unwrap();
    let s = Subst::new().with("i", Term::var("n")).with("k", Term::var("j"));
    let binders = [Binder::new("i", range("n")), Binder::universal("j_1")];
    let expected = Term::multi_bind(sum, binders, p("i", "j_1", "j")).unwrap();
    assert_eq!(tm.subst(&s), expected);
}

#[test]
fn cyclic() {
    use crate::{Label, Symbol};
    let f = |x| Term::<Label>::std(Symbol::new("F"), [Term::var(x)]);
    assert!(Subst::singleton("x", f("x")).is_cyclic());
    assert!(!Subst::singleton("x", Term::<Label>::var("x")).is_cyclic());
    assert!(!Subst::new().with("x", f("y")).with("y", f("z")).is_cyclic());

    let id = Subst::new().with("x", Term::<Label>::var("x")).with("y", f("x"));
    assert_eq!(id.get_idempotent(), Some(Subst::singleton("y", f("x"))));
}

#[test]
fn display() {
    use crate::Label;
    let s = Subst::new().with("x", Term::<Label>::var("y")).with("a", Term::var("b"));
    assert_eq!(s.to_string(), "{ a : b ; x : y ; }");
    assert_eq!(Subst::<Label>::new().to_string(), "{ }");
}
