//! Equality and hashing of terms modulo alpha-equivalence.
//!
//! Two terms are equal if they are equal up to
//! consistent renaming of bound variables,
//! reordering of AC children and commutative pairs, and
//! permutation of the binders of a multi-binder.
//! Hashing respects this equality:
//! bound variables are hashed by the distance to their binder, and
//! unordered children are combined in an order-independent way.

use crate::term::{Binder, Name, Term, TermC};
use crate::{Leaf, Subst};
use fnv::FnvHasher;
use itertools::Itertools;
use std::hash::{Hash, Hasher};

/// Pairs of corresponding bound variables of two terms, innermost last.
type Env = Vec<(Name, Name)>;

impl<L: Leaf> PartialEq for Term<L> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || alpha_eq(self, other, &mut Vec::new())
    }
}

impl<L: Leaf> Eq for Term<L> {}

fn alpha_eq<L: Leaf>(l: &Term<L>, r: &Term<L>, env: &mut Env) -> bool {
    match (l, r) {
        (Term::Var(x), Term::Var(y)) => {
            let i = env.iter().rposition(|(a, _)| a == x);
            let j = env.iter().rposition(|(_, b)| b == y);
            match (i, j) {
                (None, None) => x == y,
                (i, j) => i == j,
            }
        }
        (Term::Leaf(a), Term::Leaf(b)) if env.is_empty() => a == b,
        (Term::Leaf(a), Term::Leaf(b)) => {
            let a = canonical(&**a, |x| env.iter().rposition(|(y, _)| y == x));
            let b = canonical(&**b, |x| env.iter().rposition(|(_, y)| y == x));
            a == b
        }
        (Term::Comb(a), Term::Comb(b)) => comb_eq(a, b, env),
        _ => false,
    }
}

fn comb_eq<L: Leaf>(l: &TermC<L>, r: &TermC<L>, env: &mut Env) -> bool {
    use TermC::*;
    match (l, r) {
        (Std(f, ls), Std(g, rs)) => {
            f == g && ls.len() == rs.len() && ls.iter().zip(rs).all(|(a, b)| alpha_eq(a, b, env))
        }
        (Ac(f, ls), Ac(g, rs)) => f == g && multiset_eq(ls, rs, env),
        (Comm(f, [l1, l2]), Comm(g, [r1, r2])) => {
            f == g
                && ((alpha_eq(l1, r1, env) && alpha_eq(l2, r2, env))
                    || (alpha_eq(l1, r2, env) && alpha_eq(l2, r1, env)))
        }
        (Bind(f, x, tl), Bind(g, y, tr)) => {
            if f != g {
                return false;
            }
            env.push((x.clone(), y.clone()));
            let eq = alpha_eq(tl, tr, env);
            env.pop();
            eq
        }
        (MultiBind(f, bl, tl), MultiBind(g, br, tr)) => {
            f == g && bl.len() == br.len() && multi_bind_eq((bl, tl), (br, tr), env)
        }
        _ => false,
    }
}

/// Compare two lists of terms as multisets.
fn multiset_eq<L: Leaf>(ls: &[Term<L>], rs: &[Term<L>], env: &mut Env) -> bool {
    if ls.len() != rs.len() {
        return false;
    }
    let mut used = vec![false; rs.len()];
    ls.iter().all(|l| {
        let found = (0..rs.len()).find(|&j| !used[j] && alpha_eq(l, &rs[j], env));
        found.map(|j| used[j] = true).is_some()
    })
}

type MultiBind<'a, L> = (&'a [Binder<L>], &'a Term<L>);

/// Search a permutation of the right binders under which
/// domains and bodies of both multi-binders are equal.
fn multi_bind_eq<L: Leaf>((bl, tl): MultiBind<L>, (br, tr): MultiBind<L>, env: &mut Env) -> bool {
    let n = bl.len();
    (0..n).permutations(n).any(|perm| {
        let pairs = || bl.iter().zip(perm.iter().map(|j| &br[*j]));
        if !pairs().all(|(l, r)| dom_eq(&l.dom, &r.dom, env)) {
            return false;
        }
        let len = env.len();
        env.extend(pairs().map(|(l, r)| (l.var.clone(), r.var.clone())));
        let eq = alpha_eq(tl, tr, env);
        env.truncate(len);
        eq
    })
}

fn dom_eq<L: Leaf>(l: &Option<Term<L>>, r: &Option<Term<L>>, env: &mut Env) -> bool {
    match (l, r) {
        (None, None) => true,
        (Some(l), Some(r)) => alpha_eq(l, r, env),
        _ => false,
    }
}

/// Rename the bound variables referenced by a leaf to canonical names.
///
/// `bound` yields a canonical index for every bound variable.
/// Canonical names start with `#`, which distinguishes them from
/// the names of free variables.
fn canonical<L: Leaf>(leaf: &L, bound: impl Fn(&Name) -> Option<usize>) -> L {
    let subst: Subst<L> = leaf
        .free_vars()
        .into_iter()
        .filter_map(|x| {
            let i = bound(&x)?;
            Some((x, Term::var(format!("#{}", i))))
        })
        .collect();
    if subst.is_empty() {
        return leaf.clone();
    }
    leaf.subst(&subst).unwrap_or_else(|| leaf.clone())
}

/// Bound variables during hashing, together with the binder nesting level.
#[derive(Default)]
struct Bound {
    vars: Vec<(Name, usize)>,
    depth: usize,
}

impl Bound {
    /// Return the number of binders between a bound variable and its binder.
    fn distance(&self, x: &Name) -> Option<usize> {
        let mut iter = self.vars.iter().rev();
        iter.find(|(y, _)| y == x).map(|(_, level)| self.depth - level)
    }

    /// Bind variables at a new level, run a function, then unbind them.
    fn with_bound<Y>(&mut self, vars: impl Iterator<Item = Name>, f: impl FnOnce(&mut Self) -> Y) -> Y {
        let len = self.vars.len();
        self.depth += 1;
        let level = self.depth;
        self.vars.extend(vars.map(|x| (x, level)));
        let y = f(self);
        self.vars.truncate(len);
        self.depth -= 1;
        y
    }
}

impl<L: Leaf> Hash for Term<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_in(&mut Bound::default(), state)
    }
}

impl<L: Leaf> Term<L> {
    /// Return a stable hash of the term.
    ///
    /// The key is invariant under alpha-equivalence and
    /// is used to order the children of AC terms.
    ///
    /// ~~~
    /// # use qnorm::{Label, Symbol, Term};
    /// let lam = Symbol::new("LAM");
    /// let x = Term::<Label>::bind(lam.clone(), "x", Term::var("x"));
    /// let y = Term::<Label>::bind(lam.clone(), "y", Term::var("y"));
    /// assert_eq!(x, y);
    /// assert_eq!(x.key(), y.key());
    /// ~~~
    pub fn key(&self) -> u64 {
        self.key_in(&mut Bound::default())
    }

    fn key_in(&self, bound: &mut Bound) -> u64 {
        let mut hasher = FnvHasher::default();
        self.hash_in(bound, &mut hasher);
        hasher.finish()
    }

    fn hash_in<H: Hasher>(&self, bound: &mut Bound, state: &mut H) {
        match self {
            Self::Var(x) => match bound.distance(x) {
                Some(d) => {
                    0u8.hash(state);
                    d.hash(state)
                }
                None => {
                    1u8.hash(state);
                    x.hash(state)
                }
            },
            Self::Leaf(l) if bound.vars.is_empty() => {
                2u8.hash(state);
                l.hash(state)
            }
            Self::Leaf(l) => {
                2u8.hash(state);
                canonical(&**l, |x| bound.distance(x)).hash(state)
            }
            Self::Comb(c) => hash_comb(c, bound, state),
        }
    }
}

fn hash_comb<L: Leaf, H: Hasher>(tm: &TermC<L>, bound: &mut Bound, state: &mut H) {
    match tm {
        TermC::Std(s, args) => {
            3u8.hash(state);
            s.hash(state);
            args.len().hash(state);
            args.iter().for_each(|a| a.hash_in(bound, state))
        }
        TermC::Ac(s, args) => {
            4u8.hash(state);
            s.hash(state);
            let mut keys: Vec<_> = args.iter().map(|a| a.key_in(bound)).collect();
            keys.sort_unstable();
            keys.hash(state)
        }
        TermC::Comm(s, [a, b]) => {
            5u8.hash(state);
            s.hash(state);
            let (a, b) = (a.key_in(bound), b.key_in(bound));
            (a.min(b), a.max(b)).hash(state)
        }
        TermC::Bind(s, x, body) => {
            6u8.hash(state);
            s.hash(state);
            let x = std::iter::once(x.clone());
            bound.with_bound(x, |bound| body.hash_in(bound, state))
        }
        TermC::MultiBind(s, binders, body) => {
            7u8.hash(state);
            s.hash(state);
            binders.len().hash(state);
            let doms = binders.iter().map(|b| b.dom.as_ref().map(|d| d.key_in(bound)));
            let mut doms: Vec<_> = doms.collect();
            doms.sort_unstable();
            doms.hash(state);
            let vars = binders.iter().map(|b| b.var.clone());
            bound.with_bound(vars, |bound| body.hash_in(bound, state))
        }
    }
}

#[cfg(test)]
fn hash_of<L: Leaf>(tm: &Term<L>) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    tm.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn multi_bind_permutation() {
    use crate::{Label, Symbol};
    let sum = Symbol::new("SUM");
    let p = |x, y| Term::<Label>::std(Symbol::new("P"), [Term::var(x), Term::var(y)]);
    let binders = |x, y| [x, y].map(crate::Binder::universal);

    let xy = Term::multi_bind(sum.clone(), binders("x", "y"), p("x", "y")).unwrap();
    let yx = Term::multi_bind(sum.clone(), binders("y", "x"), p("y", "x")).unwrap();
    let swapped = Term::multi_bind(sum.clone(), binders("x", "y"), p("y", "x")).unwrap();
    let renamed = Term::multi_bind(sum, binders("b", "a"), p("a", "b")).unwrap();

    assert_eq!(xy, yx);
    assert_eq!(hash_of(&xy), hash_of(&yx));
    // binder order does not matter, so this is just a renaming of `xy`
    assert_eq!(xy, swapped);
    assert_eq!(xy, renamed);
    assert_eq!(hash_of(&xy), hash_of(&renamed));
}

#[test]
fn multi_bind_domains() {
    use crate::{Binder, Label, Symbol};
    let sum = Symbol::new("SUM");
    let (u, v) = (Term::constant(Symbol::new("U")), Term::constant(Symbol::new("V")));
    let p = |x, y| Term::<Label>::std(Symbol::new("P"), [Term::var(x), Term::var(y)]);

    let bs = |x, d1: &Term<Label>, y, d2: &Term<Label>| {
        [Binder::new(x, d1.clone()), Binder::new(y, d2.clone())]
    };
    let l = Term::multi_bind(sum.clone(), bs("x", &u, "y", &v), p("x", "y")).unwrap();
    let r = Term::multi_bind(sum.clone(), bs("y", &v, "x", &u), p("x", "y")).unwrap();
    // the domain of `x` differs
    let d = Term::multi_bind(sum, bs("x", &v, "y", &u), p("x", "y")).unwrap();
    assert_eq!(l, r);
    assert_eq!(hash_of(&l), hash_of(&r));
    assert_ne!(l, d);
}

#[test]
fn free_and_bound() {
    use crate::{Label, Symbol};
    let lam = Symbol::new("LAM");
    let f = |x, y| Term::<Label>::std(Symbol::new("F"), [Term::var(x), Term::var(y)]);

    let l = Term::bind(lam.clone(), "x", f("x", "z"));
    let r = Term::bind(lam.clone(), "y", f("y", "z"));
    let captured = Term::bind(lam.clone(), "z", f("z", "z"));
    let other = Term::bind(lam, "x", f("x", "w"));
    assert_eq!(l, r);
    assert_ne!(l, captured);
    assert_ne!(l, other);
    assert_ne!(Term::<Label>::var("x"), Term::var("y"));
}

#[test]
fn ac_under_binder() {
    use crate::{Label, Symbol};
    let (lam, add) = (Symbol::new("LAM"), Symbol::new("ADD"));
    let body = |x| Term::<Label>::ac(add.clone(), [Term::var(x), Term::var("a")]).unwrap();
    let l = Term::bind(lam.clone(), "x", body("x"));
    let r = Term::bind(lam, "zzz", body("zzz"));
    assert_eq!(l, r);
    assert_eq!(hash_of(&l), hash_of(&r));
}
