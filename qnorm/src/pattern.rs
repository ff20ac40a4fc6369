//! Rewrite patterns.

use crate::term::{Name, Term, TermC};
use crate::{Error, Leaf, Subst};
use std::fmt::{self, Display};

/// Left-hand side of a rewrite rule.
///
/// A pattern consists only of variables, leaves, and standard symbols.
/// Variables may appear multiple times; e.g. `EQ(x, x)` is a valid pattern.
/// Patterns over AC, commutative, and binder symbols are rejected, because
/// matching them generically would require searching all permutations.
/// Rules over such symbols supply their own procedure instead.
#[derive(Clone, Debug)]
pub struct Pattern<L>(Term<L>);

impl<L: Leaf> Pattern<L> {
    /// Construct a pattern, failing on unsupported symbols.
    ///
    /// ~~~
    /// # use qnorm::{Error, Kind, Label, Pattern, Symbol, Term};
    /// let add = Symbol::new("ADD");
    /// let sum = Term::<Label>::ac(add.clone(), [Term::var("x"), Term::var("y")])?;
    /// let neg = Term::std(Symbol::new("NEG"), [sum]);
    /// let err = Pattern::new(neg).unwrap_err();
    /// assert_eq!(err, Error::UnsupportedPattern(add, Kind::Ac));
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn new(tm: Term<L>) -> Result<Self, Error> {
        check(&tm)?;
        Ok(Self(tm))
    }

    pub fn term(&self) -> &Term<L> {
        &self.0
    }

    /// Match the pattern against a term.
    ///
    /// On success, return the substitution that
    /// maps every variable of the pattern to the subterm at its position.
    ///
    /// ~~~
    /// # use qnorm::{Label, Pattern, Symbol, Term};
    /// let eq = |x: Term<Label>, y| Term::std(Symbol::new("EQ"), [x, y]);
    /// let zero = Term::constant(Symbol::new("ZERO"));
    /// let pat = Pattern::new(eq(Term::var("x"), Term::var("x"))).unwrap();
    ///
    /// let subst = pat.matches(&eq(zero.clone(), zero.clone())).unwrap();
    /// assert_eq!(subst.get("x"), Some(&zero));
    /// assert!(pat.matches(&eq(zero, Term::var("y"))).is_none());
    /// ~~~
    pub fn matches(&self, tm: &Term<L>) -> Option<Subst<L>> {
        let mut acc = Vec::new();
        match_term(&self.0, tm, &mut acc)?;
        Some(acc.into_iter().collect())
    }

    /// Apply a variable renaming to the pattern.
    ///
    /// Leaves are matched literally, so they remain untouched.
    pub(crate) fn rename(&self, renaming: &Subst<L>) -> Self {
        Self(rename(&self.0, renaming))
    }
}

pub(crate) fn rename<L: Leaf>(tm: &Term<L>, renaming: &Subst<L>) -> Term<L> {
    match tm {
        Term::Var(x) => renaming.get(x).cloned().unwrap_or_else(|| tm.clone()),
        Term::Leaf(_) => tm.clone(),
        Term::Comb(c) => match &**c {
            TermC::Std(f, args) => Term::std(f.clone(), args.iter().map(|a| rename(a, renaming))),
            _ => tm.clone(),
        },
    }
}

fn check<L: Leaf>(tm: &Term<L>) -> Result<(), Error> {
    match tm.get() {
        None => Ok(()),
        Some(TermC::Std(_, args)) => args.iter().try_for_each(check),
        Some(c) => Err(Error::UnsupportedPattern(c.symbol().clone(), c.kind())),
    }
}

fn match_term<L: Leaf>(pat: &Term<L>, tm: &Term<L>, acc: &mut Vec<(Name, Term<L>)>) -> Option<()> {
    match pat {
        Term::Var(x) => match acc.iter().find(|(y, _)| y == x) {
            Some((_, bound)) => (bound == tm).then_some(()),
            None => {
                acc.push((x.clone(), tm.clone()));
                Some(())
            }
        },
        Term::Leaf(l) => match tm {
            Term::Leaf(r) if l == r => Some(()),
            _ => None,
        },
        Term::Comb(p) => match (&**p, tm.get()?) {
            (TermC::Std(f, ps), TermC::Std(g, ts)) if f == g && ps.len() == ts.len() => {
                ps.iter().zip(ts).try_for_each(|(p, t)| match_term(p, t, acc))
            }
            _ => None,
        },
    }
}

impl<L: Display> Display for Pattern<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn unsupported() {
    use crate::{Kind, Label, Symbol};
    let lam = Symbol::new("LAM");
    let pair = Symbol::new("PAIR");
    let x = Term::<Label>::var("x");

    let bind = Term::bind(lam.clone(), "y", x.clone());
    assert_eq!(Pattern::new(bind).unwrap_err(), Error::UnsupportedPattern(lam, Kind::Bind));
    let comm = Term::comm(pair.clone(), x.clone(), x.clone());
    assert_eq!(Pattern::new(comm).unwrap_err(), Error::UnsupportedPattern(pair, Kind::Comm));
    assert!(Pattern::new(x).is_ok());
}

#[test]
fn arity() {
    use crate::{Label, Symbol};
    let f = Symbol::new("F");
    let pat = Pattern::new(Term::<Label>::std(f.clone(), [Term::var("x")])).unwrap();
    let two = Term::std(f.clone(), [Term::var("a"), Term::var("b")]);
    assert!(pat.matches(&two).is_none());
    let leaf = Term::leaf(Label::new("a"));
    let subst = pat.matches(&Term::std(f, [leaf.clone()])).unwrap();
    assert_eq!(subst.get("x"), Some(&leaf));
}
