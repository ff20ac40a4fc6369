//! Leaves of checked terms.

use crate::Scalar;
use core::fmt::{self, Display};
use qnorm::{Label, Leaf, Name, Subst, Term};

/// Leaf of a term, either a scalar or a label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Atom {
    Scalar(Scalar),
    Label(Label),
}

impl Leaf for Atom {
    fn free_vars(&self) -> Vec<Name> {
        match self {
            Self::Scalar(s) => s.params(),
            Self::Label(_) => Vec::new(),
        }
    }

    /// Replace parameters bound to variables or scalars.
    ///
    /// Parameters bound to any other term remain unchanged.
    fn subst(&self, subst: &Subst<Self>) -> Option<Self> {
        let scalar = match self {
            Self::Scalar(s) => s,
            Self::Label(_) => return None,
        };
        let replaced = scalar.replace(&|p: &str| match subst.get(p)? {
            Term::Var(y) => Some(Scalar::Param(y.clone())),
            Term::Leaf(l) => match &**l {
                Self::Scalar(s) => Some(s.clone()),
                Self::Label(_) => None,
            },
            tm => {
                log::warn!("cannot substitute {} for parameter {} of {}", tm, p, scalar);
                None
            }
        });
        replaced.map(Self::Scalar)
    }

    fn reduce(&self) -> Option<Self> {
        match self {
            Self::Scalar(s) => s.reduce().map(Self::Scalar),
            Self::Label(_) => None,
        }
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "${}$", s),
            Self::Label(l) => l.fmt(f),
        }
    }
}

#[test]
fn subst() {
    use qnorm::Symbol;
    let p = |s: &str| Scalar::Param(s.into());
    let atom = Atom::Scalar(Scalar::mul(p("p"), p("q")));
    let subst = Subst::new()
        .with("p", Term::var("r"))
        .with("q", Term::leaf(Atom::Scalar(Scalar::Int(2))));
    let expected = Atom::Scalar(Scalar::mul(p("r"), Scalar::Int(2)));
    assert_eq!(atom.subst(&subst), Some(expected));

    // only scalars are absorbed
    let subst = Subst::singleton("p", Term::constant(Symbol::new("ZERO")));
    assert_eq!(atom.subst(&subst), None);
    let label = Atom::Label(Label::new("a"));
    assert_eq!(label.subst(&Subst::singleton("a", Term::var("b"))), None);
    assert!(label.free_vars().is_empty());
}

#[test]
fn alpha() {
    // parameters bound by a binder are compared modulo renaming
    use qnorm::Symbol;
    let lam = Symbol::new("LAM");
    let leaf = |x: &str| Term::leaf(Atom::Scalar(Scalar::add(Scalar::Param(x.into()), Scalar::Int(1))));
    assert_eq!(Term::bind(lam.clone(), "x", leaf("x")), Term::bind(lam.clone(), "y", leaf("y")));
    assert_ne!(Term::bind(lam.clone(), "x", leaf("x")), Term::bind(lam, "x", leaf("y")));
}
