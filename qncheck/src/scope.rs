//! Scoping of parsed terms.
//!
//! Scoping decides which bare names are symbols and which are variables,
//! and builds kernel terms according to the kinds of the declared symbols.

use crate::{Atom, Scalar};
use core::fmt::{self, Display};
use fnv::FnvHashMap;
use qnorm::{Binder, Interner, Label, Symbol, Term};
use qnorm_parse::{term, Kind};

type Tm = Term<Atom>;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// application of a symbol that was never declared
    Undeclared(String),
    Redeclared(String),
    /// commutative symbol applied to a number of arguments different from two
    Arity(String, usize),
    /// symbol used with syntax that does not fit its kind,
    /// such as binders for a standard symbol
    Misuse(String, Kind),
    /// binder symbol given several binders or a domain
    SingleBinder(String),
    Scalar(qnorm_parse::Error),
    Integer(String),
    Kernel(qnorm::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Undeclared(s) => write!(f, "undeclared symbol {}", s),
            Self::Redeclared(s) => write!(f, "symbol {} declared twice", s),
            Self::Arity(s, n) => write!(f, "commutative symbol {} applied to {} arguments", s, n),
            Self::Misuse(s, kind) => write!(f, "symbol {} of kind {} used incorrectly", s, kind),
            Self::SingleBinder(s) => write!(f, "symbol {} binds exactly one variable without domain", s),
            Self::Scalar(e) => write!(f, "in scalar: {}", e),
            Self::Integer(i) => write!(f, "integer out of range: {}", i),
            Self::Kernel(e) => e.fmt(f),
        }
    }
}

impl From<qnorm::Error> for Error {
    fn from(err: qnorm::Error) -> Self {
        Self::Kernel(err)
    }
}

/// Declared symbols and interned leaves.
#[derive(Debug, Default)]
pub struct Scope {
    symbols: FnvHashMap<String, (Symbol, Kind)>,
    leaves: Interner<Atom>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new symbol.
    pub fn declare(&mut self, name: &str, kind: Kind) -> Result<Symbol, Error> {
        if self.symbols.contains_key(name) {
            return Err(Error::Redeclared(name.into()));
        }
        let sym = Symbol::new(name);
        self.symbols.insert(name.into(), (sym.clone(), kind));
        Ok(sym)
    }

    pub fn symbol(&self, name: &str) -> Result<(&Symbol, Kind), Error> {
        let (sym, kind) = self.symbols.get(name).ok_or_else(|| Error::Undeclared(name.into()))?;
        Ok((sym, *kind))
    }

    /// Return a declared AC symbol.
    pub fn ac(&self, name: &str) -> Result<Symbol, Error> {
        match self.symbol(name)? {
            (sym, Kind::Ac) => Ok(sym.clone()),
            (_, kind) => Err(Error::Misuse(name.into(), kind)),
        }
    }

    pub fn leaves(&self) -> &Interner<Atom> {
        &self.leaves
    }

    /// Scope a parsed term.
    ///
    /// ~~~
    /// # use qncheck::{Error, Scope};
    /// # use qnorm_parse::{parse_term, Kind};
    /// let mut scope = Scope::new();
    /// scope.declare("ADD", Kind::Ac)?;
    /// scope.declare("ZERO", Kind::Std)?;
    /// let l = scope.term(&parse_term("ADD(x, ZERO, ADD($1 + 1$, x))")?)?;
    /// let r = scope.term(&parse_term("ADD(ADD(x, x), $1 + 1$, ZERO)")?)?;
    /// assert_eq!(l, r);
    /// assert_eq!(l.free_vars().len(), 1);
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn term(&mut self, tm: &term::Term<&str>) -> Result<Tm, Error> {
        self.term_in(tm, &mut Vec::new())
    }

    /// Scope a term, where `bound` contains the names of enclosing binders.
    fn term_in<'s>(&mut self, tm: &term::Term<&'s str>, bound: &mut Vec<&'s str>) -> Result<Tm, Error> {
        use term::Term as P;
        match tm {
            P::Symb(x) if bound.contains(x) || !self.symbols.contains_key(*x) => Ok(Term::var(*x)),
            P::Symb(s) => self.appl(s, &[], bound),
            P::Appl(s, args) => self.appl(s, args, bound),
            P::Bind(s, binders, body) => self.bind(s, binders, body, bound),
            P::Scalar(s) => {
                let expr = qnorm_parse::parse_scalar(s).map_err(Error::Scalar)?;
                let scalar = Scalar::try_from(&expr).map_err(|_| Error::Integer((*s).into()))?;
                Ok(self.leaf(Atom::Scalar(scalar)))
            }
            P::Label(l) => Ok(self.leaf(Atom::Label(Label::new(*l)))),
        }
    }

    fn leaf(&mut self, atom: Atom) -> Tm {
        Term::Leaf(self.leaves.intern(atom))
    }

    fn appl<'s>(
        &mut self,
        s: &str,
        args: &[term::Term<&'s str>],
        bound: &mut Vec<&'s str>,
    ) -> Result<Tm, Error> {
        let (sym, kind) = self.symbol(s)?;
        let sym = sym.clone();
        let args = args.iter().map(|a| self.term_in(a, bound));
        let mut args = args.collect::<Result<Vec<_>, _>>()?;
        let arity = args.len();
        match kind {
            Kind::Std => Ok(Term::std(sym, args)),
            Kind::Ac => Ok(Term::ac(sym, args)?),
            Kind::Comm => match (args.pop(), args.pop(), args.is_empty()) {
                (Some(b), Some(a), true) => Ok(Term::comm(sym, a, b)),
                _ => Err(Error::Arity(s.into(), arity)),
            },
            Kind::Bind | Kind::MultiBind => Err(Error::Misuse(s.into(), kind)),
        }
    }

    fn bind<'s>(
        &mut self,
        s: &str,
        binders: &[term::Binder<&'s str>],
        body: &term::Term<&'s str>,
        bound: &mut Vec<&'s str>,
    ) -> Result<Tm, Error> {
        let (sym, kind) = self.symbol(s)?;
        let sym = sym.clone();
        match kind {
            Kind::Bind => match binders {
                [(x, None)] => {
                    bound.push(*x);
                    let body = self.term_in(body, bound);
                    bound.pop();
                    Ok(Term::bind(sym, *x, body?))
                }
                _ => Err(Error::SingleBinder(s.into())),
            },
            Kind::MultiBind => {
                // domains lie outside the scope of the binders
                let mut scoped = Vec::with_capacity(binders.len());
                for (x, dom) in binders {
                    scoped.push(match dom {
                        None => Binder::universal(*x),
                        Some(dom) => Binder::new(*x, self.term_in(dom, bound)?),
                    })
                }
                let len = bound.len();
                bound.extend(binders.iter().map(|(x, _)| *x));
                let body = self.term_in(body, bound);
                bound.truncate(len);
                Ok(Term::multi_bind(sym, scoped, body?)?)
            }
            _ => Err(Error::Misuse(s.into(), kind)),
        }
    }
}

#[cfg(test)]
fn scoped(scope: &mut Scope, s: &str) -> Result<Tm, Error> {
    scope.term(&qnorm_parse::parse_term(s).unwrap())
}

#[cfg(test)]
fn scope() -> Scope {
    let mut scope = Scope::new();
    let syms = [
        ("ADD", Kind::Ac),
        ("ZERO", Kind::Std),
        ("F", Kind::Std),
        ("INNER", Kind::Comm),
        ("LAM", Kind::Bind),
        ("SUM", Kind::MultiBind),
    ];
    for (s, kind) in syms {
        scope.declare(s, kind).unwrap();
    }
    scope
}

#[test]
fn symbols_and_vars() {
    let mut scope = scope();
    let tm = scoped(&mut scope, "F(ZERO, x, INNER(y, ZERO))").unwrap();
    assert_eq!(tm.free_vars().len(), 2);
    let flipped = scoped(&mut scope, "F(ZERO, x, INNER(ZERO, y))").unwrap();
    assert_eq!(tm, flipped);

    // binders shadow symbols
    let lam = scoped(&mut scope, "LAM(ZERO. F(ZERO))").unwrap();
    assert!(lam.is_ground());
    assert_eq!(lam, scoped(&mut scope, "LAM(x. F(x))").unwrap());
    assert_ne!(lam, scoped(&mut scope, "LAM(x. F(ZERO))").unwrap());
}

#[test]
fn multi_binders() {
    let mut scope = scope();
    let l = scoped(&mut scope, "SUM(i : U, j. F(i, j))").unwrap();
    let r = scoped(&mut scope, "SUM(j, i : U. F(i, j))").unwrap();
    assert_eq!(l, r);
    // the domain is not in the scope of the binders
    let tm = scoped(&mut scope, "SUM(i : i. F(i))").unwrap();
    assert_eq!(tm.free_vars().len(), 1);
    let dup = scoped(&mut scope, "SUM(i, i. F(i))");
    assert!(matches!(dup, Err(Error::Kernel(qnorm::Error::DuplicateBinder(..)))));
}

#[test]
fn errors() {
    let mut scope = scope();
    let mut err = |s| scoped(&mut scope, s).unwrap_err();
    assert_eq!(err("G(x)"), Error::Undeclared("G".into()));
    assert_eq!(err("INNER(x)"), Error::Arity("INNER".into(), 1));
    assert_eq!(err("INNER(x, y, z)"), Error::Arity("INNER".into(), 3));
    assert_eq!(err("F(x. x)"), Error::Misuse("F".into(), Kind::Std));
    assert_eq!(err("LAM(x)"), Error::Misuse("LAM".into(), Kind::Bind));
    assert_eq!(err("LAM(x, y. x)"), Error::SingleBinder("LAM".into()));
    assert_eq!(err("LAM(x : U. x)"), Error::SingleBinder("LAM".into()));
    assert_eq!(err("ADD"), Error::Kernel(qnorm::Error::EmptyAc(qnorm::Symbol::new("ADD"))));
    assert_eq!(err("$p +$"), Error::Scalar(qnorm_parse::Error::ExpectedScalar));
    assert_eq!(err("$99999999999999999999$"), Error::Integer("99999999999999999999".into()));
    assert_eq!(scope.declare("F", Kind::Ac), Err(Error::Redeclared("F".into())));
}

#[test]
fn interning() {
    let mut scope = scope();
    let tm = scoped(&mut scope, "F($p$, 'a', $p$, 'a', $q$)").unwrap();
    assert_eq!(scope.leaves().len(), 3);
    let tm2 = scoped(&mut scope, "F($p$)").unwrap();
    assert_eq!(scope.leaves().len(), 3);
    match (tm.get(), tm2.get()) {
        (Some(qnorm::TermC::Std(_, a)), Some(qnorm::TermC::Std(_, b))) => match (&a[0], &b[0]) {
            (Term::Leaf(x), Term::Leaf(y)) => assert!(std::rc::Rc::ptr_eq(x, y)),
            _ => panic!("leaves expected"),
        },
        _ => panic!("applications expected"),
    }
}
