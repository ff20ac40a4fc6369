//! Unscoped terms and substitution blocks.

use crate::parse::{expect, ident, Error, Parse};
use crate::Token;
use core::fmt::{self, Display};
use core::iter::Peekable;

/// Bound variable with optional domain.
pub type Binder<S> = (S, Option<Term<S>>);

/// Term as written, before it is known
/// which names are variables and which are symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term<S> {
    /// bare name
    Symb(S),
    /// application `f(t1, ..., tn)`
    Appl(S, Vec<Self>),
    /// binder term `f(x : dom, y. body)`
    Bind(S, Vec<Binder<S>>, Box<Self>),
    /// scalar literal `$...$`
    Scalar(S),
    /// label literal `'...'`
    Label(S),
}

/// Substitution block `{ x : t ; y : u }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subst<S>(pub Vec<(S, Term<S>)>);

fn comma_sep<T: Display>(iter: impl Iterator<Item = T>, f: &mut fmt::Formatter) -> fmt::Result {
    let mut iter = iter.peekable();
    while let Some(x) = iter.next() {
        x.fmt(f)?;
        iter.peek().iter().try_for_each(|_| write!(f, ", "))?;
    }
    Ok(())
}

struct ShowBinder<'a, S>(&'a Binder<S>);

impl<'a, S: Display> Display for ShowBinder<'a, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.0 {
            (x, None) => x.fmt(f),
            (x, Some(dom)) => write!(f, "{} : {}", x, dom),
        }
    }
}

impl<S: Display> Display for Term<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Symb(s) => s.fmt(f),
            Self::Appl(s, args) => {
                write!(f, "{}(", s)?;
                comma_sep(args.iter(), f)?;
                write!(f, ")")
            }
            Self::Bind(s, binders, body) => {
                write!(f, "{}(", s)?;
                comma_sep(binders.iter().map(ShowBinder), f)?;
                write!(f, ". {})", body)
            }
            Self::Scalar(s) => write!(f, "${}$", s),
            Self::Label(s) => write!(f, "'{}'", s),
        }
    }
}

impl<S: Display> Display for Subst<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        self.0.iter().try_for_each(|(x, tm)| write!(f, " {} : {} ;", x, tm))?;
        write!(f, " }}")
    }
}

impl<'s> Parse<'s> for Term<&'s str> {
    fn parse<I>(iter: &mut Peekable<I>) -> Result<Self, Error>
    where
        I: Iterator<Item = Token<'s>>,
    {
        match iter.next() {
            Some(Token::Ident(s)) => match iter.next_if_eq(&Token::LPar) {
                Some(_) => Self::parse_args(s, iter),
                None => Ok(Self::Symb(s)),
            },
            Some(Token::Scalar(s)) => Ok(Self::Scalar(s)),
            Some(Token::Label(s)) => Ok(Self::Label(s)),
            Some(Token::LPar) => {
                let tm = Self::parse(iter)?;
                expect(iter, Token::RPar, Error::ExpectedRPar)?;
                Ok(tm)
            }
            _ => Err(Error::ExpectedTerm),
        }
    }
}

impl<'s> Term<&'s str> {
    /// Parse the arguments or binders following `head(`.
    ///
    /// Whether the term is an application or a binder term
    /// is only known once a `.` or a `)` is encountered.
    fn parse_args<I>(head: &'s str, iter: &mut Peekable<I>) -> Result<Self, Error>
    where
        I: Iterator<Item = Token<'s>>,
    {
        if iter.next_if_eq(&Token::RPar).is_some() {
            return Ok(Self::Appl(head, Vec::new()));
        }
        let mut items = Vec::new();
        loop {
            let tm = Self::parse(iter)?;
            let dom = match iter.next_if_eq(&Token::Colon) {
                Some(_) => Some(Self::parse(iter)?),
                None => None,
            };
            items.push((tm, dom));
            match iter.next() {
                Some(Token::Comma) => (),
                Some(Token::RPar) => {
                    let args = items.into_iter().map(|(tm, dom)| match dom {
                        None => Ok(tm),
                        Some(_) => Err(Error::DomainWithoutBinder),
                    });
                    return Ok(Self::Appl(head, args.collect::<Result<_, _>>()?));
                }
                Some(Token::Dot) => {
                    let binders = items.into_iter().map(|(tm, dom)| match tm {
                        Self::Symb(x) => Ok((x, dom)),
                        _ => Err(Error::ExpectedBinder),
                    });
                    let binders = binders.collect::<Result<_, _>>()?;
                    let body = Self::parse(iter)?;
                    expect(iter, Token::RPar, Error::ExpectedRPar)?;
                    return Ok(Self::Bind(head, binders, Box::new(body)));
                }
                _ => return Err(Error::ExpectedCommaDotOrRPar),
            }
        }
    }
}

impl<'s> Parse<'s> for Subst<&'s str> {
    fn parse<I>(iter: &mut Peekable<I>) -> Result<Self, Error>
    where
        I: Iterator<Item = Token<'s>>,
    {
        expect(iter, Token::LBrace, Error::ExpectedLBrace)?;
        let mut bindings = Vec::new();
        loop {
            match iter.next() {
                Some(Token::RBrace) => return Ok(Self(bindings)),
                Some(Token::Ident(x)) => {
                    expect(iter, Token::Colon, Error::ExpectedColon)?;
                    bindings.push((x, Term::parse(iter)?));
                    match iter.next() {
                        Some(Token::Semicolon) => (),
                        Some(Token::RBrace) => return Ok(Self(bindings)),
                        _ => return Err(Error::ExpectedSemicolonOrRBrace),
                    }
                }
                _ => return Err(Error::ExpectedIdentOrRBrace),
            }
        }
    }
}

impl<S> Term<S> {
    /// Name of the symbol at the head of the term, if any.
    pub fn head(&self) -> Option<&S> {
        match self {
            Self::Symb(s) | Self::Appl(s, _) | Self::Bind(s, ..) => Some(s),
            Self::Scalar(_) | Self::Label(_) => None,
        }
    }
}

#[test]
fn terms() -> Result<(), Error> {
    let tm = Term::parse_str("ADD(x, MUL($2*p$, 'e'), ZERO)")?;
    assert_eq!(tm.to_string(), "ADD(x, MUL($2*p$, 'e'), ZERO)");

    let tm = Term::parse_str("SUM(i : U, j. (F(i, j)))")?;
    match &tm {
        Term::Bind(s, binders, body) => {
            assert_eq!(*s, "SUM");
            assert_eq!(binders, &[("i", Some(Term::Symb("U"))), ("j", None)]);
            assert_eq!(**body, Term::Appl("F", vec![Term::Symb("i"), Term::Symb("j")]));
        }
        _ => panic!("binder expected"),
    }
    assert_eq!(tm.to_string(), "SUM(i : U, j. F(i, j))");
    assert_eq!(Term::parse_str("ZERO()")?, Term::Appl("ZERO", Vec::new()));
    Ok(())
}

#[test]
fn term_errors() {
    let err = |s| Term::parse_str(s).unwrap_err();
    assert_eq!(err("F(x : A)"), Error::DomainWithoutBinder);
    assert_eq!(err("SUM(F(x). x)"), Error::ExpectedBinder);
    assert_eq!(err("F(x y)"), Error::ExpectedCommaDotOrRPar);
    assert_eq!(err("F(x"), Error::ExpectedCommaDotOrRPar);
    assert_eq!(err("LAM(x. y"), Error::ExpectedRPar);
    assert_eq!(err("F(x) G"), Error::ExpectedEnd);
    assert_eq!(err("-->"), Error::ExpectedTerm);
}

#[test]
fn substs() -> Result<(), Error> {
    let s = Subst::parse_str("{ x : F(y) ; y : 'a' }")?;
    assert_eq!(s.0.len(), 2);
    assert_eq!(s.to_string(), "{ x : F(y) ; y : 'a' ; }");
    assert_eq!(Subst::parse_str("{ x : y ; }")?.0.len(), 1);
    assert_eq!(Subst::parse_str("{}")?, Subst(Vec::new()));
    assert_eq!(Subst::parse_str("{ x y }"), Err(Error::ExpectedColon));
    Ok(())
}
