//! Commands.

use crate::parse::{expect, ident, Error, Parse};
use crate::term::{Subst, Term};
use crate::Token;
use core::fmt::{self, Display};
use core::iter::Peekable;
use core::str::FromStr;

/// Shape of the terms that a declared symbol builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Std,
    Ac,
    Comm,
    Bind,
    MultiBind,
}

impl FromStr for Kind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "std" => Ok(Self::Std),
            "ac" => Ok(Self::Ac),
            "comm" => Ok(Self::Comm),
            "bind" => Ok(Self::Bind),
            "multibind" => Ok(Self::MultiBind),
            _ => Err(Error::ExpectedKind),
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Std => "std",
            Self::Ac => "ac",
            Self::Comm => "comm",
            Self::Bind => "bind",
            Self::MultiBind => "multibind",
        };
        s.fmt(f)
    }
}

/// Operation by which two scalar leaves are folded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fold {
    Add,
    Mul,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command<S, Tm = Term<S>> {
    /// declare a symbol of a given kind
    Symbol(S, Kind),
    /// add a rewrite rule `lhs --> rhs`
    Rule(S, Tm, Tm),
    /// add a rule eliminating a unit of an AC symbol
    Unit(S, S, Tm),
    /// add a rule for an absorbing element of an AC symbol
    Absorb(S, S, Tm),
    /// add a rule removing duplicate children of an AC symbol
    Idem(S, S),
    /// add a rule folding scalar children of an AC symbol
    Fold(S, S, Fold),
    /// normalize a term
    Norm(Tm),
    /// decide whether two terms have the same normal form
    Eq(Tm, Tm),
    /// apply a substitution block to a term
    Subst(Vec<(S, Tm)>, Tm),
}

impl<S: Display, Tm: Display> Display for Command<S, Tm> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Symbol(s, kind) => write!(f, "symbol {} : {}.", s, kind),
            Self::Rule(name, lhs, rhs) => write!(f, "rule {} : {} --> {}.", name, lhs, rhs),
            Self::Unit(name, tag, tm) => write!(f, "unit {} : {}({}).", name, tag, tm),
            Self::Absorb(name, tag, tm) => write!(f, "absorb {} : {}({}).", name, tag, tm),
            Self::Idem(name, tag) => write!(f, "idem {} : {}.", name, tag),
            Self::Fold(name, tag, Fold::Add) => write!(f, "fold {} : {} +.", name, tag),
            Self::Fold(name, tag, Fold::Mul) => write!(f, "fold {} : {} *.", name, tag),
            Self::Norm(tm) => write!(f, "norm {}.", tm),
            Self::Eq(l, r) => write!(f, "eq {} == {}.", l, r),
            Self::Subst(subst, tm) => {
                write!(f, "subst {{")?;
                subst.iter().try_for_each(|(x, t)| write!(f, " {} : {} ;", x, t))?;
                write!(f, " }} {}.", tm)
            }
        }
    }
}

impl<'s> Command<&'s str> {
    /// Parse `TAG(term)`.
    fn parse_tag_arg<I>(iter: &mut Peekable<I>) -> Result<(&'s str, Term<&'s str>), Error>
    where
        I: Iterator<Item = Token<'s>>,
    {
        let tag = ident(iter)?;
        expect(iter, Token::LPar, Error::ExpectedLPar)?;
        let tm = Term::parse(iter)?;
        expect(iter, Token::RPar, Error::ExpectedRPar)?;
        Ok((tag, tm))
    }

    /// Parse `NAME :`.
    fn parse_name<I>(iter: &mut Peekable<I>) -> Result<&'s str, Error>
    where
        I: Iterator<Item = Token<'s>>,
    {
        let name = ident(iter)?;
        expect(iter, Token::Colon, Error::ExpectedColon)?;
        Ok(name)
    }
}

impl<'s> Parse<'s> for Command<&'s str> {
    fn parse<I>(iter: &mut Peekable<I>) -> Result<Self, Error>
    where
        I: Iterator<Item = Token<'s>>,
    {
        let cmd = match iter.next() {
            Some(Token::Symbol) => {
                let name = Self::parse_name(iter)?;
                let kind = ident(iter).map_err(|_| Error::ExpectedKind)?;
                Self::Symbol(name, kind.parse()?)
            }
            Some(Token::Rule) => {
                let name = Self::parse_name(iter)?;
                let lhs = Term::parse(iter)?;
                expect(iter, Token::LongArrow, Error::ExpectedLongArrow)?;
                Self::Rule(name, lhs, Term::parse(iter)?)
            }
            Some(Token::Unit) => {
                let name = Self::parse_name(iter)?;
                let (tag, tm) = Self::parse_tag_arg(iter)?;
                Self::Unit(name, tag, tm)
            }
            Some(Token::Absorb) => {
                let name = Self::parse_name(iter)?;
                let (tag, tm) = Self::parse_tag_arg(iter)?;
                Self::Absorb(name, tag, tm)
            }
            Some(Token::Idem) => {
                let name = Self::parse_name(iter)?;
                Self::Idem(name, ident(iter)?)
            }
            Some(Token::Fold) => {
                let name = Self::parse_name(iter)?;
                let tag = ident(iter)?;
                let op = match iter.next() {
                    Some(Token::Plus) => Fold::Add,
                    Some(Token::Star) => Fold::Mul,
                    _ => return Err(Error::ExpectedPlusOrStar),
                };
                Self::Fold(name, tag, op)
            }
            Some(Token::Norm) => Self::Norm(Term::parse(iter)?),
            Some(Token::Eq) => {
                let l = Term::parse(iter)?;
                expect(iter, Token::EqEq, Error::ExpectedEqEq)?;
                Self::Eq(l, Term::parse(iter)?)
            }
            Some(Token::Subst) => {
                let subst = Subst::parse(iter)?;
                Self::Subst(subst.0, Term::parse(iter)?)
            }
            _ => return Err(Error::ExpectedCmd),
        };
        expect(iter, Token::Dot, Error::ExpectedDot)?;
        Ok(cmd)
    }
}

#[test]
fn positive() -> Result<(), Error> {
    let cmds = [
        "symbol ADD : ac.",
        "symbol SUM : multibind.",
        "rule neg_neg : NEG(NEG(x)) --> x.",
        "unit add_zero : ADD(ZERO).",
        "absorb mul_zero : MUL(ZERO).",
        "idem or_idem : OR.",
        "fold add_scalars : ADD +.",
        "fold mul_scalars : MUL *.",
        "norm ADD(x, ZERO).",
        "eq SUM(i. F(i)) == SUM(j. F(j)).",
        "subst { x : F(y) ; } G(x).",
    ];
    for s in cmds {
        assert_eq!(Command::parse_str(s)?.to_string(), s);
    }
    Ok(())
}

#[test]
fn negative() {
    use Error::*;
    let parse_err = |s: &str| Command::parse_str(s).unwrap_err();
    assert_eq!(parse_err("."), ExpectedCmd);
    assert_eq!(parse_err("x."), ExpectedCmd);
    assert_eq!(parse_err("symbol ADD ac."), ExpectedColon);
    assert_eq!(parse_err("symbol ADD : assoc."), ExpectedKind);
    assert_eq!(parse_err("symbol ADD : ."), ExpectedKind);
    assert_eq!(parse_err("rule r : F(x) -> x."), ExpectedLongArrow);
    assert_eq!(parse_err("unit u : ADD ZERO."), ExpectedLPar);
    assert_eq!(parse_err("fold f : ADD -."), ExpectedPlusOrStar);
    assert_eq!(parse_err("eq x = y."), ExpectedEqEq);
    assert_eq!(parse_err("norm x"), ExpectedDot);
    assert_eq!(parse_err("subst x : y. z."), ExpectedLBrace);
}
