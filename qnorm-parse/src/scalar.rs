//! Scalar expressions, i.e. the contents of scalar literals `$...$`.
//!
//! Scalars are integer expressions over symbolic parameters:
//!
//! ~~~ text
//! scalar := product ('+' product)*
//! product := unary ('*' unary)*
//! unary := '-' unary | INT | IDENT | '(' scalar ')'
//! ~~~

use crate::parse::{expect, Error, Parse};
use crate::Token;
use core::fmt::{self, Display};
use core::iter::Peekable;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scalar<S> {
    /// integer literal, as written
    Int(S),
    /// symbolic parameter
    Param(S),
    Neg(Box<Self>),
    Add(Box<Self>, Box<Self>),
    Mul(Box<Self>, Box<Self>),
}

impl<S> Scalar<S> {
    /// Binding strength of the outermost operator.
    fn prec(&self) -> usize {
        match self {
            Self::Add(..) => 0,
            Self::Mul(..) => 1,
            Self::Neg(_) => 2,
            Self::Int(_) | Self::Param(_) => 3,
        }
    }
}

/// Display a subexpression, parenthesised if it binds weaker than `prec`.
struct Sub<'a, S>(&'a Scalar<S>, usize);

impl<'a, S: Display> Display for Sub<'a, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.prec() < self.1 {
            write!(f, "({})", self.0)
        } else {
            self.0.fmt(f)
        }
    }
}

impl<S: Display> Display for Scalar<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(i) => i.fmt(f),
            Self::Param(p) => p.fmt(f),
            Self::Neg(x) => write!(f, "-{}", Sub(x, 2)),
            Self::Add(x, y) => write!(f, "{} + {}", Sub(x, 0), Sub(y, 1)),
            Self::Mul(x, y) => write!(f, "{} * {}", Sub(x, 1), Sub(y, 2)),
        }
    }
}

impl<'s> Scalar<&'s str> {
    fn parse_product<I>(iter: &mut Peekable<I>) -> Result<Self, Error>
    where
        I: Iterator<Item = Token<'s>>,
    {
        let mut x = Self::parse_unary(iter)?;
        while iter.next_if_eq(&Token::Star).is_some() {
            x = Self::Mul(Box::new(x), Box::new(Self::parse_unary(iter)?))
        }
        Ok(x)
    }

    fn parse_unary<I>(iter: &mut Peekable<I>) -> Result<Self, Error>
    where
        I: Iterator<Item = Token<'s>>,
    {
        match iter.next() {
            Some(Token::Minus) => Ok(Self::Neg(Box::new(Self::parse_unary(iter)?))),
            Some(Token::Int(i)) => Ok(Self::Int(i)),
            Some(Token::Ident(p)) => Ok(Self::Param(p)),
            Some(Token::LPar) => {
                let x = Self::parse(iter)?;
                expect(iter, Token::RPar, Error::ExpectedRPar)?;
                Ok(x)
            }
            _ => Err(Error::ExpectedScalar),
        }
    }
}

impl<'s> Parse<'s> for Scalar<&'s str> {
    fn parse<I>(iter: &mut Peekable<I>) -> Result<Self, Error>
    where
        I: Iterator<Item = Token<'s>>,
    {
        let mut x = Self::parse_product(iter)?;
        while iter.next_if_eq(&Token::Plus).is_some() {
            x = Self::Add(Box::new(x), Box::new(Self::parse_product(iter)?))
        }
        Ok(x)
    }
}

#[test]
fn scalars() -> Result<(), Error> {
    let x = Scalar::parse_str("2 * (p + -1) + q * q")?;
    assert_eq!(x.to_string(), "2 * (p + -1) + q * q");
    match x {
        Scalar::Add(l, _) => assert!(matches!(*l, Scalar::Mul(..))),
        _ => panic!("sum expected"),
    }
    assert_eq!(Scalar::parse_str("-p * q")?.to_string(), "-p * q");
    assert_eq!(Scalar::parse_str("-(p * q)")?.to_string(), "-(p * q)");
    assert_eq!(Scalar::parse_str("(1 + 2) + 3")?.to_string(), "1 + 2 + 3");
    assert_eq!(Scalar::parse_str("1 + (2 + 3)")?.to_string(), "1 + (2 + 3)");
    assert_eq!(Scalar::parse_str("p +"), Err(Error::ExpectedScalar));
    assert_eq!(Scalar::parse_str("(p"), Err(Error::ExpectedRPar));
    assert_eq!(Scalar::parse_str("p q"), Err(Error::ExpectedEnd));
    Ok(())
}
