//! Recursive-descent parsing of tokens.

use crate::Token;
use core::fmt::{self, Display};
use core::iter::Peekable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    ExpectedCmd,
    ExpectedIdent,
    ExpectedColon,
    ExpectedDot,
    ExpectedTerm,
    ExpectedLPar,
    ExpectedRPar,
    ExpectedLBrace,
    ExpectedLongArrow,
    ExpectedEqEq,
    ExpectedKind,
    ExpectedPlusOrStar,
    ExpectedCommaDotOrRPar,
    ExpectedIdentOrRBrace,
    ExpectedSemicolonOrRBrace,
    /// binder that is not a name, such as `x` in `SUM(F(x). x)`
    ExpectedBinder,
    /// invalid contents of a scalar literal
    ExpectedScalar,
    /// domain outside a binder term, such as `F(x : A)`
    DomainWithoutBinder,
    ExpectedEnd,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::ExpectedCmd => "expected command",
            Self::ExpectedIdent => "expected identifier",
            Self::ExpectedColon => "expected \":\"",
            Self::ExpectedDot => "expected \".\"",
            Self::ExpectedTerm => "expected term",
            Self::ExpectedLPar => "expected \"(\"",
            Self::ExpectedRPar => "expected \")\"",
            Self::ExpectedLBrace => "expected \"{\"",
            Self::ExpectedLongArrow => "expected \"-->\"",
            Self::ExpectedEqEq => "expected \"==\"",
            Self::ExpectedKind => "expected one of std, ac, comm, bind, multibind",
            Self::ExpectedPlusOrStar => "expected \"+\" or \"*\"",
            Self::ExpectedCommaDotOrRPar => "expected \",\", \".\", or \")\"",
            Self::ExpectedIdentOrRBrace => "expected identifier or \"}\"",
            Self::ExpectedSemicolonOrRBrace => "expected \";\" or \"}\"",
            Self::ExpectedBinder => "expected variable name as binder",
            Self::ExpectedScalar => "expected integer, parameter, \"-\", or \"(\"",
            Self::DomainWithoutBinder => "domain given outside of binder",
            Self::ExpectedEnd => "expected end of input",
        };
        s.fmt(f)
    }
}

impl std::error::Error for Error {}

pub trait Parse<'s>: Sized {
    fn parse<I>(iter: &mut Peekable<I>) -> Result<Self, Error>
    where
        I: Iterator<Item = Token<'s>>;

    /// Parse and fail if not all tokens were consumed.
    fn consume(iter: impl Iterator<Item = Token<'s>>) -> Result<Self, Error> {
        let mut iter = iter.peekable();
        let y = Self::parse(&mut iter)?;
        if iter.next().is_none() {
            Ok(y)
        } else {
            Err(Error::ExpectedEnd)
        }
    }

    fn parse_str(s: &'s str) -> Result<Self, Error> {
        Self::consume(crate::lex(s))
    }
}

/// Consume a token or fail with the given error.
pub(crate) fn expect<'s, I>(iter: &mut Peekable<I>, token: Token<'s>, err: Error) -> Result<(), Error>
where
    I: Iterator<Item = Token<'s>>,
{
    iter.next_if_eq(&token).map(|_| ()).ok_or(err)
}

pub(crate) fn ident<'s, I>(iter: &mut Peekable<I>) -> Result<&'s str, Error>
where
    I: Iterator<Item = Token<'s>>,
{
    match iter.next() {
        Some(Token::Ident(s)) => Ok(s),
        _ => Err(Error::ExpectedIdent),
    }
}
