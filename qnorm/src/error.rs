//! Common error type.
//!
//! Only violations of construction invariants are errors.
//! A rule that does not apply, a truncated normalization, or
//! a substitution that cannot be made idempotent are regular outcomes,
//! represented by `Option` and [`Normalized`](crate::Normalized).

use crate::Symbol;
use crate::term::{Kind, Name};
use std::fmt::{self, Display};

/// Common error type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// AC term constructed from an empty list of children
    EmptyAc(Symbol),
    /// multi-binder term binding the same variable twice
    DuplicateBinder(Symbol, Name),
    /// pattern containing a symbol that the generic matcher cannot handle
    UnsupportedPattern(Symbol, Kind),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EmptyAc(s) => write!(f, "AC symbol {} applied to no arguments", s),
            Self::DuplicateBinder(s, x) => write!(f, "{} binds variable {} twice", s, x),
            Self::UnsupportedPattern(s, kind) => {
                write!(f, "{} symbol {} is not allowed in patterns", kind, s)
            }
        }
    }
}

impl std::error::Error for Error {}
