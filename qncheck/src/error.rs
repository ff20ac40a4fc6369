use crate::scope;
use core::fmt::{self, Display};
use std::io;

/// Central error type.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Parse(qnorm_parse::Error),
    Kernel(qnorm::Error),
    Scope(scope::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<qnorm_parse::Error> for Error {
    fn from(err: qnorm_parse::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<qnorm::Error> for Error {
    fn from(err: qnorm::Error) -> Self {
        Self::Kernel(err)
    }
}

impl From<scope::Error> for Error {
    fn from(err: scope::Error) -> Self {
        Self::Scope(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Parse(e) => write!(f, "parse error: {}", e),
            Self::Kernel(e) => e.fmt(f),
            Self::Scope(e) => write!(f, "scope error: {}", e),
        }
    }
}

impl std::error::Error for Error {}
