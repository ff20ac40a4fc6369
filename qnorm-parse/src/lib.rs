//! Parser for qnorm command files.
//!
//! A command file consists of commands, each terminated by a dot.
//! Commands declare symbols, add rewrite rules, and
//! ask for normal forms, equivalences, or substitutions.
//! Parsing yields unscoped terms, in which it is not yet known
//! whether a bare name is a variable or a symbol.
//! The contents of scalar literals are parsed separately by [`parse_scalar`].
//!
//! Example usage:
//!
//! ~~~
//! use qnorm_parse::{CmdIter, Command, Error, Term};
//!
//! let cmds = "
//!     symbol ADD : ac.
//!     (* eliminate zeros *)
//!     unit add_zero : ADD(ZERO).
//!     norm ADD(x, ZERO).
//! ";
//! let cmds: Result<Vec<_>, _> = CmdIter::new(cmds).collect();
//! let cmds = cmds?;
//! assert_eq!(cmds.len(), 3);
//! let x = Term::Symb("x");
//! let zero = Term::Symb("ZERO");
//! assert_eq!(cmds[2], Command::Norm(Term::Appl("ADD", vec![x, zero])));
//! # Ok::<_, Error>(())
//! ~~~

pub mod cmd;
pub mod lex;
mod parse;
pub mod scalar;
pub mod term;

pub use cmd::{Command, Fold, Kind};
pub use lex::{Lex, Token};
pub use parse::{Error, Parse};
pub use scalar::Scalar;
pub use term::{Binder, Subst, Term};

use core::iter::Peekable;

/// Tokens of a string, without whitespace and comments.
pub fn lex(s: &str) -> Lex {
    Lex::new(s)
}

/// Parse a single term.
pub fn parse_term(s: &str) -> Result<Term<&str>, Error> {
    Term::parse_str(s)
}

/// Parse the contents of a scalar literal, such as `2 * p + 1`.
pub fn parse_scalar(s: &str) -> Result<Scalar<&str>, Error> {
    Scalar::parse_str(s)
}

/// Parse a substitution block `{ x : t ; ... }`.
pub fn parse_subst(s: &str) -> Result<Subst<&str>, Error> {
    Subst::parse_str(s)
}

/// Iterator over the commands of a string.
///
/// The iterator stops after the first error.
pub struct CmdIter<'s> {
    tokens: Peekable<Lex<'s>>,
    failed: bool,
}

impl<'s> CmdIter<'s> {
    pub fn new(s: &'s str) -> Self {
        Self {
            tokens: lex(s).peekable(),
            failed: false,
        }
    }
}

impl<'s> Iterator for CmdIter<'s> {
    type Item = Result<Command<&'s str>, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.tokens.peek()?;
        let cmd = Command::parse(&mut self.tokens);
        self.failed = cmd.is_err();
        Some(cmd)
    }
}

#[test]
fn stop_after_error() {
    let cmds: Vec<_> = CmdIter::new("norm x. norm . norm y.").collect();
    assert_eq!(cmds.len(), 2);
    assert!(cmds[0].is_ok());
    assert_eq!(cmds[1], Err(Error::ExpectedTerm));
}
