#![forbid(unsafe_code)]

//! Term rewriting kernel for normalizing algebraic expressions.
//!
//! The kernel is domain-agnostic:
//! rewrite rules, symbols, and leaf values (such as scalars or labels)
//! are supplied by the user, whereas the kernel provides
//! the term representation, capture-avoiding substitution,
//! matching, and two rewriting strategies.
//!
//! # Usage
//!
//! Terms are built with smart constructors that establish
//! the structural invariants of every term shape, e.g.
//! associative-commutative (AC) terms are flattened and canonically ordered.
//! Rules are collected in a [`RuleSet`], which a [`Normalizer`]
//! repeatedly applies to a term until no rule applies anymore.
//!
//! The following example normalizes `ADD(ZERO, ADD(a, ZERO))` using
//! an AC procedure that eliminates the unit `ZERO`:
//!
//! ~~~
//! use qnorm::{procs, Label, Normalizer, RuleSet, Symbol, Term};
//!
//! let add = Symbol::new("ADD");
//! let zero: Term<Label> = Term::constant(Symbol::new("ZERO"));
//! let a = Term::var("a");
//!
//! let mut rules = RuleSet::new();
//! rules.push(procs::ac_unit("add_zero", add.clone(), zero.clone()));
//!
//! let inner = Term::ac(add.clone(), [a.clone(), zero.clone()])?;
//! let term = Term::ac(add, [zero, inner])?;
//!
//! let nf = Normalizer::new(&rules).normalize(&term);
//! assert_eq!(nf.term, a);
//! assert_eq!(nf.steps, 2);
//! # Ok::<_, qnorm::Error>(())
//! ~~~
//!
//! # Organisation
//!
//! * [`term`], [`alpha`], and [`subst`] contain the term model,
//!   its equality and hashing modulo alpha-equivalence, and substitutions.
//! * [`pattern`] and [`rule`] contain matching and single rewrite steps,
//!   [`procs`] contains hand-written procedures for AC symbols.
//! * [`normalize`] contains the outer-most and inner-most normalization loops,
//!   [`trace`] observers of rewrite steps, and
//!   [`export`] the export of rule sets to a textual rule notation.

#[macro_use]
extern crate log;

pub mod alpha;
pub mod context;
pub mod error;
pub mod export;
pub mod fresh;
pub mod intern;
pub mod leaf;
pub mod normalize;
pub mod pattern;
pub mod procs;
pub mod rule;
pub mod subst;
mod symbol;
pub mod term;
pub mod trace;

pub use context::Context;
pub use error::Error;
pub use intern::{Interner, LeafId};
pub use leaf::{Label, Leaf};
pub use normalize::{Engine, Normalized, Normalizer, Strategy};
pub use pattern::Pattern;
pub use rule::{Rule, RuleSet};
pub use subst::Subst;
pub use symbol::Symbol;
pub use term::{Binder, Kind, Name, RTerm, Term, TermC};
pub use trace::{Observer, Transcript};
