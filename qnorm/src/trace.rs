//! Observation of rewrite steps.
//!
//! Observers are notified after every successful step of a normalization.
//! They cannot influence the result of the normalization.

use crate::{Leaf, Rule, Term};
use std::fmt::{self, Display};

/// Receiver of rewrite steps.
pub trait Observer<L> {
    /// Called when `rule` rewrote `before` to `after`.
    ///
    /// `before` and `after` are the whole terms, not only the rewritten subterms.
    fn rewritten(&mut self, rule: &Rule<L>, before: &Term<L>, after: &Term<L>);
}

/// Single step of a transcript.
#[derive(Clone, Debug)]
pub struct Step<L> {
    pub rule: String,
    pub before: Term<L>,
    pub after: Term<L>,
}

/// Observer that records all steps.
///
/// ~~~
/// # use qnorm::{procs, Context, Label, Normalizer, RuleSet, Symbol, Term, Transcript};
/// let add = Symbol::new("ADD");
/// let zero = Term::<Label>::constant(Symbol::new("ZERO"));
/// let rules = RuleSet::from_iter([procs::ac_unit("add_zero", add.clone(), zero.clone())]);
///
/// let tm = Term::ac(add, [Term::var("a"), zero]).unwrap();
/// let mut transcript = Transcript::default();
/// let nf = Normalizer::new(&rules).normalize_with(&tm, Context::new(), Some(&mut transcript));
/// assert_eq!(transcript.steps().len(), nf.steps);
/// assert_eq!(transcript.steps()[0].rule, "add_zero");
/// let text = transcript.to_string();
/// assert_eq!(text, format!("{}\n  ⟶ a (add_zero)\n", tm));
/// ~~~
#[derive(Clone, Debug)]
pub struct Transcript<L> {
    steps: Vec<Step<L>>,
}

impl<L> Default for Transcript<L> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<L> Transcript<L> {
    pub fn steps(&self) -> &[Step<L>] {
        &self.steps
    }
}

impl<L: Clone> Observer<L> for Transcript<L> {
    fn rewritten(&mut self, rule: &Rule<L>, before: &Term<L>, after: &Term<L>) {
        self.steps.push(Step {
            rule: rule.name().into(),
            before: before.clone(),
            after: after.clone(),
        })
    }
}

impl<L: Display> Display for Transcript<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(first) = self.steps.first() {
            writeln!(f, "{}", first.before)?;
        }
        self.steps
            .iter()
            .try_for_each(|s| writeln!(f, "  ⟶ {} ({})", s.after, s.rule))
    }
}

/// Observer that logs every step.
#[derive(Clone, Debug, Default)]
pub struct Logger;

impl<L: Leaf> Observer<L> for Logger {
    fn rewritten(&mut self, rule: &Rule<L>, before: &Term<L>, after: &Term<L>) {
        info!("{}: {} ⟶ {}", rule.name(), before, after)
    }
}
