//! Export of rule sets to a line-oriented rule notation.
//!
//! Every rule is printed as a comment with its name, followed by
//! a line `lhs -> rhs ;` if the rule has a textual representation.
//! The output can be fed to external confluence or termination checkers.

use crate::{Leaf, Rule, RuleSet};
use std::fmt::{self, Display};

/// Printable export of a rule set.
pub struct Trs<'a, L>(&'a [Rule<L>]);

impl<L: Leaf> RuleSet<L> {
    /// Export the rule set.
    ///
    /// Rules are printed with their literal representation if they have one,
    /// otherwise with their canonical pattern and replacement.
    /// Rules with neither are only mentioned in a comment.
    ///
    /// ~~~
    /// # use qnorm::{procs, Label, Rule, RuleSet, Symbol, Term};
    /// let neg = |x| Term::<Label>::std(Symbol::new("NEG"), [x]);
    /// let mut rules = RuleSet::new();
    /// rules.push(Rule::leaf_reduce());
    /// rules.push(Rule::new("neg_neg", neg(neg(Term::var("x"))), Term::var("x")).unwrap());
    /// rules.push(procs::ac_idempotent("or_idem", Symbol::new("OR")));
    ///
    /// let expected = "\
    /// (* leaf-reduce: procedure *)
    /// (* neg_neg *)
    /// NEG(NEG(x)) -> x ;
    /// (* or_idem *)
    /// OR(x, x) -> x ;
    /// ";
    /// assert_eq!(rules.trs().to_string(), expected);
    /// ~~~
    pub fn trs(&self) -> Trs<L> {
        Trs(self.rules())
    }
}

impl<'a, L: Leaf> Display for Trs<'a, L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.iter().try_for_each(|rule| match (rule.repr(), rule.canonical()) {
            (Some(repr), _) => writeln!(f, "(* {} *)\n{} ;", rule.name(), repr),
            (None, Some((lhs, rhs))) => writeln!(f, "(* {} *)\n{} -> {} ;", rule.name(), lhs, rhs),
            (None, None) => writeln!(f, "(* {}: procedure *)", rule.name()),
        })
    }
}
