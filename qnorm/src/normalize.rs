//! Normalization of terms by repeated rewriting.

use crate::term::{Term, TermC};
use crate::trace::Observer;
use crate::{Context, Leaf, Rule, RuleSet};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Order in which subterms are rewritten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// rewrite the root before its children
    #[default]
    OuterMost,
    /// rewrite the children before their root
    InnerMost,
}

impl FromStr for Strategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outermost" => Ok(Self::OuterMost),
            "innermost" => Ok(Self::InnerMost),
            _ => Err("unknown strategy: ".to_owned() + s),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::OuterMost => "outermost".fmt(f),
            Self::InnerMost => "innermost".fmt(f),
        }
    }
}

/// Result of a normalization.
#[derive(Clone, Debug)]
pub struct Normalized<L> {
    pub term: Term<L>,
    /// number of performed rewrite steps
    pub steps: usize,
    /// false if the step limit was reached before a normal form
    pub complete: bool,
}

/// Configuration of a normalization.
///
/// ~~~
/// # use qnorm::{Label, Normalizer, Rule, RuleSet, Strategy, Symbol, Term};
/// let s = |x| Term::<Label>::std(Symbol::new("S"), [x]);
/// let rules = RuleSet::from_iter([Rule::new("loop", Term::var("x"), s(Term::var("x"))).unwrap()]);
/// let zero = Term::constant(Symbol::new("ZERO"));
///
/// let nf = Normalizer::new(&rules).strategy(Strategy::InnerMost).limit(2).normalize(&zero);
/// assert_eq!(nf.term, s(s(zero)));
/// assert!(!nf.complete);
/// ~~~
#[derive(Clone, Debug)]
pub struct Normalizer<'a, L> {
    rules: &'a RuleSet<L>,
    strategy: Strategy,
    limit: Option<usize>,
}

impl<'a, L: Leaf> Normalizer<'a, L> {
    pub fn new(rules: &'a RuleSet<L>) -> Self {
        Self {
            rules,
            strategy: Strategy::default(),
            limit: None,
        }
    }

    pub fn strategy(self, strategy: Strategy) -> Self {
        Self { strategy, ..self }
    }

    /// Set the maximal number of rewrite steps.
    pub fn limit(self, limit: impl Into<Option<usize>>) -> Self {
        let limit = limit.into();
        Self { limit, ..self }
    }

    /// Prepare rules and context for the normalization of a term.
    ///
    /// The variables of all rules are renamed once
    /// to avoid the variables occurring in the term,
    /// and the context is extended by the enrichers of the rule set.
    pub fn engine(&self, tm: &Term<L>, mut ctx: Context) -> Engine<L> {
        let avoid = tm.vars();
        let rules = self.rules.iter().map(|r| r.rename_vars(&avoid)).collect();
        self.rules.enrich(&mut ctx);
        Engine {
            rules,
            strategy: self.strategy,
            context: ctx,
        }
    }

    pub fn normalize(&self, tm: &Term<L>) -> Normalized<L> {
        self.normalize_with(tm, Context::new(), None)
    }

    /// Rewrite a term until no rule applies or the step limit is reached.
    ///
    /// Every step is reported to the observer, if one is given.
    pub fn normalize_with(
        &self,
        tm: &Term<L>,
        ctx: Context,
        mut observer: Option<&mut dyn Observer<L>>,
    ) -> Normalized<L> {
        let engine = self.engine(tm, ctx);
        let mut term = tm.clone();
        let mut steps = 0;
        while self.limit.map_or(true, |limit| steps < limit) {
            let (next, rule) = match engine.step(&term) {
                Some(step) => step,
                None => {
                    debug!("normal form after {} steps: {}", steps, term);
                    let complete = true;
                    return Normalized { term, steps, complete };
                }
            };
            if let Some(obs) = observer.as_mut() {
                obs.rewritten(rule, &term, &next)
            }
            term = next;
            steps += 1;
        }
        let complete = engine.step(&term).is_none();
        if !complete {
            debug!("step limit reached after {} steps: {}", steps, term);
        }
        Normalized { term, steps, complete }
    }

    /// Return true if both terms have equal normal forms.
    ///
    /// ~~~
    /// # use qnorm::{procs, Label, Normalizer, RuleSet, Symbol, Term};
    /// let add = Symbol::new("ADD");
    /// let zero = Term::<Label>::constant(Symbol::new("ZERO"));
    /// let rules = RuleSet::from_iter([procs::ac_unit("add_zero", add.clone(), zero.clone())]);
    ///
    /// let (a, b) = (Term::var("a"), Term::var("b"));
    /// let l = Term::ac(add.clone(), [a.clone(), zero, b.clone()]).unwrap();
    /// let r = Term::ac(add, [b, a.clone()]).unwrap();
    /// let normalizer = Normalizer::new(&rules);
    /// assert!(normalizer.equivalent(&l, &r));
    /// assert!(!normalizer.equivalent(&l, &a));
    /// ~~~
    pub fn equivalent(&self, l: &Term<L>, r: &Term<L>) -> bool {
        let l = self.normalize(l);
        let r = self.normalize(r);
        if !(l.complete && r.complete) {
            debug!("comparing incomplete normal forms");
        }
        l.term == r.term
    }
}

/// Rules and context prepared for normalizing a particular term.
#[derive(Debug)]
pub struct Engine<L> {
    rules: Vec<Rule<L>>,
    strategy: Strategy,
    context: Context,
}

impl<L: Leaf> Engine<L> {
    pub fn rules(&self) -> &[Rule<L>] {
        &self.rules
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Perform a single rewrite step.
    ///
    /// Return the rewritten term together with the applied rule,
    /// or `None` if the term is in normal form.
    pub fn step(&self, tm: &Term<L>) -> Option<(Term<L>, &Rule<L>)> {
        match self.strategy {
            Strategy::OuterMost => self.step_root(tm).or_else(|| self.step_children(tm)),
            Strategy::InnerMost => self.step_children(tm).or_else(|| self.step_root(tm)),
        }
    }

    /// Rewrite the root with the first applicable rule.
    fn step_root(&self, tm: &Term<L>) -> Option<(Term<L>, &Rule<L>)> {
        self.rules.iter().find_map(|rule| {
            let result = rule.apply(self, tm, &self.context)?;
            trace!("{}: {} ⟶ {}", rule.name(), tm, result);
            Some((result, rule))
        })
    }

    /// Rewrite the first child that can be rewritten.
    ///
    /// Binders are not rewritten, only their bodies.
    fn step_children(&self, tm: &Term<L>) -> Option<(Term<L>, &Rule<L>)> {
        match tm.get()? {
            TermC::Std(tag, args) => {
                let (args, rule) = self.step_first(args)?;
                Some((Term::std(tag.clone(), args), rule))
            }
            TermC::Ac(tag, args) => {
                let (args, rule) = self.step_first(args)?;
                Some((Term::ac_flat(tag.clone(), args)?, rule))
            }
            TermC::Comm(tag, [a, b]) => match self.step(a) {
                Some((a, rule)) => Some((Term::comm(tag.clone(), a, b.clone()), rule)),
                None => {
                    let (b, rule) = self.step(b)?;
                    Some((Term::comm(tag.clone(), a.clone(), b), rule))
                }
            },
            TermC::Bind(tag, x, body) => {
                let (body, rule) = self.step(body)?;
                Some((Term::bind(tag.clone(), x.clone(), body), rule))
            }
            TermC::MultiBind(tag, binders, body) => {
                let (body, rule) = self.step(body)?;
                let tm = Term::multi_bind_unique(tag.clone(), binders.clone(), body);
                Some((tm, rule))
            }
        }
    }

    /// Rewrite the first term of a list that can be rewritten.
    fn step_first(&self, args: &[Term<L>]) -> Option<(Vec<Term<L>>, &Rule<L>)> {
        let mut iter = args.iter().enumerate();
        let (i, (arg, rule)) = iter.find_map(|(i, a)| Some((i, self.step(a)?)))?;
        let mut args = args.to_vec();
        args[i] = arg;
        Some((args, rule))
    }
}

#[test]
fn limits() {
    use crate::{Label, Symbol};
    let neg = |x| Term::<Label>::std(Symbol::new("NEG"), [x]);
    let rule = Rule::new("neg_neg", neg(neg(Term::var("x"))), Term::var("x")).unwrap();
    let rules = RuleSet::from_iter([rule]);
    let tm = neg(neg(neg(neg(Term::var("a")))));

    let nf = Normalizer::new(&rules).limit(0).normalize(&tm);
    assert!(nf.term.ptr_eq(&tm));
    assert_eq!((nf.steps, nf.complete), (0, false));

    let nf = Normalizer::new(&rules).limit(1).normalize(&tm);
    assert_eq!(nf.term, neg(neg(Term::var("a"))));
    assert!(!nf.complete);

    let nf = Normalizer::new(&rules).limit(2).normalize(&tm);
    assert_eq!(nf.term, Term::var("a"));
    assert_eq!((nf.steps, nf.complete), (2, true));
}

#[test]
fn strategies() {
    use crate::{Label, Symbol};
    let f = |x| Term::<Label>::std(Symbol::new("F"), [x]);
    let g = |x| Term::<Label>::std(Symbol::new("G"), [x]);
    let c = Term::constant(Symbol::new("C"));
    // F(x) --> G(x) and G(G(x)) --> x
    let rules = RuleSet::from_iter([
        Rule::new("f", f(Term::var("x")), g(Term::var("x"))).unwrap(),
        Rule::new("gg", g(g(Term::var("x"))), Term::var("x")).unwrap(),
    ]);
    let tm = f(f(c.clone()));

    let mut outer = crate::Transcript::default();
    let normalizer = Normalizer::new(&rules);
    let nf = normalizer.normalize_with(&tm, Context::new(), Some(&mut outer));
    assert_eq!(nf.term, c);
    let rules_applied: Vec<_> = outer.steps().iter().map(|s| s.rule.as_str()).collect();
    assert_eq!(rules_applied, ["f", "f", "gg"]);
    assert_eq!(outer.steps()[0].after, g(f(c.clone())));

    let mut inner = crate::Transcript::default();
    let normalizer = normalizer.strategy(Strategy::InnerMost);
    let nf = normalizer.normalize_with(&tm, Context::new(), Some(&mut inner));
    assert_eq!(nf.term, c);
    assert_eq!(inner.steps()[0].after, f(g(c)));
}

#[test]
fn rule_vars_renamed() {
    use crate::{Label, Symbol};
    let f = |x: Term<Label>, y: Term<Label>| Term::std(Symbol::new("F"), [x, y]);
    let pair = |x| Term::<Label>::std(Symbol::new("P"), [x]);
    // F(x, y) --> P(y), where the term itself contains variables `x` and `y`
    let rule = Rule::new("f", f(Term::var("x"), Term::var("y")), pair(Term::var("y"))).unwrap();
    let rules = RuleSet::from_iter([rule]);
    let tm = f(Term::var("y"), Term::var("x"));
    let nf = Normalizer::new(&rules).normalize(&tm);
    assert_eq!(nf.term, pair(Term::var("x")));
}
