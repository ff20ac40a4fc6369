//! Rewrite rules and rule sets.

use crate::fresh::fresh;
use crate::pattern;
use crate::term::{Name, Term};
use crate::{Context, Engine, Error, Leaf, Pattern, Subst};
use fnv::FnvHashSet;
use std::fmt;
use std::rc::Rc;

/// Hand-written rewrite procedure.
///
/// It receives the rule it belongs to, the engine running it,
/// the term to rewrite, and the side-channel context.
pub type Procedure<L> = Rc<dyn Fn(&Rule<L>, &Engine<L>, &Term<L>, &Context) -> Option<Term<L>>>;

/// Function that extends the context before normalization.
pub type Enricher = Rc<dyn Fn(&mut Context)>;

/// How a rule rewrites a term.
#[derive(Clone)]
pub enum Rewrite<L> {
    /// match a pattern and instantiate the right-hand side
    Match(Pattern<L>, Term<L>),
    /// run a hand-written procedure
    Custom(Procedure<L>),
}

/// Named rewrite rule.
#[derive(Clone)]
pub struct Rule<L> {
    name: String,
    rewrite: Rewrite<L>,
    /// pattern and replacement, for documentation
    canonical: Option<(Term<L>, Term<L>)>,
    /// literal textual representation, for export
    repr: Option<String>,
}

impl<L> Rule<L> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rewrite(&self) -> &Rewrite<L> {
        &self.rewrite
    }

    pub fn canonical(&self) -> Option<(&Term<L>, &Term<L>)> {
        self.canonical.as_ref().map(|(l, r)| (l, r))
    }

    pub fn repr(&self) -> Option<&str> {
        self.repr.as_deref()
    }
}

impl<L: Leaf> Rule<L> {
    /// Construct a rule that rewrites instances of `lhs` to `rhs`.
    ///
    /// ~~~
    /// # use qnorm::{Context, Error, Label, Normalizer, Rule, RuleSet, Symbol, Term};
    /// let neg = |x| Term::<Label>::std(Symbol::new("NEG"), [x]);
    /// let rule = Rule::new("neg_neg", neg(neg(Term::var("x"))), Term::var("x"))?;
    /// let rules = RuleSet::from_iter([rule.clone()]);
    /// let engine = Normalizer::new(&rules).engine(&Term::var("a"), Context::new());
    ///
    /// let a = Term::var("a");
    /// assert_eq!(rule.apply(&engine, &neg(neg(a.clone())), engine.context()), Some(a.clone()));
    /// assert_eq!(rule.apply(&engine, &neg(a), engine.context()), None);
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn new(name: impl Into<String>, lhs: Term<L>, rhs: Term<L>) -> Result<Self, Error> {
        let pattern = Pattern::new(lhs.clone())?;
        Ok(Self {
            name: name.into(),
            rewrite: Rewrite::Match(pattern, rhs.clone()),
            canonical: Some((lhs, rhs)),
            repr: None,
        })
    }

    /// Construct a rule from a hand-written procedure.
    pub fn procedure<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Rule<L>, &Engine<L>, &Term<L>, &Context) -> Option<Term<L>> + 'static,
    {
        Self {
            name: name.into(),
            rewrite: Rewrite::Custom(Rc::new(f)),
            canonical: None,
            repr: None,
        }
    }

    /// Rule that simplifies leaves via [`Leaf::reduce`].
    pub fn leaf_reduce() -> Self {
        Self::procedure("leaf-reduce", |_, _, tm, _| match tm {
            Term::Leaf(l) => l.reduce().map(Term::leaf),
            _ => None,
        })
    }

    pub fn with_canonical(self, lhs: Term<L>, rhs: Term<L>) -> Self {
        let canonical = Some((lhs, rhs));
        Self { canonical, ..self }
    }

    pub fn with_repr(self, repr: impl Into<String>) -> Self {
        let repr = Some(repr.into());
        Self { repr, ..self }
    }

    /// Rewrite a term at its root, returning `None` if the rule does not apply.
    pub fn apply(&self, engine: &Engine<L>, tm: &Term<L>, ctx: &Context) -> Option<Term<L>> {
        match &self.rewrite {
            Rewrite::Match(pat, rhs) => Some(rhs.subst(&pat.matches(tm)?)),
            Rewrite::Custom(f) => f(self, engine, tm, ctx),
        }
    }

    /// Rename the variables of the rule that occur in `avoid`.
    ///
    /// Parameters of leaves in the left-hand side are constants, not rule variables,
    /// so they are never renamed.
    ///
    /// ~~~
    /// # use qnorm::{Error, Label, Rule, Symbol, Term};
    /// let f = |x| Term::<Label>::std(Symbol::new("F"), [Term::var(x)]);
    /// let rule = Rule::new("f", f("x"), Term::var("x"))?;
    /// let avoid = ["x".into()].into_iter().collect();
    /// let (lhs, rhs) = rule.rename_vars(&avoid).canonical().map(|(l, r)| (l.clone(), r.clone())).unwrap();
    /// assert_eq!((lhs, rhs), (f("x_1"), Term::var("x_1")));
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn rename_vars(&self, avoid: &FnvHashSet<Name>) -> Self {
        let (pat, rhs) = match &self.rewrite {
            Rewrite::Match(pat, rhs) => (pat, rhs),
            Rewrite::Custom(_) => return self.clone(),
        };
        let mut rule_vars = pat.term().vars_outside_leaves();
        rule_vars.extend(rhs.vars_outside_leaves());
        let mut clashing: Vec<_> = rule_vars.into_iter().filter(|x| avoid.contains(x)).collect();
        if clashing.is_empty() {
            return self.clone();
        }
        clashing.sort();

        let mut vars = pat.term().vars();
        vars.extend(rhs.vars());
        let mut renaming = Subst::new();
        for x in clashing {
            let y = fresh(&x, |y| avoid.contains(y) || vars.contains(y));
            vars.insert(y.clone());
            renaming = renaming.with(x, Term::Var(y));
        }
        debug!("rename variables of rule {}: {}", self.name, renaming);

        let rewrite = Rewrite::Match(pat.rename(&renaming), rhs.subst(&renaming));
        let canonical = self.canonical.as_ref();
        let canonical = canonical.map(|(l, r)| (pattern::rename(l, &renaming), r.subst(&renaming)));
        Self {
            rewrite,
            canonical,
            ..self.clone()
        }
    }
}

impl<L> fmt::Debug for Rule<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("repr", &self.repr)
            .finish()
    }
}

/// Ordered list of rules together with context enrichers.
///
/// Rules are tried in the order in which they were added.
#[derive(Clone)]
pub struct RuleSet<L> {
    rules: Vec<Rule<L>>,
    enrichers: Vec<Enricher>,
}

impl<L> Default for RuleSet<L> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            enrichers: Vec::new(),
        }
    }
}

impl<L> RuleSet<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule<L>) {
        self.rules.push(rule)
    }

    /// Append the rules and enrichers of another rule set.
    pub fn extend(&mut self, other: Self) {
        self.rules.extend(other.rules);
        self.enrichers.extend(other.enrichers);
    }

    /// Register a function that extends the context before normalization.
    pub fn add_enricher(&mut self, f: impl Fn(&mut Context) + 'static) {
        self.enrichers.push(Rc::new(f))
    }

    /// Apply all enrichers to the context, in registration order.
    ///
    /// ~~~
    /// # use qnorm::{Context, Label, RuleSet};
    /// let mut rules = RuleSet::<Label>::new();
    /// rules.add_enricher(|ctx| ctx.insert("dims", 2usize));
    /// rules.add_enricher(|ctx| {
    ///     let dims = ctx.get::<usize>("dims").copied().unwrap_or(0);
    ///     ctx.insert("dims", dims * 2)
    /// });
    /// let mut ctx = Context::new();
    /// rules.enrich(&mut ctx);
    /// assert_eq!(ctx.get::<usize>("dims"), Some(&4));
    /// ~~~
    pub fn enrich(&self, ctx: &mut Context) {
        self.enrichers.iter().for_each(|f| f(ctx))
    }

    pub fn rules(&self) -> &[Rule<L>] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<L>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<L> FromIterator<Rule<L>> for RuleSet<L> {
    fn from_iter<I: IntoIterator<Item = Rule<L>>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
            enrichers: Vec::new(),
        }
    }
}

impl<L> fmt::Debug for RuleSet<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(&self.rules).finish()
    }
}

#[test]
fn leaf_reduce() {
    use crate::{Normalizer, Symbol};

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct Nat(u32);

    impl Leaf for Nat {
        fn reduce(&self) -> Option<Self> {
            self.0.checked_sub(1).map(Nat)
        }
    }

    impl fmt::Display for Nat {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    let rules = RuleSet::from_iter([Rule::leaf_reduce()]);
    let tm = Term::std(Symbol::new("F"), [Term::leaf(Nat(3)), Term::leaf(Nat(1))]);
    let nf = Normalizer::new(&rules).normalize(&tm);
    let zero = || Term::leaf(Nat(0));
    assert_eq!(nf.term, Term::std(Symbol::new("F"), [zero(), zero()]));
    assert_eq!(nf.steps, 4);
}

#[test]
fn rename_rhs_only() {
    use crate::{Label, Symbol};
    let f = |x, y| Term::<Label>::std(Symbol::new("F"), [Term::var(x), Term::var(y)]);
    // `y` occurs only on the right-hand side
    let rule = Rule::new("f", f("x", "x"), f("x", "y")).unwrap();
    let avoid = ["y".into(), "y_1".into()].into_iter().collect();
    let renamed = rule.rename_vars(&avoid);
    let (lhs, rhs) = renamed.canonical().unwrap();
    assert_eq!(lhs, &f("x", "x"));
    assert_eq!(rhs, &f("x", "y_2"));
}
