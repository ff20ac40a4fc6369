//! Rewrite procedures for AC symbols.
//!
//! Patterns cannot contain AC symbols, so rules over them
//! inspect the canonically ordered children directly.
//! Every procedure performs at most one change per application,
//! such that each change is visible as a separate step.

use crate::{Leaf, Rule, Symbol, Term};

/// Rebuild an AC term from a non-empty list of children.
fn rebuild<L: Leaf>(tag: &Symbol, children: Vec<Term<L>>, empty: impl FnOnce() -> Term<L>) -> Term<L> {
    Term::ac_flat(tag.clone(), children).unwrap_or_else(empty)
}

/// Remove an occurrence of a unit element, e.g. `ADD(x, ZERO) ⟶ x`.
///
/// If all children are units, the result is the unit.
pub fn ac_unit<L: Leaf>(name: impl Into<String>, tag: Symbol, unit: Term<L>) -> Rule<L> {
    let x = Term::var("x");
    let lhs = Term::ac_flat(tag.clone(), [x.clone(), unit.clone()]);
    let repr = format!("{}(x, {}) -> x", tag, unit);
    let rule = Rule::procedure(name, move |_, _, tm, _| {
        let args = tm.get_ac(&tag)?;
        let i = args.iter().position(|a| a == &unit)?;
        let mut children = args.to_vec();
        children.remove(i);
        Some(rebuild(&tag, children, || unit.clone()))
    });
    let rule = rule.with_repr(repr);
    match lhs {
        Some(lhs) => rule.with_canonical(lhs, x),
        None => rule,
    }
}

/// Replace the term by an absorbing element if it occurs among the children,
/// e.g. `MUL(x, ZERO) ⟶ ZERO`.
pub fn ac_absorb<L: Leaf>(name: impl Into<String>, tag: Symbol, zero: Term<L>) -> Rule<L> {
    let repr = format!("{}(x, {}) -> {}", tag, zero, zero);
    let x = Term::var("x");
    let lhs = Term::ac_flat(tag.clone(), [x, zero.clone()]);
    let canonical = lhs.map(|lhs| (lhs, zero.clone()));
    let rule = Rule::procedure(name, move |_, _, tm, _| {
        let args = tm.get_ac(&tag)?;
        args.iter().any(|a| a == &zero).then(|| zero.clone())
    });
    let rule = rule.with_repr(repr);
    match canonical {
        Some((lhs, rhs)) => rule.with_canonical(lhs, rhs),
        None => rule,
    }
}

/// Remove one of two equal children, e.g. `OR(x, x) ⟶ x`.
pub fn ac_idempotent<L: Leaf>(name: impl Into<String>, tag: Symbol) -> Rule<L> {
    let repr = format!("{}(x, x) -> x", tag);
    Rule::procedure(name, move |_, _, tm, _| {
        let args = tm.get_ac(&tag)?;
        let i = (1..args.len()).find(|&j| args[..j].iter().any(|a| a == &args[j]))?;
        let mut children = args.to_vec();
        let dup = children.remove(i);
        Some(rebuild(&tag, children, || dup))
    })
    .with_repr(repr)
}

/// Combine two leaf children into one, e.g. `ADD($1$, $2$) ⟶ $3$`.
///
/// The first pair of leaves (in child order) that `f` combines is replaced by
/// the combined leaf.
///
/// ~~~
/// # use qnorm::{procs, Label, Normalizer, RuleSet, Symbol, Term};
/// let cat = Symbol::new("CAT");
/// let join = |a: &Label, b: &Label| Some(Label::new(format!("{}{}", a.name(), b.name())));
/// let rules = RuleSet::from_iter([procs::ac_fold("cat", cat.clone(), join)]);
///
/// let leaf = |s| Term::leaf(Label::new(s));
/// let tm = Term::ac(cat, [leaf("a"), Term::var("x"), leaf("b")]).unwrap();
/// let nf = Normalizer::new(&rules).normalize(&tm);
/// assert_eq!(nf.steps, 1);
/// assert_eq!(nf.term.size(), 3);
/// ~~~
pub fn ac_fold<L, F>(name: impl Into<String>, tag: Symbol, f: F) -> Rule<L>
where
    L: Leaf,
    F: Fn(&L, &L) -> Option<L> + 'static,
{
    Rule::procedure(name, move |_, _, tm, _| {
        let args = tm.get_ac(&tag)?;
        let leaves: Vec<_> = args
            .iter()
            .enumerate()
            .filter_map(|(i, a)| match a {
                Term::Leaf(l) => Some((i, &**l)),
                _ => None,
            })
            .collect();
        let (i, j, folded) = leaves.iter().enumerate().find_map(|(k, &(i, a))| {
            let mut later = leaves[k + 1..].iter();
            later.find_map(|&(j, b)| Some((i, j, f(a, b)?)))
        })?;
        let mut children = args.to_vec();
        children.remove(j);
        children[i] = Term::leaf(folded);
        let folded = children[i].clone();
        Some(rebuild(&tag, children, || folded))
    })
}

#[test]
fn unit_all() {
    use crate::{Label, Normalizer, RuleSet};
    let add = Symbol::new("ADD");
    let zero = Term::<Label>::constant(Symbol::new("ZERO"));
    let rules = RuleSet::from_iter([ac_unit("add_zero", add.clone(), zero.clone())]);
    let tm = Term::ac(add, [zero.clone(), zero.clone(), zero.clone()]).unwrap();
    let nf = Normalizer::new(&rules).normalize(&tm);
    assert_eq!(nf.term, zero);
    assert_eq!(nf.steps, 2);
}

#[test]
fn absorb() {
    use crate::{Label, Normalizer, RuleSet};
    let mul = Symbol::new("MUL");
    let zero = Term::<Label>::constant(Symbol::new("ZERO"));
    let rules = RuleSet::from_iter([ac_absorb("mul_zero", mul.clone(), zero.clone())]);
    let tm = Term::ac(mul.clone(), [Term::var("a"), zero.clone(), Term::var("b")]).unwrap();
    let nf = Normalizer::new(&rules).normalize(&tm);
    assert_eq!((nf.term, nf.steps), (zero, 1));

    let tm = Term::ac(mul, [Term::var("a"), Term::var("b")]).unwrap();
    assert_eq!(Normalizer::new(&rules).normalize(&tm).steps, 0);
}

#[test]
fn idempotent() {
    use crate::{Label, Normalizer, RuleSet};
    let or = Symbol::new("OR");
    let rules = RuleSet::from_iter([ac_idempotent("or_idem", or.clone())]);
    let (a, b) = (Term::<Label>::var("a"), Term::var("b"));
    let tm = Term::ac(or.clone(), [a.clone(), b.clone(), a.clone(), a.clone()]).unwrap();
    let nf = Normalizer::new(&rules).normalize(&tm);
    assert_eq!(nf.term, Term::ac(or, [a, b]).unwrap());
    assert_eq!(nf.steps, 2);
}

#[test]
fn canonical() {
    use crate::Label;
    let add = Symbol::new("ADD");
    let zero = Term::<Label>::constant(Symbol::new("ZERO"));
    let rule = ac_unit("add_zero", add.clone(), zero.clone());
    assert_eq!(rule.repr(), Some("ADD(x, ZERO) -> x"));
    let (lhs, rhs) = rule.canonical().unwrap();
    assert_eq!(lhs, &Term::ac(add, [zero, Term::var("x")]).unwrap());
    assert_eq!(rhs, &Term::var("x"));
}
