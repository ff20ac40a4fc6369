use criterion::{criterion_group, criterion_main, Criterion};
use qnorm::{procs, Binder, Label, Normalizer, Rule, RuleSet, Strategy, Subst, Symbol, Term};

type Tm = Term<Label>;

/// Nested sum `ADD(x_n, ZERO, ADD(..., ADD(x_1, ZERO)))` with many units.
fn sum(n: usize) -> Tm {
    let add = Symbol::new("ADD");
    let zero = Term::constant(Symbol::new("ZERO"));
    (1..=n).fold(zero.clone(), |acc, i| {
        let x = Term::var(format!("x_{}", i));
        let args = [Term::std(Symbol::new("NEG"), [Term::std(Symbol::new("NEG"), [x])]), zero.clone(), acc];
        Term::ac(add.clone(), args).unwrap()
    })
}

fn rules() -> RuleSet<Label> {
    let neg = |x| Term::std(Symbol::new("NEG"), [x]);
    let zero = Term::constant(Symbol::new("ZERO"));
    let mut rules = RuleSet::new();
    rules.push(Rule::leaf_reduce());
    rules.push(Rule::new("neg_neg", neg(neg(Term::var("x"))), Term::var("x")).unwrap());
    rules.push(procs::ac_unit("add_zero", Symbol::new("ADD"), zero));
    rules
}

/// Multi-binder with `n` binders whose body uses them in reversed order.
fn multi(n: usize, rev: bool) -> Tm {
    let vars: Vec<_> = (0..n).map(|i| format!("i_{}", i)).collect();
    let mut args: Vec<Tm> = vars.iter().map(|x| Term::var(x.as_str())).collect();
    if rev {
        args.reverse()
    }
    let body = Term::std(Symbol::new("P"), args);
    let binders = vars.iter().rev().map(|x| Binder::universal(x.as_str()));
    Term::multi_bind(Symbol::new("SUM"), binders, body).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let rules = rules();
    let big = sum(50);

    c.bench_function("outermost", |b| {
        b.iter(|| Normalizer::new(&rules).normalize(&big))
    });
    c.bench_function("innermost", |b| {
        let normalizer = Normalizer::new(&rules).strategy(Strategy::InnerMost);
        b.iter(|| normalizer.normalize(&big))
    });

    let (l, r) = (multi(5, false), multi(5, true));
    c.bench_function("alpha_multi", |b| b.iter(|| l == r));

    let subst: Subst<Label> = (1..=50)
        .map(|i| (format!("x_{}", i), Term::var(format!("y_{}", i))))
        .collect();
    c.bench_function("subst", |b| b.iter(|| big.subst(&subst)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
