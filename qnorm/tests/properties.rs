use qnorm::{procs, Binder, Label, Normalizer, Rule, RuleSet, Strategy, Subst, Symbol, Term};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

type Tm = Term<Label>;

fn hash(tm: &Tm) -> u64 {
    let mut hasher = DefaultHasher::new();
    tm.hash(&mut hasher);
    hasher.finish()
}

fn sym(s: &str) -> Symbol {
    Symbol::new(s)
}

fn app(s: &str, args: impl IntoIterator<Item = Tm>) -> Tm {
    Term::std(sym(s), args)
}

fn var(x: &str) -> Tm {
    Term::var(x)
}

#[test]
fn idempotent_substitution() {
    // x := F(y); y := G(z); z := H(w)
    let s: Subst<Label> = [
        ("x", app("F", [var("y")])),
        ("y", app("G", [var("z")])),
        ("z", app("H", [var("w")])),
    ]
    .into_iter()
    .collect();
    let idem = s.get_idempotent().unwrap();
    assert!(idem.is_idempotent());
    let vrange = idem.vrange();
    assert!(idem.domain().all(|x| !vrange.contains(x)));

    let tm = app("P", [var("x"), var("y"), var("w")]);
    let mut fix = tm.clone();
    loop {
        let next = s.apply(&fix);
        if next == fix {
            break;
        }
        fix = next;
    }
    assert_eq!(idem.apply(&tm), fix);
    assert_eq!(idem.apply(&idem.apply(&tm)), idem.apply(&tm));
}

#[test]
fn capture_avoidance() {
    let bind = |x, body| Term::bind(sym("LAM"), x, body);
    let s = Subst::singleton("b", var("a"));

    assert_eq!(bind("b", var("b")).subst(&s), bind("b", var("b")));
    assert_eq!(bind("c", var("b")).subst(&s), bind("c", var("a")));

    // LAM(a. F(a, b)) with b := a must not become LAM(a. F(a, a))
    let tm = bind("a", app("F", [var("a"), var("b")]));
    let result = tm.subst(&s);
    assert_ne!(result, bind("a", app("F", [var("a"), var("a")])));
    assert_eq!(result, bind("c", app("F", [var("c"), var("a")])));
}

#[test]
fn ac_canonical_form() {
    let add = sym("ADD");
    let (x, y) = (var("X"), var("Y"));
    let l = Term::ac(add.clone(), [x.clone(), y.clone(), x.clone()]).unwrap();
    let r = Term::ac(add.clone(), [y.clone(), x.clone(), x.clone()]).unwrap();
    assert_eq!(l, r);
    assert_eq!(hash(&l), hash(&r));
    assert_eq!(l.to_string(), r.to_string());

    // nested construction flattens
    let nested = Term::ac(add.clone(), [Term::ac(add, [x.clone(), x]).unwrap(), y]).unwrap();
    assert_eq!(nested, l);
    assert_eq!(hash(&nested), hash(&l));
}

#[test]
fn commutative_pairs() {
    let pair = sym("INNER");
    let (a, b) = (app("A", []), app("B", []));
    let l = Term::comm(pair.clone(), a.clone(), b.clone());
    let r = Term::comm(pair, b, a);
    assert_eq!(l, r);
    assert_eq!(hash(&l), hash(&r));
}

#[test]
fn binder_permutation() {
    let sum = sym("SUM");
    let p = |x, y| app("P", [var(x), var(y)]);
    let mb = |x, y, body| Term::multi_bind(sum.clone(), [x, y].map(Binder::universal), body).unwrap();

    let xy = mb("x", "y", p("x", "y"));
    let yx = mb("y", "x", p("y", "x"));
    assert_eq!(xy, yx);
    assert_eq!(hash(&xy), hash(&yx));
}

#[test]
fn multi_binder_swapped_body_is_binder_permutation() {
    let sum = sym("SUM");
    let p = |x, y| app("P", [var(x), var(y)]);
    let mb = |x, y, body| Term::multi_bind(sum.clone(), [x, y].map(Binder::universal), body).unwrap();

    // permuting the binders of SUM(x, y. P(y, x)) yields SUM(y, x. P(y, x)),
    // which is SUM(x, y. P(x, y)) after renaming
    let xy = mb("x", "y", p("x", "y"));
    let swapped = mb("x", "y", p("y", "x"));
    assert_eq!(xy, swapped);
    assert_eq!(hash(&xy), hash(&swapped));

    // binders with different domains cannot be exchanged
    let (u, v) = (app("U", []), app("V", []));
    let dom = |body| {
        let binders = [Binder::new("x", u.clone()), Binder::new("y", v.clone())];
        Term::multi_bind(sum.clone(), binders, body).unwrap()
    };
    assert_ne!(dom(p("x", "y")), dom(p("y", "x")));

    // nested single binders keep their order
    let lam = sym("LAM");
    let single = |x, y, body| Term::bind(lam.clone(), x, Term::bind(lam.clone(), y, body));
    assert_ne!(single("x", "y", p("x", "y")), single("x", "y", p("y", "x")));
    assert_eq!(single("x", "y", p("x", "y")), single("y", "x", p("y", "x")));
}

#[test]
fn fixpoint() {
    let neg = |x| app("NEG", [x]);
    let rules = RuleSet::from_iter([
        Rule::leaf_reduce(),
        Rule::new("neg_neg", neg(neg(var("x"))), var("x")).unwrap(),
    ]);
    let tm = app("F", [neg(var("a")), Term::leaf(Label::new("l"))]);
    for strategy in [Strategy::OuterMost, Strategy::InnerMost] {
        let nf = Normalizer::new(&rules).strategy(strategy).normalize(&tm);
        assert!(nf.term.ptr_eq(&tm));
        assert_eq!(nf.steps, 0);
        assert!(nf.complete);
    }
}

#[test]
fn strategy_independence() {
    let add = sym("ADD");
    let zero = app("ZERO", []);
    let a = var("a");
    let rules = RuleSet::from_iter([procs::ac_unit("add_zero", add.clone(), zero.clone())]);

    // zero + (a + zero)
    let inner = Term::ac(add.clone(), [a.clone(), zero.clone()]).unwrap();
    let tm = Term::ac(add, [zero, inner]).unwrap();
    for strategy in [Strategy::OuterMost, Strategy::InnerMost] {
        let nf = Normalizer::new(&rules).strategy(strategy).normalize(&tm);
        assert_eq!(nf.term, a);
        assert!(nf.complete);
    }

    // under binders, only bodies are rewritten
    let neg = |x| app("NEG", [x]);
    let rules = RuleSet::from_iter([Rule::new("neg_neg", neg(neg(var("x"))), var("x")).unwrap()]);
    let tm = Term::bind(sym("LAM"), "y", neg(neg(app("F", [neg(neg(var("y")))]))));
    let expected = Term::bind(sym("LAM"), "z", app("F", [var("z")]));
    let outer = Normalizer::new(&rules).normalize(&tm);
    let inner = Normalizer::new(&rules).strategy(Strategy::InnerMost).normalize(&tm);
    assert_eq!(outer.term, expected);
    assert_eq!(inner.term, expected);
    assert_eq!((outer.steps, inner.steps), (2, 2));
}

#[test]
fn step_limit() {
    let neg = |x| app("NEG", [x]);
    let rules = RuleSet::from_iter([Rule::new("neg_neg", neg(neg(var("x"))), var("x")).unwrap()]);
    let tm = app("F", [neg(neg(var("a"))), neg(neg(var("b")))]);

    let nf = Normalizer::new(&rules).limit(0).normalize(&tm);
    assert!(nf.term.ptr_eq(&tm));

    let normalizer = Normalizer::new(&rules);
    let engine = normalizer.engine(&tm, Default::default());
    let (one, _) = engine.step(&tm).unwrap();
    let nf = normalizer.clone().limit(1).normalize(&tm);
    assert_eq!(nf.term, one);
    assert_eq!(nf.term, app("F", [var("a"), neg(neg(var("b")))]));

    // a limit larger than needed behaves like no limit
    let nf = normalizer.limit(100).normalize(&tm);
    assert_eq!(nf.term, app("F", [var("a"), var("b")]));
    assert_eq!(nf.steps, 2);
    assert!(nf.complete);
}

#[test]
fn merged_multi_binder_rewriting() {
    // rewriting the body of a multi-binder merges newly exposed nested binders
    let sum = sym("SUM");
    let id = |x| app("ID", [x]);
    let rules = RuleSet::from_iter([Rule::new("id", id(var("x")), var("x")).unwrap()]);
    let inner = Term::multi_bind(sum.clone(), [Binder::universal("j")], app("P", [var("i"), var("j")])).unwrap();
    let tm = Term::multi_bind(sum.clone(), [Binder::universal("i")], id(inner)).unwrap();
    let nf = Normalizer::new(&rules).normalize(&tm);
    let binders = ["j", "i"].map(Binder::universal);
    let flat = Term::multi_bind(sum, binders, app("P", [var("i"), var("j")])).unwrap();
    assert_eq!(nf.term, flat);
    assert_eq!(nf.term.size(), flat.size());
}
