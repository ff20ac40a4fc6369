//! Processing of commands.

use crate::{Atom, Error, Opt, Scalar, Scope};
use core::fmt::{self, Display};
use qnorm::trace::Logger;
use qnorm::{
    procs, Context, Normalized, Normalizer, Observer, Rule, RuleSet, Strategy, Subst, Term, Transcript,
};
use qnorm_parse::{Command, Fold};

type Tm = Term<Atom>;

/// Result of a command that produces output.
pub enum Output {
    /// term, its normal form, and the steps that led to it if requested
    Norm(Tm, Normalized<Atom>, Option<Transcript<Atom>>),
    Eq(bool),
    Subst(Tm),
    /// substitution that has no idempotent closure
    Cyclic(Subst<Atom>),
}

impl Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Norm(tm, nf, transcript) => {
                if let Some(transcript) = transcript {
                    transcript.fmt(f)?
                }
                write!(f, "{} ⟶ {}", tm, nf.term)?;
                if !nf.complete {
                    write!(f, " (truncated)")?
                }
                Ok(())
            }
            Self::Eq(b) => b.fmt(f),
            Self::Subst(tm) => tm.fmt(f),
            Self::Cyclic(subst) => write!(f, "cyclic substitution {}", subst),
        }
    }
}

/// Symbols and rules introduced by previous commands.
pub struct Session {
    scope: Scope,
    rules: RuleSet<Atom>,
    strategy: Strategy,
    limit: Option<usize>,
    trace: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            scope: Scope::new(),
            rules: RuleSet::from_iter([Rule::leaf_reduce()]),
            strategy: Strategy::default(),
            limit: None,
            trace: false,
        }
    }
}

/// Fold two scalar leaves.
fn fold(op: Fold) -> impl Fn(&Atom, &Atom) -> Option<Atom> {
    move |a, b| match (a, b) {
        (Atom::Scalar(x), Atom::Scalar(y)) => {
            let (x, y) = (x.clone(), y.clone());
            Some(Atom::Scalar(match op {
                Fold::Add => Scalar::add(x, y),
                Fold::Mul => Scalar::mul(x, y),
            }))
        }
        _ => None,
    }
}

impl Session {
    pub fn new(opt: &Opt) -> Self {
        Self {
            strategy: opt.strategy,
            limit: opt.limit,
            trace: opt.trace,
            ..Self::default()
        }
    }

    pub fn rules(&self) -> &RuleSet<Atom> {
        &self.rules
    }

    fn normalizer(&self) -> Normalizer<'_, Atom> {
        let normalizer = Normalizer::new(&self.rules).strategy(self.strategy);
        normalizer.limit(self.limit)
    }

    /// Process a command, returning its output if it has one.
    pub fn handle(&mut self, cmd: Command<&str>) -> Result<Option<Output>, Error> {
        match cmd {
            Command::Symbol(name, kind) => {
                log::info!("Introduce {} symbol {}", kind, name);
                self.scope.declare(name, kind)?;
            }
            Command::Rule(name, lhs, rhs) => {
                let lhs = self.scope.term(&lhs)?;
                let rhs = self.scope.term(&rhs)?;
                log::info!("Add rule {}: {} --> {}", name, lhs, rhs);
                self.rules.push(Rule::new(name, lhs, rhs)?)
            }
            Command::Unit(name, tag, unit) => {
                let tag = self.scope.ac(tag)?;
                let unit = self.scope.term(&unit)?;
                self.rules.push(procs::ac_unit(name, tag, unit))
            }
            Command::Absorb(name, tag, zero) => {
                let tag = self.scope.ac(tag)?;
                let zero = self.scope.term(&zero)?;
                self.rules.push(procs::ac_absorb(name, tag, zero))
            }
            Command::Idem(name, tag) => {
                let tag = self.scope.ac(tag)?;
                self.rules.push(procs::ac_idempotent(name, tag))
            }
            Command::Fold(name, tag, op) => {
                let tag = self.scope.ac(tag)?;
                self.rules.push(procs::ac_fold(name, tag, fold(op)))
            }
            Command::Norm(tm) => {
                let tm = self.scope.term(&tm)?;
                let mut transcript = self.trace.then(Transcript::default);
                let mut logger = Logger;
                let observer: &mut dyn Observer<Atom> = match transcript.as_mut() {
                    Some(transcript) => transcript,
                    None => &mut logger,
                };
                let nf = self.normalizer().normalize_with(&tm, Context::new(), Some(observer));
                return Ok(Some(Output::Norm(tm, nf, transcript)));
            }
            Command::Eq(l, r) => {
                let l = self.scope.term(&l)?;
                let r = self.scope.term(&r)?;
                return Ok(Some(Output::Eq(self.normalizer().equivalent(&l, &r))));
            }
            Command::Subst(bindings, tm) => {
                let bindings = bindings.iter().map(|(x, t)| Ok::<_, Error>((*x, self.scope.term(t)?)));
                let subst: Subst<Atom> = bindings.collect::<Result<_, Error>>()?;
                let tm = self.scope.term(&tm)?;
                return Ok(Some(match subst.get_idempotent() {
                    Some(idem) => Output::Subst(idem.apply(&tm)),
                    None => Output::Cyclic(subst),
                }));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
fn run(session: &mut Session, cmds: &str) -> Vec<String> {
    let cmds = qnorm_parse::CmdIter::new(cmds).map(|cmd| cmd.unwrap());
    let outputs = cmds.filter_map(|cmd| session.handle(cmd).unwrap());
    outputs.map(|out| out.to_string()).collect()
}

#[cfg(test)]
const PRELUDE: &str = "
    symbol ADD : ac.
    symbol MUL : ac.
    symbol ZERO : std.
    symbol NEG : std.
    symbol SCR : std.
    unit add_zero : ADD(ZERO).
    absorb mul_zero : MUL(ZERO).
    fold add_scalars : ADD +.
    rule neg_neg : NEG(NEG(x)) --> x.
    rule scr_zero : SCR($0$, x) --> ZERO.
";

#[test]
fn norm() {
    let mut session = Session::default();
    run(&mut session, PRELUDE);
    let out = run(&mut session, "norm ADD(NEG(NEG(a)), ZERO).");
    assert_eq!(out.len(), 1);
    assert!(out[0].ends_with("⟶ a"));

    // scalars are folded and reduced
    let out = run(&mut session, "norm ADD($1$, $p * 0$, $2$).");
    assert!(out[0].ends_with("⟶ $3$"));

    let out = run(&mut session, "norm SCR($p + -p * 1$, b). norm SCR($1 + -1$, b).");
    assert!(out[0].ends_with("⟶ SCR($p + -p$, b)"));
    assert!(out[1].ends_with("⟶ ZERO"));

    let out = run(&mut session, "norm MUL(a, ZERO, b).");
    assert!(out[0].ends_with("⟶ ZERO"));
}

#[test]
fn eq() {
    let mut session = Session::default();
    run(&mut session, PRELUDE);
    let out = run(&mut session, "eq ADD(a, NEG(NEG(b))) == ADD(b, a, ZERO). eq a == b.");
    assert_eq!(out, ["true", "false"]);
}

#[test]
fn subst() {
    let mut session = Session::default();
    run(&mut session, PRELUDE);
    let out = run(&mut session, "subst { x : NEG(y) ; y : z } ADD(x, y).");
    assert_eq!(out.len(), 1);
    let expected = run(&mut session, "norm ADD(NEG(z), z).");
    assert!(expected[0].starts_with(&out[0]));

    let out = run(&mut session, "subst { x : NEG(y) ; y : NEG(x) } x.");
    assert_eq!(out, ["cyclic substitution { x : NEG(y) ; y : NEG(x) ; }"]);
}

#[test]
fn leaf_literals() {
    let mut session = Session::default();
    run(&mut session, "symbol SCR : std. rule r : SCR($p$, x) --> x.");
    // the parameter of a leaf in a pattern is not a rule variable
    let out = run(&mut session, "norm SCR($p$, a). norm SCR($p$, p). norm SCR($q$, a).");
    assert_eq!(out, ["SCR($p$, a) ⟶ a", "SCR($p$, p) ⟶ p", "SCR($q$, a) ⟶ SCR($q$, a)"]);

    // rule variables inside leaves of the right-hand side are renamed along
    run(&mut session, "symbol DBL : std. rule dbl : DBL(x, y) --> $x * 2$.");
    let out = run(&mut session, "norm DBL($3$, x).");
    assert_eq!(out, ["DBL($3$, x) ⟶ $6$"]);
}

#[test]
fn limit_and_trace() {
    let mut session = Session {
        limit: Some(1),
        trace: true,
        ..Session::default()
    };
    run(&mut session, PRELUDE);
    let out = run(&mut session, "norm NEG(NEG(NEG(NEG(a)))).");
    let expected = "\
NEG(NEG(NEG(NEG(a))))
  ⟶ NEG(NEG(a)) (neg_neg)
NEG(NEG(NEG(NEG(a)))) ⟶ NEG(NEG(a)) (truncated)";
    assert_eq!(out, [expected]);
}

#[test]
fn errors() {
    let mut session = Session::default();
    run(&mut session, PRELUDE);
    let cmd = |s| qnorm_parse::CmdIter::new(s).next().unwrap().unwrap();
    assert!(matches!(session.handle(cmd("idem i : ZERO.")), Err(Error::Scope(_))));
    assert!(matches!(session.handle(cmd("symbol ADD : std.")), Err(Error::Scope(_))));
    let unsupported = session.handle(cmd("rule r : ADD(x, ZERO) --> x."));
    assert!(matches!(unsupported, Err(Error::Kernel(qnorm::Error::UnsupportedPattern(..)))));
}
