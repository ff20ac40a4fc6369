//! Integer expressions over symbolic parameters.

use core::fmt::{self, Display};
use core::num::ParseIntError;
use qnorm::Name;
use qnorm_parse::Scalar as Expr;
use std::rc::Rc;

/// Scalar, such as `2 * p + 1`.
///
/// Scalars are compared structurally;
/// [`reduce`](Scalar::reduce) brings them into a simpler form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int(i64),
    Param(Name),
    Neg(Rc<Scalar>),
    Add(Rc<Scalar>, Rc<Scalar>),
    Mul(Rc<Scalar>, Rc<Scalar>),
}

impl Scalar {
    pub fn neg(x: Self) -> Self {
        Self::Neg(Rc::new(x))
    }

    pub fn add(x: Self, y: Self) -> Self {
        Self::Add(Rc::new(x), Rc::new(y))
    }

    pub fn mul(x: Self, y: Self) -> Self {
        Self::Mul(Rc::new(x), Rc::new(y))
    }

    /// Return the parameters of the scalar, without duplicates.
    pub fn params(&self) -> Vec<Name> {
        let mut acc = Vec::new();
        self.params_acc(&mut acc);
        acc
    }

    fn params_acc(&self, acc: &mut Vec<Name>) {
        match self {
            Self::Int(_) => (),
            Self::Param(p) => {
                if !acc.contains(p) {
                    acc.push(p.clone())
                }
            }
            Self::Neg(x) => x.params_acc(acc),
            Self::Add(x, y) | Self::Mul(x, y) => {
                x.params_acc(acc);
                y.params_acc(acc)
            }
        }
    }

    /// Replace parameters by scalars.
    ///
    /// Return `None` if no parameter was replaced.
    ///
    /// ~~~
    /// # use qncheck::Scalar;
    /// let x = Scalar::add(Scalar::Param("p".into()), Scalar::Param("q".into()));
    /// let y = x.replace(&|p: &str| (p == "p").then(|| Scalar::Int(2))).unwrap();
    /// assert_eq!(y.to_string(), "2 + q");
    /// assert_eq!(x.replace(&|_: &str| None), None);
    /// ~~~
    pub fn replace(&self, f: &impl Fn(&str) -> Option<Self>) -> Option<Self> {
        match self {
            Self::Int(_) => None,
            Self::Param(p) => f(p),
            Self::Neg(x) => Some(Self::Neg(Rc::new(x.replace(f)?))),
            Self::Add(x, y) => {
                let (x, y) = replace_pair(x, y, f)?;
                Some(Self::Add(x, y))
            }
            Self::Mul(x, y) => {
                let (x, y) = replace_pair(x, y, f)?;
                Some(Self::Mul(x, y))
            }
        }
    }

    /// Fold integer constants and eliminate neutral elements.
    ///
    /// Return `None` if the scalar is already reduced.
    /// The result of a reduction is always reduced.
    ///
    /// ~~~
    /// # use qncheck::Scalar;
    /// let p = || Scalar::Param("p".into());
    /// let x = Scalar::add(Scalar::mul(Scalar::Int(1), p()), Scalar::mul(Scalar::Int(2), Scalar::Int(0)));
    /// assert_eq!(x.reduce(), Some(p()));
    /// assert_eq!(p().reduce(), None);
    /// ~~~
    pub fn reduce(&self) -> Option<Self> {
        let reduced = self.simplify();
        (&reduced != self).then(|| reduced)
    }

    fn simplify(&self) -> Self {
        match self {
            Self::Int(_) | Self::Param(_) => self.clone(),
            Self::Neg(x) => match x.simplify() {
                Self::Int(i) => i.checked_neg().map_or_else(|| Self::neg(Self::Int(i)), Self::Int),
                Self::Neg(y) => (*y).clone(),
                x => Self::neg(x),
            },
            Self::Add(x, y) => match (x.simplify(), y.simplify()) {
                (Self::Int(0), z) | (z, Self::Int(0)) => z,
                (Self::Int(i), Self::Int(j)) => {
                    let sum = i.checked_add(j);
                    sum.map_or_else(|| Self::add(Self::Int(i), Self::Int(j)), Self::Int)
                }
                (x, y) => Self::add(x, y),
            },
            Self::Mul(x, y) => match (x.simplify(), y.simplify()) {
                (Self::Int(0), _) | (_, Self::Int(0)) => Self::Int(0),
                (Self::Int(1), z) | (z, Self::Int(1)) => z,
                (Self::Int(i), Self::Int(j)) => {
                    let product = i.checked_mul(j);
                    product.map_or_else(|| Self::mul(Self::Int(i), Self::Int(j)), Self::Int)
                }
                (x, y) => Self::mul(x, y),
            },
        }
    }

    /// Binding strength of the outermost operator.
    fn prec(&self) -> usize {
        match self {
            Self::Add(..) => 0,
            Self::Mul(..) => 1,
            Self::Neg(_) => 2,
            Self::Int(i) if *i < 0 => 2,
            Self::Int(_) | Self::Param(_) => 3,
        }
    }
}

fn replace_pair<F>(x: &Rc<Scalar>, y: &Rc<Scalar>, f: &F) -> Option<(Rc<Scalar>, Rc<Scalar>)>
where
    F: Fn(&str) -> Option<Scalar>,
{
    match (x.replace(f), y.replace(f)) {
        (None, None) => None,
        (x2, y2) => {
            let x = x2.map_or_else(|| x.clone(), Rc::new);
            let y = y2.map_or_else(|| y.clone(), Rc::new);
            Some((x, y))
        }
    }
}

impl TryFrom<&Expr<&str>> for Scalar {
    type Error = ParseIntError;

    fn try_from(expr: &Expr<&str>) -> Result<Self, Self::Error> {
        Ok(match expr {
            Expr::Int(i) => Self::Int(i.parse()?),
            Expr::Param(p) => Self::Param((*p).into()),
            Expr::Neg(x) => Self::neg(Self::try_from(&**x)?),
            Expr::Add(x, y) => Self::add(Self::try_from(&**x)?, Self::try_from(&**y)?),
            Expr::Mul(x, y) => Self::mul(Self::try_from(&**x)?, Self::try_from(&**y)?),
        })
    }
}

/// Display a subexpression, parenthesised if it binds weaker than `prec`.
struct Sub<'a>(&'a Scalar, usize);

impl<'a> Display for Sub<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.prec() < self.1 {
            write!(f, "({})", self.0)
        } else {
            self.0.fmt(f)
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(i) => i.fmt(f),
            Self::Param(p) => p.fmt(f),
            Self::Neg(x) => write!(f, "-{}", Sub(x, 2)),
            Self::Add(x, y) => write!(f, "{} + {}", Sub(x, 0), Sub(y, 1)),
            Self::Mul(x, y) => write!(f, "{} * {}", Sub(x, 1), Sub(y, 2)),
        }
    }
}

#[cfg(test)]
fn parse(s: &str) -> Scalar {
    let expr = qnorm_parse::parse_scalar(s).unwrap();
    Scalar::try_from(&expr).unwrap()
}

#[test]
fn reduce() {
    let reduced = |s| parse(s).reduce().map(|x| x.to_string());
    assert_eq!(reduced("1 + 2 * 3"), Some("7".into()));
    assert_eq!(reduced("-(1 + 2)"), Some("-3".into()));
    assert_eq!(reduced("-(-p)"), Some("p".into()));
    assert_eq!(reduced("(p + 0) * (q * 1)"), Some("p * q".into()));
    assert_eq!(reduced("0 * p + -(2 * -1) * q"), Some("2 * q".into()));
    let x = parse("p * -1").reduce().unwrap();
    assert_eq!(x.to_string(), "p * -1");
    assert_eq!(x.reduce(), None);
    assert_eq!(reduced("1 + p + 2"), None);

    // overflowing constants remain unfolded
    let big = Scalar::add(Scalar::Int(i64::MAX), Scalar::Int(1));
    assert_eq!(big.reduce(), None);
}

#[test]
fn params() {
    let x = parse("p * (q + p) + -r");
    let params: Vec<_> = x.params().iter().map(|p| p.to_string()).collect();
    assert_eq!(params, ["p", "q", "r"]);
    assert!(parse("1 + 2").params().is_empty());
}

#[test]
fn replace() {
    let x = parse("p * (q + 1)");
    let f = |p: &str| match p {
        "q" => Some(Scalar::Param("r".into())),
        _ => None,
    };
    let y = x.replace(&f).unwrap();
    assert_eq!(y, parse("p * (r + 1)"));
    // unchanged subexpressions are shared
    match (&x, &y) {
        (Scalar::Mul(p1, _), Scalar::Mul(p2, _)) => assert!(Rc::ptr_eq(p1, p2)),
        _ => panic!("product expected"),
    }
    assert_eq!(parse("1 + 2").replace(&f), None);
}

#[test]
fn overflow() {
    let expr = qnorm_parse::parse_scalar("99999999999999999999").unwrap();
    assert!(Scalar::try_from(&expr).is_err());
}
