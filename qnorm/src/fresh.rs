//! Generation of fresh variable names.

use crate::term::Name;

/// Return a name derived from `base` for which `taken` is false.
///
/// The name is `base` with a numeric suffix `_n`, where
/// an existing suffix of `base` is replaced and
/// `n` is the smallest positive number yielding an untaken name.
/// The result is deterministic, which keeps rewriting reproducible.
///
/// ~~~
/// # use qnorm::fresh::fresh;
/// let taken = ["x", "x_1", "y_2"];
/// assert_eq!(&*fresh("x", |x| taken.contains(&x)), "x_2");
/// assert_eq!(&*fresh("x_1", |x| taken.contains(&x)), "x_2");
/// assert_eq!(&*fresh("y_2", |x| taken.contains(&x)), "y_1");
/// ~~~
pub fn fresh(base: &str, taken: impl Fn(&str) -> bool) -> Name {
    let stem = strip_suffix(base);
    (1usize..)
        .map(|n| format!("{}_{}", stem, n))
        .find(|x| !taken(x.as_str()))
        .map(Name::from)
        .unwrap_or_else(|| base.into())
}

fn strip_suffix(base: &str) -> &str {
    match base.rsplit_once('_') {
        Some((stem, n)) if !stem.is_empty() && !n.is_empty() => {
            if n.bytes().all(|b| b.is_ascii_digit()) {
                stem
            } else {
                base
            }
        }
        _ => base,
    }
}

#[test]
fn suffix() {
    assert_eq!(strip_suffix("x_12"), "x");
    assert_eq!(strip_suffix("x_y"), "x_y");
    assert_eq!(strip_suffix("_1"), "_1");
    assert_eq!(strip_suffix("x_"), "x_");
}
