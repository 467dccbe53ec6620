use numerics::arg_max;

/* Domain predicate deciding whether an actual output is close enough to the
 * expected one to count as a match. */
pub trait Matcher: Send + Sync {
    fn matches(&self, expected: &[Vec<f64>], actual: &[Vec<f64>]) -> bool;
}

/* Matches when the arg-max index of every expected vector equals the
 * arg-max of the corresponding actual vector. Ties break on the first
 * occurrence. Intended for one-hot category outputs. */
pub struct CategoryMatcher;

impl Matcher for CategoryMatcher {
    fn matches(&self, expected: &[Vec<f64>], actual: &[Vec<f64>]) -> bool {
        expected
            .iter()
            .zip(actual.iter())
            .all(|(e, a)| arg_max(e) == arg_max(a))
    }
}
