use numerics::{mean, stddev};

mod matchers;
pub use matchers::{CategoryMatcher, Matcher};

mod distance;
pub use distance::{Distance, EuclideanDistance};

/* Streaming error statistics over a pass of expected/actual output pairs.
 * The absolute errors accumulate per output position; the average and the
 * deviation are recomputed after every contribution. */
pub struct Metrics {
    label: String,
    lengths: Vec<usize>,
    errors: Vec<Vec<f64>>,
    matcher: Box<dyn Matcher>,
    matches: usize,
    calls: f64,
    error_avg: f64,
    error_std: f64,
    performance: f64,
}

impl Metrics {
    pub fn new(label: &str, lengths: &[usize]) -> Self {
        assert!(!lengths.is_empty(), "Metrics require at least one output length");
        Metrics {
            label: label.to_owned(),
            lengths: lengths.to_vec(),
            errors: lengths.iter().map(|&len| vec![0.0; len]).collect(),
            matcher: Box::new(CategoryMatcher),
            matches: 0,
            calls: 0.0,
            error_avg: 0.0,
            error_std: 0.0,
            performance: 0.0,
        }
    }

    pub fn set_matcher(&mut self, matcher: Box<dyn Matcher>) {
        self.matcher = matcher;
    }

    pub fn compute(&mut self, expected: &[Vec<f64>], actual: &[Vec<f64>]) {
        let mut valid = expected.len() == self.lengths.len() && actual.len() == self.lengths.len();
        if valid {
            for (i, &length) in self.lengths.iter().enumerate() {
                valid &= expected[i].len() == length && actual[i].len() == length;
            }
        }
        assert!(valid, "Output shapes do not match the configured lengths");

        for (i, &length) in self.lengths.iter().enumerate() {
            for j in 0..length {
                self.errors[i][j] += (expected[i][j] - actual[i][j]).abs();
            }
        }

        if self.matcher.matches(expected, actual) {
            self.matches += 1;
        }

        self.calls += 1.0;
        let error: Vec<f64> = self
            .errors
            .iter()
            .flatten()
            .map(|accumulated| accumulated / self.calls)
            .collect();
        self.error_avg = mean(&error);
        self.error_std = stddev(&error, self.error_avg);
        self.performance = self.matches as f64 / self.calls;
    }

    pub fn reset(&mut self) {
        self.errors = self.lengths.iter().map(|&len| vec![0.0; len]).collect();
        self.matches = 0;
        self.calls = 0.0;
        self.error_avg = 0.0;
        self.error_std = 0.0;
        self.performance = 0.0;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn calls(&self) -> f64 {
        self.calls
    }

    pub fn error_avg(&self) -> f64 {
        self.error_avg
    }

    pub fn error_std(&self) -> f64 {
        self.error_std
    }

    /* Fraction of computed pairs the matcher accepted. */
    pub fn performance(&self) -> f64 {
        self.performance
    }

    pub fn accumulated_errors(&self) -> &[Vec<f64>] {
        &self.errors
    }
}

#[cfg(test)]
mod test {
    use super::Metrics;

    #[test]
    fn test_category_accumulation() {
        let mut metrics = Metrics::new("test", &[3, 3]);

        let expected = vec![vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 0.0]];
        let actual = vec![vec![0.1, 0.7, 0.2], vec![0.8, 0.1, 0.1]];
        metrics.compute(&expected, &actual);

        assert_eq!(metrics.matches(), 1);
        assert_eq!(metrics.calls(), 1.0);
        let errors = metrics.accumulated_errors();
        let expected_errors = [vec![0.1, 0.3, 0.2], vec![0.2, 0.1, 0.1]];
        for (row, expected_row) in errors.iter().zip(expected_errors.iter()) {
            for (e, x) in row.iter().zip(expected_row.iter()) {
                assert!((e - x).abs() < 1e-12);
            }
        }
        let flat_mean = (0.1 + 0.3 + 0.2 + 0.2 + 0.1 + 0.1) / 6.0;
        assert!((metrics.error_avg() - flat_mean).abs() < 1e-12);
        assert_eq!(metrics.performance(), 1.0);
    }

    #[test]
    fn test_mismatch_does_not_count() {
        let mut metrics = Metrics::new("test", &[2]);
        metrics.compute(&[vec![1.0, 0.0]], &[vec![0.2, 0.8]]);
        assert_eq!(metrics.matches(), 0);
        metrics.compute(&[vec![1.0, 0.0]], &[vec![0.9, 0.1]]);
        assert_eq!(metrics.matches(), 1);
        assert_eq!(metrics.performance(), 0.5);
    }

    #[test]
    fn test_reset() {
        let mut metrics = Metrics::new("test", &[1]);
        metrics.compute(&[vec![1.0]], &[vec![0.0]]);
        metrics.reset();
        assert_eq!(metrics.matches(), 0);
        assert_eq!(metrics.calls(), 0.0);
        assert_eq!(metrics.error_avg(), 0.0);
    }

    #[test]
    #[should_panic(expected = "Output shapes do not match")]
    fn test_shape_validation() {
        let mut metrics = Metrics::new("test", &[2]);
        metrics.compute(&[vec![1.0]], &[vec![0.0]]);
    }
}
