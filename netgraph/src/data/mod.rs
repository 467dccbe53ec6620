use rand::seq::SliceRandom;
use rand::RngCore;

/* One labeled training example: an input vector per network input edge and
 * an expected output vector per network output edge. */
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    label: Option<String>,
    input_values: Vec<Vec<f64>>,
    output_values: Vec<Vec<f64>>,
}

impl Pattern {
    pub fn new(input_values: Vec<Vec<f64>>, output_values: Vec<Vec<f64>>) -> Self {
        Pattern {
            label: None,
            input_values,
            output_values,
        }
    }

    pub fn with_label(label: &str, input_values: Vec<Vec<f64>>, output_values: Vec<Vec<f64>>) -> Self {
        Pattern {
            label: Some(label.to_owned()),
            input_values,
            output_values,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn input_values(&self) -> &[Vec<f64>] {
        &self.input_values
    }

    pub fn output_values(&self) -> &[Vec<f64>] {
        &self.output_values
    }
}

pub trait PatternSource {
    /* Rewind to the first pattern. */
    fn reset(&mut self);
    fn has_next(&self) -> bool;
    fn next(&mut self) -> Option<Pattern>;
    fn size(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/* A pattern source backed by a vector. */
#[derive(Default)]
pub struct ListPatternSource {
    patterns: Vec<Pattern>,
    cursor: usize,
}

impl ListPatternSource {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        ListPatternSource { patterns, cursor: 0 }
    }

    pub fn add(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }
}

impl PatternSource for ListPatternSource {
    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn has_next(&self) -> bool {
        self.cursor < self.patterns.len()
    }

    fn next(&mut self) -> Option<Pattern> {
        let pattern = self.patterns.get(self.cursor).cloned();
        if pattern.is_some() {
            self.cursor += 1;
        }
        pattern
    }

    fn size(&self) -> usize {
        self.patterns.len()
    }
}

/* A pattern source that reshuffles its patterns on every reset, so each
 * epoch visits them in a fresh order. */
pub struct ShuffledPatternSource {
    patterns: Vec<Pattern>,
    cursor: usize,
    rng: Box<dyn RngCore>,
}

impl ShuffledPatternSource {
    pub fn new(patterns: Vec<Pattern>, rng: Box<dyn RngCore>) -> Self {
        ShuffledPatternSource {
            patterns,
            cursor: 0,
            rng,
        }
    }
}

impl PatternSource for ShuffledPatternSource {
    fn reset(&mut self) {
        self.patterns.shuffle(&mut self.rng);
        self.cursor = 0;
    }

    fn has_next(&self) -> bool {
        self.cursor < self.patterns.len()
    }

    fn next(&mut self) -> Option<Pattern> {
        let pattern = self.patterns.get(self.cursor).cloned();
        if pattern.is_some() {
            self.cursor += 1;
        }
        pattern
    }

    fn size(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_list_source() {
        let mut source = ListPatternSource::default();
        assert!(source.is_empty());
        source.add(Pattern::new(vec![vec![0.0]], vec![vec![1.0]]));
        source.add(Pattern::with_label("second", vec![vec![1.0]], vec![vec![0.0]]));
        assert_eq!(source.size(), 2);

        source.reset();
        let mut seen = 0;
        while source.has_next() {
            let pattern = source.next().expect("Source should have a next pattern");
            assert_eq!(pattern.input_values().len(), 1);
            seen += 1;
        }
        assert_eq!(seen, 2);
        assert!(source.next().is_none());

        source.reset();
        let first = source.next().expect("Source should rewind");
        assert_eq!(first.label(), None);
    }

    #[test]
    fn test_shuffled_source_keeps_every_pattern() {
        let patterns: Vec<Pattern> = (0..16)
            .map(|i| Pattern::new(vec![vec![i as f64]], vec![vec![0.0]]))
            .collect();
        let rng = ChaCha8Rng::seed_from_u64(21);
        let mut source = ShuffledPatternSource::new(patterns, Box::new(rng));
        assert_eq!(source.size(), 16);

        let drain = |source: &mut ShuffledPatternSource| -> Vec<f64> {
            source.reset();
            let mut values = Vec::new();
            while source.has_next() {
                let pattern = source.next().expect("Source should have a next pattern");
                values.push(pattern.input_values()[0][0]);
            }
            values
        };

        let first_pass = drain(&mut source);
        let second_pass = drain(&mut source);
        assert_eq!(first_pass.len(), 16);
        assert_eq!(second_pass.len(), 16);

        let mut sorted_first = first_pass.clone();
        sorted_first.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut sorted_second = second_pass.clone();
        sorted_second.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let all: Vec<f64> = (0..16).map(|i| i as f64).collect();
        assert_eq!(sorted_first, all);
        assert_eq!(sorted_second, all);
        /* 16 elements and a seeded generator: the two orders differ. */
        assert_ne!(first_pass, second_pass);
    }
}
