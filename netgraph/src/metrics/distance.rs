/* Distance between two vectors of the same size. */
pub trait Distance: Send + Sync {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

pub struct EuclideanDistance;

impl Distance for EuclideanDistance {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        assert_eq!(a.len(), b.len(), "Vector sizes do not match");
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }
}

#[cfg(test)]
mod test {
    use super::{Distance, EuclideanDistance};

    #[test]
    fn test_euclidean() {
        let distance = EuclideanDistance;
        assert_eq!(distance.distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(distance.distance(&[1.0], &[1.0]), 0.0);
    }
}
