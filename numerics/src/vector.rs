/* Largest exponent fed to exp(); exp(700) is still finite in f64. */
const MAX_EXPONENT: f64 = 700.0;

pub fn subtract(a: &[f64], b: &[f64]) -> Vec<f64> {
    assert_eq!(a.len(), b.len(), "Vector sizes do not match");
    a.iter().zip(b.iter()).map(|(x, y)| x - y).collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/* First occurrence wins on ties. */
pub fn arg_max(values: &[f64]) -> Option<usize> {
    let mut index = None;
    let mut max = f64::NEG_INFINITY;
    for (i, v) in values.iter().enumerate() {
        if *v > max {
            max = *v;
            index = Some(i);
        }
    }
    index
}

pub fn bound_exponent(x: f64) -> f64 {
    x.clamp(-MAX_EXPONENT, MAX_EXPONENT)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_subtract() {
        assert_eq!(subtract(&[1.0, 2.0], &[0.5, 3.0]), vec![0.5, -1.0]);
    }

    #[test]
    #[should_panic]
    fn test_subtract_size_mismatch() {
        let _ = subtract(&[1.0], &[1.0, 2.0]);
    }

    #[test]
    fn test_mean_stddev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        assert_eq!(stddev(&values, m), 2.0);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(stddev(&[], 0.0), 0.0);
    }

    #[test]
    fn test_arg_max() {
        assert_eq!(arg_max(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(arg_max(&[0.5, 0.5, 0.1]), Some(0));
        assert_eq!(arg_max(&[]), None);
    }

    #[test]
    fn test_bound_exponent() {
        assert_eq!(bound_exponent(1000.0), 700.0);
        assert_eq!(bound_exponent(-1000.0), -700.0);
        assert_eq!(bound_exponent(3.5), 3.5);
        assert!(bound_exponent(1000.0).exp().is_finite());
    }
}
