/* Leaky slope. The derivative is constant 1 whenever the slope is
 * non-zero, regardless of the output sign. */
const ALPHA: f64 = 0.1;

pub(super) fn activations(triggers: &[f64]) -> Vec<f64> {
    triggers
        .iter()
        .map(|t| if *t <= 0.0 { ALPHA * t } else { *t })
        .collect()
}

pub(super) fn derivatives(outputs: &[f64]) -> Vec<f64> {
    let derivative = if ALPHA == 0.0 { 0.0 } else { 1.0 };
    vec![derivative; outputs.len()]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_relu() {
        let outputs = activations(&[-2.0, 0.0, 3.0]);
        assert_eq!(outputs, vec![-0.2, 0.0, 3.0]);
        assert_eq!(derivatives(&outputs), vec![1.0, 1.0, 1.0]);
    }
}
