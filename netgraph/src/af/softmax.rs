use numerics::bound_exponent;

pub(super) fn activations(triggers: &[f64]) -> Vec<f64> {
    let mut outputs: Vec<f64> = triggers.iter().map(|t| bound_exponent(*t).exp()).collect();
    let div: f64 = outputs.iter().sum();
    if div != 0.0 {
        outputs.iter_mut().for_each(|out| *out /= div);
    }
    outputs
}

/* All ones: this catalog pairs SoftMax with a cross-entropy style delta
 * computed upstream, so the Jacobian is not applied here. */
pub(super) fn derivatives(outputs: &[f64]) -> Vec<f64> {
    vec![1.0; outputs.len()]
}
