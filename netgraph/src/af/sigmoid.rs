/* Steepness of the bipolar sigmoid. */
const SIGMA: f64 = 1.0;

pub(super) fn activations(triggers: &[f64]) -> Vec<f64> {
    triggers.iter().map(|t| 1.0 / (1.0 + (-t).exp())).collect()
}

pub(super) fn derivatives(outputs: &[f64]) -> Vec<f64> {
    outputs.iter().map(|out| out * (1.0 - out)).collect()
}

pub(super) fn bipolar_activations(triggers: &[f64]) -> Vec<f64> {
    triggers
        .iter()
        .map(|t| {
            let exp = (-(SIGMA * t)).exp();
            (1.0 - exp) / (1.0 + exp)
        })
        .collect()
}

pub(super) fn bipolar_derivatives(outputs: &[f64]) -> Vec<f64> {
    let sig = SIGMA / 2.0;
    outputs.iter().map(|out| sig * (1.0 + out) * (1.0 - out)).collect()
}
