pub(super) fn activations(triggers: &[f64]) -> Vec<f64> {
    triggers
        .iter()
        .map(|t| {
            let epos = t.exp();
            let eneg = (-t).exp();
            (epos - eneg) / (epos + eneg)
        })
        .collect()
}

pub(super) fn derivatives(outputs: &[f64]) -> Vec<f64> {
    outputs.iter().map(|out| (1.0 + out) * (1.0 - out)).collect()
}
