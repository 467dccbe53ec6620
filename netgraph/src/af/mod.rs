mod relu;
mod sigmoid;
mod softmax;
mod tanh;

/* The closed catalog of elementwise activation functions. Derivatives are
 * expressed over the already-computed outputs, which is what the backward
 * pass has at hand. */
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Activation {
    Sigmoid,
    Tanh,
    BipolarSigmoid,
    ReLU,
    SoftMax,
}

impl Activation {
    pub fn activations(&self, triggers: &[f64]) -> Vec<f64> {
        match self {
            Activation::Sigmoid => sigmoid::activations(triggers),
            Activation::Tanh => tanh::activations(triggers),
            Activation::BipolarSigmoid => sigmoid::bipolar_activations(triggers),
            Activation::ReLU => relu::activations(triggers),
            Activation::SoftMax => softmax::activations(triggers),
        }
    }

    pub fn derivatives(&self, outputs: &[f64]) -> Vec<f64> {
        match self {
            Activation::Sigmoid => sigmoid::derivatives(outputs),
            Activation::Tanh => tanh::derivatives(outputs),
            Activation::BipolarSigmoid => sigmoid::bipolar_derivatives(outputs),
            Activation::ReLU => relu::derivatives(outputs),
            Activation::SoftMax => softmax::derivatives(outputs),
        }
    }

    /* Stable names, also the tags used by the persisted snapshot. */
    pub fn name(&self) -> &'static str {
        match self {
            Activation::Sigmoid => "Sigmoid",
            Activation::Tanh => "TANH",
            Activation::BipolarSigmoid => "BipolarSigmoid",
            Activation::ReLU => "ReLU",
            Activation::SoftMax => "SoftMax",
        }
    }

    pub fn from_name(name: &str) -> Activation {
        match name {
            "Sigmoid" => Activation::Sigmoid,
            "TANH" => Activation::Tanh,
            "BipolarSigmoid" => Activation::BipolarSigmoid,
            "ReLU" => Activation::ReLU,
            "SoftMax" => Activation::SoftMax,
            _ => panic!("Invalid activation name: {}", name),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Activation;

    const ALL: [Activation; 5] = [
        Activation::Sigmoid,
        Activation::Tanh,
        Activation::BipolarSigmoid,
        Activation::ReLU,
        Activation::SoftMax,
    ];

    #[test]
    fn test_name_round_trip() {
        for activation in ALL {
            assert_eq!(Activation::from_name(activation.name()), activation);
        }
    }

    #[test]
    #[should_panic(expected = "Invalid activation name")]
    fn test_unknown_name() {
        let _ = Activation::from_name("Linear");
    }

    /* Closed-form values of derivatives(activations(0)). */
    #[test]
    fn test_derivative_at_zero() {
        let at_zero = |activation: Activation| {
            let outputs = activation.activations(&[0.0]);
            activation.derivatives(&outputs)[0]
        };
        assert_eq!(at_zero(Activation::Sigmoid), 0.25);
        assert_eq!(at_zero(Activation::Tanh), 1.0);
        assert_eq!(at_zero(Activation::BipolarSigmoid), 0.5);
    }
}
