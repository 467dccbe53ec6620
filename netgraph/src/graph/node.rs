use numerics::Matrix;
use rand::RngCore;
use rand_distr::{Distribution, Normal};
use uuid::Uuid;

use crate::af::Activation;

use super::{CellId, Edge, EdgeId};

/* Default hyperparameters of a weights node. */
const DEFAULT_ETA: f64 = 0.1;
const DEFAULT_ALPHA: f64 = 0.0;
const DEFAULT_LAMBDA: f64 = 0.0;

pub struct Node {
    uuid: Uuid,
    cell: CellId,
    input_edges: Vec<EdgeId>,
    output_edges: Vec<EdgeId>,
    kind: NodeKind,
}

pub enum NodeKind {
    Weights(WeightsState),
    Bias(BiasState),
    Activation(ActivationState),
}

/* Weighted sum with stochastic gradient descent adjustments on backward. */
pub struct WeightsState {
    input_size: usize,
    output_size: usize,
    weights: Matrix,
    gradients: Matrix,
    eta: f64,
    alpha: f64,
    lambda: f64,
}

/* Constant output vector, untouched by the backward pass. */
pub struct BiasState {
    output_values: Vec<f64>,
}

pub struct ActivationState {
    function: Activation,
}

impl WeightsState {
    pub(crate) fn random(input_size: usize, output_size: usize, rng: &mut dyn RngCore) -> Self {
        let normal = Normal::new(0.0, 1.0).expect("Should create the normal distribution");
        WeightsState {
            input_size,
            output_size,
            weights: Matrix::random(input_size, output_size, || normal.sample(rng)),
            gradients: Matrix::zeros(input_size, output_size),
            eta: DEFAULT_ETA,
            alpha: DEFAULT_ALPHA,
            lambda: DEFAULT_LAMBDA,
        }
    }

    pub(crate) fn restore(
        input_size: usize,
        output_size: usize,
        weights: Matrix,
        eta: f64,
        alpha: f64,
        lambda: f64,
    ) -> Self {
        assert_eq!(weights.rows(), input_size, "Restored weights rows do not match the input size");
        assert_eq!(weights.cols(), output_size, "Restored weights cols do not match the output size");
        WeightsState {
            input_size,
            output_size,
            weights,
            gradients: Matrix::zeros(input_size, output_size),
            eta,
            alpha,
            lambda,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut Matrix {
        &mut self.weights
    }

    pub fn learning_rate(&self) -> f64 {
        self.eta
    }

    pub fn set_learning_rate(&mut self, eta: f64) {
        self.eta = eta;
    }

    pub fn momentum(&self) -> f64 {
        self.alpha
    }

    pub fn set_momentum(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn decay(&self) -> f64 {
        self.lambda
    }

    pub fn set_decay(&mut self, lambda: f64) {
        self.lambda = lambda;
    }

    pub(crate) fn hyperparameters(&self) -> (f64, f64, f64) {
        (self.eta, self.alpha, self.lambda)
    }
}

impl BiasState {
    pub(crate) fn new(size: usize) -> Self {
        BiasState { output_values: vec![1.0; size] }
    }

    pub(crate) fn restore(output_values: Vec<f64>) -> Self {
        BiasState { output_values }
    }

    pub fn output_values(&self) -> &[f64] {
        &self.output_values
    }

    pub fn output_values_mut(&mut self) -> &mut [f64] {
        &mut self.output_values
    }
}

impl ActivationState {
    pub(crate) fn new(function: Activation) -> Self {
        ActivationState { function }
    }

    pub fn function(&self) -> Activation {
        self.function
    }
}

impl Node {
    pub(crate) fn new(cell: CellId, kind: NodeKind) -> Self {
        Node::with_uuid(Uuid::new_v4(), cell, kind)
    }

    pub(crate) fn with_uuid(uuid: Uuid, cell: CellId, kind: NodeKind) -> Self {
        Node {
            uuid,
            cell,
            input_edges: Vec::new(),
            output_edges: Vec::new(),
            kind,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn cell(&self) -> CellId {
        self.cell
    }

    pub fn input_edges(&self) -> &[EdgeId] {
        &self.input_edges
    }

    pub fn output_edges(&self) -> &[EdgeId] {
        &self.output_edges
    }

    pub(crate) fn add_input_edge(&mut self, edge: EdgeId) {
        self.input_edges.push(edge);
    }

    pub(crate) fn add_output_edge(&mut self, edge: EdgeId) {
        self.output_edges.push(edge);
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn as_weights(&self) -> Option<&WeightsState> {
        match &self.kind {
            NodeKind::Weights(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_weights_mut(&mut self) -> Option<&mut WeightsState> {
        match &mut self.kind {
            NodeKind::Weights(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_bias(&self) -> Option<&BiasState> {
        match &self.kind {
            NodeKind::Bias(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_bias_mut(&mut self) -> Option<&mut BiasState> {
        match &mut self.kind {
            NodeKind::Bias(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_activation(&self) -> Option<&ActivationState> {
        match &self.kind {
            NodeKind::Activation(state) => Some(state),
            _ => None,
        }
    }

    /* Read input edge heads, compute, push onto the output edges. */
    pub(crate) fn forward(&mut self, edges: &mut [Edge]) {
        match &mut self.kind {
            NodeKind::Weights(state) => {
                assert_eq!(self.input_edges.len(), 1, "Weights node should have exactly one input edge");
                assert_eq!(self.output_edges.len(), 1, "Weights node should have exactly one output edge");
                let input_edge = self.input_edges[0];
                let output_edge = self.output_edges[0];
                let input_values = edges[input_edge.0].forward_values();
                let mut output_values = vec![0.0; state.output_size];
                for out in 0..state.output_size {
                    for (inp, input) in input_values.iter().enumerate() {
                        output_values[out] += input * state.weights[(inp, out)];
                    }
                }
                edges[output_edge.0].push_forward(output_values);
            }
            NodeKind::Bias(state) => {
                for edge in &self.output_edges {
                    edges[edge.0].push_forward(state.output_values.clone());
                }
            }
            NodeKind::Activation(state) => {
                let output_edge = self.output_edges[0];
                let size = edges[output_edge.0].size();
                let mut triggers = vec![0.0; size];
                for edge in &self.input_edges {
                    let values = edges[edge.0].forward_values();
                    assert_eq!(values.len(), size, "Activation input edge size mismatch");
                    for (trigger, value) in triggers.iter_mut().zip(values.iter()) {
                        *trigger += value;
                    }
                }
                let outputs = state.function.activations(&triggers);
                for edge in &self.output_edges {
                    edges[edge.0].push_forward(outputs.clone());
                }
            }
        }
    }

    /* Read output edge deltas, adjust parameters, push deltas upstream. */
    pub(crate) fn backward(&mut self, edges: &mut [Edge]) {
        match &mut self.kind {
            NodeKind::Weights(state) => {
                assert_eq!(self.input_edges.len(), 1, "Weights node should have exactly one input edge");
                assert_eq!(self.output_edges.len(), 1, "Weights node should have exactly one output edge");
                let input_edge = self.input_edges[0];
                let output_edge = self.output_edges[0];
                let input_values = edges[input_edge.0].forward_values();
                let output_deltas = edges[output_edge.0].backward_deltas();
                let mut input_deltas = vec![0.0; state.input_size];
                for inp in 0..state.input_size {
                    let input = input_values[inp];
                    for out in 0..state.output_size {
                        let weight = state.weights[(inp, out)];
                        let delta = output_deltas[out];
                        let gradient =
                            (1.0 - state.alpha) * state.eta * delta * input + state.alpha * state.gradients[(inp, out)];
                        // The upstream delta uses the pre-update weight.
                        input_deltas[inp] += weight * delta;
                        state.gradients[(inp, out)] = gradient;
                        state.weights[(inp, out)] = (weight + gradient) * (1.0 - state.eta * state.lambda);
                    }
                }
                edges[input_edge.0].push_backward(input_deltas);
            }
            NodeKind::Bias(_) => {}
            NodeKind::Activation(state) => {
                let size = edges[self.output_edges[0].0].size();
                // Deltas accumulate over every output edge; the forward push
                // was the same vector on each of them.
                let mut output_deltas = vec![0.0; size];
                for edge in &self.output_edges {
                    let deltas = edges[edge.0].backward_deltas();
                    for (acc, delta) in output_deltas.iter_mut().zip(deltas.iter()) {
                        *acc += delta;
                    }
                }
                let outputs = edges[self.output_edges[0].0].forward_values();
                let derivatives = state.function.derivatives(&outputs);
                let input_deltas: Vec<f64> = output_deltas
                    .iter()
                    .zip(derivatives.iter())
                    .map(|(delta, derivative)| delta * derivative)
                    .collect();
                for edge in &self.input_edges {
                    edges[edge.0].push_backward(input_deltas.clone());
                }
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}
impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}
