use rand::RngCore;

use crate::af::Activation;

use super::{CellId, Network};

/* Builds the canonical cell shapes on a network, from a plain dense cell up
 * to a recurrent cell with bias. */
pub struct CellFactory;

impl CellFactory {
    /* Generic cell: weights node fed by a fresh network input edge, an
     * activation node driving a fresh network output edge, optionally a
     * bias node and a recurrent weights loop around the activation. */
    pub fn rnn(
        network: &mut Network,
        rng: &mut dyn RngCore,
        input_size: usize,
        output_size: usize,
        activation: Activation,
        recurrent: bool,
        bias: bool,
    ) -> CellId {
        let mut name = format!("RNN-{}-{}-{}", input_size, output_size, activation.name());
        if recurrent {
            name.push_str("-REC");
        }
        if bias {
            name.push_str("-BIAS");
        }
        let cell = network.add_cell(&name);

        let weights_node = network.add_weights_node(cell, input_size, output_size, rng);
        network.connect(input_size, None, Some(weights_node));

        let activation_node = network.add_activation_node(cell, activation);
        network.connect(output_size, Some(weights_node), Some(activation_node));

        if bias {
            let bias_node = network.add_bias_node(cell, output_size);
            network.connect(output_size, Some(bias_node), Some(activation_node));
        }

        if recurrent {
            let recurrent_node = network.add_weights_node(cell, output_size, output_size, rng);
            network.connect(output_size, Some(activation_node), Some(recurrent_node));
            network.connect(output_size, Some(recurrent_node), Some(activation_node));
        }

        network.connect(output_size, Some(activation_node), None);

        cell
    }

    pub fn dense(
        network: &mut Network,
        rng: &mut dyn RngCore,
        input_size: usize,
        output_size: usize,
        activation: Activation,
    ) -> CellId {
        CellFactory::rnn(network, rng, input_size, output_size, activation, false, false)
    }

    pub fn biased(
        network: &mut Network,
        rng: &mut dyn RngCore,
        input_size: usize,
        output_size: usize,
        activation: Activation,
    ) -> CellId {
        CellFactory::rnn(network, rng, input_size, output_size, activation, false, true)
    }
}
