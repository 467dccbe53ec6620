use numerics::Matrix;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::af::Activation;

use super::{ActivationState, BiasState, Cell, Edge, Network, Node, NodeKind, WeightsState};

/* Structural snapshot of a network: the cells with their nodes, and the
 * edges that wire them. Restoring rebuilds the same topology and weights;
 * gradient memory starts over from zero. */
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NetworkDef {
    pub cells: Vec<CellDef>,
    pub edges: Vec<EdgeDef>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CellDef {
    pub uuid: Uuid,
    pub name: String,
    pub nodes: Vec<NodeDef>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "name")]
pub enum NodeDef {
    WeightsNode {
        uuid: Uuid,
        #[serde(rename = "input-size")]
        input_size: usize,
        #[serde(rename = "output-size")]
        output_size: usize,
        eta: f64,
        alpha: f64,
        lambda: f64,
        weights: Vec<Vec<f64>>,
    },
    BiasNode {
        uuid: Uuid,
        #[serde(rename = "output-values")]
        output_values: Vec<f64>,
    },
    ActivationNode {
        uuid: Uuid,
        activation: String,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EdgeDef {
    pub uuid: Uuid,
    pub size: usize,
    #[serde(rename = "input-node", default, skip_serializing_if = "Option::is_none")]
    pub input_node: Option<Uuid>,
    #[serde(rename = "output-node", default, skip_serializing_if = "Option::is_none")]
    pub output_node: Option<Uuid>,
}

impl Network {
    pub fn snapshot(&self) -> NetworkDef {
        let cells = self
            .cells()
            .map(|cell| CellDef {
                uuid: cell.uuid(),
                name: cell.name().to_owned(),
                nodes: cell.nodes().iter().map(|&id| node_def(self.node(id))).collect(),
            })
            .collect();
        let edges = self
            .all_edges()
            .iter()
            .map(|edge| EdgeDef {
                uuid: edge.uuid(),
                size: edge.size(),
                input_node: edge.input_node().map(|id| self.node(id).uuid()),
                output_node: edge.output_node().map(|id| self.node(id).uuid()),
            })
            .collect();
        NetworkDef { cells, edges }
    }

    /* Rebuild a network from its snapshot and initialize it. An unknown
     * activation name is a hard failure; an edge referencing an unknown
     * node is dropped with a warning. */
    pub fn restore(def: &NetworkDef) -> Network {
        let mut network = Network::new();

        for cell_def in &def.cells {
            let cell = network.insert_cell(Cell::with_uuid(cell_def.uuid, &cell_def.name));
            for node_def in &cell_def.nodes {
                network.insert_node(restore_node(cell, node_def));
            }
        }

        for edge_def in &def.edges {
            let input_node = edge_def.input_node.and_then(|uuid| network.find_node(uuid));
            let output_node = edge_def.output_node.and_then(|uuid| network.find_node(uuid));
            if input_node.is_none() && output_node.is_none() {
                warn!("dropping edge {}: no resolvable endpoint", edge_def.uuid);
                continue;
            }
            network.insert_edge(Edge::with_uuid(edge_def.uuid, edge_def.size, input_node, output_node));
        }

        network.initialize();
        network
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.snapshot()).expect("Should serialize the network definition")
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Network> {
        let def: NetworkDef = serde_json::from_str(json)?;
        Ok(Network::restore(&def))
    }
}

fn node_def(node: &Node) -> NodeDef {
    match node.kind() {
        NodeKind::Weights(state) => {
            let (eta, alpha, lambda) = state.hyperparameters();
            NodeDef::WeightsNode {
                uuid: node.uuid(),
                input_size: state.input_size(),
                output_size: state.output_size(),
                eta,
                alpha,
                lambda,
                weights: state.weights().to_rows(),
            }
        }
        NodeKind::Bias(state) => NodeDef::BiasNode {
            uuid: node.uuid(),
            output_values: state.output_values().to_vec(),
        },
        NodeKind::Activation(state) => NodeDef::ActivationNode {
            uuid: node.uuid(),
            activation: state.function().name().to_owned(),
        },
    }
}

fn restore_node(cell: super::CellId, def: &NodeDef) -> Node {
    match def {
        NodeDef::WeightsNode {
            uuid,
            input_size,
            output_size,
            eta,
            alpha,
            lambda,
            weights,
        } => {
            let weights = Matrix::from_rows(weights).expect("Should restore a rectangular weights matrix");
            let state = WeightsState::restore(*input_size, *output_size, weights, *eta, *alpha, *lambda);
            Node::with_uuid(*uuid, cell, NodeKind::Weights(state))
        }
        NodeDef::BiasNode { uuid, output_values } => {
            Node::with_uuid(*uuid, cell, NodeKind::Bias(BiasState::restore(output_values.clone())))
        }
        NodeDef::ActivationNode { uuid, activation } => Node::with_uuid(
            *uuid,
            cell,
            NodeKind::Activation(ActivationState::new(Activation::from_name(activation))),
        ),
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::af::Activation;
    use crate::graph::{CellFactory, Network};

    #[test]
    fn test_round_trip_forward_identical() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut network = Network::new();
        CellFactory::rnn(&mut network, &mut rng, 3, 4, Activation::Sigmoid, true, true);
        network.initialize();

        let json = network.to_json_string();
        let mut restored = Network::from_json_str(&json).expect("Should restore the network");

        let input = vec![vec![0.25, -0.5, 1.5]];
        network.forward(&input);
        restored.forward(&input);
        assert_eq!(network.output_values(), restored.output_values());
    }

    #[test]
    fn test_snapshot_preserves_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut network = Network::new();
        let cell = CellFactory::dense(&mut network, &mut rng, 2, 2, Activation::Tanh);
        network.initialize();

        let restored = Network::restore(&network.snapshot());
        assert_eq!(network.cell(cell).uuid(), restored.cells().next().unwrap().uuid());
        assert_eq!(network.all_nodes().len(), restored.all_nodes().len());
        assert_eq!(network.all_edges().len(), restored.all_edges().len());
        for (a, b) in network.all_edges().iter().zip(restored.all_edges().iter()) {
            assert_eq!(a.uuid(), b.uuid());
            assert_eq!(a.size(), b.size());
        }
    }

    #[test]
    fn test_unknown_node_kind_fails() {
        let json = r#"{"cells":[{"uuid":"00000000-0000-0000-0000-000000000001","name":"C",
            "nodes":[{"uuid":"00000000-0000-0000-0000-000000000002","name":"GhostNode"}]}],"edges":[]}"#;
        assert!(Network::from_json_str(json).is_err());
    }

    #[test]
    #[should_panic(expected = "Invalid activation name")]
    fn test_unknown_activation_fails() {
        let json = r#"{"cells":[{"uuid":"00000000-0000-0000-0000-000000000001","name":"C",
            "nodes":[{"uuid":"00000000-0000-0000-0000-000000000002","name":"ActivationNode",
                      "activation":"Bogus"}]}],"edges":[]}"#;
        let _ = Network::from_json_str(json);
    }
}
