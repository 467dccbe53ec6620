use std::collections::HashSet;

use rand::RngCore;
use uuid::Uuid;

use crate::af::Activation;

use super::{ActivationState, BiasState, Cell, CellId, Edge, EdgeId, Node, NodeId, NodeKind, WeightsState};

/* A computational graph of wired cells. Values are pushed to the input edges
 * and a call to forward() propagates them layer by layer to the output
 * edges; deltas are pushed to the output edges and backward() walks the
 * layers in reverse, letting the nodes adjust their parameters. The forward
 * layer order is derived from the wiring alone by initialize(). */
#[derive(Default)]
pub struct Network {
    cells: Vec<Cell>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    schedule: Option<Schedule>,
}

/* Frozen after initialize(): the execution order and the edge bookkeeping. */
struct Schedule {
    input_edges: Vec<EdgeId>,
    output_edges: Vec<EdgeId>,
    layers: Vec<Vec<NodeId>>,
    edges: Vec<EdgeId>,
}

impl Network {
    pub fn new() -> Self {
        Network::default()
    }

    pub fn add_cell(&mut self, name: &str) -> CellId {
        self.insert_cell(Cell::new(name))
    }

    pub(crate) fn insert_cell(&mut self, cell: Cell) -> CellId {
        let id = CellId(self.cells.len());
        self.cells.push(cell);
        id
    }

    pub fn add_weights_node(
        &mut self,
        cell: CellId,
        input_size: usize,
        output_size: usize,
        rng: &mut dyn RngCore,
    ) -> NodeId {
        self.insert_node(Node::new(cell, NodeKind::Weights(WeightsState::random(input_size, output_size, rng))))
    }

    pub fn add_bias_node(&mut self, cell: CellId, size: usize) -> NodeId {
        self.insert_node(Node::new(cell, NodeKind::Bias(BiasState::new(size))))
    }

    pub fn add_activation_node(&mut self, cell: CellId, function: Activation) -> NodeId {
        self.insert_node(Node::new(cell, NodeKind::Activation(ActivationState::new(function))))
    }

    pub(crate) fn insert_node(&mut self, node: Node) -> NodeId {
        let cell = node.cell();
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.cells[cell.0].add_node(id);
        id
    }

    /* Wire two nodes with an edge of the given size. A missing input node
     * makes the edge a network input, a missing output node a network
     * output. */
    pub fn connect(&mut self, size: usize, input_node: Option<NodeId>, output_node: Option<NodeId>) -> EdgeId {
        self.insert_edge(Edge::new(size, input_node, output_node))
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) -> EdgeId {
        assert!(
            edge.input_node().is_some() || edge.output_node().is_some(),
            "Edge should be connected to at least one node"
        );
        let id = EdgeId(self.edges.len());
        if let Some(node) = edge.input_node() {
            self.nodes[node.0].add_output_edge(id);
        }
        if let Some(node) = edge.output_node() {
            self.nodes[node.0].add_input_edge(id);
        }
        self.edges.push(edge);
        id
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.0]
    }

    /* Edges entering the cell from outside: no input node, or an input node
     * owned by another cell. */
    pub fn cell_input_edges(&self, cell: CellId) -> Vec<EdgeId> {
        let mut result = Vec::new();
        for &node in self.cells[cell.0].nodes() {
            for &edge in self.nodes[node.0].input_edges() {
                match self.edges[edge.0].input_node() {
                    None => result.push(edge),
                    Some(input) if self.nodes[input.0].cell() != cell => result.push(edge),
                    Some(_) => {}
                }
            }
        }
        result
    }

    /* Mirror view: edges leaving the cell. */
    pub fn cell_output_edges(&self, cell: CellId) -> Vec<EdgeId> {
        let mut result = Vec::new();
        for &node in self.cells[cell.0].nodes() {
            for &edge in self.nodes[node.0].output_edges() {
                match self.edges[edge.0].output_node() {
                    None => result.push(edge),
                    Some(output) if self.nodes[output.0].cell() != cell => result.push(edge),
                    Some(_) => {}
                }
            }
        }
        result
    }

    /* Derive the execution schedule from the wiring. Must be called once,
     * after all the cells and wires are in place and before the first
     * forward() or backward().
     *
     * Layers are built breadth-first from the network input edges; nodes
     * without input edges (biases) join the first layer. A node is visited
     * at most once, so a recurrent wire behaves as a back-edge whose
     * contribution arrives through its queue head on the next step. */
    pub fn initialize(&mut self) {
        if self.schedule.is_some() {
            panic!("Network already initialized");
        }

        /* Input and output edges, in wiring order. */
        let mut input_edges = Vec::new();
        let mut output_edges = Vec::new();
        for cell in &self.cells {
            for &node in cell.nodes() {
                for &edge in self.nodes[node.0].input_edges() {
                    if self.edges[edge.0].is_input() {
                        input_edges.push(edge);
                    }
                }
                for &edge in self.nodes[node.0].output_edges() {
                    if self.edges[edge.0].is_output() {
                        output_edges.push(edge);
                    }
                }
            }
        }

        /* Layers. */
        let mut layers: Vec<Vec<NodeId>> = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut scan_edges: Vec<EdgeId> = input_edges.clone();

        /* Nodes with no input edges at all have nothing to wait for; they
         * seed the first layer next to the input-fed nodes. */
        let mut sources: Vec<NodeId> = Vec::new();
        for cell in &self.cells {
            for &node in cell.nodes() {
                if self.nodes[node.0].input_edges().is_empty() {
                    sources.push(node);
                }
            }
        }

        loop {
            let mut layer: Vec<NodeId> = Vec::new();
            for node in sources.drain(..) {
                if visited.insert(node) {
                    layer.push(node);
                }
            }
            for &edge in &scan_edges {
                if let Some(node) = self.edges[edge.0].output_node() {
                    if visited.insert(node) {
                        layer.push(node);
                    }
                }
            }
            if layer.is_empty() {
                break;
            }
            scan_edges.clear();
            for &node in &layer {
                scan_edges.extend_from_slice(self.nodes[node.0].output_edges());
            }
            layers.push(layer);
        }

        /* Every edge incident to a scheduled node, for unfold bookkeeping. */
        let mut edges = Vec::new();
        let mut seen: HashSet<EdgeId> = HashSet::new();
        for layer in &layers {
            for &node in layer {
                for &edge in self.nodes[node.0].input_edges() {
                    if seen.insert(edge) {
                        edges.push(edge);
                    }
                }
                for &edge in self.nodes[node.0].output_edges() {
                    if seen.insert(edge) {
                        edges.push(edge);
                    }
                }
            }
        }

        info!(
            "network initialized: {} cells, {} nodes, {} layers, {} inputs, {} outputs",
            self.cells.len(),
            self.nodes.len(),
            layers.len(),
            input_edges.len(),
            output_edges.len()
        );

        self.schedule = Some(Schedule {
            input_edges,
            output_edges,
            layers,
            edges,
        });
    }

    fn schedule(&self) -> &Schedule {
        self.schedule.as_ref().expect("Network not initialized")
    }

    pub fn input_edges(&self) -> &[EdgeId] {
        &self.schedule().input_edges
    }

    pub fn output_edges(&self) -> &[EdgeId] {
        &self.schedule().output_edges
    }

    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.schedule().layers
    }

    /* Push one value vector per input edge and walk the layers forward. */
    pub fn forward(&mut self, input_values: &[Vec<f64>]) {
        let Network { nodes, edges, schedule, .. } = self;
        let schedule = schedule.as_ref().expect("Network not initialized");
        assert_eq!(input_values.len(), schedule.input_edges.len(), "Input sizes do not match");

        for (edge, values) in schedule.input_edges.iter().zip(input_values.iter()) {
            edges[edge.0].push_forward(values.clone());
        }
        for layer in &schedule.layers {
            for &node in layer {
                nodes[node.0].forward(edges);
            }
        }
    }

    /* Push one delta vector per output edge, walk the layers in reverse,
     * then unfold every edge once. */
    pub fn backward(&mut self, output_deltas: &[Vec<f64>]) {
        let Network { nodes, edges, schedule, .. } = self;
        let schedule = schedule.as_ref().expect("Network not initialized");
        assert_eq!(output_deltas.len(), schedule.output_edges.len(), "Output sizes do not match");

        for (edge, deltas) in schedule.output_edges.iter().zip(output_deltas.iter()) {
            edges[edge.0].push_backward(deltas.clone());
        }
        for layer in schedule.layers.iter().rev() {
            for &node in layer {
                nodes[node.0].backward(edges);
            }
        }
        for &edge in &schedule.edges {
            edges[edge.0].unfold();
        }
    }

    /* Advance the temporal window of every scheduled edge by one step. */
    pub fn unfold(&mut self) {
        let Network { edges, schedule, .. } = self;
        let schedule = schedule.as_ref().expect("Network not initialized");
        for &edge in &schedule.edges {
            edges[edge.0].unfold();
        }
    }

    /* Current head of every output edge, in output edge order. */
    pub fn output_values(&self) -> Vec<Vec<f64>> {
        self.schedule()
            .output_edges
            .iter()
            .map(|edge| self.edges[edge.0].forward_values())
            .collect()
    }

    pub(crate) fn all_edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) fn all_nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn find_node(&self, uuid: Uuid) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.uuid() == uuid).map(NodeId)
    }
}
