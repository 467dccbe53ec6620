use std::collections::VecDeque;

use uuid::Uuid;

use super::NodeId;

/* A conduit between two nodes. Values travel head-first through the forward
 * queue, deltas through the backward queue. An edge without an input node is
 * a network input, without an output node a network output, with both a
 * transfer edge. Reading the head of an empty queue yields zeros, which is
 * what makes a recurrent back-edge safe on the first forward step. */
pub struct Edge {
    uuid: Uuid,
    size: usize,
    input_node: Option<NodeId>,
    output_node: Option<NodeId>,
    forward_queue: VecDeque<Vec<f64>>,
    backward_queue: VecDeque<Vec<f64>>,
}

impl Edge {
    pub(crate) fn new(size: usize, input_node: Option<NodeId>, output_node: Option<NodeId>) -> Self {
        Edge::with_uuid(Uuid::new_v4(), size, input_node, output_node)
    }

    pub(crate) fn with_uuid(
        uuid: Uuid,
        size: usize,
        input_node: Option<NodeId>,
        output_node: Option<NodeId>,
    ) -> Self {
        if size == 0 {
            panic!("[Edge] Cannot create an edge of size zero");
        }
        Edge {
            uuid,
            size,
            input_node,
            output_node,
            forward_queue: VecDeque::new(),
            backward_queue: VecDeque::new(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn input_node(&self) -> Option<NodeId> {
        self.input_node
    }

    pub fn output_node(&self) -> Option<NodeId> {
        self.output_node
    }

    pub fn is_input(&self) -> bool {
        self.input_node.is_none()
    }

    pub fn is_output(&self) -> bool {
        self.output_node.is_none()
    }

    pub fn is_transfer(&self) -> bool {
        self.input_node.is_some() && self.output_node.is_some()
    }

    pub fn push_forward(&mut self, values: Vec<f64>) {
        assert_eq!(values.len(), self.size, "Invalid forward values size");
        self.forward_queue.push_front(values);
    }

    pub fn push_backward(&mut self, deltas: Vec<f64>) {
        assert_eq!(deltas.len(), self.size, "Invalid backward deltas size");
        self.backward_queue.push_front(deltas);
    }

    /* Head of the forward queue, zeros when empty. Non-destructive. */
    pub fn forward_values(&self) -> Vec<f64> {
        match self.forward_queue.front() {
            Some(values) => values.clone(),
            None => vec![0.0; self.size],
        }
    }

    pub fn backward_deltas(&self) -> Vec<f64> {
        match self.backward_queue.front() {
            Some(deltas) => deltas.clone(),
            None => vec![0.0; self.size],
        }
    }

    pub fn forward_queue_len(&self) -> usize {
        self.forward_queue.len()
    }

    pub fn backward_queue_len(&self) -> usize {
        self.backward_queue.len()
    }

    /* Drop the head of both queues, advancing the temporal window one step. */
    pub fn unfold(&mut self) {
        self.forward_queue.pop_front();
        self.backward_queue.pop_front();
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}
impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}
