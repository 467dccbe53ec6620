use uuid::Uuid;

use super::NodeId;

/* A named group of nodes forming one sub-network. Purely an organizational
 * unit, never a graph node itself. */
pub struct Cell {
    uuid: Uuid,
    name: String,
    nodes: Vec<NodeId>,
}

impl Cell {
    pub(crate) fn new(name: &str) -> Self {
        Cell::with_uuid(Uuid::new_v4(), name)
    }

    pub(crate) fn with_uuid(uuid: Uuid, name: &str) -> Self {
        Cell {
            uuid,
            name: name.to_owned(),
            nodes: Vec::new(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub(crate) fn add_node(&mut self, node: NodeId) {
        self.nodes.push(node);
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}
impl Eq for Cell {}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}
