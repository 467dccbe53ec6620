mod edge;
pub use edge::Edge;

mod node;
pub use node::{ActivationState, BiasState, Node, NodeKind, WeightsState};

mod cell;
pub use cell::Cell;

mod factory;
pub use factory::CellFactory;

mod network;
pub use network::Network;

mod snapshot;
pub use snapshot::{CellDef, EdgeDef, NetworkDef, NodeDef};

/* Arena indices. Stable for the lifetime of the owning network; identity
 * proper (equality, persistence) goes through the entity UUIDs. */

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CellId(pub(crate) usize);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub(crate) usize);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EdgeId(pub(crate) usize);
