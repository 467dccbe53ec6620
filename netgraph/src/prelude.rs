pub use crate::af::Activation;
pub use crate::data::{ListPatternSource, Pattern, PatternSource, ShuffledPatternSource};
pub use crate::graph::{Cell, CellFactory, CellId, Edge, EdgeId, Network, NetworkDef, Node, NodeId, NodeKind};
pub use crate::metrics::{CategoryMatcher, Matcher, Metrics};
pub use crate::task::{ProgressListener, State, Task, TaskControl};
pub use crate::trainers::{ConsoleListener, ForwardListenerBuilder, SinkListener, SLTrainer};
pub use crate::TrainError;
