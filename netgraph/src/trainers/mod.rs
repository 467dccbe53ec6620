mod sl;
pub use sl::SLTrainer;

mod console;
pub use console::ConsoleListener;

mod sink;
pub use sink::SinkListener;

mod forward;
pub use forward::{ForwardListener, ForwardListenerBuilder};
