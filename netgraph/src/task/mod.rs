use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use crate::TrainError;

pub mod progress;
pub use progress::ProgressListener;

/* Lifecycle of a task: READY on creation, RUNNING while executing, then one
 * of the terminal states. */
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum State {
    Ready = 0,
    Running = 1,
    Succeeded = 2,
    Cancelled = 3,
    Failed = 4,
}

impl State {
    fn from_u8(value: u8) -> State {
        match value {
            0 => State::Ready,
            1 => State::Running,
            2 => State::Succeeded,
            3 => State::Cancelled,
            4 => State::Failed,
            _ => unreachable!("Invalid task state value"),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Succeeded | State::Cancelled | State::Failed)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            State::Ready => "READY",
            State::Running => "RUNNING",
            State::Succeeded => "SUCCEEDED",
            State::Cancelled => "CANCELLED",
            State::Failed => "FAILED",
        };
        write!(f, "{}", name)
    }
}

/* The only cross-thread datum of a task: its state and the cancellation
 * request flag. Share it (Arc) with whatever thread needs to cancel or
 * observe the task. */
pub struct TaskControl {
    state: AtomicU8,
    cancel_requested: AtomicBool,
}

impl Default for TaskControl {
    fn default() -> Self {
        TaskControl {
            state: AtomicU8::new(State::Ready as u8),
            cancel_requested: AtomicBool::new(false),
        }
    }
}

impl TaskControl {
    pub fn new() -> Arc<TaskControl> {
        Arc::new(TaskControl::default())
    }

    pub fn state(&self) -> State {
        State::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn set_state(&self, state: State) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /* Ask the task to stop at its next poll. */
    pub fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::SeqCst);
    }

    pub fn should_cancel(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst)
    }

    pub fn has_terminated(&self) -> bool {
        self.state().is_terminal()
    }

    /* Back to READY so the task can be executed again. */
    pub fn reinitialize(&self) {
        self.cancel_requested.store(false, Ordering::SeqCst);
        self.set_state(State::Ready);
    }
}

pub trait Task {
    fn control(&self) -> &Arc<TaskControl>;

    fn execute(&mut self) -> Result<(), TrainError>;

    /* Hook for state change side effects (e.g. notifying a listener). */
    fn state_changed(&self, _state: State) {}

    fn transition(&self, state: State) {
        self.control().set_state(state);
        self.state_changed(state);
    }

    /* Drive the lifecycle around execute(). Configuration errors become the
     * FAILED state rather than propagating. Returns the terminal state. */
    fn run(&mut self) -> State {
        if self.control().should_cancel() {
            self.transition(State::Cancelled);
            return State::Cancelled;
        }
        self.transition(State::Running);
        match self.execute() {
            Err(error) => {
                error!("task failed: {}", error);
                self.transition(State::Failed);
            }
            Ok(()) => {
                if self.control().state() != State::Cancelled {
                    self.transition(State::Succeeded);
                }
            }
        }
        self.control().state()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::{State, Task, TaskControl};
    use crate::TrainError;

    struct CountingTask {
        control: Arc<TaskControl>,
        executed: usize,
        fail: bool,
    }

    impl CountingTask {
        fn new(fail: bool) -> Self {
            CountingTask {
                control: TaskControl::new(),
                executed: 0,
                fail,
            }
        }
    }

    impl Task for CountingTask {
        fn control(&self) -> &Arc<TaskControl> {
            &self.control
        }

        fn execute(&mut self) -> Result<(), TrainError> {
            self.executed += 1;
            if self.fail {
                return Err(TrainError::MissingNetwork);
            }
            Ok(())
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut task = CountingTask::new(false);
        assert_eq!(task.control().state(), State::Ready);
        assert_eq!(task.run(), State::Succeeded);
        assert_eq!(task.executed, 1);
        assert!(task.control().has_terminated());
    }

    #[test]
    fn test_failure() {
        let mut task = CountingTask::new(true);
        assert_eq!(task.run(), State::Failed);
    }

    #[test]
    fn test_cancel_before_run() {
        let mut task = CountingTask::new(false);
        task.control().request_cancel();
        assert_eq!(task.run(), State::Cancelled);
        assert_eq!(task.executed, 0);
    }

    #[test]
    fn test_reinitialize() {
        let mut task = CountingTask::new(false);
        task.control().request_cancel();
        task.run();
        task.control().reinitialize();
        assert_eq!(task.control().state(), State::Ready);
        assert!(!task.control().should_cancel());
        assert_eq!(task.run(), State::Succeeded);
    }
}
