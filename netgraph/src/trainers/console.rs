use std::io::{stdout, Stdout, Write};
use std::sync::Mutex;

use crossterm::{cursor, terminal, ExecutableCommand};

use crate::task::{ProgressListener, State};

/* Progress listener rendering the tracked messages in place on stdout,
 * one line redrawn as the task advances. */
pub struct ConsoleListener {
    ioout: Mutex<Stdout>,
    messages: Mutex<Vec<String>>,
}

impl ConsoleListener {
    pub fn new() -> Self {
        ConsoleListener {
            ioout: Mutex::new(stdout()),
            messages: Mutex::new(Vec::new()),
        }
    }

    fn redraw(&self) {
        let messages = self.messages.lock().expect("Should unlock messages mutex");
        let line = messages
            .iter()
            .filter(|m| !m.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" | ");
        let mut ioout = self.ioout.lock().expect("Should unlock stdout mutex");
        ioout
            .execute(terminal::Clear(terminal::ClearType::CurrentLine))
            .unwrap();
        ioout.execute(cursor::SavePosition).unwrap();
        ioout.write_all(line.as_bytes()).unwrap();
        ioout.execute(cursor::RestorePosition).unwrap();
        ioout.flush().unwrap();
    }

    fn store(&self, index: usize, message: &str) {
        let mut messages = self.messages.lock().expect("Should unlock messages mutex");
        if messages.len() <= index {
            messages.resize(index + 1, String::new());
        }
        messages[index] = message.to_owned();
    }
}

impl Default for ConsoleListener {
    fn default() -> Self {
        ConsoleListener::new()
    }
}

impl ProgressListener for ConsoleListener {
    fn start(&self) {
        let mut ioout = self.ioout.lock().expect("Should unlock stdout mutex");
        ioout.execute(cursor::Hide).unwrap();
        writeln!(&mut ioout, "========================================").unwrap();
        writeln!(&mut ioout, "Task starting").unwrap();
        writeln!(&mut ioout, "========================================").unwrap();
    }

    fn end(&self) {
        let mut ioout = self.ioout.lock().expect("Should unlock stdout mutex");
        ioout
            .execute(terminal::Clear(terminal::ClearType::CurrentLine))
            .unwrap();
        writeln!(&mut ioout, "Task finished").unwrap();
        ioout.execute(cursor::Show).unwrap();
    }

    fn message(&self, index: usize, message: &str) {
        self.store(index, message);
        self.redraw();
    }

    fn progress(&self, _index: usize, _work_increase: f64, _total_work: f64) {}

    fn reset(&self, index: usize) {
        self.store(index, "");
    }

    fn state(&self, state: State) {
        let mut ioout = self.ioout.lock().expect("Should unlock stdout mutex");
        ioout
            .execute(terminal::Clear(terminal::ClearType::CurrentLine))
            .unwrap();
        writeln!(&mut ioout, "State: {}", state).unwrap();
    }

    fn indeterminate(&self, _index: usize, _indeterminate: bool) {}
}
