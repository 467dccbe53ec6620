use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::MAIN_SEPARATOR_STR;
use std::sync::Mutex;

use crate::task::{ProgressListener, State};

/* Progress listener appending one row per event to any writer, with a lazy
 * header. Useful to keep a machine-readable trace of a training run. */
pub struct SinkListener {
    writer: Mutex<(bool, Box<dyn Write + Send + Sync>)>,
}

impl SinkListener {
    pub fn new<W: Write + Send + Sync + 'static>(writer: W) -> Self {
        SinkListener {
            writer: Mutex::new((false, Box::new(writer))),
        }
    }

    /* File-backed sink, creating the directory as needed. */
    pub fn to_file(dir: &str, name: &str) -> Self {
        fs::create_dir_all(dir).expect("Should be able to create the sink dir");
        let file = File::create(format!("{}{}{}", dir, MAIN_SEPARATOR_STR, name))
            .expect("Should be able to create the sink file");
        SinkListener::new(file)
    }

    fn write_row(&self, event: &str, index: Option<usize>, detail: &str) {
        let mut writer_lock = self.writer.lock().expect("Should unlock sink mutex");
        if !writer_lock.0 {
            writeln!(&mut writer_lock.1, "event;index;detail").unwrap();
            writer_lock.0 = true;
        }
        let index = index.map(|i| i.to_string()).unwrap_or_default();
        writeln!(&mut writer_lock.1, "{};{};{}", event, index, detail).unwrap();
    }
}

impl ProgressListener for SinkListener {
    fn start(&self) {
        self.write_row("start", None, "");
    }

    fn end(&self) {
        self.write_row("end", None, "");
        let mut writer_lock = self.writer.lock().expect("Should unlock sink mutex");
        writer_lock.1.flush().unwrap();
    }

    fn message(&self, index: usize, message: &str) {
        self.write_row("message", Some(index), message);
    }

    fn progress(&self, _index: usize, _work_increase: f64, _total_work: f64) {}

    fn reset(&self, index: usize) {
        self.write_row("reset", Some(index), "");
    }

    fn state(&self, state: State) {
        self.write_row("state", None, &state.to_string());
    }

    fn indeterminate(&self, index: usize, indeterminate: bool) {
        self.write_row("indeterminate", Some(index), &indeterminate.to_string());
    }
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use super::SinkListener;
    use crate::task::{ProgressListener, State};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_rows() {
        let buffer = SharedBuffer::default();
        let sink = SinkListener::new(buffer.clone());
        sink.start();
        sink.message(0, "Total work 1 of 10 (10.00%)");
        sink.state(State::Succeeded);
        sink.end();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "event;index;detail");
        assert_eq!(lines[1], "start;;");
        assert_eq!(lines[2], "message;0;Total work 1 of 10 (10.00%)");
        assert_eq!(lines[3], "state;;SUCCEEDED");
        assert_eq!(lines[4], "end;;");
    }
}
