//! Output sink injected into every workflow component.
//!
//! Components never print directly; they go through a `Reporter` so tests can
//! run silently and assert on what was said. The console implementation keeps
//! the color policy from `color.rs`: info/success go to stdout, warnings and
//! errors to stderr.

use crate::color::{color_enabled_stderr, color_enabled_stdout, paint};

pub trait Reporter {
    fn info(&self, msg: &str);
    fn success(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Color-aware console reporter.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, msg: &str) {
        let use_out = color_enabled_stdout();
        println!("{}", paint(use_out, "\x1b[36m", msg));
    }

    fn success(&self, msg: &str) {
        let use_out = color_enabled_stdout();
        println!("{}", paint(use_out, "\x1b[32m", msg));
    }

    fn warn(&self, msg: &str) {
        let use_err = color_enabled_stderr();
        eprintln!(
            "{}",
            paint(use_err, "\x1b[33;1m", &format!("warning: {msg}"))
        );
    }

    fn error(&self, msg: &str) {
        let use_err = color_enabled_stderr();
        eprintln!("{}", paint(use_err, "\x1b[31;1m", &format!("error: {msg}")));
    }
}

/// Records every message for assertions; used by unit and integration tests.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: std::sync::Mutex<Vec<(Level, String)>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().expect("reporter lock").clone()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    fn record(&self, level: Level, msg: &str) {
        self.messages
            .lock()
            .expect("reporter lock")
            .push((level, msg.to_string()));
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, msg: &str) {
        self.record(Level::Info, msg);
    }
    fn success(&self, msg: &str) {
        self.record(Level::Success, msg);
    }
    fn warn(&self, msg: &str) {
        self.record(Level::Warn, msg);
    }
    fn error(&self, msg: &str) {
        self.record(Level::Error, msg);
    }
}
