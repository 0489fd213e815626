//! Diagnostics handle passed to each operation.
//!
//! Operations report through a `&mut impl Diagnostics` rather than the
//! process-wide logger, so tests can capture what was said. The binaries
//! create a [`Logger`] at startup and hand it down.

use log::Level;

pub trait Diagnostics {
    fn emit(&mut self, level: Level, msg: &str);

    fn info(&mut self, msg: &str) {
        self.emit(Level::Info, msg);
    }

    fn warn(&mut self, msg: &str) {
        self.emit(Level::Warn, msg);
    }

    fn error(&mut self, msg: &str) {
        self.emit(Level::Error, msg);
    }
}

/// Forwards to the `log` facade, backed by `env_logger`.
#[derive(Debug)]
pub struct Logger {
    target: &'static str,
}

impl Logger {
    /// Installs `env_logger` (default filter `info`, overridable with
    /// `RUST_LOG`). Call once, at process start.
    pub fn init(target: &'static str) -> Logger {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        Logger { target }
    }
}

impl Diagnostics for Logger {
    fn emit(&mut self, level: Level, msg: &str) {
        log::log!(target: self.target, level, "{msg}");
    }
}

/// Keeps every message, for tests.
#[derive(Debug, Default)]
pub struct Recorder {
    pub entries: Vec<(Level, String)>,
}

impl Recorder {
    pub fn new() -> Recorder {
        Default::default()
    }

    pub fn at(&self, level: Level) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
    }
}

impl Diagnostics for Recorder {
    fn emit(&mut self, level: Level, msg: &str) {
        self.entries.push((level, msg.to_owned()));
    }
}
