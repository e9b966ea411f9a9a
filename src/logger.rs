//! Leveled logging capability handed to the adapter.
//!
//! The adapter never talks to a logging backend directly. Callers pass an
//! `Arc<dyn Logger>`; [`LogFacade`] forwards to the `log` crate, which the
//! CLI wires up with `env_logger`.

use std::sync::Arc;

pub trait Logger: Send + Sync {
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// [`Logger`] backed by the `log` facade.
#[derive(Debug, Clone, Copy)]
pub struct LogFacade {
    target: &'static str,
}

impl LogFacade {
    pub const fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn shared() -> Arc<dyn Logger> {
        Arc::new(Self::default())
    }
}

impl Default for LogFacade {
    fn default() -> Self {
        Self::new("gmhistory")
    }
}

impl Logger for LogFacade {
    fn debug(&self, msg: &str) {
        log::debug!(target: self.target, "{}", msg);
    }

    fn info(&self, msg: &str) {
        log::info!(target: self.target, "{}", msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!(target: self.target, "{}", msg);
    }

    fn error(&self, msg: &str) {
        log::error!(target: self.target, "{}", msg);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Logger;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Level {
        Debug,
        Info,
        Warn,
        Error,
    }

    /// Keeps every line so tests can assert on what was emitted.
    #[derive(Default)]
    pub struct RecordingLogger {
        lines: Mutex<Vec<(Level, String)>>,
    }

    impl RecordingLogger {
        pub fn at(&self, level: Level) -> Vec<String> {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
                .collect()
        }

        fn push(&self, level: Level, msg: &str) {
            self.lines.lock().unwrap().push((level, msg.to_string()));
        }
    }

    impl Logger for RecordingLogger {
        fn debug(&self, msg: &str) {
            self.push(Level::Debug, msg);
        }

        fn info(&self, msg: &str) {
            self.push(Level::Info, msg);
        }

        fn warn(&self, msg: &str) {
            self.push(Level::Warn, msg);
        }

        fn error(&self, msg: &str) {
            self.push(Level::Error, msg);
        }
    }
}
