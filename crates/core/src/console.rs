//! Console-like diagnostics sink. This is the channel site owners see; it is
//! separate from the developer-facing `tracing` output.

use parking_lot::Mutex;
use std::sync::Arc;

pub trait Console: Send + Sync {
    fn error(&self, message: &str, details: Option<&str>);
    fn warn(&self, message: &str);
}

/// Forwards console output to `tracing` under the `storebridge::console`
/// target.
pub struct TracingConsole;

impl Console for TracingConsole {
    fn error(&self, message: &str, details: Option<&str>) {
        match details {
            Some(details) => tracing::error!(target: "storebridge::console", details, "{message}"),
            None => tracing::error!(target: "storebridge::console", "{message}"),
        }
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "storebridge::console", "{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Error,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEntry {
    pub level: ConsoleLevel,
    pub message: String,
    pub details: Option<String>,
}

/// In-memory console that captures entries for testing.
#[derive(Default)]
pub struct CaptureConsole {
    entries: Mutex<Vec<ConsoleEntry>>,
}

impl CaptureConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.entries.lock().clone()
    }

    pub fn errors(&self) -> Vec<ConsoleEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == ConsoleLevel::Error)
            .cloned()
            .collect()
    }

    pub fn warnings(&self) -> Vec<ConsoleEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == ConsoleLevel::Warn)
            .cloned()
            .collect()
    }

    pub fn count_message(&self, message: &str) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.message == message)
            .count()
    }
}

impl Console for CaptureConsole {
    fn error(&self, message: &str, details: Option<&str>) {
        self.entries.lock().push(ConsoleEntry {
            level: ConsoleLevel::Error,
            message: message.to_string(),
            details: details.map(str::to_string),
        });
    }

    fn warn(&self, message: &str) {
        self.entries.lock().push(ConsoleEntry {
            level: ConsoleLevel::Warn,
            message: message.to_string(),
            details: None,
        });
    }
}

/// Convenience: the default console for production hosts.
pub fn tracing_console() -> Arc<dyn Console> {
    Arc::new(TracingConsole)
}

/// Convenience: create a capture console for tests.
pub fn capture_console() -> Arc<CaptureConsole> {
    Arc::new(CaptureConsole::new())
}
