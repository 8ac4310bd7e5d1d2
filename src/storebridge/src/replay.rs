//! Simulated storefront host for replaying recorded events against the
//! bridge.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::io::Write;

use storebridge_core::{BridgeError, BridgeResult, Tracker, TrackerRequest};
use storebridge_widget::constants::{CART_EVENT, FAVORITES_EVENT};

/// Tracker that writes every call as one JSON line to stdout.
pub struct StdoutTracker {
    failing: HashSet<String>,
}

#[derive(Serialize)]
struct TrackerLine<'a> {
    command: &'a str,
    operation: &'a str,
    data: &'a Value,
}

impl StdoutTracker {
    pub fn new(failing: impl IntoIterator<Item = String>) -> Self {
        Self {
            failing: failing.into_iter().collect(),
        }
    }
}

impl Tracker for StdoutTracker {
    fn call(&self, command: &str, request: TrackerRequest) {
        let line = TrackerLine {
            command,
            operation: &request.operation,
            data: &request.data,
        };
        match serde_json::to_string(&line) {
            Ok(json) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{json}") {
                    tracing::warn!(error = %e, "failed to write tracker call");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to encode tracker call"),
        }

        if self.failing.contains(&request.operation) {
            let err = BridgeError::Delivery(format!("operation {} rejected by replay tracker", request.operation));
            (request.on_error)(err.to_json());
        } else {
            (request.on_success)();
        }
    }
}

/// One line of a replay log.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayEvent {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl ReplayEvent {
    /// Host event name, resolving the `cart`/`favorites` shorthands.
    pub fn event_name(&self) -> &str {
        match self.event.as_str() {
            "cart" => CART_EVENT,
            "favorites" => FAVORITES_EVENT,
            other => other,
        }
    }
}

pub fn parse_event_line(line: &str) -> BridgeResult<ReplayEvent> {
    let event: ReplayEvent = serde_json::from_str(line)?;
    if event.event.trim().is_empty() {
        return Err(BridgeError::InvalidEvent("event name is empty".into()));
    }
    Ok(event)
}

/// Parse a JSONL replay log, skipping blank lines. Malformed lines are
/// returned as errors tagged with their 1-based line number.
pub fn parse_event_log(text: &str) -> Vec<(usize, BridgeResult<ReplayEvent>)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, parse_event_line(line)))
        .collect()
}
