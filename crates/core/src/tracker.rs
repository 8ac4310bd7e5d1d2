//! Marketing tracker SDK: the `(command, payload)` function the bridge
//! delivers operations to.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::BridgeError;

pub type SuccessCallback = Box<dyn FnOnce() + Send>;
pub type ErrorCallback = Box<dyn FnOnce(Value) + Send>;

/// One operation call handed to the tracker.
pub struct TrackerRequest {
    pub operation: String,
    pub data: Value,
    pub on_success: SuccessCallback,
    pub on_error: ErrorCallback,
}

impl std::fmt::Debug for TrackerRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerRequest")
            .field("operation", &self.operation)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// Trait implemented by the tracker function installed on the host.
/// Delivery is fire-and-forget: results only come back through the
/// request callbacks.
pub trait Tracker: Send + Sync {
    fn call(&self, command: &str, request: TrackerRequest);
}

/// A tracker call as recorded by [`CaptureTracker`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub command: String,
    pub operation: String,
    pub data: Value,
}

/// In-memory tracker that records calls for testing. Operations listed via
/// [`failing`](CaptureTracker::failing) are rejected through `on_error`.
#[derive(Default)]
pub struct CaptureTracker {
    calls: Mutex<Vec<RecordedCall>>,
    failing: Mutex<HashSet<String>>,
}

impl CaptureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing<I, S>(self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing
            .lock()
            .extend(operations.into_iter().map(Into::into));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn count_operation(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    pub fn last(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }
}

impl Tracker for CaptureTracker {
    fn call(&self, command: &str, request: TrackerRequest) {
        self.calls.lock().push(RecordedCall {
            command: command.to_string(),
            operation: request.operation.clone(),
            data: request.data.clone(),
        });

        let rejected = self.failing.lock().contains(&request.operation);
        if rejected {
            let err = BridgeError::Delivery(format!("operation {} rejected", request.operation));
            (request.on_error)(err.to_json());
        } else {
            (request.on_success)();
        }
    }
}

/// Convenience: create a capture tracker for tests.
pub fn capture_tracker() -> Arc<CaptureTracker> {
    Arc::new(CaptureTracker::new())
}
