//! Widget global record: the one shared mutable object through which the
//! orchestrator, event handlers and repeated `init()` calls coordinate.

use futures::future::{BoxFuture, Shared};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::WidgetConfig;
use crate::state::WidgetState;

/// Completion handle for an initialization run. Cloneable; every clone
/// resolves when the run settles. Never fails.
pub type InitHandle = Shared<BoxFuture<'static, ()>>;

struct InFlight {
    id: u64,
    handle: InitHandle,
}

pub struct WidgetGlobal {
    raw_config: RwLock<Option<Value>>,
    config: RwLock<Option<Arc<WidgetConfig>>>,
    state: Arc<Mutex<WidgetState>>,
    in_flight: Mutex<Option<InFlight>>,
    next_init_id: AtomicU64,
}

impl WidgetGlobal {
    pub fn new() -> Self {
        Self {
            raw_config: RwLock::new(None),
            config: RwLock::new(None),
            state: Arc::new(Mutex::new(WidgetState::default())),
            in_flight: Mutex::new(None),
            next_init_id: AtomicU64::new(1),
        }
    }

    /// Host-supplied configuration, exactly as written by the page.
    pub fn set_raw_config(&self, raw: Value) {
        *self.raw_config.write() = Some(raw);
    }

    pub fn raw_config(&self) -> Option<Value> {
        self.raw_config.read().clone()
    }

    /// The most recently validated configuration.
    pub fn config(&self) -> Option<Arc<WidgetConfig>> {
        self.config.read().clone()
    }

    pub(crate) fn store_config(&self, config: Arc<WidgetConfig>) {
        *self.config.write() = Some(config);
    }

    pub fn state(&self) -> Arc<Mutex<WidgetState>> {
        Arc::clone(&self.state)
    }

    pub fn state_snapshot(&self) -> WidgetState {
        self.state.lock().clone()
    }

    pub fn is_init_in_flight(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Returns the in-flight handle, or registers the one produced by
    /// `start` under a fresh id. The bool is true when a run was already in
    /// flight.
    pub(crate) fn attach_or_start<F>(&self, start: F) -> (InitHandle, bool)
    where
        F: FnOnce(u64) -> InitHandle,
    {
        let mut slot = self.in_flight.lock();
        if let Some(in_flight) = slot.as_ref() {
            return (in_flight.handle.clone(), true);
        }
        let id = self.next_init_id.fetch_add(1, Ordering::SeqCst);
        let handle = start(id);
        *slot = Some(InFlight {
            id,
            handle: handle.clone(),
        });
        (handle, false)
    }

    /// Clears the in-flight slot, but only if it still belongs to run `id`.
    pub(crate) fn settle(&self, id: u64) {
        let mut slot = self.in_flight.lock();
        if slot.as_ref().is_some_and(|in_flight| in_flight.id == id) {
            *slot = None;
        }
    }
}

impl Default for WidgetGlobal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;

    fn ready_handle() -> InitHandle {
        async {}.boxed().shared()
    }

    #[test]
    fn test_starts_empty() {
        let global = WidgetGlobal::new();
        assert!(global.raw_config().is_none());
        assert!(global.config().is_none());
        assert_eq!(global.state_snapshot(), WidgetState::default());
        assert!(!global.is_init_in_flight());
    }

    #[test]
    fn test_raw_config_roundtrip() {
        let global = WidgetGlobal::new();
        global.set_raw_config(json!({ "apiDomain": "api.mindbox.ru" }));
        assert_eq!(global.raw_config().unwrap()["apiDomain"], "api.mindbox.ru");
    }

    #[test]
    fn test_second_attach_reuses_in_flight() {
        let global = WidgetGlobal::new();
        let (_, existed) = global.attach_or_start(|_| ready_handle());
        assert!(!existed);

        let mut started_again = false;
        let (_, existed) = global.attach_or_start(|_| {
            started_again = true;
            ready_handle()
        });
        assert!(existed);
        assert!(!started_again);
    }

    #[test]
    fn test_stale_settle_keeps_newer_run() {
        let global = WidgetGlobal::new();
        let mut first_id = 0;
        let (_first, _) = global.attach_or_start(|id| {
            first_id = id;
            ready_handle()
        });
        global.settle(first_id);
        assert!(!global.is_init_in_flight());

        let mut second_id = 0;
        let (_second, _) = global.attach_or_start(|id| {
            second_id = id;
            ready_handle()
        });
        assert_ne!(first_id, second_id);

        // A late settle from the first run must not clear the second.
        global.settle(first_id);
        assert!(global.is_init_in_flight());
        global.settle(second_id);
        assert!(!global.is_init_in_flight());
    }
}
