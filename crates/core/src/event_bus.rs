//! Host event bus: the storefront's publish/subscribe channel for page,
//! cart and wishlist updates.
//!
//! The bridge only ever subscribes. [`InMemoryEventBus`] stands in for the
//! host page in tests and in the replay harness.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Callback invoked with the loosely-typed payload of a host event.
pub type EventHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Subscribe-only view of the host event bus.
pub trait EventBus: Send + Sync {
    /// Whether the bus currently exposes a subscribe capability. Hosts may
    /// attach it after the bus object itself becomes visible.
    fn can_subscribe(&self) -> bool {
        true
    }

    fn subscribe(&self, event_name: &str, handler: EventHandler);
}

/// In-process bus that delivers published events synchronously, in
/// subscription order.
pub struct InMemoryEventBus {
    ready: AtomicBool,
    probes: AtomicUsize,
    handlers: Mutex<HashMap<String, Vec<EventHandler>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            probes: AtomicUsize::new(0),
            handlers: Mutex::new(HashMap::new()),
        }
    }

    /// A bus whose subscribe capability is not available until
    /// [`mark_ready`](Self::mark_ready) is called.
    pub fn pending() -> Self {
        let bus = Self::new();
        bus.ready.store(false, Ordering::SeqCst);
        bus
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    /// Deliver `data` to every handler subscribed to `event_name`. Returns
    /// the number of handlers invoked.
    pub fn publish(&self, event_name: &str, data: &Value) -> usize {
        // Snapshot so handlers may subscribe re-entrantly.
        let handlers: Vec<EventHandler> = self
            .handlers
            .lock()
            .get(event_name)
            .cloned()
            .unwrap_or_default();
        for handler in &handlers {
            handler(data);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, event_name: &str) -> usize {
        self.handlers
            .lock()
            .get(event_name)
            .map_or(0, |handlers| handlers.len())
    }

    /// How many times the subscribe capability has been probed.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for InMemoryEventBus {
    fn can_subscribe(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.ready.load(Ordering::SeqCst)
    }

    fn subscribe(&self, event_name: &str, handler: EventHandler) {
        self.handlers
            .lock()
            .entry(event_name.to_string())
            .or_default()
            .push(handler);
    }
}

/// Convenience: create a ready in-memory bus.
pub fn in_memory_bus() -> Arc<InMemoryEventBus> {
    Arc::new(InMemoryEventBus::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_publish_reaches_subscribers() {
        let bus = in_memory_bus();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(
            "cart",
            Arc::new(move |data: &Value| sink.lock().push(data.clone())),
        );

        assert_eq!(bus.publish("cart", &json!({"n": 1})), 1);
        assert_eq!(bus.publish("favorites", &json!({"n": 2})), 0);
        assert_eq!(*seen.lock(), vec![json!({"n": 1})]);
        assert_eq!(bus.subscriber_count("cart"), 1);
    }

    #[test]
    fn test_pending_bus_becomes_ready() {
        let bus = InMemoryEventBus::pending();
        assert!(!bus.can_subscribe());
        bus.mark_ready();
        assert!(bus.can_subscribe());
        assert_eq!(bus.probe_count(), 2);
    }
}
