//! Host environment: the page-level collaborators the bridge resolves at
//! runtime, plus the lazily created widget global record.

use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

use storebridge_core::console::tracing_console;
use storebridge_core::{Console, EventBus, Tracker};

use crate::global::WidgetGlobal;

pub struct HostEnvironment {
    tracker: RwLock<Option<Arc<dyn Tracker>>>,
    event_bus: RwLock<Option<Arc<dyn EventBus>>>,
    console: Arc<dyn Console>,
    widget: OnceLock<Arc<WidgetGlobal>>,
}

impl HostEnvironment {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self {
            tracker: RwLock::new(None),
            event_bus: RwLock::new(None),
            console,
            widget: OnceLock::new(),
        }
    }

    pub fn with_tracker(self, tracker: Arc<dyn Tracker>) -> Self {
        self.install_tracker(tracker);
        self
    }

    pub fn with_event_bus(self, event_bus: Arc<dyn EventBus>) -> Self {
        self.install_event_bus(event_bus);
        self
    }

    /// Tracker scripts usually load asynchronously, after the widget.
    pub fn install_tracker(&self, tracker: Arc<dyn Tracker>) {
        *self.tracker.write() = Some(tracker);
    }

    pub fn remove_tracker(&self) {
        *self.tracker.write() = None;
    }

    pub fn install_event_bus(&self, event_bus: Arc<dyn EventBus>) {
        *self.event_bus.write() = Some(event_bus);
    }

    pub fn tracker(&self) -> Option<Arc<dyn Tracker>> {
        self.tracker.read().clone()
    }

    pub fn event_bus(&self) -> Option<Arc<dyn EventBus>> {
        self.event_bus.read().clone()
    }

    pub fn console(&self) -> Arc<dyn Console> {
        Arc::clone(&self.console)
    }

    /// The widget global record, created on first access.
    pub fn widget_global(&self) -> Arc<WidgetGlobal> {
        Arc::clone(self.widget.get_or_init(|| Arc::new(WidgetGlobal::new())))
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::new(tracing_console())
    }
}
