//! Shared building blocks for the storefront tracker bridge: error type,
//! application settings, and the host-side collaborators (tracker function,
//! event bus, console sink) the bridge talks to.

pub mod config;
pub mod console;
pub mod error;
pub mod event_bus;
pub mod tracker;

pub use config::AppConfig;
pub use console::{CaptureConsole, Console, TracingConsole};
pub use error::{BridgeError, BridgeResult};
pub use event_bus::{EventBus, EventHandler, InMemoryEventBus};
pub use tracker::{CaptureTracker, RecordedCall, Tracker, TrackerRequest};
