//! Storefront tracker bridge: listens for storefront page, cart and
//! wishlist events and forwards them as operations to the marketing tracker.
//!
//! # Modules
//!
//! - [`config`]: raw host config normalization and validation
//! - [`event_data`]: favorites/cart payload extraction and line-item mapping
//! - [`logger`]: once-per-instance configuration error logging
//! - [`sender`]: the single choke point for tracker calls
//! - [`page_view`]: one-shot category/product view operations
//! - [`subscriptions`]: event bus handlers with set/clear fallback
//! - [`init`]: the initialization orchestrator and its retry loop
//! - [`widget`]: the host-facing entry point with coalesced `init()`

pub mod config;
pub mod constants;
pub mod event_data;
pub mod global;
pub mod host;
pub mod init;
pub mod logger;
pub mod normalize;
pub mod page_view;
pub mod sender;
pub mod state;
pub mod subscriptions;
pub mod widget;

pub use config::{normalize_and_validate_config, WidgetConfig};
pub use global::{InitHandle, WidgetGlobal};
pub use host::HostEnvironment;
pub use sender::{OperationSender, SendOperation};
pub use state::WidgetState;
pub use widget::Widget;
