use std::time::Duration;

pub const FAVORITES_EVENT: &str = "update_items:insales:favorites_products";
pub const CART_EVENT: &str = "update_items:insales:cart:light";

/// Command every operation is sent under.
pub const TRACKER_COMMAND: &str = "async";

/// Product id namespace used when the config does not name one.
pub const DEFAULT_ID_KEY: &str = "website";

pub const LOG_PREFIX: &str = "[mindbox]";
pub const MESSAGE_WIDGET_NOT_CONFIGURED: &str =
    "[mindbox] Widget is not configured. Check the required settings.";
pub const MESSAGE_TRACKER_NOT_INITIALIZED: &str =
    "[mindbox] Tracker is not initialized. Check apiDomain.";
pub const MESSAGE_EVENTBUS_UNAVAILABLE: &str =
    "[mindbox] EventBus is unavailable, subscriptions were not activated.";
pub const MESSAGE_MISSING_SETTINGS: &str = "[mindbox] Required widget settings are missing:";
pub const MESSAGE_INIT_IN_PROGRESS: &str =
    "[mindbox] Initialization called again while a previous run is in flight. Waiting for it to finish.";

pub const RETRY_ATTEMPTS: u32 = 50;
pub const RETRY_DELAY: Duration = Duration::from_millis(100);
