//! Initialization orchestrator.
//!
//! `NoConfig -> Configured(invalid) -> Configured(valid, unbound) -> Bound`.
//! A run validates the config, sends the initial page views, then binds
//! event subscriptions, retrying on a fixed interval while the host event
//! bus is not ready. Every path resolves; nothing is surfaced to the caller.

use std::sync::Arc;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::config::normalize_and_validate_config;
use crate::constants::{MESSAGE_EVENTBUS_UNAVAILABLE, MESSAGE_MISSING_SETTINGS, RETRY_ATTEMPTS, RETRY_DELAY};
use crate::host::HostEnvironment;
use crate::logger::ConfigErrorLogger;
use crate::page_view::send_initial_page_views;
use crate::sender::{OperationSender, SendOperation};
use crate::subscriptions::SubscriptionBinder;

pub async fn initialize_widget(host: Arc<HostEnvironment>) {
    let global = host.widget_global();
    let Some(config) = normalize_and_validate_config(global.raw_config().as_ref()) else {
        debug!("no widget config, skipping initialization");
        return;
    };
    let config = Arc::new(config);
    global.store_config(Arc::clone(&config));

    let state = global.state();
    let console = host.console();

    if !config.is_valid {
        let first_report = {
            let mut state = state.lock();
            !std::mem::replace(&mut state.missing_settings_logged, true)
        };
        if first_report {
            console.error(MESSAGE_MISSING_SETTINGS, Some(&config.missing_settings_list()));
        }
        return;
    }

    let logger = ConfigErrorLogger::new(Arc::clone(&state), console);
    let sender: Arc<dyn SendOperation> = Arc::new(OperationSender::new(
        Arc::clone(&global),
        Arc::clone(&host),
        logger.clone(),
    ));

    send_initial_page_views(&state, &config, sender.as_ref());

    if state.lock().events_bound {
        return;
    }

    let event_bus = host.event_bus();
    let binder = SubscriptionBinder::new(Arc::clone(&global), sender);
    if binder.bind(event_bus.as_deref()) {
        return;
    }

    let mut ticker = interval_at(Instant::now() + RETRY_DELAY, RETRY_DELAY);
    let mut attempts_left = RETRY_ATTEMPTS;
    loop {
        ticker.tick().await;
        if binder.bind(event_bus.as_deref()) {
            info!(attempts = RETRY_ATTEMPTS - attempts_left + 1, "subscriptions bound after retry");
            return;
        }

        attempts_left -= 1;
        if attempts_left == 0 {
            warn!(attempts = RETRY_ATTEMPTS, "event bus never became available");
            logger.log(MESSAGE_EVENTBUS_UNAVAILABLE, None);
            return;
        }
    }
}
