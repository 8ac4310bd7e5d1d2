//! Operation sender: the single choke point every tracker call goes
//! through.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use storebridge_core::TrackerRequest;

use crate::constants::{
    LOG_PREFIX, MESSAGE_TRACKER_NOT_INITIALIZED, MESSAGE_WIDGET_NOT_CONFIGURED, TRACKER_COMMAND,
};
use crate::global::WidgetGlobal;
use crate::host::HostEnvironment;
use crate::logger::ConfigErrorLogger;

/// Anything that can deliver a named operation with its data payload.
pub trait SendOperation: Send + Sync {
    fn send(&self, operation_name: &str, data: Value);
}

pub struct OperationSender {
    global: Arc<WidgetGlobal>,
    host: Arc<HostEnvironment>,
    logger: ConfigErrorLogger,
}

impl OperationSender {
    pub fn new(global: Arc<WidgetGlobal>, host: Arc<HostEnvironment>, logger: ConfigErrorLogger) -> Self {
        Self { global, host, logger }
    }
}

impl SendOperation for OperationSender {
    fn send(&self, operation_name: &str, data: Value) {
        let config = match self.global.config() {
            Some(config) if config.is_valid => config,
            Some(config) => {
                self.logger
                    .log(MESSAGE_WIDGET_NOT_CONFIGURED, Some(&config.missing_settings_list()));
                return;
            }
            None => {
                self.logger.log(MESSAGE_WIDGET_NOT_CONFIGURED, Some("unknown"));
                return;
            }
        };

        let operation = operation_name.trim();
        if operation.is_empty() {
            return;
        }

        let Some(tracker) = self.host.tracker() else {
            self.logger.log(MESSAGE_TRACKER_NOT_INITIALIZED, None);
            return;
        };

        let console = self.host.console();
        let request = TrackerRequest {
            operation: operation.to_string(),
            data,
            on_success: Box::new(|| {}),
            on_error: Box::new(move |error| {
                console.error(LOG_PREFIX, Some(&error.to_string()));
            }),
        };

        debug!(operation, api_domain = %config.api_domain, "operation dispatched");
        tracker.call(TRACKER_COMMAND, request);
    }
}
