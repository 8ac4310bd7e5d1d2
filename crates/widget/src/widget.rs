//! Widget entry point: what the host page calls to (re)start the bridge.

use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::config::WidgetConfig;
use crate::constants::MESSAGE_INIT_IN_PROGRESS;
use crate::global::{InitHandle, WidgetGlobal};
use crate::host::HostEnvironment;
use crate::init::initialize_widget;
use crate::state::WidgetState;

#[derive(Clone)]
pub struct Widget {
    host: Arc<HostEnvironment>,
}

impl Widget {
    pub fn attach(host: Arc<HostEnvironment>) -> Self {
        Self { host }
    }

    pub fn global(&self) -> Arc<WidgetGlobal> {
        self.host.widget_global()
    }

    pub fn set_config(&self, raw: Value) {
        self.global().set_raw_config(raw);
    }

    pub fn config(&self) -> Option<Arc<WidgetConfig>> {
        self.global().config()
    }

    pub fn state(&self) -> WidgetState {
        self.global().state_snapshot()
    }

    /// Start an initialization run, or join the one already in flight.
    ///
    /// The run is spawned on the current tokio runtime, so it progresses
    /// whether or not the returned handle is awaited. Must be called from
    /// within a runtime.
    pub fn init(&self) -> InitHandle {
        let global = self.global();
        let host = Arc::clone(&self.host);
        let settle_global = Arc::clone(&global);

        let (handle, joined) = global.attach_or_start(move |id| {
            async move {
                initialize_widget(host).await;
                settle_global.settle(id);
                debug!(init_id = id, "initialization settled");
            }
            .boxed()
            .shared()
        });

        if joined {
            self.host.console().warn(MESSAGE_INIT_IN_PROGRESS);
        } else {
            tokio::spawn(handle.clone());
        }
        handle
    }
}
