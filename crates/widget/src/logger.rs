//! Once-only configuration error logging, scoped to a widget instance.

use parking_lot::Mutex;
use std::sync::Arc;

use storebridge_core::Console;

use crate::state::WidgetState;

/// Emits at most one configuration-class error per widget instance. Every
/// caller shares the `config_error_logged` gate, whatever the message.
#[derive(Clone)]
pub struct ConfigErrorLogger {
    state: Arc<Mutex<WidgetState>>,
    console: Arc<dyn Console>,
}

impl ConfigErrorLogger {
    pub fn new(state: Arc<Mutex<WidgetState>>, console: Arc<dyn Console>) -> Self {
        Self { state, console }
    }

    pub fn log(&self, message: &str, details: Option<&str>) {
        {
            let mut state = self.state.lock();
            if state.config_error_logged {
                tracing::debug!(message, "config error suppressed");
                return;
            }
            state.config_error_logged = true;
        }
        self.console.error(message, details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storebridge_core::console::capture_console;

    #[test]
    fn test_logs_only_first_error() {
        let state = Arc::new(Mutex::new(WidgetState::default()));
        let console = capture_console();
        let logger = ConfigErrorLogger::new(state.clone(), console.clone());

        logger.log("first", Some("apiDomain"));
        logger.log("second", None);
        logger.clone().log("third", Some("idKey"));

        let errors = console.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "first");
        assert_eq!(errors[0].details.as_deref(), Some("apiDomain"));
        assert!(state.lock().config_error_logged);
    }

    #[test]
    fn test_gate_is_per_state() {
        let console = capture_console();
        let a = ConfigErrorLogger::new(Arc::new(Mutex::new(WidgetState::default())), console.clone());
        let b = ConfigErrorLogger::new(Arc::new(Mutex::new(WidgetState::default())), console.clone());

        a.log("boom", None);
        b.log("boom", None);
        a.log("boom", None);

        assert_eq!(console.count_message("boom"), 2);
    }

    #[test]
    fn test_respects_previously_set_flag() {
        let state = Arc::new(Mutex::new(WidgetState {
            config_error_logged: true,
            ..Default::default()
        }));
        let console = capture_console();
        ConfigErrorLogger::new(state, console.clone()).log("boom", None);
        assert!(console.entries().is_empty());
    }
}
