use serde::Deserialize;
use std::path::Path;

use crate::error::BridgeResult;

/// Root application settings. Loaded from an optional TOML file and
/// environment variables with the prefix `STOREBRIDGE__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

/// Host simulation knobs for the replay harness.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub event_interval_ms: u64,
    /// Delay before the in-memory event bus starts accepting subscriptions.
    #[serde(default)]
    pub event_bus_delay_ms: u64,
    #[serde(default = "default_tracker_installed")]
    pub tracker_installed: bool,
    /// Operations the replay tracker rejects through `on_error`.
    #[serde(default)]
    pub failing_operations: Vec<String>,
}

// Default functions
fn default_log_filter() -> String {
    "storebridge=info,storebridge_widget=info".to_string()
}
fn default_tracker_installed() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            event_interval_ms: 0,
            event_bus_delay_ms: 0,
            tracker_installed: default_tracker_installed(),
            failing_operations: Vec::new(),
        }
    }
}

impl AppConfig {
    /// A named file must exist and parse; the environment layer is always
    /// optional.
    pub fn load(file: Option<&Path>) -> BridgeResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("STOREBRIDGE")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("replay.failing_operations"),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.logging.filter, "storebridge=info,storebridge_widget=info");
        assert!(!config.logging.json);
        assert!(config.replay.tracker_installed);
        assert!(config.replay.failing_operations.is_empty());
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/storebridge.toml"))).unwrap_err();
        assert!(matches!(err, crate::error::BridgeError::Settings(_)));
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[replay]\nevent_bus_delay_ms = 250\nfailing_operations = [\"Website.SetCart\"]\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.replay.event_bus_delay_ms, 250);
        assert_eq!(config.replay.failing_operations, vec!["Website.SetCart"]);
        assert!(config.replay.tracker_installed);
        assert_eq!(config.logging.filter, default_log_filter());
    }
}
