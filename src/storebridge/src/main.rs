//! storebridge: replay harness for the storefront tracker bridge.
//!
//! Loads a widget config, simulates the host page (event bus, tracker,
//! console) and replays recorded storefront events through the bridge,
//! printing every tracker call as a JSON line.

mod replay;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use storebridge_core::config::AppConfig;
use storebridge_core::console::tracing_console;
use storebridge_core::{BridgeError, BridgeResult, InMemoryEventBus};
use storebridge_widget::constants::MESSAGE_MISSING_SETTINGS;
use storebridge_widget::{normalize_and_validate_config, HostEnvironment, Widget, WidgetConfig};

use crate::replay::{parse_event_log, StdoutTracker};

#[derive(Parser, Debug)]
#[command(name = "storebridge")]
#[command(about = "Replay storefront events through the tracker bridge")]
#[command(version)]
struct Cli {
    /// Settings file (TOML); environment variables with prefix STOREBRIDGE__ override it
    #[arg(long, global = true, env = "STOREBRIDGE_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize the widget and replay a JSONL event log against it
    Replay {
        /// Raw widget config as the host page would supply it (JSON)
        #[arg(long)]
        widget_config: PathBuf,

        /// Event log, one `{"event": ..., "data": ...}` object per line
        #[arg(long)]
        events: PathBuf,

        /// Run without a tracker installed on the host
        #[arg(long, default_value_t = false)]
        no_tracker: bool,

        /// Delay before the event bus accepts subscriptions (overrides config)
        #[arg(long)]
        event_bus_delay_ms: Option<u64>,
    },
    /// Print the normalized widget config; fails when it is absent or invalid
    Validate {
        #[arg(long)]
        widget_config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A settings file named on the command line must load; without one,
    // a broken environment layer falls back to defaults.
    let (config, fallback) = match AppConfig::load(cli.settings.as_deref()) {
        Ok(config) => (config, None),
        Err(e) if cli.settings.is_none() => (AppConfig::default(), Some(e)),
        Err(e) => return Err(e).context("loading settings"),
    };

    init_tracing(&config);
    if let Some(e) = fallback {
        warn!(error = %e, "failed to load settings, using defaults");
    }

    match cli.command {
        Command::Replay {
            widget_config,
            events,
            no_tracker,
            event_bus_delay_ms,
        } => {
            let mut config = config;
            if no_tracker {
                config.replay.tracker_installed = false;
            }
            if let Some(delay) = event_bus_delay_ms {
                config.replay.event_bus_delay_ms = delay;
            }
            run_replay(&config, &widget_config, &events).await
        }
        Command::Validate { widget_config } => run_validate(&widget_config),
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter.clone().into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_json(path: &Path) -> BridgeResult<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

async fn run_replay(config: &AppConfig, widget_config: &Path, events: &Path) -> anyhow::Result<()> {
    let raw = read_json(widget_config).with_context(|| format!("reading {}", widget_config.display()))?;
    let log = std::fs::read_to_string(events).with_context(|| format!("reading {}", events.display()))?;

    let bus = if config.replay.event_bus_delay_ms > 0 {
        let bus = Arc::new(InMemoryEventBus::pending());
        let delayed = bus.clone();
        let delay = Duration::from_millis(config.replay.event_bus_delay_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            delayed.mark_ready();
        });
        bus
    } else {
        Arc::new(InMemoryEventBus::new())
    };

    let host = HostEnvironment::new(tracing_console()).with_event_bus(bus.clone());
    if config.replay.tracker_installed {
        host.install_tracker(Arc::new(StdoutTracker::new(
            config.replay.failing_operations.clone(),
        )));
    }

    let widget = Widget::attach(Arc::new(host));
    widget.set_config(raw);
    widget.init().await;

    let state = widget.state();
    info!(
        events_bound = state.events_bound,
        collection_view_sent = state.collection_view_sent,
        product_view_sent = state.product_view_sent,
        "widget initialized"
    );

    let interval = Duration::from_millis(config.replay.event_interval_ms);
    let replayed = replay_events(&bus, &log, interval).await;
    info!(replayed, "replay finished");
    Ok(())
}

/// Publish every well-formed line of `log` on `bus`, skipping malformed
/// ones. Returns how many events were published.
async fn replay_events(bus: &InMemoryEventBus, log: &str, interval: Duration) -> usize {
    let mut replayed = 0usize;
    for (line_no, parsed) in parse_event_log(log) {
        match parsed {
            Ok(event) => {
                let handlers = bus.publish(event.event_name(), &event.data);
                info!(line = line_no, event = event.event_name(), handlers, "event replayed");
                replayed += 1;
                if !interval.is_zero() {
                    tokio::time::sleep(interval).await;
                }
            }
            Err(e) => warn!(line = line_no, error = %e, "skipping malformed event"),
        }
    }
    replayed
}

fn run_validate(widget_config: &Path) -> anyhow::Result<()> {
    let raw = read_json(widget_config).with_context(|| format!("reading {}", widget_config.display()))?;
    let config = validate_widget_config(&raw)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Normalized config, or an error when it is absent or misses required
/// settings.
fn validate_widget_config(raw: &Value) -> BridgeResult<WidgetConfig> {
    let config = normalize_and_validate_config(Some(raw))
        .ok_or_else(|| BridgeError::Config("no widget config supplied".into()))?;
    if !config.is_valid {
        return Err(BridgeError::Config(format!(
            "{} {}",
            MESSAGE_MISSING_SETTINGS,
            config.missing_settings_list()
        )));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storebridge_core::console::capture_console;
    use storebridge_core::tracker::capture_tracker;

    #[test]
    fn test_validate_accepts_complete_config() {
        let config = validate_widget_config(&json!({
            "apiDomain": "https://api.mindbox.ru/",
            "idKey": "website"
        }))
        .unwrap();
        assert!(config.is_valid);
        assert_eq!(config.api_domain, "api.mindbox.ru");
    }

    #[test]
    fn test_validate_rejects_missing_settings() {
        let err = validate_widget_config(&json!({ "apiDomain": "api.mindbox.ru" })).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
        let message = err.to_string();
        assert!(message.contains(MESSAGE_MISSING_SETTINGS));
        assert!(message.ends_with("idKey"));
    }

    #[test]
    fn test_validate_rejects_absent_config() {
        let err = validate_widget_config(&Value::Null).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_unreadable_widget_config_is_io_error() {
        let err = read_json(Path::new("/nonexistent/widget.json")).unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }

    #[tokio::test]
    async fn test_replay_dispatches_aliases_and_skips_malformed_lines() {
        let tracker = capture_tracker();
        let bus = Arc::new(InMemoryEventBus::new());
        let host = HostEnvironment::new(capture_console())
            .with_tracker(tracker.clone())
            .with_event_bus(bus.clone());
        let widget = Widget::attach(Arc::new(host));
        widget.set_config(json!({
            "apiDomain": "api.mindbox.ru",
            "idKey": "website",
            "operations": { "setCart": "SetCart", "setWishList": "SetWishList" }
        }));
        widget.init().await;

        let log = concat!(
            r#"{"event":"cart","data":{"order_lines":[{"id":1,"quantity":1,"sale_price":10}]}}"#,
            "\n",
            "not json\n",
            r#"{"event":"favorites","data":{"products":[{"id":7,"price_min":5}]}}"#,
            "\n",
        );
        let replayed = replay_events(&bus, log, Duration::ZERO).await;

        assert_eq!(replayed, 2);
        assert_eq!(tracker.count_operation("SetCart"), 1);
        assert_eq!(tracker.count_operation("SetWishList"), 1);
    }
}
