use thiserror::Error;

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid host event: {0}")]
    InvalidEvent(String),

    #[error("Tracker delivery error: {0}")]
    Delivery(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),
}

impl BridgeError {
    /// JSON form handed to a tracker `on_error` callback.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "message": self.to_string() })
    }
}
