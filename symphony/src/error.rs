use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymphonyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model must be trained before starting continuous learning")]
    NotTrained,

    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    #[error("Upstream response error: {0}")]
    Upstream(String),

    #[error("Response timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SymphonyError>;
