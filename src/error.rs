use thiserror::Error;

/// Main error type for the odds service
#[derive(Error, Debug)]
pub enum TdError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("Upstream request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Price errors
    #[error("Invalid American odds: {0}")]
    InvalidOdds(f64),

    // IO errors (roster file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for TdError
pub type Result<T> = std::result::Result<T, TdError>;
