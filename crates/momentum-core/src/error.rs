use thiserror::Error;

/// Top-level error type for Momentum.
#[derive(Debug, Error)]
pub enum MomentumError {
    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Storage error. Distinct from "no data": lookups of unknown ids return
    /// empty results, while an unavailable or failing database surfaces here.
    #[error("store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
