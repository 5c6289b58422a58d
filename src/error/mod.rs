//! Error types for kubetriage

use thiserror::Error;

/// Main error type for kubetriage
#[derive(Debug, Error)]
pub enum KtError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Watch stream error: {0}")]
    Watch(#[from] kube::runtime::watcher::Error),

    #[error("Pod not found: {namespace}/{name}")]
    PodNotFound { name: String, namespace: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Timeout waiting for {0}")]
    Timeout(String),
}

impl From<serde_json::Error> for KtError {
    fn from(e: serde_json::Error) -> Self {
        KtError::Serialization(e.to_string())
    }
}

/// Result type alias for kubetriage
pub type Result<T> = std::result::Result<T, KtError>;
