//! Error types for the inkboard ecosystem.

use thiserror::Error;

/// Errors that can occur in inkboard operations.
#[derive(Error, Debug)]
pub enum InkboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream fetch failed: {0}")]
    Fetch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Sync tool '{0}' not found in PATH")]
    ToolNotInstalled(String),

    #[error("Sync tool failed: {0}")]
    Tool(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for InkboardError {
    fn from(err: reqwest::Error) -> Self {
        InkboardError::Fetch(err.to_string())
    }
}

/// Result type alias for inkboard operations.
pub type InkboardResult<T> = Result<T, InkboardError>;
