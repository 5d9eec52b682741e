//! Error types for bootstrap operations.

use thiserror::Error;

/// Error type for the bootstrap pipeline.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Step '{name}' failed (exit {exit_code}): {detail}")]
    Step {
        name: String,
        exit_code: i32,
        detail: String,
    },

    #[error("Bootstrap timed out after {0} seconds")]
    Timeout(u64),

    #[error("Completion signal error: {0}")]
    Signal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<String> for BootstrapError {
    fn from(s: String) -> Self {
        BootstrapError::Config(s)
    }
}
