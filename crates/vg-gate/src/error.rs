//! Errors outside of log parsing.

use std::time::Duration;

/// Invalid configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Failure to produce a log by running Valgrind.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("No command given to run under valgrind")]
    EmptyCommand,

    #[error("{bin} not available: {reason}")]
    ValgrindUnavailable { bin: String, reason: String },

    #[error("Failed to run valgrind: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}
