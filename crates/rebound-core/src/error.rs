//! Errors surfaced by the executor and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use rebound_types::error::{AgentError, QueueError, RepositoryError};

/// Errors returned by [`crate::executor::AgentExecutor`].
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The run loop failed. Displays the backend's message unchanged.
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("session store error: {0}")]
    Session(#[from] RepositoryError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Errors from loading executor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
