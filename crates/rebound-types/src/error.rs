use thiserror::Error;

/// Errors raised by the agent run loop.
///
/// The executor treats these as opaque: only the rendered message is
/// inspected, so every variant must display the backend's text unchanged.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A failure reported by the model backend, message kept verbatim.
    #[error("{0}")]
    Model(String),

    #[error("tool error: {0}")]
    Tool(String),

    #[error("session error: {0}")]
    Session(#[from] RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from session store operations (used by trait definitions in rebound-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the token-threshold compaction routine.
#[derive(Debug, Error)]
pub enum CompactionError {
    #[error("summarizer failed: {0}")]
    Summarizer(String),

    #[error("session error: {0}")]
    Session(#[from] RepositoryError),

    #[error("compaction failed: {0}")]
    Other(String),
}

/// Errors from publishing to the outbound event queue.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("event queue closed")]
    Closed,
}
