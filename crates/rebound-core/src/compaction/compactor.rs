//! Compactor trait definition.
//!
//! The compaction routine summarizes or trims the oldest events of a session
//! once its token footprint crosses a threshold. It reads its settings from
//! `runner.app().events_compaction_config()` at call time, which is how the
//! trigger's temporary retention override reaches it.

use rebound_types::error::CompactionError;

use crate::runner::AgentRunner;

/// Trait for token-threshold compaction backends.
///
/// Implementations live with the hosting runtime. Uses native async fn in
/// traits (RPITIT, Rust 2024 edition).
pub trait Compactor: Send + Sync {
    /// Compact the session if it is over the token threshold.
    ///
    /// Returns `Ok(true)` when events were compacted and `Ok(false)` when
    /// there was nothing to do.
    fn run_compaction_for_token_threshold(
        &self,
        runner: &dyn AgentRunner,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<bool, CompactionError>> + Send;
}
