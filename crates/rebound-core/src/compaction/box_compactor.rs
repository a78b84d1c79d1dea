//! BoxCompactor -- object-safe dynamic dispatch wrapper for Compactor.
//!
//! Follows the same blanket-impl pattern as `BoxSessionService`.

use std::future::Future;
use std::pin::Pin;

use rebound_types::error::CompactionError;

use super::compactor::Compactor;
use crate::runner::AgentRunner;

/// Object-safe version of [`Compactor`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn CompactorDyn`).
/// A blanket implementation is provided for all types implementing `Compactor`.
pub trait CompactorDyn: Send + Sync {
    fn run_compaction_boxed<'a>(
        &'a self,
        runner: &'a dyn AgentRunner,
        app_name: &'a str,
        user_id: &'a str,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, CompactionError>> + Send + 'a>>;
}

impl<T: Compactor> CompactorDyn for T {
    fn run_compaction_boxed<'a>(
        &'a self,
        runner: &'a dyn AgentRunner,
        app_name: &'a str,
        user_id: &'a str,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, CompactionError>> + Send + 'a>> {
        Box::pin(self.run_compaction_for_token_threshold(runner, app_name, user_id, session_id))
    }
}

/// Type-erased compaction routine.
///
/// Since `Compactor` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxCompactor` delegates to the inner `CompactorDyn`.
pub struct BoxCompactor {
    inner: Box<dyn CompactorDyn + Send + Sync>,
}

impl BoxCompactor {
    /// Wrap a concrete `Compactor` in a type-erased box.
    pub fn new<T: Compactor + 'static>(compactor: T) -> Self {
        Self {
            inner: Box::new(compactor),
        }
    }

    pub async fn run_compaction_for_token_threshold(
        &self,
        runner: &dyn AgentRunner,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<bool, CompactionError> {
        self.inner
            .run_compaction_boxed(runner, app_name, user_id, session_id)
            .await
    }
}

impl std::fmt::Debug for BoxCompactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxCompactor").finish_non_exhaustive()
    }
}
