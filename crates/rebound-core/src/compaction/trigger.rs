//! One-shot compaction after a context-window overflow.
//!
//! `CompactionTrigger` decides whether a session can be compacted, installs a
//! temporary compaction config that pins `event_retention_size`, runs the
//! compaction routine once, and removes that override again.
//! Compaction failures never escape: they only mean the retry is skipped.

use std::sync::Arc;

use tracing::{debug, info, warn};

use rebound_types::session::{EventsCompactionConfig, RunArgs};

use super::box_compactor::BoxCompactor;
use crate::runner::{AgentRunner, App, OverrideToken};

/// Events kept uncompacted when the app's config does not set a retention size.
pub const DEFAULT_EVENT_RETENTION_SIZE: usize = 10;

/// Runs the compaction routine on behalf of the retrying executor.
#[derive(Debug)]
pub struct CompactionTrigger {
    compactor: BoxCompactor,
}

impl CompactionTrigger {
    pub fn new(compactor: BoxCompactor) -> Self {
        Self { compactor }
    }

    /// Try to shrink the session named by `run_args`.
    ///
    /// Returns `true` only when the compaction routine reports that it
    /// compacted events. Returns `false` when the app has no compaction
    /// config, the session is missing or empty, or any step fails.
    #[tracing::instrument(
        name = "try_compact_context",
        skip_all,
        fields(
            app_name = %runner.app_name(),
            user_id = %run_args.user_id,
            session_id = %run_args.session_id,
        )
    )]
    pub async fn try_compact_context(&self, runner: &dyn AgentRunner, run_args: &RunArgs) -> bool {
        let Some(config) = runner.app().base_events_compaction_config() else {
            debug!("No events compaction config, skipping compaction");
            return false;
        };

        let app_name = runner.app_name();
        let session = match runner
            .session_service()
            .get_session(app_name, &run_args.user_id, &run_args.session_id)
            .await
        {
            Ok(Some(session)) => session,
            Ok(None) => {
                warn!("Session not found, cannot compact");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Session lookup failed, skipping compaction");
                return false;
            }
        };

        if session.events.is_empty() {
            debug!("Session has no events, nothing to compact");
            return false;
        }

        let retention = config
            .event_retention_size
            .unwrap_or(DEFAULT_EVENT_RETENTION_SIZE);
        let event_count = session.events.len();

        let _guard = RetentionOverride::install(runner.app(), &config, retention);

        match self
            .compactor
            .run_compaction_for_token_threshold(
                runner,
                app_name,
                &run_args.user_id,
                &run_args.session_id,
            )
            .await
        {
            Ok(compacted) => {
                info!(compacted, event_count, retention, "Token-threshold compaction finished");
                compacted
            }
            Err(e) => {
                warn!(error = %e, event_count, retention, "Compaction failed");
                false
            }
        }
    }
}

/// Scoped override of the app's compaction config.
///
/// Installing puts a copy of the base config with `event_retention_size`
/// pinned in effect; dropping removes exactly that override. Removal runs on
/// every exit path, including unwinding and the enclosing future being
/// dropped. Overlapping compactions on one app each remove only their own
/// override, so the base config is in effect again once all have finished.
struct RetentionOverride<'a> {
    app: &'a App,
    token: Option<OverrideToken>,
}

impl<'a> RetentionOverride<'a> {
    fn install(app: &'a App, base: &EventsCompactionConfig, retention: usize) -> Self {
        let temporary = Arc::new(base.with_event_retention_size(retention));
        let token = app.push_compaction_override(temporary);
        Self {
            app,
            token: Some(token),
        }
    }
}

impl Drop for RetentionOverride<'_> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            self.app.remove_compaction_override(token);
            debug!("Removed temporary events compaction config");
        }
    }
}
