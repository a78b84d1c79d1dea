//! Agent runtime port.
//!
//! `AgentRunner` is the seam to the agent execution loop: it owns the
//! application object, exposes the session store, and turns a `RunArgs`
//! into a stream of events. The executor never looks inside a run; it only
//! forwards events and reacts to the error that ends a stream.

use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};

use futures_util::Stream;

use rebound_types::error::AgentError;
use rebound_types::event::Event;
use rebound_types::session::{EventsCompactionConfig, RunArgs};

use crate::session::BoxSessionService;

/// Stream of events produced by one run of the agent loop.
///
/// A stream ends either normally or with a single `Err` item.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<Event, AgentError>> + Send + 'static>>;

/// The agent application: its name and mutable compaction settings.
///
/// The compaction config has two layers. The base config is the app's
/// steady state. Temporary overrides stack on top of it, each removed by the
/// token it was installed with, so overlapping overrides can end in any
/// order and the base comes back once the last one is gone.
///
/// The lock is held only for the duration of a read or an update.
#[derive(Debug)]
pub struct App {
    name: String,
    compaction: RwLock<CompactionSettings>,
}

#[derive(Debug, Default)]
struct CompactionSettings {
    base: Option<Arc<EventsCompactionConfig>>,
    overrides: Vec<(u64, Arc<EventsCompactionConfig>)>,
    next_token: u64,
}

/// Handle for removing one override installed on an [`App`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the override stays in effect until this token is removed"]
pub struct OverrideToken(u64);

impl App {
    pub fn new(name: impl Into<String>, config: Option<EventsCompactionConfig>) -> Self {
        Self {
            name: name.into(),
            compaction: RwLock::new(CompactionSettings {
                base: config.map(Arc::new),
                ..CompactionSettings::default()
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compaction settings in effect right now: the most recent override, or
    /// the base config. `None` when compaction is not enabled.
    pub fn events_compaction_config(&self) -> Option<Arc<EventsCompactionConfig>> {
        let settings = self
            .compaction
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match settings.overrides.last() {
            Some((_, config)) => Some(config.clone()),
            None => settings.base.clone(),
        }
    }

    /// The app's own compaction settings, ignoring any override.
    pub fn base_events_compaction_config(&self) -> Option<Arc<EventsCompactionConfig>> {
        self.compaction
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .base
            .clone()
    }

    /// Install `config` as the base config, returning the previous base.
    pub fn replace_events_compaction_config(
        &self,
        config: Option<Arc<EventsCompactionConfig>>,
    ) -> Option<Arc<EventsCompactionConfig>> {
        let mut settings = self
            .compaction
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut settings.base, config)
    }

    /// Put `config` in effect on top of the base until the token is removed.
    pub fn push_compaction_override(&self, config: Arc<EventsCompactionConfig>) -> OverrideToken {
        let mut settings = self
            .compaction
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let token = settings.next_token;
        settings.next_token += 1;
        settings.overrides.push((token, config));
        OverrideToken(token)
    }

    /// Remove the override installed with `token`. Other overrides stay.
    pub fn remove_compaction_override(&self, token: OverrideToken) {
        let mut settings = self
            .compaction
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        settings.overrides.retain(|(id, _)| *id != token.0);
    }
}

/// Trait for agent runtimes driven by the executor.
///
/// Object-safe: the executor and the compaction routine take it as
/// `&dyn AgentRunner`.
pub trait AgentRunner: Send + Sync {
    /// The application this runner executes.
    fn app(&self) -> &App;

    /// Application name used to key sessions.
    fn app_name(&self) -> &str {
        self.app().name()
    }

    /// Session store backing this runner.
    fn session_service(&self) -> &BoxSessionService;

    /// Start one run of the agent loop.
    fn run_async(&self, args: RunArgs) -> EventStream;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(retention: Option<usize>) -> EventsCompactionConfig {
        EventsCompactionConfig {
            compaction_interval: 5,
            overlap_size: 2,
            event_retention_size: retention,
            summarizer: None,
        }
    }

    fn retention(app: &App) -> Option<usize> {
        app.events_compaction_config()
            .and_then(|config| config.event_retention_size)
    }

    #[test]
    fn test_app_without_compaction_config() {
        let app = App::new("test_app", None);
        assert_eq!(app.name(), "test_app");
        assert!(app.events_compaction_config().is_none());
    }

    #[test]
    fn test_replace_returns_previous_config() {
        let app = App::new("test_app", Some(config(Some(10))));
        let original = app.events_compaction_config().unwrap();

        let replacement = Arc::new(config(Some(3)));
        let previous = app.replace_events_compaction_config(Some(replacement.clone()));

        assert!(Arc::ptr_eq(&previous.unwrap(), &original));
        assert!(Arc::ptr_eq(
            &app.events_compaction_config().unwrap(),
            &replacement
        ));
    }

    #[test]
    fn test_override_shadows_base_until_removed() {
        let app = App::new("test_app", Some(config(None)));
        let base = app.events_compaction_config().unwrap();

        let token = app.push_compaction_override(Arc::new(config(Some(10))));
        assert_eq!(retention(&app), Some(10));
        assert!(Arc::ptr_eq(&app.base_events_compaction_config().unwrap(), &base));

        app.remove_compaction_override(token);
        assert!(Arc::ptr_eq(&app.events_compaction_config().unwrap(), &base));
    }

    #[test]
    fn test_overlapping_overrides_removed_out_of_order() {
        let app = App::new("test_app", Some(config(None)));
        let base = app.events_compaction_config().unwrap();

        let first = app.push_compaction_override(Arc::new(config(Some(10))));
        let second = app.push_compaction_override(Arc::new(config(Some(20))));
        assert_eq!(retention(&app), Some(20));

        app.remove_compaction_override(first);
        assert_eq!(retention(&app), Some(20));

        app.remove_compaction_override(second);
        assert!(Arc::ptr_eq(&app.events_compaction_config().unwrap(), &base));
    }

    #[test]
    fn test_replace_under_override_changes_base_only() {
        let app = App::new("test_app", Some(config(None)));
        let token = app.push_compaction_override(Arc::new(config(Some(10))));

        let replacement = Arc::new(config(Some(3)));
        app.replace_events_compaction_config(Some(replacement.clone()));
        assert_eq!(retention(&app), Some(10));

        app.remove_compaction_override(token);
        assert!(Arc::ptr_eq(&app.events_compaction_config().unwrap(), &replacement));
    }

    #[test]
    fn test_config_reads_share_the_same_arc() {
        let app = App::new("test_app", Some(config(None)));
        let a = app.events_compaction_config().unwrap();
        let b = app.events_compaction_config().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
