//! SessionService trait definition.
//!
//! Sessions are owned by the hosting runtime. The executor only looks them
//! up and appends events; it never creates or deletes them.

use rebound_types::error::RepositoryError;
use rebound_types::event::Event;
use rebound_types::session::Session;

/// Trait for session stores keyed by (app name, user id, session id).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait SessionService: Send + Sync {
    /// Get a session, or `None` if it does not exist.
    fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    /// Append an event to a session's history, applying its state delta.
    ///
    /// Returns the event as stored.
    fn append_event(
        &self,
        session: &Session,
        event: Event,
    ) -> impl std::future::Future<Output = Result<Event, RepositoryError>> + Send;
}
