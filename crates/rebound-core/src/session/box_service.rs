//! BoxSessionService -- object-safe dynamic dispatch wrapper for SessionService.
//!
//! Same blanket-impl pattern as `BoxCompactor`:
//! 1. Define an object-safe `SessionServiceDyn` trait with boxed futures
//! 2. Blanket-impl `SessionServiceDyn` for all `T: SessionService`
//! 3. `BoxSessionService` wraps `Box<dyn SessionServiceDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use rebound_types::error::RepositoryError;
use rebound_types::event::Event;
use rebound_types::session::Session;

use super::service::SessionService;

/// Object-safe version of [`SessionService`] with boxed futures.
pub trait SessionServiceDyn: Send + Sync {
    fn get_session_boxed<'a>(
        &'a self,
        app_name: &'a str,
        user_id: &'a str,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Session>, RepositoryError>> + Send + 'a>>;

    fn append_event_boxed<'a>(
        &'a self,
        session: &'a Session,
        event: Event,
    ) -> Pin<Box<dyn Future<Output = Result<Event, RepositoryError>> + Send + 'a>>;
}

impl<T: SessionService> SessionServiceDyn for T {
    fn get_session_boxed<'a>(
        &'a self,
        app_name: &'a str,
        user_id: &'a str,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Session>, RepositoryError>> + Send + 'a>> {
        Box::pin(self.get_session(app_name, user_id, session_id))
    }

    fn append_event_boxed<'a>(
        &'a self,
        session: &'a Session,
        event: Event,
    ) -> Pin<Box<dyn Future<Output = Result<Event, RepositoryError>> + Send + 'a>> {
        Box::pin(self.append_event(session, event))
    }
}

/// Type-erased session store, so runners can hold any backend.
pub struct BoxSessionService {
    inner: Box<dyn SessionServiceDyn + Send + Sync>,
}

impl BoxSessionService {
    pub fn new<T: SessionService + 'static>(service: T) -> Self {
        Self {
            inner: Box::new(service),
        }
    }

    pub async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<Session>, RepositoryError> {
        self.inner
            .get_session_boxed(app_name, user_id, session_id)
            .await
    }

    pub async fn append_event(
        &self,
        session: &Session,
        event: Event,
    ) -> Result<Event, RepositoryError> {
        self.inner.append_event_boxed(session, event).await
    }
}

impl std::fmt::Debug for BoxSessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxSessionService").finish_non_exhaustive()
    }
}
