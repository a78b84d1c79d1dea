//! Scripted collaborators shared by the unit tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use rebound_types::error::{AgentError, CompactionError, RepositoryError};
use rebound_types::event::{Content, Event};
use rebound_types::session::{EventsCompactionConfig, RunArgs, RunConfig, Session};

use crate::compaction::Compactor;
use crate::runner::{AgentRunner, App, EventStream};
use crate::session::{BoxSessionService, SessionService};

pub const APP_NAME: &str = "test_app";
pub const USER_ID: &str = "user123";
pub const SESSION_ID: &str = "session123";

pub fn run_args() -> RunArgs {
    RunArgs {
        user_id: USER_ID.to_string(),
        session_id: SESSION_ID.to_string(),
        new_message: Content::user_text("hello"),
        run_config: RunConfig::default(),
    }
}

pub fn compaction_config(event_retention_size: Option<usize>) -> EventsCompactionConfig {
    EventsCompactionConfig {
        compaction_interval: 5,
        overlap_size: 2,
        event_retention_size,
        summarizer: None,
    }
}

pub fn session_with_events(count: usize) -> Session {
    let mut session = Session::new(APP_NAME, USER_ID, SESSION_ID);
    session.events = (0..count)
        .map(|i| Event::new(format!("inv-{i}"), "user").with_content(Content::user_text("hi")))
        .collect();
    session
}

pub fn text_event(text: &str) -> Event {
    Event::new("inv-run", "assistant").with_content(Content::model_text(text))
}

// --- Session store ---

pub enum Lookup {
    Found(Session),
    Missing,
    Fail(String),
}

#[derive(Default)]
pub struct SessionProbe {
    pub get_calls: AtomicUsize,
    pub appended: Mutex<Vec<Event>>,
}

impl SessionProbe {
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

pub struct MockSessionService {
    lookup: Lookup,
    probe: Arc<SessionProbe>,
}

impl SessionService for MockSessionService {
    fn get_session(
        &self,
        _app_name: &str,
        _user_id: &str,
        _session_id: &str,
    ) -> impl Future<Output = Result<Option<Session>, RepositoryError>> + Send {
        self.probe.get_calls.fetch_add(1, Ordering::SeqCst);
        let result = match &self.lookup {
            Lookup::Found(session) => Ok(Some(session.clone())),
            Lookup::Missing => Ok(None),
            Lookup::Fail(message) => Err(RepositoryError::Query(message.clone())),
        };
        async move { result }
    }

    fn append_event(
        &self,
        _session: &Session,
        event: Event,
    ) -> impl Future<Output = Result<Event, RepositoryError>> + Send {
        self.probe.appended.lock().unwrap().push(event.clone());
        async move { Ok(event) }
    }
}

// --- Run loop ---

#[derive(Clone)]
pub enum Step {
    Emit(Event),
    Fail(String),
}

pub struct MockRunner {
    app: App,
    sessions: BoxSessionService,
    scripts: Mutex<VecDeque<Vec<Step>>>,
    pub run_calls: Mutex<Vec<RunArgs>>,
}

impl MockRunner {
    pub fn new(
        config: Option<EventsCompactionConfig>,
        lookup: Lookup,
    ) -> (Self, Arc<SessionProbe>) {
        let probe = Arc::new(SessionProbe::default());
        let sessions = BoxSessionService::new(MockSessionService {
            lookup,
            probe: probe.clone(),
        });
        let runner = Self {
            app: App::new(APP_NAME, config),
            sessions,
            scripts: Mutex::new(VecDeque::new()),
            run_calls: Mutex::new(Vec::new()),
        };
        (runner, probe)
    }

    /// Queue the steps of the next run attempt.
    pub fn script(self, steps: Vec<Step>) -> Self {
        self.scripts.lock().unwrap().push_back(steps);
        self
    }

    pub fn run_count(&self) -> usize {
        self.run_calls.lock().unwrap().len()
    }
}

impl AgentRunner for MockRunner {
    fn app(&self) -> &App {
        &self.app
    }

    fn session_service(&self) -> &BoxSessionService {
        &self.sessions
    }

    fn run_async(&self, args: RunArgs) -> EventStream {
        self.run_calls.lock().unwrap().push(args);
        let steps = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        Box::pin(async_stream::stream! {
            for step in steps {
                match step {
                    Step::Emit(event) => yield Ok(event),
                    Step::Fail(message) => {
                        yield Err(AgentError::Model(message));
                        break;
                    }
                }
            }
        })
    }
}

// --- Compaction routine ---

#[derive(Clone)]
pub enum Outcome {
    Compacted(bool),
    Fail(String),
    Hang,
}

#[derive(Default)]
pub struct CompactorProbe {
    pub calls: AtomicUsize,
    /// Config installed on the app at the moment each call started.
    pub seen_configs: Mutex<Vec<Option<Arc<EventsCompactionConfig>>>>,
    pub seen_keys: Mutex<Vec<(String, String, String)>>,
}

impl CompactorProbe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_seen_config(&self) -> Option<Arc<EventsCompactionConfig>> {
        self.seen_configs.lock().unwrap().last().cloned().flatten()
    }
}

pub struct MockCompactor {
    outcome: Outcome,
    probe: Arc<CompactorProbe>,
}

impl MockCompactor {
    pub fn new(outcome: Outcome) -> (Self, Arc<CompactorProbe>) {
        let probe = Arc::new(CompactorProbe::default());
        (
            Self {
                outcome,
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl Compactor for MockCompactor {
    fn run_compaction_for_token_threshold(
        &self,
        runner: &dyn AgentRunner,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> impl Future<Output = Result<bool, CompactionError>> + Send {
        self.probe.calls.fetch_add(1, Ordering::SeqCst);
        self.probe
            .seen_configs
            .lock()
            .unwrap()
            .push(runner.app().events_compaction_config());
        self.probe.seen_keys.lock().unwrap().push((
            app_name.to_string(),
            user_id.to_string(),
            session_id.to_string(),
        ));
        let outcome = self.outcome.clone();
        async move {
            match outcome {
                Outcome::Compacted(compacted) => Ok(compacted),
                Outcome::Fail(message) => Err(CompactionError::Summarizer(message)),
                Outcome::Hang => std::future::pending().await,
            }
        }
    }
}

/// Compaction routine that waits for the test to release each call.
///
/// Calls take gates in the order they start; each resolves with the value
/// sent on its gate.
pub struct GatedCompactor {
    gates: Mutex<VecDeque<oneshot::Receiver<bool>>>,
}

impl GatedCompactor {
    pub fn new(calls: usize) -> (Self, Vec<oneshot::Sender<bool>>) {
        let (senders, receivers) = (0..calls).map(|_| oneshot::channel()).unzip();
        (
            Self {
                gates: Mutex::new(receivers),
            },
            senders,
        )
    }
}

impl Compactor for GatedCompactor {
    fn run_compaction_for_token_threshold(
        &self,
        _runner: &dyn AgentRunner,
        _app_name: &str,
        _user_id: &str,
        _session_id: &str,
    ) -> impl Future<Output = Result<bool, CompactionError>> + Send {
        let gate = self.gates.lock().unwrap().pop_front();
        async move {
            match gate {
                Some(gate) => gate
                    .await
                    .map_err(|_| CompactionError::Summarizer("gate dropped".to_string())),
                None => Ok(false),
            }
        }
    }
}
