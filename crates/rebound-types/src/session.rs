//! Session, run request, and compaction configuration types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::event::{Content, Event};

/// A conversation owned by the session store, keyed by (app, user, session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub app_name: String,
    pub user_id: String,
    #[serde(default)]
    pub state: Map<String, Value>,
    /// Retained history, oldest first.
    #[serde(default)]
    pub events: Vec<Event>,
    pub last_update_time: DateTime<Utc>,
}

impl Session {
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            app_name: app_name.into(),
            user_id: user_id.into(),
            state: Map::new(),
            events: Vec::new(),
            last_update_time: Utc::now(),
        }
    }
}

/// How the run loop delivers model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamingMode {
    #[default]
    None,
    Sse,
}

impl fmt::Display for StreamingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamingMode::None => write!(f, "none"),
            StreamingMode::Sse => write!(f, "sse"),
        }
    }
}

impl FromStr for StreamingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(StreamingMode::None),
            "sse" => Ok(StreamingMode::Sse),
            other => Err(format!("invalid streaming mode: '{other}'")),
        }
    }
}

/// Per-run knobs passed through to the run loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub streaming_mode: StreamingMode,
    #[serde(default = "default_max_llm_calls")]
    pub max_llm_calls: u32,
}

fn default_max_llm_calls() -> u32 {
    500
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            streaming_mode: StreamingMode::default(),
            max_llm_calls: default_max_llm_calls(),
        }
    }
}

/// Parameters for one invocation of the run loop.
///
/// Passed unchanged to every attempt of a request; only the session's stored
/// history may shrink between attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunArgs {
    pub user_id: String,
    pub session_id: String,
    pub new_message: Content,
    #[serde(default)]
    pub run_config: RunConfig,
}

/// Opaque description of the model used to summarize compacted events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizerSpec {
    pub model: String,
    pub instruction: Option<String>,
}

/// Event compaction settings owned by the agent application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsCompactionConfig {
    /// Number of new invocations that triggers a sliding-window compaction.
    pub compaction_interval: usize,
    /// Invocations shared between consecutive compaction windows.
    pub overlap_size: usize,
    /// Most-recent events kept verbatim by token-threshold compaction.
    #[serde(default)]
    pub event_retention_size: Option<usize>,
    #[serde(default)]
    pub summarizer: Option<SummarizerSpec>,
}

impl EventsCompactionConfig {
    /// Copy of this config with only `event_retention_size` replaced.
    pub fn with_event_retention_size(&self, event_retention_size: usize) -> Self {
        Self {
            event_retention_size: Some(event_retention_size),
            ..self.clone()
        }
    }
}
