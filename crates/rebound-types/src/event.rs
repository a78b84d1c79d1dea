//! Runtime event types produced by the agent run loop.
//!
//! An `Event` is one unit of run-loop output: a model message, a tool call,
//! a tool result, a state change, or an error report. Sessions store their
//! history as an ordered sequence of events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Author used for events the executor writes on its own behalf.
pub const SYSTEM_AUTHOR: &str = "system";

/// A single part of a content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    FunctionCall {
        id: String,
        name: String,
        args: Value,
    },
    FunctionResponse {
        id: String,
        name: String,
        response: Value,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }
}

/// A role-tagged block of content parts (a user message or a model turn).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Content {
    /// "user" or "model".
    pub role: String,
    pub parts: Vec<ContentPart>,
}

impl Content {
    /// Build a single-text-part user message.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![ContentPart::text(text)],
        }
    }

    /// Build a single-text-part model message.
    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![ContentPart::text(text)],
        }
    }
}

/// Side effects attached to an event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventActions {
    /// Keys to merge into the session state when the event is appended.
    #[serde(default)]
    pub state_delta: Map<String, Value>,
}

/// One unit of output from the agent run loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub invocation_id: String,
    pub author: String,
    pub content: Option<Content>,
    /// True for streaming chunks that a later event completes.
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub turn_complete: bool,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    #[serde(default)]
    pub actions: EventActions,
    /// Function-call ids whose tools wait on outside input.
    #[serde(default)]
    pub long_running_tool_ids: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Create an empty event for the given invocation and author.
    pub fn new(invocation_id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            invocation_id: invocation_id.into(),
            author: author.into(),
            content: None,
            partial: false,
            turn_complete: false,
            error_code: None,
            error_message: None,
            actions: EventActions::default(),
            long_running_tool_ids: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self.error_message = Some(message.into());
        self
    }

    /// Whether the event carries an error report.
    pub fn is_error(&self) -> bool {
        self.error_code.is_some() || self.error_message.is_some()
    }
}
