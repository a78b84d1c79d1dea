//! A2A task types published by the executor.
//!
//! These model the task lifecycle seen by the remote caller: the task record,
//! status updates streamed while the agent runs, and artifact updates that
//! carry the final answer.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Lifecycle state of an A2A task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    AuthRequired,
    Completed,
    Failed,
    Canceled,
}

impl TaskState {
    /// Whether no further updates follow this state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Submitted => write!(f, "submitted"),
            TaskState::Working => write!(f, "working"),
            TaskState::InputRequired => write!(f, "input-required"),
            TaskState::AuthRequired => write!(f, "auth-required"),
            TaskState::Completed => write!(f, "completed"),
            TaskState::Failed => write!(f, "failed"),
            TaskState::Canceled => write!(f, "canceled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// A part of an A2A message or artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text {
        text: String,
    },
    Data {
        data: Value,
        /// What the structured payload represents (e.g. "function_call").
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data_type: Option<String>,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub role: Role,
    pub parts: Vec<Part>,
    pub task_id: Option<String>,
    pub context_id: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Message {
    /// Build an agent-authored message for a task.
    pub fn agent(parts: Vec<Part>, task_id: &str, context_id: &str) -> Self {
        Self {
            message_id: Uuid::now_v7().to_string(),
            role: Role::Agent,
            parts,
            task_id: Some(task_id.to_string()),
            context_id: Some(context_id.to_string()),
            metadata: Map::new(),
        }
    }

    /// Build a user-authored message.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            message_id: Uuid::now_v7().to_string(),
            role: Role::User,
            parts,
            task_id: None,
            context_id: None,
            metadata: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    pub message: Option<Message>,
    pub timestamp: DateTime<Utc>,
}

impl TaskStatus {
    pub fn new(state: TaskState, message: Option<Message>) -> Self {
        Self {
            state,
            message,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub history: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub artifact_id: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    pub task_id: String,
    pub context_id: String,
    pub status: TaskStatus,
    /// True on the last update of the task.
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskArtifactUpdate {
    pub task_id: String,
    pub context_id: String,
    pub artifact: Artifact,
    pub last_chunk: bool,
}

/// Everything the executor publishes to the outbound event queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskEvent {
    Task(Task),
    StatusUpdate(TaskStatusUpdate),
    ArtifactUpdate(TaskArtifactUpdate),
}

impl TaskEvent {
    /// Build a status update event.
    pub fn status(
        task_id: &str,
        context_id: &str,
        state: TaskState,
        message: Option<Message>,
        is_final: bool,
    ) -> Self {
        TaskEvent::StatusUpdate(TaskStatusUpdate {
            task_id: task_id.to_string(),
            context_id: context_id.to_string(),
            status: TaskStatus::new(state, message),
            is_final,
            metadata: Map::new(),
        })
    }

    /// State carried by a status update or task record, if any.
    pub fn state(&self) -> Option<TaskState> {
        match self {
            TaskEvent::Task(task) => Some(task.status.state),
            TaskEvent::StatusUpdate(update) => Some(update.status.state),
            TaskEvent::ArtifactUpdate(_) => None,
        }
    }
}

/// Inbound request as seen by the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    pub task_id: String,
    pub context_id: String,
    pub message: Option<Message>,
    pub current_task: Option<Task>,
    /// Transport headers of the inbound call.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn new(task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
            message: None,
            current_task: None,
            headers: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::InputRequired.is_terminal());
    }

    #[test]
    fn test_task_state_serde_matches_display() {
        let json = serde_json::to_value(TaskState::InputRequired).unwrap();
        assert_eq!(json, "input-required");
        assert_eq!(TaskState::InputRequired.to_string(), "input-required");
    }

    #[test]
    fn test_status_update_serializes_final_flag() {
        let event = TaskEvent::status("task123", "context123", TaskState::Working, None, false);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "status-update");
        assert_eq!(json["final"], false);
        assert_eq!(event.state(), Some(TaskState::Working));
    }

    #[test]
    fn test_agent_message_carries_ids() {
        let message = Message::agent(vec![Part::text("hi")], "task123", "context123");
        assert_eq!(message.role, Role::Agent);
        assert_eq!(message.task_id.as_deref(), Some("task123"));
        assert_eq!(message.context_id.as_deref(), Some("context123"));
    }
}
