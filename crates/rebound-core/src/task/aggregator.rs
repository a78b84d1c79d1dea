//! Folds forwarded status updates into the task's final result.
//!
//! The run loop can report failure, a pending auth flow, or a pending user
//! input in the middle of a stream. Those are remembered here and applied
//! once, in the final status update; intermediate updates are rewritten to
//! `working` so the caller never sees a terminal state before the run ends.

use rebound_types::task::{Message, TaskEvent, TaskState};

/// Running summary of a task's status updates.
///
/// Precedence: failed > auth_required > input_required > working.
#[derive(Debug, Clone)]
pub struct TaskResultAggregator {
    state: TaskState,
    message: Option<Message>,
}

impl Default for TaskResultAggregator {
    fn default() -> Self {
        Self {
            state: TaskState::Working,
            message: None,
        }
    }
}

impl TaskResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event` and rewrite a status update's state to `working`.
    pub fn process_event(&mut self, event: &mut TaskEvent) {
        let TaskEvent::StatusUpdate(update) = event else {
            return;
        };

        match update.status.state {
            TaskState::Failed => {
                self.state = TaskState::Failed;
                self.message = update.status.message.clone();
            }
            TaskState::AuthRequired if self.state != TaskState::Failed => {
                self.state = TaskState::AuthRequired;
                self.message = update.status.message.clone();
            }
            TaskState::InputRequired
                if !matches!(self.state, TaskState::Failed | TaskState::AuthRequired) =>
            {
                self.state = TaskState::InputRequired;
                self.message = update.status.message.clone();
            }
            TaskState::Working if self.state == TaskState::Working => {
                self.message = update.status.message.clone();
            }
            _ => {}
        }

        update.status.state = TaskState::Working;
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Message that accompanies the aggregated state.
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
