//! Conversion between runtime events and A2A task events.

use serde_json::{Map, Value, json};

use rebound_types::event::{Content, ContentPart, Event};
use rebound_types::session::{RunArgs, RunConfig};
use rebound_types::task::{
    Message, Part, RequestContext, TaskEvent, TaskState, TaskStatus, TaskStatusUpdate,
};

/// Message metadata key that carries an explicit caller identity.
const USER_ID_METADATA_KEY: &str = "user_id";

/// Convert one runtime event into the task events it implies.
///
/// - error events become a `failed` status update carrying the error text;
/// - content events become a `working` status update with an agent message,
///   or `input_required` when a long-running tool call is pending;
/// - events with neither produce nothing.
pub fn convert_event(event: &Event, task_id: &str, context_id: &str) -> Vec<TaskEvent> {
    if event.is_error() {
        let text = event
            .error_message
            .clone()
            .or_else(|| event.error_code.clone())
            .unwrap_or_default();
        let message = Message::agent(vec![Part::text(text)], task_id, context_id);
        return vec![status_update(
            event,
            task_id,
            context_id,
            TaskState::Failed,
            message,
        )];
    }

    let Some(content) = &event.content else {
        return Vec::new();
    };

    let parts: Vec<Part> = content.parts.iter().map(convert_part).collect();
    if parts.is_empty() {
        return Vec::new();
    }

    let state = if awaits_long_running_tool(event) {
        TaskState::InputRequired
    } else {
        TaskState::Working
    };
    let message = Message::agent(parts, task_id, context_id);
    vec![status_update(event, task_id, context_id, state, message)]
}

fn status_update(
    event: &Event,
    task_id: &str,
    context_id: &str,
    state: TaskState,
    message: Message,
) -> TaskEvent {
    let mut metadata = Map::new();
    metadata.insert("author".to_string(), Value::String(event.author.clone()));
    metadata.insert(
        "invocation_id".to_string(),
        Value::String(event.invocation_id.clone()),
    );
    if let Some(code) = &event.error_code {
        metadata.insert("error_code".to_string(), Value::String(code.clone()));
    }

    TaskEvent::StatusUpdate(TaskStatusUpdate {
        task_id: task_id.to_string(),
        context_id: context_id.to_string(),
        status: TaskStatus::new(state, Some(message)),
        is_final: false,
        metadata,
    })
}

fn convert_part(part: &ContentPart) -> Part {
    match part {
        ContentPart::Text { text } => Part::text(text.clone()),
        ContentPart::FunctionCall { id, name, args } => Part::Data {
            data: json!({ "id": id, "name": name, "args": args }),
            data_type: Some("function_call".to_string()),
        },
        ContentPart::FunctionResponse { id, name, response } => Part::Data {
            data: json!({ "id": id, "name": name, "response": response }),
            data_type: Some("function_response".to_string()),
        },
    }
}

fn awaits_long_running_tool(event: &Event) -> bool {
    let Some(content) = &event.content else {
        return false;
    };
    content.parts.iter().any(|part| match part {
        ContentPart::FunctionCall { id, .. } => event.long_running_tool_ids.contains(id),
        _ => false,
    })
}

/// Build the run request for an inbound A2A request.
///
/// The session is keyed by the request's context id. The user is taken from
/// the message's `user_id` metadata when present, otherwise derived from the
/// context id with `user_id_prefix`.
pub fn build_run_args(
    context: &RequestContext,
    run_config: RunConfig,
    user_id_prefix: &str,
) -> RunArgs {
    let user_id = context
        .message
        .as_ref()
        .and_then(|m| m.metadata.get(USER_ID_METADATA_KEY))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{user_id_prefix}{}", context.context_id));

    let parts = context
        .message
        .as_ref()
        .map(|m| m.parts.iter().map(to_content_part).collect())
        .unwrap_or_default();

    RunArgs {
        user_id,
        session_id: context.context_id.clone(),
        new_message: Content {
            role: "user".to_string(),
            parts,
        },
        run_config,
    }
}

fn to_content_part(part: &Part) -> ContentPart {
    match part {
        Part::Text { text } => ContentPart::text(text.clone()),
        Part::Data { data, .. } => ContentPart::text(data.to_string()),
    }
}
