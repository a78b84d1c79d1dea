//! Agent executor with one-shot context-overflow recovery.
//!
//! `AgentExecutor` drives one inbound A2A request: it runs the agent loop,
//! converts and forwards every event to the task event queue, and publishes
//! the task's final status. When the run fails because the conversation no
//! longer fits the model's context window, the executor compacts the session
//! once and retries the run once. Every other failure, and any failure of the
//! retried run, is returned unchanged.

use futures_util::StreamExt;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use rebound_types::config::ExecutorConfig;
use rebound_types::event::{Event, SYSTEM_AUTHOR};
use rebound_types::session::{RunArgs, RunConfig};
use rebound_types::task::{
    Artifact, Message, Part, RequestContext, Task, TaskArtifactUpdate, TaskEvent, TaskState,
    TaskStatus,
};

use crate::classify::ContextWindowClassifier;
use crate::compaction::{BoxCompactor, CompactionTrigger};
use crate::error::ExecutorError;
use crate::queue::EventQueue;
use crate::runner::AgentRunner;
use crate::task::{TaskResultAggregator, build_run_args, convert_event};

/// Invocation id of the system event that records request headers.
const HEADER_UPDATE_INVOCATION_ID: &str = "header_update";

/// Session state key under which request headers are stored.
const HEADERS_STATE_KEY: &str = "headers";

/// Runs agent requests and recovers once from context-window overflow.
#[derive(Debug)]
pub struct AgentExecutor {
    trigger: CompactionTrigger,
    classifier: ContextWindowClassifier,
    config: ExecutorConfig,
}

impl AgentExecutor {
    pub fn new(compactor: BoxCompactor, config: ExecutorConfig) -> Self {
        Self {
            trigger: CompactionTrigger::new(compactor),
            classifier: ContextWindowClassifier::new(&config.extra_context_window_markers),
            config,
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Build the run request for `context` using the configured user prefix.
    pub fn run_args(&self, context: &RequestContext, run_config: RunConfig) -> RunArgs {
        build_run_args(context, run_config, &self.config.user_id_prefix)
    }

    /// Execute a request end to end, reporting failures through the queue.
    ///
    /// Publishes a `submitted` task for new requests, then runs
    /// [`handle_request`](Self::handle_request). A run failure becomes a final
    /// `failed` status update carrying the error text. Only queue failures
    /// are returned, since the caller can no longer be told anything else.
    #[tracing::instrument(
        name = "execute",
        skip_all,
        fields(task_id = %context.task_id, context_id = %context.context_id)
    )]
    pub async fn execute<Q: EventQueue>(
        &self,
        context: &RequestContext,
        event_queue: &Q,
        runner: &dyn AgentRunner,
        run_args: RunArgs,
    ) -> Result<(), ExecutorError> {
        if context.current_task.is_none() {
            let task = Task {
                id: context.task_id.clone(),
                context_id: context.context_id.clone(),
                status: TaskStatus::new(TaskState::Submitted, None),
                history: context.message.iter().cloned().collect(),
            };
            event_queue.enqueue_event(TaskEvent::Task(task)).await?;
        }

        match self
            .handle_request(context, event_queue, runner, run_args)
            .await
        {
            Ok(()) => Ok(()),
            Err(ExecutorError::Queue(e)) => Err(e.into()),
            Err(err) => {
                error!(error = %err, "Agent run failed");
                let message = Message::agent(
                    vec![Part::text(err.to_string())],
                    &context.task_id,
                    &context.context_id,
                );
                event_queue
                    .enqueue_event(TaskEvent::status(
                        &context.task_id,
                        &context.context_id,
                        TaskState::Failed,
                        Some(message),
                        true,
                    ))
                    .await?;
                Ok(())
            }
        }
    }

    /// Run the agent for one request, compacting and retrying at most once.
    ///
    /// Events from an aborted first attempt stay published; the retry's
    /// events follow them on the same queue.
    #[tracing::instrument(
        name = "handle_request",
        skip_all,
        fields(
            task_id = %context.task_id,
            user_id = %run_args.user_id,
            session_id = %run_args.session_id,
        )
    )]
    pub async fn handle_request<Q: EventQueue>(
        &self,
        context: &RequestContext,
        event_queue: &Q,
        runner: &dyn AgentRunner,
        run_args: RunArgs,
    ) -> Result<(), ExecutorError> {
        self.record_request_headers(context, runner, &run_args).await?;

        event_queue
            .enqueue_event(TaskEvent::status(
                &context.task_id,
                &context.context_id,
                TaskState::Working,
                None,
                false,
            ))
            .await?;

        let mut aggregator = TaskResultAggregator::new();

        match self
            .run_once(context, event_queue, runner, &run_args, &mut aggregator)
            .await
        {
            Ok(()) => {}
            Err(ExecutorError::Agent(err)) if self.classifier.is_context_window_error(&err) => {
                if !self.config.retry_on_context_overflow {
                    debug!("Context overflow recovery disabled");
                    return Err(err.into());
                }

                warn!(error = %err, "Context window exceeded, attempting compaction");
                if !self.trigger.try_compact_context(runner, &run_args).await {
                    warn!("Compaction did not run, returning original error");
                    return Err(err.into());
                }

                info!("Session compacted, retrying run");
                aggregator.reset();
                self.run_once(context, event_queue, runner, &run_args, &mut aggregator)
                    .await?;
            }
            Err(err) => return Err(err),
        }

        self.publish_final_status(context, event_queue, &aggregator).await
    }

    /// Stream one run of the agent loop into the queue.
    async fn run_once<Q: EventQueue>(
        &self,
        context: &RequestContext,
        event_queue: &Q,
        runner: &dyn AgentRunner,
        run_args: &RunArgs,
        aggregator: &mut TaskResultAggregator,
    ) -> Result<(), ExecutorError> {
        let mut events = runner.run_async(run_args.clone());

        while let Some(item) = events.next().await {
            let event = item?;
            for mut task_event in convert_event(&event, &context.task_id, &context.context_id) {
                aggregator.process_event(&mut task_event);
                event_queue.enqueue_event(task_event).await?;
            }
        }

        Ok(())
    }

    /// Store the inbound headers in session state via a system event.
    ///
    /// Skipped when the session does not exist yet; the executor never
    /// creates sessions.
    async fn record_request_headers(
        &self,
        context: &RequestContext,
        runner: &dyn AgentRunner,
        run_args: &RunArgs,
    ) -> Result<(), ExecutorError> {
        let sessions = runner.session_service();
        let Some(session) = sessions
            .get_session(runner.app_name(), &run_args.user_id, &run_args.session_id)
            .await?
        else {
            debug!("Session not found, skipping header state update");
            return Ok(());
        };

        let headers: Map<String, Value> = context
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        let mut event = Event::new(HEADER_UPDATE_INVOCATION_ID, SYSTEM_AUTHOR);
        event
            .actions
            .state_delta
            .insert(HEADERS_STATE_KEY.to_string(), Value::Object(headers));

        sessions.append_event(&session, event).await?;
        Ok(())
    }

    /// Publish the final status derived from the aggregated updates.
    ///
    /// A run that ends in `working` with an agent message completes the task
    /// and publishes that message as the result artifact.
    async fn publish_final_status<Q: EventQueue>(
        &self,
        context: &RequestContext,
        event_queue: &Q,
        aggregator: &TaskResultAggregator,
    ) -> Result<(), ExecutorError> {
        let task_id = &context.task_id;
        let context_id = &context.context_id;

        match (aggregator.state(), aggregator.message()) {
            (TaskState::Working, Some(message)) if !message.parts.is_empty() => {
                event_queue
                    .enqueue_event(TaskEvent::ArtifactUpdate(TaskArtifactUpdate {
                        task_id: task_id.clone(),
                        context_id: context_id.clone(),
                        artifact: Artifact {
                            artifact_id: Uuid::now_v7().to_string(),
                            parts: message.parts.clone(),
                        },
                        last_chunk: true,
                    }))
                    .await?;
                event_queue
                    .enqueue_event(TaskEvent::status(
                        task_id,
                        context_id,
                        TaskState::Completed,
                        None,
                        true,
                    ))
                    .await?;
            }
            (TaskState::Working, _) => {
                event_queue
                    .enqueue_event(TaskEvent::status(
                        task_id,
                        context_id,
                        TaskState::Completed,
                        None,
                        true,
                    ))
                    .await?;
            }
            (state, message) => {
                event_queue
                    .enqueue_event(TaskEvent::status(
                        task_id,
                        context_id,
                        state,
                        message.cloned(),
                        true,
                    ))
                    .await?;
            }
        }

        Ok(())
    }
}
