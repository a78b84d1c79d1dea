//! Outbound task event queue.
//!
//! The executor publishes every task event through an `EventQueue`. The
//! transport layer drains it and relays events to the remote caller.

use rebound_types::error::QueueError;
use rebound_types::task::TaskEvent;
use tokio::sync::mpsc;

/// Trait for sinks that accept task events in publish order.
pub trait EventQueue: Send + Sync {
    fn enqueue_event(
        &self,
        event: TaskEvent,
    ) -> impl std::future::Future<Output = Result<(), QueueError>> + Send;
}

/// Event queue backed by a bounded `tokio::sync::mpsc` channel.
///
/// Publishing waits for capacity, so a slow consumer applies backpressure
/// to the run loop. Publishing after the receiver is dropped fails with
/// [`QueueError::Closed`].
#[derive(Debug, Clone)]
pub struct ChannelEventQueue {
    sender: mpsc::Sender<TaskEvent>,
}

impl ChannelEventQueue {
    /// Create a queue and the receiver that drains it.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<TaskEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    pub fn from_sender(sender: mpsc::Sender<TaskEvent>) -> Self {
        Self { sender }
    }
}

impl EventQueue for ChannelEventQueue {
    async fn enqueue_event(&self, event: TaskEvent) -> Result<(), QueueError> {
        self.sender.send(event).await.map_err(|_| QueueError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebound_types::task::TaskState;

    #[tokio::test]
    async fn test_enqueue_delivers_in_order() {
        let (queue, mut rx) = ChannelEventQueue::new(8);

        queue
            .enqueue_event(TaskEvent::status("t", "c", TaskState::Submitted, None, false))
            .await
            .unwrap();
        queue
            .enqueue_event(TaskEvent::status("t", "c", TaskState::Working, None, false))
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().state(), Some(TaskState::Submitted));
        assert_eq!(rx.recv().await.unwrap().state(), Some(TaskState::Working));
    }

    #[tokio::test]
    async fn test_enqueue_after_receiver_dropped_fails() {
        let (queue, rx) = ChannelEventQueue::new(1);
        drop(rx);

        let result = queue
            .enqueue_event(TaskEvent::status("t", "c", TaskState::Working, None, false))
            .await;
        assert!(matches!(result, Err(QueueError::Closed)));
    }
}
