use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::error;
use uuid::Uuid;

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    WorkOrderCreated(Uuid),
    WorkOrderStarted(Uuid),
    WorkOrderCompleted {
        work_order_id: Uuid,
        actual_time: f64,
    },
    WorkOrderCancelled(Uuid),
    ProgressRecorded(Uuid),
    PhotoAttached {
        work_order_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging rather than propagating a failure. State
    /// changes must not be rolled back because a listener went away.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            error!("{}", e);
        }
    }
}

/// Creates a bounded event channel and its sender wrapper.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_events_in_order() {
        let (sender, mut rx) = channel(8);
        let id = Uuid::new_v4();
        sender.send(Event::WorkOrderCreated(id)).await.unwrap();
        sender.send(Event::WorkOrderStarted(id)).await.unwrap();

        assert!(matches!(rx.recv().await, Some(Event::WorkOrderCreated(got)) if got == id));
        assert!(matches!(rx.recv().await, Some(Event::WorkOrderStarted(got)) if got == id));
    }

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (sender, rx) = channel(1);
        drop(rx);
        // Must not panic or error out.
        sender.send_or_log(Event::WorkOrderCancelled(Uuid::new_v4())).await;
    }
}
