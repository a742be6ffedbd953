//! Fire-and-forget user notifications (the UI's toast sink).

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

/// A user-facing toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn order_submitted(valve_tag: &str) -> Self {
        Self {
            title: "Work Order Created".to_string(),
            description: format!(
                "Work order for {} has been created successfully.",
                valve_tag
            ),
        }
    }

    pub fn work_started() -> Self {
        Self {
            title: "Work Started".to_string(),
            description: "Timer started. Photos will track actual work time.".to_string(),
        }
    }

    pub fn work_completed() -> Self {
        Self {
            title: "Work Completed".to_string(),
            description: "Work order marked as complete. Man hours calculated automatically."
                .to_string(),
        }
    }

    pub fn progress_updated() -> Self {
        Self {
            title: "Progress Updated".to_string(),
            description: "Work order progress has been saved.".to_string(),
        }
    }
}

/// Sink for user notifications. Implementations must never block the
/// caller; a slow or absent UI costs a dropped toast, not a stalled
/// transition.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forwards notifications over a bounded channel to the UI shell.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.sender.try_send(notification) {
            warn!("Dropping notification: {}", e);
        }
    }
}

/// Discards everything. For tests and headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: Notification) {}
}
