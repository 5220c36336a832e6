use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// Fire-and-forget user notifications. Nothing is returned to the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn show_success(&self, message: &str) {
        self.notify(Notification::new(NotificationKind::Success, message));
    }

    fn show_error(&self, message: &str) {
        self.notify(Notification::new(NotificationKind::Error, message));
    }

    fn show_warning(&self, message: &str) {
        self.notify(Notification::new(NotificationKind::Warning, message));
    }

    fn show_info(&self, message: &str) {
        self.notify(Notification::new(NotificationKind::Info, message));
    }
}

/// Broadcasts notifications to every subscribed view and logs them.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<Notification>) {
        let (sender, receiver) = broadcast::channel(capacity);
        (Self { sender }, receiver)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(256).0
    }
}

impl Notifier for NotificationBus {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => tracing::error!(text = %notification.message, "user notification"),
            NotificationKind::Warning => tracing::warn!(text = %notification.message, "user notification"),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(text = %notification.message, "user notification")
            }
        }

        // No subscribers is fine; the message was already logged.
        let _ = self.sender.send(notification);
    }
}

/// Drain whatever is currently queued on a receiver.
pub fn drain(receiver: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(n) => out.push(n),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notification receiver lagged");
            }
            Err(_) => break,
        }
    }
    out
}
