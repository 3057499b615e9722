//! Notification delivery seam
//!
//! Notifications are best-effort: the ledger is the source of truth, a lost
//! notification is logged and dropped.

use async_trait::async_trait;
use repbank_core::Notification;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification channel closed")]
    ChannelClosed,

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Trait for notification collaborators
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Get the notifier name (for logging)
    fn name(&self) -> &str;

    /// Deliver one notification
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to the log
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            user_id = %notification.user_id,
            kind = %notification.kind,
            action_url = notification.action_url.as_deref().unwrap_or(""),
            "{}",
            notification.message
        );
        Ok(())
    }
}

/// Forwards notifications into a tokio channel
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    fn name(&self) -> &str {
        "channel"
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.tx
            .send(notification.clone())
            .map_err(|_| NotifyError::ChannelClosed)
    }
}

/// Fire-and-forget dispatch onto the tokio runtime
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn log() -> Self {
        Self::new(Arc::new(LogNotifier))
    }

    /// Spawn delivery. Callers normally drop the handle.
    pub fn dispatch(&self, notification: Notification) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&notification).await {
                warn!(
                    notifier = notifier.name(),
                    user_id = %notification.user_id,
                    kind = %notification.kind,
                    error = %e,
                    "Notification dropped"
                );
            }
        })
    }
}
