//! Fire-and-forget anomaly alert queue.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use gatehouse_core::notify::AnomalyNotifier;
use gatehouse_core::types::Timestamp;

use crate::email::EmailDelivery;

/// An origin-mismatch warning waiting for delivery.
#[derive(Debug, Clone)]
pub struct OriginMismatchAlert {
    /// Registered address of the affected user.
    pub email: String,
    /// When the mismatch was observed.
    pub detected_at: Timestamp,
}

/// Sending half of the alert channel.
///
/// Cheap to clone; implements [`AnomalyNotifier`] so the session manager can
/// hand alerts over without knowing anything about email.
#[derive(Clone)]
pub struct AlertQueue {
    sender: mpsc::UnboundedSender<OriginMismatchAlert>,
}

impl AlertQueue {
    /// Create the queue, returning the receiving half for [`AlertWorker`].
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OriginMismatchAlert>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl AnomalyNotifier for AlertQueue {
    fn notify_origin_mismatch(&self, email: &str) {
        // A SendError only means the worker is gone (shutdown); the alert is
        // best-effort and gets dropped.
        let _ = self.sender.send(OriginMismatchAlert {
            email: email.to_string(),
            detected_at: chrono::Utc::now(),
        });
    }
}

/// Background consumer that turns queued alerts into outbound email.
pub struct AlertWorker {
    delivery: Option<EmailDelivery>,
}

impl AlertWorker {
    /// `delivery` is `None` when SMTP is not configured; alerts are then
    /// logged and dropped instead of sent.
    pub fn new(delivery: Option<EmailDelivery>) -> Self {
        Self { delivery }
    }

    /// Drain alerts until the channel closes or `cancel` fires.
    ///
    /// Must outlive any individual delivery failure: errors are logged, the
    /// loop continues.
    pub async fn run(
        self,
        mut receiver: mpsc::UnboundedReceiver<OriginMismatchAlert>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("alert worker stopping");
                    break;
                }
                alert = receiver.recv() => {
                    let Some(alert) = alert else { break };
                    match &self.delivery {
                        Some(delivery) => {
                            if let Err(err) = delivery.deliver_origin_mismatch(&alert).await {
                                tracing::error!(
                                    error = %err,
                                    to = %alert.email,
                                    "failed to send origin-mismatch warning"
                                );
                            }
                        }
                        None => tracing::warn!(
                            to = %alert.email,
                            "SMTP not configured, dropping origin-mismatch warning"
                        ),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn enqueued_alert_reaches_the_channel() {
        let (queue, mut receiver) = AlertQueue::new();

        queue.notify_origin_mismatch("user@example.com");

        let alert = receiver.recv().await.expect("alert should arrive");
        assert_eq!(alert.email, "user@example.com");
        assert!(alert.detected_at <= chrono::Utc::now());
    }

    #[tokio::test]
    async fn enqueue_after_worker_shutdown_does_not_panic() {
        let (queue, receiver) = AlertQueue::new();
        drop(receiver);

        // Worker is gone; the alert is silently dropped.
        queue.notify_origin_mismatch("user@example.com");
    }

    #[tokio::test]
    async fn worker_without_delivery_drains_and_stops_on_cancel() {
        let (queue, receiver) = AlertQueue::new();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(AlertWorker::new(None).run(receiver, cancel.clone()));

        queue.notify_origin_mismatch("a@example.com");
        queue.notify_origin_mismatch("b@example.com");
        tokio::task::yield_now().await;

        cancel.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("worker should stop promptly")
            .expect("worker must not panic");
    }

    #[tokio::test]
    async fn worker_stops_when_all_senders_are_dropped() {
        let (queue, receiver) = AlertQueue::new();
        let handle = tokio::spawn(AlertWorker::new(None).run(receiver, CancellationToken::new()));

        drop(queue);
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("worker should stop when the channel closes")
            .expect("worker must not panic");
    }
}
