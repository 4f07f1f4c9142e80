use super::events::NotificationEvent;
use super::messages::render;
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::FixedOffset;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delivery transport for rendered messages
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()>;
}

/// Used when outbound delivery is switched off
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()> {
        log::info!("Notification to {chat_id}: {text}");
        Ok(())
    }
}

/// Drain the event channel until every sender is dropped.
///
/// Delivery failures are logged and the loop moves on; there is no retry.
pub fn spawn_dispatcher(
    mut rx: mpsc::UnboundedReceiver<NotificationEvent>,
    notifier: Arc<dyn Notifier>,
    offset: FixedOffset,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let chat_id = event.chat_id();
            let text = render(&event, offset);
            if let Err(e) = notifier.send_message(chat_id, &text).await {
                log::error!(
                    "Failed to deliver {} notification to {chat_id}: {e}",
                    event.name()
                );
            }
        }
        log::info!("Notification dispatcher stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::notifications::NotificationSender;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<(i64, String)>>,
        fail_first: Mutex<bool>,
    }

    #[async_trait]
    impl Notifier for Recording {
        async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()> {
            let mut fail = self.fail_first.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(AppError::ExternalApiError("telegram down".into()));
            }
            self.sent.lock().unwrap().push((chat_id, text.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failed_delivery_does_not_stop_dispatcher() {
        let recording = Arc::new(Recording::default());
        *recording.fail_first.lock().unwrap() = true;

        let (sender, rx) = NotificationSender::channel();
        let handle = spawn_dispatcher(rx, recording.clone(), FixedOffset::east_opt(0).unwrap());

        sender.emit(NotificationEvent::DriverBlockChanged {
            driver_chat_id: 10,
            blocked: true,
        });
        sender.emit(NotificationEvent::DriverBlockChanged {
            driver_chat_id: 11,
            blocked: false,
        });
        drop(sender);
        handle.await.unwrap();

        let sent = recording.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 11);
    }
}
