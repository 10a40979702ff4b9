use std::sync::Arc;

use capability::{DeliveryId, Notification, Notifier, Recipient};

use crate::ServiceError;

/// Renders [`Notification`]s and hands them to a [`Notifier`].
#[derive(Clone)]
pub struct NotificationService {
    notifier: Arc<dyn Notifier>,
}

impl NotificationService {
    /// Creates a service delivering through `notifier`.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Sends `notification` to `recipient`.
    #[tracing::instrument(skip(self, recipient, notification), fields(recipient = %recipient, kind = ?notification.kind()))]
    pub async fn notify(
        &self,
        recipient: Recipient,
        notification: &Notification,
    ) -> Result<DeliveryId, ServiceError> {
        let message = notification.render(recipient);
        let delivery = self.notifier.send(&message).await?;
        tracing::info!(%delivery, "notification sent");
        Ok(delivery)
    }
}
