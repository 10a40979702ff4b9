use async_trait::async_trait;
use capability::{names, DeliveryId, NotificationMessage, Notifier, ProviderFault};
use reqwest::{Client, Url};

use crate::client::HttpSettings;
use crate::error::{RestError, SetupError};

/// Header carrying the [`DeliveryId`] on every webhook post, so the receiver
/// can de-duplicate.
pub const DELIVERY_ID_HEADER: &str = "x-seam-delivery-id";

/// [`Notifier`] that posts each message as JSON to a webhook endpoint.
///
/// Any `2xx` answer means the message was accepted.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    endpoint: Url,
}

impl WebhookNotifier {
    /// Creates a notifier posting to `settings.url`.
    pub fn new(settings: HttpSettings) -> Result<Self, SetupError> {
        let client = settings.build_client()?;
        Ok(Self {
            client,
            endpoint: settings.url,
        })
    }

    #[tracing::instrument(
        name = "rest.send_notification",
        skip(self, message, delivery),
        fields(recipient = %message.recipient, kind = ?message.kind, delivery = %delivery)
    )]
    async fn post(&self, message: &NotificationMessage, delivery: DeliveryId) -> Result<(), RestError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(DELIVERY_ID_HEADER, delivery.to_string())
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RestError::Status(status.as_u16()));
        }

        tracing::debug!(status = status.as_u16(), "notification accepted");
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &NotificationMessage) -> Result<DeliveryId, ProviderFault> {
        let delivery = DeliveryId::new_random();
        self.post(message, delivery)
            .await
            .map(|()| delivery)
            .map_err(|error| {
                tracing::warn!(recipient = %message.recipient, %error, "notification delivery failed");
                error.into_fault(names::NOTIFIER)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_server, unused_local_url};
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use capability::{AlertSeverity, FaultKind, Notification, Recipient};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Seen = Arc<Mutex<Vec<(String, serde_json::Value)>>>;

    async fn hook(
        State(seen): State<Seen>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> StatusCode {
        let delivery = headers
            .get(DELIVERY_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        seen.lock().unwrap().push((delivery, body));
        StatusCode::ACCEPTED
    }

    fn message(recipient: &str) -> NotificationMessage {
        Notification::Alert {
            severity: AlertSeverity::Warning,
            text: "queue backing up".to_string(),
        }
        .render(Recipient::new(recipient).unwrap())
    }

    #[tokio::test]
    async fn test_message_is_posted_as_json_with_delivery_header() {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route("/notify", post(hook))
            .with_state(seen.clone());
        let base = spawn_server(app).await;
        let notifier = WebhookNotifier::new(HttpSettings::new(
            base.join("notify").unwrap(),
            Duration::from_secs(2),
        ))
        .unwrap();

        let delivery = notifier.send(&message("ops@example.com")).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, delivery.to_string());
        assert_eq!(seen[0].1["recipient"], "ops@example.com");
        assert_eq!(seen[0].1["kind"], "alert");
        assert_eq!(seen[0].1["body"], "queue backing up");
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected_fault() {
        let app = Router::new().route("/notify", post(|| async { StatusCode::FORBIDDEN }));
        let base = spawn_server(app).await;
        let notifier = WebhookNotifier::new(HttpSettings::new(
            base.join("notify").unwrap(),
            Duration::from_secs(2),
        ))
        .unwrap();

        let err = notifier.send(&message("ops")).await.unwrap_err();
        assert_eq!(err.kind, FaultKind::Rejected);
        assert_eq!(err.capability, names::NOTIFIER);
    }

    #[tokio::test]
    async fn test_slow_endpoint_is_timeout_fault() {
        let app = Router::new().route(
            "/notify",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                StatusCode::ACCEPTED
            }),
        );
        let base = spawn_server(app).await;
        let notifier = WebhookNotifier::new(HttpSettings::new(
            base.join("notify").unwrap(),
            Duration::from_millis(200),
        ))
        .unwrap();

        let err = notifier.send(&message("ops")).await.unwrap_err();
        assert_eq!(err.kind, FaultKind::Timeout);
        assert_eq!(err.capability, names::NOTIFIER);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable_fault() {
        let base = unused_local_url().await;
        let notifier = WebhookNotifier::new(HttpSettings::new(
            base.join("notify").unwrap(),
            Duration::from_millis(500),
        ))
        .unwrap();

        let err = notifier.send(&message("ops")).await.unwrap_err();
        assert_eq!(err.kind, FaultKind::Unavailable);
    }
}
