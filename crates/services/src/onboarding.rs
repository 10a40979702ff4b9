use capability::{DeliveryId, Notification, Record, RecordKey, Recipient, UserId};
use serde_json::json;

use crate::{NotificationService, RecordService, ServiceError, UserService};

/// Result of [`OnboardingService::onboard`].
#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingOutcome {
    /// The user was found, recorded, and welcomed.
    Onboarded {
        /// The `user-{id}` record that was written.
        record: Record,
        /// Id the welcome message was accepted under.
        delivery: DeliveryId,
    },
    /// The directory does not know the user; nothing was written or sent.
    UnknownUser,
}

/// Onboards a user by combining the three other services.
///
/// Sequence: look the user up, store a `user-{id}` record, send a welcome
/// message. The first fault stops the sequence and is returned unchanged;
/// steps already completed are not undone.
#[derive(Clone)]
pub struct OnboardingService {
    users: UserService,
    records: RecordService,
    notifications: NotificationService,
}

impl OnboardingService {
    /// Creates the service from its three collaborators.
    pub fn new(
        users: UserService,
        records: RecordService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            users,
            records,
            notifications,
        }
    }

    /// Key of the record written for user `id`, if the id is usable as a key.
    pub fn record_key_for(id: &UserId) -> Option<RecordKey> {
        RecordKey::new(format!("user-{id}"))
    }

    /// Onboards user `id`.
    #[tracing::instrument(skip(self, id), fields(user_id = %id))]
    pub async fn onboard(&self, id: &UserId) -> Result<OnboardingOutcome, ServiceError> {
        let key = Self::record_key_for(id).ok_or_else(|| {
            ServiceError::invalid(format!("user id '{id}' cannot be used in a record key"))
        })?;

        let Some(user) = self.users.fetch(id).await? else {
            tracing::info!("user unknown, nothing to onboard");
            return Ok(OnboardingOutcome::UnknownUser);
        };

        let record = self
            .records
            .save(
                key,
                json!({
                    "id": user.id.as_str(),
                    "name": &user.name,
                    "email": &user.email,
                }),
            )
            .await?;

        let recipient = user
            .email
            .as_deref()
            .and_then(Recipient::new)
            .or_else(|| Recipient::new(user.id.as_str()))
            .ok_or_else(|| ServiceError::invalid("user has no usable recipient"))?;

        let greeting = if user.name.trim().is_empty() {
            user.id.to_string()
        } else {
            user.name.trim().to_string()
        };
        let delivery = self
            .notifications
            .notify(recipient, &Notification::Welcome { name: greeting })
            .await?;

        tracing::info!(record = %record.key, %delivery, "user onboarded");
        Ok(OnboardingOutcome::Onboarded { record, delivery })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capability::{names, FaultKind, NotificationKind, ProviderFault, User};
    use std::sync::Arc;
    use substitutes::{FakeUserDirectory, InMemoryRecordStore, RecordStoreCall, RecordingNotifier};

    struct Fixture {
        directory: Arc<FakeUserDirectory>,
        store: Arc<InMemoryRecordStore>,
        notifier: Arc<RecordingNotifier>,
        service: OnboardingService,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(
            FakeUserDirectory::new()
                .with_user(User::new(id("7"), "Ada").with_email("ada@example.com"))
                .with_user(User::new(id("8"), "")),
        );
        let store = Arc::new(InMemoryRecordStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let service = OnboardingService::new(
            UserService::new(directory.clone()),
            RecordService::new(store.clone()),
            NotificationService::new(notifier.clone()),
        );
        Fixture {
            directory,
            store,
            notifier,
            service,
        }
    }

    fn id(value: &str) -> UserId {
        UserId::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_known_user_is_recorded_and_welcomed_by_email() {
        let f = fixture();

        let outcome = f.service.onboard(&id("7")).await.unwrap();

        let OnboardingOutcome::Onboarded { record, delivery } = outcome else {
            panic!("expected onboarding to succeed, got {outcome:?}");
        };
        assert_eq!(record.key.as_str(), "user-7");
        assert_eq!(record.payload["email"], "ada@example.com");

        let delivered = f.notifier.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, delivery);
        assert_eq!(delivered[0].1.kind, NotificationKind::Welcome);
        assert_eq!(delivered[0].1.recipient.as_str(), "ada@example.com");
        assert!(delivered[0].1.body.contains("Ada"));
    }

    #[tokio::test]
    async fn test_user_without_email_or_name_is_welcomed_by_id() {
        let f = fixture();

        f.service.onboard(&id("8")).await.unwrap();

        let delivered = f.notifier.delivered();
        assert_eq!(delivered[0].1.recipient.as_str(), "8");
        assert!(delivered[0].1.body.contains('8'));
    }

    #[tokio::test]
    async fn test_unknown_user_touches_nothing_else() {
        let f = fixture();

        assert_eq!(
            f.service.onboard(&id("404")).await,
            Ok(OnboardingOutcome::UnknownUser)
        );
        assert!(f.store.calls().is_empty());
        assert!(f.notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_store_fault_stops_before_notification() {
        let f = fixture();
        let fault = ProviderFault::unavailable(names::RECORD_STORE, "disk gone");
        f.store.fail_with(fault.clone());

        assert_eq!(
            f.service.onboard(&id("7")).await,
            Err(ServiceError::Provider(fault))
        );
        assert_eq!(f.store.calls().len(), 1);
        assert!(f.notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_notifier_fault_keeps_the_written_record() {
        let f = fixture();
        f.notifier.fail_with(ProviderFault::new(
            names::NOTIFIER,
            FaultKind::Rejected,
            "mailbox full",
        ));

        let err = f.service.onboard(&id("7")).await.unwrap_err();

        assert!(matches!(err, ServiceError::Provider(ref p) if p.kind == FaultKind::Rejected));
        assert!(matches!(f.store.calls()[0], RecordStoreCall::Put(_)));
        assert_eq!(f.store.len(), 1);
    }

    #[tokio::test]
    async fn test_id_unusable_as_key_is_refused_before_lookup() {
        let f = fixture();

        let err = f.service.onboard(&id("a/b")).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidRequest { .. }));
        assert!(f.directory.calls().is_empty());
    }
}
