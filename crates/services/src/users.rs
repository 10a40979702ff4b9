use std::sync::Arc;

use capability::{User, UserDirectory, UserId};

use crate::ServiceError;

/// Answers questions about users through a [`UserDirectory`].
#[derive(Clone)]
pub struct UserService {
    directory: Arc<dyn UserDirectory>,
}

impl UserService {
    /// Creates a service reading from `directory`.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Returns user `id`, or `None` if the directory does not know the user.
    pub async fn fetch(&self, id: &UserId) -> Result<Option<User>, ServiceError> {
        Ok(self.directory.fetch_user(id).await?)
    }

    /// Returns the stored name of user `id`, or `None` if the directory does
    /// not know the user.
    #[tracing::instrument(skip(self, id), fields(user_id = %id))]
    pub async fn get_user_name(&self, id: &UserId) -> Result<Option<String>, ServiceError> {
        let user = self.directory.fetch_user(id).await?;
        Ok(user.map(|u| u.name))
    }

    /// Returns a name fit for greeting user `id`.
    ///
    /// Uses the stored name when it is not blank, then the local part of the
    /// email address, then the id itself. `None` if the user is unknown.
    #[tracing::instrument(skip(self, id), fields(user_id = %id))]
    pub async fn display_name(&self, id: &UserId) -> Result<Option<String>, ServiceError> {
        let Some(user) = self.directory.fetch_user(id).await? else {
            return Ok(None);
        };

        let name = user.name.trim();
        if !name.is_empty() {
            return Ok(Some(name.to_string()));
        }

        let from_email = user
            .email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .map(str::trim)
            .filter(|local| !local.is_empty());

        Ok(Some(from_email.unwrap_or(user.id.as_str()).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capability::{names, FaultKind, ProviderFault};
    use substitutes::FakeUserDirectory;

    fn id(value: &str) -> UserId {
        UserId::new(value).unwrap()
    }

    fn service_with(directory: &Arc<FakeUserDirectory>) -> UserService {
        UserService::new(directory.clone())
    }

    #[tokio::test]
    async fn test_get_user_name_returns_programmed_name() {
        let directory = Arc::new(FakeUserDirectory::new().with_user(User::new(id("1"), "Test User")));
        let service = service_with(&directory);

        assert_eq!(
            service.get_user_name(&id("1")).await,
            Ok(Some("Test User".to_string()))
        );
    }

    #[tokio::test]
    async fn test_get_user_name_of_unknown_user_is_absent() {
        let directory = Arc::new(FakeUserDirectory::new().with_user(User::new(id("1"), "Test User")));
        let service = service_with(&directory);

        assert_eq!(service.get_user_name(&id("2")).await, Ok(None));
    }

    #[tokio::test]
    async fn test_provider_fault_reaches_caller_after_exactly_one_call() {
        let directory = Arc::new(FakeUserDirectory::new());
        let fault = ProviderFault::new(names::USER_DIRECTORY, FaultKind::Unavailable, "down");
        directory.fail_with(fault.clone());
        let service = service_with(&directory);

        assert_eq!(
            service.get_user_name(&id("1")).await,
            Err(ServiceError::Provider(fault))
        );
        assert_eq!(directory.calls(), vec![id("1")]);
    }

    #[tokio::test]
    async fn test_repeated_reads_return_identical_results() {
        let directory = Arc::new(FakeUserDirectory::new().with_user(User::new(id("1"), "Same")));
        let service = service_with(&directory);

        let first = service.get_user_name(&id("1")).await;
        let second = service.get_user_name(&id("1")).await;

        assert_eq!(first, second);
        assert_eq!(directory.calls_for(&id("1")), 2);
    }

    #[tokio::test]
    async fn test_display_name_falls_back_to_email_then_id() {
        let directory = Arc::new(
            FakeUserDirectory::new()
                .with_user(User::new(id("named"), "  Ada  "))
                .with_user(User::new(id("mailed"), " ").with_email("grace@example.com"))
                .with_user(User::new(id("bare"), "")),
        );
        let service = service_with(&directory);

        assert_eq!(service.display_name(&id("named")).await, Ok(Some("Ada".to_string())));
        assert_eq!(service.display_name(&id("mailed")).await, Ok(Some("grace".to_string())));
        assert_eq!(service.display_name(&id("bare")).await, Ok(Some("bare".to_string())));
        assert_eq!(service.display_name(&id("ghost")).await, Ok(None));
    }
}
