use async_trait::async_trait;
use capability::{names, ProviderFault, User, UserDirectory, UserId};
use reqwest::{Client, StatusCode, Url};

use crate::client::HttpSettings;
use crate::error::{RestError, SetupError};

/// [`UserDirectory`] backed by a JSON/HTTP user service.
///
/// Looks a user up with `GET {base_url}/users/{id}`:
///
/// | Response | Result |
/// |----------|--------|
/// | `200` with a `User` body whose `id` matches | `Ok(Some(user))` |
/// | `404` | `Ok(None)` |
/// | any other status | `Err` ([`capability::FaultKind::Rejected`]) |
/// | unparsable body or mismatched `id` | `Err` ([`capability::FaultKind::Malformed`]) |
/// | timeout | `Err` ([`capability::FaultKind::Timeout`]) |
/// | connection failure | `Err` ([`capability::FaultKind::Unavailable`]) |
#[derive(Debug, Clone)]
pub struct RestUserDirectory {
    client: Client,
    base_url: Url,
}

impl RestUserDirectory {
    /// Creates a directory client for the service at `settings.url`.
    pub fn new(settings: HttpSettings) -> Result<Self, SetupError> {
        let client = settings.build_client()?;
        Ok(Self {
            client,
            base_url: settings.url,
        })
    }

    /// URL of the user resource, or `None` when `id` cannot be a path segment.
    ///
    /// `.` and `..` (escaped or not) are dot segments that URL normalisation
    /// removes, so no request could ever address such a user.
    fn user_url(&self, id: &UserId) -> Option<Url> {
        if matches!(id.as_str(), "." | "..") {
            return None;
        }
        let mut url = self.base_url.clone();
        // `HttpSettings::build_client` has already rejected cannot-be-a-base URLs.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users").push(id.as_str());
        }
        Some(url)
    }

    #[tracing::instrument(name = "rest.fetch_user", skip(self, id), fields(user_id = %id))]
    async fn lookup(&self, id: &UserId) -> Result<Option<User>, RestError> {
        let Some(url) = self.user_url(id) else {
            tracing::debug!("user id is not addressable");
            return Ok(None);
        };
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("user not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RestError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let user: User = serde_json::from_slice(&body)?;
        if user.id != *id {
            return Err(RestError::IdMismatch {
                requested: id.to_string(),
                returned: user.id.to_string(),
            });
        }

        tracing::debug!("user found");
        Ok(Some(user))
    }
}

#[async_trait]
impl UserDirectory for RestUserDirectory {
    async fn fetch_user(&self, id: &UserId) -> Result<Option<User>, ProviderFault> {
        self.lookup(id).await.map_err(|error| {
            tracing::warn!(user_id = %id, %error, "user lookup failed");
            error.into_fault(names::USER_DIRECTORY)
        })
    }
}
