use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::SetupError;

/// Connection settings shared by every HTTP provider.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Base URL (user directory) or endpoint URL (webhook).
    pub url: Url,
    /// Per-request timeout, covering connect through body read.
    pub timeout: Duration,
}

impl HttpSettings {
    /// Creates settings for `url` with the given per-request timeout.
    pub fn new(url: Url, timeout: Duration) -> Self {
        Self { url, timeout }
    }

    pub(crate) fn build_client(&self) -> Result<Client, SetupError> {
        if self.url.cannot_be_a_base() {
            return Err(SetupError::UnusableUrl(self.url.to_string()));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("seam/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}
