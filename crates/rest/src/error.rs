//! HTTP-side errors and their translation into [`ProviderFault`].
//!
//! [`RestError`] keeps the full `reqwest` detail for logging inside this crate.
//! It is converted with [`RestError::into_fault`] at the trait boundary; only
//! the resulting [`ProviderFault`] leaves the crate through a capability call.

use capability::{FaultKind, ProviderFault};
use thiserror::Error;

/// Failure to construct an HTTP provider.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The underlying HTTP client could not be built (e.g. TLS backend failure).
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The configured URL cannot carry path segments (e.g. `mailto:` or `data:`).
    #[error("URL '{0}' cannot be used as an HTTP base")]
    UnusableUrl(String),
}

/// Everything that can go wrong during one HTTP exchange.
#[derive(Debug, Error)]
pub(crate) enum RestError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("response body is not valid JSON for the expected shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("asked for user '{requested}' but the directory answered with '{returned}'")]
    IdMismatch { requested: String, returned: String },
}

impl RestError {
    /// Strips the HTTP detail, keeping only a [`FaultKind`] and a message.
    pub(crate) fn into_fault(self, capability: &str) -> ProviderFault {
        let kind = match &self {
            Self::Transport(e) if e.is_timeout() => FaultKind::Timeout,
            Self::Transport(e) if e.is_decode() || e.is_body() => FaultKind::Malformed,
            Self::Transport(_) => FaultKind::Unavailable,
            Self::Status(_) => FaultKind::Rejected,
            Self::Decode(_) | Self::IdMismatch { .. } => FaultKind::Malformed,
        };

        let message = match &self {
            Self::Transport(_) if kind == FaultKind::Timeout => "request timed out".to_string(),
            Self::Transport(_) if kind == FaultKind::Malformed => {
                "response body could not be read".to_string()
            }
            Self::Transport(_) => "endpoint could not be reached".to_string(),
            other => other.to_string(),
        };

        ProviderFault::new(capability, kind, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_rejected() {
        let fault = RestError::Status(503).into_fault("user_directory");
        assert_eq!(fault.kind, FaultKind::Rejected);
        assert_eq!(fault.message, "unexpected HTTP status 503");
        assert_eq!(fault.capability, "user_directory");
    }

    #[test]
    fn test_bad_json_maps_to_malformed() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let fault = RestError::Decode(decode).into_fault("user_directory");
        assert_eq!(fault.kind, FaultKind::Malformed);
    }
}
