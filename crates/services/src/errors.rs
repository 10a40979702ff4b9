//! Errors returned by the consumer services.

use capability::ProviderFault;
use thiserror::Error;

/// Failure of a consumer operation.
///
/// Absence is never an error here either: services return `Option` or a
/// dedicated outcome enum for it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// A provider behind one of the capability traits failed.
    ///
    /// Passed through unchanged; the service neither retries nor rewrites it.
    #[error(transparent)]
    Provider(#[from] ProviderFault),

    /// The service refused the request before calling any provider.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Why the request was refused.
        message: String,
    },
}

impl ServiceError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}
