//! The generic failure indicator that crosses the capability boundary.
//!
//! [`ProviderFault`] is the *only* error type a capability trait returns.
//! Real providers translate whatever their backing resource reports (HTTP
//! status codes, socket errors, I/O errors, malformed documents) into one of
//! the [`FaultKind`]s below before returning; the resource's own error type
//! never reaches a consumer.
//!
//! Expected absence ("no such user", "no such record") is **not** a fault: it
//! is an ordinary `Ok(None)` / `Ok(false)` result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a provider fault.
///
/// Deliberately small: consumers branch on absence versus fault, and only
/// occasionally on the kind (e.g. to word an error message).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The backing resource could not be reached or refused the connection.
    Unavailable,
    /// The backing resource did not answer in time.
    Timeout,
    /// The backing resource answered, but refused the request.
    Rejected,
    /// The backing resource answered with something that could not be understood.
    Malformed,
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unavailable => "unavailable",
            Self::Timeout => "timeout",
            Self::Rejected => "rejected",
            Self::Malformed => "malformed",
        };
        f.write_str(s)
    }
}

/// A fault raised by a provider's backing resource.
///
/// Carries the capability that failed, a [`FaultKind`], and a plain-text
/// message. No source error is attached.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{capability} provider fault ({kind}): {message}")]
pub struct ProviderFault {
    /// Name of the capability whose provider failed (e.g. `"user_directory"`).
    pub capability: String,
    /// Classification of the failure.
    pub kind: FaultKind,
    /// Human-readable description, free of resource-specific types.
    pub message: String,
}

impl ProviderFault {
    /// Creates a new fault.
    pub fn new(capability: impl Into<String>, kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a [`FaultKind::Unavailable`] fault.
    pub fn unavailable(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(capability, FaultKind::Unavailable, message)
    }

    /// Shorthand for a [`FaultKind::Malformed`] fault.
    pub fn malformed(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(capability, FaultKind::Malformed, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_display_names_capability_and_kind() {
        let fault = ProviderFault::new("user_directory", FaultKind::Timeout, "no answer after 5s");
        assert_eq!(
            fault.to_string(),
            "user_directory provider fault (timeout): no answer after 5s"
        );
    }
}
