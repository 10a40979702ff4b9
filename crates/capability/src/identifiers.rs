//! Newtype domain identifiers.
//!
//! Every value that names something a provider looks up is a distinct newtype
//! wrapping a primitive. This prevents handing a [`Recipient`] to an operation
//! that expects a [`UserId`] even though both are strings under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or_else(|| concat!(stringify!($name), " must not be empty").to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifies a user known to a [`crate::UserDirectory`].
    UserId
}

string_id! {
    /// The address a notification is delivered to (an email address, a chat
    /// handle, or a user id when nothing better is known).
    Recipient
}

// ---------------------------------------------------------------------------
// RecordKey: stricter than the macro: must be usable as a file name.
// ---------------------------------------------------------------------------

/// Identifies a record held by a [`crate::RecordStore`].
///
/// Keys only admit ASCII letters, digits, `_`, `-` and `.`, must not start
/// with `.`, and are at most [`RecordKey::MAX_LEN`] bytes. Any provider may
/// therefore map a key directly onto a file name or URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordKey(String);

impl RecordKey {
    /// Longest key accepted, in bytes.
    pub const MAX_LEN: usize = 128;

    /// Creates a new key, returning `None` if the value is empty, too long,
    /// starts with `.`, or contains a character outside `[A-Za-z0-9_.-]`.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        let valid = !v.is_empty()
            && v.len() <= Self::MAX_LEN
            && !v.starts_with('.')
            && v
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'));
        if valid {
            Some(Self(v))
        } else {
            None
        }
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.clone()).ok_or_else(|| format!("invalid record key '{value}'"))
    }
}

impl From<RecordKey> for String {
    fn from(value: RecordKey) -> Self {
        value.0
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies one message accepted by a [`crate::Notifier`].
///
/// Generated by the notifier at acceptance time so callers can correlate a
/// send with provider-side logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryId(Uuid);

impl DeliveryId {
    /// Generates a new random delivery identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_ids_reject_empty_values() {
        assert!(UserId::new("").is_none());
        assert!(Recipient::new("").is_none());
        assert_eq!(UserId::new("42").map(|id| id.to_string()), Some("42".to_string()));
    }

    #[test]
    fn test_record_key_accepts_file_safe_names() {
        for key in ["user-1", "a.b_c", "X9"] {
            assert!(RecordKey::new(key).is_some(), "{key} should be valid");
        }
    }

    #[test]
    fn test_record_key_rejects_path_like_or_oversized_names() {
        let too_long = "k".repeat(RecordKey::MAX_LEN + 1);
        for key in ["", ".hidden", "../escape", "a/b", "with space", too_long.as_str()] {
            assert!(RecordKey::new(key).is_none(), "{key:?} should be rejected");
        }
    }

    #[test]
    fn test_identifiers_deserialize_through_validation() {
        let ok: Result<RecordKey, _> = serde_json::from_str("\"orders.2024\"");
        assert!(ok.is_ok());

        let bad: Result<RecordKey, _> = serde_json::from_str("\"../etc\"");
        assert!(bad.is_err());

        let empty: Result<UserId, _> = serde_json::from_str("\"\"");
        assert!(empty.is_err());
    }
}
