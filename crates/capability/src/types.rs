//! Shared value types carried across the capability boundary.
//!
//! These are the request and result shapes of the capability traits in
//! [`crate::ports`]. Every provider, real or substitute, produces and consumes
//! exactly these types; nothing provider-specific appears here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Recipient, RecordKey, UserId};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A user as returned by a [`crate::UserDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Directory identifier of the user.
    pub id: UserId,

    /// Display name. May be blank when the directory holds no name.
    pub name: String,

    /// Contact address, if the directory has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Creates a user with no email address.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
        }
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A keyed JSON document held by a [`crate::RecordStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Key the record is stored under.
    pub key: RecordKey,

    /// Opaque payload. Stores persist it verbatim.
    pub payload: serde_json::Value,

    /// When the owning consumer asked for the record to be stored.
    pub stored_at: Timestamp,
}

impl Record {
    /// Creates a record stamped with the current time.
    pub fn new(key: RecordKey, payload: serde_json::Value) -> Self {
        Self {
            key,
            payload,
            stored_at: Timestamp::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Urgency of an [`Notification::Alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Informational; no action expected.
    Info,
    /// Something should be looked at.
    Warning,
    /// Something is broken.
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown alert severity '{other}'")),
        }
    }
}

/// The closed set of things consumers can notify about.
///
/// Every kind is turned into a wire message by the single
/// [`Notification::render`] routine; there is no per-kind message type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// A new user has been onboarded.
    Welcome {
        /// Name to greet the user with.
        name: String,
    },
    /// A record was written.
    RecordSaved {
        /// Key of the written record.
        key: RecordKey,
    },
    /// Free-form operational alert.
    Alert {
        /// Urgency of the alert.
        severity: AlertSeverity,
        /// Alert text.
        text: String,
    },
}

/// Discriminant of a [`Notification`], carried on the rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// See [`Notification::Welcome`].
    Welcome,
    /// See [`Notification::RecordSaved`].
    RecordSaved,
    /// See [`Notification::Alert`].
    Alert,
}

impl Notification {
    /// Returns the discriminant of this notification.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Welcome { .. } => NotificationKind::Welcome,
            Self::RecordSaved { .. } => NotificationKind::RecordSaved,
            Self::Alert { .. } => NotificationKind::Alert,
        }
    }

    /// Renders the notification into the message a [`crate::Notifier`] sends.
    pub fn render(&self, recipient: Recipient) -> NotificationMessage {
        let (subject, body) = match self {
            Self::Welcome { name } => (
                "Welcome".to_string(),
                format!("Hello {name}, your account is ready."),
            ),
            Self::RecordSaved { key } => (
                format!("Record {key} saved"),
                format!("The record '{key}' was stored."),
            ),
            Self::Alert { severity, text } => (format!("[{severity}] alert"), text.clone()),
        };

        NotificationMessage {
            recipient,
            kind: self.kind(),
            subject,
            body,
        }
    }
}

/// A rendered notification, ready to hand to a [`crate::Notifier`].
///
/// Serialises to the JSON document webhook-style notifiers post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Where the message goes.
    pub recipient: Recipient,
    /// Which [`Notification`] kind produced the message.
    pub kind: NotificationKind,
    /// One-line subject.
    pub subject: String,
    /// Message body.
    pub body: String,
}
