//! Capability traits: the ports consumers depend on.
//!
//! Each trait is a fixed set of operations. Adapters in the `rest`, `storage`
//! and `substitutes` crates implement them; consumers in the `services` crate
//! hold them as `Arc<dyn Trait>` and never name a concrete provider.
//!
//! ## Contract shared by every trait
//!
//! - Absence is a normal result (`Ok(None)`, `Ok(false)`), never a fault.
//! - Every other failure is a [`ProviderFault`]; nothing is retried inside the
//!   provider.
//! - One call produces exactly one result. Calls on the same provider instance
//!   are answered in the order they complete on the caller's side; providers
//!   do not reorder or merge them.

use async_trait::async_trait;

use crate::{DeliveryId, NotificationMessage, ProviderFault, Record, RecordKey, User, UserId};

/// Capability names used in [`ProviderFault::capability`].
pub mod names {
    /// [`super::UserDirectory`].
    pub const USER_DIRECTORY: &str = "user_directory";
    /// [`super::RecordStore`].
    pub const RECORD_STORE: &str = "record_store";
    /// [`super::Notifier`].
    pub const NOTIFIER: &str = "notifier";
}

/// Looks users up by id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches the user with the given id.
    ///
    /// Returns `Ok(None)` when the directory has no such user.
    async fn fetch_user(&self, id: &UserId) -> Result<Option<User>, ProviderFault>;
}

/// Persists keyed JSON records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Stores `record` under its key, replacing any previous record.
    async fn put(&self, record: Record) -> Result<(), ProviderFault>;

    /// Loads the record stored under `key`, or `Ok(None)` if there is none.
    async fn get(&self, key: &RecordKey) -> Result<Option<Record>, ProviderFault>;

    /// Removes the record stored under `key`.
    ///
    /// Returns `Ok(false)` when there was nothing to remove.
    async fn delete(&self, key: &RecordKey) -> Result<bool, ProviderFault>;

    /// Lists every stored key in ascending order.
    async fn list_keys(&self) -> Result<Vec<RecordKey>, ProviderFault>;
}

/// Delivers rendered notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message`, returning the id the provider accepted it under.
    async fn send(&self, message: &NotificationMessage) -> Result<DeliveryId, ProviderFault>;
}
