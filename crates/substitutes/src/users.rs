use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use capability::{ProviderFault, User, UserDirectory, UserId};

use crate::call_log::{lock, CallLog, FaultPlan};

/// In-memory [`UserDirectory`] with programmable results.
///
/// Unprogrammed ids resolve to `Ok(None)`. Every `fetch_user` call is logged,
/// including calls that were made to fail.
#[derive(Debug, Default)]
pub struct FakeUserDirectory {
    users: Mutex<HashMap<UserId, User>>,
    faults: FaultPlan<UserId>,
    calls: CallLog<UserId>,
}

impl FakeUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FakeUserDirectory::add_user`].
    pub fn with_user(self, user: User) -> Self {
        self.add_user(user);
        self
    }

    /// Programs `user` as the result for its id, replacing any earlier entry.
    pub fn add_user(&self, user: User) {
        lock(&self.users).insert(user.id.clone(), user);
    }

    /// Makes every lookup fail with `fault`.
    pub fn fail_with(&self, fault: ProviderFault) {
        self.faults.fail_always(fault);
    }

    /// Makes lookups of `id` fail with `fault`.
    pub fn fail_for(&self, id: UserId, fault: ProviderFault) {
        self.faults.fail_for(id, fault);
    }

    /// Removes every programmed failure; programmed users are kept.
    pub fn clear_failures(&self) {
        self.faults.clear();
    }

    /// Ids looked up so far, in call order.
    pub fn calls(&self) -> Vec<UserId> {
        self.calls.snapshot()
    }

    /// How many times `id` has been looked up.
    pub fn calls_for(&self, id: &UserId) -> usize {
        self.calls.count_of(id)
    }
}

#[async_trait]
impl UserDirectory for FakeUserDirectory {
    async fn fetch_user(&self, id: &UserId) -> Result<Option<User>, ProviderFault> {
        self.calls.record(id.clone());

        if let Some(fault) = self.faults.fault_for(Some(id)) {
            tracing::trace!(user_id = %id, "substitute user directory returning programmed fault");
            return Err(fault);
        }

        Ok(lock(&self.users).get(id).cloned())
    }
}
