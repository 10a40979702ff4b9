//! Shared bookkeeping composed into every substitute provider.
//!
//! [`CallLog`] records the inputs a substitute observed; [`FaultPlan`] holds
//! the failures it has been programmed to return. Both are plain helpers held
//! by value inside each substitute rather than a common base type.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use capability::ProviderFault;

/// Locks `mutex`, recovering the data if a panicking test poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// CallLog
// ---------------------------------------------------------------------------

/// Append-only record of the calls a substitute received, in arrival order.
#[derive(Debug)]
pub struct CallLog<C> {
    entries: Mutex<Vec<C>>,
}

impl<C: Clone> CallLog<C> {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Appends one call.
    pub fn record(&self, call: C) {
        lock(&self.entries).push(call);
    }

    /// Returns a copy of every call recorded so far.
    pub fn snapshot(&self) -> Vec<C> {
        lock(&self.entries).clone()
    }

    /// Returns how many calls have been recorded.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Returns `true` if no call has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every recorded call.
    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

impl<C: Clone> Default for CallLog<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clone + PartialEq> CallLog<C> {
    /// Returns how many recorded calls equal `call`.
    pub fn count_of(&self, call: &C) -> usize {
        lock(&self.entries).iter().filter(|c| *c == call).count()
    }
}

// ---------------------------------------------------------------------------
// FaultPlan
// ---------------------------------------------------------------------------

/// Failures a substitute has been told to return.
///
/// A per-key failure wins over the blanket one.
#[derive(Debug)]
pub struct FaultPlan<K> {
    inner: Mutex<PlanState<K>>,
}

#[derive(Debug)]
struct PlanState<K> {
    always: Option<ProviderFault>,
    per_key: HashMap<K, ProviderFault>,
}

impl<K: Eq + Hash> FaultPlan<K> {
    /// Creates a plan with no programmed failures.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(PlanState {
                always: None,
                per_key: HashMap::new(),
            }),
        }
    }

    /// Makes every call fail with `fault`.
    pub fn fail_always(&self, fault: ProviderFault) {
        lock(&self.inner).always = Some(fault);
    }

    /// Makes calls for `key` fail with `fault`.
    pub fn fail_for(&self, key: K, fault: ProviderFault) {
        lock(&self.inner).per_key.insert(key, fault);
    }

    /// Removes every programmed failure.
    pub fn clear(&self) {
        let mut state = lock(&self.inner);
        state.always = None;
        state.per_key.clear();
    }

    /// Returns the failure programmed for `key`, if any.
    pub fn fault_for(&self, key: Option<&K>) -> Option<ProviderFault> {
        let state = lock(&self.inner);
        key.and_then(|k| state.per_key.get(k))
            .or(state.always.as_ref())
            .cloned()
    }
}

impl<K: Eq + Hash> Default for FaultPlan<K> {
    fn default() -> Self {
        Self::new()
    }
}
