use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use capability::{ProviderFault, Record, RecordKey, RecordStore};

use crate::call_log::{lock, CallLog, FaultPlan};

/// One call observed by an [`InMemoryRecordStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordStoreCall {
    /// `put` with the record it was given.
    Put(Record),
    /// `get` for a key.
    Get(RecordKey),
    /// `delete` for a key.
    Delete(RecordKey),
    /// `list_keys`.
    ListKeys,
}

impl RecordStoreCall {
    fn key(&self) -> Option<&RecordKey> {
        match self {
            Self::Put(record) => Some(&record.key),
            Self::Get(key) | Self::Delete(key) => Some(key),
            Self::ListKeys => None,
        }
    }
}

/// [`RecordStore`] over a sorted in-memory map.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<BTreeMap<RecordKey, Record>>,
    faults: FaultPlan<RecordKey>,
    calls: CallLog<RecordStoreCall>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates `record` without logging a call.
    pub fn seed(&self, record: Record) {
        lock(&self.records).insert(record.key.clone(), record);
    }

    /// Makes every operation fail with `fault`.
    pub fn fail_with(&self, fault: ProviderFault) {
        self.faults.fail_always(fault);
    }

    /// Makes operations on `key` fail with `fault`.
    pub fn fail_for(&self, key: RecordKey, fault: ProviderFault) {
        self.faults.fail_for(key, fault);
    }

    /// Removes every programmed failure.
    pub fn clear_failures(&self) {
        self.faults.clear();
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> Vec<RecordStoreCall> {
        self.calls.snapshot()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    /// Returns `true` when no record is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn observe(&self, call: RecordStoreCall) -> Result<(), ProviderFault> {
        let fault = self.faults.fault_for(call.key());
        self.calls.record(call);
        match fault {
            Some(fault) => {
                tracing::trace!(%fault, "substitute record store returning programmed fault");
                Err(fault)
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put(&self, record: Record) -> Result<(), ProviderFault> {
        self.observe(RecordStoreCall::Put(record.clone()))?;
        lock(&self.records).insert(record.key.clone(), record);
        Ok(())
    }

    async fn get(&self, key: &RecordKey) -> Result<Option<Record>, ProviderFault> {
        self.observe(RecordStoreCall::Get(key.clone()))?;
        Ok(lock(&self.records).get(key).cloned())
    }

    async fn delete(&self, key: &RecordKey) -> Result<bool, ProviderFault> {
        self.observe(RecordStoreCall::Delete(key.clone()))?;
        Ok(lock(&self.records).remove(key).is_some())
    }

    async fn list_keys(&self) -> Result<Vec<RecordKey>, ProviderFault> {
        self.observe(RecordStoreCall::ListKeys)?;
        Ok(lock(&self.records).keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capability::{names, FaultKind};
    use serde_json::json;

    fn key(value: &str) -> RecordKey {
        RecordKey::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_put_get_delete_cycle() {
        let store = InMemoryRecordStore::new();
        let record = Record::new(key("a"), json!({"n": 1}));

        store.put(record.clone()).await.unwrap();
        assert_eq!(store.get(&key("a")).await.unwrap(), Some(record.clone()));
        assert!(store.delete(&key("a")).await.unwrap());
        assert!(!store.delete(&key("a")).await.unwrap());
        assert_eq!(store.get(&key("a")).await.unwrap(), None);

        assert_eq!(
            store.calls(),
            vec![
                RecordStoreCall::Put(record),
                RecordStoreCall::Get(key("a")),
                RecordStoreCall::Delete(key("a")),
                RecordStoreCall::Delete(key("a")),
                RecordStoreCall::Get(key("a")),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_keys_is_sorted_and_seed_is_not_logged() {
        let store = InMemoryRecordStore::new();
        store.seed(Record::new(key("b"), json!(2)));
        store.seed(Record::new(key("a"), json!(1)));

        assert_eq!(store.list_keys().await.unwrap(), vec![key("a"), key("b")]);
        assert_eq!(store.calls(), vec![RecordStoreCall::ListKeys]);
    }

    #[tokio::test]
    async fn test_failed_put_is_logged_but_not_applied() {
        let store = InMemoryRecordStore::new();
        store.fail_with(ProviderFault::unavailable(names::RECORD_STORE, "disk gone"));

        let err = store
            .put(Record::new(key("a"), json!(null)))
            .await
            .unwrap_err();

        assert_eq!(err.kind, FaultKind::Unavailable);
        assert_eq!(store.calls().len(), 1);
        assert!(store.is_empty());
    }
}
