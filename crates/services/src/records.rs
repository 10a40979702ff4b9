use std::sync::Arc;

use capability::{Record, RecordKey, RecordStore};
use serde_json::Value;

use crate::ServiceError;

/// Saves and loads JSON documents through a [`RecordStore`].
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
}

impl RecordService {
    /// Creates a service writing to `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Stores `payload` under `key`, stamped with the current time.
    ///
    /// A `null` payload is refused without touching the store; use
    /// [`RecordService::remove`] to get rid of a record.
    #[tracing::instrument(skip(self, key, payload), fields(key = %key))]
    pub async fn save(&self, key: RecordKey, payload: Value) -> Result<Record, ServiceError> {
        if payload.is_null() {
            return Err(ServiceError::invalid(format!(
                "refusing to store a null payload under '{key}'"
            )));
        }

        let record = Record::new(key, payload);
        self.store.put(record.clone()).await?;
        tracing::info!(stored_at = %record.stored_at, "record saved");
        Ok(record)
    }

    /// Loads the record under `key`, if there is one.
    pub async fn load(&self, key: &RecordKey) -> Result<Option<Record>, ServiceError> {
        Ok(self.store.get(key).await?)
    }

    /// Removes the record under `key`. Returns `false` if there was none.
    #[tracing::instrument(skip(self, key), fields(key = %key))]
    pub async fn remove(&self, key: &RecordKey) -> Result<bool, ServiceError> {
        let removed = self.store.delete(key).await?;
        tracing::info!(removed, "record removal handled");
        Ok(removed)
    }

    /// Lists every stored key, ascending.
    pub async fn keys(&self) -> Result<Vec<RecordKey>, ServiceError> {
        Ok(self.store.list_keys().await?)
    }
}
