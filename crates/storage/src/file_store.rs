use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use capability::{ProviderFault, Record, RecordKey, RecordStore};
use tokio::fs;

use crate::error::{OpenError, StoreError};

const EXTENSION: &str = "json";

/// [`RecordStore`] keeping one pretty-printed JSON file per record.
///
/// Layout: `{root}/{key}.json`. [`RecordKey`] only admits file-name-safe
/// characters, so keys map onto file names without escaping.
///
/// Writes go to a hidden temporary sibling first and are then renamed into
/// place, so a concurrent `get` sees either the old record or the new one.
#[derive(Debug)]
pub struct FileRecordStore {
    root: PathBuf,
    next_temp: AtomicU64,
}

impl FileRecordStore {
    /// Opens (creating if needed) the record directory at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, OpenError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|source| OpenError {
            path: root.clone(),
            source,
        })?;

        tracing::debug!(root = %root.display(), "record directory opened");
        Ok(Self {
            root,
            next_temp: AtomicU64::new(0),
        })
    }

    /// Directory the records live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &RecordKey) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }

    fn temp_path_for(&self, key: &RecordKey) -> PathBuf {
        let n = self.next_temp.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(".{key}.{}.{n}.tmp", std::process::id()))
    }

    async fn write(&self, record: &Record) -> Result<(), StoreError> {
        let path = self.path_for(&record.key);
        let bytes = serde_json::to_vec_pretty(record).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;

        let temp = self.temp_path_for(&record.key);
        if let Err(e) = fs::write(&temp, &bytes).await {
            discard(&temp).await;
            return Err(StoreError::io("write", &temp, e));
        }

        if let Err(e) = fs::rename(&temp, &path).await {
            discard(&temp).await;
            return Err(StoreError::io("rename", &path, e));
        }
        Ok(())
    }

    async fn read(&self, key: &RecordKey) -> Result<Option<Record>, StoreError> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io("read", &path, e)),
        };

        let record: Record = serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;
        if record.key != *key {
            return Err(StoreError::WrongKey {
                path,
                found: record.key.to_string(),
            });
        }
        Ok(Some(record))
    }

    async fn remove(&self, key: &RecordKey) -> Result<bool, StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io("delete", &path, e)),
        }
    }

    async fn keys(&self) -> Result<Vec<RecordKey>, StoreError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| StoreError::io("list", &self.root, e))?;

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io("list", &self.root, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(RecordKey::new)
            {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// Best-effort removal of a temp file left by a failed write. It is hidden
/// from `list_keys` either way.
async fn discard(temp: &Path) {
    if let Err(e) = fs::remove_file(temp).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::debug!(path = %temp.display(), error = %e, "temp file not removed");
        }
    }
}

fn to_fault<'a>(
    operation: &'static str,
    key: Option<&'a RecordKey>,
) -> impl FnOnce(StoreError) -> ProviderFault + 'a {
    move |error| {
        match key {
            Some(key) => tracing::warn!(operation, %key, %error, "record store operation failed"),
            None => tracing::warn!(operation, %error, "record store operation failed"),
        }
        error.into_fault()
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn put(&self, record: Record) -> Result<(), ProviderFault> {
        self.write(&record)
            .await
            .map_err(to_fault("put", Some(&record.key)))?;
        tracing::debug!(key = %record.key, "record written");
        Ok(())
    }

    async fn get(&self, key: &RecordKey) -> Result<Option<Record>, ProviderFault> {
        self.read(key).await.map_err(to_fault("get", Some(key)))
    }

    async fn delete(&self, key: &RecordKey) -> Result<bool, ProviderFault> {
        self.remove(key).await.map_err(to_fault("delete", Some(key)))
    }

    async fn list_keys(&self) -> Result<Vec<RecordKey>, ProviderFault> {
        self.keys().await.map_err(to_fault("list_keys", None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capability::FaultKind;
    use serde_json::json;
    use tempfile::TempDir;

    fn key(value: &str) -> RecordKey {
        RecordKey::new(value).unwrap()
    }

    async fn store() -> (TempDir, FileRecordStore) {
        let dir = TempDir::new().unwrap();
        let store = FileRecordStore::open(dir.path().join("records")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_creates_missing_directory() {
        let (dir, store) = store().await;
        assert!(dir.path().join("records").is_dir());
        assert_eq!(store.root(), dir.path().join("records"));
    }

    #[tokio::test]
    async fn test_put_then_get_returns_same_record() {
        let (_dir, store) = store().await;
        let record = Record::new(key("order-1"), json!({"total": 12.5, "items": ["a", "b"]}));

        store.put(record.clone()).await.unwrap();

        assert_eq!(store.get(&key("order-1")).await.unwrap(), Some(record));
        assert!(store.root().join("order-1.json").is_file());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_record() {
        let (_dir, store) = store().await;
        store.put(Record::new(key("k"), json!(1))).await.unwrap();
        store.put(Record::new(key("k"), json!(2))).await.unwrap();

        let record = store.get(&key("k")).await.unwrap().unwrap();
        assert_eq!(record.payload, json!(2));
        assert_eq!(store.list_keys().await.unwrap(), vec![key("k")]);
    }

    #[tokio::test]
    async fn test_missing_record_is_absence() {
        let (_dir, store) = store().await;
        assert_eq!(store.get(&key("nope")).await.unwrap(), None);
        assert!(!store.delete(&key("nope")).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let (_dir, store) = store().await;
        store.put(Record::new(key("k"), json!(true))).await.unwrap();

        assert!(store.delete(&key("k")).await.unwrap());
        assert_eq!(store.get(&key("k")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_malformed_fault() {
        let (_dir, store) = store().await;
        std::fs::write(store.root().join("bad.json"), b"{ not json").unwrap();

        let err = store.get(&key("bad")).await.unwrap_err();
        assert_eq!(err.kind, FaultKind::Malformed);
    }

    #[tokio::test]
    async fn test_record_filed_under_wrong_name_is_malformed_fault() {
        let (_dir, store) = store().await;
        store.put(Record::new(key("a"), json!(1))).await.unwrap();
        std::fs::rename(store.root().join("a.json"), store.root().join("b.json")).unwrap();

        let err = store.get(&key("b")).await.unwrap_err();
        assert_eq!(err.kind, FaultKind::Malformed);
    }

    #[tokio::test]
    async fn test_list_keys_is_sorted_and_skips_foreign_files() {
        let (_dir, store) = store().await;
        for k in ["zeta", "alpha", "mid"] {
            store.put(Record::new(key(k), json!(k))).await.unwrap();
        }
        std::fs::write(store.root().join("notes.txt"), b"ignore me").unwrap();
        std::fs::write(store.root().join(".hidden.json"), b"{}").unwrap();

        assert_eq!(
            store.list_keys().await.unwrap(),
            vec![key("alpha"), key("mid"), key("zeta")]
        );
    }

    fn temp_files(store: &FileRecordStore) -> Vec<String> {
        std::fs::read_dir(store.root())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[tokio::test]
    async fn test_failed_put_reports_fault_and_leaves_no_temp_file() {
        let (_dir, store) = store().await;
        // A directory in the record's place makes the final rename fail.
        std::fs::create_dir(store.root().join("k.json")).unwrap();

        let err = store.put(Record::new(key("k"), json!(1))).await.unwrap_err();

        assert_eq!(err.kind, FaultKind::Unavailable);
        assert!(err.message.starts_with("rename failed"), "{}", err.message);
        assert!(temp_files(&store).is_empty());
    }

    #[tokio::test]
    async fn test_discard_removes_partial_temp_file() {
        let (_dir, store) = store().await;
        let temp = store.temp_path_for(&key("k"));
        std::fs::write(&temp, b"{ \"partial").unwrap();

        discard(&temp).await;
        assert!(temp_files(&store).is_empty());

        // Already gone is fine.
        discard(&temp).await;
    }

    #[tokio::test]
    async fn test_vanished_directory_is_unavailable_fault() {
        let (_dir, store) = store().await;
        std::fs::remove_dir_all(store.root()).unwrap();

        let err = store.list_keys().await.unwrap_err();
        assert_eq!(err.kind, FaultKind::Unavailable);
        assert!(!err.message.contains(store.root().to_str().unwrap()));
    }
}
