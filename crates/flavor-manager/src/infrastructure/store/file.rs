//! JSON-file flag store for the command-line host.
//!
//! All flags live in one document nested by user, namespace, and key:
//!
//! ```json
//! {
//!   "u1": {
//!     "flavor": {
//!       "config": { "schemaVersion": 1, "enabled": true, "...": "..." }
//!     }
//!   }
//! }
//! ```
//!
//! Every call re-reads the file, so edits made by another process are seen
//! immediately.  Writes rewrite the whole document into a sibling temp file
//! and rename it over the target, so a reader sees either the old document
//! or the new one, never a truncated file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use super::{FlagKey, FlagStore, StoreError};

type Document = BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>>;

/// A [`FlagStore`] persisted as a JSON file.
pub struct JsonFileFlagStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles issued through this instance.
    write_lock: Mutex<()>,
}

impl JsonFileFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, returning an empty one if the file does not exist.
    async fn load(&self) -> Result<Document, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Document::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    async fn persist(&self, doc: &Document) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| StoreError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        let content = serde_json::to_string_pretty(doc).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, content)
            .await
            .map_err(|source| StoreError::Io {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// `flags.json` → `flags.json.<pid>.tmp`, unique per process.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl FlagStore for JsonFileFlagStore {
    async fn get(&self, key: &FlagKey) -> Result<Option<Value>, StoreError> {
        let doc = self.load().await?;
        Ok(doc
            .get(key.user.as_str())
            .and_then(|namespaces| namespaces.get(&key.namespace))
            .and_then(|flags| flags.get(&key.key))
            .cloned())
    }

    async fn set(&self, key: &FlagKey, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        doc.entry(key.user.to_string())
            .or_default()
            .entry(key.namespace.clone())
            .or_default()
            .insert(key.key.clone(), value);
        self.persist(&doc).await?;
        debug!("set flag {key} in {}", self.path.display());
        Ok(())
    }

    async fn unset(&self, key: &FlagKey) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;

        let Some(namespaces) = doc.get_mut(key.user.as_str()) else {
            return Ok(());
        };
        if let Some(flags) = namespaces.get_mut(&key.namespace) {
            flags.remove(&key.key);
            if flags.is_empty() {
                namespaces.remove(&key.namespace);
            }
        }
        if namespaces.is_empty() {
            doc.remove(key.user.as_str());
        }

        self.persist(&doc).await?;
        debug!("unset flag {key} in {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flavor_core::UserId;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_store() -> (JsonFileFlagStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("flavor_test_{}", Uuid::new_v4()));
        let store = JsonFileFlagStore::new(dir.join("flags.json"));
        (store, dir)
    }

    #[tokio::test]
    async fn test_get_returns_none_when_file_absent() {
        let (store, dir) = temp_store();
        let got = store.get(&FlagKey::flavor_config(&UserId::new("u1"))).await.unwrap();
        assert!(got.is_none());
        assert!(!dir.exists(), "reads must not create the directory");
    }

    #[tokio::test]
    async fn test_set_creates_file_and_round_trips() {
        // Arrange
        let (store, dir) = temp_store();
        let key = FlagKey::flavor_config(&UserId::new("u1"));

        // Act
        store.set(&key, json!({ "enabled": true })).await.unwrap();

        // Assert
        assert!(store.path().exists());
        assert_eq!(store.get(&key).await.unwrap(), Some(json!({ "enabled": true })));

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_unset_prunes_empty_branches() {
        // Arrange
        let (store, dir) = temp_store();
        let key = FlagKey::flavor_config(&UserId::new("u1"));
        store.set(&key, json!(1)).await.unwrap();

        // Act
        store.unset(&key).await.unwrap();

        // Assert
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&content).unwrap(), json!({}));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_unset_leaves_other_users_untouched() {
        let (store, dir) = temp_store();
        let a = FlagKey::flavor_config(&UserId::new("a"));
        let b = FlagKey::flavor_config(&UserId::new("b"));
        store.set(&a, json!("a")).await.unwrap();
        store.set(&b, json!("b")).await.unwrap();

        store.unset(&a).await.unwrap();

        assert_eq!(store.get(&a).await.unwrap(), None);
        assert_eq!(store.get(&b).await.unwrap(), Some(json!("b")));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_set_leaves_no_staging_file_behind() {
        let (store, dir) = temp_store();
        store.set(&FlagKey::flavor_config(&UserId::new("u1")), json!(1)).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("flags.json")]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_readers_never_see_a_partial_write() {
        // Arrange: "b" is stored once and never touched again
        let (store, dir) = temp_store();
        let store = std::sync::Arc::new(store);
        let a = FlagKey::flavor_config(&UserId::new("a"));
        let b = FlagKey::flavor_config(&UserId::new("b"));
        store.set(&b, json!({ "enabled": false })).await.unwrap();
        let bulky = json!({ "customHtml": "x".repeat(200_000) });

        // Act: rewrite "a" repeatedly while reading "b"
        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    store.set(&a, bulky.clone()).await.unwrap();
                }
            })
        };
        let mut reads = 0;
        while !writer.is_finished() {
            let got = store.get(&b).await.unwrap();
            assert_eq!(got, Some(json!({ "enabled": false })), "read {reads} lost user b");
            reads += 1;
        }
        writer.await.unwrap();

        // Assert
        assert_eq!(store.get(&b).await.unwrap(), Some(json!({ "enabled": false })));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        // Arrange
        let (store, dir) = temp_store();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();

        // Act
        let result = store.get(&FlagKey::flavor_config(&UserId::new("u1"))).await;

        // Assert
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));

        std::fs::remove_dir_all(&dir).ok();
    }
}
