//! Process-local flag store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{FlagKey, FlagStore, StoreError};

/// A [`FlagStore`] backed by a `HashMap`.
///
/// Shared between tasks through `Arc`; the async mutex keeps each call
/// atomic.
#[derive(Default)]
pub struct InMemoryFlagStore {
    flags: Mutex<HashMap<FlagKey, Value>>,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored flags across all users.
    pub async fn len(&self) -> usize {
        self.flags.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.flags.lock().await.is_empty()
    }
}

#[async_trait]
impl FlagStore for InMemoryFlagStore {
    async fn get(&self, key: &FlagKey) -> Result<Option<Value>, StoreError> {
        Ok(self.flags.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &FlagKey, value: Value) -> Result<(), StoreError> {
        self.flags.lock().await.insert(key.clone(), value);
        Ok(())
    }

    async fn unset(&self, key: &FlagKey) -> Result<(), StoreError> {
        self.flags.lock().await.remove(key);
        Ok(())
    }
}
