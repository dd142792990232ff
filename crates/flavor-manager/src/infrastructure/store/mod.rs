//! The synchronized per-user flag store.
//!
//! The host application persists flags per (user, namespace, key) and
//! propagates every write to all connected clients.  This module defines the
//! contract the configuration manager consumes and ships two adapters:
//!
//! - [`memory::InMemoryFlagStore`] – process-local map, used by tests and
//!   embedding hosts that sync elsewhere.
//! - [`file::JsonFileFlagStore`] – a single JSON document on disk, used by the
//!   `flavor` command-line binary.
//!
//! # Testability
//!
//! The [`FlagStore`] trait lets unit tests inject a `mockall` mock to check
//! call ordering and to simulate store outages.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use flavor_core::{UserId, CONFIG_KEY, MODULE_ID};
use serde_json::Value;
use thiserror::Error;

pub mod file;
pub mod memory;

/// Address of one stored flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagKey {
    pub user: UserId,
    pub namespace: String,
    pub key: String,
}

impl FlagKey {
    pub fn new(user: UserId, namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            user,
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    /// The flag holding `user`'s flavor configuration.
    pub fn flavor_config(user: &UserId) -> Self {
        Self::new(user.clone(), MODULE_ID, CONFIG_KEY)
    }
}

impl fmt::Display for FlagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.user, self.namespace, self.key)
    }
}

/// Error type for flag store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing service rejected or could not serve the request.
    #[error("flag store unavailable: {0}")]
    Unavailable(String),

    /// A file system I/O error occurred.
    #[error("I/O error accessing flag store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted document could not be parsed or written as JSON.
    #[error("flag store at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-user key-value store with cross-client propagation.
///
/// Values are structurally arbitrary JSON; callers are responsible for
/// interpreting them.  Each call either completes or fails outright.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Reads a flag.  `Ok(None)` when nothing is stored.
    async fn get(&self, key: &FlagKey) -> Result<Option<Value>, StoreError>;

    /// Writes a flag, replacing any previous value.
    async fn set(&self, key: &FlagKey, value: Value) -> Result<(), StoreError>;

    /// Removes a flag.  Removing an absent flag succeeds.
    async fn unset(&self, key: &FlagKey) -> Result<(), StoreError>;
}
