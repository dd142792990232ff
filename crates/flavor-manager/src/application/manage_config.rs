//! ManageConfigUseCase: per-user flavor configuration management.
//!
//! [`ConfigManager`] is the only component that writes flavor configurations.
//! Every mutation funnels through the validation routine in `flavor-core`,
//! so nothing out of range, no unknown border style, and no unauthorized
//! markup ever reaches the flag store.
//!
//! # Data flow
//!
//! ```text
//! save/update/reset/import
//!   └─ ConfigPatch (untrusted)
//!        └─ validate(patch, MarkupPolicy)   -- flavor-core
//!             └─ FlagStore::unset  ──►  FlagStore::set
//!                                          │
//!                                   (store syncs clients)
//!                                          │
//! get_config  ◄── normalize_stored ◄── FlagStore::get
//! ```
//!
//! There is no cache: every read goes to the store, so changes made by other
//! clients are visible as soon as the store has them.
//!
//! # Clean overwrites
//!
//! The host store may merge objects on `set`, keeping nested fields the new
//! value omits.  Every save therefore unsets the flag first and only then
//! sets it.  Writes run under an async mutex: two saves through the same
//! manager never interleave, and `update_config` holds the lock across its
//! read-merge-save so concurrent updates cannot drop each other's changes.
//!
//! A stored value that is not truthy (`null`, `false`, `0`, `""`) counts as
//! no configuration at all.

use std::sync::Arc;

use flavor_core::{
    export_json, is_truthy, normalize_stored, parse_import, validate, CodecError, ConfigPatch,
    FlavorConfig, MarkupPolicy, UserId, MODULE_ID,
};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::infrastructure::session::{Session, UserDirectory};
use crate::infrastructure::settings::{WorldSettings, ALLOW_CUSTOM_HTML};
use crate::infrastructure::store::{FlagKey, FlagStore, StoreError};

/// Error type for configuration manager operations.
#[derive(Debug, Error)]
pub enum ConfigManagerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to export configuration: {0}")]
    Export(#[from] CodecError),
}

/// Loads, validates, and persists the acting user's flavor configuration.
pub struct ConfigManager {
    store: Arc<dyn FlagStore>,
    directory: Arc<dyn UserDirectory>,
    settings: Arc<dyn WorldSettings>,
    session: Session,
    /// Serializes writes (and each update's read-merge-save) on this manager.
    write_lock: Mutex<()>,
}

impl ConfigManager {
    /// Creates a manager acting on behalf of `session`.
    pub fn new(
        store: Arc<dyn FlagStore>,
        directory: Arc<dyn UserDirectory>,
        settings: Arc<dyn WorldSettings>,
        session: Session,
    ) -> Self {
        Self {
            store,
            directory,
            settings,
            session,
            write_lock: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Startup hook.  Holds no state, so calling it again is harmless.
    pub async fn initialize(&self) {
        info!(
            "flavor manager initialized for user {} ({})",
            self.session.user().name,
            self.session.user_id()
        );
    }

    /// Reads the stored configuration of `user_id`.
    ///
    /// Returns `Ok(None)` when the user is unknown or has nothing truthy
    /// stored.
    /// A stored value is normalized before it is returned; see
    /// [`normalize_stored`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigManagerError::Store`] if the store read fails.
    pub async fn get_config(
        &self,
        user_id: &UserId,
    ) -> Result<Option<FlavorConfig>, ConfigManagerError> {
        let Some(user) = self.session.resolve(user_id, self.directory.as_ref()) else {
            debug!("get_config: unknown user {user_id}");
            return Ok(None);
        };

        let stored = self.store.get(&FlagKey::flavor_config(&user.id)).await?;
        Ok(stored
            .filter(is_truthy)
            .map(|value| normalize_stored(&value)))
    }

    /// The acting user's configuration, or a fresh default template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigManagerError::Store`] if the store read fails.
    pub async fn get_current_config(&self) -> Result<FlavorConfig, ConfigManagerError> {
        Ok(self
            .get_config(self.session.user_id())
            .await?
            .unwrap_or_default())
    }

    /// Validates `candidate` and stores it as the acting user's configuration.
    ///
    /// Returns the configuration that was stored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigManagerError::Store`] if clearing or writing fails.
    pub async fn save_config(&self, candidate: &Value) -> Result<FlavorConfig, ConfigManagerError> {
        self.save_patch(&ConfigPatch::from_value(candidate)).await
    }

    /// Merges `updates` over the current configuration and saves the result.
    ///
    /// Fields not named in `updates` keep their current values; nested
    /// `customizations` merge field by field.  The read and the save happen
    /// under the write lock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigManagerError::Store`] if reading or saving fails.
    pub async fn update_config(&self, updates: &Value) -> Result<FlavorConfig, ConfigManagerError> {
        let _guard = self.write_lock.lock().await;
        let current = self.get_current_config().await?;
        let merged = ConfigPatch::from_config(&current).overlay(ConfigPatch::from_value(updates));
        self.store_patch(&merged).await
    }

    /// Replaces the acting user's configuration with the default template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigManagerError::Store`] if saving fails.
    pub async fn reset_config(&self) -> Result<FlavorConfig, ConfigManagerError> {
        self.save_patch(&ConfigPatch::from_config(&FlavorConfig::default()))
            .await
    }

    /// Returns `true` if the acting user has a truthy value stored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigManagerError::Store`] if the store read fails.
    pub async fn has_config(&self) -> Result<bool, ConfigManagerError> {
        let stored = self
            .store
            .get(&FlagKey::flavor_config(self.session.user_id()))
            .await?;
        Ok(stored.as_ref().is_some_and(is_truthy))
    }

    /// The effective configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigManagerError::Store`] if the store read fails.
    pub async fn export_config(&self) -> Result<String, ConfigManagerError> {
        let config = self.get_current_config().await?;
        Ok(export_json(&config)?)
    }

    /// Parses `text` and saves it through the normal validation path.
    ///
    /// Returns `Ok(false)` without touching the store when `text` is not a
    /// JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigManagerError::Store`] if saving fails.
    pub async fn import_config(&self, text: &str) -> Result<bool, ConfigManagerError> {
        let patch = match parse_import(text) {
            Ok(patch) => patch,
            Err(e) => {
                warn!("failed to import flavor configuration: {e}");
                return Ok(false);
            }
        };
        self.save_patch(&patch).await?;
        Ok(true)
    }

    /// Markup policy for the acting session.
    pub fn markup_policy(&self) -> MarkupPolicy {
        let world_allows = self
            .settings
            .get_bool(MODULE_ID, ALLOW_CUSTOM_HTML)
            .unwrap_or(false);
        MarkupPolicy::for_session(world_allows, self.session.user())
    }

    async fn save_patch(&self, patch: &ConfigPatch) -> Result<FlavorConfig, ConfigManagerError> {
        let _guard = self.write_lock.lock().await;
        self.store_patch(patch).await
    }

    /// Validates and writes `patch`.  Callers hold `write_lock`.
    async fn store_patch(&self, patch: &ConfigPatch) -> Result<FlavorConfig, ConfigManagerError> {
        let validated = validate(patch, self.markup_policy());
        let value = serde_json::to_value(&validated)?;
        let key = FlagKey::flavor_config(self.session.user_id());

        self.store.unset(&key).await?;
        self.store.set(&key, value).await?;

        info!("flavor configuration saved for {}", self.session.user_id());
        debug!("saved flavor configuration: {validated:?}");
        Ok(validated)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
