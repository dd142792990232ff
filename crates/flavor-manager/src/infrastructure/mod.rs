//! Infrastructure adapters for the configuration manager.
//!
//! - **`store`**    – The synchronized per-user flag store and its adapters.
//! - **`session`**  – The acting session and user lookup.
//! - **`settings`** – World-level settings such as `allowCustomHtml`.
//! - **`storage`**  – TOML host configuration for the command-line binary.

pub mod session;
pub mod settings;
pub mod storage;
pub mod store;
