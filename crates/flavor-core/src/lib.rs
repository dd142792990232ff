//! # flavor-core
//!
//! Shared library for Your Flavor containing the configuration schema, the
//! validation and merge pipeline, and the JSON export/import codec.
//!
//! This crate has zero dependencies on storage backends, sessions, or async
//! runtimes.  Everything in here is a pure function over values.
//!
//! # Architecture overview
//!
//! Every user owns one [`FlavorConfig`] describing how their chat cards look
//! (font size, borders, glow, optional custom markup).  Users edit it from any
//! client, so the manager in `flavor-manager` must treat every candidate as
//! untrusted input:
//!
//! - **`domain::config`** – The schema: field bounds, the border style enum,
//!   and the default template.
//!
//! - **`domain::patch`** – A lenient, typed view of arbitrary JSON plus the
//!   explicit merge used for defaulting and partial updates.
//!
//! - **`domain::validate`** – The validation routine that turns any patch
//!   into a schema-conformant configuration.
//!
//! - **`codec`** – Canonical JSON export and import parsing.

pub mod codec;
pub mod domain;

pub use codec::{export_json, parse_import, CodecError};
pub use domain::config::{
    BorderStyle, Customizations, FlavorConfig, NumericBound, CONFIG_KEY, MODULE_ID,
    SCHEMA_VERSION,
};
pub use domain::identity::{UserId, UserIdentity};
pub use domain::patch::{ConfigPatch, CustomizationsPatch};
pub use domain::validate::{is_truthy, normalize_stored, validate, MarkupPolicy};
