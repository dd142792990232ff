//! Domain entities for Your Flavor.
//!
//! Pure business rules with no infrastructure dependencies: no storage, no
//! sessions, no async.  Code in the manager crate depends on this module, but
//! this module never depends on it, so every rule here can be unit-tested in
//! isolation.

/// Configuration schema and the default template.
pub mod config;

/// User identity value types.
pub mod identity;

/// Partial configurations and the schema-aware merge.
pub mod patch;

/// The validation routine.
pub mod validate;
