//! Application layer use cases.
//!
//! Use cases orchestrate domain rules from `flavor-core` and depend only on
//! the collaborator traits in `infrastructure`, so every concrete store,
//! directory, or settings source can be swapped without touching this code.
//!
//! # Sub-modules
//!
//! - **`manage_config`** – The configuration manager: read, save, update,
//!   reset, export, and import a user's flavor through the validation
//!   routine.

pub mod manage_config;
