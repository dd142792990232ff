//! Storage infrastructure: host configuration persistence.
//!
//! The `config` sub-module reads and writes the TOML file that tells the
//! `flavor` binary where its flag store lives, who the acting user is, and
//! which world settings apply.  Flavor configurations themselves never touch
//! this file; they go through the flag store.

pub mod config;
