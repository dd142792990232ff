//! User identity value types.
//!
//! The host application owns users and sessions; this crate only needs an
//! opaque id and whether the user may bypass the custom-markup restriction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque user identifier assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A resolved user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    /// Display name shown by the host.
    pub name: String,
    /// Elevated users (game masters) may keep custom markup regardless of the
    /// world setting.
    pub privileged: bool,
}

impl UserIdentity {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, privileged: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            privileged,
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged
    }
}
