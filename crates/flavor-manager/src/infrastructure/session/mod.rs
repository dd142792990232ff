//! The acting session and user lookup.
//!
//! The manager never reads an ambient "current user".  Instead it is built
//! with a [`Session`] naming the acting identity, and a [`UserDirectory`] for
//! resolving other users' ids.

use std::collections::HashMap;

use flavor_core::{UserId, UserIdentity};

/// Resolves user ids known to the host.
pub trait UserDirectory: Send + Sync {
    /// Looks up a user.  `None` when the id is unknown.
    fn lookup_user(&self, id: &UserId) -> Option<UserIdentity>;
}

/// The identity on whose behalf every manager operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    acting: UserIdentity,
}

impl Session {
    pub fn new(acting: UserIdentity) -> Self {
        Self { acting }
    }

    pub fn user(&self) -> &UserIdentity {
        &self.acting
    }

    pub fn user_id(&self) -> &UserId {
        &self.acting.id
    }

    /// Resolves `id` to the acting user when it matches, otherwise through
    /// `directory`.
    pub fn resolve(&self, id: &UserId, directory: &dyn UserDirectory) -> Option<UserIdentity> {
        if *id == self.acting.id {
            Some(self.acting.clone())
        } else {
            directory.lookup_user(id)
        }
    }
}

/// A fixed roster of users.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: HashMap<UserId, UserIdentity>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_users(users: impl IntoIterator<Item = UserIdentity>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }

    /// Registers or replaces a user.
    pub fn insert(&mut self, user: UserIdentity) {
        self.users.insert(user.id.clone(), user);
    }
}

impl UserDirectory for StaticUserDirectory {
    fn lookup_user(&self, id: &UserId) -> Option<UserIdentity> {
        self.users.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_session_user() {
        // Arrange: the directory holds a stale copy of the session user
        let acting = UserIdentity::new("u1", "Alice", true);
        let directory =
            StaticUserDirectory::from_users([UserIdentity::new("u1", "Alice (old)", false)]);
        let session = Session::new(acting.clone());

        // Act
        let resolved = session.resolve(&UserId::new("u1"), &directory);

        // Assert
        assert_eq!(resolved, Some(acting));
    }

    #[test]
    fn test_resolve_falls_back_to_directory() {
        let mut directory = StaticUserDirectory::new();
        directory.insert(UserIdentity::new("u2", "Bob", false));
        let session = Session::new(UserIdentity::new("u1", "Alice", false));

        let resolved = session.resolve(&UserId::new("u2"), &directory);

        assert_eq!(resolved.map(|u| u.name), Some("Bob".to_string()));
    }

    #[test]
    fn test_resolve_unknown_user_is_none() {
        let session = Session::new(UserIdentity::new("u1", "Alice", false));
        assert!(session
            .resolve(&UserId::new("ghost"), &StaticUserDirectory::new())
            .is_none());
    }
}
