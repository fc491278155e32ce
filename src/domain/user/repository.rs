//! User directory trait

use async_trait::async_trait;

use super::entity::{User, Username};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Port into the external user directory.
///
/// Inviting someone who has no account yet creates a minimal stub for them,
/// so invitations never fail on unknown usernames.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user by username
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, DomainError>;

    /// Bulk resolve usernames, creating stubs for the unknown ones.
    ///
    /// Returns users in the order the usernames were given.
    async fn find_or_create_by_usernames(
        &self,
        usernames: &[Username],
    ) -> Result<Vec<User>, DomainError>;
}
