//! Storage-backed user directory

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::storage::Storage;
use crate::domain::user::{User, UserDirectory, Username};
use crate::domain::DomainError;

/// Storage-backed implementation of UserDirectory.
///
/// Stands in for the external account system: lookups hit storage, and
/// inviting an unknown username creates a minimal stub record for it.
#[derive(Debug)]
pub struct StorageUserDirectory {
    storage: Arc<dyn Storage<User>>,
}

impl StorageUserDirectory {
    /// Create a new storage-backed directory
    pub fn new(storage: Arc<dyn Storage<User>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl UserDirectory for StorageUserDirectory {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, DomainError> {
        self.storage.get(username).await
    }

    async fn find_or_create_by_usernames(
        &self,
        usernames: &[Username],
    ) -> Result<Vec<User>, DomainError> {
        let mut users = Vec::with_capacity(usernames.len());

        for username in usernames {
            let user = match self.storage.get(username).await? {
                Some(user) => user,
                None => {
                    debug!(username = %username, "Creating stub user for invitee");
                    self.storage.create(User::new(username.clone())).await?
                }
            };
            users.push(user);
        }

        Ok(users)
    }
}
