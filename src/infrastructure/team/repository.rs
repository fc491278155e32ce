//! Storage-backed team repository implementation

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::storage::Storage;
use crate::domain::team::{Team, TeamRepository, TeamSlug};
use crate::domain::DomainError;

/// Storage-backed implementation of TeamRepository
#[derive(Debug)]
pub struct StorageTeamRepository {
    storage: Arc<dyn Storage<Team>>,
}

impl StorageTeamRepository {
    /// Create a new storage-backed repository
    pub fn new(storage: Arc<dyn Storage<Team>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TeamRepository for StorageTeamRepository {
    async fn get(&self, slug: &TeamSlug) -> Result<Option<Team>, DomainError> {
        self.storage.get(slug).await
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        if self.storage.exists(team.slug()).await? {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                team.slug()
            )));
        }

        self.storage.create(team).await
    }

    async fn update(&self, team: Team) -> Result<Team, DomainError> {
        if !self.storage.exists(team.slug()).await? {
            return Err(DomainError::not_found(format!(
                "Team '{}' not found",
                team.slug()
            )));
        }

        self.storage.update(team).await
    }

    async fn rename(&self, old_slug: &TeamSlug, team: Team) -> Result<Team, DomainError> {
        if self.storage.exists(team.slug()).await? {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                team.slug()
            )));
        }
        if !self.storage.delete(old_slug).await? {
            return Err(DomainError::not_found(format!(
                "Team '{}' not found",
                old_slug
            )));
        }

        self.storage.create(team).await
    }

    async fn delete(&self, slug: &TeamSlug) -> Result<bool, DomainError> {
        self.storage.delete(slug).await
    }

    async fn list(&self) -> Result<Vec<Team>, DomainError> {
        let mut teams = self.storage.list().await?;
        teams.sort_by(|a, b| a.slug().as_str().cmp(b.slug().as_str()));
        Ok(teams)
    }

    async fn exists(&self, slug: &TeamSlug) -> Result<bool, DomainError> {
        self.storage.exists(slug).await
    }
}
