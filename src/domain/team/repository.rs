//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamSlug};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for team persistence. Teams are keyed by slug.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Get a team by slug
    async fn get(&self, slug: &TeamSlug) -> Result<Option<Team>, DomainError>;

    /// Create a new team
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// Update an existing team
    async fn update(&self, team: Team) -> Result<Team, DomainError>;

    /// Re-key a team whose slug changed; `team` carries the new slug
    async fn rename(&self, old_slug: &TeamSlug, team: Team) -> Result<Team, DomainError>;

    /// Delete a team by slug, returns true if it existed
    async fn delete(&self, slug: &TeamSlug) -> Result<bool, DomainError>;

    /// List all teams
    async fn list(&self) -> Result<Vec<Team>, DomainError>;

    /// Check if a team exists
    async fn exists(&self, slug: &TeamSlug) -> Result<bool, DomainError>;
}
