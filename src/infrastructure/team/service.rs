//! Membership service - team lifecycle, invitations, and manager roles
//!
//! Every operation takes the acting user explicitly; there is no ambient
//! "current user". Authorization failures, membership-rule rejections, and
//! missing teams are all result values - the only errors that propagate as
//! faults are infrastructure failures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::domain::notification::{NotificationDispatcher, TeamInvite};
use crate::domain::team::{Team, TeamRepository, TeamSlug};
use crate::domain::user::{User, UserDirectory, Username};
use crate::domain::DomainError;

/// Request for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub slug: String,
    pub name: String,
}

/// Request for updating a team's slug or name
#[derive(Debug, Clone, Default)]
pub struct UpdateTeamRequest {
    pub slug: Option<String>,
    pub name: Option<String>,
}

/// Service coordinating team membership changes.
///
/// Mutations on a team are serialized through a per-slug async mutex so
/// concurrent removals cannot race past the last-manager guard on stale
/// reads. Notification dispatch happens inside the mutation but its failure
/// is logged and dropped, never surfaced to the caller.
pub struct MembershipService<R: TeamRepository> {
    teams: Arc<R>,
    directory: Arc<dyn UserDirectory>,
    notifier: Arc<dyn NotificationDispatcher>,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<R: TeamRepository> MembershipService<R> {
    /// Create a new membership service
    pub fn new(
        teams: Arc<R>,
        directory: Arc<dyn UserDirectory>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            teams,
            directory,
            notifier,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a new team.
    ///
    /// The founder is a confirmed member and the first manager from the
    /// moment the team exists. Validation failures are returned as values so
    /// the caller can redisplay the input.
    pub async fn create(
        &self,
        founder: &Username,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        info!(slug = %request.slug, founder = %founder, "Creating team");

        let slug =
            TeamSlug::new(&request.slug).map_err(|e| DomainError::validation(e.to_string()))?;
        let team = Team::new(slug, &request.name, founder.clone())
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.teams.create(team).await
    }

    /// Look up a team by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Team, DomainError> {
        let slug = Self::parse_slug(slug)?;
        self.load(&slug).await
    }

    /// Update a team's slug and/or name. Manager only.
    ///
    /// A changed slug is re-validated, re-normalized, and moves the storage
    /// key; renaming onto an existing slug is a conflict.
    pub async fn update(
        &self,
        slug: &str,
        actor: &Username,
        request: UpdateTeamRequest,
    ) -> Result<Team, DomainError> {
        info!(slug = %slug, actor = %actor, "Updating team");

        let old_slug = Self::parse_slug(slug)?;
        let _guard = self.team_lock(&old_slug)?.lock_owned().await;

        let mut team = self.load(&old_slug).await?;
        self.require_manager(&team, actor, "edit the team")?;

        if let Some(name) = request.name {
            team.set_name(&name)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }

        if let Some(new_slug) = request.slug {
            let new_slug =
                TeamSlug::new(&new_slug).map_err(|e| DomainError::validation(e.to_string()))?;

            if new_slug != old_slug {
                team.set_slug(new_slug);
                let renamed = self.teams.rename(&old_slug, team).await?;
                self.forget_lock(&old_slug);
                return Ok(renamed);
            }
        }

        self.teams.update(team).await
    }

    /// Invite users to a team from free-text input. Manager only.
    ///
    /// Usernames are tokenized, resolved against the directory (unknown names
    /// get stub accounts), and added as unconfirmed members. Returns exactly
    /// the newly added users; they are also the notification fan-out list, so
    /// nobody already on the roster is re-notified. Dispatch failures are
    /// logged and swallowed.
    pub async fn recruit(
        &self,
        slug: &str,
        actor: &Username,
        usernames: &str,
    ) -> Result<Vec<User>, DomainError> {
        let slug = Self::parse_slug(slug)?;
        let _guard = self.team_lock(&slug)?.lock_owned().await;

        let mut team = self.load(&slug).await?;
        self.require_manager(&team, actor, "add team members")?;

        let tokens = Username::scan(usernames);
        if tokens.is_empty() {
            debug!(team = %team.slug(), "Recruit input contained no usernames");
            return Ok(Vec::new());
        }

        let resolved = self.directory.find_or_create_by_usernames(&tokens).await?;

        let newly_invited: Vec<User> = resolved
            .into_iter()
            .filter(|user| team.recruit(user.username().clone()))
            .collect();

        if newly_invited.is_empty() {
            return Ok(newly_invited);
        }

        let team = self.teams.update(team).await?;

        info!(
            team = %team.slug(),
            invited = newly_invited.len(),
            "Invited new team members"
        );

        let invites: Vec<TeamInvite> = newly_invited
            .iter()
            .map(|user| TeamInvite::new(&team, actor, user.username()))
            .collect();

        if let Err(error) = self.notifier.dispatch(&invites).await {
            warn!(team = %team.slug(), error = %error, "Failed to deliver team invitations");
        }

        Ok(newly_invited)
    }

    /// Accept the acting user's pending invitation
    pub async fn confirm(&self, slug: &str, actor: &Username) -> Result<Team, DomainError> {
        info!(slug = %slug, actor = %actor, "Confirming team membership");

        let slug = Self::parse_slug(slug)?;
        let _guard = self.team_lock(&slug)?.lock_owned().await;

        let mut team = self.load(&slug).await?;
        team.confirm(actor)?;
        self.teams.update(team).await
    }

    /// The acting user leaves the team
    pub async fn leave(&self, slug: &str, actor: &Username) -> Result<Team, DomainError> {
        info!(slug = %slug, actor = %actor, "Leaving team");

        let slug = Self::parse_slug(slug)?;
        let _guard = self.team_lock(&slug)?.lock_owned().await;

        let mut team = self.load(&slug).await?;
        team.dismiss(actor)?;
        self.teams.update(team).await
    }

    /// Remove a member from the team. Manager only.
    pub async fn dismiss(
        &self,
        slug: &str,
        actor: &Username,
        username: &Username,
    ) -> Result<Team, DomainError> {
        info!(slug = %slug, actor = %actor, username = %username, "Removing team member");

        let slug = Self::parse_slug(slug)?;
        let _guard = self.team_lock(&slug)?.lock_owned().await;

        let mut team = self.load(&slug).await?;
        self.require_manager(&team, actor, "remove team members")?;
        team.dismiss(username)?;
        self.teams.update(team).await
    }

    /// Grant manager privileges to a confirmed member. Manager only.
    pub async fn promote(
        &self,
        slug: &str,
        actor: &Username,
        username: &Username,
    ) -> Result<Team, DomainError> {
        info!(slug = %slug, actor = %actor, username = %username, "Promoting team member");

        let slug = Self::parse_slug(slug)?;
        let _guard = self.team_lock(&slug)?.lock_owned().await;

        let mut team = self.load(&slug).await?;
        self.require_manager(&team, actor, "add managers to the team")?;
        team.promote(username)?;
        self.teams.update(team).await
    }

    /// Revoke another member's manager privileges. Manager only.
    pub async fn demote(
        &self,
        slug: &str,
        actor: &Username,
        username: &Username,
    ) -> Result<Team, DomainError> {
        info!(slug = %slug, actor = %actor, username = %username, "Demoting team manager");

        let slug = Self::parse_slug(slug)?;
        let _guard = self.team_lock(&slug)?.lock_owned().await;

        let mut team = self.load(&slug).await?;
        self.require_manager(&team, actor, "remove managers from the team")?;
        team.demote(username)?;
        self.teams.update(team).await
    }

    /// The acting user relinquishes their own manager role, staying a member.
    ///
    /// Rejected when they are the only manager.
    pub async fn disown(&self, slug: &str, actor: &Username) -> Result<Team, DomainError> {
        info!(slug = %slug, actor = %actor, "Disowning team");

        let slug = Self::parse_slug(slug)?;
        let _guard = self.team_lock(&slug)?.lock_owned().await;

        let mut team = self.load(&slug).await?;
        team.demote(actor)?;
        self.teams.update(team).await
    }

    /// Delete a team. Manager only, unconditional, terminal.
    pub async fn destroy(&self, slug: &str, actor: &Username) -> Result<(), DomainError> {
        info!(slug = %slug, actor = %actor, "Destroying team");

        let slug = Self::parse_slug(slug)?;
        let _guard = self.team_lock(&slug)?.lock_owned().await;

        let team = self.load(&slug).await?;
        self.require_manager(&team, actor, "delete the team")?;

        self.teams.delete(&slug).await?;
        self.forget_lock(&slug);
        Ok(())
    }

    /// True if the username is invited or confirmed on the team
    pub async fn is_member(&self, slug: &str, username: &Username) -> Result<bool, DomainError> {
        let slug = Self::parse_slug(slug)?;
        Ok(self.load(&slug).await?.is_member(username))
    }

    /// True if the username manages the team
    pub async fn is_manager(&self, slug: &str, username: &Username) -> Result<bool, DomainError> {
        let slug = Self::parse_slug(slug)?;
        Ok(self.load(&slug).await?.is_manager(username))
    }

    // Internals

    /// A slug that doesn't parse can't name a team, so lookups report it the
    /// same way as a missing one.
    fn parse_slug(slug: &str) -> Result<TeamSlug, DomainError> {
        TeamSlug::new(slug)
            .map_err(|_| DomainError::not_found(format!("Team '{}' not found", slug)))
    }

    async fn load(&self, slug: &TeamSlug) -> Result<Team, DomainError> {
        self.teams
            .get(slug)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", slug)))
    }

    fn require_manager(
        &self,
        team: &Team,
        actor: &Username,
        action: &str,
    ) -> Result<(), DomainError> {
        if team.is_manager(actor) {
            Ok(())
        } else {
            Err(DomainError::unauthorized(format!(
                "'{}' is not allowed to {}",
                actor, action
            )))
        }
    }

    fn team_lock(&self, slug: &TeamSlug) -> Result<Arc<tokio::sync::Mutex<()>>, DomainError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to acquire lock table: {}", e)))?;

        Ok(locks
            .entry(slug.as_str().to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone())
    }

    fn forget_lock(&self, slug: &TeamSlug) {
        if let Ok(mut locks) = self.locks.lock() {
            locks.remove(slug.as_str());
        }
    }
}
