//! Team entity and membership state machine

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::membership::MembershipError;
use super::validation::{validate_team_name, validate_team_slug, TeamValidationError};
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::user::Username;

/// Team slug - the unique URL-safe identifier teams are looked up by.
///
/// Normalized to lowercase at construction so lookups are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamSlug(String);

impl TeamSlug {
    /// Create a new TeamSlug after validation, lowercasing the input
    pub fn new(slug: impl Into<String>) -> Result<Self, TeamValidationError> {
        let slug = slug.into();
        validate_team_slug(&slug)?;
        Ok(Self(slug.to_ascii_lowercase()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TeamSlug {
    type Error = TeamValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamSlug> for String {
    fn from(slug: TeamSlug) -> Self {
        slug.0
    }
}

impl std::fmt::Display for TeamSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for TeamSlug {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Team entity
///
/// Membership is partitioned into three nested sets:
/// `managers ⊆ confirmed ⊆ members`. A member present in `members` but not in
/// `confirmed` holds a pending invitation; there is no separate invitation
/// record. The manager set is never empty while the team exists - transitions
/// that would empty it are rejected and leave the team unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique URL-safe identifier
    slug: TeamSlug,
    /// Display name
    name: String,
    /// Everyone invited or confirmed
    members: BTreeSet<Username>,
    /// Members who accepted their invitation
    confirmed: BTreeSet<Username>,
    /// Confirmed members with elevated privileges
    managers: BTreeSet<Username>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team.
    ///
    /// The founder skips the invitation step: they are a confirmed member and
    /// the first manager from the instant the team exists, so there is no
    /// window in which the team has zero managers.
    pub fn new(
        slug: TeamSlug,
        name: impl Into<String>,
        founder: Username,
    ) -> Result<Self, TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;
        let now = Utc::now();

        let mut members = BTreeSet::new();
        members.insert(founder.clone());
        let confirmed = members.clone();
        let mut managers = BTreeSet::new();
        managers.insert(founder);

        Ok(Self {
            slug,
            name,
            members,
            confirmed,
            managers,
            created_at: now,
            updated_at: now,
        })
    }

    // Getters

    pub fn slug(&self) -> &TeamSlug {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &BTreeSet<Username> {
        &self.members
    }

    pub fn confirmed_members(&self) -> &BTreeSet<Username> {
        &self.confirmed
    }

    pub fn managers(&self) -> &BTreeSet<Username> {
        &self.managers
    }

    /// Members with a pending invitation
    pub fn unconfirmed_members(&self) -> BTreeSet<Username> {
        self.members.difference(&self.confirmed).cloned().collect()
    }

    /// All members ordered case-insensitively by username, for display
    pub fn roster(&self) -> Vec<Username> {
        let mut roster: Vec<Username> = self.members.iter().cloned().collect();
        roster.sort_by_key(|u| u.as_str().to_lowercase());
        roster
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Predicates

    /// True if the username is invited or confirmed
    pub fn is_member(&self, username: &Username) -> bool {
        self.members.contains(username)
    }

    /// True if the username accepted their invitation
    pub fn is_confirmed(&self, username: &Username) -> bool {
        self.confirmed.contains(username)
    }

    pub fn is_manager(&self, username: &Username) -> bool {
        self.managers.contains(username)
    }

    // Mutators

    /// Update the display name
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    /// Replace the slug (rename operation; the caller re-keys storage)
    pub fn set_slug(&mut self, slug: TeamSlug) {
        self.slug = slug;
        self.touch();
    }

    /// Invite a username, adding it to the unconfirmed subset.
    ///
    /// Idempotent: returns `true` only when the username was previously
    /// absent. Re-inviting a pending or confirmed member is a no-op, so the
    /// return value doubles as the "should be notified" signal.
    pub fn recruit(&mut self, username: Username) -> bool {
        if self.members.contains(&username) {
            return false;
        }
        self.members.insert(username);
        self.touch();
        true
    }

    /// Accept a pending invitation, moving the username to confirmed
    pub fn confirm(&mut self, username: &Username) -> Result<(), MembershipError> {
        if !self.members.contains(username) || self.confirmed.contains(username) {
            return Err(MembershipError::no_pending_invitation(username));
        }
        self.confirmed.insert(username.clone());
        self.touch();
        Ok(())
    }

    /// Remove a username from the team entirely.
    ///
    /// Covers both "leave" and manager-initiated removal. Removing the sole
    /// manager is rejected so the team is never left unmanaged.
    pub fn dismiss(&mut self, username: &Username) -> Result<(), MembershipError> {
        if !self.members.contains(username) {
            return Err(MembershipError::not_a_member(username));
        }
        if self.managers.contains(username) && self.managers.len() == 1 {
            return Err(MembershipError::LastManager);
        }
        self.members.remove(username);
        self.confirmed.remove(username);
        self.managers.remove(username);
        self.touch();
        Ok(())
    }

    /// Grant manager privileges to a confirmed member
    pub fn promote(&mut self, username: &Username) -> Result<(), MembershipError> {
        if !self.confirmed.contains(username) {
            return Err(MembershipError::not_a_member(username));
        }
        if self.managers.contains(username) {
            return Err(MembershipError::already_manager(username));
        }
        self.managers.insert(username.clone());
        self.touch();
        Ok(())
    }

    /// Revoke manager privileges; the username stays a regular member
    pub fn demote(&mut self, username: &Username) -> Result<(), MembershipError> {
        if !self.managers.contains(username) {
            return Err(MembershipError::not_a_manager(username));
        }
        if self.managers.len() == 1 {
            return Err(MembershipError::LastManager);
        }
        self.managers.remove(username);
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StorageEntity for Team {
    type Key = TeamSlug;

    fn key(&self) -> &Self::Key {
        &self.slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> Username {
        Username::new(name).unwrap()
    }

    fn team() -> Team {
        Team::new(TeamSlug::new("avengers").unwrap(), "The Avengers", user("fury")).unwrap()
    }

    #[test]
    fn test_slug_is_normalized_to_lowercase() {
        let slug = TeamSlug::new("Avengers").unwrap();
        assert_eq!(slug.as_str(), "avengers");
    }

    #[test]
    fn test_slug_invalid() {
        assert!(TeamSlug::new("").is_err());
        assert!(TeamSlug::new("-team").is_err());
        assert!(TeamSlug::new("team with spaces").is_err());
    }

    #[test]
    fn test_founder_is_confirmed_member_and_manager() {
        let team = team();
        let fury = user("fury");

        assert!(team.is_member(&fury));
        assert!(team.is_confirmed(&fury));
        assert!(team.is_manager(&fury));
        assert_eq!(team.managers().len(), 1);
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = Team::new(TeamSlug::new("x1").unwrap(), "", user("fury"));
        assert_eq!(result.unwrap_err(), TeamValidationError::EmptyName);
    }

    #[test]
    fn test_recruit_adds_unconfirmed() {
        let mut team = team();

        assert!(team.recruit(user("natasha")));
        assert!(team.is_member(&user("natasha")));
        assert!(!team.is_confirmed(&user("natasha")));
        assert!(team.unconfirmed_members().contains(&user("natasha")));
    }

    #[test]
    fn test_recruit_is_idempotent() {
        let mut team = team();

        assert!(team.recruit(user("natasha")));
        assert!(!team.recruit(user("natasha")));
        // re-inviting a confirmed member is a no-op too
        assert!(!team.recruit(user("fury")));
        assert_eq!(team.members().len(), 2);
    }

    #[test]
    fn test_confirm_moves_to_confirmed() {
        let mut team = team();
        team.recruit(user("natasha"));

        team.confirm(&user("natasha")).unwrap();
        assert!(team.is_confirmed(&user("natasha")));
        assert!(team.unconfirmed_members().is_empty());
    }

    #[test]
    fn test_confirm_without_invitation_fails() {
        let mut team = team();

        let err = team.confirm(&user("natasha")).unwrap_err();
        assert_eq!(err, MembershipError::no_pending_invitation(&user("natasha")));

        // confirming twice is also a pending-invitation error
        team.recruit(user("natasha"));
        team.confirm(&user("natasha")).unwrap();
        assert!(team.confirm(&user("natasha")).is_err());
    }

    #[test]
    fn test_dismiss_removes_from_all_sets() {
        let mut team = team();
        team.recruit(user("natasha"));
        team.confirm(&user("natasha")).unwrap();
        team.promote(&user("natasha")).unwrap();

        team.dismiss(&user("natasha")).unwrap();
        assert!(!team.is_member(&user("natasha")));
        assert!(!team.is_manager(&user("natasha")));
    }

    #[test]
    fn test_dismiss_non_member_fails() {
        let mut team = team();
        let err = team.dismiss(&user("loki")).unwrap_err();
        assert_eq!(err, MembershipError::not_a_member(&user("loki")));
    }

    #[test]
    fn test_dismiss_sole_manager_rejected() {
        let mut team = team();
        team.recruit(user("natasha"));

        let err = team.dismiss(&user("fury")).unwrap_err();
        assert_eq!(err, MembershipError::LastManager);
        // state unchanged
        assert!(team.is_manager(&user("fury")));
        assert_eq!(team.members().len(), 2);
    }

    #[test]
    fn test_promote_requires_confirmed_membership() {
        let mut team = team();

        let err = team.promote(&user("natasha")).unwrap_err();
        assert_eq!(err, MembershipError::not_a_member(&user("natasha")));

        // invited but unconfirmed is not enough
        team.recruit(user("natasha"));
        assert!(team.promote(&user("natasha")).is_err());

        team.confirm(&user("natasha")).unwrap();
        team.promote(&user("natasha")).unwrap();
        assert!(team.is_manager(&user("natasha")));
    }

    #[test]
    fn test_promote_twice_fails() {
        let mut team = team();
        team.recruit(user("natasha"));
        team.confirm(&user("natasha")).unwrap();
        team.promote(&user("natasha")).unwrap();

        let err = team.promote(&user("natasha")).unwrap_err();
        assert_eq!(err, MembershipError::already_manager(&user("natasha")));
    }

    #[test]
    fn test_demote_keeps_membership() {
        let mut team = team();
        team.recruit(user("natasha"));
        team.confirm(&user("natasha")).unwrap();
        team.promote(&user("natasha")).unwrap();

        team.demote(&user("fury")).unwrap();
        assert!(!team.is_manager(&user("fury")));
        assert!(team.is_confirmed(&user("fury")));
    }

    #[test]
    fn test_demote_sole_manager_rejected() {
        let mut team = team();

        let err = team.demote(&user("fury")).unwrap_err();
        assert_eq!(err, MembershipError::LastManager);
        assert!(team.is_manager(&user("fury")));
    }

    #[test]
    fn test_demote_non_manager_fails() {
        let mut team = team();
        team.recruit(user("natasha"));
        team.confirm(&user("natasha")).unwrap();

        let err = team.demote(&user("natasha")).unwrap_err();
        assert_eq!(err, MembershipError::not_a_manager(&user("natasha")));
    }

    #[test]
    fn test_managers_never_empty_across_sequences() {
        let mut team = team();
        team.recruit(user("a"));
        team.recruit(user("b"));
        team.confirm(&user("a")).unwrap();
        team.confirm(&user("b")).unwrap();
        team.promote(&user("a")).unwrap();

        // two managers: one may go
        team.demote(&user("fury")).unwrap();
        // now 'a' is the only manager, every removal path is rejected
        assert_eq!(team.demote(&user("a")).unwrap_err(), MembershipError::LastManager);
        assert_eq!(team.dismiss(&user("a")).unwrap_err(), MembershipError::LastManager);
        assert!(!team.managers().is_empty());
    }

    #[test]
    fn test_roster_sorted_case_insensitively() {
        let mut team = team();
        team.recruit(user("Banner"));
        team.recruit(user("clint"));

        let roster = team.roster();
        let names: Vec<&str> = roster.iter().map(|u| u.as_str()).collect();
        assert_eq!(names, vec!["Banner", "clint", "fury"]);
    }

    #[test]
    fn test_set_name_validates() {
        let mut team = team();
        assert!(team.set_name("").is_err());
        team.set_name("Earth's Mightiest").unwrap();
        assert_eq!(team.name(), "Earth's Mightiest");
    }
}
