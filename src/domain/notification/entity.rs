//! Invitation notification payload

use serde::{Deserialize, Serialize};

use crate::domain::team::{Team, TeamSlug};
use crate::domain::user::Username;

/// One invitation to deliver: who asked whom to join which team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInvite {
    pub team_slug: TeamSlug,
    pub team_name: String,
    pub instigator: Username,
    pub invitee: Username,
}

impl TeamInvite {
    pub fn new(team: &Team, instigator: &Username, invitee: &Username) -> Self {
        Self {
            team_slug: team.slug().clone(),
            team_name: team.name().to_string(),
            instigator: instigator.clone(),
            invitee: invitee.clone(),
        }
    }

    /// Human-readable invitation text shown to the invitee
    pub fn message(&self) -> String {
        format!(
            "{} would like you to join the team {}. You can accept the invitation on your account page.",
            self.instigator, self.team_name
        )
    }
}
