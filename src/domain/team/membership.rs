//! Membership transition errors

use thiserror::Error;

use crate::domain::user::Username;

/// Rejections raised by membership state transitions.
///
/// These are business outcomes, not faults: callers surface them as user
/// messages and the team is left unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MembershipError {
    #[error("'{username}' is not a member of this team")]
    NotAMember { username: Username },

    #[error("'{username}' is not a manager of this team")]
    NotAManager { username: Username },

    #[error("'{username}' is already a manager of this team")]
    AlreadyManager { username: Username },

    #[error("'{username}' doesn't have a pending invitation to this team")]
    NoPendingInvitation { username: Username },

    #[error("you can't quit when you're the only manager")]
    LastManager,
}

impl MembershipError {
    pub fn not_a_member(username: &Username) -> Self {
        Self::NotAMember {
            username: username.clone(),
        }
    }

    pub fn not_a_manager(username: &Username) -> Self {
        Self::NotAManager {
            username: username.clone(),
        }
    }

    pub fn already_manager(username: &Username) -> Self {
        Self::AlreadyManager {
            username: username.clone(),
        }
    }

    pub fn no_pending_invitation(username: &Username) -> Self {
        Self::NoPendingInvitation {
            username: username.clone(),
        }
    }
}
