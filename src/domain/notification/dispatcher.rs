//! Notification dispatcher trait

use async_trait::async_trait;

use super::entity::TeamInvite;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Port for delivering invitation notifications.
///
/// Delivery is best-effort: implementations report failures through the
/// returned error, and the membership service logs and drops them. A failed
/// delivery never rolls back the membership change that triggered it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver one notification per invite
    async fn dispatch(&self, invites: &[TeamInvite]) -> Result<(), DomainError>;
}
