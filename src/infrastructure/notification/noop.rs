//! No-op notifier

use async_trait::async_trait;
use tracing::debug;

use crate::domain::notification::{NotificationDispatcher, TeamInvite};
use crate::domain::DomainError;

/// Dispatcher that records nothing and always succeeds.
///
/// Used when no notification endpoint is configured, and in tests.
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl NoopNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationDispatcher for NoopNotifier {
    async fn dispatch(&self, invites: &[TeamInvite]) -> Result<(), DomainError> {
        debug!(count = invites.len(), "Dropping invitation notifications (no notifier configured)");
        Ok(())
    }
}
