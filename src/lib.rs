//! Rosterd - team membership management
//!
//! The core is the team membership state machine and its authorization
//! policy: creating teams, inviting and confirming members, promoting and
//! demoting managers, and leaving or disbanding teams. A team always keeps
//! at least one manager; every operation that could break that is rejected
//! as a result value, never a panic.
//!
//! HTTP routing, rendering, sessions, and email transport are the calling
//! layer's problem. This crate exposes [`MembershipService`] plus the
//! `is_member`/`is_manager` predicates the calling layer gates access with.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::notification::NotificationDispatcher;
use domain::team::Team;
use domain::user::User;
use infrastructure::{
    InMemoryStorage, MembershipService, NoopNotifier, StorageTeamRepository, StorageUserDirectory,
    WebhookNotifier,
};

/// Create a membership service backed by in-memory storage.
///
/// The notifier comes from configuration: a webhook dispatcher when an
/// endpoint is configured, otherwise a no-op.
pub fn create_membership_service(
    config: &AppConfig,
) -> anyhow::Result<MembershipService<StorageTeamRepository>> {
    let teams = Arc::new(StorageTeamRepository::new(Arc::new(
        InMemoryStorage::<Team>::new(),
    )));
    let directory = Arc::new(StorageUserDirectory::new(Arc::new(
        InMemoryStorage::<User>::new(),
    )));

    let notifier: Arc<dyn NotificationDispatcher> =
        match WebhookNotifier::from_config(&config.notifier)? {
            Some(webhook) => Arc::new(webhook),
            None => Arc::new(NoopNotifier::new()),
        };

    Ok(MembershipService::new(teams, directory, notifier))
}
