//! Domain layer - Core business logic and entities

pub mod error;
pub mod notification;
pub mod storage;
pub mod team;
pub mod user;

pub use error::DomainError;
pub use notification::{NotificationDispatcher, TeamInvite};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use team::{
    validate_team_name, validate_team_slug, MembershipError, Team, TeamRepository, TeamSlug,
    TeamValidationError,
};
pub use user::{validate_username, User, UserDirectory, Username, UserValidationError};
