//! User entity and username type
//!
//! Accounts live in an external directory; this crate only references users
//! by username and stores minimal stubs for invitees that don't exist yet.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::{validate_username, UserValidationError};
use crate::domain::storage::{StorageEntity, StorageKey};

static USERNAME_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w-]+").unwrap());

/// Username - the external identity users are referenced by
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Create a new Username after validation
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        validate_username(&username)?;
        Ok(Self(username))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract usernames from free-text input, in order of appearance.
    ///
    /// Tokens are whatever matches `[\w-]+`, so "alice, bob; carol" and
    /// "alice bob carol" both yield three names. Duplicates are dropped,
    /// tokens too long to be usernames are skipped.
    pub fn scan(input: &str) -> Vec<Username> {
        let mut seen = std::collections::HashSet::new();
        USERNAME_TOKEN
            .find_iter(input)
            .filter_map(|token| Username::new(token.as_str()).ok())
            .filter(|username| seen.insert(username.clone()))
            .collect()
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for Username {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// User entity as this crate sees it: a named reference into the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    username: Username,
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a user record for a username
    pub fn new(username: Username) -> Self {
        Self {
            username,
            created_at: Utc::now(),
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl StorageEntity for User {
    type Key = Username;

    fn key(&self) -> &Self::Key {
        &self.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_valid() {
        let username = Username::new("alice-42").unwrap();
        assert_eq!(username.as_str(), "alice-42");
    }

    #[test]
    fn test_username_invalid() {
        assert!(Username::new("").is_err());
        assert!(Username::new("no spaces").is_err());
    }

    #[test]
    fn test_username_preserves_case() {
        let username = Username::new("Alice").unwrap();
        assert_eq!(username.as_str(), "Alice");
    }

    #[test]
    fn test_scan_splits_on_any_separator() {
        let names = Username::scan("alice, bob; carol\ndave");
        let names: Vec<&str> = names.iter().map(|u| u.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol", "dave"]);
    }

    #[test]
    fn test_scan_deduplicates_preserving_order() {
        let names = Username::scan("bob alice bob");
        let names: Vec<&str> = names.iter().map(|u| u.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);
    }

    #[test]
    fn test_scan_empty_input() {
        assert!(Username::scan("").is_empty());
        assert!(Username::scan(", ;").is_empty());
    }

    #[test]
    fn test_user_keyed_by_username() {
        let user = User::new(Username::new("alice").unwrap());
        assert_eq!(user.key().as_str(), "alice");
    }
}
