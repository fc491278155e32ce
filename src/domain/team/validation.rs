//! Team validation

use thiserror::Error;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Slug can't be blank")]
    EmptySlug,

    #[error("Team slug cannot exceed {0} characters")]
    SlugTooLong(usize),

    #[error("Team slug can only contain alphanumeric characters and hyphens")]
    InvalidSlugCharacters,

    #[error("Team slug cannot start or end with a hyphen")]
    InvalidSlugFormat,

    #[error("Team name cannot be empty")]
    EmptyName,

    #[error("Team name cannot exceed {0} characters")]
    NameTooLong(usize),
}

const MAX_TEAM_SLUG_LENGTH: usize = 50;
const MAX_TEAM_NAME_LENGTH: usize = 100;

/// Validate a team slug (before normalization)
pub fn validate_team_slug(slug: &str) -> Result<(), TeamValidationError> {
    if slug.is_empty() {
        return Err(TeamValidationError::EmptySlug);
    }

    if slug.len() > MAX_TEAM_SLUG_LENGTH {
        return Err(TeamValidationError::SlugTooLong(MAX_TEAM_SLUG_LENGTH));
    }

    if !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(TeamValidationError::InvalidSlugCharacters);
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(TeamValidationError::InvalidSlugFormat);
    }

    Ok(())
}

/// Validate a team display name
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.len() > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}
