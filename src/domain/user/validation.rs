//! Username validation

use thiserror::Error;

/// Errors that can occur during username validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username cannot exceed {0} characters")]
    UsernameTooLong(usize),

    #[error("Username contains invalid character: '{0}'. Only alphanumeric characters, underscores, and hyphens are allowed")]
    InvalidUsernameCharacter(char),
}

const MAX_USERNAME_LENGTH: usize = 50;

/// Validate a username.
///
/// The accepted shape matches the token pattern used when scanning free-text
/// invite input, so any scanned token is a valid username.
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    for c in username.chars() {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '-' {
            return Err(UserValidationError::InvalidUsernameCharacter(c));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob-42").is_ok());
        assert!(validate_username("under_score").is_ok());
        assert!(validate_username("CamelCase").is_ok());
    }

    #[test]
    fn test_empty_username() {
        assert_eq!(
            validate_username(""),
            Err(UserValidationError::EmptyUsername)
        );
    }

    #[test]
    fn test_username_too_long() {
        let long = "a".repeat(51);
        assert_eq!(
            validate_username(&long),
            Err(UserValidationError::UsernameTooLong(50))
        );
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(
            validate_username("alice smith"),
            Err(UserValidationError::InvalidUsernameCharacter(' '))
        );
        assert_eq!(
            validate_username("alice@web"),
            Err(UserValidationError::InvalidUsernameCharacter('@'))
        );
    }
}
