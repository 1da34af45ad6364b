/// Library operations
///
/// The business rules of Solin live here, one module per area. Each function
/// takes the store trait it needs plus the already-authenticated caller, and
/// returns a [`ServiceError`] the API layer maps onto an HTTP status.
///
/// - [`identity`]: registration, login, current user
/// - [`reading_list`]: per-user reading status for books
/// - [`favorites`]: per-user favorite books
/// - [`comments`]: public, author-owned comments
///
/// Existence checks performed here are only early exits: the store's own
/// uniqueness enforcement is authoritative, and a `StoreError::Conflict` that
/// slips past a check is reported exactly like the checked case.

pub mod comments;
pub mod favorites;
pub mod identity;
pub mod reading_list;

use crate::auth::{jwt::JwtError, password::PasswordError};
use crate::models::favorite::FAVORITE_CONSTRAINT;
use crate::models::user::{EMAIL_CONSTRAINT, USERNAME_CONSTRAINT};
use crate::models::user_book::USER_BOOK_CONSTRAINT;
use crate::store::StoreError;

/// Conflict message for a taken email
pub const EMAIL_TAKEN: &str = "Email already registered";

/// Conflict message for a taken username
pub const USERNAME_TAKEN: &str = "Username already taken";

/// Conflict message for a duplicate reading-list entry
pub const ALREADY_IN_READING_LIST: &str = "Book already in your reading list";

/// Conflict message for a duplicate favorite
pub const ALREADY_IN_FAVORITES: &str = "Book already in favorites";

/// Error type for library operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected before touching storage
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Uniqueness rule violated
    #[error("{0}")]
    Conflict(String),

    /// Caller could not be authenticated
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is authenticated but does not own the resource
    #[error("{0}")]
    Forbidden(String),

    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Anything the caller cannot fix
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Book keys are opaque; only a blank key is refused
pub(crate) fn validate_book_key(book_key: &str) -> ServiceResult<()> {
    if book_key.trim().is_empty() {
        return Err(ServiceError::validation("book_key", "Book key must not be empty"));
    }
    Ok(())
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { constraint } => {
                let message = match constraint.as_str() {
                    EMAIL_CONSTRAINT => EMAIL_TAKEN,
                    USERNAME_CONSTRAINT => USERNAME_TAKEN,
                    USER_BOOK_CONSTRAINT => ALREADY_IN_READING_LIST,
                    FAVORITE_CONSTRAINT => ALREADY_IN_FAVORITES,
                    _ => "Resource already exists",
                };
                ServiceError::Conflict(message.to_string())
            }
            // The only reference is the caller's own account
            StoreError::MissingReference(_) => ServiceError::Unauthorized("User not found".to_string()),
            StoreError::Database(msg) => ServiceError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicts_named_by_constraint() {
        let err: ServiceError = StoreError::Conflict {
            constraint: USER_BOOK_CONSTRAINT.to_string(),
        }
        .into();
        assert_eq!(err, ServiceError::Conflict(ALREADY_IN_READING_LIST.to_string()));

        let err: ServiceError = StoreError::Conflict {
            constraint: USERNAME_CONSTRAINT.to_string(),
        }
        .into();
        assert_eq!(err, ServiceError::Conflict(USERNAME_TAKEN.to_string()));
    }

    #[test]
    fn test_book_key_is_opaque() {
        assert!(validate_book_key("/works/OL1W").is_ok());
        assert!(validate_book_key(&"k".repeat(1000)).is_ok());
        assert!(validate_book_key("  ").is_err());
        assert!(validate_book_key("").is_err());
    }

    #[test]
    fn test_database_errors_are_internal() {
        let err: ServiceError = StoreError::Database("connection reset".to_string()).into();
        assert!(matches!(err, ServiceError::Internal(_)));
    }
}
