/// Access gate
///
/// Turns the raw `Authorization` header of a request into the [`User`] it
/// speaks for. Every failure mode (no header, wrong scheme, bad signature,
/// expired token, account gone) collapses to an [`AuthError`] that the API
/// layer renders as `401 Unauthorized`; only storage failures are reported
/// differently.
///
/// # Example
///
/// ```no_run
/// use solin_shared::auth::gate::authenticate;
/// use solin_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = authenticate(&store, "secret", Some("Bearer eyJ...")).await?;
/// println!("Hello, {}", user.username);
/// # Ok(())
/// # }
/// ```

use tracing::debug;

use super::jwt::{resolve_subject, JwtError};
use crate::models::User;
use crate::store::{IdentityStore, StoreError};

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token failed verification
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token verified but its subject no longer exists
    #[error("Unknown user")]
    UnknownUser,

    /// Store lookup failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Extracts the token from a `Bearer <token>` header value
///
/// The scheme is matched case-insensitively; surrounding whitespace around the
/// token is ignored.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Resolves the caller behind an `Authorization` header value
pub async fn authenticate<S: IdentityStore + ?Sized>(
    store: &S,
    secret: &str,
    header: Option<&str>,
) -> Result<User, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;
    let token = bearer_token(header)?;
    let email = resolve_subject(token, secret)?;

    match store.find_user_by_email(&email).await? {
        Some(user) => Ok(user),
        None => {
            debug!("Token subject does not match any user");
            Err(AuthError::UnknownUser)
        }
    }
}
