/// Registration, login and the current-user lookup
///
/// Password hashing and verification are CPU-bound (Argon2id at 64 MiB by
/// default), so both run on the blocking pool rather than on a runtime worker.

use tracing::{debug, info};

use super::{ServiceError, ServiceResult, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::auth::gate::{self, AuthError};
use crate::auth::jwt::{create_token, Claims};
use crate::auth::password::{hash_password, verify_password, HashingParams, PasswordError};
use crate::auth::AuthSettings;
use crate::models::{CreateUser, User};
use crate::store::IdentityStore;

/// Single message for every failed login
pub const BAD_CREDENTIALS: &str = "Incorrect email or password";

/// Token returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessToken {
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

impl AccessToken {
    fn bearer(token: String) -> Self {
        Self {
            access_token: token,
            token_type: "bearer".to_string(),
        }
    }
}

async fn hash_blocking(password: String, params: HashingParams) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, &params))
        .await
        .map_err(|e| ServiceError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(ServiceError::from)
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::VerifyError(format!("Verification task failed: {}", e)))?
}

/// Creates an account
///
/// The email is checked before the username, so a request colliding on both
/// reports the email.
pub async fn register<S: IdentityStore + ?Sized>(
    store: &S,
    settings: &AuthSettings,
    email: &str,
    username: &str,
    password: &str,
) -> ServiceResult<User> {
    if store.find_user_by_email(email).await?.is_some() {
        return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
    }
    if store.find_user_by_username(username).await?.is_some() {
        return Err(ServiceError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let password_hash = hash_blocking(password.to_string(), settings.hashing).await?;

    let user = store
        .create_user(CreateUser {
            email: email.to_string(),
            username: username.to_string(),
            password_hash,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Exchanges credentials for a bearer token
pub async fn login<S: IdentityStore + ?Sized>(
    store: &S,
    settings: &AuthSettings,
    email: &str,
    password: &str,
) -> ServiceResult<AccessToken> {
    let Some(user) = store.find_user_by_email(email).await? else {
        debug!("Login for unknown email");
        return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };

    // A stored hash that cannot be parsed counts as a mismatch
    let valid = match verify_blocking(password.to_string(), user.password_hash.clone()).await {
        Ok(valid) => valid,
        Err(PasswordError::InvalidHash(e)) => {
            debug!(user_id = user.id, error = %e, "Stored password hash unreadable");
            false
        }
        Err(e) => return Err(e.into()),
    };

    if !valid {
        debug!(user_id = user.id, "Password mismatch");
        return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let claims = Claims::new(user.email.clone(), settings.token_ttl);
    let token = create_token(&claims, &settings.jwt_secret)?;

    info!(user_id = user.id, "User logged in");
    Ok(AccessToken::bearer(token))
}

/// Resolves the user behind an `Authorization` header value
pub async fn current_user<S: IdentityStore + ?Sized>(
    store: &S,
    settings: &AuthSettings,
    authorization: Option<&str>,
) -> ServiceResult<User> {
    gate::authenticate(store, &settings.jwt_secret, authorization)
        .await
        .map_err(ServiceError::from)
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(e) => e.into(),
            AuthError::UnknownUser => ServiceError::Unauthorized("User not found".to_string()),
            _ => ServiceError::Unauthorized("Could not validate credentials".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::resolve_subject;
    use crate::store::MemoryStore;

    fn settings() -> AuthSettings {
        AuthSettings {
            hashing: HashingParams {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
            ..AuthSettings::new("test-secret-key-at-least-32-bytes-long")
        }
    }

    #[tokio::test]
    async fn test_register_then_login_resolves_email() {
        let store = MemoryStore::new();
        let settings = settings();

        let user = register(&store, &settings, "a@x.com", "alice", "pw1").await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_ne!(user.password_hash, "pw1");

        let token = login(&store, &settings, "a@x.com", "pw1").await.unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(
            resolve_subject(&token.access_token, &settings.jwt_secret).unwrap(),
            "a@x.com"
        );
    }

    #[tokio::test]
    async fn test_email_conflict_takes_precedence() {
        let store = MemoryStore::new();
        let settings = settings();
        register(&store, &settings, "a@x.com", "alice", "pw1").await.unwrap();

        let err = register(&store, &settings, "a@x.com", "alice", "pw2").await.unwrap_err();
        assert_eq!(err, ServiceError::Conflict(EMAIL_TAKEN.to_string()));

        let err = register(&store, &settings, "b@x.com", "alice", "pw2").await.unwrap_err();
        assert_eq!(err, ServiceError::Conflict(USERNAME_TAKEN.to_string()));
    }

    #[tokio::test]
    async fn test_login_failures_share_one_message() {
        let store = MemoryStore::new();
        let settings = settings();
        register(&store, &settings, "a@x.com", "alice", "pw1").await.unwrap();

        let wrong_password = login(&store, &settings, "a@x.com", "nope").await.unwrap_err();
        let unknown_email = login(&store, &settings, "z@x.com", "pw1").await.unwrap_err();

        assert_eq!(wrong_password, ServiceError::Unauthorized(BAD_CREDENTIALS.to_string()));
        assert_eq!(wrong_password, unknown_email);
    }

    #[tokio::test]
    async fn test_current_user_after_deletion_is_unauthorized() {
        let store = MemoryStore::new();
        let settings = settings();
        let user = register(&store, &settings, "a@x.com", "alice", "pw1").await.unwrap();
        let token = login(&store, &settings, "a@x.com", "pw1").await.unwrap();
        let header = format!("Bearer {}", token.access_token);

        let me = current_user(&store, &settings, Some(&header)).await.unwrap();
        assert_eq!(me.id, user.id);

        store.delete_user(user.id).await.unwrap();
        let err = current_user(&store, &settings, Some(&header)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
