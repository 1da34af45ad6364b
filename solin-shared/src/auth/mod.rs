/// Authentication primitives for Solin
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: signed, expiring bearer tokens whose subject is the account email
/// - [`gate`]: resolves an `Authorization` header to the calling [`User`](crate::models::User)
///
/// # Example
///
/// ```no_run
/// use solin_shared::auth::password::{hash_password, verify_password, HashingParams};
/// use solin_shared::auth::jwt::{create_token, Claims};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password", &HashingParams::default())?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new("a@x.com", Duration::minutes(30));
/// let token = create_token(&claims, "a-secret-key-of-at-least-32-bytes!!")?;
/// # Ok(())
/// # }
/// ```

pub mod gate;
pub mod jwt;
pub mod password;

use chrono::Duration;

use password::HashingParams;

/// Settings the identity flows need from configuration
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HMAC secret for signing tokens
    pub jwt_secret: String,

    /// Lifetime of issued access tokens
    pub token_ttl: Duration,

    /// Argon2id cost parameters for new hashes
    pub hashing: HashingParams,
}

impl AuthSettings {
    /// Settings with the default TTL and hashing cost
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::minutes(jwt::DEFAULT_TOKEN_TTL_MINUTES),
            hashing: HashingParams::default(),
        }
    }
}
