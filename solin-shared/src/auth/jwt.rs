/// JWT bearer token issuing and validation
///
/// Tokens are self-contained and stateless: the subject (the user's email) and
/// the expiry instant are embedded in the signed payload, and nothing is kept
/// server-side. A token therefore stays valid until it expires.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: caller-supplied TTL (30 minutes by default)
/// - **Validation**: signature, `exp`, `nbf`, issuer and a non-empty subject
///
/// # Example
///
/// ```
/// use solin_shared::auth::jwt::{create_token, resolve_subject, Claims, DEFAULT_TOKEN_TTL_MINUTES};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-key-of-at-least-32-bytes!!";
/// let claims = Claims::new("a@x.com", Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES));
/// let token = create_token(&claims, secret)?;
///
/// assert_eq!(resolve_subject(&token, secret)?, "a@x.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer written into and required from every token
pub const ISSUER: &str = "solin";

/// Default access token lifetime
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token carries no usable subject
    #[error("Token is missing the subject claim")]
    MissingSubject,
}

/// JWT claims
///
/// `sub` holds the account email; the remaining fields are the standard
/// registered claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - account email
    pub sub: String,

    /// Issuer - always "solin"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for `email` expiring after `ttl`
    pub fn new(email: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: email.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a compact JWT
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and returns its claims
///
/// # Errors
///
/// - `JwtError::Expired` when `exp` has passed
/// - `JwtError::MissingSubject` when `sub` is empty
/// - `JwtError::ValidationError` for bad signatures, malformed tokens, a
///   wrong issuer or a missing required claim
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => {
            JwtError::MissingSubject
        }
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(JwtError::MissingSubject);
    }

    Ok(token_data.claims)
}

/// Validates a token and returns the subject email
pub fn resolve_subject(token: &str, secret: &str) -> Result<String, JwtError> {
    validate_token(token, secret).map(|claims| claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("a@x.com", Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES));

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_resolve() {
        let claims = Claims::new("a@x.com", Duration::minutes(5));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated, claims);
        assert_eq!(resolve_subject(&token, SECRET).unwrap(), "a@x.com");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(&Claims::new("a@x.com", Duration::minutes(5)), SECRET).unwrap();

        let result = validate_token(&token, "another-secret-key-at-least-32-bytes");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::new("a@x.com", Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = create_token(&Claims::new("a@x.com", Duration::minutes(5)), SECRET).unwrap();
        let forged = create_token(&Claims::new("b@x.com", Duration::minutes(5)), "x".repeat(40).as_str()).unwrap();

        // Splice the forged payload onto the original signature
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(validate_token(&spliced, SECRET).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(validate_token("not-a-jwt", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }

    #[test]
    fn test_missing_subject_rejected() {
        let now = Utc::now().timestamp();
        let payload = json!({ "iss": ISSUER, "iat": now, "nbf": now, "exp": now + 600 });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            validate_token(&token, SECRET),
            Err(JwtError::MissingSubject) | Err(JwtError::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_subject_rejected() {
        let token = create_token(&Claims::new("", Duration::minutes(5)), SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::MissingSubject)));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = Claims::new("a@x.com", Duration::minutes(5));
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, SECRET).is_err());
    }
}
