/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/v1/auth/register` - Register new user
/// - `POST /api/v1/auth/login` - Exchange credentials for a bearer token
/// - `GET /api/v1/auth/me` - Current user (bearer)

use crate::{app::AppState, error::ApiResult, extract::ValidJson};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use solin_shared::{
    models::User,
    services::identity::{self, AccessToken},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 320, message = "Email must be at most 320 characters")
    )]
    pub email: String,

    /// Public display name
    #[validate(length(min = 1, max = 64, message = "Username must be between 1 and 64 characters"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "a@x.com",
///   "username": "alice",
///   "password": "pw1"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the new account (no password hash):
///
/// ```json
/// { "id": 1, "email": "a@x.com", "username": "alice", "created_at": "..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email or username already taken
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = identity::register(
        state.store.as_ref(),
        &state.auth,
        &req.email,
        &req.username,
        &req.password,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "a@x.com",
///   "password": "pw1"
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "access_token": "eyJ...", "token_type": "bearer" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<Json<AccessToken>> {
    let token = identity::login(state.store.as_ref(), &state.auth, &req.email, &req.password).await?;
    Ok(Json(token))
}

/// Current user, as resolved by the auth layer
pub async fn me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}
