/// Favorites endpoints
///
/// - `POST /api/v1/user-books/favorites`
/// - `GET /api/v1/user-books/favorites`
/// - `DELETE /api/v1/user-books/favorites/*book_key`

use crate::{app::AppState, error::ApiResult, extract::ValidJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use solin_shared::{
    models::{Favorite, User},
    services::favorites,
};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AddFavoriteRequest {
    #[validate(length(min = 1, message = "Book key must not be empty"))]
    pub book_key: String,
}

pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidJson(req): ValidJson<AddFavoriteRequest>,
) -> ApiResult<(StatusCode, Json<Favorite>)> {
    let favorite = favorites::add(state.store.as_ref(), &user, &req.book_key).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<Favorite>>> {
    Ok(Json(favorites::list(state.store.as_ref(), &user).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(book_key): Path<String>,
) -> ApiResult<StatusCode> {
    favorites::remove(state.store.as_ref(), &user, &book_key).await?;
    Ok(StatusCode::NO_CONTENT)
}
