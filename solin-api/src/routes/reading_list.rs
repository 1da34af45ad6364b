/// Reading list endpoints
///
/// All handlers run behind the bearer auth layer and act on the caller's own
/// list only.
///
/// # Endpoints
///
/// - `POST /api/v1/user-books/reading-list` - Add a book
/// - `GET /api/v1/user-books/reading-list?status=` - List entries
/// - `PUT /api/v1/user-books/reading-list/*book_key` - Change status
/// - `DELETE /api/v1/user-books/reading-list/*book_key` - Remove a book

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ValidJson, ValidQuery},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use solin_shared::{
    models::{ReadingStatus, User, UserBook},
    services::reading_list,
};
use validator::Validate;

/// Add request
#[derive(Debug, Deserialize, Validate)]
pub struct AddRequest {
    /// Catalog key, e.g. `/works/OL1W`
    #[validate(length(min = 1, message = "Book key must not be empty"))]
    pub book_key: String,

    pub status: ReadingStatus,
}

/// Status change request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: ReadingStatus,
}

/// Optional status filter for listings
#[derive(Debug, Deserialize, Validate)]
pub struct ListQuery {
    pub status: Option<ReadingStatus>,
}

/// Adds a book to the caller's reading list
///
/// # Errors
///
/// - `400 Bad Request`: Book already on the list
/// - `422 Unprocessable Entity`: Blank book key, missing or unknown status
pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidJson(req): ValidJson<AddRequest>,
) -> ApiResult<(StatusCode, Json<UserBook>)> {
    let entry = reading_list::add(state.store.as_ref(), &user, &req.book_key, req.status).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Lists the caller's reading list, most recently updated first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<Json<Vec<UserBook>>> {
    let entries = reading_list::list(state.store.as_ref(), &user, query.status).await?;
    Ok(Json(entries))
}

/// Changes the status of a book on the caller's list
///
/// # Errors
///
/// - `404 Not Found`: Book not on the list
pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(book_key): Path<String>,
    ValidJson(req): ValidJson<UpdateStatusRequest>,
) -> ApiResult<Json<UserBook>> {
    let entry = reading_list::update_status(state.store.as_ref(), &user, &book_key, req.status).await?;
    Ok(Json(entry))
}

/// Removes a book from the caller's list
///
/// # Errors
///
/// - `404 Not Found`: Book not on the list
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(book_key): Path<String>,
) -> ApiResult<StatusCode> {
    reading_list::remove(state.store.as_ref(), &user, &book_key).await?;
    Ok(StatusCode::NO_CONTENT)
}
