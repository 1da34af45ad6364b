/// Comment endpoints
///
/// Reading is public; posting, editing and deleting need a bearer token, and
/// editing or deleting someone else's comment is `403 Forbidden`.
///
/// # Endpoints
///
/// - `POST /api/v1/comments` - Post a comment (bearer)
/// - `GET /api/v1/comments/book/*book_key?limit=&offset=` - A book's comments
/// - `GET /api/v1/comments/:id` - One comment
/// - `PUT /api/v1/comments/:id` - Edit own comment (bearer)
/// - `DELETE /api/v1/comments/:id` - Delete own comment (bearer)

use crate::{app::AppState, error::ApiResult, extract::ValidJson};
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use solin_shared::{
    models::{CommentWithAuthor, User},
    services::comments::{self, CommentPage},
};
use validator::Validate;

/// Content limits are enforced by the comment service, in characters
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Book key must not be empty"))]
    pub book_key: String,

    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Posts a comment
///
/// # Response
///
/// `201 Created`:
///
/// ```json
/// {
///   "id": 7,
///   "book_key": "/works/OL2W",
///   "content": "Loved it",
///   "created_at": "...",
///   "updated_at": "...",
///   "user_id": 2,
///   "username": "bob"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Content empty or over 2000 characters
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidJson(req): ValidJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentWithAuthor>)> {
    let comment = comments::create(state.store.as_ref(), &user, &req.book_key, &req.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Lists a book's comments, newest first
///
/// `limit` defaults to 10 (max 50), `offset` to 0.
pub async fn list_for_book(
    State(state): State<AppState>,
    Path(book_key): Path<String>,
    page: Result<Query<CommentPage>, QueryRejection>,
) -> ApiResult<Json<Vec<CommentWithAuthor>>> {
    let Query(page) = page?;
    let listed = comments::list_for_book(state.store.as_ref(), &book_key, page).await?;
    Ok(Json(listed))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<CommentWithAuthor>> {
    let Path(id) = id?;
    Ok(Json(comments::get(state.store.as_ref(), id).await?))
}

/// Replaces the content of the caller's comment
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the author
/// - `404 Not Found`: No such comment
/// - `422 Unprocessable Entity`: Content empty or over 2000 characters
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    id: Result<Path<i64>, PathRejection>,
    ValidJson(req): ValidJson<UpdateCommentRequest>,
) -> ApiResult<Json<CommentWithAuthor>> {
    let Path(id) = id?;
    let comment = comments::update(state.store.as_ref(), id, &user, &req.content).await?;
    Ok(Json(comment))
}

/// Deletes the caller's comment
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the author
/// - `404 Not Found`: No such comment
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    comments::delete(state.store.as_ref(), id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
