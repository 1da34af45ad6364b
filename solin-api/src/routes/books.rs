/// Catalog endpoints
///
/// Read-only views over Open Library; nothing here touches the store. Upstream
/// failures surface as `502 Bad Gateway`, a missing work as `404 Not Found`.
///
/// # Endpoints
///
/// - `GET /api/v1/books/search?q=&limit=&offset=`
/// - `GET /api/v1/books/trending?limit=`
/// - `GET /api/v1/books/subjects/:subject?limit=&offset=`
/// - `GET /api/v1/books/works/:work_id`
/// - `GET /api/v1/books/:book_key` (percent-encoded full key or bare work id)

use crate::{app::AppState, error::ApiResult, extract::ValidQuery};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use solin_shared::catalog::books::{self, BookDetail, SearchResults, SubjectBooks, TrendingBooks};
use tracing::debug;
use validator::Validate;

const DEFAULT_LIMIT: i64 = 20;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Search parameters
#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, message = "Search query must not be empty"))]
    pub q: String,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "Offset must not be negative"))]
    pub offset: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TrendingQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: i64,
}

/// Limit/offset window for subject listings
#[derive(Debug, Deserialize, Validate)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "Offset must not be negative"))]
    pub offset: i64,
}

/// Full-text search
///
/// # Response
///
/// ```json
/// {
///   "books": [{ "key": "/works/OL1W", "title": "Dune", "cover_url": "...", ... }],
///   "total": 120,
///   "offset": 0,
///   "limit": 20
/// }
/// ```
pub async fn search(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<SearchQuery>,
) -> ApiResult<Json<SearchResults>> {
    debug!(q = %query.q, limit = query.limit, offset = query.offset, "Catalog search");
    let results = books::search(state.catalog.as_ref(), &query.q, query.limit, query.offset).await?;
    Ok(Json(results))
}

/// This week's most popular books
pub async fn trending(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<TrendingQuery>,
) -> ApiResult<Json<TrendingBooks>> {
    Ok(Json(books::trending(state.catalog.as_ref(), query.limit).await?))
}

/// Books for a subject such as `fantasy` or `science_fiction`
pub async fn by_subject(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> ApiResult<Json<SubjectBooks>> {
    let listing = books::by_subject(state.catalog.as_ref(), &subject, page.limit, page.offset).await?;
    Ok(Json(listing))
}

/// Book detail by key
///
/// `%2Fworks%2FOL1W` and `OL1W` name the same work.
///
/// # Errors
///
/// - `404 Not Found`: The catalog has no such work
/// - `502 Bad Gateway`: The catalog could not be reached
pub async fn detail(
    State(state): State<AppState>,
    Path(book_key): Path<String>,
) -> ApiResult<Json<BookDetail>> {
    Ok(Json(books::details(state.catalog.as_ref(), &book_key).await?))
}

/// Book detail for `/works/{work_id}`
pub async fn work_detail(
    State(state): State<AppState>,
    Path(work_id): Path<String>,
) -> ApiResult<Json<BookDetail>> {
    let key = format!("/works/{}", work_id);
    Ok(Json(books::details(state.catalog.as_ref(), &key).await?))
}
