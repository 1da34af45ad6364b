/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use solin_api::{app::AppState, config::Config};
/// use solin_shared::catalog::OpenLibraryClient;
/// use solin_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let catalog = OpenLibraryClient::new(config.catalog_config())?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(catalog), config);
/// let app = solin_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use solin_shared::{
    auth::{gate, AuthSettings},
    catalog::BookCatalog,
    store::Store,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Users, reading lists, favorites and comments
    pub store: Arc<dyn Store>,

    /// Upstream book metadata
    pub catalog: Arc<dyn BookCatalog>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token and hashing settings derived from `config`
    pub auth: Arc<AuthSettings>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, catalog: Arc<dyn BookCatalog>, config: Config) -> Self {
        let auth = Arc::new(config.auth_settings());
        Self {
            store,
            catalog,
            config: Arc::new(config),
            auth,
        }
    }

    /// Replaces the auth settings, e.g. with cheaper hashing in tests
    pub fn with_auth(mut self, auth: AuthSettings) -> Self {
        self.auth = Arc::new(auth);
        self
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /                          # Welcome
/// ├── GET /health                    # Health check
/// └── /api/v1/
///     ├── /auth/
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── GET  /me               (bearer)
///     ├── /user-books/               (bearer)
///     │   ├── POST|GET    /reading-list
///     │   ├── PUT|DELETE  /reading-list/*book_key
///     │   ├── POST|GET    /favorites
///     │   └── DELETE      /favorites/*book_key
///     ├── /comments/
///     │   ├── POST   /               (bearer)
///     │   ├── GET    /book/*book_key
///     │   ├── GET    /:id
///     │   └── PUT|DELETE /:id        (bearer)
///     └── /books/
///         ├── GET /search
///         ├── GET /trending
///         ├── GET /subjects/:subject
///         ├── GET /works/:work_id
///         └── GET /:book_key
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route(
            "/me",
            get(routes::auth::me).route_layer(from_fn_with_state(state.clone(), jwt_auth_layer)),
        );

    // Book keys contain slashes, so the key is the path remainder
    let user_book_routes = Router::new()
        .route(
            "/reading-list",
            post(routes::reading_list::add).get(routes::reading_list::list),
        )
        .route(
            "/reading-list/*book_key",
            put(routes::reading_list::update_status).delete(routes::reading_list::remove),
        )
        .route(
            "/favorites",
            post(routes::favorites::add).get(routes::favorites::list),
        )
        .route(
            "/favorites/*book_key",
            axum::routing::delete(routes::favorites::remove),
        )
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    let comment_routes = Router::new()
        .route(
            "/",
            post(routes::comments::create)
                .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer)),
        )
        .route("/book/*book_key", get(routes::comments::list_for_book))
        .route(
            "/:id",
            get(routes::comments::get).merge(
                put(routes::comments::update)
                    .delete(routes::comments::delete)
                    .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer)),
            ),
        );

    let book_routes = Router::new()
        .route("/search", get(routes::books::search))
        .route("/trending", get(routes::books::trending))
        .route("/subjects/:subject", get(routes::books::by_subject))
        .route("/works/:work_id", get(routes::books::work_detail))
        .route("/:book_key", get(routes::books::detail));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/user-books", user_book_routes)
        .nest("/comments", comment_routes)
        .nest("/books", book_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer authentication middleware layer
///
/// Resolves the `Authorization` header to a [`solin_shared::models::User`]
/// and injects it into request extensions for `Extension<User>`.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let user = gate::authenticate(
        state.store.as_ref(),
        &state.auth.jwt_secret,
        auth_header.as_deref(),
    )
    .await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
