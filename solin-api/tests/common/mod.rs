//! Common test utilities for integration tests
//!
//! Builds the full router over a fresh [`MemoryStore`] and a stub catalog,
//! and wraps request plumbing so tests read as method, path, token, body.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use solin_api::{
    app::{build_router, AppState},
    config::Config,
};
use solin_shared::{
    auth::{password::HashingParams, AuthSettings},
    catalog::{
        AuthorRecord, BookCatalog, CatalogError, CatalogResult, Description, KeyRef, SearchDoc,
        SearchResponse, SubjectResponse, SubjectWork, TrendingResponse, WorkAuthor, WorkRecord,
    },
    store::MemoryStore,
};
use std::sync::Arc;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret-key-0123456789";

/// Catalog with one known work (`/works/OL1W`) and one unreachable (`/works/DOWN`)
pub struct StubCatalog;

#[async_trait]
impl BookCatalog for StubCatalog {
    async fn search(&self, query: &str, _limit: i64, _offset: i64) -> CatalogResult<SearchResponse> {
        if query == "outage" {
            return Err(CatalogError::Upstream("connection refused".to_string()));
        }
        Ok(SearchResponse {
            num_found: 1,
            docs: vec![SearchDoc {
                key: Some("/works/OL1W".to_string()),
                title: Some("Dune".to_string()),
                author_name: Some(vec!["Frank Herbert".to_string()]),
                cover_i: Some(42),
                ..Default::default()
            }],
        })
    }

    async fn trending(&self, _limit: i64) -> CatalogResult<TrendingResponse> {
        Ok(TrendingResponse {
            works: vec![SearchDoc {
                key: Some("/works/OL1W".to_string()),
                ..Default::default()
            }],
        })
    }

    async fn subject(&self, _subject: &str, _limit: i64, _offset: i64) -> CatalogResult<SubjectResponse> {
        Ok(SubjectResponse {
            work_count: 3,
            works: vec![SubjectWork {
                key: Some("/works/OL1W".to_string()),
                ..Default::default()
            }],
        })
    }

    async fn work(&self, key: &str) -> CatalogResult<WorkRecord> {
        match key {
            "/works/OL1W" => Ok(WorkRecord {
                key: Some(key.to_string()),
                title: Some("Dune".to_string()),
                authors: vec![
                    WorkAuthor {
                        author: Some(KeyRef {
                            key: Some("/authors/OL1A".to_string()),
                        }),
                    },
                    WorkAuthor {
                        author: Some(KeyRef {
                            key: Some("/authors/BROKEN".to_string()),
                        }),
                    },
                ],
                description: Some(Description::Typed {
                    value: "Spice".to_string(),
                }),
                covers: vec![42],
                ..Default::default()
            }),
            "/works/DOWN" => Err(CatalogError::Upstream("timed out".to_string())),
            other => Err(CatalogError::NotFound(other.to_string())),
        }
    }

    async fn author(&self, key: &str) -> CatalogResult<AuthorRecord> {
        match key {
            "/authors/OL1A" => Ok(AuthorRecord {
                name: Some("Frank Herbert".to_string()),
            }),
            _ => Err(CatalogError::Upstream("author lookup failed".to_string())),
        }
    }

    fn covers_base(&self) -> &str {
        "https://covers.test/b"
    }
}

/// Test context: the router and the store behind it
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "SECRET_KEY" => Some(SECRET.to_string()),
            _ => None,
        })
        .expect("test configuration");

        // Argon2 at production cost makes every register/login slow
        let auth = AuthSettings {
            hashing: HashingParams {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
            ..config.auth_settings()
        };

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), Arc::new(StubCatalog), config).with_auth(auth);

        Self {
            app: build_router(state),
            store,
        }
    }

    /// Sends a request and returns the status with the JSON body (`Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Registers an account and returns a bearer token for it
    pub async fn sign_up(&self, email: &str, username: &str, password: &str) -> String {
        let (status, _) = self
            .post(
                "/api/v1/auth/register",
                None,
                json!({ "email": email, "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        body["access_token"].as_str().unwrap().to_string()
    }
}
