//! Open Library HTTP client
//!
//! Open Library is free and needs no authentication.
//! Base URL: https://openlibrary.org, covers at https://covers.openlibrary.org/b

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{
    AuthorRecord, BookCatalog, CatalogError, CatalogResult, SearchResponse, SubjectResponse,
    TrendingResponse, WorkRecord,
};

/// Where and how to reach the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub covers_url: String,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            covers_url: "https://covers.openlibrary.org/b".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Open Library API client
#[derive(Clone)]
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
    covers_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("solin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Upstream(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            timeout_seconds = config.timeout.as_secs(),
            "Created Open Library client"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            covers_url: config.covers_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> CatalogResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Fetching from Open Library");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Open Library request failed");
                CatalogError::Upstream(e.to_string())
            })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(CatalogError::NotFound(path.to_string())),
            status => {
                warn!(url = %url, status = %status, "Open Library returned an error status");
                return Err(CatalogError::Upstream(format!(
                    "Open Library responded with status {}",
                    status
                )));
            }
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BookCatalog for OpenLibraryClient {
    async fn search(&self, query: &str, limit: i64, offset: i64) -> CatalogResult<SearchResponse> {
        let results: SearchResponse = self
            .get_json(
                "/search.json",
                &[
                    ("q", query.to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                    ("language", "eng".to_string()),
                ],
            )
            .await?;

        debug!(query = %query, found = results.num_found, "Open Library search returned");
        Ok(results)
    }

    async fn trending(&self, limit: i64) -> CatalogResult<TrendingResponse> {
        self.get_json("/trending/weekly.json", &[("limit", limit.to_string())])
            .await
    }

    async fn subject(&self, subject: &str, limit: i64, offset: i64) -> CatalogResult<SubjectResponse> {
        let path = format!("/subjects/{}.json", subject);
        self.get_json(
            &path,
            &[
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                ("language", "eng".to_string()),
            ],
        )
        .await
    }

    async fn work(&self, key: &str) -> CatalogResult<WorkRecord> {
        self.get_json(&format!("{}.json", key), &[]).await
    }

    async fn author(&self, key: &str) -> CatalogResult<AuthorRecord> {
        self.get_json(&format!("{}.json", key), &[]).await
    }

    fn covers_base(&self) -> &str {
        &self.covers_url
    }
}
