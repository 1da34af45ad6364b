//! Book catalog integration
//!
//! Book metadata is never stored locally; it is read live from Open Library.
//! [`BookCatalog`] is the raw, read-only view of the upstream service and
//! [`OpenLibraryClient`] its HTTP implementation. The [`books`] module shapes
//! raw records into the responses the API serves.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod books;
pub mod openlibrary;

pub use openlibrary::{CatalogConfig, OpenLibraryClient};

/// Error type for catalog lookups
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The upstream has no such record
    #[error("Not found in catalog: {0}")]
    NotFound(String),

    /// Transport failure, timeout or non-success status
    #[error("Catalog request failed: {0}")]
    Upstream(String),

    /// The upstream answered with something we could not parse
    #[error("Unexpected catalog response: {0}")]
    Decode(String),
}

/// Catalog result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Cover image size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// Builds a cover image URL; `None` without a cover id
pub fn cover_url(covers_base: &str, cover_id: Option<i64>, size: CoverSize) -> Option<String> {
    cover_id
        .filter(|id| *id > 0)
        .map(|id| format!("{}/id/{}-{}.jpg", covers_base.trim_end_matches('/'), id, size.as_str()))
}

/// Search hit, also the shape of a trending work
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub first_publish_year: Option<i32>,
    pub cover_i: Option<i64>,
    pub number_of_pages_median: Option<i32>,
    pub language: Option<Vec<String>>,
}

/// `/search.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "numFound", default)]
    pub num_found: i64,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// `/trending/weekly.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub works: Vec<SearchDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectAuthor {
    pub name: Option<String>,
}

/// Work entry inside a subject listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectWork {
    pub key: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<SubjectAuthor>,
    pub first_publish_year: Option<i32>,
    pub cover_id: Option<i64>,
}

/// `/subjects/{subject}.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectResponse {
    #[serde(default)]
    pub work_count: i64,
    #[serde(default)]
    pub works: Vec<SubjectWork>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyRef {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkAuthor {
    pub author: Option<KeyRef>,
}

/// Descriptions come either as plain text or as a typed `{type, value}` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Typed { value: String },
}

impl Description {
    pub fn into_text(self) -> String {
        match self {
            Description::Text(text) => text,
            Description::Typed { value } => value,
        }
    }
}

/// `{work_key}.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkRecord {
    pub key: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<WorkAuthor>,
    pub description: Option<Description>,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub first_publish_date: Option<String>,
    #[serde(default)]
    pub covers: Vec<i64>,
}

/// `{author_key}.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub name: Option<String>,
}

/// Read-only access to the upstream catalog
#[async_trait]
pub trait BookCatalog: Send + Sync {
    async fn search(&self, query: &str, limit: i64, offset: i64) -> CatalogResult<SearchResponse>;

    async fn trending(&self, limit: i64) -> CatalogResult<TrendingResponse>;

    async fn subject(&self, subject: &str, limit: i64, offset: i64) -> CatalogResult<SubjectResponse>;

    /// Fetches a work by its full key, e.g. `/works/OL1W`
    async fn work(&self, key: &str) -> CatalogResult<WorkRecord>;

    /// Fetches an author by its full key, e.g. `/authors/OL1A`
    async fn author(&self, key: &str) -> CatalogResult<AuthorRecord>;

    /// Base URL for cover images
    fn covers_base(&self) -> &str;
}
