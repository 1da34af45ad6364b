//! Book responses assembled from raw catalog records

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{cover_url, BookCatalog, CatalogResult, CoverSize, SearchDoc, SubjectWork};

/// Subjects kept on a book detail
pub const MAX_DETAIL_SUBJECTS: usize = 20;

/// Book as it appears in listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub key: Option<String>,
    pub title: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub first_publish_year: Option<i32>,
    pub cover_id: Option<i64>,
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Vec<String>>,
}

impl BookSummary {
    fn from_doc(doc: SearchDoc, covers_base: &str) -> Self {
        Self {
            cover_url: cover_url(covers_base, doc.cover_i, CoverSize::Medium),
            key: doc.key,
            title: doc.title,
            author_name: doc.author_name,
            first_publish_year: doc.first_publish_year,
            cover_id: doc.cover_i,
            number_of_pages: doc.number_of_pages_median,
            language: doc.language,
        }
    }

    fn from_subject_work(work: SubjectWork, covers_base: &str) -> Self {
        Self {
            cover_url: cover_url(covers_base, work.cover_id, CoverSize::Medium),
            key: work.key,
            title: work.title,
            author_name: Some(work.authors.into_iter().filter_map(|a| a.name).collect()),
            first_publish_year: work.first_publish_year,
            cover_id: work.cover_id,
            number_of_pages: None,
            language: None,
        }
    }
}

/// Search results page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub books: Vec<BookSummary>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// This week's trending books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingBooks {
    pub books: Vec<BookSummary>,
    pub total: i64,
}

/// One page of a subject listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectBooks {
    pub books: Vec<BookSummary>,
    pub total: i64,
    pub subject: String,
    pub offset: i64,
    pub limit: i64,
}

/// Full book detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDetail {
    pub key: Option<String>,
    pub title: Option<String>,
    pub author_name: Vec<String>,
    pub description: Option<String>,
    pub subjects: Vec<String>,
    pub first_publish_year: Option<String>,
    pub cover_id: Option<i64>,
    pub cover_url: Option<String>,
}

/// Expands a bare work id to a full key; keys starting with `/` pass through
pub fn normalize_book_key(book_key: &str) -> String {
    if book_key.starts_with('/') {
        book_key.to_string()
    } else {
        format!("/works/{}", book_key)
    }
}

pub async fn search(
    catalog: &dyn BookCatalog,
    query: &str,
    limit: i64,
    offset: i64,
) -> CatalogResult<SearchResults> {
    let response = catalog.search(query, limit, offset).await?;
    let books = response
        .docs
        .into_iter()
        .map(|doc| BookSummary::from_doc(doc, catalog.covers_base()))
        .collect();

    Ok(SearchResults {
        books,
        total: response.num_found,
        offset,
        limit,
    })
}

pub async fn trending(catalog: &dyn BookCatalog, limit: i64) -> CatalogResult<TrendingBooks> {
    let response = catalog.trending(limit).await?;
    let books: Vec<BookSummary> = response
        .works
        .into_iter()
        .map(|doc| BookSummary {
            number_of_pages: None,
            language: None,
            ..BookSummary::from_doc(doc, catalog.covers_base())
        })
        .collect();

    Ok(TrendingBooks {
        total: books.len() as i64,
        books,
    })
}

pub async fn by_subject(
    catalog: &dyn BookCatalog,
    subject: &str,
    limit: i64,
    offset: i64,
) -> CatalogResult<SubjectBooks> {
    let response = catalog.subject(subject, limit, offset).await?;
    let books = response
        .works
        .into_iter()
        .map(|work| BookSummary::from_subject_work(work, catalog.covers_base()))
        .collect();

    Ok(SubjectBooks {
        books,
        total: response.work_count,
        subject: subject.to_string(),
        offset,
        limit,
    })
}

/// Loads a work and resolves its author names
///
/// Authors are looked up concurrently. A lookup that fails, or an author
/// without a name, is left out; the rest of the detail is still returned.
pub async fn details(catalog: &dyn BookCatalog, book_key: &str) -> CatalogResult<BookDetail> {
    let key = normalize_book_key(book_key);
    let work = catalog.work(&key).await?;

    let author_keys: Vec<String> = work
        .authors
        .iter()
        .filter_map(|a| a.author.as_ref().and_then(|r| r.key.clone()))
        .collect();

    let lookups = join_all(author_keys.iter().map(|k| catalog.author(k))).await;
    let author_name: Vec<String> = author_keys
        .iter()
        .zip(lookups)
        .filter_map(|(author_key, result)| match result {
            Ok(author) => author.name,
            Err(e) => {
                warn!(
                    book_key = %key,
                    author_key = %author_key,
                    error = %e,
                    "Skipping author lookup failure"
                );
                None
            }
        })
        .collect();

    debug!(book_key = %key, authors = author_name.len(), "Resolved book detail");

    let cover_id = work.covers.first().copied();
    let mut subjects = work.subjects;
    subjects.truncate(MAX_DETAIL_SUBJECTS);

    Ok(BookDetail {
        key: work.key,
        title: work.title,
        author_name,
        description: work.description.map(|d| d.into_text()),
        subjects,
        first_publish_year: work.first_publish_date,
        cover_id,
        cover_url: cover_url(catalog.covers_base(), cover_id, CoverSize::Large),
    })
}
