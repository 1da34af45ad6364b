/// Reading-list entry model and database operations
///
/// A `UserBook` records one user's reading status for one catalog book. Rows
/// are addressed by the `(user_id, book_key)` pair, never by a bare id, so a
/// query can only ever touch the caller's own entries.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE reading_status AS ENUM ('want_to_read', 'reading', 'read');
///
/// CREATE TABLE user_books (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     book_key TEXT NOT NULL,
///     status reading_status NOT NULL,
///     added_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT user_books_user_id_book_key_key UNIQUE (user_id, book_key)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;

/// Name of the unique constraint on `(user_id, book_key)`
pub const USER_BOOK_CONSTRAINT: &str = "user_books_user_id_book_key_key";

/// A user's relationship to a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reading_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    /// On the wishlist
    WantToRead,

    /// Currently being read
    Reading,

    /// Finished
    Read,
}

impl ReadingStatus {
    /// Gets the wire/database name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "want_to_read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Read => "read",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reading-list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserBook {
    /// Entry ID
    pub id: i64,

    /// Owning user
    #[serde(skip_serializing, default)]
    pub user_id: i64,

    /// Opaque catalog key, e.g. `/works/OL1W`
    pub book_key: String,

    /// Current reading status
    pub status: ReadingStatus,

    /// When the book was added
    pub added_at: DateTime<Utc>,

    /// When the status last changed
    pub updated_at: DateTime<Utc>,
}

impl UserBook {
    /// Inserts a new entry
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on [`USER_BOOK_CONSTRAINT`] if the user
    /// already has this book.
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        book_key: &str,
        status: ReadingStatus,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UserBook>(
            r#"
            INSERT INTO user_books (user_id, book_key, status)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, book_key, status, added_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(book_key)
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// Finds the user's entry for a book
    pub async fn find(
        pool: &PgPool,
        user_id: i64,
        book_key: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserBook>(
            r#"
            SELECT id, user_id, book_key, status, added_at, updated_at
            FROM user_books
            WHERE user_id = $1 AND book_key = $2
            "#,
        )
        .bind(user_id)
        .bind(book_key)
        .fetch_optional(pool)
        .await
    }

    /// Lists a user's entries, most recently updated first
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: i64,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserBook>(
            r#"
            SELECT id, user_id, book_key, status, added_at, updated_at
            FROM user_books
            WHERE user_id = $1
              AND ($2::reading_status IS NULL OR status = $2)
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Changes the status of the user's entry for a book
    ///
    /// Returns `None` if the user has no such entry.
    pub async fn update_status(
        pool: &PgPool,
        user_id: i64,
        book_key: &str,
        status: ReadingStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserBook>(
            r#"
            UPDATE user_books
            SET status = $3, updated_at = NOW()
            WHERE user_id = $1 AND book_key = $2
            RETURNING id, user_id, book_key, status, added_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(book_key)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    /// Removes the user's entry for a book
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, user_id: i64, book_key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_books WHERE user_id = $1 AND book_key = $2")
            .bind(user_id)
            .bind(book_key)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_status_wire_names() {
        assert_eq!(serde_json::to_string(&ReadingStatus::WantToRead).unwrap(), "\"want_to_read\"");
        assert_eq!(serde_json::to_string(&ReadingStatus::Reading).unwrap(), "\"reading\"");
        assert_eq!(serde_json::to_string(&ReadingStatus::Read).unwrap(), "\"read\"");

        let parsed: ReadingStatus = serde_json::from_str("\"want_to_read\"").unwrap();
        assert_eq!(parsed, ReadingStatus::WantToRead);
    }

    #[test]
    fn test_reading_status_rejects_unknown() {
        assert!(serde_json::from_str::<ReadingStatus>("\"abandoned\"").is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        for status in [ReadingStatus::WantToRead, ReadingStatus::Reading, ReadingStatus::Read] {
            assert_eq!(status.to_string(), status.as_str());
        }
    }
}
