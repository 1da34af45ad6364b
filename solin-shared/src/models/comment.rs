/// Comment model and database operations
///
/// Comments are public per book and carry no uniqueness constraint: a user may
/// post any number of comments on the same book. Unlike reading-list entries
/// they are addressed by their numeric id, so ownership has to be checked by
/// the caller before any mutation (see `services::comments`).
///
/// The author's username is not stored on the comment; listings join it in at
/// read time and return [`CommentWithAuthor`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     book_key TEXT NOT NULL,
///     content TEXT NOT NULL CHECK (char_length(content) BETWEEN 1 AND 2000),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE INDEX idx_comments_book_key_created_at ON comments (book_key, created_at DESC);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Minimum comment length in characters
pub const MIN_CONTENT_CHARS: usize = 1;

/// Maximum comment length in characters
pub const MAX_CONTENT_CHARS: usize = 2000;

/// A stored comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Comment ID
    pub id: i64,

    /// Author
    pub user_id: i64,

    /// Book the comment is about
    pub book_key: String,

    /// Comment body
    pub content: String,

    /// When the comment was posted
    pub created_at: DateTime<Utc>,

    /// When the content last changed
    pub updated_at: DateTime<Utc>,
}

/// A comment together with its author's username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub book_key: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: i64,
    pub username: String,
}

impl CommentWithAuthor {
    /// Attaches an author name to a comment
    pub fn new(comment: Comment, username: impl Into<String>) -> Self {
        Self {
            id: comment.id,
            book_key: comment.book_key,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            user_id: comment.user_id,
            username: username.into(),
        }
    }
}

impl Comment {
    /// Inserts a comment
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        book_key: &str,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (user_id, book_key, content)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, book_key, content, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(book_key)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    /// Finds a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, user_id, book_key, content, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists one page of a book's comments, newest first, with author names
    pub async fn list_by_book(
        pool: &PgPool,
        book_key: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.book_key, c.content, c.created_at, c.updated_at,
                   c.user_id, u.username
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.book_key = $1
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(book_key)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Replaces a comment's content
    ///
    /// Returns `None` if the comment does not exist. Does not check ownership.
    pub async fn update_content(
        pool: &PgPool,
        id: i64,
        content: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, book_key, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a comment. Does not check ownership.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
