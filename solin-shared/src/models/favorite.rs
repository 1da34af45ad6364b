/// Favorite model and database operations
///
/// Favorites are independent of the reading list: a book can be favorited
/// without being on the list and vice versa. Like reading-list entries they
/// are addressed by `(user_id, book_key)` and never mutated after insert.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE favorites (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     book_key TEXT NOT NULL,
///     added_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT favorites_user_id_book_key_key UNIQUE (user_id, book_key)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Name of the unique constraint on `(user_id, book_key)`
pub const FAVORITE_CONSTRAINT: &str = "favorites_user_id_book_key_key";

/// A favorited book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    /// Favorite ID
    pub id: i64,

    /// Owning user
    #[serde(skip_serializing, default)]
    pub user_id: i64,

    /// Opaque catalog key
    pub book_key: String,

    /// When the book was favorited
    pub added_at: DateTime<Utc>,
}

impl Favorite {
    /// Inserts a favorite
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on [`FAVORITE_CONSTRAINT`] if the book is
    /// already a favorite.
    pub async fn create(pool: &PgPool, user_id: i64, book_key: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (user_id, book_key)
            VALUES ($1, $2)
            RETURNING id, user_id, book_key, added_at
            "#,
        )
        .bind(user_id)
        .bind(book_key)
        .fetch_one(pool)
        .await
    }

    /// Finds the user's favorite for a book
    pub async fn find(
        pool: &PgPool,
        user_id: i64,
        book_key: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Favorite>(
            r#"
            SELECT id, user_id, book_key, added_at
            FROM favorites
            WHERE user_id = $1 AND book_key = $2
            "#,
        )
        .bind(user_id)
        .bind(book_key)
        .fetch_optional(pool)
        .await
    }

    /// Lists a user's favorites, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Favorite>(
            r#"
            SELECT id, user_id, book_key, added_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY added_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Removes the user's favorite for a book
    pub async fn delete(pool: &PgPool, user_id: i64, book_key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND book_key = $2")
            .bind(user_id)
            .bind(book_key)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
