/// PostgreSQL store
///
/// Thin adapter from the store traits onto the models' queries. The schema's
/// unique constraints and `ON DELETE CASCADE` foreign keys carry the
/// invariants; this layer only translates driver errors.
///
/// # Example
///
/// ```no_run
/// use solin_shared::db::pool::{create_pool, DatabaseConfig};
/// use solin_shared::store::{PgStore, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// }).await?;
///
/// let store = PgStore::new(pool);
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{
    CommentStore, FavoriteStore, IdentityStore, ReadingListStore, Store, StoreError, StoreResult,
};
use crate::db::pool;
use crate::models::{
    Comment, CommentWithAuthor, CreateUser, Favorite, ReadingStatus, User, UserBook,
};

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                debug!(constraint = %constraint, "Unique constraint violated");
                StoreError::Conflict { constraint }
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::MissingReference(db_err.constraint().unwrap_or("unknown").to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        Ok(User::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl ReadingListStore for PgStore {
    async fn insert_user_book(
        &self,
        user_id: i64,
        book_key: &str,
        status: ReadingStatus,
    ) -> StoreResult<UserBook> {
        Ok(UserBook::create(&self.pool, user_id, book_key, status).await?)
    }

    async fn find_user_book(&self, user_id: i64, book_key: &str) -> StoreResult<Option<UserBook>> {
        Ok(UserBook::find(&self.pool, user_id, book_key).await?)
    }

    async fn list_user_books(
        &self,
        user_id: i64,
        status: Option<ReadingStatus>,
    ) -> StoreResult<Vec<UserBook>> {
        Ok(UserBook::list_by_user(&self.pool, user_id, status).await?)
    }

    async fn update_user_book_status(
        &self,
        user_id: i64,
        book_key: &str,
        status: ReadingStatus,
    ) -> StoreResult<Option<UserBook>> {
        Ok(UserBook::update_status(&self.pool, user_id, book_key, status).await?)
    }

    async fn delete_user_book(&self, user_id: i64, book_key: &str) -> StoreResult<bool> {
        Ok(UserBook::delete(&self.pool, user_id, book_key).await?)
    }
}

#[async_trait]
impl FavoriteStore for PgStore {
    async fn insert_favorite(&self, user_id: i64, book_key: &str) -> StoreResult<Favorite> {
        Ok(Favorite::create(&self.pool, user_id, book_key).await?)
    }

    async fn find_favorite(&self, user_id: i64, book_key: &str) -> StoreResult<Option<Favorite>> {
        Ok(Favorite::find(&self.pool, user_id, book_key).await?)
    }

    async fn list_favorites(&self, user_id: i64) -> StoreResult<Vec<Favorite>> {
        Ok(Favorite::list_by_user(&self.pool, user_id).await?)
    }

    async fn delete_favorite(&self, user_id: i64, book_key: &str) -> StoreResult<bool> {
        Ok(Favorite::delete(&self.pool, user_id, book_key).await?)
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn insert_comment(
        &self,
        user_id: i64,
        book_key: &str,
        content: &str,
    ) -> StoreResult<Comment> {
        Ok(Comment::create(&self.pool, user_id, book_key, content).await?)
    }

    async fn find_comment(&self, id: i64) -> StoreResult<Option<Comment>> {
        Ok(Comment::find_by_id(&self.pool, id).await?)
    }

    async fn list_comments_for_book(
        &self,
        book_key: &str,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<CommentWithAuthor>> {
        Ok(Comment::list_by_book(&self.pool, book_key, limit, offset).await?)
    }

    async fn update_comment_content(
        &self,
        id: i64,
        content: &str,
    ) -> StoreResult<Option<Comment>> {
        Ok(Comment::update_content(&self.pool, id, content).await?)
    }

    async fn delete_comment(&self, id: i64) -> StoreResult<bool> {
        Ok(Comment::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
