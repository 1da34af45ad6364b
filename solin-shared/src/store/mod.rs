/// Storage contracts for the user library
///
/// The services in [`crate::services`] talk to storage only through these
/// traits. Two implementations exist:
///
/// - [`postgres::PgStore`]: the production store, backed by the models' SQL
/// - [`memory::MemoryStore`]: a process-local store for development and tests
///
/// Uniqueness is enforced by the store itself, atomically with the insert:
/// a duplicate `(user_id, book_key)` or a taken email/username surfaces as
/// [`StoreError::Conflict`] even when two requests race past the services'
/// existence checks.

use async_trait::async_trait;

use crate::models::{
    Comment, CommentWithAuthor, CreateUser, Favorite, ReadingStatus, User, UserBook,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    Conflict {
        /// Name of the violated constraint
        constraint: String,
    },

    /// The referenced row does not exist
    #[error("Referenced record not found: {0}")]
    MissingReference(String),

    /// Backend failure
    #[error("Database error: {0}")]
    Database(String),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// User records
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Inserts a user; `Conflict` on a taken email or username
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Deletes a user together with all of their entries, favorites and comments
    async fn delete_user(&self, id: i64) -> StoreResult<bool>;
}

/// Reading-list entries, keyed by `(user_id, book_key)`
#[async_trait]
pub trait ReadingListStore: Send + Sync {
    /// Inserts an entry; `Conflict` if the pair already exists
    async fn insert_user_book(
        &self,
        user_id: i64,
        book_key: &str,
        status: ReadingStatus,
    ) -> StoreResult<UserBook>;

    async fn find_user_book(&self, user_id: i64, book_key: &str) -> StoreResult<Option<UserBook>>;

    /// Lists entries ordered by `updated_at` descending
    async fn list_user_books(
        &self,
        user_id: i64,
        status: Option<ReadingStatus>,
    ) -> StoreResult<Vec<UserBook>>;

    /// Sets status and bumps `updated_at`; `None` if the pair does not exist
    async fn update_user_book_status(
        &self,
        user_id: i64,
        book_key: &str,
        status: ReadingStatus,
    ) -> StoreResult<Option<UserBook>>;

    async fn delete_user_book(&self, user_id: i64, book_key: &str) -> StoreResult<bool>;
}

/// Favorites, keyed by `(user_id, book_key)`
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Inserts a favorite; `Conflict` if the pair already exists
    async fn insert_favorite(&self, user_id: i64, book_key: &str) -> StoreResult<Favorite>;

    async fn find_favorite(&self, user_id: i64, book_key: &str) -> StoreResult<Option<Favorite>>;

    /// Lists favorites ordered by `added_at` descending
    async fn list_favorites(&self, user_id: i64) -> StoreResult<Vec<Favorite>>;

    async fn delete_favorite(&self, user_id: i64, book_key: &str) -> StoreResult<bool>;
}

/// Comments, keyed by numeric id
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert_comment(&self, user_id: i64, book_key: &str, content: &str)
        -> StoreResult<Comment>;

    async fn find_comment(&self, id: i64) -> StoreResult<Option<Comment>>;

    /// One page of a book's comments, `created_at` descending, with author names
    async fn list_comments_for_book(
        &self,
        book_key: &str,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<CommentWithAuthor>>;

    /// Replaces content and bumps `updated_at`; `None` if the comment is gone
    async fn update_comment_content(&self, id: i64, content: &str)
        -> StoreResult<Option<Comment>>;

    async fn delete_comment(&self, id: i64) -> StoreResult<bool>;
}

/// Everything the API needs from storage
#[async_trait]
pub trait Store: IdentityStore + ReadingListStore + FavoriteStore + CommentStore {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
