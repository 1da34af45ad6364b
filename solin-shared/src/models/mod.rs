/// Database models for Solin
///
/// Each model owns its SQL: the plain structs double as `sqlx::FromRow` row
/// types, and the associated functions take a `&PgPool`.
///
/// # Models
///
/// - [`user::User`]: registered accounts
/// - [`user_book::UserBook`]: reading-list entries with a [`user_book::ReadingStatus`]
/// - [`favorite::Favorite`]: favorited books
/// - [`comment::Comment`]: public, book-scoped comments
///
/// Every `user_id` column references `users(id) ON DELETE CASCADE`.

pub mod comment;
pub mod favorite;
pub mod user;
pub mod user_book;

pub use comment::{Comment, CommentWithAuthor};
pub use favorite::Favorite;
pub use user::{CreateUser, User};
pub use user_book::{ReadingStatus, UserBook};
