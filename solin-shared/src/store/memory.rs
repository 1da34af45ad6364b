/// In-process store
///
/// Keeps every table in one `RwLock`, so a uniqueness check and the insert
/// that follows it happen under the same write guard. Used when no
/// `DATABASE_URL` is configured and by the API's router tests.
///
/// Timestamps come from a per-store clock that never repeats, which keeps
/// "newest first" orderings deterministic even for writes issued within the
/// same microsecond.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{
    CommentStore, FavoriteStore, IdentityStore, ReadingListStore, Store, StoreError, StoreResult,
};
use crate::models::favorite::FAVORITE_CONSTRAINT;
use crate::models::user::{EMAIL_CONSTRAINT, USERNAME_CONSTRAINT};
use crate::models::user_book::USER_BOOK_CONSTRAINT;
use crate::models::{
    Comment, CommentWithAuthor, CreateUser, Favorite, ReadingStatus, User, UserBook,
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    last_tick: Option<DateTime<Utc>>,
    users: BTreeMap<i64, User>,
    user_books: BTreeMap<i64, UserBook>,
    favorites: BTreeMap<i64, Favorite>,
    comments: BTreeMap<i64, Comment>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(ts);
        ts
    }

    fn require_user(&self, user_id: i64) -> StoreResult<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(format!("users({})", user_id)))
        }
    }
}

/// Store that lives entirely in process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.write()?;

        if tables.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict {
                constraint: EMAIL_CONSTRAINT.to_string(),
            });
        }
        if tables.users.values().any(|u| u.username == data.username) {
            return Err(StoreError::Conflict {
                constraint: USERNAME_CONSTRAINT.to_string(),
            });
        }

        let user = User {
            id: tables.next_id(),
            email: data.email,
            username: data.username,
            password_hash: data.password_hash,
            created_at: tables.tick(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.write()?;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        tables.user_books.retain(|_, b| b.user_id != id);
        tables.favorites.retain(|_, f| f.user_id != id);
        tables.comments.retain(|_, c| c.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ReadingListStore for MemoryStore {
    async fn insert_user_book(
        &self,
        user_id: i64,
        book_key: &str,
        status: ReadingStatus,
    ) -> StoreResult<UserBook> {
        let mut tables = self.write()?;
        tables.require_user(user_id)?;

        if tables
            .user_books
            .values()
            .any(|b| b.user_id == user_id && b.book_key == book_key)
        {
            return Err(StoreError::Conflict {
                constraint: USER_BOOK_CONSTRAINT.to_string(),
            });
        }

        let now = tables.tick();
        let entry = UserBook {
            id: tables.next_id(),
            user_id,
            book_key: book_key.to_string(),
            status,
            added_at: now,
            updated_at: now,
        };
        tables.user_books.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn find_user_book(&self, user_id: i64, book_key: &str) -> StoreResult<Option<UserBook>> {
        Ok(self
            .read()?
            .user_books
            .values()
            .find(|b| b.user_id == user_id && b.book_key == book_key)
            .cloned())
    }

    async fn list_user_books(
        &self,
        user_id: i64,
        status: Option<ReadingStatus>,
    ) -> StoreResult<Vec<UserBook>> {
        let tables = self.read()?;
        let mut entries: Vec<UserBook> = tables
            .user_books
            .values()
            .filter(|b| b.user_id == user_id)
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();

        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    async fn update_user_book_status(
        &self,
        user_id: i64,
        book_key: &str,
        status: ReadingStatus,
    ) -> StoreResult<Option<UserBook>> {
        let mut tables = self.write()?;
        let now = tables.tick();

        Ok(tables
            .user_books
            .values_mut()
            .find(|b| b.user_id == user_id && b.book_key == book_key)
            .map(|entry| {
                entry.status = status;
                entry.updated_at = now;
                entry.clone()
            }))
    }

    async fn delete_user_book(&self, user_id: i64, book_key: &str) -> StoreResult<bool> {
        let mut tables = self.write()?;
        let before = tables.user_books.len();
        tables
            .user_books
            .retain(|_, b| !(b.user_id == user_id && b.book_key == book_key));
        Ok(tables.user_books.len() < before)
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn insert_favorite(&self, user_id: i64, book_key: &str) -> StoreResult<Favorite> {
        let mut tables = self.write()?;
        tables.require_user(user_id)?;

        if tables
            .favorites
            .values()
            .any(|f| f.user_id == user_id && f.book_key == book_key)
        {
            return Err(StoreError::Conflict {
                constraint: FAVORITE_CONSTRAINT.to_string(),
            });
        }

        let favorite = Favorite {
            id: tables.next_id(),
            user_id,
            book_key: book_key.to_string(),
            added_at: tables.tick(),
        };
        tables.favorites.insert(favorite.id, favorite.clone());
        Ok(favorite)
    }

    async fn find_favorite(&self, user_id: i64, book_key: &str) -> StoreResult<Option<Favorite>> {
        Ok(self
            .read()?
            .favorites
            .values()
            .find(|f| f.user_id == user_id && f.book_key == book_key)
            .cloned())
    }

    async fn list_favorites(&self, user_id: i64) -> StoreResult<Vec<Favorite>> {
        let tables = self.read()?;
        let mut favorites: Vec<Favorite> = tables
            .favorites
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();

        favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(b.id.cmp(&a.id)));
        Ok(favorites)
    }

    async fn delete_favorite(&self, user_id: i64, book_key: &str) -> StoreResult<bool> {
        let mut tables = self.write()?;
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|_, f| !(f.user_id == user_id && f.book_key == book_key));
        Ok(tables.favorites.len() < before)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert_comment(
        &self,
        user_id: i64,
        book_key: &str,
        content: &str,
    ) -> StoreResult<Comment> {
        let mut tables = self.write()?;
        tables.require_user(user_id)?;

        let now = tables.tick();
        let comment = Comment {
            id: tables.next_id(),
            user_id,
            book_key: book_key.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: i64) -> StoreResult<Option<Comment>> {
        Ok(self.read()?.comments.get(&id).cloned())
    }

    async fn list_comments_for_book(
        &self,
        book_key: &str,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<CommentWithAuthor>> {
        let tables = self.read()?;
        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.book_key == book_key)
            .collect();

        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(comments
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .filter_map(|c| {
                tables
                    .users
                    .get(&c.user_id)
                    .map(|u| CommentWithAuthor::new(c.clone(), u.username.clone()))
            })
            .collect())
    }

    async fn update_comment_content(
        &self,
        id: i64,
        content: &str,
    ) -> StoreResult<Option<Comment>> {
        let mut tables = self.write()?;
        let now = tables.tick();

        Ok(tables.comments.get_mut(&id).map(|comment| {
            comment.content = content.to_string();
            comment.updated_at = now;
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: i64) -> StoreResult<bool> {
        Ok(self.write()?.comments.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}
