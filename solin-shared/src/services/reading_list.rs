/// Reading list
///
/// Every operation is addressed by the caller's id and a book key; there is
/// no way to name another user's entry.

use tracing::{debug, info};

use super::{validate_book_key, ServiceError, ServiceResult, ALREADY_IN_READING_LIST};
use crate::models::{ReadingStatus, User, UserBook};
use crate::store::ReadingListStore;

const NOT_IN_READING_LIST: &str = "Book not found in reading list";

/// Adds a book with an initial status
pub async fn add<S: ReadingListStore + ?Sized>(
    store: &S,
    user: &User,
    book_key: &str,
    status: ReadingStatus,
) -> ServiceResult<UserBook> {
    validate_book_key(book_key)?;

    if store.find_user_book(user.id, book_key).await?.is_some() {
        debug!(user_id = user.id, book_key, "Book already in reading list");
        return Err(ServiceError::Conflict(ALREADY_IN_READING_LIST.to_string()));
    }

    let entry = store.insert_user_book(user.id, book_key, status).await?;
    info!(user_id = user.id, book_key, status = %status, "Added to reading list");
    Ok(entry)
}

/// Lists the caller's entries, most recently touched first
pub async fn list<S: ReadingListStore + ?Sized>(
    store: &S,
    user: &User,
    status: Option<ReadingStatus>,
) -> ServiceResult<Vec<UserBook>> {
    Ok(store.list_user_books(user.id, status).await?)
}

/// Moves an entry to a new status
pub async fn update_status<S: ReadingListStore + ?Sized>(
    store: &S,
    user: &User,
    book_key: &str,
    status: ReadingStatus,
) -> ServiceResult<UserBook> {
    let entry = store
        .update_user_book_status(user.id, book_key, status)
        .await?
        .ok_or_else(|| ServiceError::NotFound(NOT_IN_READING_LIST.to_string()))?;

    info!(user_id = user.id, book_key, status = %status, "Reading status changed");
    Ok(entry)
}

/// Removes an entry
pub async fn remove<S: ReadingListStore + ?Sized>(
    store: &S,
    user: &User,
    book_key: &str,
) -> ServiceResult<()> {
    if !store.delete_user_book(user.id, book_key).await? {
        return Err(ServiceError::NotFound(NOT_IN_READING_LIST.to_string()));
    }

    info!(user_id = user.id, book_key, "Removed from reading list");
    Ok(())
}
