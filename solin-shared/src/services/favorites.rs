/// Favorites
///
/// Independent of the reading list: a book can be a favorite without being
/// on the list and vice versa.

use tracing::info;

use super::{validate_book_key, ServiceError, ServiceResult, ALREADY_IN_FAVORITES};
use crate::models::{Favorite, User};
use crate::store::FavoriteStore;

pub async fn add<S: FavoriteStore + ?Sized>(
    store: &S,
    user: &User,
    book_key: &str,
) -> ServiceResult<Favorite> {
    validate_book_key(book_key)?;

    if store.find_favorite(user.id, book_key).await?.is_some() {
        return Err(ServiceError::Conflict(ALREADY_IN_FAVORITES.to_string()));
    }

    let favorite = store.insert_favorite(user.id, book_key).await?;
    info!(user_id = user.id, book_key, "Added to favorites");
    Ok(favorite)
}

/// Newest first
pub async fn list<S: FavoriteStore + ?Sized>(store: &S, user: &User) -> ServiceResult<Vec<Favorite>> {
    Ok(store.list_favorites(user.id).await?)
}

pub async fn remove<S: FavoriteStore + ?Sized>(
    store: &S,
    user: &User,
    book_key: &str,
) -> ServiceResult<()> {
    if !store.delete_favorite(user.id, book_key).await? {
        return Err(ServiceError::NotFound("Book not found in favorites".to_string()));
    }

    info!(user_id = user.id, book_key, "Removed from favorites");
    Ok(())
}
