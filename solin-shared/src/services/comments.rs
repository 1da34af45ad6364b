/// Comments
///
/// Comments are readable by anyone and addressed by numeric id. Mutations
/// therefore check ownership explicitly: the comment is loaded first, a
/// missing id is `NotFound`, and a caller who is not the author is
/// `Forbidden`.
///
/// Content is measured in Unicode scalar values, not bytes.

use serde::Deserialize;
use tracing::{info, warn};

use super::{validate_book_key, ServiceError, ServiceResult};
use crate::models::comment::{MAX_CONTENT_CHARS, MIN_CONTENT_CHARS};
use crate::models::{Comment, CommentWithAuthor, User};
use crate::store::{CommentStore, IdentityStore};

/// Default page size for comment listings
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: i64 = 50;

const COMMENT_NOT_FOUND: &str = "Comment not found";

/// Limit/offset window over a book's comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommentPage {
    pub limit: i64,
    pub offset: i64,
}

impl Default for CommentPage {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl CommentPage {
    /// Rejects a limit outside `1..=50` or a negative offset
    pub fn validate(&self) -> ServiceResult<()> {
        if !(1..=MAX_PAGE_LIMIT).contains(&self.limit) {
            return Err(ServiceError::validation(
                "limit",
                format!("Limit must be between 1 and {}", MAX_PAGE_LIMIT),
            ));
        }
        if self.offset < 0 {
            return Err(ServiceError::validation("offset", "Offset must not be negative"));
        }
        Ok(())
    }
}

/// Checks that comment content is between 1 and 2000 characters
pub fn validate_content(content: &str) -> ServiceResult<()> {
    let len = content.chars().count();
    if !(MIN_CONTENT_CHARS..=MAX_CONTENT_CHARS).contains(&len) {
        return Err(ServiceError::validation(
            "content",
            format!(
                "Content must be between {} and {} characters",
                MIN_CONTENT_CHARS, MAX_CONTENT_CHARS
            ),
        ));
    }
    Ok(())
}

async fn load_owned<S: CommentStore + ?Sized>(
    store: &S,
    id: i64,
    user: &User,
    action: &str,
) -> ServiceResult<Comment> {
    let comment = store
        .find_comment(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(COMMENT_NOT_FOUND.to_string()))?;

    if comment.user_id != user.id {
        warn!(
            comment_id = id,
            user_id = user.id,
            owner_id = comment.user_id,
            action,
            "Comment ownership check failed"
        );
        return Err(ServiceError::Forbidden(format!(
            "Not authorized to {} this comment",
            action
        )));
    }

    Ok(comment)
}

/// Posts a comment on a book
pub async fn create<S: CommentStore + ?Sized>(
    store: &S,
    user: &User,
    book_key: &str,
    content: &str,
) -> ServiceResult<CommentWithAuthor> {
    validate_book_key(book_key)?;
    validate_content(content)?;

    let comment = store.insert_comment(user.id, book_key, content).await?;
    info!(comment_id = comment.id, user_id = user.id, book_key, "Comment posted");
    Ok(CommentWithAuthor::new(comment, user.username.clone()))
}

/// One page of a book's comments, newest first
pub async fn list_for_book<S: CommentStore + ?Sized>(
    store: &S,
    book_key: &str,
    page: CommentPage,
) -> ServiceResult<Vec<CommentWithAuthor>> {
    page.validate()?;
    Ok(store
        .list_comments_for_book(book_key, page.limit, page.offset)
        .await?)
}

/// Fetches a single comment with its author
pub async fn get<S>(store: &S, id: i64) -> ServiceResult<CommentWithAuthor>
where
    S: CommentStore + IdentityStore + ?Sized,
{
    let comment = store
        .find_comment(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(COMMENT_NOT_FOUND.to_string()))?;

    let author = store
        .find_user_by_id(comment.user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(COMMENT_NOT_FOUND.to_string()))?;

    Ok(CommentWithAuthor::new(comment, author.username))
}

/// Replaces the content of the caller's own comment
pub async fn update<S: CommentStore + ?Sized>(
    store: &S,
    id: i64,
    user: &User,
    content: &str,
) -> ServiceResult<CommentWithAuthor> {
    validate_content(content)?;
    load_owned(store, id, user, "update").await?;

    let comment = store
        .update_comment_content(id, content)
        .await?
        .ok_or_else(|| ServiceError::NotFound(COMMENT_NOT_FOUND.to_string()))?;

    info!(comment_id = id, user_id = user.id, "Comment updated");
    Ok(CommentWithAuthor::new(comment, user.username.clone()))
}

/// Deletes the caller's own comment
pub async fn delete<S: CommentStore + ?Sized>(store: &S, id: i64, user: &User) -> ServiceResult<()> {
    load_owned(store, id, user, "delete").await?;

    if !store.delete_comment(id).await? {
        return Err(ServiceError::NotFound(COMMENT_NOT_FOUND.to_string()));
    }

    info!(comment_id = id, user_id = user.id, "Comment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUser;
    use crate::store::MemoryStore;

    async fn user(store: &MemoryStore, name: &str) -> User {
        store
            .create_user(CreateUser {
                email: format!("{}@x.com", name),
                username: name.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    #[test]
    fn test_content_bounds_count_characters() {
        assert!(validate_content("").is_err());
        assert!(validate_content("x").is_ok());
        assert!(validate_content(&"x".repeat(2000)).is_ok());
        assert!(validate_content(&"x".repeat(2001)).is_err());

        // 2000 multi-byte characters are still 2000 characters
        assert!(validate_content(&"é".repeat(2000)).is_ok());
    }

    #[test]
    fn test_page_bounds() {
        assert!(CommentPage::default().validate().is_ok());
        assert!(CommentPage { limit: 0, offset: 0 }.validate().is_err());
        assert!(CommentPage { limit: 51, offset: 0 }.validate().is_err());
        assert!(CommentPage { limit: 50, offset: 0 }.validate().is_ok());
        assert!(CommentPage { limit: 10, offset: -1 }.validate().is_err());
    }

    #[tokio::test]
    async fn test_create_returns_author_name() {
        let store = MemoryStore::new();
        let bob = user(&store, "bob").await;

        let comment = create(&store, &bob, "/works/OL2W", "Loved it").await.unwrap();
        assert_eq!(comment.username, "bob");
        assert_eq!(comment.user_id, bob.id);
    }

    #[tokio::test]
    async fn test_invalid_content_never_reaches_store() {
        let store = MemoryStore::new();
        let bob = user(&store, "bob").await;

        assert!(matches!(
            create(&store, &bob, "/works/OL2W", "").await,
            Err(ServiceError::Validation { .. })
        ));
        let listed = list_for_book(&store, "/works/OL2W", CommentPage::default()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_non_author_is_forbidden_and_author_succeeds() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let c = create(&store, &bob, "/works/OL2W", "Mine").await.unwrap();

        assert!(matches!(
            update(&store, c.id, &alice, "x").await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            delete(&store, c.id, &alice).await,
            Err(ServiceError::Forbidden(_))
        ));

        let edited = update(&store, c.id, &bob, "Edited").await.unwrap();
        assert_eq!(edited.content, "Edited");

        delete(&store, c.id, &bob).await.unwrap();
        assert!(matches!(get(&store, c.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            update(&store, c.id, &bob, "again").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(delete(&store, c.id, &bob).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let store = MemoryStore::new();
        let bob = user(&store, "bob").await;

        let err = update(&store, 999, &bob, "").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_listing_is_scoped_to_book() {
        let store = MemoryStore::new();
        let bob = user(&store, "bob").await;
        create(&store, &bob, "/works/A", "first").await.unwrap();
        create(&store, &bob, "/works/B", "other").await.unwrap();
        create(&store, &bob, "/works/A", "second").await.unwrap();

        let listed = list_for_book(&store, "/works/A", CommentPage::default()).await.unwrap();
        let contents: Vec<&str> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["second", "first"]);
        assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }
}
