/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: welcome and health check endpoints
/// - `auth`: registration, login, current user
/// - `reading_list`: the caller's reading list
/// - `favorites`: the caller's favorite books
/// - `comments`: public book comments
/// - `books`: catalog search and book details

pub mod auth;
pub mod books;
pub mod comments;
pub mod favorites;
pub mod health;
pub mod reading_list;
