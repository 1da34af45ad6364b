//! # Solin Shared Library
//!
//! Domain logic for the Solin book-tracking backend, used by the API server.
//!
//! ## Module Organization
//!
//! - `models`: database models and their SQL
//! - `store`: storage traits with PostgreSQL and in-memory implementations
//! - `auth`: password hashing, bearer tokens, the access gate
//! - `services`: reading list, favorites, comments, registration and login
//! - `catalog`: read-only Open Library client and book response shaping
//! - `db`: connection pool and migrations

pub mod auth;
pub mod catalog;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Solin shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
