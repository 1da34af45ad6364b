//! # Solin API Server Library
//!
//! HTTP surface of Solin: a personal book-tracking service with reading
//! lists, favorites and public comments, backed by the Open Library catalog.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating request extractors
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
