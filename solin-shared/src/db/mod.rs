/// Database plumbing: connection pool and schema migrations
///
/// Queries live with their models in [`crate::models`]; the store adapter
/// over them is [`crate::store::PgStore`].

pub mod migrations;
pub mod pool;
