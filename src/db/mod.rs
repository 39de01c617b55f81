//! Database module: connection handling, schema and the query layer.
//!
//! Layout:
//! - `schema.rs`: SQL DDL applied at startup
//! - `models.rs`: row structs returned by the query layer
//! - `sqlite.rs`: pool setup and the per-request connection extractor
//! - `entries.rs`, `search.rs`, `users.rs`: statements against each table

pub mod entries;
pub mod models;
pub mod schema;
pub mod search;
pub mod sqlite;
pub mod users;

pub use models::{Entry, NewEntry, User};
pub use schema::SQLITE_INIT;
pub use search::SearchFilter;
pub use sqlite::{DbConn, SqlitePool, connect, init_schema, open};
