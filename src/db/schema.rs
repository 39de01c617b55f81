//! SQL DDL for the recipe database.

/// SQLite schema:
/// - `entries`: one recipe per row; `tags` is a space separated token list
/// - `users`: login accounts; `password` holds an Argon2 PHC string
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    ingredients TEXT NOT NULL,
    steps TEXT NOT NULL,
    tags TEXT NOT NULL,
    url TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    password TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
"#;
