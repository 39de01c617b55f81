use sqlx::SqliteConnection;
use tracing::info;

use crate::db::models::{Entry, NewEntry};
use crate::error::RecipeError;

pub(crate) const ENTRY_COLUMNS: &str = "id, title, ingredients, steps, tags, url";

/// Every entry, oldest first.
pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<Entry>, RecipeError> {
    let entries = sqlx::query_as::<_, Entry>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries ORDER BY id ASC"
    ))
    .fetch_all(&mut *conn)
    .await?;
    Ok(entries)
}

/// Insert and return the id assigned by SQLite.
pub async fn insert(conn: &mut SqliteConnection, entry: &NewEntry) -> Result<i64, RecipeError> {
    let id = sqlx::query(
        "INSERT INTO entries (title, ingredients, steps, tags, url) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&entry.title)
    .bind(&entry.ingredients)
    .bind(&entry.steps)
    .bind(&entry.tags)
    .bind(&entry.url)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();
    info!(id, title = %entry.title, "entry inserted");
    Ok(id)
}

/// Replace every editable field of entry `id`. Returns the number of rows touched,
/// which is zero for an unknown id.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    entry: &NewEntry,
) -> Result<u64, RecipeError> {
    let affected = sqlx::query(
        "UPDATE entries SET title = ?, ingredients = ?, steps = ?, tags = ?, url = ? WHERE id = ?",
    )
    .bind(&entry.title)
    .bind(&entry.ingredients)
    .bind(&entry.steps)
    .bind(&entry.tags)
    .bind(&entry.url)
    .bind(id)
    .execute(&mut *conn)
    .await?
    .rows_affected();
    info!(id, affected, "entry updated");
    Ok(affected)
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<u64, RecipeError> {
    let affected = sqlx::query("DELETE FROM entries WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    info!(id, affected, "entry deleted");
    Ok(affected)
}

/// Entries with the given id; at most one row, kept as a list so an unknown id is
/// simply empty.
pub async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Vec<Entry>, RecipeError> {
    let entries = sqlx::query_as::<_, Entry>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ? ORDER BY id DESC"
    ))
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(entries)
}

/// Parse an id taken from a URL path. Surrounding whitespace is ignored; anything
/// that is not an integer cannot name a row.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
