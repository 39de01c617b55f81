use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One recipe row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub ingredients: String,
    pub steps: String,
    pub tags: String,
    pub url: String,
}

/// The editable part of an entry, used for both insert and full-replace update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    pub ingredients: String,
    pub steps: String,
    pub tags: String,
    pub url: String,
}

impl From<Entry> for NewEntry {
    fn from(e: Entry) -> Self {
        Self {
            title: e.title,
            ingredients: e.ingredients,
            steps: e.steps,
            tags: e.tags,
            url: e.url,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string.
    pub password: String,
}
