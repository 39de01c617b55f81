use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::db::models::User;
use crate::error::RecipeError;

pub fn hash_password(password: &str) -> Result<String, RecipeError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

pub async fn find_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Vec<User>, RecipeError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, password FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_all(&mut *conn)
    .await?;
    Ok(users)
}

pub async fn create(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<i64, RecipeError> {
    let hash = hash_password(password)?;
    let id = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
        .bind(username)
        .bind(hash)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    Ok(id)
}

/// Seed the configured admin account unless a user with that name already exists.
pub async fn ensure_admin(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<(), RecipeError> {
    if !find_by_username(conn, username).await?.is_empty() {
        return Ok(());
    }
    let id = create(conn, username, password).await?;
    info!(id, username, "admin user created");
    Ok(())
}

/// Credentials are accepted only when exactly one stored row carries `username`
/// and a hash that `password` verifies against.
pub async fn check_credentials(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<bool, RecipeError> {
    let hashes: Vec<String> = find_by_username(conn, username)
        .await?
        .into_iter()
        .map(|u| u.password)
        .collect();
    let password = password.to_string();
    // argon2 is CPU bound; keep it off the async workers
    let matches = tokio::task::spawn_blocking(move || {
        hashes
            .iter()
            .filter(|hash| verify_password(&password, hash))
            .count()
    })
    .await
    .map_err(|e| RecipeError::PasswordHash(format!("verification task failed: {e}")))?;
    Ok(matches == 1)
}
