use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqliteConnection};
use tracing::{debug, info};

use crate::config::Config;
use crate::db::schema::SQLITE_INIT;
use crate::db::users;
use crate::error::RecipeError;

pub type SqlitePool = Pool<Sqlite>;

const MAX_CONNECTIONS: u32 = 5;

/// Open a pool for `database_url`, creating the file when missing.
/// Connections are only opened when a request first asks for one.
pub async fn connect(database_url: &str) -> Result<SqlitePool, RecipeError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_lazy_with(options);
    info!(database_url, "database pool ready");
    Ok(pool)
}

/// Apply the bundled DDL statement by statement.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), RecipeError> {
    // sqlx::query runs a single statement, so split the script
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    info!("schema initialized");
    Ok(())
}

/// Pool for the configured database with schema applied and the admin account seeded.
pub async fn open(cfg: &Config) -> Result<SqlitePool, RecipeError> {
    let pool = connect(&cfg.database_url()).await?;
    init_schema(&pool).await?;
    let mut conn = pool.acquire().await?;
    users::ensure_admin(&mut conn, &cfg.username, &cfg.password).await?;
    Ok(pool)
}

/// Request-scoped database connection.
///
/// Acquired from the pool when a handler extracts it and handed back when the
/// handler finishes, whichever way it exits.
pub struct DbConn(PoolConnection<Sqlite>);

impl Deref for DbConn {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbConn {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<S> FromRequestParts<S> for DbConn
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = RecipeError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = SqlitePool::from_ref(state);
        let conn = pool.acquire().await?;
        debug!("acquired request connection");
        Ok(Self(conn))
    }
}
