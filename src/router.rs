use axum::Router;
use axum::extract::FromRef;
use axum::routing::get;
use axum_extra::extract::cookie::Key;

use crate::config::Config;
use crate::db::SqlitePool;
use crate::error::RecipeError;
use crate::handlers::{auth, entries, search};
use crate::middleware::session::CookiePolicy;

#[derive(Clone)]
pub struct RecipeState {
    pub pool: SqlitePool,
    key: Key,
    cookies: CookiePolicy,
}

impl RecipeState {
    /// The cookie key is stretched from `secret_key`, so sessions survive restarts
    /// as long as the secret stays the same.
    pub fn new(pool: SqlitePool, cfg: &Config) -> Result<Self, RecipeError> {
        cfg.validate()?;
        Ok(Self {
            pool,
            key: Key::derive_from(cfg.secret_key.as_bytes()),
            cookies: CookiePolicy { secure: !cfg.debug },
        })
    }
}

impl FromRef<RecipeState> for Key {
    fn from_ref(state: &RecipeState) -> Self {
        state.key.clone()
    }
}

impl FromRef<RecipeState> for SqlitePool {
    fn from_ref(state: &RecipeState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<RecipeState> for CookiePolicy {
    fn from_ref(state: &RecipeState) -> Self {
        state.cookies
    }
}

pub fn recipe_router(state: RecipeState) -> Router {
    Router::new()
        .route("/", get(entries::show_entries))
        .route("/add", get(entries::add_form).post(entries::add_entry))
        .route("/delete/{id}", get(entries::delete_entry))
        .route("/edit/{id}", get(entries::edit_form).post(entries::edit_entry))
        .route("/view/{id}", get(entries::view_entry))
        .route("/search", get(search::browse_tags).post(search::search_query))
        .route("/search/{tag}", get(search::search_tag))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .with_state(state)
}
