use axum::extract::{Form, Path};
use axum::response::Response;
use serde::Deserialize;

use crate::db::DbConn;
use crate::db::search::{all_tags, search};
use crate::error::RecipeError;
use crate::handlers::{page, redirect_with, require};
use crate::middleware::session::{FlashCategory, Session};
use crate::views;

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub search_query: Option<String>,
}

/// GET /search -> every distinct tag.
pub async fn browse_tags(session: Session, mut db: DbConn) -> Result<Response, RecipeError> {
    let tags = all_tags(&mut db).await?;
    Ok(page(session, |ctx| views::tag_list(ctx, &tags)))
}

/// GET /search/{tag}
pub async fn search_tag(
    session: Session,
    mut db: DbConn,
    Path(tag): Path<String>,
) -> Result<Response, RecipeError> {
    let entries = search(&mut db, &tag).await?;
    Ok(page(session, |ctx| views::show_entries(ctx, &entries)))
}

/// POST /search with a free-text `search_query`.
pub async fn search_query(
    session: Session,
    mut db: DbConn,
    Form(form): Form<SearchForm>,
) -> Result<Response, RecipeError> {
    let query = match require(form.search_query, "search_query") {
        Ok(query) => query,
        Err(err) => {
            return Ok(redirect_with(
                session,
                FlashCategory::Error,
                err.to_string(),
                "/search",
            ));
        }
    };
    let entries = search(&mut db, &query).await?;
    Ok(page(session, |ctx| views::show_entries(ctx, &entries)))
}
