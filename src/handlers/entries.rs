use axum::extract::{Form, Path};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::warn;

use crate::db::entries::{self, parse_id};
use crate::db::{DbConn, NewEntry};
use crate::error::RecipeError;
use crate::handlers::{page, redirect_with, require};
use crate::middleware::RequireLogin;
use crate::middleware::session::{FlashCategory, Session};
use crate::views;

/// Submitted add/edit form. Fields are optional so a missing one can be reported
/// instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct EntryForm {
    pub title: Option<String>,
    pub ingredients: Option<String>,
    pub steps: Option<String>,
    pub tags: Option<String>,
    pub url: Option<String>,
}

impl EntryForm {
    pub fn into_entry(self) -> Result<NewEntry, RecipeError> {
        Ok(NewEntry {
            title: require(self.title, "title")?,
            ingredients: require(self.ingredients, "ingredients")?,
            steps: require(self.steps, "steps")?,
            tags: require(self.tags, "tags")?,
            url: require(self.url, "url")?,
        })
    }
}

/// GET / -> every entry.
pub async fn show_entries(session: Session, mut db: DbConn) -> Result<Response, RecipeError> {
    let entries = entries::list_all(&mut db).await?;
    Ok(page(session, |ctx| views::show_entries(ctx, &entries)))
}

/// GET /view/{id}
pub async fn view_entry(
    session: Session,
    mut db: DbConn,
    Path(id): Path<String>,
) -> Result<Response, RecipeError> {
    let entries = match parse_id(&id) {
        Some(id) => entries::fetch_by_id(&mut db, id).await?,
        None => Vec::new(),
    };
    Ok(page(session, |ctx| views::view_entry(ctx, &entries)))
}

/// GET /add
pub async fn add_form(_: RequireLogin, session: Session) -> Response {
    page(session, views::add_entry)
}

/// POST /add -> insert, then show the new entry.
pub async fn add_entry(
    _: RequireLogin,
    session: Session,
    mut db: DbConn,
    Form(form): Form<EntryForm>,
) -> Result<Response, RecipeError> {
    let entry = match form.into_entry() {
        Ok(entry) => entry,
        Err(err) => return Ok(reject_form(session, err, "/add")),
    };
    let id = entries::insert(&mut db, &entry).await?;
    Ok(redirect_with(
        session,
        FlashCategory::Success,
        "New entry was successfully posted",
        &format!("/view/{id}"),
    ))
}

/// GET /edit/{id} -> form prefilled with the current values.
pub async fn edit_form(
    _: RequireLogin,
    session: Session,
    mut db: DbConn,
    Path(id): Path<String>,
) -> Result<Response, RecipeError> {
    let entries = match parse_id(&id) {
        Some(id) => entries::fetch_by_id(&mut db, id).await?,
        None => Vec::new(),
    };
    Ok(page(session, |ctx| views::edit_entry(ctx, &entries)))
}

/// POST /edit/{id} -> full replace. Unknown ids update nothing.
pub async fn edit_entry(
    _: RequireLogin,
    session: Session,
    mut db: DbConn,
    Path(raw_id): Path<String>,
    Form(form): Form<EntryForm>,
) -> Result<Response, RecipeError> {
    let Some(id) = parse_id(&raw_id) else {
        warn!(id = %raw_id, "edit with non-numeric id");
        return Ok(Redirect::to("/").into_response());
    };
    let entry = match form.into_entry() {
        Ok(entry) => entry,
        Err(err) => return Ok(reject_form(session, err, &format!("/edit/{id}"))),
    };
    entries::update(&mut db, id, &entry).await?;
    Ok(redirect_with(
        session,
        FlashCategory::Success,
        format!("Entry {id} has been modified."),
        &format!("/view/{id}"),
    ))
}

/// GET /delete/{id}
pub async fn delete_entry(
    _: RequireLogin,
    session: Session,
    mut db: DbConn,
    Path(raw_id): Path<String>,
) -> Result<Response, RecipeError> {
    if let Some(id) = parse_id(&raw_id) {
        entries::delete(&mut db, id).await?;
    }
    Ok(redirect_with(
        session,
        FlashCategory::Success,
        format!("Entry {} has been deleted", raw_id.trim()),
        "/",
    ))
}

fn reject_form(session: Session, err: RecipeError, back: &str) -> Response {
    warn!(error = %err, "rejected incomplete form");
    redirect_with(session, FlashCategory::Error, err.to_string(), back)
}
