//! Route handlers. Each one does at most one logical write and renders a page or
//! redirects with a flash notice.

pub mod auth;
pub mod entries;
pub mod search;

use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::error::RecipeError;
use crate::middleware::session::{FlashCategory, Session};
use crate::views::PageContext;

/// Render a page, consuming any pending flash notices.
pub(crate) fn page(session: Session, render: impl FnOnce(&PageContext) -> String) -> Response {
    let logged_in = session.is_logged_in();
    let (session, flashes) = session.take_flashes();
    let ctx = PageContext { logged_in, flashes };
    (session, Html(render(&ctx))).into_response()
}

pub(crate) fn redirect_with(
    session: Session,
    category: FlashCategory,
    message: impl Into<String>,
    to: &str,
) -> Response {
    (session.flash(category, message), Redirect::to(to)).into_response()
}

pub(crate) fn require(value: Option<String>, field: &'static str) -> Result<String, RecipeError> {
    value.ok_or(RecipeError::MissingField(field))
}
