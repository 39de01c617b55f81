use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::Key;
use tracing::warn;

use crate::error::RecipeError;
use crate::middleware::session::{CookiePolicy, Session};

/// Ensure the visitor's session is logged in.
pub fn ensure_logged_in(session: &Session) -> Result<(), RecipeError> {
    if session.is_logged_in() {
        Ok(())
    } else {
        Err(RecipeError::Unauthorized)
    }
}

/// Guard for mutating routes. List it before any extractor that reads the body
/// or takes a database connection so rejected requests do no work.
#[derive(Debug, Clone, Copy)]
pub struct RequireLogin;

impl<S> FromRequestParts<S> for RequireLogin
where
    S: Send + Sync,
    Key: FromRef<S>,
    CookiePolicy: FromRef<S>,
{
    type Rejection = RecipeError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        ensure_logged_in(&session).inspect_err(|_| {
            warn!(path = %parts.uri.path(), "rejected request without login");
        })?;
        Ok(Self)
    }
}
