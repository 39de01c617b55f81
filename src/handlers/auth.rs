use axum::extract::Form;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::{DbConn, users};
use crate::error::RecipeError;
use crate::handlers::{page, redirect_with, require};
use crate::middleware::session::{FlashCategory, Session};
use crate::views;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    fn credentials(self) -> Result<(String, String), RecipeError> {
        Ok((
            require(self.username, "username")?,
            require(self.password, "password")?,
        ))
    }
}

/// GET /login
pub async fn login_form(session: Session) -> Response {
    page(session, views::login_form)
}

/// POST /login -> always lands on the entry list; failures leave an error notice.
pub async fn login(
    session: Session,
    mut db: DbConn,
    Form(form): Form<LoginForm>,
) -> Result<Response, RecipeError> {
    if session.is_logged_in() {
        return Ok(Redirect::to("/").into_response());
    }
    let (username, password) = match form.credentials() {
        Ok(creds) => creds,
        Err(err) => {
            return Ok(redirect_with(
                session,
                FlashCategory::Error,
                err.to_string(),
                "/",
            ));
        }
    };

    if users::check_credentials(&mut db, &username, &password).await? {
        info!(username = %username, "login succeeded");
        Ok((session.log_in(), Redirect::to("/")).into_response())
    } else {
        warn!(username = %username, "login failed");
        Ok(redirect_with(
            session,
            FlashCategory::Error,
            "Invalid username or password",
            "/",
        ))
    }
}

/// GET /logout
pub async fn logout(session: Session) -> Response {
    redirect_with(
        session.log_out(),
        FlashCategory::Success,
        "You were logged out",
        "/",
    )
}
