use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::views;

#[derive(Debug, ThisError)]
pub enum RecipeError {
    #[error("Login required")]
    Unauthorized,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for RecipeError {
    fn from(e: figment::Error) -> Self {
        RecipeError::Config(Box::new(e))
    }
}

impl From<argon2::password_hash::Error> for RecipeError {
    fn from(e: argon2::password_hash::Error) -> Self {
        RecipeError::PasswordHash(e.to_string())
    }
}

impl RecipeError {
    pub fn status(&self) -> StatusCode {
        match self {
            RecipeError::Unauthorized => StatusCode::UNAUTHORIZED,
            RecipeError::MissingField(_) => StatusCode::BAD_REQUEST,
            RecipeError::Database(_)
            | RecipeError::PasswordHash(_)
            | RecipeError::Config(_)
            | RecipeError::InvalidConfig(_)
            | RecipeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RecipeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };
        (status, Html(views::error_page(status, &message))).into_response()
    }
}
