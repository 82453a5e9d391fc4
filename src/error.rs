//! Error types for the application.
//!
//! Domain failures are mapped to the HTTP responses a browser expects from
//! a server-rendered app: unknown entities become a 404 page, protected
//! routes redirect anonymous visitors to the login form, and everything
//! unexpected is logged and collapsed into a generic 500.

use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use askama::Template;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

use crate::templates::NotFoundPage;

/// Characters that must be percent-encoded in the `next` query value
const NEXT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Resource referenced by the request does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Anonymous request hit a route that requires a session.
    #[error("authentication required")]
    LoginRequired { next: String },

    /// Authenticated user is not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Request payload failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource already exists (duplicate username, slug).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Template rendering failed.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(what) => {
                tracing::debug!(%what, "not found");
                let body = NotFoundPage.render().unwrap_or_default();
                HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(body)
            }
            AppError::LoginRequired { next } => {
                let next = utf8_percent_encode(next, NEXT_SET);
                HttpResponse::Found()
                    .insert_header((header::LOCATION, format!("/auth/login/?next={next}")))
                    .finish()
            }
            AppError::Forbidden(msg) => HttpResponse::Forbidden().body(msg.clone()),
            AppError::Validation(msg) => HttpResponse::BadRequest().body(msg.clone()),
            AppError::Conflict(msg) => HttpResponse::Conflict().body(msg.clone()),
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                HttpResponse::InternalServerError().body("Internal server error")
            }
        }
    }
}
