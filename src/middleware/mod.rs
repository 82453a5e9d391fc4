//! Request identity extractors.
//!
//! `SessionUser` gates protected routes: anonymous requests are bounced to
//! the login form with a `next` parameter instead of getting an error page.

pub mod permissions;

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::error::AppError;
use crate::services::auth::SESSION_COOKIE;
use crate::AppState;

/// Identity decoded from the session cookie.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

fn session_from_request(req: &HttpRequest) -> Option<SessionUser> {
    let state = req.app_data::<web::Data<AppState>>()?;
    let cookie = req.cookie(SESSION_COOKIE)?;
    let claims = state.sessions.verify(cookie.value())?;

    Some(SessionUser {
        id: claims.sub,
        username: claims.username,
    })
}

impl FromRequest for SessionUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(session_from_request(req).ok_or_else(|| AppError::LoginRequired {
            next: req.path().to_string(),
        }))
    }
}
