//! HTTP handlers and route configuration.
//!
//! URL layout follows the classic blog shape: public listings at `/`,
//! `/group/{slug}/` and `/profile/{username}/`, a post detail page, and
//! session-gated create/edit forms. Auth pages live under `/auth/`.

pub mod posts;
pub mod users;

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use askama::Template;

use crate::templates::NotFoundPage;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_list))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route("/posts/{id}/", web::get().to(posts::post_detail))
        .route("/create/", web::get().to(posts::post_create_form))
        .route("/create/", web::post().to(posts::post_create))
        .route("/posts/{id}/edit/", web::get().to(posts::post_edit_form))
        .route("/posts/{id}/edit/", web::post().to(posts::post_edit))
        .route("/auth/signup/", web::get().to(users::signup_form))
        .route("/auth/signup/", web::post().to(users::signup))
        .route("/auth/login/", web::get().to(users::login_form))
        .route("/auth/login/", web::post().to(users::login))
        .route("/auth/logout/", web::get().to(users::logout));
}

/// Fallback for every unregistered path.
pub async fn not_found() -> HttpResponse {
    let body = NotFoundPage.render().unwrap_or_default();
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// 302 redirect, the post/redirect/get convention used across the app.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
