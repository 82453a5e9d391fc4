//! Auth handlers: signup, login, logout.

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::forms::{self, AuthFormContext, LoginForm, SignupForm};
use crate::handlers::redirect;
use crate::models::NewUser;
use crate::services::auth::{self, SESSION_COOKIE};
use crate::templates::{render_ok, LoginPage, SignupPage};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: String,
}

/// Post-login target. Only same-site paths are honored; anything else
/// falls back to the index.
fn safe_next(next: &str) -> &str {
    if next.starts_with('/') && !next.starts_with("//") {
        next
    } else {
        "/"
    }
}

pub async fn signup_form() -> Result<HttpResponse> {
    render_ok(&SignupPage {
        form: AuthFormContext::default(),
    })
}

pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner().normalized();
    let mut context = AuthFormContext {
        username: form.username.clone(),
        errors: Vec::new(),
    };

    if let Err(errors) = form.validate() {
        context.errors = forms::error_messages(&errors);
        return render_ok(&SignupPage { form: context });
    }

    let password_hash = auth::hash_password(&form.password)?;
    match state
        .store
        .create_user(NewUser {
            username: &form.username,
            password_hash: &password_hash,
        })
        .await
    {
        Ok(user) => {
            tracing::info!(user = %user.username, "user registered");
            Ok(redirect("/auth/login/"))
        }
        Err(AppError::Conflict(_)) => {
            context.errors.push("Username is already taken".to_string());
            render_ok(&SignupPage { form: context })
        }
        Err(other) => Err(other),
    }
}

pub async fn login_form(query: web::Query<NextQuery>) -> Result<HttpResponse> {
    render_ok(&LoginPage {
        form: AuthFormContext::default(),
        next: safe_next(&query.next).to_string(),
    })
}

pub async fn login(state: web::Data<AppState>, form: web::Form<LoginForm>) -> Result<HttpResponse> {
    let form = form.into_inner();
    let next = safe_next(&form.next).to_string();
    let mut context = AuthFormContext {
        username: form.username.clone(),
        errors: Vec::new(),
    };

    if let Err(errors) = form.validate() {
        context.errors = forms::error_messages(&errors);
        return render_ok(&LoginPage {
            form: context,
            next,
        });
    }

    let user = state.store.find_user_by_username(&form.username).await?;
    match user {
        Some(user) if auth::verify_password(&form.password, &user.password_hash) => {
            let token = state.sessions.issue(&user)?;
            let cookie = Cookie::build(SESSION_COOKIE, token)
                .path("/")
                .http_only(true)
                .finish();

            tracing::info!(user = %user.username, "login");
            Ok(HttpResponse::Found()
                .cookie(cookie)
                .insert_header((header::LOCATION, next))
                .finish())
        }
        _ => {
            tracing::debug!(user = %form.username, "failed login attempt");
            context
                .errors
                .push("Invalid username or password".to_string());
            render_ok(&LoginPage {
                form: context,
                next,
            })
        }
    }
}

pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();

    HttpResponse::Found()
        .cookie(cookie)
        .insert_header((header::LOCATION, "/"))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::safe_next;

    #[test]
    fn next_parameter_only_allows_same_site_paths() {
        assert_eq!(safe_next("/create/"), "/create/");
        assert_eq!(safe_next("/posts/1/edit/"), "/posts/1/edit/");
        assert_eq!(safe_next(""), "/");
        assert_eq!(safe_next("https://evil.example"), "/");
        assert_eq!(safe_next("//evil.example"), "/");
    }
}
