//! Post handlers: listings, detail, create and edit forms.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::forms::{self, PostForm, PostFormContext};
use crate::handlers::redirect;
use crate::middleware::{permissions, SessionUser};
use crate::services::{PostFilter, PostService};
use crate::templates::{
    render_ok, GroupListPage, IndexPage, PostDetailPage, PostFormPage, ProfilePage,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Raw `?page=` value; resolved leniently by the paginator.
    pub page: Option<String>,
}

/// Post ids come in as a path segment; anything that is not a number is
/// simply an unknown post.
fn parse_post_id(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("post \"{raw}\"")))
}

pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = PostService::new(state.store.clone());
    let listing = service
        .list_page(&PostFilter::All, query.page.as_deref())
        .await?;
    render_ok(&IndexPage { page: listing.page })
}

pub async fn group_list(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();
    let (group, page) = PostService::new(state.store.clone())
        .group_page(&slug, query.page.as_deref())
        .await?;
    render_ok(&GroupListPage { group, page })
}

pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let (author, page) = PostService::new(state.store.clone())
        .profile_page(&username, query.page.as_deref())
        .await?;
    render_ok(&ProfilePage { author, page })
}

pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_post_id(&path.into_inner())?;
    let post = PostService::new(state.store.clone()).get_post(id).await?;
    render_ok(&PostDetailPage { post })
}

pub async fn post_create_form(
    state: web::Data<AppState>,
    _user: SessionUser,
) -> Result<HttpResponse> {
    let groups = PostService::new(state.store.clone()).group_choices().await?;
    render_ok(&PostFormPage {
        form: PostFormContext::empty(groups),
        is_edit: false,
        action: "/create/".to_string(),
    })
}

pub async fn post_create(
    state: web::Data<AppState>,
    user: SessionUser,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner().normalized();
    let service = PostService::new(state.store.clone());

    let mut messages = match form.validate() {
        Err(errors) => forms::error_messages(&errors),
        Ok(()) => Vec::new(),
    };
    let group_id = match form.group_choice() {
        Ok(group_id) => group_id,
        Err(message) => {
            messages.push(message);
            None
        }
    };
    if !messages.is_empty() {
        let mut context = PostFormContext::from_form(&form, service.group_choices().await?);
        context.errors = messages;
        return render_ok(&PostFormPage {
            form: context,
            is_edit: false,
            action: "/create/".to_string(),
        });
    }

    match service.create_post(user.id, &form.text, group_id).await {
        Ok(post) => {
            tracing::info!(post_id = post.id, user = %user.username, "post created");
            Ok(redirect(&format!("/profile/{}/", user.username)))
        }
        Err(AppError::Validation(message)) => {
            let mut context = PostFormContext::from_form(&form, service.group_choices().await?);
            context.errors.push(message);
            render_ok(&PostFormPage {
                form: context,
                is_edit: false,
                action: "/create/".to_string(),
            })
        }
        Err(other) => Err(other),
    }
}

pub async fn post_edit_form(
    state: web::Data<AppState>,
    user: SessionUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_post_id(&path.into_inner())?;
    let service = PostService::new(state.store.clone());
    let post = service.get_post(id).await?;

    // Only the author gets the edit form; everyone else lands on the post.
    if !permissions::is_author(user.id, &post) {
        return Ok(redirect(&format!("/posts/{id}/")));
    }

    render_ok(&PostFormPage {
        form: PostFormContext {
            text: post.text.clone(),
            group: post.group_id,
            groups: service.group_choices().await?,
            errors: Vec::new(),
        },
        is_edit: true,
        action: format!("/posts/{id}/edit/"),
    })
}

pub async fn post_edit(
    state: web::Data<AppState>,
    user: SessionUser,
    path: web::Path<String>,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let id = parse_post_id(&path.into_inner())?;
    let form = form.into_inner().normalized();
    let service = PostService::new(state.store.clone());
    let post = service.get_post(id).await?;

    if !permissions::is_author(user.id, &post) {
        return Ok(redirect(&format!("/posts/{id}/")));
    }

    let mut messages = match form.validate() {
        Err(errors) => forms::error_messages(&errors),
        Ok(()) => Vec::new(),
    };
    let group_id = match form.group_choice() {
        Ok(group_id) => group_id,
        Err(message) => {
            messages.push(message);
            None
        }
    };
    if !messages.is_empty() {
        let mut context = PostFormContext::from_form(&form, service.group_choices().await?);
        context.errors = messages;
        return render_ok(&PostFormPage {
            form: context,
            is_edit: true,
            action: format!("/posts/{id}/edit/"),
        });
    }

    match service.update_post(id, user.id, &form.text, group_id).await {
        Ok(()) => {
            tracing::info!(post_id = id, user = %user.username, "post updated");
            Ok(redirect(&format!("/posts/{id}/")))
        }
        Err(AppError::Validation(message)) => {
            let mut context = PostFormContext::from_form(&form, service.group_choices().await?);
            context.errors.push(message);
            render_ok(&PostFormPage {
                form: context,
                is_edit: true,
                action: format!("/posts/{id}/edit/"),
            })
        }
        Err(other) => Err(other),
    }
}
