//! Typed askama templates and the route → template mapping.
//!
//! Every route renders exactly one template; the create and edit views share
//! the post form template. `template_for` is the enumerated source of truth
//! for that mapping and mirrors the `#[template(path = ...)]` attributes
//! below.

use actix_web::HttpResponse;
use askama::Template;

use crate::error::Result;
use crate::forms::{AuthFormContext, PostFormContext};
use crate::models::{Group, PostRecord, User};
use crate::services::pagination::Page;

/// Routes served by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    GroupList,
    Profile,
    PostDetail,
    PostCreate,
    PostEdit,
    Login,
    Signup,
}

/// Deterministic route → template mapping.
pub fn template_for(route: Route) -> &'static str {
    match route {
        Route::Index => "posts/index.html",
        Route::GroupList => "posts/group_list.html",
        Route::Profile => "posts/profile.html",
        Route::PostDetail => "posts/post_detail.html",
        Route::PostCreate | Route::PostEdit => "posts/create_post.html",
        Route::Login => "users/login.html",
        Route::Signup => "users/signup.html",
    }
}

/// Render a template into a 200 HTML response.
pub fn render_ok(template: &impl Template) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(template.render()?))
}

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexPage {
    pub page: Page<PostRecord>,
}

#[derive(Template)]
#[template(path = "posts/group_list.html")]
pub struct GroupListPage {
    pub group: Group,
    pub page: Page<PostRecord>,
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfilePage {
    pub author: User,
    pub page: Page<PostRecord>,
}

#[derive(Template)]
#[template(path = "posts/post_detail.html")]
pub struct PostDetailPage {
    pub post: PostRecord,
}

/// Shared by the create and edit views; `action` carries the form target.
#[derive(Template)]
#[template(path = "posts/create_post.html")]
pub struct PostFormPage {
    pub form: PostFormContext,
    pub is_edit: bool,
    pub action: String,
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginPage {
    pub form: AuthFormContext,
    pub next: String,
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupPage {
    pub form: AuthFormContext,
}

#[derive(Template)]
#[template(path = "core/404.html")]
pub struct NotFoundPage;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_maps_to_its_template() {
        assert_eq!(template_for(Route::Index), "posts/index.html");
        assert_eq!(template_for(Route::GroupList), "posts/group_list.html");
        assert_eq!(template_for(Route::Profile), "posts/profile.html");
        assert_eq!(template_for(Route::PostDetail), "posts/post_detail.html");
        assert_eq!(template_for(Route::PostCreate), "posts/create_post.html");
        assert_eq!(template_for(Route::Login), "users/login.html");
        assert_eq!(template_for(Route::Signup), "users/signup.html");
    }

    #[test]
    fn create_and_edit_share_the_form_template() {
        assert_eq!(
            template_for(Route::PostCreate),
            template_for(Route::PostEdit)
        );
    }

    #[test]
    fn not_found_page_renders() {
        let body = NotFoundPage.render().unwrap();
        assert!(body.contains("Page not found"));
    }
}
