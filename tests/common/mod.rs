//! Shared fixtures for the integration tests.
//!
//! Tests run the full actix app against the in-memory store; sessions are
//! forged with the same keys the app state is built with.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::web;

use yatube::db::{MemStore, Store};
use yatube::models::{Group, NewGroup, NewPost, NewUser, Post, User};
use yatube::services::auth::{self, SessionKeys, SESSION_COOKIE};
use yatube::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "password-123";

pub fn state(store: Arc<MemStore>) -> web::Data<AppState> {
    web::Data::new(AppState {
        store,
        sessions: SessionKeys::new(TEST_SECRET.as_bytes(), 24),
    })
}

pub async fn user(store: &MemStore, username: &str) -> User {
    let password_hash = auth::hash_password(TEST_PASSWORD).expect("hashing");
    store
        .create_user(NewUser {
            username,
            password_hash: &password_hash,
        })
        .await
        .expect("create user")
}

pub async fn group(store: &MemStore, title: &str, slug: &str) -> Group {
    store
        .create_group(NewGroup {
            title,
            slug,
            description: "Test description",
        })
        .await
        .expect("create group")
}

pub async fn post(store: &MemStore, author: &User, group: Option<&Group>, text: &str) -> Post {
    store
        .create_post(NewPost {
            text,
            author_id: author.id,
            group_id: group.map(|g| g.id),
        })
        .await
        .expect("create post")
}

/// Session cookie for `user`, signed with the test keys.
pub fn session_cookie(user: &User) -> Cookie<'static> {
    let keys = SessionKeys::new(TEST_SECRET.as_bytes(), 24);
    Cookie::new(SESSION_COOKIE, keys.issue(user).expect("issue token"))
}

/// Number of post cards rendered on a listing page.
pub fn count_post_cards(body: &str) -> usize {
    body.matches("<article class=\"post\">").count()
}
