//! Data models for the blog.
//!
//! - `User`: registered account, owns posts
//! - `Group`: a named category identified by a unique slug
//! - `Post`: a user-authored text record, optionally tagged with a group
//! - `PostRecord`: flattened listing row (post joined with its author and,
//!   when present, its group)

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    /// URL slug, unique and stable; used as the external identifier.
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    /// Set at creation, immutable afterwards. Listings sort on it.
    pub created_at: DateTime<Utc>,
}

/// A post joined with its author and optional group, as shown on listing
/// and detail pages.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct NewGroup<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct NewPost<'a> {
    pub text: &'a str,
    pub author_id: i64,
    pub group_id: Option<i64>,
}

/// Editable fields of a post. Author and creation time never change.
#[derive(Debug, Clone, Copy)]
pub struct PostUpdate<'a> {
    pub text: &'a str,
    pub group_id: Option<i64>,
}
