//! Storage layer.
//!
//! `Store` is the persistence port the rest of the application talks to.
//! `PgStore` is the production backend (PostgreSQL via sqlx); `MemStore` is
//! an in-memory backend used by the integration test suite.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Group, NewGroup, NewPost, NewUser, Post, PostRecord, PostUpdate, User};

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

/// Persistence contract for users, groups, and posts.
///
/// Listing queries return posts ordered newest-first (`created_at DESC`,
/// ties broken by `id DESC`) and are paged with limit/offset; page math
/// lives in the service layer.
#[async_trait]
pub trait Store: Send + Sync {
    // User operations
    async fn create_user(&self, new: NewUser<'_>) -> Result<User>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    // Group operations
    async fn create_group(&self, new: NewGroup<'_>) -> Result<Group>;
    async fn find_group(&self, id: i64) -> Result<Option<Group>>;
    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>>;
    async fn list_groups(&self) -> Result<Vec<Group>>;

    // Post operations
    async fn create_post(&self, new: NewPost<'_>) -> Result<Post>;
    async fn update_post(&self, id: i64, update: PostUpdate<'_>) -> Result<()>;
    async fn find_post(&self, id: i64) -> Result<Option<PostRecord>>;
    async fn list_recent_posts(&self, limit: i64, offset: i64) -> Result<Vec<PostRecord>>;
    async fn list_posts_by_group(
        &self,
        group_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRecord>>;
    async fn list_posts_by_author(
        &self,
        author_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRecord>>;
    async fn count_posts(&self) -> Result<i64>;
    async fn count_posts_by_group(&self, group_id: i64) -> Result<i64>;
    async fn count_posts_by_author(&self, author_id: i64) -> Result<i64>;
}
