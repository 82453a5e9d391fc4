//! In-memory storage backend.
//!
//! Mirrors the PostgreSQL backend's observable behavior (newest-first
//! ordering, unique usernames and slugs, monotonic ids) without a database.
//! The integration test suite runs the whole actix app against this store.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{Group, NewGroup, NewPost, NewUser, Post, PostRecord, PostUpdate, User};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    next_user_id: i64,
    next_group_id: i64,
    next_post_id: i64,
}

impl Inner {
    fn record(&self, post: &Post) -> Option<PostRecord> {
        let author = self.users.iter().find(|u| u.id == post.author_id)?;
        let group = post
            .group_id
            .and_then(|gid| self.groups.iter().find(|g| g.id == gid));

        Some(PostRecord {
            id: post.id,
            text: post.text.clone(),
            author_id: post.author_id,
            author_username: author.username.clone(),
            group_id: post.group_id,
            group_title: group.map(|g| g.title.clone()),
            group_slug: group.map(|g| g.slug.clone()),
            created_at: post.created_at,
        })
    }

    /// Posts matching `keep`, newest first, sliced with limit/offset.
    fn page(
        &self,
        keep: impl Fn(&Post) -> bool,
        limit: i64,
        offset: i64,
    ) -> Vec<PostRecord> {
        let mut matching: Vec<&Post> = self.posts.iter().filter(|p| keep(p)).collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .filter_map(|p| self.record(p))
            .collect()
    }
}

#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, new: NewUser<'_>) -> Result<User> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.username == new.username) {
            return Err(AppError::Conflict("username already exists".into()));
        }

        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            username: new.username.to_string(),
            password_hash: new.password_hash.to_string(),
            joined_at: Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.lock();
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_group(&self, new: NewGroup<'_>) -> Result<Group> {
        let mut inner = self.lock();
        if inner.groups.iter().any(|g| g.slug == new.slug) {
            return Err(AppError::Conflict("group slug already exists".into()));
        }

        inner.next_group_id += 1;
        let group = Group {
            id: inner.next_group_id,
            title: new.title.to_string(),
            slug: new.slug.to_string(),
            description: new.description.to_string(),
        };
        inner.groups.push(group.clone());
        Ok(group)
    }

    async fn find_group(&self, id: i64) -> Result<Option<Group>> {
        let inner = self.lock();
        Ok(inner.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let inner = self.lock();
        Ok(inner.groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let inner = self.lock();
        let mut groups = inner.groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }

    async fn create_post(&self, new: NewPost<'_>) -> Result<Post> {
        let mut inner = self.lock();
        inner.next_post_id += 1;
        let post = Post {
            id: inner.next_post_id,
            text: new.text.to_string(),
            author_id: new.author_id,
            group_id: new.group_id,
            created_at: Utc::now(),
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: i64, update: PostUpdate<'_>) -> Result<()> {
        let mut inner = self.lock();
        let post = inner
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

        post.text = update.text.to_string();
        post.group_id = update.group_id;
        Ok(())
    }

    async fn find_post(&self, id: i64) -> Result<Option<PostRecord>> {
        let inner = self.lock();
        let post = inner.posts.iter().find(|p| p.id == id);
        Ok(post.and_then(|p| inner.record(p)))
    }

    async fn list_recent_posts(&self, limit: i64, offset: i64) -> Result<Vec<PostRecord>> {
        let inner = self.lock();
        Ok(inner.page(|_| true, limit, offset))
    }

    async fn list_posts_by_group(
        &self,
        group_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRecord>> {
        let inner = self.lock();
        Ok(inner.page(|p| p.group_id == Some(group_id), limit, offset))
    }

    async fn list_posts_by_author(
        &self,
        author_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRecord>> {
        let inner = self.lock();
        Ok(inner.page(|p| p.author_id == author_id, limit, offset))
    }

    async fn count_posts(&self) -> Result<i64> {
        let inner = self.lock();
        Ok(inner.posts.len() as i64)
    }

    async fn count_posts_by_group(&self, group_id: i64) -> Result<i64> {
        let inner = self.lock();
        Ok(inner
            .posts
            .iter()
            .filter(|p| p.group_id == Some(group_id))
            .count() as i64)
    }

    async fn count_posts_by_author(&self, author_id: i64) -> Result<i64> {
        let inner = self.lock();
        Ok(inner
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (MemStore, User, Group) {
        let store = MemStore::new();
        let user = store
            .create_user(NewUser {
                username: "auth",
                password_hash: "x",
            })
            .await
            .unwrap();
        let group = store
            .create_group(NewGroup {
                title: "Test group",
                slug: "test-slug",
                description: "A group for tests",
            })
            .await
            .unwrap();
        (store, user, group)
    }

    #[tokio::test]
    async fn posts_are_listed_newest_first_with_id_tiebreak() {
        let (store, user, _) = seeded().await;
        for i in 0..3 {
            store
                .create_post(NewPost {
                    text: &format!("post {i}"),
                    author_id: user.id,
                    group_id: None,
                })
                .await
                .unwrap();
        }

        let posts = store.list_recent_posts(10, 0).await.unwrap();
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let (store, _, _) = seeded().await;
        let err = store
            .create_user(NewUser {
                username: "auth",
                password_hash: "y",
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn group_filter_excludes_other_groups() {
        let (store, user, group) = seeded().await;
        let other = store
            .create_group(NewGroup {
                title: "Other",
                slug: "other",
                description: "",
            })
            .await
            .unwrap();

        store
            .create_post(NewPost {
                text: "in group",
                author_id: user.id,
                group_id: Some(group.id),
            })
            .await
            .unwrap();
        store
            .create_post(NewPost {
                text: "ungrouped",
                author_id: user.id,
                group_id: None,
            })
            .await
            .unwrap();

        let in_group = store.list_posts_by_group(group.id, 10, 0).await.unwrap();
        assert_eq!(in_group.len(), 1);
        assert_eq!(in_group[0].text, "in group");
        assert_eq!(in_group[0].group_title.as_deref(), Some("Test group"));

        let in_other = store.list_posts_by_group(other.id, 10, 0).await.unwrap();
        assert!(in_other.is_empty());
    }

    #[tokio::test]
    async fn updating_an_unknown_post_is_not_found() {
        let (store, _, _) = seeded().await;
        let err = store
            .update_post(
                42,
                PostUpdate {
                    text: "nothing",
                    group_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_changes_text_and_group_only() {
        let (store, user, group) = seeded().await;
        let post = store
            .create_post(NewPost {
                text: "before",
                author_id: user.id,
                group_id: None,
            })
            .await
            .unwrap();

        store
            .update_post(
                post.id,
                PostUpdate {
                    text: "after",
                    group_id: Some(group.id),
                },
            )
            .await
            .unwrap();

        let updated = store.find_post(post.id).await.unwrap().unwrap();
        assert_eq!(updated.text, "after");
        assert_eq!(updated.group_slug.as_deref(), Some("test-slug"));
        assert_eq!(updated.author_username, "auth");
        assert_eq!(updated.created_at, post.created_at);
    }
}
