//! Post service: listings, creation, and editing.

use std::sync::Arc;

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::middleware::permissions;
use crate::models::{Group, NewPost, Post, PostRecord, PostUpdate, User};
use crate::services::pagination::{Page, Paginator, PAGE_SIZE};

/// Listing scope: everything, one group (by slug), or one author (by
/// username).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    ByGroup(String),
    ByAuthor(String),
}

/// One page of a listing plus the filter's resolved context entity.
#[derive(Debug, Clone)]
pub struct Listing {
    pub page: Page<PostRecord>,
    /// Set when the filter was `ByGroup`.
    pub group: Option<Group>,
    /// Set when the filter was `ByAuthor`.
    pub author: Option<User>,
}

pub struct PostService {
    store: Arc<dyn Store>,
}

impl PostService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Resolve the filter, count the matching posts, and fetch one page of
    /// them newest-first. Fails with `NotFound` when the filter references
    /// an unknown group slug or username.
    pub async fn list_page(&self, filter: &PostFilter, raw_page: Option<&str>) -> Result<Listing> {
        let (group, author, total) = match filter {
            PostFilter::All => (None, None, self.store.count_posts().await?),
            PostFilter::ByGroup(slug) => {
                let group = self
                    .store
                    .find_group_by_slug(slug)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("group \"{slug}\"")))?;
                let total = self.store.count_posts_by_group(group.id).await?;
                (Some(group), None, total)
            }
            PostFilter::ByAuthor(username) => {
                let author = self
                    .store
                    .find_user_by_username(username)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("user \"{username}\"")))?;
                let total = self.store.count_posts_by_author(author.id).await?;
                (None, Some(author), total)
            }
        };

        let paginator = Paginator::new(total, PAGE_SIZE);
        let number = paginator.resolve(raw_page);
        let offset = paginator.offset(number);

        let items = match (&group, &author) {
            (Some(g), _) => self.store.list_posts_by_group(g.id, PAGE_SIZE, offset).await?,
            (_, Some(a)) => {
                self.store
                    .list_posts_by_author(a.id, PAGE_SIZE, offset)
                    .await?
            }
            _ => self.store.list_recent_posts(PAGE_SIZE, offset).await?,
        };

        Ok(Listing {
            page: Page {
                items,
                number,
                num_pages: paginator.num_pages(),
                total_count: total,
            },
            group,
            author,
        })
    }

    /// Group listing: resolved group plus one page of its posts.
    pub async fn group_page(
        &self,
        slug: &str,
        raw_page: Option<&str>,
    ) -> Result<(Group, Page<PostRecord>)> {
        let listing = self
            .list_page(&PostFilter::ByGroup(slug.to_string()), raw_page)
            .await?;
        match listing.group {
            Some(group) => Ok((group, listing.page)),
            None => Err(AppError::Internal("group listing lost its group".into())),
        }
    }

    /// Profile listing: resolved author plus one page of their posts.
    pub async fn profile_page(
        &self,
        username: &str,
        raw_page: Option<&str>,
    ) -> Result<(User, Page<PostRecord>)> {
        let listing = self
            .list_page(&PostFilter::ByAuthor(username.to_string()), raw_page)
            .await?;
        match listing.author {
            Some(author) => Ok((author, listing.page)),
            None => Err(AppError::Internal("profile listing lost its author".into())),
        }
    }

    pub async fn get_post(&self, id: i64) -> Result<PostRecord> {
        self.store
            .find_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {id}")))
    }

    /// Groups offered as choices on the post form.
    pub async fn group_choices(&self) -> Result<Vec<Group>> {
        self.store.list_groups().await
    }

    pub async fn create_post(
        &self,
        author_id: i64,
        text: &str,
        group_id: Option<i64>,
    ) -> Result<Post> {
        self.check_group_choice(group_id).await?;
        self.store
            .create_post(NewPost {
                text,
                author_id,
                group_id,
            })
            .await
    }

    /// Update text and group of a post. Only the author may edit.
    pub async fn update_post(
        &self,
        post_id: i64,
        editor_id: i64,
        text: &str,
        group_id: Option<i64>,
    ) -> Result<()> {
        let post = self.get_post(post_id).await?;
        permissions::check_post_ownership(editor_id, &post)?;
        self.check_group_choice(group_id).await?;
        self.store
            .update_post(post_id, PostUpdate { text, group_id })
            .await
    }

    async fn check_group_choice(&self, group_id: Option<i64>) -> Result<()> {
        if let Some(id) = group_id {
            self.store
                .find_group(id)
                .await?
                .ok_or_else(|| AppError::Validation("selected group does not exist".into()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemStore;
    use crate::models::{NewGroup, NewUser};

    async fn store_with_posts(count: usize) -> (Arc<MemStore>, User, Group) {
        let store = Arc::new(MemStore::new());
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
                description: "desc",
            })
            .await
            .unwrap();
        for i in 0..count {
            store
                .create_post(NewPost {
                    text: &format!("post {i}"),
                    author_id: user.id,
                    group_id: Some(group.id),
                })
                .await
                .unwrap();
        }
        (store, user, group)
    }

    #[tokio::test]
    async fn thirteen_posts_paginate_ten_then_three() {
        let (store, _, _) = store_with_posts(13).await;
        let service = PostService::new(store);

        for filter in [
            PostFilter::All,
            PostFilter::ByGroup("test-slug".into()),
            PostFilter::ByAuthor("auth".into()),
        ] {
            let first = service.list_page(&filter, None).await.unwrap();
            assert_eq!(first.page.items.len(), 10, "{filter:?}");
            assert_eq!(first.page.num_pages, 2);
            assert!(first.page.has_next());

            let second = service.list_page(&filter, Some("2")).await.unwrap();
            assert_eq!(second.page.items.len(), 3, "{filter:?}");
            assert!(!second.page.has_next());
        }
    }

    #[tokio::test]
    async fn page_past_the_end_returns_the_last_remainder() {
        let (store, _, _) = store_with_posts(13).await;
        let service = PostService::new(store);

        let listing = service.list_page(&PostFilter::All, Some("9")).await.unwrap();
        assert_eq!(listing.page.number, 2);
        assert_eq!(listing.page.items.len(), 3);
    }

    #[tokio::test]
    async fn unknown_slug_and_username_are_not_found() {
        let (store, _, _) = store_with_posts(1).await;
        let service = PostService::new(store);

        let err = service
            .list_page(&PostFilter::ByGroup("nope".into()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service
            .list_page(&PostFilter::ByAuthor("nobody".into()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn non_author_cannot_update() {
        let (store, user, group) = store_with_posts(1).await;
        let intruder = store
            .create_user(NewUser {
                username: "HasNoName",
                password_hash: "x",
            })
            .await
            .unwrap();
        let service = PostService::new(store);

        let err = service
            .update_post(1, intruder.id, "hijacked", Some(group.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        service
            .update_post(1, user.id, "edited", None)
            .await
            .unwrap();
        let post = service.get_post(1).await.unwrap();
        assert_eq!(post.text, "edited");
        assert_eq!(post.group_id, None);
    }

    #[tokio::test]
    async fn unknown_group_choice_is_a_validation_error() {
        let (store, user, _) = store_with_posts(0).await;
        let service = PostService::new(store);

        let err = service
            .create_post(user.id, "hello", Some(999))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
