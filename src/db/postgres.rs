//! PostgreSQL storage backend.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{Group, NewGroup, NewPost, NewUser, Post, PostRecord, PostUpdate, User};

/// Columns selected for listing/detail rows. Author is always joined; the
/// group join is left outer because a post may not belong to one.
const POST_RECORD_COLUMNS: &str = r#"
    p.id, p.text, p.author_id, u.username AS author_username,
    p.group_id, g.title AS group_title, g.slug AS group_slug, p.created_at
"#;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_unique(err: sqlx::Error, what: &str) -> AppError {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("{what} already exists"))
            }
            _ => AppError::from(err),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new: NewUser<'_>) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, joined_at
            "#,
        )
        .bind(new.username)
        .bind(new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_unique(e, "username"))?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, joined_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_group(&self, new: NewGroup<'_>) -> Result<Group> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (title, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, slug, description
            "#,
        )
        .bind(new.title)
        .bind(new.slug)
        .bind(new.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_unique(e, "group slug"))?;

        Ok(group)
    }

    async fn find_group(&self, id: i64) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    async fn create_post(&self, new: NewPost<'_>) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (text, author_id, group_id)
            VALUES ($1, $2, $3)
            RETURNING id, text, author_id, group_id, created_at
            "#,
        )
        .bind(new.text)
        .bind(new.author_id)
        .bind(new.group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn update_post(&self, id: i64, update: PostUpdate<'_>) -> Result<()> {
        let result = sqlx::query("UPDATE posts SET text = $1, group_id = $2 WHERE id = $3")
            .bind(update.text)
            .bind(update.group_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("post {id}")));
        }
        Ok(())
    }

    async fn find_post(&self, id: i64) -> Result<Option<PostRecord>> {
        let post = sqlx::query_as::<_, PostRecord>(&format!(
            r#"
            SELECT {POST_RECORD_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN groups g ON g.id = p.group_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list_recent_posts(&self, limit: i64, offset: i64) -> Result<Vec<PostRecord>> {
        let posts = sqlx::query_as::<_, PostRecord>(&format!(
            r#"
            SELECT {POST_RECORD_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN groups g ON g.id = p.group_id
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn list_posts_by_group(
        &self,
        group_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRecord>> {
        let posts = sqlx::query_as::<_, PostRecord>(&format!(
            r#"
            SELECT {POST_RECORD_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN groups g ON g.id = p.group_id
            WHERE p.group_id = $1
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn list_posts_by_author(
        &self,
        author_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRecord>> {
        let posts = sqlx::query_as::<_, PostRecord>(&format!(
            r#"
            SELECT {POST_RECORD_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN groups g ON g.id = p.group_id
            WHERE p.author_id = $1
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn count_posts(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    async fn count_posts_by_group(&self, group_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    async fn count_posts_by_author(&self, author_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }
}
