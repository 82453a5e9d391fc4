//! Yatube, a small server-rendered blog.
//!
//! Users author text posts, optionally filed under a group, and browse
//! paginated listings by index, group, or author profile.
//!
//! # Modules
//!
//! - `handlers`: HTTP request handlers and routing
//! - `services`: business logic (listings/pagination, posts, auth)
//! - `db`: the `Store` port with PostgreSQL and in-memory backends
//! - `models`: data structures for users, groups, posts
//! - `middleware`: session extractors and ownership checks
//! - `forms`: form payloads and validation
//! - `templates`: typed askama templates
//! - `error`: error types and HTTP mapping
//! - `config`: configuration management

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod templates;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, Result};

use crate::db::Store;
use crate::services::auth::SessionKeys;

/// State shared across all workers.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionKeys,
}
