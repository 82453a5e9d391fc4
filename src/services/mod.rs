//! Business logic layer.
//!
//! - `pagination`: fixed-size page math shared by every listing
//! - `posts`: listing, creation, and editing of posts
//! - `auth`: password hashing and session tokens

pub mod auth;
pub mod pagination;
pub mod posts;

pub use pagination::{Page, Paginator, PAGE_SIZE};
pub use posts::{PostFilter, PostService};
