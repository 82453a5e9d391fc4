//! Ownership checks for user-generated content.

use crate::error::AppError;
use crate::models::PostRecord;

pub fn is_author(user_id: i64, post: &PostRecord) -> bool {
    post.author_id == user_id
}

/// Only the author may modify a post.
pub fn check_post_ownership(user_id: i64, post: &PostRecord) -> Result<(), AppError> {
    if is_author(user_id, post) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you can only edit your own posts".into(),
        ))
    }
}
