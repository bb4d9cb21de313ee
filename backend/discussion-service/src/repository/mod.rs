//! Storage contracts for posts and the comment tree.
//!
//! Services are written against `PostStore` and `CommentStore` only. Two
//! interchangeable backends implement them: `memory` (process-local, lock per
//! store) and `postgres` (sqlx).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::models::{Comment, CommentPage, Post, SortOrder};

pub use memory::{MemoryCommentStore, MemoryPostStore};
pub use postgres::{PgCommentStore, PgPostStore};

/// Post storage interface
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a new post; `AlreadyExists` on identifier collision
    async fn create(&self, post: &Post) -> Result<()>;

    /// Look up a post; `NotFound` if absent
    async fn get_by_id(&self, id: &str) -> Result<Post>;

    /// Page through posts by creation sequence, resuming after `after`
    async fn list(&self, limit: i64, after: Option<&str>, sort_order: SortOrder)
        -> Result<Vec<Post>>;
}

/// Comment tree storage interface
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Validate structural invariants and append the comment to its level
    async fn create(&self, comment: &Comment) -> Result<()>;

    /// Page through one level: root comments of `post_id`, or replies to `parent_id`
    async fn list_by_level(
        &self,
        post_id: &str,
        parent_id: Option<&str>,
        limit: i64,
        after: Option<&str>,
        sort_order: SortOrder,
    ) -> Result<CommentPage>;

    /// Number of comments in one level
    async fn count(&self, post_id: &str, parent_id: Option<&str>) -> Result<i64>;

    /// Direct reply count for every comment of a post
    async fn count_replies_by_parent(&self, post_id: &str) -> Result<HashMap<String, i64>>;
}
