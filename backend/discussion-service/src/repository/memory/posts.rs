use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{ContentError, Result};
use crate::models::{Post, SortOrder};
use crate::repository::PostStore;

#[derive(Default)]
struct PostTable {
    /// Append-only, in creation order
    posts: Vec<Post>,
    /// Post id -> position in `posts`
    positions: HashMap<String, usize>,
}

/// In-memory post store
#[derive(Default)]
pub struct MemoryPostStore {
    inner: RwLock<PostTable>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create(&self, post: &Post) -> Result<()> {
        let mut table = self.inner.write().await;

        if table.positions.contains_key(&post.id) {
            return Err(ContentError::AlreadyExists);
        }

        let position = table.posts.len();
        table.positions.insert(post.id.clone(), position);
        table.posts.push(post.clone());

        tracing::debug!(post_id = %post.id, position, "post stored");
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Post> {
        let table = self.inner.read().await;
        table
            .positions
            .get(id)
            .map(|&idx| table.posts[idx].clone())
            .ok_or(ContentError::NotFound)
    }

    async fn list(
        &self,
        limit: i64,
        after: Option<&str>,
        sort_order: SortOrder,
    ) -> Result<Vec<Post>> {
        let table = self.inner.read().await;

        let cursor = match after {
            Some(id) => Some(
                *table
                    .positions
                    .get(id)
                    .ok_or(ContentError::InvalidCursor)?,
            ),
            None => None,
        };

        if limit <= 0 {
            return Ok(Vec::new());
        }
        let limit = limit as usize;

        let posts = match sort_order {
            SortOrder::Asc => {
                let start = cursor.map_or(0, |idx| idx + 1);
                table.posts.iter().skip(start).take(limit).cloned().collect()
            }
            SortOrder::Desc => {
                // Everything strictly before the cursor, newest first.
                let end = cursor.unwrap_or(table.posts.len());
                table.posts[..end].iter().rev().take(limit).cloned().collect()
            }
        };

        Ok(posts)
    }
}
