//! Shared fixtures for discussion-service integration tests
#![allow(dead_code)]

use std::sync::Arc;

use discussion_service::models::{CommentPage, SortOrder};
use discussion_service::repository::{
    CommentStore, MemoryCommentStore, MemoryPostStore, PostStore,
};
use discussion_service::schema::{build_schema, AppSchema, PageSizeLimits};
use discussion_service::services::{CommentService, PostService, SequentialIdGenerator};

/// Services over a fresh pair of stores
pub struct Harness {
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
}

impl Harness {
    /// In-memory stores with predictable `post-N` / `comment-N` ids
    pub fn memory() -> Self {
        let post_store: Arc<dyn PostStore> = Arc::new(MemoryPostStore::new());
        let comment_store: Arc<dyn CommentStore> =
            Arc::new(MemoryCommentStore::new(Arc::clone(&post_store)));
        Self::with_stores(post_store, comment_store)
    }

    pub fn with_stores(
        post_store: Arc<dyn PostStore>,
        comment_store: Arc<dyn CommentStore>,
    ) -> Self {
        Self {
            posts: Arc::new(PostService::with_id_generator(
                post_store,
                Arc::new(SequentialIdGenerator::new("post")),
            )),
            comments: Arc::new(CommentService::with_id_generator(
                comment_store,
                Arc::new(SequentialIdGenerator::new("comment")),
            )),
        }
    }

    pub fn schema(&self, limits: PageSizeLimits) -> AppSchema {
        build_schema(Arc::clone(&self.posts), Arc::clone(&self.comments), limits)
    }

    /// Walk a level page by page, returning ids in visit order
    pub async fn collect_level(
        &self,
        post_id: &str,
        parent_id: Option<&str>,
        page_size: i64,
        sort_order: SortOrder,
    ) -> Vec<String> {
        let mut ids = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let CommentPage { comments, has_more } = self
                .comments
                .get_comments(post_id, parent_id, page_size, after.as_deref(), sort_order)
                .await
                .expect("page read failed");
            after = comments.last().map(|c| c.id.clone());
            ids.extend(comments.into_iter().map(|c| c.id));
            if !has_more {
                return ids;
            }
        }
    }
}
