/// Post service - handles post creation, retrieval, and listing
use crate::error::Result;
use crate::metrics::{record_error, POSTS_CREATED_TOTAL};
use crate::models::{Post, SortOrder};
use crate::repository::PostStore;
use crate::services::ids::{IdGenerator, UuidGenerator};
use std::sync::Arc;

pub struct PostService {
    store: Arc<dyn PostStore>,
    ids: Arc<dyn IdGenerator>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self::with_id_generator(store, Arc::new(UuidGenerator::new()))
    }

    pub fn with_id_generator(store: Arc<dyn PostStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Create a new post
    #[tracing::instrument(skip(self, title, content))]
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        author: &str,
        allow_comments: bool,
    ) -> Result<Post> {
        let post = Post {
            id: self.ids.next_id(),
            title: title.to_string(),
            content: content.to_string(),
            author: author.to_string(),
            allow_comments,
            created_at: self.ids.now(),
        };

        self.store
            .create(&post)
            .await
            .map_err(|e| record_error("create_post", e))?;

        POSTS_CREATED_TOTAL.inc();
        tracing::info!(post_id = %post.id, "post created");
        Ok(post)
    }

    /// Get a post by ID
    pub async fn get_post(&self, id: &str) -> Result<Post> {
        self.store.get_by_id(id).await
    }

    /// List posts; `sort_order` must be `ASC` or `DESC`
    pub async fn get_posts(
        &self,
        limit: i64,
        after: Option<&str>,
        sort_order: &str,
    ) -> Result<Vec<Post>> {
        let order: SortOrder = sort_order
            .parse()
            .map_err(|e| record_error("get_posts", e))?;

        self.store
            .list(limit, after, order)
            .await
            .map_err(|e| record_error("get_posts", e))
    }
}
