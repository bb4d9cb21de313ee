/// Comment service - handles comment creation and level reads
use crate::error::{ContentError, Result};
use crate::metrics::{record_error, COMMENTS_CREATED_TOTAL};
use crate::models::{Comment, CommentPage, SortOrder, MAX_COMMENT_LENGTH};
use crate::repository::CommentStore;
use crate::services::ids::{IdGenerator, UuidGenerator};
use std::collections::HashMap;
use std::sync::Arc;

pub struct CommentService {
    store: Arc<dyn CommentStore>,
    ids: Arc<dyn IdGenerator>,
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self::with_id_generator(store, Arc::new(UuidGenerator::new()))
    }

    pub fn with_id_generator(store: Arc<dyn CommentStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Create a root comment (`parent_id = None`) or a reply.
    ///
    /// Over-long text is rejected here without a store round-trip; every other
    /// failure comes from the store unchanged.
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn add_comment(
        &self,
        post_id: &str,
        author: &str,
        text: &str,
        parent_id: Option<&str>,
    ) -> Result<Comment> {
        if text.chars().count() > MAX_COMMENT_LENGTH {
            return Err(record_error("add_comment", ContentError::TextTooLong));
        }

        let comment = Comment {
            id: self.ids.next_id(),
            post_id: post_id.to_string(),
            parent_id: parent_id.map(str::to_string),
            author: author.to_string(),
            text: text.to_string(),
            created_at: self.ids.now(),
        };

        if let Err(err) = self.store.create(&comment).await {
            tracing::warn!(error = %err, code = err.code(), "comment rejected");
            return Err(record_error("add_comment", err));
        }

        let kind = if comment.is_reply() { "reply" } else { "root" };
        COMMENTS_CREATED_TOTAL.with_label_values(&[kind]).inc();
        tracing::info!(comment_id = %comment.id, kind, "comment created");
        Ok(comment)
    }

    /// One page of a comment level
    pub async fn get_comments(
        &self,
        post_id: &str,
        parent_id: Option<&str>,
        limit: i64,
        after: Option<&str>,
        sort_order: SortOrder,
    ) -> Result<CommentPage> {
        self.store
            .list_by_level(post_id, parent_id, limit, after, sort_order)
            .await
    }

    /// Number of comments in a level
    pub async fn get_comments_count(&self, post_id: &str, parent_id: Option<&str>) -> Result<i64> {
        self.store.count(post_id, parent_id).await
    }

    /// Direct reply counts for every comment of a post
    pub async fn get_replies_counts(&self, post_id: &str) -> Result<HashMap<String, i64>> {
        self.store.count_replies_by_parent(post_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MemoryCommentStore, MemoryPostStore, PostStore};
    use crate::services::ids::SequentialIdGenerator;
    use crate::services::PostService;

    struct Fixture {
        posts: PostService,
        comments: CommentService,
    }

    fn fixture() -> Fixture {
        let post_store: Arc<dyn PostStore> = Arc::new(MemoryPostStore::new());
        let comment_store = Arc::new(MemoryCommentStore::new(Arc::clone(&post_store)));
        Fixture {
            posts: PostService::with_id_generator(
                post_store,
                Arc::new(SequentialIdGenerator::new("post")),
            ),
            comments: CommentService::with_id_generator(
                comment_store,
                Arc::new(SequentialIdGenerator::new("comment")),
            ),
        }
    }

    #[tokio::test]
    async fn test_add_comment_success() {
        let fx = fixture();
        let post = fx.posts.create_post("Test Post", "Body", "Tester", true).await.unwrap();

        let comment = fx
            .comments
            .add_comment(&post.id, "Author", "This is a comment", None)
            .await
            .unwrap();

        assert_eq!(comment.id, "comment-1");
        assert_eq!(comment.author, "Author");
        assert_eq!(comment.text, "This is a comment");
        assert_eq!(comment.parent_id, None);
    }

    #[tokio::test]
    async fn test_add_comment_too_long_fails_fast() {
        let fx = fixture();
        // No such post: the length check must win before the store is consulted.
        let long_text = "a".repeat(MAX_COMMENT_LENGTH + 1);
        let result = fx.comments.add_comment("post1", "Bob", &long_text, None).await;
        assert!(matches!(result, Err(ContentError::TextTooLong)));
    }

    #[tokio::test]
    async fn test_add_comment_exact_limit() {
        let fx = fixture();
        let post = fx.posts.create_post("t", "c", "a", true).await.unwrap();
        let text = "a".repeat(MAX_COMMENT_LENGTH);
        assert!(fx.comments.add_comment(&post.id, "Bob", &text, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_comment_disabled() {
        let fx = fixture();
        let post = fx.posts.create_post("t", "c", "a", false).await.unwrap();

        let result = fx.comments.add_comment(&post.id, "Bob", "hi", None).await;
        assert!(matches!(result, Err(ContentError::CommentsDisabled)));
    }

    #[tokio::test]
    async fn test_store_errors_pass_through() {
        let fx = fixture();
        let p1 = fx.posts.create_post("t", "c", "a", true).await.unwrap();
        let p2 = fx.posts.create_post("t", "c", "a", true).await.unwrap();
        let root = fx.comments.add_comment(&p1.id, "a", "root", None).await.unwrap();

        assert!(matches!(
            fx.comments.add_comment("ghost", "a", "x", None).await,
            Err(ContentError::NotFound)
        ));
        assert!(matches!(
            fx.comments.add_comment(&p1.id, "a", "x", Some("ghost")).await,
            Err(ContentError::ParentNotFound)
        ));
        assert!(matches!(
            fx.comments.add_comment(&p2.id, "a", "x", Some(&root.id)).await,
            Err(ContentError::WrongParentPost)
        ));
    }

    #[tokio::test]
    async fn test_get_comments_and_counts() {
        let fx = fixture();
        let post = fx.posts.create_post("t", "c", "a", true).await.unwrap();

        let c1 = fx.comments.add_comment(&post.id, "user1", "comment 1", None).await.unwrap();
        fx.comments.add_comment(&post.id, "user2", "comment 2", None).await.unwrap();
        fx.comments
            .add_comment(&post.id, "user3", "reply", Some(&c1.id))
            .await
            .unwrap();

        let page = fx
            .comments
            .get_comments(&post.id, None, 10, None, SortOrder::Asc)
            .await
            .unwrap();
        assert_eq!(page.comments.len(), 2);
        assert!(!page.has_more);

        assert_eq!(fx.comments.get_comments_count(&post.id, None).await.unwrap(), 2);
        assert_eq!(
            fx.comments.get_comments_count(&post.id, Some(&c1.id)).await.unwrap(),
            1
        );

        let replies = fx.comments.get_replies_counts(&post.id).await.unwrap();
        assert_eq!(replies.get(&c1.id), Some(&1));
    }
}
