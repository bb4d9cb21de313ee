use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ContentError, Result};
use crate::models::{Comment, CommentPage, LevelKey, SortOrder, MAX_COMMENT_LENGTH};
use crate::repository::{CommentStore, PostStore};

/// Siblings in insertion order plus an id -> position index.
/// Positions are never renumbered.
#[derive(Default)]
struct CommentLevel {
    comments: Vec<Arc<Comment>>,
    positions: HashMap<String, usize>,
}

impl CommentLevel {
    fn push(&mut self, comment: Arc<Comment>) -> usize {
        let position = self.comments.len();
        self.positions.insert(comment.id.clone(), position);
        self.comments.push(comment);
        position
    }

    fn len(&self) -> usize {
        self.comments.len()
    }

    fn page(&self, cursor: Option<usize>, limit: usize, sort_order: SortOrder) -> CommentPage {
        let total = self.comments.len();
        match sort_order {
            SortOrder::Asc => {
                let start = cursor.map_or(0, |idx| idx + 1);
                let end = start.saturating_add(limit).min(total);
                CommentPage {
                    comments: self.comments[start..end]
                        .iter()
                        .map(|c| Comment::clone(c))
                        .collect(),
                    has_more: end < total,
                }
            }
            SortOrder::Desc => {
                let end = cursor.unwrap_or(total);
                let start = end.saturating_sub(limit);
                CommentPage {
                    comments: self.comments[start..end]
                        .iter()
                        .rev()
                        .map(|c| Comment::clone(c))
                        .collect(),
                    has_more: start > 0,
                }
            }
        }
    }
}

#[derive(Default)]
struct CommentTree {
    /// Every comment, by id
    comments: HashMap<String, Arc<Comment>>,
    /// Created lazily on first insert, never removed
    levels: HashMap<LevelKey, CommentLevel>,
}

impl CommentTree {
    /// The level for `(post_id, parent_id)`, if it exists and belongs to `post_id`.
    fn level(&self, post_id: &str, parent_id: Option<&str>) -> Option<&CommentLevel> {
        if let Some(parent_id) = parent_id {
            let parent = self.comments.get(parent_id)?;
            if parent.post_id != post_id {
                return None;
            }
        }
        self.levels.get(&LevelKey::resolve(post_id, parent_id))
    }
}

/// In-memory comment tree.
///
/// Reads post existence and permission through a shared `PostStore` handle.
pub struct MemoryCommentStore {
    posts: Arc<dyn PostStore>,
    inner: RwLock<CommentTree>,
}

impl MemoryCommentStore {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self {
            posts,
            inner: RwLock::new(CommentTree::default()),
        }
    }
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn create(&self, comment: &Comment) -> Result<()> {
        if comment.text.chars().count() > MAX_COMMENT_LENGTH {
            return Err(ContentError::TextTooLong);
        }

        // Posts are immutable, so this answer stays valid once our own lock is taken.
        let post = self.posts.get_by_id(&comment.post_id).await?;
        if !post.allow_comments {
            return Err(ContentError::CommentsDisabled);
        }

        let mut tree = self.inner.write().await;

        if let Some(parent_id) = comment.parent_id.as_deref() {
            let parent = tree
                .comments
                .get(parent_id)
                .ok_or(ContentError::ParentNotFound)?;
            if parent.post_id != comment.post_id {
                return Err(ContentError::WrongParentPost);
            }
        }

        if tree.comments.contains_key(&comment.id) {
            return Err(ContentError::AlreadyExists);
        }

        let stored = Arc::new(comment.clone());
        let position = tree
            .levels
            .entry(comment.level_key())
            .or_default()
            .push(Arc::clone(&stored));
        tree.comments.insert(comment.id.clone(), stored);

        tracing::debug!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            parent_id = ?comment.parent_id,
            position,
            "comment stored"
        );
        Ok(())
    }

    async fn list_by_level(
        &self,
        post_id: &str,
        parent_id: Option<&str>,
        limit: i64,
        after: Option<&str>,
        sort_order: SortOrder,
    ) -> Result<CommentPage> {
        if limit <= 0 {
            return Ok(CommentPage::empty());
        }

        let tree = self.inner.read().await;
        let Some(level) = tree.level(post_id, parent_id) else {
            return Ok(CommentPage::empty());
        };

        let cursor = match after {
            Some(id) => Some(
                *level
                    .positions
                    .get(id)
                    .ok_or(ContentError::InvalidCursor)?,
            ),
            None => None,
        };

        Ok(level.page(cursor, limit as usize, sort_order))
    }

    async fn count(&self, post_id: &str, parent_id: Option<&str>) -> Result<i64> {
        let tree = self.inner.read().await;

        if let Some(parent_id) = parent_id {
            if !tree.comments.contains_key(parent_id) {
                return Err(ContentError::ParentNotFound);
            }
        }

        Ok(tree
            .level(post_id, parent_id)
            .map_or(0, |level| level.len() as i64))
    }

    async fn count_replies_by_parent(&self, post_id: &str) -> Result<HashMap<String, i64>> {
        let tree = self.inner.read().await;
        let mut counts = HashMap::new();

        // Breadth-first walk from the root level through reply levels.
        let mut pending = VecDeque::from([LevelKey::Root(post_id.to_string())]);
        while let Some(key) = pending.pop_front() {
            let Some(level) = tree.levels.get(&key) else {
                continue;
            };
            for comment in &level.comments {
                let replies = LevelKey::Replies(comment.id.clone());
                let reply_count = tree.levels.get(&replies).map_or(0, CommentLevel::len);
                counts.insert(comment.id.clone(), reply_count as i64);
                if reply_count > 0 {
                    pending.push_back(replies);
                }
            }
        }

        Ok(counts)
    }
}
