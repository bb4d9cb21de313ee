use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

use super::map_insert_error;
use crate::error::{ContentError, Result};
use crate::models::{Comment, CommentPage, SortOrder, MAX_COMMENT_LENGTH};
use crate::repository::CommentStore;

/// Rows of one level: `$1` is the post id, `$2` the parent id (NULL for roots).
const LEVEL_FILTER: &str =
    "post_id = $1 AND (($2::TEXT IS NULL AND parent_id IS NULL) OR parent_id = $2)";

const COMMENT_COLUMNS: &str = "id, post_id, parent_id, author, text, created_at";

/// Repository for Comment operations
#[derive(Clone)]
pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn level_exists(&self, post_id: &str, parent_id: Option<&str>) -> Result<bool> {
        let query = format!("SELECT EXISTS (SELECT 1 FROM comments WHERE {})", LEVEL_FILTER);
        let exists: bool = sqlx::query_scalar(&query)
            .bind(post_id)
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn create(&self, comment: &Comment) -> Result<()> {
        if comment.text.chars().count() > MAX_COMMENT_LENGTH {
            return Err(ContentError::TextTooLong);
        }

        let mut tx = self.pool.begin().await?;

        // The row lock serializes creates per post until commit, so every level
        // of the post becomes visible in `seq` order.
        let allow_comments: bool =
            sqlx::query_scalar("SELECT allow_comments FROM posts WHERE id = $1 FOR UPDATE")
                .bind(&comment.post_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(ContentError::NotFound)?;
        if !allow_comments {
            return Err(ContentError::CommentsDisabled);
        }

        if let Some(parent_id) = comment.parent_id.as_deref() {
            let parent_post: String =
                sqlx::query_scalar("SELECT post_id FROM comments WHERE id = $1")
                    .bind(parent_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(ContentError::ParentNotFound)?;
            if parent_post != comment.post_id {
                return Err(ContentError::WrongParentPost);
            }
        }

        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, parent_id, author, text, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&comment.id)
        .bind(&comment.post_id)
        .bind(comment.parent_id.as_deref())
        .bind(&comment.author)
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await?;

        tracing::debug!(comment_id = %comment.id, post_id = %comment.post_id, "comment stored");
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

        let cursor_seq: Option<i64> = match after {
            Some(cursor) => {
                let query = format!(
                    "SELECT seq FROM comments WHERE {} AND id = $3",
                    LEVEL_FILTER
                );
                let seq: Option<i64> = sqlx::query_scalar(&query)
                    .bind(post_id)
                    .bind(parent_id)
                    .bind(cursor)
                    .fetch_optional(&self.pool)
                    .await?;

                match seq {
                    Some(seq) => Some(seq),
                    // An empty level reads as empty whatever the cursor says.
                    None if !self.level_exists(post_id, parent_id).await? => {
                        return Ok(CommentPage::empty())
                    }
                    None => return Err(ContentError::InvalidCursor),
                }
            }
            None => None,
        };

        let (comparison, direction) = match sort_order {
            SortOrder::Asc => (">", "ASC"),
            SortOrder::Desc => ("<", "DESC"),
        };
        let query = format!(
            r#"
            SELECT {columns}
            FROM comments
            WHERE {level} AND ($3::BIGINT IS NULL OR seq {comparison} $3)
            ORDER BY seq {direction}
            LIMIT $4
            "#,
            columns = COMMENT_COLUMNS,
            level = LEVEL_FILTER,
            comparison = comparison,
            direction = direction,
        );

        // One extra row tells whether anything remains past the page.
        let mut comments = sqlx::query_as::<_, Comment>(&query)
            .bind(post_id)
            .bind(parent_id)
            .bind(cursor_seq)
            .bind(limit.saturating_add(1))
            .fetch_all(&self.pool)
            .await?;

        let has_more = comments.len() as i64 > limit;
        comments.truncate(limit as usize);

        Ok(CommentPage { comments, has_more })
    }

    async fn count(&self, post_id: &str, parent_id: Option<&str>) -> Result<i64> {
        if let Some(parent_id) = parent_id {
            let parent_exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM comments WHERE id = $1)")
                    .bind(parent_id)
                    .fetch_one(&self.pool)
                    .await?;
            if !parent_exists {
                return Err(ContentError::ParentNotFound);
            }
        }

        let query = format!("SELECT COUNT(*) FROM comments WHERE {}", LEVEL_FILTER);
        let count: i64 = sqlx::query_scalar(&query)
            .bind(post_id)
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_replies_by_parent(&self, post_id: &str) -> Result<HashMap<String, i64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT c.id, COUNT(r.id) AS replies
            FROM comments c
            LEFT JOIN comments r ON r.parent_id = c.id
            WHERE c.post_id = $1
            GROUP BY c.id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
