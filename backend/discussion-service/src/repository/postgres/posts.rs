use async_trait::async_trait;
use sqlx::PgPool;

use super::{map_insert_error, POST_INSERT_LOCK_KEY};
use crate::error::{ContentError, Result};
use crate::models::{Post, SortOrder};
use crate::repository::PostStore;

/// Repository for Post operations
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, post: &Post) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(POST_INSERT_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, author, allow_comments, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.author)
        .bind(post.allow_comments)
        .bind(post.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await?;

        tracing::debug!(post_id = %post.id, "post stored");
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, author, allow_comments, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ContentError::NotFound)
    }

    async fn list(
        &self,
        limit: i64,
        after: Option<&str>,
        sort_order: SortOrder,
    ) -> Result<Vec<Post>> {
        let cursor_seq: Option<i64> = match after {
            Some(id) => Some(
                sqlx::query_scalar("SELECT seq FROM posts WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .ok_or(ContentError::InvalidCursor)?,
            ),
            None => None,
        };

        if limit <= 0 {
            return Ok(Vec::new());
        }

        let query = match sort_order {
            SortOrder::Asc => {
                r#"
                SELECT id, title, content, author, allow_comments, created_at
                FROM posts
                WHERE ($1::BIGINT IS NULL OR seq > $1)
                ORDER BY seq ASC
                LIMIT $2
                "#
            }
            SortOrder::Desc => {
                r#"
                SELECT id, title, content, author, allow_comments, created_at
                FROM posts
                WHERE ($1::BIGINT IS NULL OR seq < $1)
                ORDER BY seq DESC
                LIMIT $2
                "#
            }
        };

        let posts = sqlx::query_as::<_, Post>(query)
            .bind(cursor_seq)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }
}
