//! Comment tree queries and mutations

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Object, Result as GraphQLResult, SimpleObject};
use chrono::{DateTime, Utc};

use crate::models::{self, SortOrder};
use crate::schema::pagination::{PageInfo, PageSizeLimits};
use crate::schema::posts::Post;
use crate::services::{CommentService, PostService};

#[derive(SimpleObject, Clone, Debug)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub parent_id: Option<String>,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    /// Number of direct replies
    pub replies_count: i64,
}

impl Comment {
    fn with_replies(comment: models::Comment, replies: &HashMap<String, i64>) -> Self {
        let replies_count = replies.get(&comment.id).copied().unwrap_or(0);
        Comment {
            replies_count,
            ..Comment::from(comment)
        }
    }
}

impl From<models::Comment> for Comment {
    fn from(comment: models::Comment) -> Self {
        Comment {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            text: comment.text,
            author: comment.author,
            created_at: comment.created_at,
            replies_count: 0,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct CommentEdge {
    pub node: Comment,
    /// Id of the node; pass as `after` to resume behind it
    pub cursor: String,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct CommentConnection {
    pub edges: Vec<CommentEdge>,
    pub page_info: PageInfo,
    /// Size of the whole level, not of this page
    pub total_count: i64,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct PostWithComments {
    pub post: Post,
    /// One page of root comments, oldest first
    pub comments: Vec<Comment>,
    pub total_comments: i64,
}

#[derive(Default)]
pub struct CommentQuery;

#[Object]
impl CommentQuery {
    /// One page of a comment level: root comments when `parentId` is absent,
    /// otherwise the direct replies to `parentId`
    async fn comments(
        &self,
        ctx: &Context<'_>,
        post_id: String,
        parent_id: Option<String>,
        after: Option<String>,
        first: Option<i32>,
        #[graphql(default_with = "SortOrder::Asc")] sort_order: SortOrder,
    ) -> GraphQLResult<CommentConnection> {
        let service = ctx.data::<Arc<CommentService>>()?;
        let limit = ctx.data::<PageSizeLimits>()?.resolve(first);
        let parent_id = parent_id.as_deref();

        let page = service
            .get_comments(&post_id, parent_id, limit, after.as_deref(), sort_order)
            .await
            .map_err(|e| e.extend())?;
        let total_count = service
            .get_comments_count(&post_id, parent_id)
            .await
            .map_err(|e| e.extend())?;
        let replies = service
            .get_replies_counts(&post_id)
            .await
            .map_err(|e| e.extend())?;

        let page_info = PageInfo::new(
            page.has_more,
            after.as_deref(),
            page.end_cursor().map(str::to_string),
        );
        let edges = page
            .comments
            .into_iter()
            .map(|comment| CommentEdge {
                cursor: comment.id.clone(),
                node: Comment::with_replies(comment, &replies),
            })
            .collect();

        Ok(CommentConnection {
            edges,
            page_info,
            total_count,
        })
    }

    async fn comments_count(
        &self,
        ctx: &Context<'_>,
        post_id: String,
        parent_id: Option<String>,
    ) -> GraphQLResult<i64> {
        let service = ctx.data::<Arc<CommentService>>()?;
        service
            .get_comments_count(&post_id, parent_id.as_deref())
            .await
            .map_err(|e| e.extend())
    }

    async fn post_with_comments(
        &self,
        ctx: &Context<'_>,
        post_id: String,
        after: Option<String>,
        first: Option<i32>,
    ) -> GraphQLResult<PostWithComments> {
        let posts = ctx.data::<Arc<PostService>>()?;
        let comments = ctx.data::<Arc<CommentService>>()?;
        let limit = ctx.data::<PageSizeLimits>()?.resolve(first);

        let post = posts.get_post(&post_id).await.map_err(|e| e.extend())?;
        let page = comments
            .get_comments(&post_id, None, limit, after.as_deref(), SortOrder::Asc)
            .await
            .map_err(|e| e.extend())?;
        let replies = comments
            .get_replies_counts(&post_id)
            .await
            .map_err(|e| e.extend())?;
        let total_comments = comments
            .get_comments_count(&post_id, None)
            .await
            .map_err(|e| e.extend())?;

        Ok(PostWithComments {
            post: post.into(),
            comments: page
                .comments
                .into_iter()
                .map(|c| Comment::with_replies(c, &replies))
                .collect(),
            total_comments,
        })
    }
}

#[derive(Default)]
pub struct CommentMutation;

#[Object]
impl CommentMutation {
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        post_id: String,
        parent_id: Option<String>,
        text: String,
        author: String,
    ) -> GraphQLResult<Comment> {
        let service = ctx.data::<Arc<CommentService>>()?;
        let comment = service
            .add_comment(&post_id, &author, &text, parent_id.as_deref())
            .await
            .map_err(|e| e.extend())?;
        Ok(comment.into())
    }
}
