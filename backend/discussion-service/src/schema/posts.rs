//! Post queries and mutations

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Object, Result as GraphQLResult, SimpleObject};
use chrono::{DateTime, Utc};

use crate::models::{self, SortOrder};
use crate::schema::pagination::PageSizeLimits;
use crate::services::PostService;

#[derive(SimpleObject, Clone, Debug)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub allow_comments: bool,
    pub created_at: DateTime<Utc>,
}

impl From<models::Post> for Post {
    fn from(post: models::Post) -> Self {
        Post {
            id: post.id,
            title: post.title,
            content: post.content,
            author: post.author,
            allow_comments: post.allow_comments,
            created_at: post.created_at,
        }
    }
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// Posts in insertion order, newest first unless `sortOrder` says otherwise
    async fn posts(
        &self,
        ctx: &Context<'_>,
        after: Option<String>,
        first: Option<i32>,
        #[graphql(default)] sort_order: SortOrder,
    ) -> GraphQLResult<Vec<Post>> {
        let service = ctx.data::<Arc<PostService>>()?;
        let limit = ctx.data::<PageSizeLimits>()?.resolve(first);

        let posts = service
            .get_posts(limit, after.as_deref(), sort_order.as_str())
            .await
            .map_err(|e| e.extend())?;

        Ok(posts.into_iter().map(Post::from).collect())
    }

    async fn post(&self, ctx: &Context<'_>, id: String) -> GraphQLResult<Post> {
        let service = ctx.data::<Arc<PostService>>()?;
        let post = service.get_post(&id).await.map_err(|e| e.extend())?;
        Ok(post.into())
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        title: String,
        content: String,
        author: String,
        allow_comments: bool,
    ) -> GraphQLResult<Post> {
        let service = ctx.data::<Arc<PostService>>()?;
        let post = service
            .create_post(&title, &content, &author, allow_comments)
            .await
            .map_err(|e| e.extend())?;
        Ok(post.into())
    }
}
