//! GraphQL schema for posts and threaded comments

pub mod comments;
pub mod pagination;
pub mod posts;

use std::sync::Arc;

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::services::{CommentService, PostService};

pub use pagination::PageSizeLimits;

/// Root query object
#[derive(MergedObject, Default)]
pub struct QueryRoot(posts::PostQuery, comments::CommentQuery);

/// Root mutation object
#[derive(MergedObject, Default)]
pub struct MutationRoot(posts::PostMutation, comments::CommentMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with services and page size limits attached as context data
pub fn build_schema(
    posts: Arc<PostService>,
    comments: Arc<CommentService>,
    limits: PageSizeLimits,
) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(posts)
    .data(comments)
    .data(limits)
    .finish()
}
