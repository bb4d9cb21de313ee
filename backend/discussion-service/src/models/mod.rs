/// Data models for discussion-service
///
/// This module defines structures for:
/// - Post: a titled entry that may accept comments
/// - Comment: a root comment or a reply attached to a post
/// - LevelKey: the sibling group a comment is stored in
/// - SortOrder / CommentPage: read-side pagination types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ContentError;

/// Maximum comment text length, in characters.
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub allow_comments: bool,
    pub created_at: DateTime<Utc>,
}

/// Comment entity - a root comment when `parent_id` is `None`, otherwise a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub parent_id: Option<String>,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn level_key(&self) -> LevelKey {
        LevelKey::resolve(&self.post_id, self.parent_id.as_deref())
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Identifies one level of the comment tree.
///
/// Root comments of a post share `Root(post_id)`; direct replies to a comment
/// share `Replies(parent_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LevelKey {
    Root(String),
    Replies(String),
}

impl LevelKey {
    pub fn resolve(post_id: &str, parent_id: Option<&str>) -> Self {
        match parent_id {
            Some(parent) => LevelKey::Replies(parent.to_string()),
            None => LevelKey::Root(post_id.to_string()),
        }
    }
}

/// Ordering of paginated reads by insertion sequence
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, async_graphql::Enum,
)]
pub enum SortOrder {
    /// Oldest first
    #[serde(rename = "ASC")]
    Asc,
    /// Newest first
    #[default]
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            other => Err(ContentError::InvalidSortOrder(other.to_string())),
        }
    }
}

/// One page of a comment level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    /// Unread comments remain beyond this page in the requested direction
    pub has_more: bool,
}

impl CommentPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn end_cursor(&self) -> Option<&str> {
        self.comments.last().map(|c| c.id.as_str())
    }
}
