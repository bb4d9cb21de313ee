/// Error types for Discussion Service
///
/// Every failure a store or service can report is one variant of `ContentError`.
/// The transport layer maps variants to client-facing codes via `ContentError::code`.
use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::models::MAX_COMMENT_LENGTH;

/// Result type for discussion-service operations
pub type Result<T> = std::result::Result<T, ContentError>;

#[derive(Error, Debug)]
pub enum ContentError {
    /// Post (or other addressed record) does not exist
    #[error("not found")]
    NotFound,

    /// Pagination cursor does not resolve inside the requested sequence
    #[error("invalid cursor")]
    InvalidCursor,

    #[error("comments are disabled for this post")]
    CommentsDisabled,

    #[error("comment text exceeds the {} character limit", MAX_COMMENT_LENGTH)]
    TextTooLong,

    #[error("parent comment not found")]
    ParentNotFound,

    #[error("parent comment belongs to different post")]
    WrongParentPost,

    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),

    /// Identifier collision on insert
    #[error("already exists")]
    AlreadyExists,

    /// Persistent backend failed; never produced by the in-memory stores
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ContentError {
    /// Stable machine-readable code for transport error mapping and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            ContentError::NotFound => "NOT_FOUND",
            ContentError::InvalidCursor => "INVALID_CURSOR",
            ContentError::CommentsDisabled => "COMMENTS_DISABLED",
            ContentError::TextTooLong => "TEXT_TOO_LONG",
            ContentError::ParentNotFound => "PARENT_NOT_FOUND",
            ContentError::WrongParentPost => "WRONG_PARENT_POST",
            ContentError::InvalidSortOrder(_) => "INVALID_SORT_ORDER",
            ContentError::AlreadyExists => "ALREADY_EXISTS",
            ContentError::Database(_) => "INTERNAL",
        }
    }
}

impl ErrorExtensions for ContentError {
    fn extend(&self) -> async_graphql::Error {
        // Backend details stay in the logs.
        let message = match self {
            ContentError::Database(e) => {
                tracing::error!(error = %e, "database operation failed");
                "internal storage error".to_string()
            }
            other => other.to_string(),
        };

        async_graphql::Error::new(message).extend_with(|_, ext| ext.set("code", self.code()))
    }
}
