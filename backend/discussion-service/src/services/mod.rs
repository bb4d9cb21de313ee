/// Business logic layer for discussion-service
///
/// This module provides high-level operations:
/// - Post service: post creation, lookup, listing with sort-order validation
/// - Comment service: comment creation and level reads over the comment tree
/// - Id generation: identifiers and timestamps for new records
///
/// Services hold stores as trait objects and never depend on a concrete backend.
pub mod comments;
pub mod ids;
pub mod posts;

// Re-export commonly used services
pub use comments::CommentService;
pub use ids::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use posts::PostService;
