/// Discussion Service Library
///
/// Posts with threaded comments. Comments form a tree per post: root comments
/// hang off the post and replies hang off a parent comment. Every level keeps
/// insertion order and is paginated independently by cursor.
///
/// # Modules
///
/// - `models`: Posts, comments, level keys, and pagination types
/// - `repository`: Store traits with in-memory and PostgreSQL implementations
/// - `services`: Business logic layer
/// - `schema`: GraphQL queries and mutations
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod repository;
pub mod schema;
pub mod services;

pub use config::Config;
pub use error::{ContentError, Result};
