//! PostgreSQL-backed stores.
//!
//! Identifiers are stored as `TEXT`, so any string is a well-formed id and an
//! unknown one is simply `NotFound`. Insertion order is the `seq` identity column.

mod comments;
mod posts;

use sqlx::migrate::Migrator;

use crate::error::ContentError;

pub use comments::PgCommentStore;
pub use posts::PgPostStore;

/// Transaction-scoped advisory lock key held while inserting a post, so posts
/// commit in `seq` order.
pub const POST_INSERT_LOCK_KEY: i64 = 0x706f_7374_7365_71;

/// Schema migrations for the posts and comments tables
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Map an INSERT failure, surfacing primary-key collisions as `AlreadyExists`.
pub(crate) fn map_insert_error(err: sqlx::Error) -> ContentError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ContentError::AlreadyExists
        }
        _ => ContentError::Database(err),
    }
}
