//! Process-local stores.
//!
//! Each store instance is guarded by one `RwLock`: reads share it, writes hold
//! it exclusively. Nothing is ever evicted.

mod comments;
mod posts;

pub use comments::MemoryCommentStore;
pub use posts::MemoryPostStore;
