//! Identifier and timestamp generation for new records.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Supplies globally unique identifiers and creation timestamps.
///
/// Timestamps must never go backwards across calls, so they agree with
/// insertion order.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
    fn now(&self) -> DateTime<Utc>;
}

/// UUID v4 identifiers and wall-clock timestamps clamped to be non-decreasing.
#[derive(Default)]
pub struct UuidGenerator {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl UuidGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn now(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let observed = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        *last = Some(observed);
        observed
    }
}

/// Deterministic `{prefix}-{n}` identifiers with timestamps one second apart.
///
/// Used for fixtures and tests where ids must be predictable.
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicI64,
    epoch: DateTime<Utc>,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicI64::new(0),
            epoch: DateTime::<Utc>::from(std::time::UNIX_EPOCH),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", self.prefix, n)
    }

    fn now(&self) -> DateTime<Utc> {
        self.epoch + Duration::seconds(self.counter.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let gen = SequentialIdGenerator::new("post");
        assert_eq!(gen.next_id(), "post-1");
        let first = gen.now();
        assert_eq!(gen.next_id(), "post-2");
        assert!(gen.now() > first);
    }

    #[test]
    fn test_ids_are_unique_uuids() {
        let gen = UuidGenerator::new();
        let ids: HashSet<String> = (0..1_000).map(|_| gen.next_id()).collect();
        assert_eq!(ids.len(), 1_000);
        assert!(ids.iter().all(|id| Uuid::parse_str(id).is_ok()));
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let gen = UuidGenerator::new();
        let mut prev = gen.now();
        for _ in 0..1_000 {
            let next = gen.now();
            assert!(next >= prev);
            prev = next;
        }
    }
}
