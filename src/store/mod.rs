use async_trait::async_trait;
use std::fmt;

pub mod mongo;

#[cfg(test)]
pub mod memory;

pub use mongo::MongoUserStore;

/// Failure from the document store, split by which round trip failed.
#[derive(Debug)]
pub enum StoreError {
    Query(String),
    Write(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Query(msg) => write!(f, "Store query failed: {}", msg),
            StoreError::Write(msg) => write!(f, "Store write failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Operations the ID assigner needs from the user collection. Kept behind a
/// trait so the assigner can be exercised without a live MongoDB.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Highest currently-assigned student ID, via a descending order-by on
    /// `student_id` with result limit 1. `None` when no record has one yet.
    async fn highest_student_id(&self) -> Result<Option<String>, StoreError>;

    /// Atomically advances the student ID counter and returns the
    /// post-increment value. Never returns the same value twice.
    async fn next_sequence(&self) -> Result<i64, StoreError>;

    /// Partial update of only the `student_id` field, conditional on the
    /// record still lacking one. Returns `false` when the record is missing
    /// or already carries an ID (re-delivered event), which callers treat as
    /// a no-op rather than an error.
    async fn set_student_id(&self, uid: &str, student_id: &str) -> Result<bool, StoreError>;
}
