//! In-memory `UserStore` for tests. Counts store round trips, injects
//! failures, and can hold concurrent callers at a barrier right after the
//! read step to force the read-then-write race window.

use crate::services::student_id;
use crate::store::{StoreError, UserStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

#[derive(Default)]
pub struct MemoryUserStore {
    // uid -> assigned student_id (None until the assigner writes one)
    users: Mutex<HashMap<String, Option<String>>>,
    counter: AtomicI64,
    query_calls: AtomicUsize,
    write_calls: AtomicUsize,
    fail_queries: AtomicBool,
    fail_writes: AtomicBool,
    read_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, uid: &str) {
        self.users
            .lock()
            .unwrap()
            .insert(uid.to_string(), None);
    }

    pub fn student_id_of(&self, uid: &str) -> Option<String> {
        self.users.lock().unwrap().get(uid).cloned().flatten()
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// All callers of a read step (max-lookup or counter advance) rendezvous
    /// here before any of them proceeds to the write.
    pub fn hold_after_read(&self, parties: usize) {
        *self.read_barrier.lock().unwrap() = Some(Arc::new(Barrier::new(parties)));
    }

    async fn rendezvous(&self) {
        let barrier = self.read_barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn highest_student_id(&self) -> Result<Option<String>, StoreError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Query("simulated query failure".to_string()));
        }

        let max = self
            .users
            .lock()
            .unwrap()
            .values()
            .flatten()
            .filter_map(|id| student_id::parse_student_id(id).map(|n| (n, id.clone())))
            .max_by_key(|(n, _)| *n)
            .map(|(_, id)| id);

        self.rendezvous().await;

        Ok(max)
    }

    async fn next_sequence(&self) -> Result<i64, StoreError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Query("simulated counter failure".to_string()));
        }

        let value = self.counter.fetch_add(1, Ordering::SeqCst) + 1;

        self.rendezvous().await;

        Ok(value)
    }

    async fn set_student_id(&self, uid: &str, student_id: &str) -> Result<bool, StoreError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write("simulated write failure".to_string()));
        }

        let mut users = self.users.lock().unwrap();
        match users.get_mut(uid) {
            Some(slot @ None) => {
                *slot = Some(student_id.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
