//! Per-user turn serialization.
//!
//! One mutual-exclusion unit per user, created lazily in a concurrent
//! map and retained for the life of the process. Tokio's mutex queues
//! waiters in FIFO order, so turns for the same user run in arrival
//! order; turns for distinct users never contend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use courier_types::user::UserId;

/// Arena of per-user turn locks.
#[derive(Default)]
pub struct TurnGate {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl TurnGate {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the exclusive turn for a user.
    ///
    /// The returned guard is owned, so it can be held across the whole
    /// turn and is released on drop -- including every error path.
    pub async fn turn(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let entry = self.locks.entry(user_id.clone()).or_default();
            Arc::clone(entry.value())
        };
        lock.lock_owned().await
    }

    /// Number of users a lock has been created for.
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }
}

impl std::fmt::Debug for TurnGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnGate")
            .field("users", &self.locks.len())
            .finish()
    }
}
