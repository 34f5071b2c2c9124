//! Per-ledger serialization of writes.
//!
//! Card ledgers and bank account histories are keyed by their owning
//! record's id (`card::<uuid>`, `account::<uuid>`), so one registry serves both.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async lock per card or account id. Holding the guard makes the
/// lookup and every write that follows it on that record exclusive, while
/// different records never contend with each other.
#[derive(Clone, Default)]
pub struct LedgerLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl LedgerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        slot.lock_owned().await
    }

    /// Drop the lock slot of a deleted record
    pub fn forget(&self, key: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.remove(key);
    }
}
