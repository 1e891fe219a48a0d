//! One reconciliation at a time per calendar.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Hands out one async lock per key.
#[derive(Default)]
pub struct InFlight {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl InFlight {
    fn lock_for(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Wait until nobody else holds `key`, then hold it until the guard drops.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self.lock_for(key);
        match lock.clone().try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                debug!(key, "waiting for in-flight sync to finish");
                lock.lock_owned().await
            }
        }
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.lock_for(key).try_lock().is_err()
    }
}
