use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as TokioMutex, OwnedMutexGuard};

/// One async mutex per report destination.
///
/// Holding the guard for the whole read-merge-write cycle keeps two merges
/// from racing on the same report. Clones share the same lock table.
#[derive(Debug, Clone, Default)]
pub struct ReportLocks {
    locks: Arc<Mutex<HashMap<String, Arc<TokioMutex<()>>>>>,
}

impl ReportLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, destination: &str) -> Arc<TokioMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            locks
                .entry(destination.to_string())
                .or_insert_with(|| Arc::new(TokioMutex::new(()))),
        )
    }

    pub async fn acquire(&self, destination: &str) -> OwnedMutexGuard<()> {
        self.lock_for(destination).lock_owned().await
    }
}
