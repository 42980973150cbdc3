use crate::error::Result;
use crate::store::ReportStore;
use async_trait::async_trait;
use rankbook_core::Grid;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum interval between the starts of consecutive store calls.
///
/// Waiting callers queue on an async mutex, so at most one call is released
/// per interval. The wrapped call itself runs outside the lock.
#[derive(Debug)]
pub struct ThrottledStore<S> {
    inner: S,
    min_interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl<S> ThrottledStore<S> {
    pub fn new(inner: S, min_interval: Duration) -> Self {
        Self {
            inner,
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    async fn wait_turn(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let mut last_start = self.last_start.lock().await;
        if let Some(previous) = *last_start {
            tokio::time::sleep_until(previous + self.min_interval).await;
        }
        *last_start = Some(Instant::now());
    }
}

#[async_trait]
impl<S: ReportStore> ReportStore for ThrottledStore<S> {
    async fn get(&self, report: &str) -> Result<Grid> {
        self.wait_turn().await;
        self.inner.get(report).await
    }

    async fn put(&self, report: &str, grid: &Grid) -> Result<()> {
        self.wait_turn().await;
        self.inner.put(report, grid).await
    }

    fn destination(&self, report: &str) -> String {
        self.inner.destination(report)
    }

    async fn reports(&self) -> Result<Vec<String>> {
        self.wait_turn().await;
        self.inner.reports().await
    }
}
