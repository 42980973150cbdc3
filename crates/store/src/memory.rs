use crate::error::{Result, StoreError};
use crate::store::ReportStore;
use async_trait::async_trait;
use rankbook_core::Grid;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Report store held entirely in memory.
///
/// Counts every call and can be told to fail writes to chosen reports.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: Mutex<BTreeMap<String, Grid>>,
    failing_puts: Mutex<HashSet<String>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl MemoryReportStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_report(self, report: impl Into<String>, grid: Grid) -> Self {
        self.insert(report, grid);
        self
    }

    pub fn insert(&self, report: impl Into<String>, grid: Grid) {
        lock(&self.reports).insert(report.into(), grid);
    }

    /// Current contents of `report` without counting as a `get`.
    #[must_use]
    pub fn snapshot(&self, report: &str) -> Option<Grid> {
        lock(&self.reports).get(report).cloned()
    }

    /// Make every later `put` to `report` fail.
    pub fn fail_puts_for(&self, report: impl Into<String>) {
        lock(&self.failing_puts).insert(report.into());
    }

    #[must_use]
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::Relaxed)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn get(&self, report: &str) -> Result<Grid> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        lock(&self.reports)
            .get(report)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(report.to_string()))
    }

    async fn put(&self, report: &str, grid: &Grid) -> Result<()> {
        self.puts.fetch_add(1, Ordering::Relaxed);
        if lock(&self.failing_puts).contains(report) {
            return Err(StoreError::Other(format!("write to {report} rejected")));
        }
        lock(&self.reports).insert(report.to_string(), grid.clone());
        Ok(())
    }

    async fn reports(&self) -> Result<Vec<String>> {
        Ok(lock(&self.reports).keys().cloned().collect())
    }
}
