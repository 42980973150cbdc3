use crate::error::Result;
use async_trait::async_trait;
use rankbook_core::Grid;
use std::sync::Arc;

/// Named tabular reports, read and written whole.
///
/// `get` on a report that does not exist yet returns
/// [`StoreError::NotFound`](crate::StoreError::NotFound).
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn get(&self, report: &str) -> Result<Grid>;

    async fn put(&self, report: &str, grid: &Grid) -> Result<()>;

    /// Identity of the storage location behind `report`. Two names with the
    /// same destination share one underlying report.
    fn destination(&self, report: &str) -> String {
        report.to_string()
    }

    /// Names of the stored reports, sorted.
    async fn reports(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl<S: ReportStore + ?Sized> ReportStore for Arc<S> {
    async fn get(&self, report: &str) -> Result<Grid> {
        (**self).get(report).await
    }

    async fn put(&self, report: &str, grid: &Grid) -> Result<()> {
        (**self).put(report, grid).await
    }

    fn destination(&self, report: &str) -> String {
        (**self).destination(report)
    }

    async fn reports(&self) -> Result<Vec<String>> {
        (**self).reports().await
    }
}
