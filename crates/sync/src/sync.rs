use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::fan_out::fan_out;
use crate::locks::ReportLocks;
use crate::summary::{ReportOutcome, ReportStats, SyncSummary};
use rankbook_core::{batch_date, merge_with_stats, Grid, Layout, Record};
use rankbook_store::ReportStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// One destination report and the records it receives.
#[derive(Debug, Clone)]
struct Job {
    report: String,
    group: Option<String>,
    /// Later groups folded into this job because their report has the same destination.
    merged_groups: Vec<String>,
    layout: Layout,
    records: Vec<Record>,
    /// Group report whose destination is the overall report's.
    collides: bool,
}

impl Job {
    fn outcome(&self, result: Result<ReportStats>) -> ReportOutcome {
        let (stats, error) = match result {
            Ok(stats) => (Some(stats), None),
            Err(e) => {
                log::warn!("Report {} failed: {e}", self.report);
                (None, Some(e.to_string()))
            }
        };
        ReportOutcome {
            report: self.report.clone(),
            group: self.group.clone(),
            merged_groups: self.merged_groups.clone(),
            records: self.records.len(),
            stats,
            error,
        }
    }
}

/// Drives read-merge-write cycles against a report store.
pub struct ReportSync<S> {
    store: Arc<S>,
    config: SyncConfig,
    locks: ReportLocks,
}

impl<S: ReportStore + 'static> ReportSync<S> {
    pub fn new(store: S, config: SyncConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
            locks: ReportLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Merge `records` into one report while holding its lock.
    ///
    /// A report that does not exist yet starts from an empty grid.
    pub async fn sync_report(
        &self,
        report: &str,
        records: &[Record],
        layout: Layout,
    ) -> Result<ReportStats> {
        sync_one(self.store.as_ref(), &self.locks, report, records, layout).await
    }

    /// Fan one day's batch out to every destination report.
    ///
    /// Fails only when the batch itself is invalid. Per-report failures are
    /// logged, recorded in the summary, and do not stop the other reports.
    pub async fn run(&self, records: &[Record]) -> Result<SyncSummary> {
        if records.is_empty() {
            log::info!("No records to sync");
            return Ok(SyncSummary::default());
        }
        let date = batch_date(records)?;
        let jobs = self.plan(records);
        log::info!(
            "Syncing {} records for {date} into {} reports",
            records.len(),
            jobs.len()
        );

        let limit = self.config.max_concurrent_reports;
        let outcomes = if limit <= 1 {
            let mut outcomes = Vec::with_capacity(jobs.len());
            for job in jobs {
                outcomes.push(execute(self.store.as_ref(), &self.locks, job).await);
            }
            outcomes
        } else {
            self.run_concurrent(jobs, limit).await
        };

        let summary = SyncSummary {
            date: Some(date),
            outcomes,
        };
        log::info!(
            "Sync finished for {date}: {} succeeded, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        Ok(summary)
    }

    /// One job per destination.
    ///
    /// Groups whose reports resolve to the same destination share a single
    /// job holding the union of their subsets in batch order. A group
    /// landing on the overall report's destination is marked as colliding.
    fn plan(&self, records: &[Record]) -> Vec<Job> {
        let mut jobs = Vec::new();
        let overall_destination = self.config.overall_report.as_ref().map(|report| {
            jobs.push(Job {
                report: report.clone(),
                group: None,
                merged_groups: Vec::new(),
                layout: self.config.overall_layout,
                records: records.to_vec(),
                collides: false,
            });
            self.store.destination(report)
        });

        let mut by_destination: HashMap<String, usize> = HashMap::new();
        for (group, subset) in fan_out(records) {
            let report = self.config.report_for_group(&group);
            let destination = self.store.destination(&report);

            if let Some(&index) = by_destination.get(&destination) {
                let job = &mut jobs[index];
                log::debug!(
                    "Group {group} shares destination {destination} with {}, merging",
                    job.report
                );
                job.records = records
                    .iter()
                    .filter(|r| job.records.contains(r) || subset.contains(r))
                    .cloned()
                    .collect();
                job.merged_groups.push(group);
                continue;
            }

            let collides = overall_destination.as_deref() == Some(destination.as_str());
            by_destination.insert(destination, jobs.len());
            jobs.push(Job {
                report,
                group: Some(group),
                merged_groups: Vec::new(),
                layout: self.config.layout,
                records: subset,
                collides,
            });
        }
        jobs
    }

    async fn run_concurrent(&self, jobs: Vec<Job>, limit: usize) -> Vec<ReportOutcome> {
        let semaphore = Arc::new(Semaphore::new(limit));
        let mut handles = Vec::with_capacity(jobs.len());
        for job in jobs {
            let label = job.clone();
            let store = Arc::clone(&self.store);
            let locks = self.locks.clone();
            let semaphore = Arc::clone(&semaphore);
            let handle = tokio::spawn(async move {
                // The semaphore is never closed.
                let _permit = semaphore.acquire_owned().await.ok();
                execute(store.as_ref(), &locks, job).await
            });
            handles.push((label, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (label, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => label.outcome(Err(SyncError::Join(e.to_string()))),
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

async fn execute<S: ReportStore + ?Sized>(store: &S, locks: &ReportLocks, job: Job) -> ReportOutcome {
    let result = if job.collides {
        Err(SyncError::NameCollision(job.report.clone()))
    } else {
        sync_one(store, locks, &job.report, &job.records, job.layout).await
    };
    job.outcome(result)
}

async fn sync_one<S: ReportStore + ?Sized>(
    store: &S,
    locks: &ReportLocks,
    report: &str,
    records: &[Record],
    layout: Layout,
) -> Result<ReportStats> {
    let started = Instant::now();
    let _guard = locks.acquire(&store.destination(report)).await;

    let previous = match store.get(report).await {
        Ok(grid) => grid,
        Err(e) if e.is_not_found() => {
            log::debug!("Report {report} does not exist yet, starting empty");
            Grid::new()
        }
        Err(e) => return Err(e.into()),
    };
    let rows_before = previous.row_count();

    let (grid, merged) = merge_with_stats(previous, records, layout)?;
    store.put(report, &grid).await?;

    let stats = ReportStats {
        rows_before,
        rows_after: grid.row_count(),
        date_column: merged.date_column,
        column_inserted: merged.column_inserted,
        rows_added: merged.rows_added,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    log::info!(
        "Synced {} records into {report} ({} -> {} rows)",
        records.len(),
        stats.rows_before,
        stats.rows_after
    );
    Ok(stats)
}
