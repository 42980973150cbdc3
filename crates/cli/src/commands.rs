use crate::config::RankbookConfig;
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use rankbook_core::{records_for_day, RankDigest, Record};
use rankbook_store::{DirReportStore, ReportStore, ThrottledStore};
use rankbook_sync::{ReportSync, SyncSummary};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub struct SyncOptions {
    pub csv: PathBuf,
    pub date: Option<NaiveDate>,
    pub json: bool,
}

fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

async fn load_day(csv: &Path, date: Option<NaiveDate>) -> Result<(NaiveDate, Vec<Record>)> {
    let day = date.unwrap_or_else(today_utc);
    let records = rankbook_source::load_records(csv)
        .await
        .with_context(|| format!("Failed to load records from {}", csv.display()))?;
    let todays = records_for_day(&records, day);
    log::info!(
        "{} of {} records are dated {day}",
        todays.len(),
        records.len()
    );
    Ok((day, todays))
}

async fn open_store(config: &RankbookConfig) -> Result<DirReportStore> {
    DirReportStore::open(&config.store.dir, config.store.format)
        .await
        .with_context(|| format!("Failed to open report store {}", config.store.dir.display()))
}

/// Returns whether every report was written.
pub async fn run_sync(options: SyncOptions, config: RankbookConfig) -> Result<bool> {
    let (day, records) = load_day(&options.csv, options.date).await?;
    if records.is_empty() {
        log::warn!("No records for {day} in {}", options.csv.display());
    }

    let store = ThrottledStore::new(open_store(&config).await?, config.store.min_interval());
    let sync = ReportSync::new(store, config.sync);
    let summary = sync.run(&records).await.context("Sync failed")?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary)?;
    }
    Ok(summary.failed() == 0)
}

fn print_summary(summary: &SyncSummary) -> Result<()> {
    let mut out = io::stdout().lock();
    for outcome in &summary.outcomes {
        match (&outcome.stats, &outcome.error) {
            (Some(stats), _) => writeln!(
                out,
                "ok      {}  {} records, {} -> {} rows",
                outcome.report, outcome.records, stats.rows_before, stats.rows_after
            )?,
            (None, error) => writeln!(
                out,
                "FAILED  {}  {} records: {}",
                outcome.report,
                outcome.records,
                error.as_deref().unwrap_or("unknown error")
            )?,
        }
    }
    writeln!(
        out,
        "{} succeeded, {} failed",
        summary.succeeded(),
        summary.failed()
    )?;
    Ok(())
}

pub async fn run_digest(csv: &Path, date: Option<NaiveDate>, pretty: bool) -> Result<()> {
    let (day, records) = load_day(csv, date).await?;
    let digest =
        RankDigest::compute(&records).with_context(|| format!("No digest for {day}"))?;
    let json = if pretty {
        serde_json::to_string_pretty(&digest)?
    } else {
        serde_json::to_string(&digest)?
    };
    println!("{json}");
    Ok(())
}

pub async fn run_show(report: Option<&str>, config: &RankbookConfig) -> Result<()> {
    let store = open_store(config).await?;
    let Some(report) = report else {
        for name in store.reports().await? {
            println!("{name}");
        }
        return Ok(());
    };

    let grid = match store.get(report).await {
        Ok(grid) => grid,
        Err(e) if e.is_not_found() => bail!("Report {report:?} does not exist"),
        Err(e) => return Err(e).with_context(|| format!("Failed to read report {report:?}")),
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(io::stdout().lock());
    for row in grid.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
