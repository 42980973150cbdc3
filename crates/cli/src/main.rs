use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rankbook_core::Layout;
use rankbook_store::ReportFormat;
use std::path::PathBuf;

mod commands;
mod config;

use config::RankbookConfig;

#[derive(Parser)]
#[command(name = "rankbook")]
#[command(about = "Merge daily keyword rankings into per-group rank reports", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file (defaults to ./rankbook.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge one day of a rank export into every group report
    Sync(SyncArgs),

    /// Print the rank distribution and movement digest for one day as JSON
    Digest(DigestArgs),

    /// Print a stored report as CSV, or list reports when none is named
    Show(ShowArgs),
}

#[derive(Args)]
struct SyncArgs {
    /// Rank tracker CSV export
    #[arg(long)]
    csv: PathBuf,

    /// Day to sync, YYYY-MM-DD (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    #[command(flatten)]
    store: StoreArgs,

    /// Layout of group reports
    #[arg(long, value_enum)]
    layout: Option<LayoutFlag>,

    /// Report that receives the whole batch
    #[arg(long)]
    overall_report: Option<String>,

    /// Reports processed at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct DigestArgs {
    /// Rank tracker CSV export
    #[arg(long)]
    csv: PathBuf,

    /// Day to summarise, YYYY-MM-DD (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// Report name
    report: Option<String>,

    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Args)]
struct StoreArgs {
    /// Report directory (overrides [store].dir)
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Report file format (overrides [store].format)
    #[arg(long, value_enum)]
    format: Option<FormatFlag>,
}

impl StoreArgs {
    fn apply(&self, config: &mut RankbookConfig) {
        if let Some(dir) = &self.store_dir {
            config.store.dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.store.format = format.as_domain();
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum LayoutFlag {
    MatrixOnly,
    Integrated,
}

impl LayoutFlag {
    const fn as_domain(self) -> Layout {
        match self {
            LayoutFlag::MatrixOnly => Layout::MatrixOnly,
            LayoutFlag::Integrated => Layout::Integrated,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum FormatFlag {
    Csv,
    Json,
}

impl FormatFlag {
    const fn as_domain(self) -> ReportFormat {
        match self {
            FormatFlag::Csv => ReportFormat::Csv,
            FormatFlag::Json => ReportFormat::Json,
        }
    }
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    rankbook_source::parse_day(raw).ok_or_else(|| format!("expected YYYY-MM-DD, got {raw:?}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON parsing
    let json_output = match &cli.command {
        Commands::Sync(args) => args.json,
        Commands::Digest(_) => true,
        Commands::Show(_) => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = RankbookConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Sync(args) => {
            args.store.apply(&mut config);
            if let Some(layout) = args.layout {
                config.sync.layout = layout.as_domain();
            }
            if let Some(report) = args.overall_report {
                config.sync.overall_report = Some(report);
            }
            if let Some(concurrency) = args.concurrency {
                config.sync.max_concurrent_reports = concurrency;
            }
            let options = commands::SyncOptions {
                csv: args.csv,
                date: args.date,
                json: args.json,
            };
            let all_succeeded = commands::run_sync(options, config).await?;
            if !all_succeeded {
                std::process::exit(1);
            }
        }
        Commands::Digest(args) => commands::run_digest(&args.csv, args.date, args.pretty).await?,
        Commands::Show(args) => {
            args.store.apply(&mut config);
            commands::run_show(args.report.as_deref(), &config).await?;
        }
    }

    Ok(())
}
