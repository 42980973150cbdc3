//! # Rankbook Core
//!
//! Keyword rank records and the incremental grid merge engine that records
//! them into shared, human-editable reports.
//!
//! ## Pipeline
//!
//! ```text
//! Record[] (one day)
//!     │
//!     ├──> Rank Classifier
//!     │      └─> Histogram / percentages (summary block, digest)
//!     │
//!     └──> Merge Engine
//!            ├─> Section Locator (summary block, detail block)
//!            ├─> Column Upsert (date key, inserted at index 2)
//!            └─> Row Upsert (keyword key)
//! ```
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rankbook_core::{merge, Grid, Layout, Record};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let records = vec![
//!     Record::new(day, "shoes").with_rank(2),
//!     Record::new(day, "boots").with_rank(15),
//! ];
//!
//! let grid = merge(Grid::new(), &records, Layout::Integrated).unwrap();
//! assert_eq!(grid.cell(1, 2), "50.00% (1)");
//! ```

mod digest;
mod error;
mod grid;
mod merge;
mod rank;
mod record;
mod section;
mod upsert;

pub use digest::{ChangeStats, RankDigest, RankMove, BIG_MOVE_THRESHOLD};
pub use error::{CoreError, Result};
pub use grid::Grid;
pub use merge::{merge, merge_with_stats, Layout, MergeStats};
pub use rank::{classify, BucketShare, RankBucket, RankDistribution, RankHistogram};
pub use record::{batch_date, date_key, records_for_day, Record, DATE_KEY_FORMAT};
pub use section::{
    detail_header, locate, summary_block, Sections, SummaryRange, DATE_INSERT_COLUMN,
    IDENTITY_COLUMNS, KEYWORD_HEADER_LABEL, SUMMARY_HEADER_LABEL, URL_COLUMN, URL_HEADER_LABEL,
};
pub use upsert::{upsert_column, upsert_row, write_record};
