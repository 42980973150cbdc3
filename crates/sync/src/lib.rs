//! # Rankbook Sync
//!
//! Fans one day's records out to their group reports and runs a
//! read-merge-write cycle against each.
//!
//! ## Flow
//!
//! ```text
//! Record[] (one day)
//!     │
//!     ├──> overall report (optional, whole batch)
//!     │
//!     └──> fan_out ──> group A ──────┐
//!                  ──> group B ──────┼──> lock(report) → get → merge → put
//!                  ──> unclassified ─┘
//! ```
//!
//! Reports are independent: a failed read or write is recorded in the
//! [`SyncSummary`] and the remaining reports are still processed.

mod config;
mod error;
mod fan_out;
mod locks;
mod summary;
mod sync;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use fan_out::{fan_out, UNCLASSIFIED_GROUP};
pub use locks::ReportLocks;
pub use summary::{ReportOutcome, ReportStats, SyncSummary};
pub use sync::ReportSync;
