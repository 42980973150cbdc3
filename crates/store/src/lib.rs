//! # Rankbook Store
//!
//! Where report grids live between runs.
//!
//! Every implementation reads and writes whole grids through [`ReportStore`]:
//!
//! - [`MemoryReportStore`]: a map of grids, used by tests and dry runs
//! - [`DirReportStore`]: one CSV or JSON file per report under a directory
//! - [`ThrottledStore`]: wraps another store and spaces out its calls

mod dir;
mod error;
mod memory;
mod store;
mod throttle;

pub use dir::{sanitize_report_name, DirReportStore, ReportFormat};
pub use error::{Result, StoreError};
pub use memory::MemoryReportStore;
pub use store::ReportStore;
pub use throttle::ThrottledStore;
