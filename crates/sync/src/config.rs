use rankbook_core::Layout;
use serde::{Deserialize, Serialize};

use crate::fan_out::UNCLASSIFIED_GROUP;

/// How a run maps records onto reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Layout of every group report.
    pub layout: Layout,
    /// Report that receives the whole batch, if any.
    pub overall_report: Option<String>,
    pub overall_layout: Layout,
    /// Report receiving records that carry no group.
    pub unclassified_report: String,
    /// Reports processed at once. `1` processes them one after another.
    pub max_concurrent_reports: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Integrated,
            overall_report: None,
            overall_layout: Layout::Integrated,
            unclassified_report: UNCLASSIFIED_GROUP.to_string(),
            max_concurrent_reports: 1,
        }
    }
}

impl SyncConfig {
    /// Report name for a fan-out group.
    #[must_use]
    pub fn report_for_group(&self, group: &str) -> String {
        if group == UNCLASSIFIED_GROUP {
            self.unclassified_report.clone()
        } else {
            group.to_string()
        }
    }
}
