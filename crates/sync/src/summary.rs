use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What one read-merge-write cycle did to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    pub rows_before: usize,
    pub rows_after: usize,
    /// Column holding the batch date after the merge.
    pub date_column: usize,
    /// False when the date was already present and its cells were overwritten.
    pub column_inserted: bool,
    pub rows_added: usize,
    pub elapsed_ms: u64,
}

/// Result for one destination report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOutcome {
    pub report: String,
    /// Fan-out group, or `None` for the overall report.
    pub group: Option<String>,
    /// Further groups whose report shares this destination.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_groups: Vec<String>,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ReportStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-report results of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Date of the batch; `None` when the batch was empty.
    pub date: Option<NaiveDate>,
    pub outcomes: Vec<ReportOutcome>,
}

impl SyncSummary {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    #[must_use]
    pub fn outcome(&self, report: &str) -> Option<&ReportOutcome> {
        self.outcomes.iter().find(|o| o.report == report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(report: &str, error: Option<&str>) -> ReportOutcome {
        ReportOutcome {
            report: report.into(),
            group: Some(report.into()),
            merged_groups: Vec::new(),
            records: 1,
            stats: None,
            error: error.map(Into::into),
        }
    }

    #[test]
    fn counts_successes_and_failures() {
        let summary = SyncSummary {
            date: None,
            outcomes: vec![outcome("a", None), outcome("b", Some("boom")), outcome("c", None)],
        };
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures().next().unwrap().report, "b");
    }

    #[test]
    fn json_omits_absent_fields() {
        let json = serde_json::to_value(outcome("a", Some("boom"))).unwrap();
        assert!(json.get("stats").is_none());
        assert!(json.get("merged_groups").is_none());
        assert_eq!(json["error"], "boom");
    }
}
