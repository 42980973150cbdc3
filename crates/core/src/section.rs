//! Locating the summary block and the keyword-detail block inside a grid.
//!
//! Integrated reports look like this (columns 0 and 1 are identity columns,
//! date columns start at [`DATE_INSERT_COLUMN`]):
//!
//! ```text
//! rank     |     | 2024-01-02 | 2024-01-01
//! 1-3      |     | 50.00% (1) | ...
//! 4-10     |     | ...
//! 11-50    |     | ...
//! other    |     | ...
//!          |     |
//! keyword  | url | 2024-01-02 | 2024-01-01
//! shoes    | ... | 2          | 3
//! ```
//!
//! Matrix-only reports contain just the detail block.

use crate::error::{CoreError, Result};
use crate::grid::Grid;
use crate::rank::RankBucket;
use std::ops::RangeInclusive;

/// Column 0 of the summary header row.
pub const SUMMARY_HEADER_LABEL: &str = "rank";
/// Column 0 of the detail header row.
pub const KEYWORD_HEADER_LABEL: &str = "keyword";
/// Column 1 of the detail header row.
pub const URL_HEADER_LABEL: &str = "url";
/// Number of leading identity columns (keyword, url).
pub const IDENTITY_COLUMNS: usize = 2;
/// Where a new date column is inserted.
pub const DATE_INSERT_COLUMN: usize = IDENTITY_COLUMNS;
/// Column holding each detail row's URL.
pub const URL_COLUMN: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRange {
    pub header_row: usize,
    /// Row labelled with the last bucket (`other`).
    pub end_row: usize,
}

impl SummaryRange {
    #[must_use]
    pub fn label_rows(&self) -> RangeInclusive<usize> {
        (self.header_row + 1)..=self.end_row
    }

    /// First label row carrying `bucket`'s label.
    #[must_use]
    pub fn bucket_row(&self, grid: &Grid, bucket: RankBucket) -> Option<usize> {
        self.label_rows().find(|&row| grid.key(row) == bucket.label())
    }
}

/// Section boundaries derived from a grid's current contents.
///
/// Never cache this across a structural change: locate again instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sections {
    pub summary: Option<SummaryRange>,
    pub detail_header_row: Option<usize>,
}

/// Find the summary block and the detail header.
///
/// A summary header is only recognised before the detail header; once the
/// detail header is seen, later `rank` keys are ordinary keywords. A summary
/// header without a closing `other` row is a structural error.
pub fn locate(grid: &Grid) -> Result<Sections> {
    let mut sections = Sections::default();

    let Some(first) = (0..grid.row_count())
        .find(|&row| matches!(grid.key(row), SUMMARY_HEADER_LABEL | KEYWORD_HEADER_LABEL))
    else {
        return Ok(sections);
    };

    let detail_search_start = if grid.key(first) == SUMMARY_HEADER_LABEL {
        let end_label = RankBucket::Other.label();
        let mut end_row = None;
        for row in first + 1..grid.row_count() {
            match grid.key(row) {
                key if key == end_label => {
                    end_row = Some(row);
                    break;
                }
                KEYWORD_HEADER_LABEL => break,
                _ => {}
            }
        }
        let Some(end_row) = end_row else {
            return Err(CoreError::StructuralInvariant(format!(
                "summary header at row {} has no closing '{end_label}' row",
                first + 1
            )));
        };
        sections.summary = Some(SummaryRange {
            header_row: first,
            end_row,
        });
        end_row + 1
    } else {
        first
    };

    sections.detail_header_row =
        (detail_search_start..grid.row_count()).find(|&row| grid.key(row) == KEYWORD_HEADER_LABEL);
    Ok(sections)
}

#[must_use]
pub fn detail_header() -> Vec<String> {
    vec![KEYWORD_HEADER_LABEL.to_string(), URL_HEADER_LABEL.to_string()]
}

/// Summary header plus one row per bucket, each at least identity-wide so
/// column insertion shifts them.
#[must_use]
pub fn summary_block() -> Vec<Vec<String>> {
    let mut rows = vec![vec![SUMMARY_HEADER_LABEL.to_string(), String::new()]];
    rows.extend(
        RankBucket::ALL
            .iter()
            .map(|bucket| vec![bucket.label().to_string(), String::new()]),
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrated() -> Grid {
        Grid::from([
            &["rank", ""][..],
            &["1-3", ""][..],
            &["4-10", ""][..],
            &["11-50", ""][..],
            &["other", ""][..],
            &[][..],
            &["keyword", "url"][..],
            &["rank", "u"][..],
        ])
    }

    #[test]
    fn empty_grid_has_no_sections() {
        assert_eq!(locate(&Grid::new()).unwrap(), Sections::default());
    }

    #[test]
    fn finds_both_sections() {
        let sections = locate(&integrated()).unwrap();
        assert_eq!(
            sections.summary,
            Some(SummaryRange {
                header_row: 0,
                end_row: 4
            })
        );
        assert_eq!(sections.detail_header_row, Some(6));
    }

    #[test]
    fn rank_keyword_after_detail_header_is_not_a_summary() {
        let grid = Grid::from([&["keyword", "url"][..], &["rank", ""][..]]);
        let sections = locate(&grid).unwrap();
        assert_eq!(sections.summary, None);
        assert_eq!(sections.detail_header_row, Some(0));
    }

    #[test]
    fn unterminated_summary_is_structural_error() {
        let grid = Grid::from([&["rank"][..], &["1-3"][..], &["keyword", "url"][..]]);
        assert!(matches!(
            locate(&grid),
            Err(CoreError::StructuralInvariant(_))
        ));
    }

    #[test]
    fn bucket_rows_are_found_by_label() {
        let grid = integrated();
        let summary = locate(&grid).unwrap().summary.unwrap();
        assert_eq!(summary.bucket_row(&grid, RankBucket::Top10), Some(2));
        assert_eq!(summary.bucket_row(&grid, RankBucket::Other), Some(4));
    }

    #[test]
    fn summary_block_has_header_and_four_buckets() {
        let block = summary_block();
        assert_eq!(block.len(), 5);
        assert_eq!(block[0][0], SUMMARY_HEADER_LABEL);
        assert_eq!(block[4][0], "other");
    }
}
