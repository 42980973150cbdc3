use crate::error::{CoreError, Result};
use crate::grid::Grid;
use crate::rank::{RankBucket, RankDistribution};
use crate::record::{batch_date, date_key, Record};
use crate::section::{
    detail_header, locate, summary_block, Sections, DATE_INSERT_COLUMN,
};
use crate::upsert::{upsert_column, upsert_row, write_record};
use serde::{Deserialize, Serialize};

/// Shape of a report grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Keyword-detail block only.
    #[default]
    MatrixOnly,
    /// Percentage summary block, a blank row, then the keyword-detail block.
    Integrated,
}

impl Layout {
    /// Rows of a fresh report in this layout.
    #[must_use]
    pub fn initial_grid(self) -> Grid {
        let mut rows = Vec::new();
        if self == Layout::Integrated {
            rows.extend(summary_block());
            rows.push(Vec::new());
        }
        rows.push(detail_header());
        Grid::from_rows(rows)
    }
}

/// What a merge changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub date_column: usize,
    pub column_inserted: bool,
    pub rows_added: usize,
}

/// Merge one day's records into `previous` and return the updated grid.
///
/// See [`merge_with_stats`].
pub fn merge(previous: Grid, records: &[Record], layout: Layout) -> Result<Grid> {
    merge_with_stats(previous, records, layout).map(|(grid, _)| grid)
}

/// Merge one day's records into `previous`.
///
/// The batch must be non-empty and share a single date. Re-running the merge
/// with the same batch returns an identical grid; running it with a corrected
/// batch for the same date overwrites the earlier values in place.
pub fn merge_with_stats(
    previous: Grid,
    records: &[Record],
    layout: Layout,
) -> Result<(Grid, MergeStats)> {
    let date = batch_date(records)?;
    let key = date_key(date);
    let distribution = match layout {
        Layout::Integrated => Some(RankDistribution::from_records(records)?),
        Layout::MatrixOnly => None,
    };

    let mut grid = if previous.is_blank() {
        layout.initial_grid()
    } else {
        previous
    };
    let rows_before = grid.row_count();

    let sections = ensure_sections(&mut grid, layout)?;
    let detail_header_row = sections
        .detail_header_row
        .ok_or_else(|| CoreError::StructuralInvariant("detail header missing".into()))?;
    let (date_column, column_inserted) = upsert_column(&mut grid, detail_header_row, &key);

    // Column insertion never moves rows, but section bounds are re-derived
    // after every structural change.
    let sections = locate(&grid)?;
    if let Some(summary) = sections.summary {
        grid.set_cell(summary.header_row, date_column, key.as_str());
        if let Some(distribution) = &distribution {
            for bucket in RankBucket::ALL {
                let row = summary.bucket_row(&grid, bucket).ok_or_else(|| {
                    CoreError::StructuralInvariant(format!(
                        "summary block has no '{}' row",
                        bucket.label()
                    ))
                })?;
                grid.set_cell(row, date_column, distribution.cell(bucket));
            }
        }
    }

    // Rows are only appended below the detail header, so its index and the
    // summary bounds above it stay valid through this loop.
    let rows_before_records = grid.row_count();
    for record in records {
        let row = upsert_row(&mut grid, detail_header_row, &record.keyword);
        write_record(&mut grid, row, date_column, record);
    }
    let rows_added = grid.row_count() - rows_before_records;

    grid.normalize();
    log::debug!(
        "Merged {} records for {key} ({layout:?}): {} -> {} rows, date column {date_column}",
        records.len(),
        rows_before,
        grid.row_count()
    );

    Ok((
        grid,
        MergeStats {
            date_column,
            column_inserted,
            rows_added,
        },
    ))
}

/// Create whatever section `layout` needs and the grid lacks, then locate.
fn ensure_sections(grid: &mut Grid, layout: Layout) -> Result<Sections> {
    let sections = locate(grid)?;
    match (layout, sections.summary, sections.detail_header_row) {
        (Layout::Integrated, None, Some(row)) => Err(CoreError::StructuralInvariant(format!(
            "detail header at row {} has no summary block above it",
            row + 1
        ))),
        (Layout::Integrated, None, None) => {
            log::debug!("Appending summary and detail sections");
            push_separator(grid);
            for row in summary_block() {
                grid.push_row(row);
            }
            grid.push_row(Vec::new());
            grid.push_row(detail_header());
            locate(grid)
        }
        (_, summary, None) => {
            log::debug!("Appending detail section");
            push_separator(grid);
            let mut header = detail_header();
            if let Some(summary) = summary {
                // Keep dates already recorded in the summary aligned with the new block.
                let dates = grid
                    .row(summary.header_row)
                    .map(|cells| cells.iter().skip(DATE_INSERT_COLUMN).cloned().collect::<Vec<_>>())
                    .unwrap_or_default();
                header.extend(dates);
            }
            grid.push_row(header);
            locate(grid)
        }
        _ => Ok(sections),
    }
}

fn push_separator(grid: &mut Grid) {
    let last_has_content = grid
        .rows()
        .last()
        .is_some_and(|row| row.iter().any(|cell| !cell.is_empty()));
    if last_has_content {
        grid.push_row(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn rec(d: u32, keyword: &str, rank: i64) -> Record {
        Record::new(day(d), keyword).with_rank(rank)
    }

    #[test]
    fn initial_grids_per_layout() {
        assert_eq!(
            Layout::MatrixOnly.initial_grid(),
            Grid::from([&["keyword", "url"][..]])
        );
        let integrated = Layout::Integrated.initial_grid();
        assert_eq!(integrated.row_count(), 7);
        assert_eq!(integrated.key(6), "keyword");
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_eq!(
            merge(Grid::new(), &[], Layout::MatrixOnly),
            Err(CoreError::EmptyBatch)
        );
    }

    #[test]
    fn mixed_dates_are_rejected() {
        let err = merge(
            Grid::new(),
            &[rec(1, "a", 1), rec(2, "b", 2)],
            Layout::Integrated,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn matrix_merge_into_empty_grid() {
        let grid = merge(
            Grid::new(),
            &[rec(1, "shoes", 2).with_url("https://a"), rec(1, "boots", 15)],
            Layout::MatrixOnly,
        )
        .unwrap();
        assert_eq!(
            grid,
            Grid::from([
                &["keyword", "url", "2024-01-01"][..],
                &["shoes", "https://a", "2"][..],
                &["boots", "", "15"][..],
            ])
        );
    }

    #[test]
    fn stats_report_insertions() {
        let (grid, stats) =
            merge_with_stats(Grid::new(), &[rec(1, "a", 1)], Layout::MatrixOnly).unwrap();
        assert_eq!(
            stats,
            MergeStats {
                date_column: 2,
                column_inserted: true,
                rows_added: 1
            }
        );
        let (_, again) = merge_with_stats(grid, &[rec(1, "a", 1)], Layout::MatrixOnly).unwrap();
        assert_eq!(
            again,
            MergeStats {
                date_column: 2,
                column_inserted: false,
                rows_added: 0
            }
        );
    }

    #[test]
    fn integrated_layout_rejects_detail_without_summary() {
        let grid = Grid::from([&["keyword", "url"][..], &["a", ""][..]]);
        assert!(matches!(
            merge(grid, &[rec(1, "a", 1)], Layout::Integrated),
            Err(CoreError::StructuralInvariant(_))
        ));
    }

    #[test]
    fn integrated_layout_rejects_summary_missing_a_bucket_row() {
        let grid = Grid::from([
            &["rank", ""][..],
            &["1-3", ""][..],
            &["other", ""][..],
            &[][..],
            &["keyword", "url"][..],
        ]);
        assert!(matches!(
            merge(grid, &[rec(1, "a", 1)], Layout::Integrated),
            Err(CoreError::StructuralInvariant(_))
        ));
    }

    #[test]
    fn missing_detail_section_is_appended_after_existing_content() {
        let grid = Grid::from([&["notes from the team"][..]]);
        let merged = merge(grid, &[rec(1, "a", 4)], Layout::MatrixOnly).unwrap();
        assert_eq!(
            merged,
            Grid::from([
                &["notes from the team", "", ""][..],
                &["", "", ""][..],
                &["keyword", "url", "2024-01-01"][..],
                &["a", "", "4"][..],
            ])
        );
    }

    #[test]
    fn new_detail_section_inherits_summary_dates() {
        let grid = Grid::from([
            &["rank", "", "2024-01-01"][..],
            &["1-3", "", "100.00% (1)"][..],
            &["4-10", "", "0.00% (0)"][..],
            &["11-50", "", "0.00% (0)"][..],
            &["other", "", "0.00% (0)"][..],
        ]);
        let merged = merge(grid, &[rec(1, "a", 9)], Layout::Integrated).unwrap();
        assert_eq!(merged.row(0).unwrap(), &["rank", "", "2024-01-01"]);
        assert_eq!(merged.row(2).unwrap(), &["4-10", "", "100.00% (1)"]);
        assert_eq!(merged.row(6).unwrap(), &["keyword", "url", "2024-01-01"]);
        assert_eq!(merged.row(7).unwrap(), &["a", "", "9"]);
    }

    #[test]
    fn matrix_merge_mirrors_date_into_existing_summary() {
        let grid = Layout::Integrated.initial_grid();
        let merged = merge(grid, &[rec(3, "a", 1)], Layout::MatrixOnly).unwrap();
        assert_eq!(merged.row(0).unwrap(), &["rank", "", "2024-01-03"]);
        assert_eq!(merged.row(1).unwrap(), &["1-3", "", ""]);
    }
}
