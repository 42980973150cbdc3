use crate::grid::Grid;
use crate::record::Record;
use crate::section::{DATE_INSERT_COLUMN, IDENTITY_COLUMNS, URL_COLUMN};

/// Find `date_key` in the header row, or insert it at [`DATE_INSERT_COLUMN`].
///
/// Insertion is positional: every new date lands right after the identity
/// columns, so the most recently added date sits leftmost. Every row that
/// already spans the identity columns gets an empty cell at the same index;
/// shorter rows are padded later by whoever writes to them.
///
/// Returns the date's column index and whether it was newly inserted.
pub fn upsert_column(grid: &mut Grid, header_row: usize, date_key: &str) -> (usize, bool) {
    let existing = grid.row(header_row).and_then(|header| {
        header
            .iter()
            .skip(IDENTITY_COLUMNS)
            .position(|cell| cell == date_key)
    });
    if let Some(offset) = existing {
        return (IDENTITY_COLUMNS + offset, false);
    }

    grid.pad_row(header_row, IDENTITY_COLUMNS);
    grid.insert_column(DATE_INSERT_COLUMN, IDENTITY_COLUMNS);
    grid.set_cell(header_row, DATE_INSERT_COLUMN, date_key);
    log::debug!("Inserted date column {date_key} at index {DATE_INSERT_COLUMN}");
    (DATE_INSERT_COLUMN, true)
}

/// Find the row keyed by `keyword` below `header_row` (first match wins), or
/// append `[keyword, ""]` at the end of the grid.
///
/// Appending at the end is only correct while the detail section is the last
/// section of the grid.
pub fn upsert_row(grid: &mut Grid, header_row: usize, keyword: &str) -> usize {
    if let Some(row) = (header_row + 1..grid.row_count()).find(|&row| grid.key(row) == keyword) {
        return row;
    }
    grid.push_row(vec![keyword.to_string(), String::new()])
}

/// Write one record's rank into `col` of `row`. A non-empty URL replaces the
/// row's URL cell.
pub fn write_record(grid: &mut Grid, row: usize, col: usize, record: &Record) {
    grid.pad_row(row, col + 1);
    grid.set_cell(row, col, record.rank.to_string());
    if !record.ranking_url.is_empty() {
        grid.set_cell(row, URL_COLUMN, record.ranking_url.clone());
    }
}
