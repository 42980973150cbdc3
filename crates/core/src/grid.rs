use serde::{Deserialize, Serialize};

/// In-memory contents of one tabular report.
///
/// Rows may have different lengths; a cell past the end of its row reads as
/// an empty string. Writers must pad a row explicitly before writing past its
/// end (see [`Grid::pad_row`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True when the grid has no rows or only empty cells.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(String::is_empty)
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }

    /// Column 0 of `row`, the key cell of every section row.
    #[must_use]
    pub fn key(&self, row: usize) -> &str {
        self.cell(row, 0)
    }

    pub fn push_row(&mut self, row: Vec<String>) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// Extend `row` with empty cells until it has at least `len` cells.
    /// Returns false, leaving the grid untouched, when `row` does not exist.
    pub fn pad_row(&mut self, row: usize, len: usize) -> bool {
        let Some(cells) = self.rows.get_mut(row) else {
            return false;
        };
        if cells.len() < len {
            cells.resize(len, String::new());
        }
        true
    }

    /// Pad `row` through `col` and write `value` there.
    /// Returns false, leaving the grid untouched, when `row` does not exist.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> bool {
        if !self.pad_row(row, col + 1) {
            return false;
        }
        self.rows[row][col] = value.into();
        true
    }

    /// Insert an empty cell at `col` in every row holding at least `min_len`
    /// cells. Shorter rows are left alone. `min_len` must be at least `col`.
    pub fn insert_column(&mut self, col: usize, min_len: usize) {
        debug_assert!(min_len >= col);
        for row in &mut self.rows {
            if row.len() >= min_len {
                row.insert(col, String::new());
            }
        }
    }

    /// Pad every row to the grid width.
    pub fn normalize(&mut self) {
        let width = self.width();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }
}

impl From<Vec<Vec<String>>> for Grid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::from_rows(rows)
    }
}

/// Build a grid from string literals; handy in tests and fixtures.
impl<const N: usize> From<[&[&str]; N]> for Grid {
    fn from(rows: [&[&str]; N]) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }
}
