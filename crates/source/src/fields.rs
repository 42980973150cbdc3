//! Cell-level decoding for tracker exports.

use chrono::NaiveDate;

const DAY_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Calendar day of a timestamp cell such as `2024/01/05 09:30`. The
/// time-of-day, if any, is dropped.
#[must_use]
pub fn parse_day(cell: &str) -> Option<NaiveDate> {
    let day = cell
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()?;
    DAY_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(day, format).ok())
}

/// Leading integer of a cell, or 0 when there is none.
///
/// `"12"` and `"12位"` give 12, `"-3"` gives -3, while `"-"`, `""` and `"圏外"`
/// give 0.
#[must_use]
pub fn parse_rank(cell: &str) -> i64 {
    let cell = cell.trim();
    let (sign, digits) = match cell.as_bytes().first() {
        Some(b'-') => (-1, &cell[1..]),
        Some(b'+') => (1, &cell[1..]),
        _ => (1, cell),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |value| sign * value)
}

/// Split a multi-valued group cell. Pieces are trimmed, empty pieces
/// dropped, and duplicates removed keeping first-seen order.
#[must_use]
pub fn split_groups(cell: &str) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for piece in cell.split([',', '、', ';', '\n', '\r']) {
        let piece = piece.trim();
        if !piece.is_empty() && !groups.iter().any(|g| g == piece) {
            groups.push(piece.to_string());
        }
    }
    groups
}
