//! # Rankbook Source
//!
//! Decodes rank-tracker CSV exports into [`Record`]s.
//!
//! The decoder is header-driven: columns may appear in any order, rows may be
//! ragged, and a UTF-8 BOM on the first header is ignored. Both the tracker's
//! own export headers and plain English aliases are accepted.
//!
//! ```
//! let csv = "date,keyword,rank,groups\n2024-01-01,shoes,2,\"retail,sale\"\n";
//! let records = rankbook_source::parse_records(csv).unwrap();
//! assert_eq!(records[0].rank, 2);
//! assert_eq!(records[0].groups, vec!["retail", "sale"]);
//! ```

mod columns;
mod error;
mod fields;

pub use columns::{Column, ColumnMap};
pub use error::{Result, SourceError};
pub use fields::{parse_day, parse_rank, split_groups};

use csv::{ReaderBuilder, StringRecord};
use rankbook_core::Record;
use std::io::Read;
use std::path::Path;

/// Decode CSV text.
pub fn parse_records(text: &str) -> Result<Vec<Record>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    read_records(text.as_bytes())
}

/// Decode CSV from any reader.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let columns = ColumnMap::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1.
        let line = index + 2;
        match decode_row(&columns, &row) {
            Ok(record) => records.push(record),
            Err(reason) => {
                skipped += 1;
                log::warn!("Skipping CSV line {line}: {reason}");
            }
        }
    }

    if skipped > 0 {
        log::info!("Decoded {} records ({skipped} rows skipped)", records.len());
    } else {
        log::debug!("Decoded {} records", records.len());
    }
    Ok(records)
}

/// Read and decode a CSV file.
pub async fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await?;
    log::debug!("Loaded {} bytes from {}", text.len(), path.display());
    parse_records(&text)
}

fn decode_row(columns: &ColumnMap, row: &StringRecord) -> std::result::Result<Record, String> {
    let cell = |index: Option<usize>| index.and_then(|i| row.get(i)).unwrap_or("");

    let raw_date = cell(Some(columns.date));
    let date = parse_day(raw_date).ok_or_else(|| format!("unreadable date {raw_date:?}"))?;
    let keyword = cell(Some(columns.keyword)).trim();
    if keyword.is_empty() {
        return Err("empty keyword".to_string());
    }

    Ok(Record::new(date, keyword)
        .with_rank(parse_rank(cell(columns.rank)))
        .with_rank_delta(parse_rank(cell(columns.rank_delta)))
        .with_url(cell(columns.ranking_url).trim())
        .with_groups(split_groups(cell(columns.groups))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const TRACKER_EXPORT: &str = "\u{feff}日時,キーワード,順位,前日比,グループ,ランクインしているURL
2024/01/05 06:00,shoes,2,1,\"retail、sale\",https://example.com/shoes
2024/01/05 06:00,boots,15位,-4,,
2024/01/05 06:00,hats,-,,retail,https://example.com/hats
";

    #[test]
    fn decodes_tracker_export() {
        let records = parse_records(TRACKER_EXPORT).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        assert_eq!(
            records,
            vec![
                Record::new(day, "shoes")
                    .with_rank(2)
                    .with_rank_delta(1)
                    .with_url("https://example.com/shoes")
                    .with_groups(["retail", "sale"]),
                Record::new(day, "boots").with_rank(15).with_rank_delta(-4),
                Record::new(day, "hats")
                    .with_url("https://example.com/hats")
                    .with_groups(["retail"]),
            ]
        );
    }

    #[test]
    fn bad_rows_are_skipped() {
        let csv = "date,keyword,rank\nnot-a-date,shoes,1\n2024-01-01,,2\n2024-01-01,boots,3\n2024-01-01\n";
        let records = parse_records(csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].keyword, "boots");
    }

    #[test]
    fn missing_required_column_fails() {
        let err = parse_records("keyword,rank\nshoes,1\n").unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn(_)));
    }
}
