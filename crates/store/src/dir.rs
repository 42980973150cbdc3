use crate::error::{Result, StoreError};
use crate::store::ReportStore;
use async_trait::async_trait;
use csv::{ReaderBuilder, WriterBuilder};
use rankbook_core::Grid;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const REPORT_SCHEMA_VERSION: u32 = 1;

/// On-disk encoding of a report file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ReportFile {
    schema_version: u32,
    name: String,
    rows: Grid,
}

/// File stem for a report name.
///
/// Unicode alphanumerics, `-`, `_` and `.` are kept; everything else becomes
/// `_`. Names that are empty or made only of dots are rejected.
pub fn sanitize_report_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name.chars().all(|c| c == '.') {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(name
        .chars()
        .map(|c| match c {
            '-' | '_' | '.' => c,
            c if c.is_alphanumeric() => c,
            _ => '_',
        })
        .collect())
}

/// Split CSV bytes into physical records on line feeds outside quoted
/// fields, dropping a trailing carriage return. A final terminator does not
/// start another line.
fn csv_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    // At a field start, or right after a closing quote where `""` escapes one.
    let mut may_open = true;
    for (i, &b) in bytes.iter().enumerate() {
        if quoted {
            if b == b'"' {
                quoted = false;
                may_open = true;
            }
            continue;
        }
        match b {
            b'"' if may_open => quoted = true,
            b'\n' => {
                let line = &bytes[start..i];
                lines.push(line.strip_suffix(b"\r").unwrap_or(line));
                start = i + 1;
                may_open = true;
            }
            b',' => may_open = true,
            _ => may_open = false,
        }
    }
    if start < bytes.len() {
        lines.push(&bytes[start..]);
    }
    lines
}

/// One file per report under a root directory.
#[derive(Debug, Clone)]
pub struct DirReportStore {
    root: PathBuf,
    format: ReportFormat,
}

impl DirReportStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>, format: ReportFormat) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        log::debug!("Opened report store at {} ({format:?})", root.display());
        Ok(Self { root, format })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn format(&self) -> ReportFormat {
        self.format
    }

    pub fn path_for(&self, report: &str) -> Result<PathBuf> {
        let stem = sanitize_report_name(report)?;
        Ok(self
            .root
            .join(format!("{stem}.{}", self.format.extension())))
    }

    fn decode(&self, report: &str, bytes: &[u8]) -> Result<Grid> {
        match self.format {
            ReportFormat::Csv => {
                // The csv reader skips empty lines, so blank separator rows
                // are split off here and only non-empty lines are parsed.
                let mut rows = Vec::new();
                for line in csv_lines(bytes) {
                    if line.is_empty() {
                        rows.push(Vec::new());
                        continue;
                    }
                    let mut reader = ReaderBuilder::new()
                        .has_headers(false)
                        .flexible(true)
                        .from_reader(line);
                    for record in reader.records() {
                        rows.push(record?.iter().map(str::to_string).collect());
                    }
                }
                Ok(Grid::from_rows(rows))
            }
            ReportFormat::Json => {
                let file: ReportFile = serde_json::from_slice(bytes)?;
                if file.schema_version != REPORT_SCHEMA_VERSION {
                    return Err(StoreError::Other(format!(
                        "report {report} has schema version {}, expected {REPORT_SCHEMA_VERSION}",
                        file.schema_version
                    )));
                }
                Ok(file.rows)
            }
        }
    }

    fn encode(&self, report: &str, grid: &Grid) -> Result<Vec<u8>> {
        match self.format {
            ReportFormat::Csv => {
                let mut writer = WriterBuilder::new()
                    .has_headers(false)
                    .flexible(true)
                    .from_writer(Vec::new());
                for row in grid.rows() {
                    writer.write_record(row)?;
                }
                writer.flush()?;
                writer
                    .into_inner()
                    .map_err(|e| StoreError::Other(e.to_string()))
            }
            ReportFormat::Json => {
                let file = ReportFile {
                    schema_version: REPORT_SCHEMA_VERSION,
                    name: report.to_string(),
                    rows: grid.clone(),
                };
                Ok(serde_json::to_vec_pretty(&file)?)
            }
        }
    }
}

#[async_trait]
impl ReportStore for DirReportStore {
    async fn get(&self, report: &str) -> Result<Grid> {
        let path = self.path_for(report)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(report.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        self.decode(report, &bytes)
    }

    async fn put(&self, report: &str, grid: &Grid) -> Result<()> {
        let path = self.path_for(report)?;
        let bytes = self.encode(report, grid)?;

        let tmp = path.with_extension(format!("{}.tmp", self.format.extension()));
        tokio::fs::write(&tmp, bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                log::warn!("Failed to remove {}: {cleanup}", tmp.display());
            }
            return Err(e.into());
        }
        log::debug!("Wrote {} rows to {}", grid.row_count(), path.display());
        Ok(())
    }

    fn destination(&self, report: &str) -> String {
        sanitize_report_name(report).unwrap_or_else(|_| report.to_string())
    }

    async fn reports(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(self.format.extension()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_unicode_and_replaces_separators() {
        assert_eq!(sanitize_report_name("retail").unwrap(), "retail");
        assert_eq!(sanitize_report_name("靴 / 2024").unwrap(), "靴___2024");
        assert_eq!(sanitize_report_name(" a.b-c_d ").unwrap(), "a.b-c_d");
    }

    #[test]
    fn sanitize_rejects_empty_and_dot_names() {
        for name in ["", "  ", ".", ".."] {
            assert!(matches!(
                sanitize_report_name(name),
                Err(StoreError::InvalidName(_))
            ));
        }
    }

    #[test]
    fn csv_encoding_keeps_quoted_cells() {
        let store = DirReportStore {
            root: PathBuf::new(),
            format: ReportFormat::Csv,
        };
        let grid = Grid::from([&["keyword", "url", "2024-01-01"][..], &["a,b", "", "\"x\""][..]]);
        let bytes = store.encode("r", &grid).unwrap();
        assert_eq!(store.decode("r", &bytes).unwrap(), grid);
    }

    #[test]
    fn csv_lines_split_outside_quotes_only() {
        let bytes = b"a,\"x\ny\"\r\n\r\n\"say \"\"hi\"\"\",b\nc";
        let lines = csv_lines(bytes);
        assert_eq!(
            lines,
            vec![
                &b"a,\"x\ny\""[..],
                &b""[..],
                &b"\"say \"\"hi\"\"\",b"[..],
                &b"c"[..],
            ]
        );
        assert_eq!(csv_lines(b"a\n\n"), vec![&b"a"[..], &b""[..]]);
        assert!(csv_lines(b"").is_empty());
    }
}
