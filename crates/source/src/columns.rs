use crate::error::{Result, SourceError};
use csv::StringRecord;

/// Fields the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Keyword,
    Rank,
    RankDelta,
    Groups,
    RankingUrl,
}

impl Column {
    /// Match a header cell against the tracker's export headers and their
    /// English aliases.
    pub fn from_header(raw: &str) -> Option<Self> {
        let name = raw.trim_start_matches('\u{feff}').trim().to_ascii_lowercase();
        let column = match name.as_str() {
            "日時" | "日付" | "datetime" | "date" => Self::Date,
            "キーワード" | "keyword" => Self::Keyword,
            "順位" | "rank" => Self::Rank,
            "前日比" | "rank_delta" | "change" => Self::RankDelta,
            "グループ" | "groups" | "group" => Self::Groups,
            "ランクインしているurl" | "ranking_url" | "url" => Self::RankingUrl,
            _ => return None,
        };
        Some(column)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Keyword => "keyword",
            Self::Rank => "rank",
            Self::RankDelta => "rank_delta",
            Self::Groups => "groups",
            Self::RankingUrl => "ranking_url",
        }
    }
}

/// Column indices resolved from a header row. When a field appears twice the
/// leftmost column wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub keyword: usize,
    pub rank: Option<usize>,
    pub rank_delta: Option<usize>,
    pub groups: Option<usize>,
    pub ranking_url: Option<usize>,
}

impl ColumnMap {
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |wanted: Column| {
            headers
                .iter()
                .position(|cell| Column::from_header(cell) == Some(wanted))
        };
        let require = |wanted: Column| {
            find(wanted).ok_or_else(|| SourceError::MissingColumn(wanted.name().to_string()))
        };

        Ok(Self {
            date: require(Column::Date)?,
            keyword: require(Column::Keyword)?,
            rank: find(Column::Rank),
            rank_delta: find(Column::RankDelta),
            groups: find(Column::Groups),
            ranking_url: find(Column::RankingUrl),
        })
    }
}
