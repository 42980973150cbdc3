use crate::error::{CoreError, Result};
use crate::rank::{classify, RankBucket};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day-granularity format used for date column keys.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// One keyword's rank measurement for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub keyword: String,
    /// `0` (or anything below 1) means unranked.
    #[serde(default)]
    pub rank: i64,
    /// Change since the previous measurement; positive means the keyword moved up.
    #[serde(default)]
    pub rank_delta: i64,
    #[serde(default)]
    pub ranking_url: String,
    /// Destination groups in first-seen order, without duplicates.
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Record {
    pub fn new(date: NaiveDate, keyword: impl Into<String>) -> Self {
        Self {
            date,
            keyword: keyword.into(),
            rank: 0,
            rank_delta: 0,
            ranking_url: String::new(),
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = rank;
        self
    }

    #[must_use]
    pub fn with_rank_delta(mut self, rank_delta: i64) -> Self {
        self.rank_delta = rank_delta;
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.ranking_url = url.into();
        self
    }

    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.clear();
        for group in groups {
            let group = group.into();
            if !self.groups.contains(&group) {
                self.groups.push(group);
            }
        }
        self
    }

    #[must_use]
    pub fn date_key(&self) -> String {
        date_key(self.date)
    }

    #[must_use]
    pub const fn bucket(&self) -> RankBucket {
        classify(self.rank)
    }
}

#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Keep only the records measured on `day`.
#[must_use]
pub fn records_for_day(records: &[Record], day: NaiveDate) -> Vec<Record> {
    records.iter().filter(|r| r.date == day).cloned().collect()
}

/// The single day shared by every record of a merge batch.
///
/// Fails on an empty batch, on records from more than one day, and on records
/// without a keyword (a blank keyword would match blank grid rows).
pub fn batch_date(records: &[Record]) -> Result<NaiveDate> {
    let first = records.first().ok_or(CoreError::EmptyBatch)?;
    for record in records {
        if record.date != first.date {
            return Err(CoreError::MixedDates {
                expected: first.date_key(),
                found: record.date_key(),
            });
        }
        if record.keyword.trim().is_empty() {
            return Err(CoreError::InvalidRecord(format!(
                "record dated {} has an empty keyword",
                record.date_key()
            )));
        }
    }
    Ok(first.date)
}
