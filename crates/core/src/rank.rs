use crate::error::{CoreError, Result};
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Fixed rank ranges used by summaries and digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBucket {
    Top3,
    Top10,
    Top50,
    Other,
}

impl RankBucket {
    pub const ALL: [RankBucket; 4] = [
        RankBucket::Top3,
        RankBucket::Top10,
        RankBucket::Top50,
        RankBucket::Other,
    ];

    /// Label written in column 0 of the bucket's summary row.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RankBucket::Top3 => "1-3",
            RankBucket::Top10 => "4-10",
            RankBucket::Top50 => "11-50",
            RankBucket::Other => "other",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            RankBucket::Top3 => 0,
            RankBucket::Top10 => 1,
            RankBucket::Top50 => 2,
            RankBucket::Other => 3,
        }
    }
}

/// Bucket a rank. Total over all integers: unranked (`<= 0`) and deep ranks
/// both land in [`RankBucket::Other`].
#[must_use]
pub const fn classify(rank: i64) -> RankBucket {
    match rank {
        1..=3 => RankBucket::Top3,
        4..=10 => RankBucket::Top10,
        11..=50 => RankBucket::Top50,
        _ => RankBucket::Other,
    }
}

/// Frequency of each bucket over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankHistogram {
    counts: [usize; 4],
}

impl RankHistogram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut histogram = Self::new();
        for record in records {
            histogram.add(record.rank);
        }
        histogram
    }

    pub fn add(&mut self, rank: i64) {
        self.counts[classify(rank).index()] += 1;
    }

    #[must_use]
    pub const fn count(&self, bucket: RankBucket) -> usize {
        self.counts[bucket.index()]
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Percentages of total per bucket. Fails on an empty histogram instead of
    /// dividing by zero.
    pub fn distribution(&self) -> Result<RankDistribution> {
        let total = self.total();
        if total == 0 {
            return Err(CoreError::EmptyBatch);
        }
        let shares = RankBucket::ALL.map(|bucket| {
            let count = self.count(bucket);
            BucketShare {
                bucket,
                count,
                percent: percent_of(count, total),
            }
        });
        Ok(RankDistribution { total, shares })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketShare {
    pub bucket: RankBucket,
    pub count: usize,
    pub percent: f64,
}

/// Histogram plus percentages; the value shared by the summary block and the notifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankDistribution {
    pub total: usize,
    pub shares: [BucketShare; 4],
}

impl RankDistribution {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<Self> {
        RankHistogram::from_records(records).distribution()
    }

    #[must_use]
    pub const fn share(&self, bucket: RankBucket) -> &BucketShare {
        &self.shares[bucket.index()]
    }

    /// Summary cell text, e.g. `50.00% (1)`.
    #[must_use]
    pub fn cell(&self, bucket: RankBucket) -> String {
        let share = self.share(bucket);
        format!("{:.2}% ({})", share.percent, share.count)
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn percent_of(count: usize, total: usize) -> f64 {
    count as f64 / total as f64 * 100.0
}
