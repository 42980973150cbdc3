use crate::error::Result;
use crate::rank::{percent_of, RankDistribution};
use crate::record::{batch_date, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimum absolute day-over-day change listed as a big move.
pub const BIG_MOVE_THRESHOLD: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankMove {
    pub keyword: String,
    pub rank: i64,
    /// Absolute size of the move.
    pub change: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeStats {
    pub improved: usize,
    pub worsened: usize,
    pub unchanged: usize,
    pub improved_percent: f64,
    pub worsened_percent: f64,
    pub unchanged_percent: f64,
    pub big_winners: Vec<RankMove>,
    pub big_losers: Vec<RankMove>,
}

impl ChangeStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut stats = Self::default();
        for record in records {
            let delta = record.rank_delta;
            let bucket = match delta.signum() {
                1 => {
                    stats.improved += 1;
                    Some(&mut stats.big_winners)
                }
                -1 => {
                    stats.worsened += 1;
                    Some(&mut stats.big_losers)
                }
                _ => {
                    stats.unchanged += 1;
                    None
                }
            };
            if let Some(moves) = bucket {
                if delta.abs() >= BIG_MOVE_THRESHOLD {
                    moves.push(RankMove {
                        keyword: record.keyword.clone(),
                        rank: record.rank,
                        change: delta.abs(),
                    });
                }
            }
        }

        let total = stats.improved + stats.worsened + stats.unchanged;
        if total > 0 {
            stats.improved_percent = percent_of(stats.improved, total);
            stats.worsened_percent = percent_of(stats.worsened, total);
            stats.unchanged_percent = percent_of(stats.unchanged, total);
        }
        for moves in [&mut stats.big_winners, &mut stats.big_losers] {
            moves.sort_by(|a, b| {
                b.change
                    .cmp(&a.change)
                    .then_with(|| a.keyword.cmp(&b.keyword))
            });
        }
        stats
    }
}

/// Everything the notifier needs about one day's batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankDigest {
    pub date: NaiveDate,
    pub distribution: RankDistribution,
    pub changes: ChangeStats,
}

impl RankDigest {
    pub fn compute(records: &[Record]) -> Result<Self> {
        let date = batch_date(records)?;
        Ok(Self {
            date,
            distribution: RankDistribution::from_records(records)?,
            changes: ChangeStats::from_records(records),
        })
    }
}
