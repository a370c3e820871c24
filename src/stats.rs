use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::{IndexRecord, Normalized};

/// Default number of entries kept in each ranking.
pub const TOP_N: usize = 5;

/// The three rankings computed over one run's records.
#[derive(Debug, Serialize)]
pub struct IndexReport {
    pub generated_at: DateTime<Utc>,
    /// Valid records that went into the rankings.
    pub total_indexes: usize,
    /// Raw records rejected during normalization.
    pub dropped: usize,

    /// Descending primary store size.
    pub largest: Vec<IndexRecord>,
    /// Descending primary shard count.
    pub most_shards: Vec<IndexRecord>,
    /// Descending GB per shard.
    pub least_balanced: Vec<IndexRecord>,
}

impl IndexReport {
    pub fn from_records(records: &[IndexRecord], top_n: usize) -> Self {
        IndexReport {
            generated_at: Utc::now(),
            total_indexes: records.len(),
            dropped: 0,
            largest: top_by(records, top_n, |r| r.size_hundredths),
            most_shards: top_by(records, top_n, |r| r.shard_count),
            least_balanced: top_by(records, top_n, |r| r.balance_ratio),
        }
    }

    pub fn from_normalized(normalized: &Normalized, top_n: usize) -> Self {
        IndexReport {
            dropped: normalized.dropped,
            ..Self::from_records(&normalized.records, top_n)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_indexes == 0
    }
}

/// Returns the `n` records with the largest key; ties keep input order.
fn top_by<K: Ord>(
    records: &[IndexRecord],
    n: usize,
    key: impl Fn(&IndexRecord) -> K,
) -> Vec<IndexRecord> {
    let mut ranked: Vec<&IndexRecord> = records.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| key(*b).cmp(&key(*a)));
    ranked.into_iter().take(n).cloned().collect()
}
