//! Normalization of raw `_cat/indices` rows into typed [`IndexRecord`]s.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RecordError;

/// Column holding the index name.
pub const NAME_FIELD: &str = "index";
/// Column holding the primary store size in bytes.
pub const SIZE_FIELD: &str = "pri.store.size";
/// Column holding the primary shard count.
pub const SHARDS_FIELD: &str = "pri";

/// Target size of a single shard, in GB.
pub const SHARD_TARGET_GB: u64 = 30;

const BYTES_PER_HUNDREDTH_GB: u64 = 10_000_000;

/// One validated index with its derived sizing figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexRecord {
    pub name: String,
    pub size_bytes: u64,
    /// `size_bytes / 1000^3`, rounded half up to two decimals.
    pub size_gb: f64,
    pub shard_count: u64,
    /// `floor(size_gb / shard_count)`.
    pub balance_ratio: u64,
    /// `floor(size_gb / 30)`, never below 1.
    pub recommended_shards: u64,
    #[serde(skip)]
    pub(crate) size_hundredths: u64,
}

impl IndexRecord {
    /// Builds a record from already-typed values.
    pub fn new(
        name: impl Into<String>,
        size_bytes: u64,
        shard_count: u64,
    ) -> Result<Self, RecordError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecordError::MissingName);
        }
        if shard_count == 0 {
            return Err(RecordError::InvalidShards("0".to_string()));
        }

        // Round half up in integer hundredths so 2-decimal values are exact.
        let size_hundredths = size_bytes / BYTES_PER_HUNDREDTH_GB
            + u64::from(size_bytes % BYTES_PER_HUNDREDTH_GB >= BYTES_PER_HUNDREDTH_GB / 2);
        let whole_gb = size_hundredths / 100;

        Ok(Self {
            name,
            size_bytes,
            size_gb: size_hundredths as f64 / 100.0,
            shard_count,
            balance_ratio: whole_gb / shard_count,
            recommended_shards: (whole_gb / SHARD_TARGET_GB).max(1),
            size_hundredths,
        })
    }

    /// Validates one raw row and converts it.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordError`] found, checking the name, then the
    /// size, then the shard count.
    pub fn from_raw(raw: &Value) -> Result<Self, RecordError> {
        let obj = raw.as_object().ok_or(RecordError::NotAnObject)?;

        let name = match obj.get(NAME_FIELD) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            _ => return Err(RecordError::MissingName),
        };
        let size_bytes = parse_size(obj.get(SIZE_FIELD))?;
        let shard_count = parse_shards(obj.get(SHARDS_FIELD))?;

        Self::new(name, size_bytes, shard_count)
    }
}

fn parse_size(value: Option<&Value>) -> Result<u64, RecordError> {
    let invalid = |v: &Value| RecordError::InvalidSize(v.to_string());
    match value {
        None | Some(Value::Null) => Err(RecordError::InvalidSize("missing".to_string())),
        Some(v @ Value::Number(n)) => match n.as_u64() {
            Some(bytes) => Ok(bytes),
            None => n.as_f64().and_then(whole_bytes).ok_or_else(|| invalid(v)),
        },
        Some(v @ Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_bytes))
                .ok_or_else(|| invalid(v))
        }
        Some(v) => Err(invalid(v)),
    }
}

// `u64::MAX as f64` rounds up to 2^64, which is itself out of range.
fn whole_bytes(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f < u64::MAX as f64).then(|| f.trunc() as u64)
}

fn parse_shards(value: Option<&Value>) -> Result<u64, RecordError> {
    let count = match value {
        None | Some(Value::Null) => {
            return Err(RecordError::InvalidShards("missing".to_string()));
        }
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    match count {
        Some(n) if n > 0 => Ok(n as u64),
        _ => Err(RecordError::InvalidShards(
            value.map(Value::to_string).unwrap_or_default(),
        )),
    }
}

/// Result of normalizing a batch of raw rows.
#[derive(Debug, Default)]
pub struct Normalized {
    /// Valid records, in input order.
    pub records: Vec<IndexRecord>,
    /// Number of raw rows that failed validation.
    pub dropped: usize,
}

/// Converts every raw row, skipping the ones that fail validation.
pub fn normalize(raws: &[Value]) -> Normalized {
    let mut out = Normalized::default();

    for (position, raw) in raws.iter().enumerate() {
        match IndexRecord::from_raw(raw) {
            Ok(record) => out.records.push(record),
            Err(e) => {
                debug!(position, error = %e, record = %raw, "Skipping invalid index record");
                out.dropped += 1;
            }
        }
    }

    if out.dropped > 0 {
        warn!(
            dropped = out.dropped,
            kept = out.records.len(),
            "Skipped invalid index records"
        );
    }

    out
}
