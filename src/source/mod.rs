//! Sources of raw `_cat/indices` rows.
//!
//! Both strategies hand back rows in the same shape, so the normalizer and the
//! aggregator never know where the data came from.

mod file;
mod windowed;

pub use file::FileSource;
pub use windowed::{WindowedApiSource, cat_indices_url, window_dates};

use crate::error::SourceError;
use serde_json::Value;

/// Produces the raw records for one analysis run.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable origin used in logs.
    fn describe(&self) -> String;

    /// Returns every raw row the source holds.
    ///
    /// An empty collection is a valid result; an unreadable or malformed
    /// source is a [`SourceError`].
    async fn fetch(&self) -> Result<Vec<Value>, SourceError>;
}
