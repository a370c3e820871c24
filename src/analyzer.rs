//! Runs one analysis: fetch, normalize, rank.

use tracing::info;

use crate::error::SourceError;
use crate::record::normalize;
use crate::source::RecordSource;
use crate::stats::IndexReport;

/// Pulls every raw row from `source` and ranks the valid ones.
///
/// # Errors
///
/// Only a [`SourceError`] stops the run; invalid rows are counted in
/// [`IndexReport::dropped`].
#[tracing::instrument(skip(source), fields(origin = %source.describe()))]
pub async fn analyze(source: &dyn RecordSource, top_n: usize) -> Result<IndexReport, SourceError> {
    let raws = source.fetch().await?;
    info!(rows = raws.len(), "Index rows loaded");

    let normalized = normalize(&raws);
    let report = IndexReport::from_normalized(&normalized, top_n);

    if report.is_empty() {
        info!("No valid index records found");
    } else {
        info!(
            indexes = report.total_indexes,
            dropped = report.dropped,
            "Index rankings computed"
        );
    }

    Ok(report)
}
