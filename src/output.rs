//! Report rendering and persistence.
//!
//! Supports the plain-text console report, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::record::IndexRecord;
use crate::stats::IndexReport;

/// Writes the three rankings as a human-readable report.
pub fn write_report<W: Write>(w: &mut W, report: &IndexReport) -> Result<()> {
    writeln!(w, "Largest indexes by storage size")?;
    section(w, &report.largest, false)?;

    writeln!(w)?;
    writeln!(w, "Indexes with the most shards")?;
    section(w, &report.most_shards, false)?;

    writeln!(w)?;
    writeln!(w, "Least balanced indexes")?;
    section(w, &report.least_balanced, true)?;

    Ok(())
}

fn section<W: Write>(w: &mut W, records: &[IndexRecord], with_balance: bool) -> Result<()> {
    if records.is_empty() {
        writeln!(w, "  (no indexes)")?;
    }
    for r in records {
        writeln!(w, "Index: {}", r.name)?;
        writeln!(w, "  Size: {:.2} GB", r.size_gb)?;
        writeln!(w, "  Shards: {}", r.shard_count)?;
        if with_balance {
            writeln!(w, "  Balance Ratio: {}", r.balance_ratio)?;
            writeln!(w, "  Recommended shard count: {}", r.recommended_shards)?;
        }
    }
    Ok(())
}

/// Writes the report as pretty-printed JSON.
pub fn write_json<W: Write>(w: &mut W, report: &IndexReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, report)?;
    writeln!(w)?;
    Ok(())
}

/// One ranked entry, flattened for CSV.
#[derive(Debug, Serialize)]
struct RankingRow<'a> {
    generated_at: DateTime<Utc>,
    ranking: &'static str,
    rank: usize,
    index: &'a str,
    size_gb: f64,
    shard_count: u64,
    balance_ratio: u64,
    recommended_shards: u64,
}

/// Appends every ranked entry of `report` as a row to a CSV file.
///
/// Writes the header row whenever the file is missing or still empty, so a
/// run with no rows never leaves a headerless file behind.
pub fn append_report(path: &Path, report: &IndexReport) -> Result<()> {
    let needs_header = path.metadata().map(|m| m.len() == 0).unwrap_or(true);
    debug!(path = %path.display(), needs_header, "Appending CSV report");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(needs_header) // IMPORTANT when appending
        .from_writer(file);

    let rankings = [
        ("largest", &report.largest),
        ("most_shards", &report.most_shards),
        ("least_balanced", &report.least_balanced),
    ];
    for (ranking, records) in rankings {
        for (i, r) in records.iter().enumerate() {
            writer.serialize(RankingRow {
                generated_at: report.generated_at,
                ranking,
                rank: i + 1,
                index: &r.name,
                size_gb: r.size_gb,
                shard_count: r.shard_count,
                balance_ratio: r.balance_ratio,
                recommended_shards: r.recommended_shards,
            })?;
        }
    }
    writer.flush()?;

    Ok(())
}
