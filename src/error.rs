//! Error types for index_stats.
//!
//! [`SourceError`] is fatal: the whole input could not be read. [`RecordError`]
//! only ever rejects a single record and is recovered by the normalizer.

use chrono::NaiveDate;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The input source as a whole is unreadable or not a collection of records.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{origin} did not contain a JSON array of records")]
    NotACollection { origin: String },

    #[error("invalid request URL {url}: {reason}")]
    Url { url: String, reason: String },

    #[error("request to {endpoint} for {date} failed: {source}")]
    Fetch {
        endpoint: String,
        date: NaiveDate,
        source: FetchError,
    },
}

/// A single HTTP round trip did not produce a JSON body.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A single raw record failed validation and is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing or empty index name")]
    MissingName,

    #[error("invalid primary store size: {0}")]
    InvalidSize(String),

    #[error("invalid primary shard count: {0}")]
    InvalidShards(String),
}

/// Command-line options that do not form a usable configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--endpoint is required in api mode")]
    MissingEndpoint,

    #[error("--days must be at least 1")]
    ZeroDays,

    #[error("--days must be at most {0}")]
    TooManyDays(u32),

    #[error("--top must be at least 1")]
    ZeroTop,

    #[error("unknown time zone: {0}")]
    UnknownTimezone(String),

    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,
}
