use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

use super::RecordSource;
use crate::error::SourceError;

/// Reads a JSON array of rows from a local file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Read {
                path: self.path.clone(),
                source,
            })?;

        let value: Value = serde_json::from_slice(&content).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let Value::Array(rows) = value else {
            return Err(SourceError::NotACollection {
                origin: self.describe(),
            });
        };

        if rows.is_empty() {
            info!("JSON file contains no entries");
        }
        Ok(rows)
    }
}
