use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info};

use super::RecordSource;
use crate::error::SourceError;
use crate::fetch::{HttpClient, fetch_json};

/// Fetches `_cat/indices` one calendar day at a time over a trailing window.
pub struct WindowedApiSource {
    client: Box<dyn HttpClient>,
    endpoint: String,
    days: u32,
    today: NaiveDate,
}

impl WindowedApiSource {
    /// `today` is the newest day of the window; `days` counts it.
    pub fn new(
        client: Box<dyn HttpClient>,
        endpoint: impl Into<String>,
        days: u32,
        today: NaiveDate,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            days,
            today,
        }
    }
}

/// Dates covered by a window ending at `today`, newest first.
pub fn window_dates(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .filter_map(|i| today.checked_sub_days(Days::new(i.into())))
        .collect()
}

/// Builds the verbose `_cat/indices` JSON query for the indices of one day.
///
/// The endpoint is used as the base URL when it carries a scheme, otherwise
/// `https://` is assumed.
pub fn cat_indices_url(endpoint: &str, date: NaiveDate) -> Result<Url, SourceError> {
    let endpoint = endpoint.trim_end_matches('/');
    let base = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };

    let raw = format!(
        "{base}/_cat/indices/{}?v&h=index,pri.store.size,pri&format=json&bytes=b",
        date.format("*%Y*%m*%d")
    );
    Url::parse(&raw).map_err(|e| SourceError::Url {
        url: raw.clone(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl RecordSource for WindowedApiSource {
    fn describe(&self) -> String {
        format!("{} ({} days to {})", self.endpoint, self.days, self.today)
    }

    #[tracing::instrument(
        skip(self),
        fields(endpoint = %self.endpoint, days = self.days, today = %self.today)
    )]
    async fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        let mut rows = Vec::new();

        for date in window_dates(self.today, self.days) {
            let url = cat_indices_url(&self.endpoint, date)?;
            debug!(%date, %url, "Requesting indices for day");

            let body = fetch_json(self.client.as_ref(), url)
                .await
                .map_err(|source| SourceError::Fetch {
                    endpoint: self.endpoint.clone(),
                    date,
                    source,
                })?;

            let Value::Array(daily) = body else {
                return Err(SourceError::NotACollection {
                    origin: format!("{} for {date}", self.endpoint),
                });
            };

            info!(%date, rows = daily.len(), "Fetched indices for day");
            rows.extend(daily);
        }

        Ok(rows)
    }
}
