//! HTTP plumbing for the `_cat/indices` API.

mod auth;
mod basic;
mod client;

pub use auth::ApiKey;
pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::FetchError;
use reqwest::Url;
use serde_json::Value;

/// Issues a GET for `url` and decodes the body as JSON.
///
/// # Errors
///
/// Fails on transport errors, on any non-2xx status, and on bodies that are
/// not valid JSON.
pub async fn fetch_json<C: HttpClient + ?Sized>(client: &C, url: Url) -> Result<Value, FetchError> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
