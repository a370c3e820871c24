use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue, InvalidHeaderValue};

/// An [`HttpClient`] wrapper that sends an Elasticsearch API key on every
/// request as `Authorization: ApiKey <key>`.
pub struct ApiKey<C> {
    inner: C,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// `key` is the base64-encoded `id:api_key` pair issued by the cluster.
    pub fn new(inner: C, key: &str) -> Result<Self, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("ApiKey {key}"))?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    #[test]
    fn test_rejects_key_with_newline() {
        assert!(ApiKey::new(BasicClient::new(), "abc\ndef").is_err());
    }

    #[test]
    fn test_header_value_is_sensitive() {
        let client = ApiKey::new(BasicClient::new(), "c2VjcmV0").unwrap();
        assert!(client.value.is_sensitive());
        assert_eq!(client.value.to_str().unwrap(), "ApiKey c2VjcmV0");
    }
}
