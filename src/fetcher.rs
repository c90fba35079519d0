use crate::error::Result;
use reqwest::Client;
use sha1::{Digest, Sha1};
use std::time::Duration;
use url::Url;

pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;
        Ok(html)
    }
}

/// Fingerprint of a plain GET request for `url`, hex encoded.
///
/// SHA-1 of the sorted-key JSON of an empty body, no headers, the method and
/// the canonical URL. The canonical URL has no fragment and sorted query pairs.
pub fn request_fingerprint(url: &Url) -> String {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    if let Some(query) = url.query() {
        let mut pairs: Vec<&str> = query.split('&').filter(|pair| !pair.is_empty()).collect();
        pairs.sort_unstable();
        if pairs.is_empty() {
            canonical.set_query(None);
        } else {
            canonical.set_query(Some(&pairs.join("&")));
        }
    }

    let data = format!(
        r#"{{"body": "", "headers": {{}}, "method": "GET", "url": {}}}"#,
        serde_json::Value::from(canonical.as_str())
    );
    let mut hasher = Sha1::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}
