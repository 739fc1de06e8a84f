//! Open Library books API client
//!
//! `GET /api/books?bibkeys=ISBN:<isbn>&format=json&jscmd=data` answers with a
//! mapping from `ISBN:<isbn>` to the edition data. An absent key means the
//! ISBN is unknown.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::Config;
use crate::domain::{LookupError, RawRecord, RecordFetcher};

pub const DEFAULT_API_URL: &str = "https://openlibrary.org/api/books";
pub const DEFAULT_USER_AGENT: &str = "bibliostats/0.1 (+https://openlibrary.org/developers/api)";

#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenLibraryClient {
    pub fn new(endpoint: &str, timeout: Duration, user_agent: &str) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Transport(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.lookup_timeout_secs),
            &config.user_agent,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecordFetcher for OpenLibraryClient {
    async fn fetch_record(&self, isbn: &str) -> Result<RawRecord, LookupError> {
        let key = bibkey(isbn);
        tracing::debug!("GET {} bibkeys={}", self.endpoint, key);

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("bibkeys", key.as_str()), ("format", "json"), ("jscmd", "data")])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LookupError::Status(resp.status().as_u16()));
        }

        let mut parsed: HashMap<String, RawRecord> = resp.json().await?;

        parsed.remove(&key).ok_or(LookupError::NotFound)
    }
}

fn bibkey(isbn: &str) -> String {
    format!("ISBN:{}", isbn)
}
