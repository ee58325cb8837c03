// services/cricket_feed.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::{AppError, Result};
use crate::models::external::{ExternalMatch, FeedEnvelope};

/// Source of current matches from the live-score provider.
#[async_trait]
pub trait MatchFeed: Send + Sync {
    async fn current_matches(&self) -> Result<Vec<ExternalMatch>>;
}

#[derive(Debug, Clone)]
pub struct CricApiClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl CricApiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(CricApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }
}

#[async_trait]
impl MatchFeed for CricApiClient {
    async fn current_matches(&self) -> Result<Vec<ExternalMatch>> {
        let url = format!("{}/currentMatches", self.base_url);
        tracing::debug!("📡 Fetching current matches from {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str()), ("offset", "0")])
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("feed request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("⚠️ Live score feed answered {}", status);
            return Err(AppError::upstream(format!("feed responded with status {}", status)));
        }

        let envelope: FeedEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("feed body was not valid JSON: {}", e.without_url())))?;

        if envelope.status.as_deref() == Some("failure") {
            let reason = envelope.reason.unwrap_or_else(|| "unknown reason".to_string());
            tracing::warn!("⚠️ Live score feed reported failure: {}", reason);
            return Err(AppError::upstream(format!("feed reported failure: {}", reason)));
        }

        tracing::info!("✅ Live score feed returned {} matches", envelope.data.len());
        Ok(envelope.data)
    }
}
