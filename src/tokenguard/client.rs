//! TokenGuard REST API Client
//!
//! HTTP client for the growth index timeline endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::TimelineSource;
use crate::chains::Chain;
use crate::timeline::TimelineResponse;

/// Default timeline endpoint
pub const DEFAULT_ENDPOINT: &str =
    "https://api.tokenguard.io/db-api/growth-index/basic-timeline-data";

/// Comparison window requested from the API
pub const PERIOD: &str = "last year";

/// Metric requested from the API
pub const METRIC: &str = "tg_growth_index";

/// Client for the TokenGuard growth index API
pub struct TokenGuardClient {
    client: Client,
    config: TokenGuardConfig,
}

/// Configuration for the TokenGuard client
#[derive(Debug, Clone)]
pub struct TokenGuardConfig {
    /// Full URL of the basic timeline endpoint
    pub endpoint: String,
    /// Transport timeout; `None` leaves requests bounded only by cancellation
    pub request_timeout: Option<Duration>,
}

impl Default for TokenGuardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: None,
        }
    }
}

/// Body of the timeline request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRequest {
    pub chain_name: String,
    pub compare_with: String,
    pub period: String,
    pub metric: String,
}

impl TimelineRequest {
    pub fn new(chain_from: Chain, chain_to: Chain) -> Self {
        Self {
            chain_name: chain_from.to_string(),
            compare_with: chain_to.to_string(),
            period: PERIOD.to_string(),
            metric: METRIC.to_string(),
        }
    }
}

impl TokenGuardClient {
    /// Create a new client with the given configuration
    pub fn new(config: TokenGuardConfig) -> Result<Self, TokenGuardError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TokenGuardError::Request)?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &TokenGuardConfig {
        &self.config
    }

    /// Fetch the growth index timeline comparing two chains
    ///
    /// Issues exactly one request. Does not check that the chains differ.
    pub async fn fetch_timeline(
        &self,
        chain_from: Chain,
        chain_to: Chain,
    ) -> Result<TimelineResponse, TokenGuardError> {
        let body = TimelineRequest::new(chain_from, chain_to);

        tracing::debug!(
            chain_from = %chain_from,
            chain_to = %chain_to,
            endpoint = %self.config.endpoint,
            "Requesting growth index timeline"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TokenGuardError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        let timeline: TimelineResponse = serde_json::from_slice(&bytes)?;

        tracing::debug!(
            chain_from = %chain_from,
            chain_to = %chain_to,
            cumulative_points = timeline.cumulative.growth_index.len(),
            blockchain_points = timeline.blockchain.growth_index.len(),
            "Received growth index timeline"
        );

        Ok(timeline)
    }
}

#[async_trait]
impl TimelineSource for TokenGuardClient {
    async fn fetch(
        &self,
        chain_from: Chain,
        chain_to: Chain,
    ) -> Result<TimelineResponse, TokenGuardError> {
        self.fetch_timeline(chain_from, chain_to).await
    }
}

fn map_transport_error(e: reqwest::Error) -> TokenGuardError {
    if e.is_timeout() {
        TokenGuardError::Timeout
    } else if e.is_connect() {
        TokenGuardError::Unavailable
    } else {
        TokenGuardError::Request(e)
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when fetching a timeline
#[derive(Error, Debug)]
pub enum TokenGuardError {
    #[error("TokenGuard API unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_response, MockEndpoint};

    #[test]
    fn test_default_config() {
        let config = TokenGuardConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = TimelineRequest::new(Chain::Ethereum, Chain::Solana);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "chainName": "ethereum",
                "compareWith": "solana",
                "period": "last year",
                "metric": "tg_growth_index",
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_timeline_posts_request() {
        let endpoint = MockEndpoint::start(sample_response(10)).await;
        let client = TokenGuardClient::new(endpoint.config()).unwrap();

        let timeline = client
            .fetch_timeline(Chain::Ethereum, Chain::Solana)
            .await
            .unwrap();

        assert_eq!(timeline.cumulative.growth_index.len(), 10);
        assert_eq!(timeline.blockchain.growth_index.len(), 10);

        let requests = endpoint.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], TimelineRequest::new(Chain::Ethereum, Chain::Solana));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let endpoint = MockEndpoint::failing(502).await;
        let client = TokenGuardClient::new(endpoint.config()).unwrap();

        let err = client
            .fetch_timeline(Chain::Ethereum, Chain::Solana)
            .await
            .unwrap_err();

        assert!(matches!(err, TokenGuardError::Api { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_error_body_with_ok_status_is_decode_error() {
        let endpoint = MockEndpoint::replying(serde_json::json!({"message": "rate limited"})).await;
        let client = TokenGuardClient::new(endpoint.config()).unwrap();

        let err = client
            .fetch_timeline(Chain::Ethereum, Chain::Solana)
            .await
            .unwrap_err();

        assert!(matches!(err, TokenGuardError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let client = TokenGuardClient::new(TokenGuardConfig {
            endpoint: "http://127.0.0.1:1/basic-timeline-data".to_string(),
            request_timeout: Some(Duration::from_secs(2)),
        })
        .unwrap();

        let result = client.fetch_timeline(Chain::Ethereum, Chain::Solana).await;
        assert!(result.is_err());
    }
}
