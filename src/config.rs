use serde::Deserialize;
use std::env;

use crate::constants::{
    DEFAULT_BATCH_WAIT_SECS, DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_REST_API_URL,
    DEFAULT_GATEWAY_ATTEMPTS, DEFAULT_GATEWAY_RETRY_INTERVAL_MS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Gateway
    pub rest_api_url: String,

    // Signing (hex encoded secp256k1 secret; generated when absent)
    pub private_key: Option<String>,

    // Batch status long-poll hint
    pub batch_wait_secs: u64,

    // Attempts per gateway call: transient failures of any call and
    // non-terminal batch statuses are retried up to this bound
    pub gateway_attempts: usize,
    pub gateway_retry_interval_ms: u64,

    // Projection refresh timer
    pub refresh_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rest_api_url: DEFAULT_REST_API_URL.to_string(),
            private_key: None,
            batch_wait_secs: DEFAULT_BATCH_WAIT_SECS,
            gateway_attempts: DEFAULT_GATEWAY_ATTEMPTS,
            gateway_retry_interval_ms: DEFAULT_GATEWAY_RETRY_INTERVAL_MS,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            rest_api_url: env::var("XO_REST_API_URL")
                .unwrap_or_else(|_| DEFAULT_REST_API_URL.to_string()),
            private_key: env::var("XO_PRIVATE_KEY")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            batch_wait_secs: env::var("XO_BATCH_WAIT_SECS")
                .unwrap_or_else(|_| DEFAULT_BATCH_WAIT_SECS.to_string())
                .parse()?,
            gateway_attempts: env::var("XO_GATEWAY_ATTEMPTS")
                .unwrap_or_else(|_| DEFAULT_GATEWAY_ATTEMPTS.to_string())
                .parse()?,
            gateway_retry_interval_ms: env::var("XO_GATEWAY_RETRY_INTERVAL_MS")
                .unwrap_or_else(|_| DEFAULT_GATEWAY_RETRY_INTERVAL_MS.to_string())
                .parse()?,
            refresh_interval_secs: env::var("XO_REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| DEFAULT_REFRESH_INTERVAL_SECS.to_string())
                .parse()?,
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rest_api_url.trim().is_empty() {
            anyhow::bail!("XO_REST_API_URL is empty");
        }
        let url = url::Url::parse(&self.rest_api_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!(
                "XO_REST_API_URL has scheme {} (expected http or https)",
                url.scheme()
            );
        }
        if self.gateway_attempts == 0 {
            anyhow::bail!("XO_GATEWAY_ATTEMPTS must be at least 1");
        }

        if self.private_key.is_none() {
            tracing::warn!("XO_PRIVATE_KEY not set; a throwaway key will be generated");
        }
        if self.batch_wait_secs == 0 {
            tracing::warn!("XO_BATCH_WAIT_SECS is 0; batch status will almost always be PENDING");
        }
        if self.gateway_attempts > 1 {
            tracing::info!(
                "Gateway retries enabled: up to {} attempts per call every {}ms",
                self.gateway_attempts,
                self.gateway_retry_interval_ms
            );
        }
        if self.refresh_interval_secs == 0 {
            tracing::warn!("XO_REFRESH_INTERVAL_SECS is 0; background refresh will spin");
        }

        Ok(())
    }

    /// Base URL without a trailing slash, ready for path joining.
    pub fn base_url(&self) -> &str {
        self.rest_api_url.trim_end_matches('/')
    }
}
