use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use super::{
    types::{BatchStatusEntry, BatchSubmission, StateEntry},
    LedgerGateway,
};
use crate::{config::Config, error::Result, models::BatchList};

/// Bounded re-polling for gateway calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub interval: Duration,
}

impl RetryPolicy {
    /// One request, no retries.
    pub fn single_shot() -> Self {
        Self {
            max_attempts: 1,
            interval: Duration::ZERO,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.gateway_attempts.max(1),
            interval: Duration::from_millis(config.gateway_retry_interval_ms),
        }
    }

    pub fn is_single_shot(&self) -> bool {
        self.max_attempts <= 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_shot()
    }
}

/// Wraps a gateway, retrying transient failures and re-polling batch statuses
/// that are still `PENDING` or `UNKNOWN`, up to `max_attempts` calls in total.
pub struct RetryingGateway<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: LedgerGateway> RetryingGateway<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn with_retries<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call().await {
                Err(e) if e.is_transient() && attempt < attempts => {
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}",
                        operation,
                        attempt,
                        attempts,
                        e
                    );
                    sleep(self.policy.interval).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl<G: LedgerGateway> LedgerGateway for RetryingGateway<G> {
    async fn submit_batches(&self, batch_list: &BatchList) -> Result<BatchSubmission> {
        self.with_retries("submit_batches", || self.inner.submit_batches(batch_list))
            .await
    }

    async fn batch_status(&self, batch_id: &str, wait_secs: u64) -> Result<BatchStatusEntry> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.batch_status(batch_id, wait_secs).await {
                Ok(entry) if entry.status.is_terminal() || attempt >= attempts => {
                    return Ok(entry);
                }
                Ok(entry) => {
                    tracing::debug!(
                        "Batch {} still {} (attempt {}/{})",
                        batch_id,
                        entry.status,
                        attempt,
                        attempts
                    );
                }
                Err(e) if e.is_transient() && attempt < attempts => {
                    tracing::warn!(
                        "batch_status failed (attempt {}/{}): {}",
                        attempt,
                        attempts,
                        e
                    );
                }
                Err(e) => return Err(e),
            }
            sleep(self.policy.interval).await;
            attempt += 1;
        }
    }

    async fn fetch_state(&self, address: &str) -> Result<Vec<StateEntry>> {
        self.with_retries("fetch_state", || self.inner.fetch_state(address))
            .await
    }
}
