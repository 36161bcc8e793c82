//! Ledger REST gateway access.

pub mod client;
#[cfg(any(test, feature = "mocks"))]
pub mod mock;
pub mod retry;
#[cfg(test)]
pub(crate) mod stub;
pub mod types;

pub use client::RestApiClient;
pub use retry::{RetryPolicy, RetryingGateway};
pub use types::{
    BatchStatus, BatchStatusEntry, BatchSubmission, InvalidTransaction, StateEntry,
};

use async_trait::async_trait;
use url::Url;

use crate::{
    error::{AppError, Result},
    models::BatchList,
};

/// Transport-level view of the ledger gateway. Implementations issue exactly
/// one request per call and never retry on their own.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    async fn submit_batches(&self, batch_list: &BatchList) -> Result<BatchSubmission>;

    /// Single status query; the gateway holds the request open for up to
    /// `wait_secs` before answering.
    async fn batch_status(&self, batch_id: &str, wait_secs: u64) -> Result<BatchStatusEntry>;

    /// Entries at an exact 70-char address or under a shorter prefix, in
    /// gateway order.
    async fn fetch_state(&self, address: &str) -> Result<Vec<StateEntry>>;
}

/// Extracts the `id` query parameter from a batch status link.
pub fn batch_id_from_link(link: &str) -> Result<String> {
    let url = Url::parse(link)
        .map_err(|e| AppError::MalformedResponse(format!("invalid status link {link:?}: {e}")))?;
    url.query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            AppError::MalformedResponse(format!("status link {link:?} carries no batch id"))
        })
}
