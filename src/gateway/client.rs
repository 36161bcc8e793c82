use async_trait::async_trait;
use prost::Message;
use reqwest::{header::CONTENT_TYPE, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::{
    batch_id_from_link,
    types::{BatchListResponse, BatchStatusEntry, BatchStatusResponse, BatchSubmission, StateEntry, StateResponse},
    LedgerGateway,
};
use crate::{
    constants::BATCH_CONTENT_TYPE,
    error::{AppError, Result},
    models::BatchList,
};

/// reqwest-backed client for the ledger REST API.
#[derive(Clone, Debug)]
pub struct RestApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| AppError::BadRequest(format!("Invalid REST API URL {base_url:?}: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::BadRequest(format!(
                "REST API URL must be http or https, got {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| AppError::BadRequest(format!("Invalid endpoint {path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(AppError::Http {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    serde_json::from_slice(&body).map_err(|e| AppError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl LedgerGateway for RestApiClient {
    async fn submit_batches(&self, batch_list: &BatchList) -> Result<BatchSubmission> {
        let url = self.endpoint("batches", &[])?;
        let body = batch_list.encode_to_vec();
        tracing::debug!(
            "POST {} ({} batches, {} bytes)",
            url,
            batch_list.batches.len(),
            body.len()
        );

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, BATCH_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let ack: BatchListResponse = read_json(response).await?;
        let batch_id = batch_id_from_link(&ack.link)?;

        Ok(BatchSubmission {
            link: ack.link,
            batch_id,
        })
    }

    async fn batch_status(&self, batch_id: &str, wait_secs: u64) -> Result<BatchStatusEntry> {
        let wait = wait_secs.to_string();
        let url = self.endpoint("batch_statuses", &[("id", batch_id), ("wait", &wait)])?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let statuses: BatchStatusResponse = read_json(response).await?;
        let mut data = statuses.data;
        if data.is_empty() {
            return Err(AppError::MalformedResponse(format!(
                "no status reported for batch {batch_id}"
            )));
        }
        let position = data.iter().position(|entry| entry.id == batch_id).unwrap_or(0);
        Ok(data.swap_remove(position))
    }

    async fn fetch_state(&self, address: &str) -> Result<Vec<StateEntry>> {
        let url = self.endpoint("state", &[("address", address)])?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let state: StateResponse = read_json(response).await?;
        Ok(state.data)
    }
}
