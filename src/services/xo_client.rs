use std::sync::Arc;

use crate::{
    builder::{build_batch_list, TransactionBuilder},
    config::Config,
    constants::BOARD_CELLS,
    crypto::Signer,
    error::{AppError, Result},
    gateway::{
        BatchStatus, BatchStatusEntry, InvalidTransaction, LedgerGateway, RestApiClient,
        RetryPolicy, RetryingGateway,
    },
    models::{Action, Batch},
    projector::GameProjector,
};

/// What the gateway reported for a submitted batch after the status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub batch_id: String,
    pub status: BatchStatus,
    pub invalid_transactions: Vec<InvalidTransaction>,
}

impl SubmissionOutcome {
    fn from_entry(batch_id: String, entry: BatchStatusEntry) -> Self {
        Self {
            batch_id,
            status: entry.status,
            invalid_transactions: entry.invalid_transactions,
        }
    }

    pub fn is_committed(&self) -> bool {
        self.status == BatchStatus::Committed
    }

    pub fn failure_messages(&self) -> Vec<String> {
        self.invalid_transactions
            .iter()
            .map(|txn| txn.message.clone())
            .collect()
    }

    /// `INVALID` becomes `AppError::BatchInvalid`. `PENDING` and `UNKNOWN`
    /// pass through so callers can decide whether to keep waiting.
    pub fn ensure_committed(self) -> Result<Self> {
        if self.status == BatchStatus::Invalid {
            return Err(AppError::BatchInvalid {
                reasons: self.failure_messages(),
                batch_id: self.batch_id,
            });
        }
        Ok(self)
    }
}

/// Turns game intents into signed batches, submits them and resolves their
/// status with a single poll.
pub struct XoClient {
    config: Config,
    builder: TransactionBuilder,
    gateway: Arc<dyn LedgerGateway>,
    projector: Arc<GameProjector>,
}

impl XoClient {
    pub fn new(config: Config, signer: Arc<dyn Signer>) -> Result<Self> {
        let gateway = connect(&config)?;
        Ok(Self::with_gateway(config, signer, gateway))
    }

    /// Uses `gateway` as is; `config` only supplies the wait hint.
    pub fn with_gateway(
        config: Config,
        signer: Arc<dyn Signer>,
        gateway: Arc<dyn LedgerGateway>,
    ) -> Self {
        Self {
            config,
            builder: TransactionBuilder::new(signer),
            projector: Arc::new(GameProjector::new(gateway.clone())),
            gateway,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn public_key_hex(&self) -> &str {
        self.builder.public_key_hex()
    }

    pub fn projector(&self) -> Arc<GameProjector> {
        self.projector.clone()
    }

    pub async fn create_game(&self, name: &str) -> Result<SubmissionOutcome> {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Game name is empty".to_string()));
        }
        let batch = self.builder.build_single_batch(name, Action::Create)?;
        self.submit_batch(batch).await
    }

    pub async fn take_space(&self, name: &str, space: u8) -> Result<SubmissionOutcome> {
        if space == 0 || usize::from(space) > BOARD_CELLS {
            return Err(AppError::BadRequest(format!(
                "Space must be between 1 and {}, got {}",
                BOARD_CELLS, space
            )));
        }
        let batch = self.builder.build_single_batch(name, Action::Take(space))?;
        self.submit_batch(batch).await
    }

    /// Submits one batch and polls its status exactly once with the
    /// configured wait hint. Further polls happen only through a
    /// `RetryPolicy` with more than one attempt.
    pub async fn submit_batch(&self, batch: Batch) -> Result<SubmissionOutcome> {
        let batch_list = build_batch_list(vec![batch]);
        let submission = self.gateway.submit_batches(&batch_list).await?;
        tracing::info!("Batch submitted: {}", submission.batch_id);

        let entry = self
            .gateway
            .batch_status(&submission.batch_id, self.config.batch_wait_secs)
            .await?;
        let outcome = SubmissionOutcome::from_entry(submission.batch_id, entry);

        match outcome.status {
            BatchStatus::Committed => tracing::info!("Batch {} committed", outcome.batch_id),
            BatchStatus::Invalid => tracing::warn!(
                "Batch {} invalid: {}",
                outcome.batch_id,
                outcome.failure_messages().join("; ")
            ),
            status => tracing::info!("Batch {} status: {}", outcome.batch_id, status),
        }

        Ok(outcome)
    }

    /// Rebuilds the gateway (and the projector's view of it) when `url`
    /// differs from the current base URL.
    pub fn set_rest_api_url(&mut self, url: &str) -> Result<()> {
        if url.trim_end_matches('/') == self.config.base_url() {
            return Ok(());
        }

        let config = Config {
            rest_api_url: url.to_string(),
            ..self.config.clone()
        };
        let gateway = connect(&config)?;
        tracing::info!("REST API URL changed to {}", config.base_url());

        self.projector.replace_gateway(gateway.clone());
        self.gateway = gateway;
        self.config = config;
        Ok(())
    }
}

fn connect(config: &Config) -> Result<Arc<dyn LedgerGateway>> {
    let client = RestApiClient::new(config.base_url())?;
    let policy = RetryPolicy::from_config(config);
    if policy.is_single_shot() {
        Ok(Arc::new(client))
    } else {
        Ok(Arc::new(RetryingGateway::new(client, policy)))
    }
}
