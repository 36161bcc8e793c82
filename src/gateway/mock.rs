//! In-memory `LedgerGateway` for tests and UI development without a ledger.

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use super::{
    types::{BatchStatus, BatchStatusEntry, BatchSubmission, InvalidTransaction, StateEntry},
    LedgerGateway,
};
use crate::{
    addressing, codec,
    error::{AppError, Result},
    models::{BatchList, Game},
};

#[derive(Default)]
struct MockState {
    entries: BTreeMap<String, String>,
    submitted: Vec<BatchList>,
    statuses: VecDeque<(BatchStatus, Vec<InvalidTransaction>)>,
    status_calls: Vec<(String, u64)>,
    state_calls: Vec<String>,
    failures: usize,
}

/// Serves state from a map keyed by address and answers status queries from a
/// script (default `COMMITTED`).
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    pub fn put_game(&self, game: &Game) {
        self.put_raw(&addressing::record_address(&game.name), &codec::encode_game_record(game));
    }

    pub fn put_raw(&self, address: &str, data: &str) {
        self.with_state(|s| {
            s.entries.insert(address.to_string(), data.to_string());
        });
    }

    pub fn remove_game(&self, name: &str) {
        self.with_state(|s| {
            s.entries.remove(&addressing::record_address(name));
        });
    }

    /// Queue the answer for the next status query.
    pub fn push_status(&self, status: BatchStatus, invalid_transactions: Vec<InvalidTransaction>) {
        self.with_state(|s| s.statuses.push_back((status, invalid_transactions)));
    }

    /// Make the next `count` calls fail with a transport error.
    pub fn fail_next(&self, count: usize) {
        self.with_state(|s| s.failures = count);
    }

    pub fn submitted(&self) -> Vec<BatchList> {
        self.with_state(|s| s.submitted.clone())
    }

    pub fn status_calls(&self) -> Vec<(String, u64)> {
        self.with_state(|s| s.status_calls.clone())
    }

    pub fn state_calls(&self) -> Vec<String> {
        self.with_state(|s| s.state_calls.clone())
    }

    fn take_failure(state: &mut MockState) -> Result<()> {
        if state.failures > 0 {
            state.failures -= 1;
            return Err(AppError::Transport("mock connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerGateway for MockGateway {
    async fn submit_batches(&self, batch_list: &BatchList) -> Result<BatchSubmission> {
        self.with_state(|s| {
            Self::take_failure(s)?;
            let batch_id = batch_list
                .batches
                .iter()
                .map(|batch| batch.header_signature.as_str())
                .collect::<Vec<_>>()
                .join(",");
            s.submitted.push(batch_list.clone());
            Ok(BatchSubmission {
                link: format!("http://mock/batch_statuses?id={batch_id}"),
                batch_id,
            })
        })
    }

    async fn batch_status(&self, batch_id: &str, wait_secs: u64) -> Result<BatchStatusEntry> {
        self.with_state(|s| {
            s.status_calls.push((batch_id.to_string(), wait_secs));
            Self::take_failure(s)?;
            let (status, invalid_transactions) = s
                .statuses
                .pop_front()
                .unwrap_or((BatchStatus::Committed, Vec::new()));
            Ok(BatchStatusEntry {
                id: batch_id.to_string(),
                status,
                invalid_transactions,
            })
        })
    }

    async fn fetch_state(&self, address: &str) -> Result<Vec<StateEntry>> {
        self.with_state(|s| {
            s.state_calls.push(address.to_string());
            Self::take_failure(s)?;
            Ok(s.entries
                .iter()
                .filter(|(entry_address, _)| entry_address.starts_with(address))
                .map(|(entry_address, data)| StateEntry {
                    address: entry_address.clone(),
                    data: data.clone(),
                })
                .collect())
        })
    }
}
