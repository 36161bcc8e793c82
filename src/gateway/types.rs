use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// `POST /batches` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchListResponse {
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Committed,
    Invalid,
    Pending,
    #[serde(other)]
    Unknown,
}

impl BatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Committed => "COMMITTED",
            Self::Invalid => "INVALID",
            Self::Pending => "PENDING",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Invalid)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidTransaction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extended_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatusEntry {
    pub id: String,
    pub status: BatchStatus,
    #[serde(default)]
    pub invalid_transactions: Vec<InvalidTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatusResponse {
    pub data: Vec<BatchStatusEntry>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub address: String,
    /// Base64 state value.
    pub data: String,
}

/// Paging cursor as sent by the gateway. Never interpreted here; gateways
/// disagree on whether `limit` is a number or a string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub start: Option<Value>,
    #[serde(default)]
    pub limit: Option<Value>,
    #[serde(default)]
    pub next_position: Option<Value>,
    #[serde(default)]
    pub next: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    pub data: Vec<StateEntry>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub head: Option<String>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// Accepted submission: the status link and the batch id taken from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSubmission {
    pub link: String,
    pub batch_id: String,
}
